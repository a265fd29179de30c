//! Stored monthly budget rows and the computed per-month views built on them.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    category::{Category, CategoryKind, RolloverStrategy},
    money::Money,
    month::MonthId,
};

/// Persisted assignment for one (category, month).
///
/// `start_balance` is frozen when the row is created and never recomputed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MonthlyBudget {
    pub id: Uuid,
    pub category_id: Uuid,
    pub month: MonthId,
    pub assigned_amount: Money,
    pub start_balance: Money,
}

impl MonthlyBudget {
    pub fn new(
        category_id: Uuid,
        month: MonthId,
        assigned_amount: Money,
        start_balance: Money,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            category_id,
            month,
            assigned_amount,
            start_balance,
        }
    }

    /// Month-end balance of this row given the month's activity.
    pub fn available_with(&self, activity: Money) -> Money {
        self.start_balance + self.assigned_amount + activity
    }

    /// Applies the provided fields, leaving absent ones untouched.
    pub fn apply(&mut self, fields: &BudgetRowFields) {
        if let Some(assigned) = fields.assigned_amount {
            self.assigned_amount = assigned;
        }
        if let Some(start) = fields.start_balance {
            self.start_balance = start;
        }
    }
}

/// Partial update for a stored budget row.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BudgetRowFields {
    pub assigned_amount: Option<Money>,
    pub start_balance: Option<Money>,
}

impl BudgetRowFields {
    pub fn assigned(amount: Money) -> Self {
        Self {
            assigned_amount: Some(amount),
            start_balance: None,
        }
    }
}

/// Computed (never stored) balance of a category for a month.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MonthlyBudgetView {
    /// Stored row id, or `virtual-<category id>` when no row exists yet.
    pub id: String,
    pub category_id: Uuid,
    pub category_name: String,
    pub kind: CategoryKind,
    pub rollover_strategy: RolloverStrategy,
    pub month: MonthId,
    pub start_balance: Money,
    pub assigned_amount: Money,
    pub activity: Money,
    pub available: Money,
    pub is_virtual: bool,
}

impl MonthlyBudgetView {
    /// Builds the view; `available` is always derived from its inputs.
    pub fn compute(
        category: &Category,
        month: MonthId,
        stored: Option<&MonthlyBudget>,
        start_balance: Money,
        activity: Money,
    ) -> Self {
        let assigned_amount = stored.map_or(Money::ZERO, |row| row.assigned_amount);
        let id = match stored {
            Some(row) => row.id.to_string(),
            None => format!("virtual-{}", category.id),
        };
        Self {
            id,
            category_id: category.id,
            category_name: category.name.clone(),
            kind: category.kind,
            rollover_strategy: category.rollover_strategy,
            month,
            start_balance,
            assigned_amount,
            activity,
            available: start_balance + assigned_amount + activity,
            is_virtual: stored.is_none(),
        }
    }

    pub fn is_income(&self) -> bool {
        self.kind == CategoryKind::Income
    }

    pub fn is_overspent(&self) -> bool {
        self.available.is_negative()
    }
}

/// Month-level "To Be Budgeted" aggregate.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BudgetSummary {
    pub month: MonthId,
    pub total_income: Money,
    pub leftover_from_reset: Money,
    pub total_assigned: Money,
    pub total_activity: Money,
    pub total_available: Money,
    pub overspent: Money,
    pub to_be_budgeted: Money,
}

impl BudgetSummary {
    /// More was assigned than income plus pooled leftovers provide.
    pub fn is_over_assigned(&self) -> bool {
        self.to_be_budgeted.is_negative()
    }
}

/// Point-in-time disposable liquidity.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SafeToSpend {
    pub safe_to_spend: Money,
    pub total_liquid: Money,
    pub pending_bills: Money,
    pub sinking_contributions: Money,
}

impl SafeToSpend {
    pub fn from_parts(total_liquid: Money, pending_bills: Money, sinking_contributions: Money) -> Self {
        Self {
            safe_to_spend: total_liquid - pending_bills - sinking_contributions,
            total_liquid,
            pending_bills,
            sinking_contributions,
        }
    }
}
