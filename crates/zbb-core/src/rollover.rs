//! Month-boundary carry-over of category balances.
//!
//! Both the read path ([`BudgetLedger`](crate::BudgetLedger)) and the write
//! paths ([`MonthInitializer`](crate::MonthInitializer),
//! [`AssignmentService`](crate::AssignmentService)) derive a start balance
//! through [`PriorMonthState`] and [`RolloverEngine`], so the policy is the
//! same whether computed fresh or frozen into a stored row.

use std::collections::HashMap;

use tracing::debug;
use uuid::Uuid;
use zbb_domain::{Category, MonthId, Money, MonthlyBudget, RolloverStrategy, Transaction, UserId};

use crate::{CoreResult, LedgerRepository};

type RolloverRule = fn(Money) -> Money;

fn reset(_: Money) -> Money {
    Money::ZERO
}

fn accumulate(prior: Money) -> Money {
    prior
}

fn sweep(prior: Money) -> Money {
    prior.min(Money::ZERO)
}

/// Stateless mapping from a prior month's balance to the next start balance.
pub struct RolloverEngine;

impl RolloverEngine {
    /// Strategy table.
    pub fn rule(strategy: RolloverStrategy) -> RolloverRule {
        match strategy {
            RolloverStrategy::Reset => reset,
            RolloverStrategy::Accumulate => accumulate,
            RolloverStrategy::Sweep => sweep,
        }
    }

    /// `None` means the prior month left no trace (no row, no activity),
    /// which always starts at zero.
    pub fn compute_start_balance(
        strategy: RolloverStrategy,
        prior_available: Option<Money>,
    ) -> Money {
        match prior_available {
            Some(prior) => Self::rule(strategy)(prior),
            None => Money::ZERO,
        }
    }

    /// Start balance for a category; income categories never carry.
    pub fn start_balance_for(category: &Category, prior_available: Option<Money>) -> Money {
        match category.effective_strategy() {
            Some(strategy) => Self::compute_start_balance(strategy, prior_available),
            None => Money::ZERO,
        }
    }
}

/// Signed activity per category; uncategorized transactions are skipped.
pub fn activity_by_category(transactions: &[Transaction]) -> HashMap<Uuid, Money> {
    let mut sums: HashMap<Uuid, Money> = HashMap::new();
    for txn in transactions {
        if let Some(category_id) = txn.category_id {
            *sums.entry(category_id).or_default() += txn.amount;
        }
    }
    sums
}

/// Stored rows and activity of the month before a target month.
#[derive(Debug, Clone, Default)]
pub struct PriorMonthState {
    pub month: Option<MonthId>,
    rows: HashMap<Uuid, MonthlyBudget>,
    activity: HashMap<Uuid, Money>,
}

impl PriorMonthState {
    /// Loads the month preceding `month`. Looks back exactly one month.
    pub fn load(
        repository: &dyn LedgerRepository,
        user: &UserId,
        month: MonthId,
    ) -> CoreResult<Self> {
        let previous = month.previous();
        let rows = repository.list_budget_rows(user, previous)?;
        let transactions = repository.list_transactions(user, Some(previous.range()), None)?;
        debug!(
            month = %previous,
            rows = rows.len(),
            transactions = transactions.len(),
            "loaded prior month state"
        );
        Ok(Self::from_parts(previous, rows, &transactions))
    }

    pub fn from_parts(month: MonthId, rows: Vec<MonthlyBudget>, transactions: &[Transaction]) -> Self {
        Self {
            month: Some(month),
            rows: rows.into_iter().map(|row| (row.category_id, row)).collect(),
            activity: activity_by_category(transactions),
        }
    }

    pub fn row(&self, category_id: Uuid) -> Option<&MonthlyBudget> {
        self.rows.get(&category_id)
    }

    /// Prior `available`: stored row plus activity, or `0 + 0 + activity`
    /// without a row. `None` when neither exists.
    pub fn available(&self, category_id: Uuid) -> Option<Money> {
        let activity = self.activity.get(&category_id).copied();
        match (self.rows.get(&category_id), activity) {
            (Some(row), activity) => Some(row.available_with(activity.unwrap_or_default())),
            (None, Some(activity)) => Some(activity),
            (None, None) => None,
        }
    }

    pub fn start_balance_for(&self, category: &Category) -> Money {
        RolloverEngine::start_balance_for(category, self.available(category.id))
    }
}
