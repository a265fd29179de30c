//! Domain types representing budget categories.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::money::Money;

/// A budgeting envelope owned by one user.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Category {
    pub id: Uuid,
    pub name: String,
    pub kind: CategoryKind,
    #[serde(default)]
    pub rollover_strategy: RolloverStrategy,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_amount: Option<Money>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,
    #[serde(default = "Category::default_active")]
    pub is_active: bool,
    #[serde(default)]
    pub sort_order: i32,
}

impl Category {
    pub fn new(name: impl Into<String>, kind: CategoryKind) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            kind,
            rollover_strategy: RolloverStrategy::default(),
            target_amount: None,
            due_date: None,
            is_active: Self::default_active(),
            sort_order: 0,
        }
    }

    fn default_active() -> bool {
        true
    }

    pub fn with_strategy(mut self, strategy: RolloverStrategy) -> Self {
        self.rollover_strategy = strategy;
        self
    }

    pub fn with_target(mut self, target: Money) -> Self {
        self.target_amount = Some(target);
        self
    }

    pub fn with_due_date(mut self, due_date: NaiveDate) -> Self {
        self.due_date = Some(due_date);
        self
    }

    pub fn with_sort_order(mut self, sort_order: i32) -> Self {
        self.sort_order = sort_order;
        self
    }

    pub fn deactivated(mut self) -> Self {
        self.is_active = false;
        self
    }

    pub fn is_income(&self) -> bool {
        self.kind == CategoryKind::Income
    }

    /// Target amount only when strictly positive.
    pub fn positive_target(&self) -> Option<Money> {
        self.target_amount.filter(|target| target.is_positive())
    }

    /// Rollover strategy in effect; income categories never carry balances.
    pub fn effective_strategy(&self) -> Option<RolloverStrategy> {
        if self.is_income() {
            None
        } else {
            Some(self.rollover_strategy)
        }
    }
}

/// Supported category types.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum CategoryKind {
    #[serde(rename = "INCOME")]
    Income,
    /// Fixed monthly bill.
    #[serde(rename = "FIX")]
    Fix,
    #[serde(rename = "VARIABLE")]
    Variable,
    /// Deterministic sinking fund with a target and due date.
    #[serde(rename = "SF1")]
    Sf1,
    /// Flexible sinking fund.
    #[serde(rename = "SF2")]
    Sf2,
}

impl CategoryKind {
    pub fn is_sinking_fund(&self) -> bool {
        matches!(self, CategoryKind::Sf1 | CategoryKind::Sf2)
    }
}

impl fmt::Display for CategoryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            CategoryKind::Income => "INCOME",
            CategoryKind::Fix => "FIX",
            CategoryKind::Variable => "VARIABLE",
            CategoryKind::Sf1 => "SF1",
            CategoryKind::Sf2 => "SF2",
        };
        f.write_str(label)
    }
}

/// What part of a month-end balance carries into the next month.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum RolloverStrategy {
    #[default]
    Reset,
    Accumulate,
    Sweep,
}

impl fmt::Display for RolloverStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            RolloverStrategy::Reset => "RESET",
            RolloverStrategy::Accumulate => "ACCUMULATE",
            RolloverStrategy::Sweep => "SWEEP",
        };
        f.write_str(label)
    }
}
