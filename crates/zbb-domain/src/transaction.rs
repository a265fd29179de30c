use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{money::Money, month::MonthId};

/// A sign-normalized ledger movement: positive inflow, negative outflow.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Transaction {
    pub id: Uuid,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_id: Option<Uuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account_id: Option<Uuid>,
    pub amount: Money,
    pub date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memo: Option<String>,
}

impl Transaction {
    pub fn new(amount: Money, date: NaiveDate) -> Self {
        Self {
            id: Uuid::new_v4(),
            category_id: None,
            account_id: None,
            amount,
            date,
            memo: None,
        }
    }

    pub fn with_category(mut self, category_id: Uuid) -> Self {
        self.category_id = Some(category_id);
        self
    }

    pub fn with_account(mut self, account_id: Uuid) -> Self {
        self.account_id = Some(account_id);
        self
    }

    pub fn with_memo(mut self, memo: impl Into<String>) -> Self {
        self.memo = Some(memo.into());
        self
    }

    /// The month this transaction is booked in.
    pub fn month(&self) -> MonthId {
        MonthId::containing(self.date)
    }

    pub fn is_outflow(&self) -> bool {
        self.amount.is_negative()
    }
}
