use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::money::Money;

/// A cash or bank account whose balance counts toward liquidity.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Account {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub initial_balance: Money,
}

impl Account {
    pub fn new(name: impl Into<String>, initial_balance: Money) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            initial_balance,
        }
    }
}

