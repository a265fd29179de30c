//! One user's complete record set, shared by every repository backend.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    account::Account,
    budget::{BudgetRowFields, MonthlyBudget},
    category::Category,
    month::{DateRange, MonthId},
    transaction::Transaction,
};

/// Plain records for a single user: categories, transactions, accounts and
/// stored monthly budget rows.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct LedgerSnapshot {
    #[serde(default)]
    pub categories: Vec<Category>,
    #[serde(default)]
    pub transactions: Vec<Transaction>,
    #[serde(default)]
    pub accounts: Vec<Account>,
    #[serde(default)]
    pub budget_rows: Vec<MonthlyBudget>,
}

impl LedgerSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_category(&mut self, category: Category) -> Uuid {
        let id = category.id;
        self.categories.push(category);
        id
    }

    pub fn add_transaction(&mut self, transaction: Transaction) -> Uuid {
        let id = transaction.id;
        self.transactions.push(transaction);
        id
    }

    pub fn add_account(&mut self, account: Account) -> Uuid {
        let id = account.id;
        self.accounts.push(account);
        id
    }

    /// Removes a transaction, returning whether it existed.
    pub fn remove_transaction(&mut self, id: Uuid) -> bool {
        let before = self.transactions.len();
        self.transactions.retain(|txn| txn.id != id);
        self.transactions.len() != before
    }

    pub fn category(&self, id: Uuid) -> Option<&Category> {
        self.categories.iter().find(|category| category.id == id)
    }

    /// Active categories ordered by sort order, then name.
    pub fn active_categories(&self) -> Vec<Category> {
        let mut active: Vec<Category> = self
            .categories
            .iter()
            .filter(|category| category.is_active)
            .cloned()
            .collect();
        active.sort_by(|a, b| {
            a.sort_order
                .cmp(&b.sort_order)
                .then_with(|| a.name.cmp(&b.name))
        });
        active
    }

    /// Transactions inside `range` (all dates when `None`), optionally
    /// restricted to one category.
    pub fn transactions_matching(
        &self,
        range: Option<&DateRange>,
        category_id: Option<Uuid>,
    ) -> Vec<Transaction> {
        self.transactions
            .iter()
            .filter(|txn| range.map_or(true, |range| range.contains(txn.date)))
            .filter(|txn| category_id.map_or(true, |id| txn.category_id == Some(id)))
            .cloned()
            .collect()
    }

    pub fn budget_rows_for_month(&self, month: MonthId) -> Vec<MonthlyBudget> {
        self.budget_rows
            .iter()
            .filter(|row| row.month == month)
            .cloned()
            .collect()
    }

    pub fn budget_rows_for_category(&self, category_id: Uuid) -> Vec<MonthlyBudget> {
        self.budget_rows
            .iter()
            .filter(|row| row.category_id == category_id)
            .cloned()
            .collect()
    }

    pub fn budget_row(&self, category_id: Uuid, month: MonthId) -> Option<&MonthlyBudget> {
        self.budget_rows
            .iter()
            .find(|row| row.category_id == category_id && row.month == month)
    }

    /// Inserts a row unless one already exists for its (category, month).
    ///
    /// Returns `false` without modifying anything on a duplicate.
    pub fn insert_budget_row(&mut self, row: MonthlyBudget) -> bool {
        if self.budget_row(row.category_id, row.month).is_some() {
            return false;
        }
        self.budget_rows.push(row);
        true
    }

    /// Updates the provided fields of an existing row, or creates the row
    /// with zero for every absent field.
    pub fn upsert_budget_row(
        &mut self,
        category_id: Uuid,
        month: MonthId,
        fields: &BudgetRowFields,
    ) -> MonthlyBudget {
        if let Some(existing) = self
            .budget_rows
            .iter_mut()
            .find(|row| row.category_id == category_id && row.month == month)
        {
            existing.apply(fields);
            return existing.clone();
        }
        let row = MonthlyBudget::new(
            category_id,
            month,
            fields.assigned_amount.unwrap_or_default(),
            fields.start_balance.unwrap_or_default(),
        );
        self.budget_rows.push(row.clone());
        row
    }
}
