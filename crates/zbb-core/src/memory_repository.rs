//! Process-local [`LedgerRepository`] used by tests and embedders.

use std::{
    collections::HashMap,
    sync::{Mutex, MutexGuard},
};

use uuid::Uuid;
use zbb_domain::{
    Account, BudgetRowFields, Category, DateRange, LedgerSnapshot, MonthId, MonthlyBudget,
    Transaction, UserId,
};

use crate::{LedgerRepository, RepositoryError};

/// Keeps one [`LedgerSnapshot`] per user behind a mutex.
#[derive(Debug, Default)]
pub struct InMemoryLedgerRepository {
    users: Mutex<HashMap<UserId, LedgerSnapshot>>,
}

impl InMemoryLedgerRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the whole record set of `user`.
    pub fn set_snapshot(&self, user: &UserId, snapshot: LedgerSnapshot) -> Result<(), RepositoryError> {
        self.lock()?.insert(user.clone(), snapshot);
        Ok(())
    }

    pub fn snapshot(&self, user: &UserId) -> Result<LedgerSnapshot, RepositoryError> {
        Ok(self.lock()?.get(user).cloned().unwrap_or_default())
    }

    pub fn add_category(&self, user: &UserId, category: Category) -> Result<Uuid, RepositoryError> {
        self.write(user, |snapshot| snapshot.add_category(category))
    }

    pub fn add_transaction(
        &self,
        user: &UserId,
        transaction: Transaction,
    ) -> Result<Uuid, RepositoryError> {
        self.write(user, |snapshot| snapshot.add_transaction(transaction))
    }

    pub fn add_account(&self, user: &UserId, account: Account) -> Result<Uuid, RepositoryError> {
        self.write(user, |snapshot| snapshot.add_account(account))
    }

    pub fn remove_transaction(&self, user: &UserId, id: Uuid) -> Result<bool, RepositoryError> {
        self.write(user, |snapshot| snapshot.remove_transaction(id))
    }

    fn lock(&self) -> Result<MutexGuard<'_, HashMap<UserId, LedgerSnapshot>>, RepositoryError> {
        self.users
            .lock()
            .map_err(|_| RepositoryError::Unavailable("ledger store lock poisoned".into()))
    }

    fn read<T>(&self, user: &UserId, f: impl FnOnce(&LedgerSnapshot) -> T) -> Result<T, RepositoryError> {
        let users = self.lock()?;
        match users.get(user) {
            Some(snapshot) => Ok(f(snapshot)),
            None => Ok(f(&LedgerSnapshot::default())),
        }
    }

    fn write<T>(
        &self,
        user: &UserId,
        f: impl FnOnce(&mut LedgerSnapshot) -> T,
    ) -> Result<T, RepositoryError> {
        let mut users = self.lock()?;
        Ok(f(users.entry(user.clone()).or_default()))
    }
}

impl LedgerRepository for InMemoryLedgerRepository {
    fn list_active_categories(&self, user: &UserId) -> Result<Vec<Category>, RepositoryError> {
        self.read(user, LedgerSnapshot::active_categories)
    }

    fn get_category(
        &self,
        user: &UserId,
        category_id: Uuid,
    ) -> Result<Option<Category>, RepositoryError> {
        self.read(user, |snapshot| snapshot.category(category_id).cloned())
    }

    fn list_transactions(
        &self,
        user: &UserId,
        range: Option<DateRange>,
        category_id: Option<Uuid>,
    ) -> Result<Vec<Transaction>, RepositoryError> {
        self.read(user, |snapshot| {
            snapshot.transactions_matching(range.as_ref(), category_id)
        })
    }

    fn list_budget_rows(
        &self,
        user: &UserId,
        month: MonthId,
    ) -> Result<Vec<MonthlyBudget>, RepositoryError> {
        self.read(user, |snapshot| snapshot.budget_rows_for_month(month))
    }

    fn list_budget_rows_for_category(
        &self,
        user: &UserId,
        category_id: Uuid,
    ) -> Result<Vec<MonthlyBudget>, RepositoryError> {
        self.read(user, |snapshot| snapshot.budget_rows_for_category(category_id))
    }

    fn get_budget_row(
        &self,
        user: &UserId,
        category_id: Uuid,
        month: MonthId,
    ) -> Result<Option<MonthlyBudget>, RepositoryError> {
        self.read(user, |snapshot| snapshot.budget_row(category_id, month).cloned())
    }

    fn list_accounts(&self, user: &UserId) -> Result<Vec<Account>, RepositoryError> {
        self.read(user, |snapshot| snapshot.accounts.clone())
    }

    fn insert_budget_row(&self, user: &UserId, row: &MonthlyBudget) -> Result<(), RepositoryError> {
        let inserted = self.write(user, |snapshot| snapshot.insert_budget_row(row.clone()))?;
        if inserted {
            Ok(())
        } else {
            Err(RepositoryError::Conflict(format!(
                "budget row for category {} in {} already exists",
                row.category_id, row.month
            )))
        }
    }

    fn upsert_budget_row(
        &self,
        user: &UserId,
        category_id: Uuid,
        month: MonthId,
        fields: &BudgetRowFields,
    ) -> Result<MonthlyBudget, RepositoryError> {
        self.write(user, |snapshot| snapshot.upsert_budget_row(category_id, month, fields))
    }
}
