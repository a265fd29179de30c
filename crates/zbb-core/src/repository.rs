use uuid::Uuid;
use zbb_domain::{
    Account, BudgetRowFields, Category, DateRange, MonthId, MonthlyBudget, Transaction, UserId,
};

use crate::RepositoryError;

/// Source of plain ledger records for the engine.
///
/// Implementations must enforce uniqueness of stored budget rows per
/// (user, category, month): `insert_budget_row` fails with
/// [`RepositoryError::Conflict`] when the row already exists.
pub trait LedgerRepository: Send + Sync {
    fn list_active_categories(&self, user: &UserId) -> Result<Vec<Category>, RepositoryError>;

    fn get_category(
        &self,
        user: &UserId,
        category_id: Uuid,
    ) -> Result<Option<Category>, RepositoryError>;

    /// Transactions dated inside `range` (whole history when `None`).
    fn list_transactions(
        &self,
        user: &UserId,
        range: Option<DateRange>,
        category_id: Option<Uuid>,
    ) -> Result<Vec<Transaction>, RepositoryError>;

    fn list_budget_rows(
        &self,
        user: &UserId,
        month: MonthId,
    ) -> Result<Vec<MonthlyBudget>, RepositoryError>;

    fn list_budget_rows_for_category(
        &self,
        user: &UserId,
        category_id: Uuid,
    ) -> Result<Vec<MonthlyBudget>, RepositoryError>;

    fn get_budget_row(
        &self,
        user: &UserId,
        category_id: Uuid,
        month: MonthId,
    ) -> Result<Option<MonthlyBudget>, RepositoryError>;

    fn list_accounts(&self, user: &UserId) -> Result<Vec<Account>, RepositoryError>;

    fn insert_budget_row(&self, user: &UserId, row: &MonthlyBudget) -> Result<(), RepositoryError>;

    /// Updates only the provided fields, creating the row when missing.
    fn upsert_budget_row(
        &self,
        user: &UserId,
        category_id: Uuid,
        month: MonthId,
        fields: &BudgetRowFields,
    ) -> Result<MonthlyBudget, RepositoryError>;
}
