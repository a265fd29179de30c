//! Write paths: month initialization and budget assignment.

use std::collections::HashSet;

use tracing::{debug, info, warn};
use uuid::Uuid;
use zbb_domain::{BudgetRowFields, Category, MonthId, Money, MonthlyBudget, UserId};

use crate::{CoreError, CoreResult, LedgerRepository, PriorMonthState, RepositoryError};

/// Outcome of a best-effort month initialization.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MonthInitReport {
    pub created: usize,
    /// Categories whose row could not be stored, with the failure text.
    pub failed: Vec<(Uuid, String)>,
}

/// Materializes stored rows for a month. Safe to re-run.
pub struct MonthInitializer<'a> {
    repository: &'a dyn LedgerRepository,
}

impl<'a> MonthInitializer<'a> {
    pub fn new(repository: &'a dyn LedgerRepository) -> Self {
        Self { repository }
    }

    /// Creates `assigned = 0` rows with a rolled-over start balance for every
    /// active non-income category lacking one. Per-category insert failures
    /// are recorded and never abort the batch.
    pub fn initialize_month(&self, user: &UserId, month: MonthId) -> CoreResult<MonthInitReport> {
        let categories = self.repository.list_active_categories(user)?;
        let existing: HashSet<Uuid> = self
            .repository
            .list_budget_rows(user, month)?
            .into_iter()
            .map(|row| row.category_id)
            .collect();
        let prior = PriorMonthState::load(self.repository, user, month)?;

        let mut report = MonthInitReport::default();
        for category in categories
            .iter()
            .filter(|category| !category.is_income() && !existing.contains(&category.id))
        {
            let row = MonthlyBudget::new(
                category.id,
                month,
                Money::ZERO,
                prior.start_balance_for(category),
            );
            match self.repository.insert_budget_row(user, &row) {
                Ok(()) => report.created += 1,
                Err(RepositoryError::Conflict(message)) => {
                    debug!(category = %category.id, reason = %message, "row created concurrently");
                }
                Err(err) => {
                    warn!(category = %category.id, month = %month, error = %err, "failed to initialize budget row");
                    report.failed.push((category.id, err.to_string()));
                }
            }
        }

        info!(
            user = %user,
            month = %month,
            created = report.created,
            failed = report.failed.len(),
            "initialized month"
        );
        Ok(report)
    }
}

/// Stores a user's assignment for a (category, month).
pub struct AssignmentService<'a> {
    repository: &'a dyn LedgerRepository,
}

impl<'a> AssignmentService<'a> {
    pub fn new(repository: &'a dyn LedgerRepository) -> Self {
        Self { repository }
    }

    /// Updates `assigned_amount` of an existing row, leaving its frozen
    /// `start_balance` untouched; otherwise creates the row with a start
    /// balance rolled over from the data present right now.
    pub fn assign_budget(
        &self,
        user: &UserId,
        category_id: Uuid,
        month: MonthId,
        amount: Money,
    ) -> CoreResult<MonthlyBudget> {
        let category = self
            .repository
            .get_category(user, category_id)?
            .ok_or_else(|| CoreError::NotFound(format!("category {category_id}")))?;
        if category.is_income() {
            return Err(CoreError::Validation(format!(
                "category `{}` is an income category and cannot be assigned",
                category.name
            )));
        }

        if self.repository.get_budget_row(user, category_id, month)?.is_some() {
            return self.update_assigned(user, &category, month, amount);
        }

        let prior = PriorMonthState::load(self.repository, user, month)?;
        let row = MonthlyBudget::new(category_id, month, amount, prior.start_balance_for(&category));
        match self.repository.insert_budget_row(user, &row) {
            Ok(()) => {
                info!(
                    user = %user,
                    category = %category_id,
                    month = %month,
                    assigned = %amount,
                    start_balance = %row.start_balance,
                    "created budget row"
                );
                Ok(row)
            }
            Err(RepositoryError::Conflict(message)) => {
                warn!(category = %category_id, month = %month, reason = %message, "lost row creation race, updating instead");
                self.update_assigned(user, &category, month, amount)
            }
            Err(err) => Err(err.into()),
        }
    }

    fn update_assigned(
        &self,
        user: &UserId,
        category: &Category,
        month: MonthId,
        amount: Money,
    ) -> CoreResult<MonthlyBudget> {
        let row = self.repository.upsert_budget_row(
            user,
            category.id,
            month,
            &BudgetRowFields::assigned(amount),
        )?;
        info!(
            user = %user,
            category = %category.id,
            month = %month,
            assigned = %amount,
            "updated budget assignment"
        );
        Ok(row)
    }
}
