//! Per-category month views joined from categories, stored rows and activity.

use std::collections::HashMap;

use tracing::debug;
use uuid::Uuid;
use zbb_domain::{Category, MonthId, Money, MonthlyBudget, MonthlyBudgetView, Transaction, UserId};

use crate::{activity_by_category, CoreResult, LedgerRepository, PriorMonthState};

/// Everything loaded and derived for one month; recomputed on every call.
#[derive(Debug, Clone)]
pub struct MonthComputation {
    pub month: MonthId,
    pub categories: Vec<Category>,
    pub transactions: Vec<Transaction>,
    pub prior: PriorMonthState,
    pub views: Vec<MonthlyBudgetView>,
}

/// Read path for month views. Holds no state between calls.
pub struct BudgetLedger<'a> {
    repository: &'a dyn LedgerRepository,
}

impl<'a> BudgetLedger<'a> {
    pub fn new(repository: &'a dyn LedgerRepository) -> Self {
        Self { repository }
    }

    /// One view per active category, in sort order then name.
    pub fn get_month_view(&self, user: &UserId, month: MonthId) -> CoreResult<Vec<MonthlyBudgetView>> {
        Ok(self.compute(user, month)?.views)
    }

    /// Loads and computes the month, keeping intermediate inputs for
    /// aggregators that need them.
    pub fn compute(&self, user: &UserId, month: MonthId) -> CoreResult<MonthComputation> {
        let categories = self.repository.list_active_categories(user)?;
        let rows: HashMap<Uuid, MonthlyBudget> = self
            .repository
            .list_budget_rows(user, month)?
            .into_iter()
            .map(|row| (row.category_id, row))
            .collect();
        let transactions = self
            .repository
            .list_transactions(user, Some(month.range()), None)?;
        let prior = PriorMonthState::load(self.repository, user, month)?;
        let activity = activity_by_category(&transactions);

        let views = categories
            .iter()
            .map(|category| {
                MonthlyBudgetView::compute(
                    category,
                    month,
                    rows.get(&category.id),
                    prior.start_balance_for(category),
                    activity.get(&category.id).copied().unwrap_or_default(),
                )
            })
            .collect::<Vec<_>>();

        debug!(
            user = %user,
            month = %month,
            categories = categories.len(),
            stored_rows = rows.len(),
            "computed month view"
        );

        Ok(MonthComputation {
            month,
            categories,
            transactions,
            prior,
            views,
        })
    }
}

impl MonthComputation {
    /// Views of budgetable (non-income) categories.
    pub fn budget_views(&self) -> impl Iterator<Item = &MonthlyBudgetView> {
        self.views.iter().filter(|view| !view.is_income())
    }

    pub fn total_assigned(&self) -> Money {
        self.budget_views().map(|view| view.assigned_amount).sum()
    }
}
