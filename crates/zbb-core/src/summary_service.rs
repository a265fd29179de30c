use std::collections::HashSet;

use tracing::debug;
use uuid::Uuid;
use zbb_domain::{BudgetSummary, CategoryKind, MonthId, Money, RolloverStrategy, UserId};

use crate::{BudgetLedger, CoreResult, LedgerRepository, MonthComputation};

/// Computes the month's "To Be Budgeted" figure and category totals.
pub struct SummaryAggregator<'a> {
    repository: &'a dyn LedgerRepository,
}

impl<'a> SummaryAggregator<'a> {
    pub fn new(repository: &'a dyn LedgerRepository) -> Self {
        Self { repository }
    }

    pub fn get_budget_summary(&self, user: &UserId, month: MonthId) -> CoreResult<BudgetSummary> {
        let computation = BudgetLedger::new(self.repository).compute(user, month)?;
        let summary = Self::summarize(&computation);
        debug!(
            user = %user,
            month = %month,
            to_be_budgeted = %summary.to_be_budgeted,
            "computed budget summary"
        );
        Ok(summary)
    }

    /// Pure aggregation over an already computed month.
    pub fn summarize(computation: &MonthComputation) -> BudgetSummary {
        let income_ids: HashSet<Uuid> = computation
            .categories
            .iter()
            .filter(|category| category.kind == CategoryKind::Income)
            .map(|category| category.id)
            .collect();
        let total_income: Money = computation
            .transactions
            .iter()
            .filter(|txn| txn.category_id.is_some_and(|id| income_ids.contains(&id)))
            .map(|txn| txn.amount.abs())
            .sum();

        // Only RESET categories pool their previous-month balance; ACCUMULATE
        // and SWEEP keep theirs inside the category.
        let leftover_from_reset: Money = computation
            .categories
            .iter()
            .filter(|category| {
                category.effective_strategy() == Some(RolloverStrategy::Reset)
            })
            .filter_map(|category| computation.prior.available(category.id))
            .sum();

        let total_assigned = computation.total_assigned();
        let mut total_activity = Money::ZERO;
        let mut total_available = Money::ZERO;
        let mut overspent = Money::ZERO;
        for view in computation.budget_views() {
            total_activity += view.activity;
            total_available += view.available;
            if view.is_overspent() {
                overspent += view.available.abs();
            }
        }

        BudgetSummary {
            month: computation.month,
            total_income,
            leftover_from_reset,
            total_assigned,
            total_activity,
            total_available,
            overspent,
            to_be_budgeted: total_income + leftover_from_reset - total_assigned,
        }
    }
}
