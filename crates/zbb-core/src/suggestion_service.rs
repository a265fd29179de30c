//! Recommended monthly assignments for bills and sinking funds.

use std::collections::{BTreeMap, HashMap};

use tracing::debug;
use uuid::Uuid;
use zbb_domain::{Category, CategoryKind, MonthId, Money, UserId};

use crate::{CoreError, CoreResult, LedgerRepository};

pub struct SuggestionEngine<'a> {
    repository: &'a dyn LedgerRepository,
}

impl<'a> SuggestionEngine<'a> {
    pub fn new(repository: &'a dyn LedgerRepository) -> Self {
        Self { repository }
    }

    /// Deterministic suggestion for FIX and SF1 categories; `None` otherwise
    /// or when the target is missing or not positive.
    pub fn get_suggested_amount(
        &self,
        user: &UserId,
        category_id: Uuid,
        month: MonthId,
    ) -> CoreResult<Option<Money>> {
        let category = self
            .repository
            .get_category(user, category_id)?
            .ok_or_else(|| CoreError::NotFound(format!("category {category_id}")))?;
        self.deterministic(user, &category, month)
    }

    /// Suggestions for every active budgetable category that has one.
    ///
    /// VARIABLE and SF2 categories fall back to the previous month's
    /// assignment when it was positive.
    pub fn get_all_suggested_amounts(
        &self,
        user: &UserId,
        month: MonthId,
    ) -> CoreResult<BTreeMap<Uuid, Money>> {
        let categories = self.repository.list_active_categories(user)?;
        let previous_assigned: HashMap<Uuid, Money> = self
            .repository
            .list_budget_rows(user, month.previous())?
            .into_iter()
            .map(|row| (row.category_id, row.assigned_amount))
            .collect();

        let mut suggestions = BTreeMap::new();
        for category in categories.iter().filter(|category| !category.is_income()) {
            let suggestion = match category.kind {
                CategoryKind::Fix | CategoryKind::Sf1 => self.deterministic(user, category, month)?,
                CategoryKind::Variable | CategoryKind::Sf2 => previous_assigned
                    .get(&category.id)
                    .copied()
                    .filter(|amount| amount.is_positive()),
                CategoryKind::Income => None,
            };
            if let Some(amount) = suggestion {
                suggestions.insert(category.id, amount);
            }
        }
        debug!(user = %user, month = %month, count = suggestions.len(), "computed suggestions");
        Ok(suggestions)
    }

    fn deterministic(
        &self,
        user: &UserId,
        category: &Category,
        month: MonthId,
    ) -> CoreResult<Option<Money>> {
        match category.kind {
            CategoryKind::Fix => Ok(category.positive_target()),
            CategoryKind::Sf1 => self.sinking_fund_installment(user, category, month),
            CategoryKind::Variable | CategoryKind::Sf2 | CategoryKind::Income => Ok(None),
        }
    }

    /// `max(0, target - saved) / max(1, months until due)`, where `saved` is
    /// everything ever assigned minus everything ever spent, floored at zero.
    fn sinking_fund_installment(
        &self,
        user: &UserId,
        category: &Category,
        month: MonthId,
    ) -> CoreResult<Option<Money>> {
        let (Some(target), Some(due_date)) = (category.positive_target(), category.due_date) else {
            return Ok(None);
        };

        let total_assigned: Money = self
            .repository
            .list_budget_rows_for_category(user, category.id)?
            .iter()
            .map(|row| row.assigned_amount)
            .sum();
        let total_spent: Money = self
            .repository
            .list_transactions(user, None, Some(category.id))?
            .iter()
            .filter(|txn| txn.is_outflow())
            .map(|txn| -txn.amount)
            .sum();

        let saved = (total_assigned - total_spent).max(Money::ZERO);
        let remaining = (target - saved).max(Money::ZERO);
        let months_remaining = month.months_until(MonthId::containing(due_date)).max(1);

        remaining
            .div_round(i64::from(months_remaining))
            .map(Some)
            .ok_or_else(|| CoreError::Computation("months remaining must be positive".into()))
    }
}
