//! Stable, public-facing helpers that wrap the internal service layer.
//!
//! Callers (CLI, HTTP handlers) pass raw strings: the caller identity,
//! `YYYY-MM` months, 2-decimal amounts and category ids. Everything is
//! validated here before the repository is touched. Money in the returned
//! records serializes as 2-decimal strings.

use std::collections::BTreeMap;

use uuid::Uuid;
use zbb_domain::{BudgetSummary, MonthId, Money, MonthlyBudget, MonthlyBudgetView, SafeToSpend, UserId};

use crate::{
    AssignmentService, BudgetLedger, Clock, CoreError, CoreResult, LedgerRepository,
    MonthInitializer, SafeToSpendCalculator, SuggestionEngine, SummaryAggregator,
};

/// Resolves the caller identity; a missing or blank identity is rejected.
pub fn authenticate(user: Option<&str>) -> CoreResult<UserId> {
    user.and_then(UserId::new).ok_or(CoreError::Unauthorized)
}

pub fn parse_month(raw: &str) -> CoreResult<MonthId> {
    Ok(MonthId::parse(raw)?)
}

pub fn parse_amount(raw: &str) -> CoreResult<Money> {
    Ok(Money::parse(raw)?)
}

pub fn parse_category_id(raw: &str) -> CoreResult<Uuid> {
    Uuid::parse_str(raw.trim())
        .map_err(|_| CoreError::Validation(format!("invalid category id `{}`", raw.trim())))
}

pub fn api_get_month_view(
    repository: &dyn LedgerRepository,
    user: Option<&str>,
    month: &str,
) -> CoreResult<Vec<MonthlyBudgetView>> {
    let user = authenticate(user)?;
    let month = parse_month(month)?;
    BudgetLedger::new(repository).get_month_view(&user, month)
}

pub fn api_get_budget_summary(
    repository: &dyn LedgerRepository,
    user: Option<&str>,
    month: &str,
) -> CoreResult<BudgetSummary> {
    let user = authenticate(user)?;
    let month = parse_month(month)?;
    SummaryAggregator::new(repository).get_budget_summary(&user, month)
}

/// Returns the number of rows created.
pub fn api_initialize_month(
    repository: &dyn LedgerRepository,
    user: Option<&str>,
    month: &str,
) -> CoreResult<usize> {
    let user = authenticate(user)?;
    let month = parse_month(month)?;
    Ok(MonthInitializer::new(repository)
        .initialize_month(&user, month)?
        .created)
}

pub fn api_assign_budget(
    repository: &dyn LedgerRepository,
    user: Option<&str>,
    category_id: &str,
    month: &str,
    amount: &str,
) -> CoreResult<MonthlyBudget> {
    let user = authenticate(user)?;
    let category_id = parse_category_id(category_id)?;
    let month = parse_month(month)?;
    let amount = parse_amount(amount)?;
    AssignmentService::new(repository).assign_budget(&user, category_id, month, amount)
}

pub fn api_get_suggested_amount(
    repository: &dyn LedgerRepository,
    user: Option<&str>,
    category_id: &str,
    month: &str,
) -> CoreResult<Option<Money>> {
    let user = authenticate(user)?;
    let category_id = parse_category_id(category_id)?;
    let month = parse_month(month)?;
    SuggestionEngine::new(repository).get_suggested_amount(&user, category_id, month)
}

pub fn api_get_all_suggested_amounts(
    repository: &dyn LedgerRepository,
    user: Option<&str>,
    month: &str,
) -> CoreResult<BTreeMap<Uuid, Money>> {
    let user = authenticate(user)?;
    let month = parse_month(month)?;
    SuggestionEngine::new(repository).get_all_suggested_amounts(&user, month)
}

pub fn api_get_safe_to_spend(
    repository: &dyn LedgerRepository,
    clock: &dyn Clock,
    user: Option<&str>,
) -> CoreResult<SafeToSpend> {
    let user = authenticate(user)?;
    SafeToSpendCalculator::new(repository, clock).get_safe_to_spend(&user)
}
