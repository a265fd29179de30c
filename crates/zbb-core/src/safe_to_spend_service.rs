use std::collections::{HashMap, HashSet};

use tracing::debug;
use uuid::Uuid;
use zbb_domain::{CategoryKind, MonthId, Money, SafeToSpend, UserId};

use crate::{Clock, CoreResult, LedgerRepository, SuggestionEngine};

/// Disposable liquidity after reserving unpaid bills and sinking-fund
/// contributions. Recomputed fully on every call.
pub struct SafeToSpendCalculator<'a> {
    repository: &'a dyn LedgerRepository,
    clock: &'a dyn Clock,
}

impl<'a> SafeToSpendCalculator<'a> {
    pub fn new(repository: &'a dyn LedgerRepository, clock: &'a dyn Clock) -> Self {
        Self { repository, clock }
    }

    pub fn get_safe_to_spend(&self, user: &UserId) -> CoreResult<SafeToSpend> {
        let month = MonthId::containing(self.clock.today());

        let total_liquid = self.total_liquid(user)?;

        let categories = self.repository.list_active_categories(user)?;
        let paid: HashSet<Uuid> = self
            .repository
            .list_transactions(user, Some(month.range()), None)?
            .into_iter()
            .filter_map(|txn| txn.category_id)
            .collect();
        let pending_bills: Money = categories
            .iter()
            .filter(|category| category.kind == CategoryKind::Fix && !paid.contains(&category.id))
            .filter_map(|category| category.positive_target())
            .sum();

        let contributions = SuggestionEngine::new(self.repository).get_all_suggested_amounts(user, month)?;
        let sinking_contributions: Money = categories
            .iter()
            .filter(|category| category.kind.is_sinking_fund())
            .filter_map(|category| contributions.get(&category.id))
            .sum();

        let result = SafeToSpend::from_parts(total_liquid, pending_bills, sinking_contributions);
        debug!(
            user = %user,
            month = %month,
            safe_to_spend = %result.safe_to_spend,
            "computed safe to spend"
        );
        Ok(result)
    }

    /// Sum over accounts of `initial_balance + Σ account transactions`.
    fn total_liquid(&self, user: &UserId) -> CoreResult<Money> {
        let accounts = self.repository.list_accounts(user)?;
        let mut movements: HashMap<Uuid, Money> = HashMap::new();
        for txn in self.repository.list_transactions(user, None, None)? {
            if let Some(account_id) = txn.account_id {
                *movements.entry(account_id).or_default() += txn.amount;
            }
        }
        Ok(accounts
            .iter()
            .map(|account| {
                account.initial_balance + movements.get(&account.id).copied().unwrap_or_default()
            })
            .sum())
    }
}
