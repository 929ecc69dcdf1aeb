//! Staged writes applied to a store in one atomic step.
//!
//! The ledger stages every mutation of an operation in a [`WriteBatch`] and
//! hands it to [`crate::LedgerStore::write`] only once all checks passed. If
//! the batch is dropped instead, nothing reaches the store.

use std::collections::BTreeMap;

use cryptobook_types::SymbolCode;

use crate::{AccountBalance, AccountKey, CurrencyStats, StakeRecord};

/// A staged row: either its new value or a deletion.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BatchEntry<T> {
    Put(T),
    Delete,
}

impl<T> BatchEntry<T> {
    pub fn as_put(&self) -> Option<&T> {
        match self {
            BatchEntry::Put(value) => Some(value),
            BatchEntry::Delete => None,
        }
    }
}

/// Pending writes to the three ledger tables.
///
/// Registry and balance rows are never deleted, so only stakes carry a
/// [`BatchEntry`]. Later writes to the same key replace earlier ones.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct WriteBatch {
    stats: BTreeMap<SymbolCode, CurrencyStats>,
    balances: BTreeMap<AccountKey, AccountBalance>,
    stakes: BTreeMap<AccountKey, BatchEntry<StakeRecord>>,
}

impl WriteBatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.stats.is_empty() && self.balances.is_empty() && self.stakes.is_empty()
    }

    /// Number of staged rows across all tables.
    pub fn len(&self) -> usize {
        self.stats.len() + self.balances.len() + self.stakes.len()
    }

    // ── Staging ─────────────────────────────────────────────────────────

    pub fn put_stats(&mut self, stats: CurrencyStats) {
        self.stats.insert(stats.code(), stats);
    }

    pub fn put_balance(&mut self, key: AccountKey, balance: AccountBalance) {
        self.balances.insert(key, balance);
    }

    pub fn put_stake(&mut self, key: AccountKey, record: StakeRecord) {
        self.stakes.insert(key, BatchEntry::Put(record));
    }

    pub fn delete_stake(&mut self, key: AccountKey) {
        self.stakes.insert(key, BatchEntry::Delete);
    }

    // ── Read-through lookups ────────────────────────────────────────────

    pub fn staged_stats(&self, code: &SymbolCode) -> Option<&CurrencyStats> {
        self.stats.get(code)
    }

    pub fn staged_balance(&self, key: &AccountKey) -> Option<&AccountBalance> {
        self.balances.get(key)
    }

    /// `None` when the key is untouched; `Some(Delete)` when it was removed.
    pub fn staged_stake(&self, key: &AccountKey) -> Option<&BatchEntry<StakeRecord>> {
        self.stakes.get(key)
    }

    // ── Iteration for backends ──────────────────────────────────────────

    pub fn stats(&self) -> impl Iterator<Item = &CurrencyStats> {
        self.stats.values()
    }

    pub fn balances(&self) -> impl Iterator<Item = (&AccountKey, &AccountBalance)> {
        self.balances.iter()
    }

    pub fn stakes(&self) -> impl Iterator<Item = (&AccountKey, &BatchEntry<StakeRecord>)> {
        self.stakes.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cryptobook_types::Asset;

    fn key(owner: &str) -> AccountKey {
        AccountKey::new(owner.parse().unwrap(), "CRW".parse().unwrap())
    }

    fn stake(amount: &str) -> StakeRecord {
        StakeRecord {
            locked_balance: amount.parse::<Asset>().unwrap(),
        }
    }

    #[test]
    fn later_writes_replace_earlier_ones() {
        let mut batch = WriteBatch::new();
        batch.put_stake(key("alice"), stake("1.0000 CRW"));
        batch.put_stake(key("alice"), stake("2.0000 CRW"));
        assert_eq!(batch.len(), 1);
        assert_eq!(
            batch.staged_stake(&key("alice")).and_then(BatchEntry::as_put),
            Some(&stake("2.0000 CRW"))
        );
    }

    #[test]
    fn delete_is_staged_not_dropped() {
        let mut batch = WriteBatch::new();
        batch.put_stake(key("alice"), stake("1.0000 CRW"));
        batch.delete_stake(key("alice"));
        assert!(!batch.is_empty());
        assert_eq!(batch.staged_stake(&key("alice")), Some(&BatchEntry::Delete));
        assert_eq!(batch.staged_stake(&key("bob")), None);
    }

    #[test]
    fn stats_are_keyed_by_code() {
        let mut batch = WriteBatch::new();
        let max: Asset = "100.0000 CRW".parse().unwrap();
        batch.put_stats(CurrencyStats {
            supply: Asset::zero(max.symbol),
            max_supply: max,
            issuer: "alice".parse().unwrap(),
        });
        assert!(batch.staged_stats(&"CRW".parse().unwrap()).is_some());
        assert_eq!(batch.stats().count(), 1);
    }
}
