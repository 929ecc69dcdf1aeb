//! Nullable store: thread-safe in-memory ledger tables for testing.

use cryptobook_store::{
    AccountBalance, AccountKey, BalanceStore, BatchEntry, CurrencyStats, LedgerStore, StakeRecord,
    StakeStore, StatsStore, StoreError, WriteBatch,
};
use cryptobook_types::SymbolCode;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard};

#[derive(Default)]
struct Tables {
    stats: BTreeMap<SymbolCode, CurrencyStats>,
    balances: BTreeMap<AccountKey, AccountBalance>,
    stakes: BTreeMap<AccountKey, StakeRecord>,
}

/// All three tables behind one mutex, so a batch lands in one step.
#[derive(Default)]
pub struct NullStore {
    tables: Mutex<Tables>,
    fail_writes: AtomicBool,
}

impl NullStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every following `write` fail with a backend error, without
    /// applying anything.
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    fn tables(&self) -> Result<MutexGuard<'_, Tables>, StoreError> {
        self.tables
            .lock()
            .map_err(|e| StoreError::Backend(format!("poisoned store lock: {e}")))
    }
}

impl StatsStore for NullStore {
    fn get_stats(&self, code: &SymbolCode) -> Result<Option<CurrencyStats>, StoreError> {
        Ok(self.tables()?.stats.get(code).cloned())
    }

    fn iter_stats(&self) -> Result<Vec<CurrencyStats>, StoreError> {
        Ok(self.tables()?.stats.values().cloned().collect())
    }
}

impl BalanceStore for NullStore {
    fn get_balance(&self, key: &AccountKey) -> Result<Option<AccountBalance>, StoreError> {
        Ok(self.tables()?.balances.get(key).cloned())
    }

    fn iter_balances(&self) -> Result<Vec<(AccountKey, AccountBalance)>, StoreError> {
        Ok(self
            .tables()?
            .balances
            .iter()
            .map(|(k, v)| (*k, v.clone()))
            .collect())
    }
}

impl StakeStore for NullStore {
    fn get_stake(&self, key: &AccountKey) -> Result<Option<StakeRecord>, StoreError> {
        Ok(self.tables()?.stakes.get(key).cloned())
    }

    fn iter_stakes(&self) -> Result<Vec<(AccountKey, StakeRecord)>, StoreError> {
        Ok(self
            .tables()?
            .stakes
            .iter()
            .map(|(k, v)| (*k, v.clone()))
            .collect())
    }
}

impl LedgerStore for NullStore {
    fn write(&self, batch: WriteBatch) -> Result<(), StoreError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StoreError::Backend("write failure injected".into()));
        }
        let mut tables = self.tables()?;
        for stats in batch.stats() {
            tables.stats.insert(stats.code(), stats.clone());
        }
        for (key, balance) in batch.balances() {
            tables.balances.insert(*key, balance.clone());
        }
        for (key, entry) in batch.stakes() {
            match entry {
                BatchEntry::Put(record) => {
                    tables.stakes.insert(*key, record.clone());
                }
                BatchEntry::Delete => {
                    tables.stakes.remove(key);
                }
            }
        }
        Ok(())
    }
}
