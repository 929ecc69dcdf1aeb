//! Read-through view over a store plus the writes staged so far.

use cryptobook_store::{
    AccountBalance, AccountKey, BatchEntry, CurrencyStats, LedgerStore, StakeRecord, StoreError,
    WriteBatch,
};
use cryptobook_types::SymbolCode;

/// One atomic unit of work. Reads see staged writes first, then the store.
/// Nothing reaches the store until the batch is taken and written.
pub(crate) struct Session<'a, S: ?Sized> {
    store: &'a S,
    batch: WriteBatch,
}

impl<'a, S: LedgerStore + ?Sized> Session<'a, S> {
    pub(crate) fn new(store: &'a S) -> Self {
        Self {
            store,
            batch: WriteBatch::new(),
        }
    }

    pub(crate) fn stats(&self, code: &SymbolCode) -> Result<Option<CurrencyStats>, StoreError> {
        match self.batch.staged_stats(code) {
            Some(stats) => Ok(Some(stats.clone())),
            None => self.store.get_stats(code),
        }
    }

    pub(crate) fn balance(&self, key: &AccountKey) -> Result<Option<AccountBalance>, StoreError> {
        match self.batch.staged_balance(key) {
            Some(balance) => Ok(Some(balance.clone())),
            None => self.store.get_balance(key),
        }
    }

    pub(crate) fn stake(&self, key: &AccountKey) -> Result<Option<StakeRecord>, StoreError> {
        match self.batch.staged_stake(key) {
            Some(BatchEntry::Put(record)) => Ok(Some(record.clone())),
            Some(BatchEntry::Delete) => Ok(None),
            None => self.store.get_stake(key),
        }
    }

    pub(crate) fn put_stats(&mut self, stats: CurrencyStats) {
        self.batch.put_stats(stats);
    }

    pub(crate) fn put_balance(&mut self, key: AccountKey, balance: AccountBalance) {
        self.batch.put_balance(key, balance);
    }

    pub(crate) fn put_stake(&mut self, key: AccountKey, record: StakeRecord) {
        self.batch.put_stake(key, record);
    }

    pub(crate) fn delete_stake(&mut self, key: AccountKey) {
        self.batch.delete_stake(key);
    }

    pub(crate) fn into_batch(self) -> WriteBatch {
        self.batch
    }
}
