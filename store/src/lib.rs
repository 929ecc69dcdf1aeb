//! Abstract storage traits for the cryptobook ledger.
//!
//! Every storage backend (LMDB, in-memory for testing) implements these
//! traits. The ledger depends only on the traits.
//!
//! Three logical tables exist:
//! - stats, keyed by symbol code
//! - balances, keyed by (owner, symbol code)
//! - stakes, keyed by (owner, symbol code)
//!
//! Reads go through the per-table traits. Writes only ever happen through
//! [`LedgerStore::write`], which applies a whole [`WriteBatch`] or nothing.

pub mod balance;
pub mod batch;
pub mod error;
pub mod key;
pub mod stake;
pub mod stats;

pub use balance::{AccountBalance, BalanceStore};
pub use batch::{BatchEntry, WriteBatch};
pub use error::StoreError;
pub use key::AccountKey;
pub use stake::{StakeRecord, StakeStore};
pub use stats::{CurrencyStats, StatsStore};

/// A complete ledger backend: all three tables plus atomic batch writes.
pub trait LedgerStore: StatsStore + BalanceStore + StakeStore {
    /// Apply every entry of `batch` in one atomic step.
    ///
    /// Either all entries become visible or, on error, none do.
    fn write(&self, batch: WriteBatch) -> Result<(), StoreError>;
}
