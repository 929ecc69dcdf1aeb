//! Ledger snapshots: every row of every table at one point in time.
//!
//! The hash is Blake2b-256 over the bincode encoding of the three tables in
//! key order, so two stores with identical contents produce identical hashes
//! regardless of backend.

use cryptobook_store::{
    AccountBalance, AccountKey, CurrencyStats, LedgerStore, StakeRecord, StoreError,
};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerSnapshot {
    pub stats: Vec<CurrencyStats>,
    pub balances: Vec<(AccountKey, AccountBalance)>,
    pub stakes: Vec<(AccountKey, StakeRecord)>,
    pub hash: [u8; 32],
}

impl LedgerSnapshot {
    /// Read all three tables from `store`.
    pub fn capture<S: LedgerStore + ?Sized>(store: &S) -> Result<Self, StoreError> {
        let mut snap = Self {
            stats: store.iter_stats()?,
            balances: store.iter_balances()?,
            stakes: store.iter_stakes()?,
            hash: [0u8; 32],
        };
        snap.hash = snap.compute_hash()?;
        Ok(snap)
    }

    fn compute_hash(&self) -> Result<[u8; 32], StoreError> {
        use blake2::digest::consts::U32;
        use blake2::{Blake2b, Digest};

        let tables = bincode::serialize(&(&self.stats, &self.balances, &self.stakes))
            .map_err(|e| StoreError::Serialization(e.to_string()))?;
        let mut hasher = Blake2b::<U32>::new();
        hasher.update(&tables);
        let mut out = [0u8; 32];
        out.copy_from_slice(&hasher.finalize());
        Ok(out)
    }

    /// Recompute the hash and compare it with the stored one.
    pub fn verify(&self) -> bool {
        self.compute_hash().map(|h| h == self.hash).unwrap_or(false)
    }

    pub fn hash_hex(&self) -> String {
        hex::encode(self.hash)
    }

    /// Total number of rows across the three tables.
    pub fn row_count(&self) -> usize {
        self.stats.len() + self.balances.len() + self.stakes.len()
    }
}
