//! Stake storage trait.

use crate::{AccountKey, StoreError};
use cryptobook_types::Asset;
use serde::{Deserialize, Serialize};

/// Locked portion of an account's balance for one symbol.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StakeRecord {
    pub locked_balance: Asset,
}

/// Read access to the stake table.
pub trait StakeStore {
    fn get_stake(&self, key: &AccountKey) -> Result<Option<StakeRecord>, StoreError>;

    /// All stake rows in key order.
    fn iter_stakes(&self) -> Result<Vec<(AccountKey, StakeRecord)>, StoreError>;
}
