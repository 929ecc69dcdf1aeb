//! Token registry storage trait.

use crate::StoreError;
use cryptobook_types::{AccountName, Asset, SymbolCode};
use serde::{Deserialize, Serialize};

/// Per-symbol registry row: circulating supply, ceiling and issuing identity.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrencyStats {
    pub supply: Asset,
    pub max_supply: Asset,
    pub issuer: AccountName,
}

impl CurrencyStats {
    /// The primary key of this row.
    pub fn code(&self) -> SymbolCode {
        self.supply.code()
    }

    /// How much may still be issued before `max_supply` is reached.
    pub fn headroom(&self) -> i64 {
        self.max_supply.amount - self.supply.amount
    }
}

/// Read access to the registry table.
pub trait StatsStore {
    fn get_stats(&self, code: &SymbolCode) -> Result<Option<CurrencyStats>, StoreError>;

    /// All registry rows in symbol-code order.
    fn iter_stats(&self) -> Result<Vec<CurrencyStats>, StoreError>;

    fn stats_exists(&self, code: &SymbolCode) -> Result<bool, StoreError> {
        self.get_stats(code).map(|s| s.is_some())
    }
}
