//! Balance storage trait.

use crate::{AccountKey, StoreError};
use cryptobook_types::{AccountName, Asset};
use serde::{Deserialize, Serialize};

/// Spendable amount of one symbol held by one account.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountBalance {
    pub balance: Asset,
}

/// Read access to the balance table.
pub trait BalanceStore {
    fn get_balance(&self, key: &AccountKey) -> Result<Option<AccountBalance>, StoreError>;

    /// All balance rows in key order.
    fn iter_balances(&self) -> Result<Vec<(AccountKey, AccountBalance)>, StoreError>;

    /// Every balance row held by `owner`, in symbol-code order.
    fn iter_account_balances(
        &self,
        owner: &AccountName,
    ) -> Result<Vec<(AccountKey, AccountBalance)>, StoreError> {
        Ok(self
            .iter_balances()?
            .into_iter()
            .filter(|(key, _)| key.owner == *owner)
            .collect())
    }
}
