//! Collaborators supplied by the hosting environment.

use cryptobook_types::{AccountName, Asset};
use serde::{Deserialize, Serialize};

/// Answers whether an identity exists in the environment.
pub trait AccountDirectory {
    fn exists(&self, account: &AccountName) -> bool;
}

/// The event both parties of a transfer are told about.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferNotice {
    pub from: AccountName,
    pub to: AccountName,
    pub quantity: Asset,
    pub memo: String,
}

/// Delivers transfer notices to counterparties for external indexing.
pub trait Notifier {
    fn notify(&self, recipient: &AccountName, notice: &TransferNotice);
}

impl<T: AccountDirectory + ?Sized> AccountDirectory for &T {
    fn exists(&self, account: &AccountName) -> bool {
        (**self).exists(account)
    }
}

impl<T: Notifier + ?Sized> Notifier for &T {
    fn notify(&self, recipient: &AccountName, notice: &TransferNotice) {
        (**self).notify(recipient, notice)
    }
}
