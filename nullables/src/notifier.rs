//! Nullable notifier: records every notice for later inspection.

use cryptobook_ledger::{Notifier, TransferNotice};
use cryptobook_types::AccountName;
use std::sync::Mutex;

#[derive(Default)]
pub struct NullNotifier {
    delivered: Mutex<Vec<(AccountName, TransferNotice)>>,
}

impl NullNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// All (recipient, notice) pairs in delivery order.
    pub fn delivered(&self) -> Vec<(AccountName, TransferNotice)> {
        self.delivered.lock().unwrap().clone()
    }

    /// Recipients only, in delivery order.
    pub fn recipients(&self) -> Vec<AccountName> {
        self.delivered
            .lock()
            .unwrap()
            .iter()
            .map(|(recipient, _)| *recipient)
            .collect()
    }

    pub fn clear(&self) {
        self.delivered.lock().unwrap().clear();
    }
}

impl Notifier for NullNotifier {
    fn notify(&self, recipient: &AccountName, notice: &TransferNotice) {
        self.delivered
            .lock()
            .unwrap()
            .push((*recipient, notice.clone()));
    }
}
