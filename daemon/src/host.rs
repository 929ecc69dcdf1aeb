//! Host collaborators for the command-line ledger.

use std::collections::BTreeSet;

use cryptobook_ledger::{AccountDirectory, Notifier, TransferNotice};
use cryptobook_types::AccountName;

/// The configured account list plus the contract itself.
pub struct KnownAccounts {
    accounts: BTreeSet<AccountName>,
}

impl KnownAccounts {
    pub fn new(contract: AccountName, accounts: impl IntoIterator<Item = AccountName>) -> Self {
        let mut accounts: BTreeSet<AccountName> = accounts.into_iter().collect();
        accounts.insert(contract);
        Self { accounts }
    }

    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }
}

impl AccountDirectory for KnownAccounts {
    fn exists(&self, account: &AccountName) -> bool {
        self.accounts.contains(account)
    }
}

/// Emits one `tracing` event per notified party.
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, recipient: &AccountName, notice: &TransferNotice) {
        tracing::info!(
            recipient = %recipient,
            from = %notice.from,
            to = %notice.to,
            quantity = %notice.quantity,
            memo = %notice.memo,
            "transfer notice"
        );
    }
}
