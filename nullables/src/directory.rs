//! Nullable account directory: a fixed set of known identities.

use cryptobook_ledger::AccountDirectory;
use cryptobook_types::AccountName;
use std::collections::HashSet;
use std::sync::Mutex;

#[derive(Default)]
pub struct NullDirectory {
    accounts: Mutex<HashSet<AccountName>>,
}

impl NullDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a directory from textual names.
    ///
    /// # Panics
    /// Panics if a name is malformed.
    pub fn with_accounts(names: &[&str]) -> Self {
        let dir = Self::new();
        for name in names {
            dir.add(name.parse().expect("valid account name"));
        }
        dir
    }

    pub fn add(&self, account: AccountName) {
        self.accounts.lock().unwrap().insert(account);
    }

    pub fn remove(&self, account: &AccountName) {
        self.accounts.lock().unwrap().remove(account);
    }
}

impl AccountDirectory for NullDirectory {
    fn exists(&self, account: &AccountName) -> bool {
        self.accounts.lock().unwrap().contains(account)
    }
}
