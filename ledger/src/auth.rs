//! Authenticated signers of an operation.

use std::collections::BTreeSet;

use cryptobook_types::AccountName;

use crate::LedgerError;

/// The identities the host has already authenticated for this call.
///
/// The ledger never asks the environment who is calling; it only checks
/// whether a required identity is present here.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AuthContext {
    signers: BTreeSet<AccountName>,
}

impl AuthContext {
    pub fn new(signers: impl IntoIterator<Item = AccountName>) -> Self {
        Self {
            signers: signers.into_iter().collect(),
        }
    }

    pub fn single(signer: AccountName) -> Self {
        Self::new([signer])
    }

    pub fn has_auth(&self, account: &AccountName) -> bool {
        self.signers.contains(account)
    }

    pub fn require_auth(&self, account: &AccountName) -> Result<(), LedgerError> {
        if self.has_auth(account) {
            Ok(())
        } else {
            Err(LedgerError::Unauthorized(*account))
        }
    }

    pub fn signers(&self) -> impl Iterator<Item = &AccountName> {
        self.signers.iter()
    }
}
