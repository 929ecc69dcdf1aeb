//! Composite key for per-account tables.

use cryptobook_types::{AccountName, SymbolCode};
use serde::{Deserialize, Serialize};
use std::fmt;

/// (owner, symbol code), the primary key of the balance and stake tables.
///
/// Orders by owner first, then code, which is also the byte order of
/// [`AccountKey::to_bytes`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct AccountKey {
    pub owner: AccountName,
    pub code: SymbolCode,
}

impl AccountKey {
    pub const LEN: usize = 16;

    pub fn new(owner: AccountName, code: SymbolCode) -> Self {
        Self { owner, code }
    }

    /// Big-endian owner followed by big-endian code.
    pub fn to_bytes(&self) -> [u8; Self::LEN] {
        let mut out = [0u8; Self::LEN];
        out[..8].copy_from_slice(&self.owner.raw().to_be_bytes());
        out[8..].copy_from_slice(&self.code.raw().to_be_bytes());
        out
    }

    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        let owner: [u8; 8] = bytes.get(..8)?.try_into().ok()?;
        let code: [u8; 8] = bytes.get(8..Self::LEN)?.try_into().ok()?;
        if bytes.len() != Self::LEN {
            return None;
        }
        Some(Self {
            owner: AccountName::from_raw(u64::from_be_bytes(owner)),
            code: SymbolCode::from_raw(u64::from_be_bytes(code)),
        })
    }
}

impl fmt::Display for AccountKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn byte_order_matches_key_order() {
        let alice: AccountName = "alice".parse().unwrap();
        let bob: AccountName = "bob".parse().unwrap();
        let crw: SymbolCode = "CRW".parse().unwrap();
        let abc: SymbolCode = "ABC".parse().unwrap();

        let mut keys = vec![
            AccountKey::new(bob, abc),
            AccountKey::new(alice, crw),
            AccountKey::new(alice, abc),
        ];
        let mut by_bytes = keys.clone();
        keys.sort();
        by_bytes.sort_by_key(|k| k.to_bytes());
        assert_eq!(keys, by_bytes);
    }

    #[test]
    fn bytes_roundtrip_and_reject_wrong_length() {
        let key = AccountKey::new("alice".parse().unwrap(), "CRW".parse().unwrap());
        assert_eq!(AccountKey::from_bytes(&key.to_bytes()), Some(key));
        assert_eq!(AccountKey::from_bytes(&key.to_bytes()[..15]), None);
        assert_eq!(AccountKey::from_bytes(&[0u8; 17]), None);
    }
}
