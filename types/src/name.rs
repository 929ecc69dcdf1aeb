//! Account identities packed into a `u64`.

use std::fmt;
use std::str::FromStr;

use crate::TypesError;

const CHARMAP: &[u8; 32] = b".12345abcdefghijklmnopqrstuvwxyz";

/// Maximum number of characters in a textual account name.
pub const MAX_NAME_LEN: usize = 12;

/// An account identity.
///
/// Up to 12 characters from `.12345a-z`, five bits each, packed from the most
/// significant end of a `u64`. Ordering follows the raw value, which matches
/// the big-endian key order used by the persistent store.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AccountName(u64);

impl AccountName {
    /// Wrap a raw packed value without validation.
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    pub const fn raw(&self) -> u64 {
        self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }
}

fn char_to_value(c: u8) -> Option<u64> {
    match c {
        b'a'..=b'z' => Some((c - b'a') as u64 + 6),
        b'1'..=b'5' => Some((c - b'1') as u64 + 1),
        b'.' => Some(0),
        _ => None,
    }
}

impl FromStr for AccountName {
    type Err = TypesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() || s.len() > MAX_NAME_LEN {
            return Err(TypesError::InvalidName(format!(
                "{s:?} must be 1 to {MAX_NAME_LEN} characters"
            )));
        }
        if s.ends_with('.') {
            return Err(TypesError::InvalidName(format!("{s:?} ends with '.'")));
        }
        let mut raw = 0u64;
        for (i, c) in s.bytes().enumerate() {
            let value = char_to_value(c).ok_or_else(|| {
                TypesError::InvalidName(format!("{s:?} contains {:?}", c as char))
            })?;
            raw |= value << (64 - 5 * (i + 1));
        }
        Ok(Self(raw))
    }
}

impl fmt::Display for AccountName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = [b'.'; 13];
        for (i, slot) in out.iter_mut().take(MAX_NAME_LEN).enumerate() {
            let index = (self.0 >> (64 - 5 * (i + 1))) & 0x1f;
            *slot = CHARMAP[index as usize];
        }
        out[12] = CHARMAP[(self.0 & 0x0f) as usize];
        let end = out.iter().rposition(|&c| c != b'.').map_or(0, |p| p + 1);
        // CHARMAP is pure ASCII.
        f.write_str(std::str::from_utf8(&out[..end]).unwrap_or_default())
    }
}

impl fmt::Debug for AccountName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AccountName({self})")
    }
}

impl_packed_serde!(AccountName);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_and_display_roundtrip() {
        for text in ["alice", "bob", "cryptobook", "eosio.token", "a", "zzzzzzzzzzzz", "12345"] {
            let name: AccountName = text.parse().unwrap();
            assert_eq!(name.to_string(), text);
        }
    }

    #[test]
    fn first_character_occupies_top_bits() {
        let name: AccountName = "a".parse().unwrap();
        assert_eq!(name.raw(), 6u64 << 59);
    }

    #[test]
    fn rejects_bad_names() {
        assert!("".parse::<AccountName>().is_err());
        assert!("Alice".parse::<AccountName>().is_err());
        assert!("alice6".parse::<AccountName>().is_err());
        assert!("thirteenchars".parse::<AccountName>().is_err());
        assert!("alice.".parse::<AccountName>().is_err());
    }

    #[test]
    fn order_follows_raw_value() {
        let a: AccountName = "alice".parse().unwrap();
        let b: AccountName = "bob".parse().unwrap();
        assert!(a < b);
        assert!(a.raw() < b.raw());
    }

    #[test]
    fn json_uses_text_and_bincode_uses_raw() {
        let name: AccountName = "carol".parse().unwrap();
        assert_eq!(serde_json::to_string(&name).unwrap(), "\"carol\"");
        let bytes = bincode::serialize(&name).unwrap();
        assert_eq!(bytes, name.raw().to_le_bytes());
        let back: AccountName = bincode::deserialize(&bytes).unwrap();
        assert_eq!(back, name);
    }
}
