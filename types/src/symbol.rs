//! Symbol codes and symbols (code + decimal precision).

use std::fmt;
use std::str::FromStr;

use crate::TypesError;

/// Largest decimal precision a symbol may carry.
pub const MAX_PRECISION: u8 = 18;

/// Maximum number of characters in a symbol code.
pub const MAX_CODE_LEN: usize = 7;

/// A token class identifier such as `CRW`.
///
/// 1 to 7 uppercase ASCII letters packed little-endian: the first character
/// sits in the lowest byte.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SymbolCode(u64);

impl SymbolCode {
    /// Wrap a raw packed value without validation.
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    pub const fn raw(&self) -> u64 {
        self.0
    }

    /// Number of characters before the first empty byte.
    pub fn len(&self) -> usize {
        self.0.to_le_bytes().iter().take_while(|&&b| b != 0).count()
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// True when every character is `A-Z`, there are 1 to 7 of them, and no
    /// character follows an empty byte.
    pub fn is_valid(&self) -> bool {
        if self.0 == 0 || self.0 >> 56 != 0 {
            return false;
        }
        let mut ended = false;
        for b in self.0.to_le_bytes() {
            if ended {
                if b != 0 {
                    return false;
                }
            } else if b == 0 {
                ended = true;
            } else if !b.is_ascii_uppercase() {
                return false;
            }
        }
        true
    }
}

impl FromStr for SymbolCode {
    type Err = TypesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() || s.len() > MAX_CODE_LEN {
            return Err(TypesError::InvalidSymbol(format!(
                "code {s:?} must be 1 to {MAX_CODE_LEN} characters"
            )));
        }
        let mut raw = 0u64;
        for (i, b) in s.bytes().enumerate() {
            if !b.is_ascii_uppercase() {
                return Err(TypesError::InvalidSymbol(format!(
                    "code {s:?} must be uppercase A-Z"
                )));
            }
            raw |= (b as u64) << (8 * i);
        }
        Ok(Self(raw))
    }
}

impl fmt::Display for SymbolCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for b in self.0.to_le_bytes().iter().take_while(|&&b| b != 0) {
            write!(f, "{}", *b as char)?;
        }
        Ok(())
    }
}

impl fmt::Debug for SymbolCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SymbolCode({self})")
    }
}

impl_packed_serde!(SymbolCode);

/// A symbol code together with its decimal precision, e.g. `4,CRW`.
///
/// Precision lives in the low byte, the code in the upper 56 bits.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Symbol(u64);

impl Symbol {
    pub const fn new(precision: u8, code: SymbolCode) -> Self {
        Self((code.raw() << 8) | precision as u64)
    }

    /// Wrap a raw packed value without validation.
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    pub const fn raw(&self) -> u64 {
        self.0
    }

    pub const fn precision(&self) -> u8 {
        (self.0 & 0xff) as u8
    }

    pub const fn code(&self) -> SymbolCode {
        SymbolCode(self.0 >> 8)
    }

    pub fn is_valid(&self) -> bool {
        self.precision() <= MAX_PRECISION && self.code().is_valid()
    }
}

impl FromStr for Symbol {
    type Err = TypesError;

    /// Parses `"<precision>,<CODE>"`; whitespace around either part is ignored.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (precision, code) = s
            .split_once(',')
            .ok_or_else(|| TypesError::InvalidSymbol(format!("{s:?} is not <precision>,<CODE>")))?;
        let precision: u8 = precision
            .trim()
            .parse()
            .map_err(|_| TypesError::InvalidSymbol(format!("bad precision in {s:?}")))?;
        if precision > MAX_PRECISION {
            return Err(TypesError::InvalidSymbol(format!(
                "precision {precision} exceeds {MAX_PRECISION}"
            )));
        }
        Ok(Self::new(precision, code.trim().parse()?))
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.precision(), self.code())
    }
}

impl fmt::Debug for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Symbol({self})")
    }
}

impl_packed_serde!(Symbol);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn code_packs_little_endian() {
        let code: SymbolCode = "CRW".parse().unwrap();
        assert_eq!(code.raw(), b'C' as u64 | (b'R' as u64) << 8 | (b'W' as u64) << 16);
        assert_eq!(code.len(), 3);
        assert_eq!(code.to_string(), "CRW");
        assert!(code.is_valid());
    }

    #[test]
    fn code_rejects_lowercase_and_long() {
        assert!("crw".parse::<SymbolCode>().is_err());
        assert!("ABCDEFGH".parse::<SymbolCode>().is_err());
        assert!("".parse::<SymbolCode>().is_err());
        assert!("C1".parse::<SymbolCode>().is_err());
    }

    #[test]
    fn raw_code_validity() {
        assert!(!SymbolCode::from_raw(0).is_valid());
        // "C" then a gap then "W"
        assert!(!SymbolCode::from_raw(b'C' as u64 | (b'W' as u64) << 16).is_valid());
        assert!(!SymbolCode::from_raw(b'c' as u64).is_valid());
        assert!(SymbolCode::from_raw(b'Z' as u64).is_valid());
    }

    #[test]
    fn symbol_parse_and_display() {
        let sym: Symbol = "4,CRW".parse().unwrap();
        assert_eq!(sym.precision(), 4);
        assert_eq!(sym.code().to_string(), "CRW");
        assert_eq!(sym.to_string(), "4,CRW");
        assert_eq!("4, CRW".parse::<Symbol>().unwrap(), sym);
        assert!(sym.is_valid());
    }

    #[test]
    fn symbol_precision_limit() {
        assert!("18,CRW".parse::<Symbol>().is_ok());
        assert!("19,CRW".parse::<Symbol>().is_err());
        let code: SymbolCode = "CRW".parse().unwrap();
        assert!(!Symbol::new(19, code).is_valid());
    }

    #[test]
    fn symbols_with_different_precision_differ() {
        let a: Symbol = "4,CRW".parse().unwrap();
        let b: Symbol = "2,CRW".parse().unwrap();
        assert_ne!(a, b);
        assert_eq!(a.code(), b.code());
    }
}
