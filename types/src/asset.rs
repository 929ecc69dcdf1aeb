//! Quantities of a token: signed magnitude plus symbol.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::symbol::{Symbol, SymbolCode, MAX_PRECISION};
use crate::TypesError;

/// Largest magnitude an asset amount may hold: `2^62 - 1`.
///
/// Keeping magnitudes below `2^62` means the sum of two in-range amounts can
/// never overflow an `i64`.
pub const MAX_AMOUNT: i64 = (1 << 62) - 1;

/// A token quantity, e.g. `10000.0000 CRW`.
///
/// `amount` is expressed in the smallest unit of the symbol's precision.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Asset {
    pub amount: i64,
    pub symbol: Symbol,
}

impl Asset {
    pub const fn new(amount: i64, symbol: Symbol) -> Self {
        Self { amount, symbol }
    }

    pub const fn zero(symbol: Symbol) -> Self {
        Self { amount: 0, symbol }
    }

    pub fn is_amount_within_range(&self) -> bool {
        (-MAX_AMOUNT..=MAX_AMOUNT).contains(&self.amount)
    }

    /// In range and carrying a well-formed symbol.
    pub fn is_valid(&self) -> bool {
        self.is_amount_within_range() && self.symbol.is_valid()
    }

    pub fn is_positive(&self) -> bool {
        self.amount > 0
    }

    pub fn code(&self) -> SymbolCode {
        self.symbol.code()
    }

    fn ensure_same_symbol(&self, other: &Asset) -> Result<(), TypesError> {
        if self.symbol != other.symbol {
            return Err(TypesError::SymbolMismatch {
                left: self.symbol,
                right: other.symbol,
            });
        }
        Ok(())
    }

    pub fn checked_add(&self, other: &Asset) -> Result<Asset, TypesError> {
        self.ensure_same_symbol(other)?;
        let amount = self
            .amount
            .checked_add(other.amount)
            .filter(|a| (-MAX_AMOUNT..=MAX_AMOUNT).contains(a))
            .ok_or(TypesError::Overflow)?;
        Ok(Asset::new(amount, self.symbol))
    }

    pub fn checked_sub(&self, other: &Asset) -> Result<Asset, TypesError> {
        self.ensure_same_symbol(other)?;
        let amount = self
            .amount
            .checked_sub(other.amount)
            .filter(|a| (-MAX_AMOUNT..=MAX_AMOUNT).contains(a))
            .ok_or(TypesError::Overflow)?;
        Ok(Asset::new(amount, self.symbol))
    }
}

/// Assets are ordered only against assets of the same symbol.
impl PartialOrd for Asset {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        if self.symbol != other.symbol {
            return None;
        }
        Some(self.amount.cmp(&other.amount))
    }
}

impl FromStr for Asset {
    type Err = TypesError;

    /// Parses `"<amount> <CODE>"`. The precision is the number of digits after
    /// the decimal point: `"1.50 CRW"` has precision 2 and amount 150.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (number, code) = s
            .split_once(' ')
            .ok_or_else(|| TypesError::InvalidAsset(format!("{s:?} is not <amount> <CODE>")))?;
        let code: SymbolCode = code.trim().parse()?;

        let (negative, digits) = match number.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, number),
        };
        let (whole, fraction) = digits.split_once('.').unwrap_or((digits, ""));
        if whole.is_empty() || !whole.bytes().chain(fraction.bytes()).all(|b| b.is_ascii_digit()) {
            return Err(TypesError::InvalidAsset(format!("bad amount {number:?}")));
        }
        if fraction.len() > MAX_PRECISION as usize {
            return Err(TypesError::InvalidSymbol(format!(
                "precision {} exceeds {MAX_PRECISION}",
                fraction.len()
            )));
        }

        let mut amount: i64 = 0;
        for b in whole.bytes().chain(fraction.bytes()) {
            amount = amount
                .checked_mul(10)
                .and_then(|a| a.checked_add((b - b'0') as i64))
                .ok_or(TypesError::AmountOutOfRange)?;
        }
        if amount > MAX_AMOUNT {
            return Err(TypesError::AmountOutOfRange);
        }
        if negative {
            amount = -amount;
        }
        Ok(Asset::new(amount, Symbol::new(fraction.len() as u8, code)))
    }
}

impl fmt::Display for Asset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.amount < 0 { "-" } else { "" };
        let precision = self.symbol.precision() as usize;
        let digits = self.amount.unsigned_abs().to_string();
        if precision == 0 {
            return write!(f, "{sign}{digits} {}", self.symbol.code());
        }
        let padded = format!("{digits:0>width$}", width = precision + 1);
        let (whole, fraction) = padded.split_at(padded.len() - precision);
        write!(f, "{sign}{whole}.{fraction} {}", self.symbol.code())
    }
}

impl fmt::Debug for Asset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Asset({self})")
    }
}

impl Serialize for Asset {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if serializer.is_human_readable() {
            serializer.collect_str(self)
        } else {
            (self.amount, self.symbol).serialize(serializer)
        }
    }
}

impl<'de> Deserialize<'de> for Asset {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        if deserializer.is_human_readable() {
            let text = String::deserialize(deserializer)?;
            text.parse().map_err(serde::de::Error::custom)
        } else {
            let (amount, symbol) = <(i64, Symbol)>::deserialize(deserializer)?;
            Ok(Asset::new(amount, symbol))
        }
    }
}
