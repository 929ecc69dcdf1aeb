//! Fundamental types for the cryptobook ledger.
//!
//! This crate defines the value types shared across every other crate in the
//! workspace: account names, symbol codes, symbols and assets. All of them are
//! packed integers underneath, so keys and records stay cheap to copy and
//! compare.

#[macro_use]
mod codec;

pub mod asset;
pub mod error;
pub mod name;
pub mod symbol;

pub use asset::{Asset, MAX_AMOUNT};
pub use error::TypesError;
pub use name::AccountName;
pub use symbol::{Symbol, SymbolCode, MAX_PRECISION};
