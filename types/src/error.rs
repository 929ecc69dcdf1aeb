//! Errors raised while parsing or combining ledger values.

use thiserror::Error;

use crate::symbol::Symbol;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TypesError {
    #[error("invalid account name: {0}")]
    InvalidName(String),

    #[error("invalid symbol: {0}")]
    InvalidSymbol(String),

    #[error("invalid asset: {0}")]
    InvalidAsset(String),

    #[error("magnitude of asset amount must be less than 2^62")]
    AmountOutOfRange,

    #[error("attempt to combine assets with different symbols: {left} and {right}")]
    SymbolMismatch { left: Symbol, right: Symbol },

    #[error("asset arithmetic overflow")]
    Overflow,
}
