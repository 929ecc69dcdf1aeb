use cryptobook_store::StoreError;
use cryptobook_types::{AccountName, Asset, SymbolCode, TypesError};
use thiserror::Error;

use crate::ledger::MAX_MEMO_BYTES;

/// Why an operation was rejected. Every variant means nothing was written.
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("invalid symbol: {0}")]
    InvalidSymbol(String),

    #[error("invalid quantity: {0}")]
    InvalidQuantity(String),

    #[error("token with symbol {0} already exists")]
    AlreadyExists(SymbolCode),

    #[error("{0} not found")]
    NotFound(String),

    #[error("missing required authority of {0}")]
    Unauthorized(AccountName),

    #[error("quantity {requested} exceeds available supply {available}")]
    SupplyExceeded { requested: Asset, available: Asset },

    #[error("overdrawn balance: need {needed}, have {available}")]
    Overdrawn { needed: Asset, available: Asset },

    #[error("cannot transfer to self")]
    SelfTransfer,

    #[error("memo has {0} bytes, limit is {MAX_MEMO_BYTES}")]
    MemoTooLong(usize),

    #[error("storage error: {0}")]
    Storage(#[from] StoreError),
}

impl From<TypesError> for LedgerError {
    fn from(e: TypesError) -> Self {
        match e {
            TypesError::InvalidSymbol(reason) => LedgerError::InvalidSymbol(reason),
            other => LedgerError::InvalidQuantity(other.to_string()),
        }
    }
}
