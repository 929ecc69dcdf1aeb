//! Key and value encodings for the LMDB tables.
//!
//! Keys are big-endian raw integers so LMDB's byte order equals the ledger's
//! key order. Values are bincode-encoded records.

use serde::de::DeserializeOwned;
use serde::Serialize;

use cryptobook_store::AccountKey;
use cryptobook_types::SymbolCode;

use crate::LmdbError;

pub(crate) fn stats_key(code: &SymbolCode) -> [u8; 8] {
    code.raw().to_be_bytes()
}

pub(crate) fn decode_stats_key(bytes: &[u8]) -> Result<SymbolCode, LmdbError> {
    let raw: [u8; 8] = bytes.try_into().map_err(|_| LmdbError::MalformedKey {
        table: "stats",
        len: bytes.len(),
    })?;
    Ok(SymbolCode::from_raw(u64::from_be_bytes(raw)))
}

pub(crate) fn decode_account_key(
    table: &'static str,
    bytes: &[u8],
) -> Result<AccountKey, LmdbError> {
    AccountKey::from_bytes(bytes).ok_or(LmdbError::MalformedKey {
        table,
        len: bytes.len(),
    })
}

pub(crate) fn encode<T: Serialize>(value: &T) -> Result<Vec<u8>, LmdbError> {
    Ok(bincode::serialize(value)?)
}

pub(crate) fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, LmdbError> {
    Ok(bincode::deserialize(bytes)?)
}
