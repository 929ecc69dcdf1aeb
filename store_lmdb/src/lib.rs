//! LMDB storage backend for the cryptobook ledger.
//!
//! Implements the storage traits from `cryptobook-store` using the `heed`
//! LMDB bindings. The three ledger tables live as named databases inside a
//! single environment, so one write transaction covers a whole batch.

pub mod environment;
pub mod error;
pub mod integrity;

mod codec;
mod tables;

pub use environment::LmdbEnvironment;
pub use error::LmdbError;
pub use integrity::{check_integrity, IntegrityReport};
