//! Shared utilities for the cryptobook ledger.

pub mod logging;

pub use logging::{init_tracing, LogFormat};
