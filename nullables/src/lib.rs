//! Nullable infrastructure for deterministic testing.
//!
//! Everything the ledger reaches outside itself (storage, the identity
//! directory, the notification channel) sits behind a trait. This crate
//! provides test-friendly implementations that:
//! - Keep all state in memory
//! - Can be inspected and controlled programmatically
//! - Never touch the filesystem
//!
//! Usage: swap real implementations for nullables in tests.

pub mod directory;
pub mod notifier;
pub mod store;

pub use directory::NullDirectory;
pub use notifier::NullNotifier;
pub use store::NullStore;
