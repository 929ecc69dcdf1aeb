//! The cryptobook ledger state machine.
//!
//! Five operations mutate state: [`Ledger::create`], [`Ledger::issue`],
//! [`Ledger::transfer`], [`Ledger::stake`] and [`Ledger::unstake`]. Each one
//! takes an explicit [`AuthContext`], runs every check before staging any
//! write, and commits its staged writes to the store in a single batch. A
//! rejected operation leaves the store untouched.
//!
//! The host environment is reached only through [`AccountDirectory`] (does an
//! identity exist) and [`Notifier`] (tell counterparties about a transfer).

pub mod action;
pub mod auth;
pub mod error;
pub mod host;
pub mod ledger;
pub mod snapshot;

mod session;

pub use action::{Action, SignedAction};
pub use auth::AuthContext;
pub use error::LedgerError;
pub use host::{AccountDirectory, Notifier, TransferNotice};
pub use ledger::{Ledger, MAX_MEMO_BYTES};
pub use snapshot::LedgerSnapshot;
