//! ledger-core
//!
//! A double-entry ledger over PostgreSQL. Accounts carry non-negative
//! integer balances in minor currency units; a transfer atomically debits
//! one account, credits another, and appends an immutable transaction
//! record — all in a single unit of work. Concurrent transfers over the
//! same accounts are serialized by row-level locking reads acquired in a
//! fixed order.
//!
//! The library is invoked in-process; the binaries under `src/bin` (account
//! seeding, random workload) are thin external callers of [`Ledger`].

pub mod accounts;
pub mod amount;
pub mod engine;
pub mod journal;
pub mod ledger;
pub mod store;

// Private modules re-exported at the crate root
mod config;
mod error;

pub use accounts::{AccountId, AccountRepository};
pub use amount::{Amount, AmountError};
pub use config::{Config, ConfigError};
pub use engine::TransferEngine;
pub use error::{LedgerError, LedgerResult};
pub use journal::{TransactionId, TransferJournal, TransferRecord};
pub use ledger::Ledger;
pub use store::{Params, StatementObserver, Store, TracingObserver, UnitOfWork};
