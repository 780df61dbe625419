//! A personal finance tracker.
//!
//! Transactions are recorded into a [`Ledger`], which keeps them newest first, computes balance,
//! income and expense totals on demand, and writes itself to an injected [`store::Store`] after
//! every change.

pub mod args;
mod backup;
pub mod commands;
mod config;
mod error;
mod ledger;
pub mod model;
pub mod store;
pub mod summary;
mod utils;

pub use backup::Backup;
pub use config::Config;
pub use error::{Error, Result};
pub use ledger::Ledger;
