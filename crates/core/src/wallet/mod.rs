//! Wallet balances and the append-only ledger.
//!
//! This module implements the money side of the marketplace:
//! - Wallet and ledger-entry domain types
//! - The wallet account record (balance + entry log as one unit)
//! - The wallet service, sole writer of balances
//! - Error types for wallet operations

pub mod account;
pub mod error;
pub mod service;
pub mod types;

#[cfg(test)]
mod service_props;

pub use account::WalletAccount;
pub use error::WalletError;
pub use service::WalletService;
pub use types::{EntryKind, LedgerEntry, Owner, OwnerKind, Wallet};
