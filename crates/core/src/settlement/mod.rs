//! Settlement of escrowed order funds.
//!
//! This module implements the payout side of the marketplace:
//! - Eligibility scan over completed, paid orders past the return window
//! - Per-order settlement with an atomic platform-to-seller transfer
//! - Batch driver with per-order failure boundaries and an overlap guard
//! - A periodic scheduler

pub mod error;
pub mod scheduler;
pub mod service;
pub mod types;

pub use error::SettlementError;
pub use scheduler::SettlementScheduler;
pub use service::SettlementService;
pub use types::{SettleOutcome, SettlementReport};
