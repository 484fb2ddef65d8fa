//! Core business logic for Vendra.
//!
//! This crate contains the financial core of the marketplace with ZERO web
//! dependencies. All domain types, balance-mutation rules, and workflow
//! logic live here.
//!
//! # Modules
//!
//! - `wallet` - Wallet balances and the append-only ledger
//! - `refund` - Refund and return workflow
//! - `settlement` - Escrow release to sellers, batched and scheduled
//! - `ports` - Boundary contracts to the rest of the marketplace

pub mod ports;
pub mod refund;
pub mod settlement;
pub mod wallet;
