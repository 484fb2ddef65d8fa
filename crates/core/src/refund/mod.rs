//! Refund and return workflow.
//!
//! This module implements the refund state machine:
//! - Refund aggregate and line-item allocation types
//! - Transition rules with terminal Rejected/Completed states
//! - The money-movement step that credits the buyer and cancels fully
//!   refunded orders
//! - Error types for refund operations

pub mod error;
pub mod service;
pub mod types;

pub use error::RefundError;
pub use service::RefundService;
pub use types::{ItemClaim, Refund, RefundClaim, RefundItem, RefundStatus};
