//! Settlement error types.

use thiserror::Error;

use crate::ports::identity::IdentityError;
use crate::ports::order::OrderStoreError;
use crate::wallet::WalletError;

/// Errors that can occur during settlement.
///
/// Inside a batch, per-order errors are caught, logged, and counted; only
/// batch-level failures (the run gate, the eligibility scan) surface to the
/// caller.
#[derive(Debug, Error)]
pub enum SettlementError {
    /// Another settlement batch is still running.
    #[error("A settlement batch is already running")]
    BatchInProgress,

    /// Order collaborator failed.
    #[error(transparent)]
    Order(#[from] OrderStoreError),

    /// Wallet-owner resolution failed.
    #[error(transparent)]
    Identity(#[from] IdentityError),

    /// Wallet operation failed.
    #[error(transparent)]
    Wallet(#[from] WalletError),
}
