//! Payment gateway collaborator contract.

use async_trait::async_trait;
use rust_decimal::Decimal;
use thiserror::Error;

/// Errors from the external payment gateway.
///
/// Gateway failures are best-effort territory: callers log and swallow them,
/// they never abort money movement on the wallet side.
#[derive(Debug, Clone, Error)]
pub enum GatewayError {
    /// The provider rejected the refund.
    #[error("Gateway declined refund: {0}")]
    Declined(String),

    /// The provider could not be reached.
    #[error("Gateway unreachable: {0}")]
    Unreachable(String),
}

/// Boundary contract for the external payment provider.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Asks the provider to refund `amount` against an earlier transaction.
    ///
    /// Best-effort: no retries are required, and callers bound the call with
    /// a timeout.
    async fn refund(&self, transaction_ref: &str, amount: Decimal) -> Result<(), GatewayError>;
}
