//! Settlement domain types.

use rust_decimal::Decimal;
use serde::Serialize;

/// What happened to a single order during settlement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettleOutcome {
    /// Escrow was released to the seller.
    Settled {
        /// Amount the seller received (total minus fee).
        seller_amount: Decimal,
        /// Fee withheld by the platform.
        fee: Decimal,
    },
    /// Nothing to release (fee at or above the total); the order was marked
    /// settled so it leaves the eligible set.
    Skipped,
}

/// Aggregate result of a settlement batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SettlementReport {
    /// Orders whose escrow was released.
    pub succeeded: u32,
    /// Orders whose settlement errored; the batch continued past them.
    pub failed: u32,
    /// Orders with nothing to release.
    pub skipped: u32,
}

impl SettlementReport {
    /// Total number of orders the batch looked at.
    #[must_use]
    pub fn total(&self) -> u32 {
        self.succeeded + self.failed + self.skipped
    }
}
