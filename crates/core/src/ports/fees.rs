//! Platform fee policy.
//!
//! One pluggable interface decides the fee withheld at settlement. The
//! recorded-fee table is the production policy; a flat-rate schedule ships
//! as the alternative.

use async_trait::async_trait;
use dashmap::DashMap;
use rust_decimal::Decimal;
use vendra_shared::types::OrderId;

use super::order::OrderSnapshot;

/// Boundary contract for fee calculation.
#[async_trait]
pub trait FeeSchedule: Send + Sync {
    /// The platform fee to withhold for this order, in minor units.
    ///
    /// Orders without a recorded fee pay zero.
    async fn fee_for(&self, order: &OrderSnapshot) -> Decimal;
}

/// Fee schedule backed by per-order fee records.
#[derive(Debug, Default)]
pub struct RecordedFees {
    fees: DashMap<OrderId, Decimal>,
}

impl RecordedFees {
    /// Creates an empty fee table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the fee for an order, replacing any earlier record.
    pub fn set_fee(&self, order_id: OrderId, fee: Decimal) {
        self.fees.insert(order_id, fee);
    }
}

#[async_trait]
impl FeeSchedule for RecordedFees {
    async fn fee_for(&self, order: &OrderSnapshot) -> Decimal {
        self.fees
            .get(&order.id)
            .map_or(Decimal::ZERO, |fee| *fee.value())
    }
}

/// Fee schedule charging a fixed fraction of the order total.
#[derive(Debug, Clone, Copy)]
pub struct FlatRateFee {
    rate: Decimal,
}

impl FlatRateFee {
    /// Creates a flat-rate schedule; `rate` is a fraction, e.g. `0.1`.
    #[must_use]
    pub const fn new(rate: Decimal) -> Self {
        Self { rate }
    }
}

#[async_trait]
impl FeeSchedule for FlatRateFee {
    async fn fee_for(&self, order: &OrderSnapshot) -> Decimal {
        // Minor units: round the fraction down to a whole unit.
        (order.total_amount * self.rate).floor()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::order::{OrderStatus, PaymentMethod, PaymentStatus};
    use chrono::Utc;
    use rust_decimal_macros::dec;
    use vendra_shared::types::{OwnerId, ShopId};

    fn order(total: Decimal) -> OrderSnapshot {
        OrderSnapshot {
            id: OrderId::new(),
            buyer_id: OwnerId::new(),
            shop_id: ShopId::new(),
            total_amount: total,
            status: OrderStatus::Completed,
            payment_status: PaymentStatus::Paid,
            payment_method: PaymentMethod::Card,
            transaction_ref: Some("tx-1".to_string()),
            updated_at: Utc::now(),
            settled_at: None,
            lines: vec![],
        }
    }

    #[tokio::test]
    async fn test_recorded_fee_defaults_to_zero() {
        let fees = RecordedFees::new();
        let order = order(dec!(200_000));
        assert_eq!(fees.fee_for(&order).await, Decimal::ZERO);

        fees.set_fee(order.id, dec!(20_000));
        assert_eq!(fees.fee_for(&order).await, dec!(20_000));
    }

    #[tokio::test]
    async fn test_flat_rate_rounds_down() {
        let fees = FlatRateFee::new(dec!(0.1));
        assert_eq!(fees.fee_for(&order(dec!(200_000))).await, dec!(20_000));
        assert_eq!(fees.fee_for(&order(dec!(55))).await, dec!(5));
    }
}
