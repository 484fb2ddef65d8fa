//! Order collaborator contract.
//!
//! Orders live outside this core; the financial side only reads the fields
//! it needs and writes status/settlement markers at the boundary.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use vendra_shared::types::{OrderId, OrderItemId, OwnerId, ProductId, ShopId, VariantId};

/// Order lifecycle status, as far as this core cares.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    /// Order is still moving through fulfilment.
    Processing,
    /// Order was delivered and confirmed.
    Completed,
    /// Order was cancelled (including by a full refund).
    Cancelled,
}

impl OrderStatus {
    /// Returns the string representation of the status.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Processing => "processing",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Payment status of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    /// Payment has not cleared.
    Unpaid,
    /// Payment cleared into escrow.
    Paid,
}

/// How the order was originally paid.
///
/// A closed enum: every branch is matched exhaustively, and only methods
/// with a gateway leg carry a transaction reference worth refunding against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    /// Card payment through the gateway.
    Card,
    /// Bank transfer through the gateway.
    BankTransfer,
    /// Cash on delivery; no gateway involvement.
    CashOnDelivery,
}

impl PaymentMethod {
    /// Whether refunds for this method have an external gateway leg.
    #[must_use]
    pub fn has_gateway_leg(&self) -> bool {
        !matches!(self, Self::CashOnDelivery)
    }
}

/// One purchased line of an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderLine {
    /// Line item id.
    pub order_item_id: OrderItemId,
    /// Product the line belongs to.
    pub product_id: ProductId,
    /// Concrete variant that was purchased.
    pub variant_id: VariantId,
    /// Price per unit in minor units.
    pub unit_price: Decimal,
    /// Purchased quantity.
    pub quantity: u32,
}

/// Read view of an order at the boundary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderSnapshot {
    /// Order id.
    pub id: OrderId,
    /// Wallet owner of the buyer.
    pub buyer_id: OwnerId,
    /// Shop the order was placed against.
    pub shop_id: ShopId,
    /// Order total in minor units.
    pub total_amount: Decimal,
    /// Lifecycle status.
    pub status: OrderStatus,
    /// Payment status.
    pub payment_status: PaymentStatus,
    /// Original payment method.
    pub payment_method: PaymentMethod,
    /// Gateway transaction reference, when the method has a gateway leg.
    pub transaction_ref: Option<String>,
    /// Last status change.
    pub updated_at: DateTime<Utc>,
    /// When escrowed funds were released to the seller, if ever.
    pub settled_at: Option<DateTime<Utc>>,
    /// Purchased lines.
    pub lines: Vec<OrderLine>,
}

impl OrderSnapshot {
    /// Total purchased quantity across all lines.
    #[must_use]
    pub fn total_quantity(&self) -> u64 {
        self.lines.iter().map(|line| u64::from(line.quantity)).sum()
    }

    /// Finds a line by its item id.
    #[must_use]
    pub fn line(&self, order_item_id: OrderItemId) -> Option<&OrderLine> {
        self.lines
            .iter()
            .find(|line| line.order_item_id == order_item_id)
    }
}

/// Errors from the order collaborator.
#[derive(Debug, Clone, Error)]
pub enum OrderStoreError {
    /// No order with this id.
    #[error("Order not found: {0}")]
    NotFound(OrderId),

    /// The order store could not be reached.
    #[error("Order store unavailable: {0}")]
    Unavailable(String),
}

/// Boundary contract for reading and mutating orders.
#[async_trait]
pub trait OrderDirectory: Send + Sync {
    /// Fetches an order snapshot.
    async fn get(&self, id: OrderId) -> Result<OrderSnapshot, OrderStoreError>;

    /// Orders eligible for settlement: completed, paid, last updated at or
    /// before `cutoff`, and not yet settled.
    async fn list_eligible_for_settlement(
        &self,
        cutoff: DateTime<Utc>,
    ) -> Result<Vec<OrderSnapshot>, OrderStoreError>;

    /// Overwrites the order status.
    async fn update_status(&self, id: OrderId, status: OrderStatus) -> Result<(), OrderStoreError>;

    /// Stamps the settlement marker, removing the order from the eligible
    /// set for good.
    async fn mark_settled(&self, id: OrderId, at: DateTime<Utc>) -> Result<(), OrderStoreError>;
}
