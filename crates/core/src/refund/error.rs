//! Refund error types.

use thiserror::Error;
use vendra_shared::types::{OrderId, OrderItemId, RefundId};

use super::types::RefundStatus;
use crate::ports::inventory::InventoryError;
use crate::ports::order::{OrderStatus, OrderStoreError};
use crate::wallet::WalletError;

/// Errors that can occur in the refund workflow.
#[derive(Debug, Error)]
pub enum RefundError {
    // ========== Lookup Errors ==========
    /// Refund not found.
    #[error("Refund not found: {0}")]
    NotFound(RefundId),

    // ========== State Machine Errors ==========
    /// The requested transition is not legal from the current status.
    #[error("Invalid refund transition from {from} to {to}")]
    InvalidTransition {
        /// Status the refund was in.
        from: RefundStatus,
        /// Status the caller asked for.
        to: RefundStatus,
    },

    // ========== Validation Errors ==========
    /// The order belongs to a different buyer.
    #[error("Order {0} does not belong to the requesting buyer")]
    NotOrderBuyer(OrderId),

    /// Only completed orders can be refunded.
    #[error("Order {order_id} is not refundable in status {status}")]
    OrderNotRefundable {
        /// The order in question.
        order_id: OrderId,
        /// Its current status.
        status: OrderStatus,
    },

    /// Refund amount must be strictly positive.
    #[error("Refund amount must be positive")]
    NonPositiveAmount,

    /// A reason or decision note is required.
    #[error("A non-empty reason is required")]
    ReasonRequired,

    /// An item-level claim must name at least one line.
    #[error("Item-level refund must claim at least one line")]
    EmptyItemClaim,

    /// Claimed line is not part of the order.
    #[error("Order item {0} is not part of the order")]
    UnknownOrderItem(OrderItemId),

    /// Claimed quantity must be at least one.
    #[error("Claimed quantity for item {0} must be positive")]
    NonPositiveQuantity(OrderItemId),

    /// Claimed quantity exceeds what was ordered.
    #[error("Claimed quantity {requested} exceeds ordered quantity {ordered} for item {item_id}")]
    QuantityExceedsOrdered {
        /// The order line in question.
        item_id: OrderItemId,
        /// Quantity claimed across the request.
        requested: u32,
        /// Quantity originally ordered.
        ordered: u32,
    },

    // ========== Collaborator Errors ==========
    /// Wallet operation failed.
    #[error(transparent)]
    Wallet(#[from] WalletError),

    /// Order collaborator failed.
    #[error(transparent)]
    Order(#[from] OrderStoreError),

    /// Stock restoration failed; payout was aborted.
    #[error("Inventory restore failed: {0}")]
    Inventory(#[from] InventoryError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transition_error_display() {
        let err = RefundError::InvalidTransition {
            from: RefundStatus::Completed,
            to: RefundStatus::Approved,
        };
        assert_eq!(
            err.to_string(),
            "Invalid refund transition from completed to approved"
        );
    }

    #[test]
    fn test_quantity_error_display() {
        let item_id = OrderItemId::new();
        let err = RefundError::QuantityExceedsOrdered {
            item_id,
            requested: 5,
            ordered: 3,
        };
        assert_eq!(
            err.to_string(),
            format!("Claimed quantity 5 exceeds ordered quantity 3 for item {item_id}")
        );
    }
}
