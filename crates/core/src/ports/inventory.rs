//! Inventory collaborator contract.

use async_trait::async_trait;
use thiserror::Error;
use vendra_shared::types::{ProductId, VariantId};

/// Errors from the inventory collaborator.
#[derive(Debug, Clone, Error)]
pub enum InventoryError {
    /// No variant with this id.
    #[error("Unknown variant: {0}")]
    UnknownVariant(VariantId),

    /// No product with this id.
    #[error("Unknown product: {0}")]
    UnknownProduct(ProductId),

    /// The inventory system could not be reached.
    #[error("Inventory unavailable: {0}")]
    Unavailable(String),
}

/// Boundary contract for stock corrections.
///
/// Restoring stock is a precondition of refund payout, so these calls are
/// allowed to fail the refund flow, unlike the payment gateway.
#[async_trait]
pub trait Inventory: Send + Sync {
    /// Puts `quantity` units of a variant back in stock.
    async fn restore_stock(&self, variant_id: VariantId, quantity: u32)
    -> Result<(), InventoryError>;

    /// Reduces a product's sold counter by `quantity`.
    async fn decrement_sold_count(
        &self,
        product_id: ProductId,
        quantity: u32,
    ) -> Result<(), InventoryError>;
}
