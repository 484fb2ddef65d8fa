//! Identity collaborator contract.
//!
//! Maps orders to the wallet owners on each side (the seller is reached via
//! the shop) and names the single platform wallet owner.

use async_trait::async_trait;
use thiserror::Error;
use vendra_shared::types::{OrderId, OwnerId};

/// The wallet owners on both sides of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderParties {
    /// The buyer's wallet owner.
    pub buyer: OwnerId,
    /// The seller's wallet owner, resolved through the shop.
    pub seller: OwnerId,
}

/// Errors from the identity collaborator.
#[derive(Debug, Clone, Error)]
pub enum IdentityError {
    /// The order's parties could not be resolved.
    #[error("Could not resolve wallet owners for order {0}")]
    UnresolvedOrder(OrderId),

    /// The identity system could not be reached.
    #[error("Identity service unavailable: {0}")]
    Unavailable(String),
}

/// Boundary contract for wallet-owner resolution.
#[async_trait]
pub trait Identity: Send + Sync {
    /// Resolves the buyer and seller wallet owners for an order.
    async fn resolve_wallet_owners(&self, order_id: OrderId)
    -> Result<OrderParties, IdentityError>;

    /// The owner id of the single platform/escrow wallet.
    fn platform_owner_id(&self) -> OwnerId;
}
