//! In-memory collaborator adapters.
//!
//! Back the daemon and the integration tests; a deployment wires real
//! implementations of the same traits instead.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use rust_decimal::Decimal;
use std::sync::Mutex;
use vendra_shared::types::{OrderId, OwnerId, ProductId, VariantId};

use super::gateway::{GatewayError, PaymentGateway};
use super::identity::{Identity, IdentityError, OrderParties};
use super::inventory::{Inventory, InventoryError};
use super::order::{OrderDirectory, OrderSnapshot, OrderStatus, OrderStoreError, PaymentStatus};

/// Thread-safe in-memory order directory.
#[derive(Debug, Default)]
pub struct MemoryOrders {
    orders: DashMap<OrderId, OrderSnapshot>,
}

impl MemoryOrders {
    /// Creates an empty directory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces an order.
    pub fn insert(&self, order: OrderSnapshot) {
        self.orders.insert(order.id, order);
    }

    /// Synchronous snapshot accessor for assertions and seeding.
    #[must_use]
    pub fn snapshot(&self, id: OrderId) -> Option<OrderSnapshot> {
        self.orders.get(&id).map(|entry| entry.value().clone())
    }
}

#[async_trait]
impl OrderDirectory for MemoryOrders {
    async fn get(&self, id: OrderId) -> Result<OrderSnapshot, OrderStoreError> {
        self.orders
            .get(&id)
            .map(|entry| entry.value().clone())
            .ok_or(OrderStoreError::NotFound(id))
    }

    async fn list_eligible_for_settlement(
        &self,
        cutoff: DateTime<Utc>,
    ) -> Result<Vec<OrderSnapshot>, OrderStoreError> {
        let mut eligible: Vec<OrderSnapshot> = self
            .orders
            .iter()
            .filter(|entry| {
                let order = entry.value();
                order.status == OrderStatus::Completed
                    && order.payment_status == PaymentStatus::Paid
                    && order.updated_at <= cutoff
                    && order.settled_at.is_none()
            })
            .map(|entry| entry.value().clone())
            .collect();
        // Deterministic batch order.
        eligible.sort_by_key(|order| order.id);
        Ok(eligible)
    }

    async fn update_status(&self, id: OrderId, status: OrderStatus) -> Result<(), OrderStoreError> {
        let mut order = self.orders.get_mut(&id).ok_or(OrderStoreError::NotFound(id))?;
        order.status = status;
        order.updated_at = Utc::now();
        Ok(())
    }

    async fn mark_settled(&self, id: OrderId, at: DateTime<Utc>) -> Result<(), OrderStoreError> {
        let mut order = self.orders.get_mut(&id).ok_or(OrderStoreError::NotFound(id))?;
        order.settled_at = Some(at);
        Ok(())
    }
}

/// Thread-safe in-memory stock and sold counters.
#[derive(Debug, Default)]
pub struct MemoryInventory {
    stock: DashMap<VariantId, u32>,
    sold: DashMap<ProductId, u32>,
}

impl MemoryInventory {
    /// Creates an empty inventory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the stock level of a variant.
    pub fn set_stock(&self, variant_id: VariantId, quantity: u32) {
        self.stock.insert(variant_id, quantity);
    }

    /// Seeds the sold counter of a product.
    pub fn set_sold(&self, product_id: ProductId, quantity: u32) {
        self.sold.insert(product_id, quantity);
    }

    /// Current stock of a variant.
    #[must_use]
    pub fn stock_of(&self, variant_id: VariantId) -> Option<u32> {
        self.stock.get(&variant_id).map(|entry| *entry.value())
    }

    /// Current sold counter of a product.
    #[must_use]
    pub fn sold_of(&self, product_id: ProductId) -> Option<u32> {
        self.sold.get(&product_id).map(|entry| *entry.value())
    }
}

#[async_trait]
impl Inventory for MemoryInventory {
    async fn restore_stock(
        &self,
        variant_id: VariantId,
        quantity: u32,
    ) -> Result<(), InventoryError> {
        let mut stock = self
            .stock
            .get_mut(&variant_id)
            .ok_or(InventoryError::UnknownVariant(variant_id))?;
        *stock += quantity;
        Ok(())
    }

    async fn decrement_sold_count(
        &self,
        product_id: ProductId,
        quantity: u32,
    ) -> Result<(), InventoryError> {
        let mut sold = self
            .sold
            .get_mut(&product_id)
            .ok_or(InventoryError::UnknownProduct(product_id))?;
        *sold = sold.saturating_sub(quantity);
        Ok(())
    }
}

/// Gateway double that records refund calls and can be told to fail.
#[derive(Debug, Default)]
pub struct RecordingGateway {
    calls: Mutex<Vec<(String, Decimal)>>,
    failure: Mutex<Option<GatewayError>>,
}

impl RecordingGateway {
    /// Creates a gateway that accepts every refund.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes subsequent refund calls fail with `error` (or succeed again
    /// with `None`).
    pub fn set_failure(&self, error: Option<GatewayError>) {
        *self.failure.lock().expect("gateway failure lock") = error;
    }

    /// The refund calls seen so far.
    #[must_use]
    pub fn calls(&self) -> Vec<(String, Decimal)> {
        self.calls.lock().expect("gateway calls lock").clone()
    }
}

#[async_trait]
impl PaymentGateway for RecordingGateway {
    async fn refund(&self, transaction_ref: &str, amount: Decimal) -> Result<(), GatewayError> {
        self.calls
            .lock()
            .expect("gateway calls lock")
            .push((transaction_ref.to_string(), amount));
        match self.failure.lock().expect("gateway failure lock").clone() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}

/// Identity directory with a fixed platform owner and registered parties.
#[derive(Debug)]
pub struct StaticIdentity {
    platform: OwnerId,
    parties: DashMap<OrderId, OrderParties>,
}

impl StaticIdentity {
    /// Creates a directory with the given platform wallet owner.
    #[must_use]
    pub fn new(platform: OwnerId) -> Self {
        Self {
            platform,
            parties: DashMap::new(),
        }
    }

    /// Registers the wallet owners for an order.
    pub fn register(&self, order_id: OrderId, buyer: OwnerId, seller: OwnerId) {
        self.parties.insert(order_id, OrderParties { buyer, seller });
    }
}

#[async_trait]
impl Identity for StaticIdentity {
    async fn resolve_wallet_owners(
        &self,
        order_id: OrderId,
    ) -> Result<OrderParties, IdentityError> {
        self.parties
            .get(&order_id)
            .map(|entry| *entry.value())
            .ok_or(IdentityError::UnresolvedOrder(order_id))
    }

    fn platform_owner_id(&self) -> OwnerId {
        self.platform
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::order::{OrderLine, PaymentMethod};
    use chrono::Duration;
    use rust_decimal_macros::dec;
    use vendra_shared::types::{OrderItemId, ShopId};

    fn completed_order(updated_at: DateTime<Utc>) -> OrderSnapshot {
        OrderSnapshot {
            id: OrderId::new(),
            buyer_id: OwnerId::new(),
            shop_id: ShopId::new(),
            total_amount: dec!(100_000),
            status: OrderStatus::Completed,
            payment_status: PaymentStatus::Paid,
            payment_method: PaymentMethod::Card,
            transaction_ref: Some("tx".to_string()),
            updated_at,
            settled_at: None,
            lines: vec![OrderLine {
                order_item_id: OrderItemId::new(),
                product_id: ProductId::new(),
                variant_id: VariantId::new(),
                unit_price: dec!(100_000),
                quantity: 1,
            }],
        }
    }

    #[tokio::test]
    async fn test_eligibility_filters() {
        let orders = MemoryOrders::new();
        let cutoff = Utc::now();

        let old = completed_order(cutoff - Duration::days(8));
        let fresh = completed_order(cutoff + Duration::days(1));
        let mut unpaid = completed_order(cutoff - Duration::days(8));
        unpaid.payment_status = PaymentStatus::Unpaid;
        let mut settled = completed_order(cutoff - Duration::days(8));
        settled.settled_at = Some(cutoff);

        let old_id = old.id;
        for order in [old, fresh, unpaid, settled] {
            orders.insert(order);
        }

        let eligible = orders.list_eligible_for_settlement(cutoff).await.unwrap();
        assert_eq!(eligible.len(), 1);
        assert_eq!(eligible[0].id, old_id);
    }

    #[tokio::test]
    async fn test_inventory_restock_and_sold() {
        let inventory = MemoryInventory::new();
        let variant = VariantId::new();
        let product = ProductId::new();
        inventory.set_stock(variant, 5);
        inventory.set_sold(product, 3);

        inventory.restore_stock(variant, 2).await.unwrap();
        inventory.decrement_sold_count(product, 2).await.unwrap();
        assert_eq!(inventory.stock_of(variant), Some(7));
        assert_eq!(inventory.sold_of(product), Some(1));

        let missing = VariantId::new();
        assert!(matches!(
            inventory.restore_stock(missing, 1).await,
            Err(InventoryError::UnknownVariant(_))
        ));
    }

    #[tokio::test]
    async fn test_recording_gateway_failure_mode() {
        let gateway = RecordingGateway::new();
        assert!(gateway.refund("tx-1", dec!(100)).await.is_ok());

        gateway.set_failure(Some(GatewayError::Unreachable("down".to_string())));
        assert!(gateway.refund("tx-2", dec!(200)).await.is_err());
        assert_eq!(gateway.calls().len(), 2);
    }

    #[tokio::test]
    async fn test_static_identity_resolution() {
        let platform = OwnerId::new();
        let identity = StaticIdentity::new(platform);
        assert_eq!(identity.platform_owner_id(), platform);

        let order_id = OrderId::new();
        assert!(identity.resolve_wallet_owners(order_id).await.is_err());

        let buyer = OwnerId::new();
        let seller = OwnerId::new();
        identity.register(order_id, buyer, seller);
        let parties = identity.resolve_wallet_owners(order_id).await.unwrap();
        assert_eq!(parties.buyer, buyer);
        assert_eq!(parties.seller, seller);
    }
}
