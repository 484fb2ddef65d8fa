//! Refund workflow service.
//!
//! Drives a refund through Requested → {Rejected | Approved} →
//! {Rejected | Completed}, and owns the money-movement step for accepted
//! returns. Transitions serialize per refund; wallet movement goes through
//! the wallet service like everyone else's.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use dashmap::DashMap;
use rust_decimal::Decimal;
use tokio::sync::Mutex;
use tracing::{info, warn};
use vendra_shared::config::GatewayConfig;
use vendra_shared::types::{OrderId, OrderItemId, OwnerId, RefundId};

use super::error::RefundError;
use super::types::{ItemClaim, Refund, RefundClaim, RefundItem, RefundStatus};
use crate::ports::gateway::PaymentGateway;
use crate::ports::inventory::Inventory;
use crate::ports::order::{OrderDirectory, OrderSnapshot, OrderStatus};
use crate::wallet::{EntryKind, Owner, WalletService};

/// Tolerance, in currency minor units, when deciding whether an amount-only
/// refund covers the whole order.
const FULL_REFUND_TOLERANCE: Decimal = Decimal::from_parts(1000, 0, 0, false, 0);

/// Refund workflow service.
pub struct RefundService {
    refunds: DashMap<RefundId, Arc<Mutex<Refund>>>,
    wallets: Arc<WalletService>,
    orders: Arc<dyn OrderDirectory>,
    inventory: Arc<dyn Inventory>,
    gateway: Arc<dyn PaymentGateway>,
    gateway_timeout: Duration,
}

impl RefundService {
    /// Creates a refund service over the given collaborators.
    #[must_use]
    pub fn new(
        wallets: Arc<WalletService>,
        orders: Arc<dyn OrderDirectory>,
        inventory: Arc<dyn Inventory>,
        gateway: Arc<dyn PaymentGateway>,
        gateway_config: &GatewayConfig,
    ) -> Self {
        Self {
            refunds: DashMap::new(),
            wallets,
            orders,
            inventory,
            gateway,
            gateway_timeout: Duration::from_millis(gateway_config.refund_timeout_ms),
        }
    }

    /// Opens a refund request against a completed order the buyer owns.
    ///
    /// Item-level claims derive the amount from `unit_price * quantity` per
    /// line; bare amounts must be positive.
    ///
    /// # Errors
    ///
    /// Validation failures (`NotOrderBuyer`, `OrderNotRefundable`,
    /// `NonPositiveAmount`, `ReasonRequired`, quantity errors) surface before
    /// any state is written.
    pub async fn open(
        &self,
        order_id: OrderId,
        buyer_id: OwnerId,
        claim: RefundClaim,
        reason: &str,
        evidence: Vec<String>,
    ) -> Result<Refund, RefundError> {
        let order = self.orders.get(order_id).await?;
        if order.buyer_id != buyer_id {
            return Err(RefundError::NotOrderBuyer(order_id));
        }
        if order.status != OrderStatus::Completed {
            return Err(RefundError::OrderNotRefundable {
                order_id,
                status: order.status,
            });
        }
        if reason.trim().is_empty() {
            return Err(RefundError::ReasonRequired);
        }

        let (amount, items) = match claim {
            RefundClaim::Amount(amount) => {
                if amount <= Decimal::ZERO {
                    return Err(RefundError::NonPositiveAmount);
                }
                (amount, Vec::new())
            }
            RefundClaim::Items(claims) => Self::resolve_item_claims(&order, &claims)?,
        };

        let refund = Refund::new(order_id, amount, reason.to_string(), evidence, items);
        self.refunds
            .insert(refund.id, Arc::new(Mutex::new(refund.clone())));
        info!(refund_id = %refund.id, %order_id, %amount, "refund requested");
        Ok(refund)
    }

    /// A snapshot of a refund.
    pub async fn get(&self, refund_id: RefundId) -> Result<Refund, RefundError> {
        let handle = self.handle(refund_id)?;
        let refund = handle.lock().await;
        Ok(refund.clone())
    }

    /// Approves a requested refund, recording whether the goods must come
    /// back first.
    ///
    /// # Errors
    ///
    /// `InvalidTransition` unless the refund is in Requested.
    pub async fn approve(
        &self,
        refund_id: RefundId,
        requires_return: bool,
    ) -> Result<Refund, RefundError> {
        let handle = self.handle(refund_id)?;
        let mut refund = handle.lock().await;
        if refund.status != RefundStatus::Requested {
            return Err(RefundError::InvalidTransition {
                from: refund.status,
                to: RefundStatus::Approved,
            });
        }
        refund.requires_return = requires_return;
        refund.transition_to(RefundStatus::Approved);
        info!(refund_id = %refund.id, requires_return, "refund approved");
        Ok(refund.clone())
    }

    /// Rejects a refund, appending the reason to the audit trail.
    ///
    /// # Errors
    ///
    /// `ReasonRequired` for empty reasons; `InvalidTransition` unless the
    /// refund is in Requested or Approved.
    pub async fn reject(
        &self,
        refund_id: RefundId,
        reject_reason: &str,
    ) -> Result<Refund, RefundError> {
        if reject_reason.trim().is_empty() {
            return Err(RefundError::ReasonRequired);
        }
        let handle = self.handle(refund_id)?;
        let mut refund = handle.lock().await;
        if !matches!(
            refund.status,
            RefundStatus::Requested | RefundStatus::Approved
        ) {
            return Err(RefundError::InvalidTransition {
                from: refund.status,
                to: RefundStatus::Rejected,
            });
        }
        refund.push_reason(reject_reason);
        refund.transition_to(RefundStatus::Rejected);
        info!(refund_id = %refund.id, "refund rejected");
        Ok(refund.clone())
    }

    /// Settles an approved refund after return inspection.
    ///
    /// When accepted: stock and sold-count are restored for every refunded
    /// line (or every order line when the refund has no items), then the
    /// money moves and the refund completes. A failed stock restore aborts
    /// before any wallet credit. When not accepted: the refund is rejected
    /// with the inspection note appended.
    ///
    /// # Errors
    ///
    /// `InvalidTransition` unless the refund is in Approved; inventory and
    /// wallet failures propagate and leave the refund in Approved.
    pub async fn confirm_return_and_settle(
        &self,
        refund_id: RefundId,
        accepted: bool,
        inspection_note: &str,
    ) -> Result<Refund, RefundError> {
        let handle = self.handle(refund_id)?;
        let mut refund = handle.lock().await;
        if refund.status != RefundStatus::Approved {
            let to = if accepted {
                RefundStatus::Completed
            } else {
                RefundStatus::Rejected
            };
            return Err(RefundError::InvalidTransition {
                from: refund.status,
                to,
            });
        }

        if !accepted {
            if inspection_note.trim().is_empty() {
                return Err(RefundError::ReasonRequired);
            }
            refund.push_reason(inspection_note);
            refund.transition_to(RefundStatus::Rejected);
            info!(refund_id = %refund.id, "return inspection failed, refund rejected");
            return Ok(refund.clone());
        }

        let order = self.orders.get(refund.order_id).await?;

        // Inventory correction is a precondition of payout, not best-effort.
        self.restore_inventory(&refund, &order).await?;
        let full = self.process_refund(&refund, &order).await?;

        if !inspection_note.trim().is_empty() {
            refund.push_reason(inspection_note);
        }
        refund.transition_to(RefundStatus::Completed);
        info!(refund_id = %refund.id, full, "refund completed");
        Ok(refund.clone())
    }

    /// The money-movement step for an accepted refund.
    ///
    /// The gateway leg is best-effort: failures and timeouts are logged and
    /// swallowed. The buyer-wallet credit is the guaranteed side effect.
    /// Returns whether the refund was full (order cancelled) or partial.
    async fn process_refund(
        &self,
        refund: &Refund,
        order: &OrderSnapshot,
    ) -> Result<bool, RefundError> {
        if order.payment_method.has_gateway_leg() {
            match order.transaction_ref.as_deref() {
                Some(transaction_ref) => {
                    self.attempt_gateway_refund(transaction_ref, refund.amount)
                        .await;
                }
                None => warn!(
                    order_id = %order.id,
                    "no transaction reference on gateway-paid order, skipping provider refund"
                ),
            }
        }

        self.wallets
            .deposit(
                Owner::buyer(order.buyer_id),
                refund.amount,
                EntryKind::Refund,
                &format!("refund for order {}", order.id),
                Some(order.id),
            )
            .await?;

        let full = Self::is_full_refund(refund, order);
        if full {
            self.orders
                .update_status(order.id, OrderStatus::Cancelled)
                .await?;
        }
        Ok(full)
    }

    async fn attempt_gateway_refund(&self, transaction_ref: &str, amount: Decimal) {
        match tokio::time::timeout(
            self.gateway_timeout,
            self.gateway.refund(transaction_ref, amount),
        )
        .await
        {
            Ok(Ok(())) => info!(transaction_ref, %amount, "gateway refund accepted"),
            Ok(Err(error)) => warn!(
                transaction_ref,
                %amount,
                %error,
                "gateway refund failed, continuing with wallet credit"
            ),
            Err(_) => warn!(
                transaction_ref,
                %amount,
                "gateway refund timed out, continuing with wallet credit"
            ),
        }
    }

    /// Whether this refund covers the whole order.
    ///
    /// Item-level refunds are full when they touch every order line and the
    /// summed refunded quantity reaches the total ordered quantity.
    /// Amount-only refunds are full within a fixed minor-unit tolerance.
    fn is_full_refund(refund: &Refund, order: &OrderSnapshot) -> bool {
        if refund.items.is_empty() {
            return refund.amount >= order.total_amount - FULL_REFUND_TOLERANCE;
        }
        let refunded_lines: std::collections::HashSet<OrderItemId> = refund
            .items
            .iter()
            .map(|item| item.order_item_id)
            .collect();
        let refunded_quantity: u64 = refund
            .items
            .iter()
            .map(|item| u64::from(item.quantity))
            .sum();
        refunded_lines.len() == order.lines.len() && refunded_quantity >= order.total_quantity()
    }

    async fn restore_inventory(
        &self,
        refund: &Refund,
        order: &OrderSnapshot,
    ) -> Result<(), RefundError> {
        if refund.items.is_empty() {
            for line in &order.lines {
                self.inventory
                    .restore_stock(line.variant_id, line.quantity)
                    .await?;
                self.inventory
                    .decrement_sold_count(line.product_id, line.quantity)
                    .await?;
            }
            return Ok(());
        }
        for item in &refund.items {
            let Some(line) = order.line(item.order_item_id) else {
                return Err(RefundError::UnknownOrderItem(item.order_item_id));
            };
            self.inventory
                .restore_stock(line.variant_id, item.quantity)
                .await?;
            self.inventory
                .decrement_sold_count(line.product_id, item.quantity)
                .await?;
        }
        Ok(())
    }

    /// Validates an item-level claim and derives the refund amount.
    fn resolve_item_claims(
        order: &OrderSnapshot,
        claims: &[ItemClaim],
    ) -> Result<(Decimal, Vec<RefundItem>), RefundError> {
        if claims.is_empty() {
            return Err(RefundError::EmptyItemClaim);
        }

        // Quantities are checked against the order per line, summed across
        // the whole claim so duplicated lines cannot over-ask.
        let mut requested: HashMap<OrderItemId, u32> = HashMap::new();
        for claim in claims {
            if claim.quantity == 0 {
                return Err(RefundError::NonPositiveQuantity(claim.order_item_id));
            }
            *requested.entry(claim.order_item_id).or_insert(0) += claim.quantity;
        }
        for (item_id, quantity) in &requested {
            let Some(line) = order.line(*item_id) else {
                return Err(RefundError::UnknownOrderItem(*item_id));
            };
            if *quantity > line.quantity {
                return Err(RefundError::QuantityExceedsOrdered {
                    item_id: *item_id,
                    requested: *quantity,
                    ordered: line.quantity,
                });
            }
        }

        let mut items = Vec::with_capacity(claims.len());
        let mut total = Decimal::ZERO;
        for claim in claims {
            let Some(line) = order.line(claim.order_item_id) else {
                return Err(RefundError::UnknownOrderItem(claim.order_item_id));
            };
            let refund_amount = line.unit_price * Decimal::from(claim.quantity);
            total += refund_amount;
            items.push(RefundItem {
                order_item_id: claim.order_item_id,
                quantity: claim.quantity,
                refund_amount,
            });
        }
        Ok((total, items))
    }

    fn handle(&self, refund_id: RefundId) -> Result<Arc<Mutex<Refund>>, RefundError> {
        self.refunds
            .get(&refund_id)
            .map(|entry| entry.value().clone())
            .ok_or(RefundError::NotFound(refund_id))
    }
}
