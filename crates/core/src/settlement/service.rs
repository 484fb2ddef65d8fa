//! Settlement service: releases escrowed order funds to sellers.
//!
//! A batch scans completed, paid orders past the return window and moves
//! `total - fee` from the platform wallet to each seller. Every order runs
//! inside its own failure boundary; one bad order never stops the batch.

use std::sync::Arc;

use chrono::{Duration, Utc};
use rust_decimal::Decimal;
use tokio::sync::Mutex;
use tracing::{error, info, warn};

use super::error::SettlementError;
use super::types::{SettleOutcome, SettlementReport};
use crate::ports::fees::FeeSchedule;
use crate::ports::identity::Identity;
use crate::ports::order::{OrderDirectory, OrderSnapshot};
use crate::wallet::{EntryKind, Owner, WalletService};

/// Settlement service.
pub struct SettlementService {
    wallets: Arc<WalletService>,
    orders: Arc<dyn OrderDirectory>,
    identity: Arc<dyn Identity>,
    fees: Arc<dyn FeeSchedule>,
    // Held for the whole batch; a second concurrent batch fails fast
    // instead of double-paying the same orders.
    run_gate: Mutex<()>,
}

impl SettlementService {
    /// Creates a settlement service over the given collaborators.
    #[must_use]
    pub fn new(
        wallets: Arc<WalletService>,
        orders: Arc<dyn OrderDirectory>,
        identity: Arc<dyn Identity>,
        fees: Arc<dyn FeeSchedule>,
    ) -> Self {
        Self {
            wallets,
            orders,
            identity,
            fees,
            run_gate: Mutex::new(()),
        }
    }

    /// Orders whose return window has passed and which are not yet settled.
    pub async fn find_eligible(
        &self,
        return_period_days: i64,
    ) -> Result<Vec<OrderSnapshot>, SettlementError> {
        let cutoff = Utc::now() - Duration::days(return_period_days);
        Ok(self.orders.list_eligible_for_settlement(cutoff).await?)
    }

    /// Settles a single order.
    ///
    /// Releases `total - fee` from the platform wallet to the seller as one
    /// atomic transfer, records the fee as an informational ledger entry,
    /// and stamps the settlement marker. A non-positive seller amount is a
    /// logged no-op that still marks the order settled.
    ///
    /// # Errors
    ///
    /// Identity, wallet, and order-store failures propagate; the transfer
    /// itself is atomic, so a failure never leaves a half-applied payout.
    pub async fn settle_one(&self, order: &OrderSnapshot) -> Result<SettleOutcome, SettlementError> {
        let fee = self.fees.fee_for(order).await;
        let seller_amount = order.total_amount - fee;
        if seller_amount <= Decimal::ZERO {
            warn!(
                order_id = %order.id,
                total = %order.total_amount,
                %fee,
                "fee consumes the whole order, nothing to release"
            );
            self.orders.mark_settled(order.id, Utc::now()).await?;
            return Ok(SettleOutcome::Skipped);
        }

        let parties = self.identity.resolve_wallet_owners(order.id).await?;
        let platform = Owner::platform(self.identity.platform_owner_id());

        self.wallets
            .transfer(
                platform,
                Owner::seller(parties.seller),
                seller_amount,
                EntryKind::PaymentToSeller,
                &format!("settlement for order {}", order.id),
                Some(order.id),
            )
            .await?;
        if fee > Decimal::ZERO {
            self.wallets
                .record_fee(
                    platform,
                    fee,
                    &format!("platform fee for order {}", order.id),
                    Some(order.id),
                )
                .await?;
        }
        self.orders.mark_settled(order.id, Utc::now()).await?;

        info!(
            order_id = %order.id,
            seller = %parties.seller,
            %seller_amount,
            %fee,
            "order settled"
        );
        Ok(SettleOutcome::Settled { seller_amount, fee })
    }

    /// Runs one settlement batch over every eligible order.
    ///
    /// Per-order failures are logged and counted without stopping the batch.
    ///
    /// # Errors
    ///
    /// `BatchInProgress` when another batch holds the run gate; eligibility
    /// scan failures propagate before any order is touched.
    pub async fn settle_batch(
        &self,
        return_period_days: i64,
    ) -> Result<SettlementReport, SettlementError> {
        let _running = self
            .run_gate
            .try_lock()
            .map_err(|_| SettlementError::BatchInProgress)?;

        let eligible = self.find_eligible(return_period_days).await?;
        info!(count = eligible.len(), "settlement batch starting");

        let mut report = SettlementReport::default();
        for order in &eligible {
            match self.settle_one(order).await {
                Ok(SettleOutcome::Settled { .. }) => report.succeeded += 1,
                Ok(SettleOutcome::Skipped) => report.skipped += 1,
                Err(err) => {
                    error!(order_id = %order.id, %err, "order settlement failed, continuing batch");
                    report.failed += 1;
                }
            }
        }

        info!(
            succeeded = report.succeeded,
            failed = report.failed,
            skipped = report.skipped,
            "settlement batch finished"
        );
        Ok(report)
    }
}
