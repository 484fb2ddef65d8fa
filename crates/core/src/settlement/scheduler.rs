//! Periodic driver for settlement batches.

use std::sync::Arc;

use tokio::task::JoinHandle;
use tokio::time::{Duration, MissedTickBehavior, interval};
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};
use vendra_shared::config::SettlementConfig;

use super::error::SettlementError;
use super::service::SettlementService;

/// Runs settlement batches on a fixed interval until cancelled.
///
/// The first batch runs immediately on spawn. The service's run gate keeps
/// batches from overlapping even when several scheduler instances exist.
pub struct SettlementScheduler {
    service: Arc<SettlementService>,
    config: SettlementConfig,
}

impl SettlementScheduler {
    /// Creates a scheduler over the given service.
    #[must_use]
    pub fn new(service: Arc<SettlementService>, config: SettlementConfig) -> Self {
        Self { service, config }
    }

    /// Spawns the scheduler loop onto the runtime.
    pub fn spawn(self, shutdown: CancellationToken) -> JoinHandle<()> {
        tokio::spawn(async move { self.run(shutdown).await })
    }

    async fn run(self, shutdown: CancellationToken) {
        let mut ticker = interval(Duration::from_secs(self.config.interval_secs));
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        info!(
            interval_secs = self.config.interval_secs,
            return_period_days = self.config.return_period_days,
            "settlement scheduler started"
        );

        loop {
            tokio::select! {
                () = shutdown.cancelled() => {
                    info!("settlement scheduler stopping");
                    break;
                }
                _ = ticker.tick() => {
                    self.run_batch().await;
                }
            }
        }
    }

    async fn run_batch(&self) {
        match self
            .service
            .settle_batch(self.config.return_period_days)
            .await
        {
            Ok(report) => info!(
                succeeded = report.succeeded,
                failed = report.failed,
                skipped = report.skipped,
                "scheduled settlement batch finished"
            ),
            Err(SettlementError::BatchInProgress) => {
                warn!("previous settlement batch still running, skipping this tick");
            }
            Err(err) => error!(%err, "scheduled settlement batch failed"),
        }
    }
}
