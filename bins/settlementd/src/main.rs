//! Vendra settlement daemon.
//!
//! Wires the financial core against the in-memory collaborator adapters,
//! seeds a small demo marketplace, and runs the settlement scheduler until
//! interrupted. A deployment swaps the adapters for real collaborator
//! implementations.

use std::sync::Arc;

use chrono::{Duration, Utc};
use rust_decimal_macros::dec;
use tokio_util::sync::CancellationToken;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use vendra_core::ports::RecordedFees;
use vendra_core::ports::memory::{MemoryOrders, StaticIdentity};
use vendra_core::ports::order::{
    OrderLine, OrderSnapshot, OrderStatus, PaymentMethod, PaymentStatus,
};
use vendra_core::settlement::{SettlementScheduler, SettlementService};
use vendra_core::wallet::{EntryKind, Owner, WalletService};
use vendra_shared::AppConfig;
use vendra_shared::types::{OrderId, OrderItemId, OwnerId, ProductId, ShopId, VariantId};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "vendra=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = AppConfig::load().expect("Failed to load configuration");

    let platform = OwnerId::new();
    let wallets = Arc::new(WalletService::new());
    let orders = Arc::new(MemoryOrders::new());
    let identity = Arc::new(StaticIdentity::new(platform));
    let fees = Arc::new(RecordedFees::new());

    seed_demo_marketplace(&wallets, &orders, &identity, &fees, platform).await;

    let service = Arc::new(SettlementService::new(
        wallets.clone(),
        orders,
        identity,
        fees,
    ));
    let scheduler = SettlementScheduler::new(service, config.settlement.clone());

    let shutdown = CancellationToken::new();
    let handle = scheduler.spawn(shutdown.clone());
    info!("settlement daemon running, ctrl-c to stop");

    tokio::signal::ctrl_c().await?;
    shutdown.cancel();
    handle.await?;

    info!(
        platform_balance = %wallets.balance(platform).await,
        "settlement daemon stopped"
    );
    Ok(())
}

/// Seeds escrowed orders past their return window so the first batch has
/// work to do.
async fn seed_demo_marketplace(
    wallets: &Arc<WalletService>,
    orders: &Arc<MemoryOrders>,
    identity: &Arc<StaticIdentity>,
    fees: &Arc<RecordedFees>,
    platform: OwnerId,
) {
    let escrow = dec!(1_000_000);
    wallets
        .deposit(
            Owner::platform(platform),
            escrow,
            EntryKind::OrderPayment,
            "escrowed order payments",
            None,
        )
        .await
        .expect("seeding the platform wallet");

    for (total, fee) in [(dec!(200_000), dec!(20_000)), (dec!(150_000), dec!(15_000))] {
        let buyer = OwnerId::new();
        let seller = OwnerId::new();
        let order = OrderSnapshot {
            id: OrderId::new(),
            buyer_id: buyer,
            shop_id: ShopId::new(),
            total_amount: total,
            status: OrderStatus::Completed,
            payment_status: PaymentStatus::Paid,
            payment_method: PaymentMethod::Card,
            transaction_ref: Some(format!("demo-{}", OrderId::new())),
            updated_at: Utc::now() - Duration::days(30),
            settled_at: None,
            lines: vec![OrderLine {
                order_item_id: OrderItemId::new(),
                product_id: ProductId::new(),
                variant_id: VariantId::new(),
                unit_price: total,
                quantity: 1,
            }],
        };
        identity.register(order.id, buyer, seller);
        fees.set_fee(order.id, fee);
        orders.insert(order);
    }
    info!(%escrow, "demo marketplace seeded");
}
