//! Boundary contracts to the rest of the marketplace.
//!
//! Everything outside the financial core sits behind one of these traits:
//! orders, inventory, the payment gateway, identity, and the fee schedule.
//! In-memory adapters live in [`memory`].

pub mod fees;
pub mod gateway;
pub mod identity;
pub mod inventory;
pub mod memory;
pub mod order;

pub use fees::{FeeSchedule, FlatRateFee, RecordedFees};
pub use gateway::{GatewayError, PaymentGateway};
pub use identity::{Identity, IdentityError, OrderParties};
pub use inventory::{Inventory, InventoryError};
pub use order::{
    OrderDirectory, OrderLine, OrderSnapshot, OrderStatus, OrderStoreError, PaymentMethod,
    PaymentStatus,
};
