//! Wallet and ledger domain types.
//!
//! Amounts are `rust_decimal::Decimal` in currency minor units. Ledger
//! entries carry signed amounts: credits are positive, debits negative.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use vendra_shared::types::{LedgerEntryId, OrderId, OwnerId, WalletId};

/// Kind of party a wallet belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OwnerKind {
    /// A buyer's wallet.
    Buyer,
    /// A seller's wallet.
    Seller,
    /// The single platform/escrow wallet.
    Platform,
}

impl OwnerKind {
    /// Returns the string representation of the owner kind.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Buyer => "buyer",
            Self::Seller => "seller",
            Self::Platform => "platform",
        }
    }
}

impl std::fmt::Display for OwnerKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A wallet owner reference: the id plus the kind used for lazy creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Owner {
    /// The owner's id.
    pub id: OwnerId,
    /// What kind of party the owner is.
    pub kind: OwnerKind,
}

impl Owner {
    /// A buyer owner reference.
    #[must_use]
    pub const fn buyer(id: OwnerId) -> Self {
        Self {
            id,
            kind: OwnerKind::Buyer,
        }
    }

    /// A seller owner reference.
    #[must_use]
    pub const fn seller(id: OwnerId) -> Self {
        Self {
            id,
            kind: OwnerKind::Seller,
        }
    }

    /// The platform owner reference.
    #[must_use]
    pub const fn platform(id: OwnerId) -> Self {
        Self {
            id,
            kind: OwnerKind::Platform,
        }
    }
}

/// Semantic type of a ledger entry.
///
/// The kind labels what the movement was for; the sign of the entry amount
/// records the direction. `PlatformFee` is the one informational kind: it
/// records fee revenue without moving balance and is excluded from the
/// reconciliation sum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryKind {
    /// Funds paid into a wallet from outside the marketplace.
    Deposit,
    /// Funds taken out of a wallet to outside the marketplace.
    Withdrawal,
    /// Buyer compensation for an accepted refund.
    Refund,
    /// An order payment moving into escrow.
    OrderPayment,
    /// Escrowed funds released to a seller at settlement.
    PaymentToSeller,
    /// Informational record of platform fee revenue.
    PlatformFee,
}

impl EntryKind {
    /// Returns the string representation of the entry kind.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Deposit => "deposit",
            Self::Withdrawal => "withdrawal",
            Self::Refund => "refund",
            Self::OrderPayment => "order_payment",
            Self::PaymentToSeller => "payment_to_seller",
            Self::PlatformFee => "platform_fee",
        }
    }

    /// Whether entries of this kind participate in the balance.
    ///
    /// `PlatformFee` entries are informational only; every other kind moves
    /// money and counts toward the reconciliation sum.
    #[must_use]
    pub fn affects_balance(&self) -> bool {
        !matches!(self, Self::PlatformFee)
    }
}

impl std::fmt::Display for EntryKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A party's wallet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Wallet {
    /// Unique identifier for the wallet.
    pub id: WalletId,
    /// The owning party.
    pub owner_id: OwnerId,
    /// What kind of party the owner is.
    pub owner_kind: OwnerKind,
    /// Current balance in currency minor units. Never negative.
    pub balance: Decimal,
}

impl Wallet {
    /// Creates an empty wallet for an owner.
    #[must_use]
    pub fn new(owner_id: OwnerId, owner_kind: OwnerKind) -> Self {
        Self {
            id: WalletId::new(),
            owner_id,
            owner_kind,
            balance: Decimal::ZERO,
        }
    }
}

/// An immutable record of a single wallet event.
///
/// Entries are append-only: once written they are never updated or deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerEntry {
    /// Unique identifier for this entry.
    pub id: LedgerEntryId,
    /// The wallet this entry belongs to.
    pub wallet_id: WalletId,
    /// Semantic type of the movement.
    pub kind: EntryKind,
    /// Signed amount: positive for credits, negative for debits.
    pub amount: Decimal,
    /// Human-readable description of the event.
    pub description: String,
    /// The order this movement relates to, if any.
    pub related_order_id: Option<OrderId>,
    /// When the entry was written.
    pub created_at: DateTime<Utc>,
}

impl LedgerEntry {
    /// The entry's contribution to the wallet balance.
    ///
    /// Informational kinds contribute zero regardless of their amount.
    #[must_use]
    pub fn balance_effect(&self) -> Decimal {
        if self.kind.affects_balance() {
            self.amount
        } else {
            Decimal::ZERO
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_entry_kind_as_str() {
        assert_eq!(EntryKind::Deposit.as_str(), "deposit");
        assert_eq!(EntryKind::Withdrawal.as_str(), "withdrawal");
        assert_eq!(EntryKind::Refund.as_str(), "refund");
        assert_eq!(EntryKind::OrderPayment.as_str(), "order_payment");
        assert_eq!(EntryKind::PaymentToSeller.as_str(), "payment_to_seller");
        assert_eq!(EntryKind::PlatformFee.as_str(), "platform_fee");
    }

    #[test]
    fn test_only_platform_fee_is_informational() {
        assert!(EntryKind::Deposit.affects_balance());
        assert!(EntryKind::Withdrawal.affects_balance());
        assert!(EntryKind::Refund.affects_balance());
        assert!(EntryKind::OrderPayment.affects_balance());
        assert!(EntryKind::PaymentToSeller.affects_balance());
        assert!(!EntryKind::PlatformFee.affects_balance());
    }

    #[test]
    fn test_balance_effect_zeroes_fee_entries() {
        let wallet = Wallet::new(OwnerId::new(), OwnerKind::Platform);
        let entry = LedgerEntry {
            id: LedgerEntryId::new(),
            wallet_id: wallet.id,
            kind: EntryKind::PlatformFee,
            amount: dec!(20000),
            description: "fee".to_string(),
            related_order_id: None,
            created_at: Utc::now(),
        };
        assert_eq!(entry.balance_effect(), Decimal::ZERO);

        let credit = LedgerEntry {
            kind: EntryKind::Deposit,
            ..entry
        };
        assert_eq!(credit.balance_effect(), dec!(20000));
    }

    #[test]
    fn test_new_wallet_starts_empty() {
        let owner = OwnerId::new();
        let wallet = Wallet::new(owner, OwnerKind::Buyer);
        assert_eq!(wallet.owner_id, owner);
        assert_eq!(wallet.balance, Decimal::ZERO);
    }
}
