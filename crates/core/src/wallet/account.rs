//! A wallet account: balance plus its append-only entry log, mutated as one
//! unit.
//!
//! `WalletAccount` is the storage record behind the per-wallet lock. All
//! methods are synchronous; the service layer guarantees exclusive access
//! while they run, so a balance is never observable without its entry.

use chrono::Utc;
use rust_decimal::Decimal;
use vendra_shared::types::{LedgerEntryId, OrderId, OwnerId};

use super::error::WalletError;
use super::types::{EntryKind, LedgerEntry, OwnerKind, Wallet};

/// A wallet together with its ledger.
#[derive(Debug, Clone)]
pub struct WalletAccount {
    wallet: Wallet,
    entries: Vec<LedgerEntry>,
}

impl WalletAccount {
    /// Creates an empty account for an owner.
    #[must_use]
    pub fn new(owner_id: OwnerId, owner_kind: OwnerKind) -> Self {
        Self {
            wallet: Wallet::new(owner_id, owner_kind),
            entries: Vec::new(),
        }
    }

    /// The wallet snapshot.
    #[must_use]
    pub fn wallet(&self) -> &Wallet {
        &self.wallet
    }

    /// The ledger, in append order.
    #[must_use]
    pub fn entries(&self) -> &[LedgerEntry] {
        &self.entries
    }

    /// Increases the balance and appends one credit entry.
    ///
    /// # Errors
    ///
    /// Returns `NonPositiveAmount` for zero or negative amounts, without
    /// touching balance or ledger.
    pub fn credit(
        &mut self,
        amount: Decimal,
        kind: EntryKind,
        description: &str,
        related_order_id: Option<OrderId>,
    ) -> Result<Wallet, WalletError> {
        if amount <= Decimal::ZERO {
            return Err(WalletError::NonPositiveAmount);
        }
        self.wallet.balance += amount;
        self.append(kind, amount, description, related_order_id);
        Ok(self.wallet.clone())
    }

    /// Decreases the balance and appends one debit entry (negative amount).
    ///
    /// # Errors
    ///
    /// Returns `NonPositiveAmount` for zero or negative amounts and
    /// `InsufficientBalance` when the balance cannot cover the amount. In
    /// both cases balance and ledger are unchanged.
    pub fn debit(
        &mut self,
        amount: Decimal,
        kind: EntryKind,
        description: &str,
        related_order_id: Option<OrderId>,
    ) -> Result<Wallet, WalletError> {
        if amount <= Decimal::ZERO {
            return Err(WalletError::NonPositiveAmount);
        }
        if self.wallet.balance < amount {
            return Err(WalletError::InsufficientBalance {
                available: self.wallet.balance,
                requested: amount,
            });
        }
        self.wallet.balance -= amount;
        self.append(kind, -amount, description, related_order_id);
        Ok(self.wallet.clone())
    }

    /// Appends an informational `PlatformFee` entry with no balance effect.
    ///
    /// # Errors
    ///
    /// Returns `NonPositiveAmount` for zero or negative amounts.
    pub fn note_fee(
        &mut self,
        amount: Decimal,
        description: &str,
        related_order_id: Option<OrderId>,
    ) -> Result<(), WalletError> {
        if amount <= Decimal::ZERO {
            return Err(WalletError::NonPositiveAmount);
        }
        self.append(EntryKind::PlatformFee, amount, description, related_order_id);
        Ok(())
    }

    /// Whether the balance equals the replayed sum of its entries.
    ///
    /// Informational entries contribute zero to the sum.
    #[must_use]
    pub fn reconciles(&self) -> bool {
        self.wallet.balance == self.replayed_balance()
    }

    /// The balance implied by the ledger alone.
    #[must_use]
    pub fn replayed_balance(&self) -> Decimal {
        self.entries.iter().map(LedgerEntry::balance_effect).sum()
    }

    fn append(
        &mut self,
        kind: EntryKind,
        amount: Decimal,
        description: &str,
        related_order_id: Option<OrderId>,
    ) {
        self.entries.push(LedgerEntry {
            id: LedgerEntryId::new(),
            wallet_id: self.wallet.id,
            kind,
            amount,
            description: description.to_string(),
            related_order_id,
            created_at: Utc::now(),
        });
    }
}
