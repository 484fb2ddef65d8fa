//! Wallet service: the only writer of balances and ledger entries.
//!
//! Every wallet lives behind its own `tokio::sync::Mutex`, and a
//! read-modify-write plus its ledger append runs entirely inside that
//! critical section. `transfer` holds both wallet locks for the whole unit,
//! acquired in ascending owner-id order, so a debit can never commit without
//! its matching credit.

use std::sync::Arc;

use dashmap::DashMap;
use rust_decimal::Decimal;
use tokio::sync::Mutex;
use tracing::info;
use vendra_shared::types::{OrderId, OwnerId};

use super::account::WalletAccount;
use super::error::WalletError;
use super::types::{EntryKind, LedgerEntry, Owner, Wallet};

/// Owns all wallet balances and their ledgers.
///
/// Wallets are provisioned lazily on first access and never deleted.
#[derive(Debug, Default)]
pub struct WalletService {
    accounts: DashMap<OwnerId, Arc<Mutex<WalletAccount>>>,
}

impl WalletService {
    /// Creates an empty wallet service.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the owner's wallet, creating it with balance 0 if absent.
    pub async fn get_or_create(&self, owner: Owner) -> Wallet {
        let handle = self.handle(owner);
        let account = handle.lock().await;
        account.wallet().clone()
    }

    /// The owner's current balance. Unknown wallets read as zero.
    pub async fn balance(&self, owner_id: OwnerId) -> Decimal {
        match self.existing(owner_id) {
            Some(handle) => handle.lock().await.wallet().balance,
            None => Decimal::ZERO,
        }
    }

    /// The owner's ledger in append order. Unknown wallets read as empty.
    pub async fn entries(&self, owner_id: OwnerId) -> Vec<LedgerEntry> {
        match self.existing(owner_id) {
            Some(handle) => handle.lock().await.entries().to_vec(),
            None => Vec::new(),
        }
    }

    /// Credits a wallet and appends one entry of the caller-chosen kind.
    ///
    /// # Errors
    ///
    /// Returns `NonPositiveAmount` for zero or negative amounts.
    pub async fn deposit(
        &self,
        owner: Owner,
        amount: Decimal,
        kind: EntryKind,
        description: &str,
        related_order_id: Option<OrderId>,
    ) -> Result<Wallet, WalletError> {
        let handle = self.handle(owner);
        let mut account = handle.lock().await;
        let wallet = account.credit(amount, kind, description, related_order_id)?;
        info!(
            owner_id = %owner.id,
            kind = %kind,
            %amount,
            balance = %wallet.balance,
            "wallet credited"
        );
        Ok(wallet)
    }

    /// Debits a wallet and appends one entry of the caller-chosen kind.
    ///
    /// # Errors
    ///
    /// Returns `InsufficientBalance` when funds are too low and
    /// `NonPositiveAmount` for zero or negative amounts; in both cases no
    /// state changes.
    pub async fn withdraw(
        &self,
        owner: Owner,
        amount: Decimal,
        kind: EntryKind,
        description: &str,
        related_order_id: Option<OrderId>,
    ) -> Result<Wallet, WalletError> {
        let handle = self.handle(owner);
        let mut account = handle.lock().await;
        let wallet = account.debit(amount, kind, description, related_order_id)?;
        info!(
            owner_id = %owner.id,
            kind = %kind,
            %amount,
            balance = %wallet.balance,
            "wallet debited"
        );
        Ok(wallet)
    }

    /// Moves `amount` from one wallet to another as a single atomic unit.
    ///
    /// Both wallet locks are held for the duration: either the debit and the
    /// credit both commit, with one entry on each side, or neither does.
    ///
    /// # Errors
    ///
    /// Returns `SelfTransfer` when both owners are the same wallet,
    /// `NonPositiveAmount` for zero or negative amounts, and
    /// `InsufficientBalance` when the source cannot cover the amount.
    pub async fn transfer(
        &self,
        from: Owner,
        to: Owner,
        amount: Decimal,
        kind: EntryKind,
        description: &str,
        related_order_id: Option<OrderId>,
    ) -> Result<(Wallet, Wallet), WalletError> {
        if from.id == to.id {
            return Err(WalletError::SelfTransfer);
        }
        let from_handle = self.handle(from);
        let to_handle = self.handle(to);

        // Ascending owner-id order makes a lock cycle impossible.
        let (mut from_account, mut to_account) = if from.id < to.id {
            let f = from_handle.lock().await;
            let t = to_handle.lock().await;
            (f, t)
        } else {
            let t = to_handle.lock().await;
            let f = from_handle.lock().await;
            (f, t)
        };

        // The debit validates amount and funds; after it succeeds the credit
        // of the same amount cannot fail, so the unit is all-or-nothing.
        let from_wallet = from_account.debit(amount, kind, description, related_order_id)?;
        let to_wallet = to_account.credit(amount, kind, description, related_order_id)?;
        info!(
            from = %from.id,
            to = %to.id,
            kind = %kind,
            %amount,
            "transfer committed"
        );
        Ok((from_wallet, to_wallet))
    }

    /// Appends an informational `PlatformFee` entry with no balance effect.
    ///
    /// # Errors
    ///
    /// Returns `NonPositiveAmount` for zero or negative amounts.
    pub async fn record_fee(
        &self,
        owner: Owner,
        amount: Decimal,
        description: &str,
        related_order_id: Option<OrderId>,
    ) -> Result<(), WalletError> {
        let handle = self.handle(owner);
        let mut account = handle.lock().await;
        account.note_fee(amount, description, related_order_id)?;
        info!(owner_id = %owner.id, %amount, "platform fee recorded");
        Ok(())
    }

    /// Replay check: the balance equals the sum of balance-affecting entries.
    ///
    /// Unknown wallets trivially reconcile.
    pub async fn reconciles(&self, owner_id: OwnerId) -> bool {
        match self.existing(owner_id) {
            Some(handle) => handle.lock().await.reconciles(),
            None => true,
        }
    }

    fn handle(&self, owner: Owner) -> Arc<Mutex<WalletAccount>> {
        self.accounts
            .entry(owner.id)
            .or_insert_with(|| Arc::new(Mutex::new(WalletAccount::new(owner.id, owner.kind))))
            .clone()
    }

    fn existing(&self, owner_id: OwnerId) -> Option<Arc<Mutex<WalletAccount>>> {
        self.accounts.get(&owner_id).map(|entry| entry.value().clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wallet::types::OwnerKind;
    use rust_decimal_macros::dec;

    fn buyer() -> Owner {
        Owner::buyer(OwnerId::new())
    }

    #[tokio::test]
    async fn test_get_or_create_is_idempotent() {
        let service = WalletService::new();
        let owner = buyer();
        let first = service.get_or_create(owner).await;
        let second = service.get_or_create(owner).await;
        assert_eq!(first.id, second.id);
        assert_eq!(first.balance, Decimal::ZERO);
    }

    #[tokio::test]
    async fn test_unknown_wallet_reads_as_empty() {
        let service = WalletService::new();
        let owner = OwnerId::new();
        assert_eq!(service.balance(owner).await, Decimal::ZERO);
        assert!(service.entries(owner).await.is_empty());
        assert!(service.reconciles(owner).await);
    }

    #[tokio::test]
    async fn test_deposit_then_withdraw() {
        let service = WalletService::new();
        let owner = buyer();
        service
            .deposit(owner, dec!(1000), EntryKind::Deposit, "top-up", None)
            .await
            .unwrap();
        let wallet = service
            .withdraw(owner, dec!(300), EntryKind::Withdrawal, "cash out", None)
            .await
            .unwrap();
        assert_eq!(wallet.balance, dec!(700));
        assert_eq!(service.entries(owner.id).await.len(), 2);
        assert!(service.reconciles(owner.id).await);
    }

    #[tokio::test]
    async fn test_withdraw_more_than_balance_fails_clean() {
        let service = WalletService::new();
        let owner = buyer();
        service
            .deposit(owner, dec!(100), EntryKind::Deposit, "top-up", None)
            .await
            .unwrap();
        let err = service
            .withdraw(owner, dec!(101), EntryKind::Withdrawal, "over", None)
            .await
            .unwrap_err();
        assert!(matches!(err, WalletError::InsufficientBalance { .. }));
        assert_eq!(service.balance(owner.id).await, dec!(100));
        assert_eq!(service.entries(owner.id).await.len(), 1);
    }

    #[tokio::test]
    async fn test_transfer_writes_one_entry_per_side() {
        let service = WalletService::new();
        let from = buyer();
        let to = Owner::seller(OwnerId::new());
        service
            .deposit(from, dec!(500), EntryKind::Deposit, "top-up", None)
            .await
            .unwrap();

        let (from_wallet, to_wallet) = service
            .transfer(from, to, dec!(200), EntryKind::PaymentToSeller, "payout", None)
            .await
            .unwrap();
        assert_eq!(from_wallet.balance, dec!(300));
        assert_eq!(to_wallet.balance, dec!(200));

        let from_entries = service.entries(from.id).await;
        let to_entries = service.entries(to.id).await;
        assert_eq!(from_entries.len(), 2);
        assert_eq!(from_entries[1].amount, dec!(-200));
        assert_eq!(to_entries.len(), 1);
        assert_eq!(to_entries[0].amount, dec!(200));
    }

    #[tokio::test]
    async fn test_failed_transfer_leaves_both_sides_untouched() {
        let service = WalletService::new();
        let from = buyer();
        let to = Owner::seller(OwnerId::new());
        service
            .deposit(from, dec!(50), EntryKind::Deposit, "top-up", None)
            .await
            .unwrap();

        let err = service
            .transfer(from, to, dec!(200), EntryKind::PaymentToSeller, "payout", None)
            .await
            .unwrap_err();
        assert!(matches!(err, WalletError::InsufficientBalance { .. }));
        assert_eq!(service.balance(from.id).await, dec!(50));
        assert_eq!(service.balance(to.id).await, Decimal::ZERO);
        assert_eq!(service.entries(from.id).await.len(), 1);
        assert!(service.entries(to.id).await.is_empty());
    }

    #[tokio::test]
    async fn test_transfer_to_self_is_rejected() {
        let service = WalletService::new();
        let owner = buyer();
        service
            .deposit(owner, dec!(100), EntryKind::Deposit, "top-up", None)
            .await
            .unwrap();
        let err = service
            .transfer(
                owner,
                Owner {
                    id: owner.id,
                    kind: OwnerKind::Seller,
                },
                dec!(10),
                EntryKind::PaymentToSeller,
                "loop",
                None,
            )
            .await
            .unwrap_err();
        assert_eq!(err, WalletError::SelfTransfer);
    }

    #[tokio::test]
    async fn test_record_fee_keeps_balance() {
        let service = WalletService::new();
        let platform = Owner::platform(OwnerId::new());
        service
            .deposit(platform, dec!(1000), EntryKind::OrderPayment, "escrow", None)
            .await
            .unwrap();
        service
            .record_fee(platform, dec!(100), "fee revenue", None)
            .await
            .unwrap();
        assert_eq!(service.balance(platform.id).await, dec!(1000));
        assert_eq!(service.entries(platform.id).await.len(), 2);
        assert!(service.reconciles(platform.id).await);
    }
}
