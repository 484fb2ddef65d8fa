//! Property tests for the wallet ledger.
//!
//! Validates the reconciliation invariant: a wallet's balance always equals
//! the replayed sum of its balance-affecting entries, no matter what
//! sequence of operations ran or failed.

use proptest::prelude::*;
use rust_decimal::Decimal;
use vendra_shared::types::OwnerId;

use super::account::WalletAccount;
use super::types::{EntryKind, OwnerKind};

/// A single wallet operation for property runs.
#[derive(Debug, Clone)]
enum Op {
    Credit(Decimal),
    Debit(Decimal),
    Fee(Decimal),
}

fn amount_strategy() -> impl Strategy<Value = Decimal> {
    // Minor units between 1 and 100_000; zero/negative inputs are covered by
    // dedicated rejection tests.
    (1i64..100_000i64).prop_map(|n| Decimal::new(n, 0))
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        amount_strategy().prop_map(Op::Credit),
        amount_strategy().prop_map(Op::Debit),
        amount_strategy().prop_map(Op::Fee),
    ]
}

fn ops_strategy(max_len: usize) -> impl Strategy<Value = Vec<Op>> {
    prop::collection::vec(op_strategy(), 1..=max_len)
}

fn apply(account: &mut WalletAccount, op: &Op) -> bool {
    match op {
        Op::Credit(amount) => account
            .credit(*amount, EntryKind::Deposit, "prop credit", None)
            .is_ok(),
        Op::Debit(amount) => account
            .debit(*amount, EntryKind::Withdrawal, "prop debit", None)
            .is_ok(),
        Op::Fee(amount) => account.note_fee(*amount, "prop fee", None).is_ok(),
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// After any operation sequence the balance equals the replayed ledger.
    #[test]
    fn prop_balance_reconciles_after_any_sequence(ops in ops_strategy(40)) {
        let mut account = WalletAccount::new(OwnerId::new(), OwnerKind::Buyer);
        for op in &ops {
            apply(&mut account, op);
            prop_assert!(account.reconciles());
        }
    }

    /// The balance never goes negative, whatever the debit pressure.
    #[test]
    fn prop_balance_never_negative(ops in ops_strategy(40)) {
        let mut account = WalletAccount::new(OwnerId::new(), OwnerKind::Seller);
        for op in &ops {
            apply(&mut account, op);
            prop_assert!(account.wallet().balance >= Decimal::ZERO);
        }
    }

    /// A rejected debit leaves balance and ledger exactly as they were.
    #[test]
    fn prop_failed_debit_changes_nothing(
        credit in amount_strategy(),
        extra in amount_strategy(),
    ) {
        let mut account = WalletAccount::new(OwnerId::new(), OwnerKind::Buyer);
        account.credit(credit, EntryKind::Deposit, "seed", None).unwrap();

        let before_balance = account.wallet().balance;
        let before_entries = account.entries().len();

        let result = account.debit(credit + extra, EntryKind::Withdrawal, "over", None);
        prop_assert!(result.is_err());
        prop_assert_eq!(account.wallet().balance, before_balance);
        prop_assert_eq!(account.entries().len(), before_entries);
    }

    /// Fee notes accumulate in the ledger without ever moving the balance.
    #[test]
    fn prop_fees_never_move_balance(
        credit in amount_strategy(),
        fees in prop::collection::vec(amount_strategy(), 1..10),
    ) {
        let mut account = WalletAccount::new(OwnerId::new(), OwnerKind::Platform);
        account.credit(credit, EntryKind::OrderPayment, "escrow", None).unwrap();

        for fee in &fees {
            account.note_fee(*fee, "fee", None).unwrap();
        }

        prop_assert_eq!(account.wallet().balance, credit);
        prop_assert_eq!(account.entries().len(), 1 + fees.len());
        prop_assert!(account.reconciles());
    }

    /// Successful ops append exactly one entry; the ledger never shrinks.
    #[test]
    fn prop_ledger_is_append_only(ops in ops_strategy(40)) {
        let mut account = WalletAccount::new(OwnerId::new(), OwnerKind::Buyer);
        let mut expected = 0usize;
        for op in &ops {
            if apply(&mut account, op) {
                expected += 1;
            }
            prop_assert_eq!(account.entries().len(), expected);
        }
    }
}
