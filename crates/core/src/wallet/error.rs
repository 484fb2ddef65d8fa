//! Wallet error types.

use rust_decimal::Decimal;
use thiserror::Error;

/// Errors that can occur during wallet operations.
///
/// Every variant aborts the triggering operation before any balance or
/// ledger write.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WalletError {
    /// Amount must be strictly positive.
    #[error("Amount must be positive")]
    NonPositiveAmount,

    /// Withdrawal or transfer exceeds the available balance.
    #[error("Insufficient balance: available {available}, requested {requested}")]
    InsufficientBalance {
        /// Balance at the time of the attempt.
        available: Decimal,
        /// Amount that was requested.
        requested: Decimal,
    },

    /// Transfers must move money between two distinct wallets.
    #[error("Cannot transfer a wallet to itself")]
    SelfTransfer,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_error_display() {
        let err = WalletError::InsufficientBalance {
            available: dec!(400),
            requested: dec!(600),
        };
        assert_eq!(
            err.to_string(),
            "Insufficient balance: available 400, requested 600"
        );
        assert_eq!(WalletError::NonPositiveAmount.to_string(), "Amount must be positive");
    }
}
