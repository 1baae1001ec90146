//! Error handling module
//!
//! Centralized error types for the ledger core.

use std::time::Duration;

use crate::accounts::AccountId;

/// Ledger-wide Result type
pub type LedgerResult<T> = Result<T, LedgerError>;

/// Ledger error types
///
/// Every error is returned to the immediate caller; the core never retries
/// on its own. A failed operation leaves balances and the transaction table
/// exactly as they were: the enclosing unit of work is rolled back before
/// any error escapes.
#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    /// Malformed input, rejected before any store interaction
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Referenced account identifier does not exist
    #[error("Account not found: {0}")]
    AccountNotFound(AccountId),

    /// Debit would drive the balance negative
    #[error("Insufficient funds in account {account}: balance {balance}, requested {requested}")]
    InsufficientFunds {
        account: AccountId,
        balance: i64,
        requested: i64,
    },

    /// Connectivity, constraint, or lock failure at the store boundary
    #[error("Storage error: {0}")]
    Storage(#[from] sqlx::Error),

    /// Unit of work exceeded its deadline and was rolled back
    #[error("Unit of work timed out after {0:?}")]
    Timeout(Duration),
}

impl LedgerError {
    /// Check if this is a client error (bad input or business rule violation)
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidArgument(_)
                | Self::AccountNotFound(_)
                | Self::InsufficientFunds { .. }
        )
    }

    /// Check if this error originated at the store boundary.
    /// Retrying is the caller's decision: a transfer is not idempotent, and
    /// only the caller knows whether re-attempting is safe for its workload.
    pub fn is_storage_error(&self) -> bool {
        matches!(self, Self::Storage(_) | Self::Timeout(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insufficient_funds_error() {
        let err = LedgerError::InsufficientFunds {
            account: 7,
            balance: 50,
            requested: 100,
        };

        assert!(err.is_client_error());
        assert!(!err.is_storage_error());
        assert!(err.to_string().contains("50"));
        assert!(err.to_string().contains("100"));
    }

    #[test]
    fn test_timeout_is_storage_class() {
        let err = LedgerError::Timeout(Duration::from_secs(5));

        assert!(err.is_storage_error());
        assert!(!err.is_client_error());
    }

    #[test]
    fn test_account_not_found_error() {
        let err = LedgerError::AccountNotFound(42);

        assert!(err.is_client_error());
        assert!(err.to_string().contains("42"));
    }
}
