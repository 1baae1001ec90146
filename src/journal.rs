//! Transfer journal
//!
//! Append-only access to the `transactions` table. Rows are immutable once
//! written; the journal never moves funds itself.

use chrono::{DateTime, Utc};

use crate::accounts::AccountId;
use crate::amount::Amount;
use crate::error::LedgerResult;
use crate::store::{Params, Store, UnitOfWork};

/// Store-assigned transaction identifier
pub type TransactionId = i64;

/// One immutable transfer record
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct TransferRecord {
    pub transaction_id: TransactionId,
    pub debit_account_id: AccountId,
    pub credit_account_id: AccountId,
    pub amount: i64,
    pub created_at: DateTime<Utc>,
}

/// Append-only journal over the `transactions` table
#[derive(Clone)]
pub struct TransferJournal {
    store: Store,
}

impl TransferJournal {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    /// Append one transfer record inside the caller's unit of work.
    ///
    /// Takes a validated [`Amount`], so a non-positive amount cannot reach
    /// the insert. Returns the generated transaction identifier.
    pub async fn record_transfer(
        &self,
        uow: &mut UnitOfWork,
        debit_account_id: AccountId,
        credit_account_id: AccountId,
        amount: Amount,
    ) -> LedgerResult<TransactionId> {
        uow.fetch_scalar(
            r#"
            INSERT INTO transactions (debit_account_id, credit_account_id, amount)
            VALUES ($1, $2, $3)
            RETURNING transaction_id
            "#,
            Params::new()
                .bind(debit_account_id)
                .bind(credit_account_id)
                .bind(amount.get()),
        )
        .await
    }

    /// All committed records that debit or credit the given account,
    /// oldest first. Read-only, used for inspection and tests.
    pub async fn entries_for_account(
        &self,
        account_id: AccountId,
    ) -> LedgerResult<Vec<TransferRecord>> {
        self.store
            .fetch_all_rows(
                r#"
                SELECT transaction_id, debit_account_id, credit_account_id, amount, created_at
                FROM transactions
                WHERE debit_account_id = $1 OR credit_account_id = $1
                ORDER BY transaction_id ASC
                "#,
                Params::new().bind(account_id),
            )
            .await
    }
}
