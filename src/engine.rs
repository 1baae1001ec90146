//! Transfer engine
//!
//! Orchestrates the full debit+credit+record sequence as one unit of work.
//! Either all three effects land together or none do: no partial debit, no
//! orphaned transaction record, no lost credit.
//!
//! The engine holds no in-process locks. Mutual exclusion is delegated to
//! the store: both balances are read with row locks, acquired in ascending
//! account-identifier order so two transfers over the same pair in opposite
//! directions cannot deadlock each other.

use std::time::Duration;

use crate::accounts::{AccountId, AccountRepository};
use crate::amount::Amount;
use crate::error::{LedgerError, LedgerResult};
use crate::journal::{TransactionId, TransferJournal};
use crate::store::Store;

/// Executes atomic transfers between accounts
#[derive(Clone)]
pub struct TransferEngine {
    accounts: AccountRepository,
    journal: TransferJournal,
    store: Store,
    timeout: Duration,
}

impl TransferEngine {
    pub fn new(store: Store, timeout: Duration) -> Self {
        Self {
            accounts: AccountRepository::new(store.clone()),
            journal: TransferJournal::new(store.clone()),
            store,
            timeout,
        }
    }

    /// Move `amount` minor units from the debit account to the credit
    /// account, appending one transaction record, all in one unit of work.
    ///
    /// Uses the engine's configured deadline; see [`transfer_with_timeout`]
    /// for a caller-supplied one.
    ///
    /// Same-account transfers are permitted: the sufficiency check still
    /// applies, a record is appended, and the balance is left untouched.
    ///
    /// # Errors
    /// - `InvalidArgument` if `amount <= 0` (the store is never touched)
    /// - `AccountNotFound` if either account does not exist
    /// - `InsufficientFunds` if the debit would drive the balance negative
    /// - `Storage` / `Timeout` on store failure or deadline expiry
    ///
    /// Every error path rolls the unit of work back in full before
    /// returning; a failed call has no observable side effects.
    ///
    /// [`transfer_with_timeout`]: Self::transfer_with_timeout
    pub async fn transfer(
        &self,
        debit_account_id: AccountId,
        credit_account_id: AccountId,
        amount: i64,
    ) -> LedgerResult<TransactionId> {
        self.transfer_with_timeout(debit_account_id, credit_account_id, amount, self.timeout)
            .await
    }

    /// [`transfer`](Self::transfer) with a caller-supplied deadline.
    ///
    /// On expiry the unit of work is dropped, which rolls it back and
    /// returns its connection to the pool; the transfer did not happen.
    pub async fn transfer_with_timeout(
        &self,
        debit_account_id: AccountId,
        credit_account_id: AccountId,
        amount: i64,
        timeout: Duration,
    ) -> LedgerResult<TransactionId> {
        let amount = Amount::new(amount)
            .map_err(|e| LedgerError::InvalidArgument(e.to_string()))?;

        tokio::time::timeout(
            timeout,
            self.transfer_inner(debit_account_id, credit_account_id, amount),
        )
        .await
        .map_err(|_| LedgerError::Timeout(timeout))?
    }

    async fn transfer_inner(
        &self,
        debit_account_id: AccountId,
        credit_account_id: AccountId,
        amount: Amount,
    ) -> LedgerResult<TransactionId> {
        let mut uow = self.store.begin().await?;

        // Lock both balance rows in ascending identifier order. Any early
        // return drops `uow`, rolling the whole unit of work back.
        let (first, second) = lock_order(debit_account_id, credit_account_id);
        let first_balance = self.accounts.balance_for_update(&mut uow, first).await?;
        let second_balance = if second == first {
            first_balance
        } else {
            self.accounts.balance_for_update(&mut uow, second).await?
        };

        let (debit_balance, credit_balance) = if debit_account_id == first {
            (first_balance, second_balance)
        } else {
            (second_balance, first_balance)
        };

        if debit_balance < amount.get() {
            return Err(LedgerError::InsufficientFunds {
                account: debit_account_id,
                balance: debit_balance,
                requested: amount.get(),
            });
        }

        // For a same-account transfer the self-debit and self-credit cancel,
        // so only the record is written.
        if debit_account_id != credit_account_id {
            let new_credit_balance =
                credit_balance.checked_add(amount.get()).ok_or_else(|| {
                    LedgerError::InvalidArgument(format!(
                        "credit balance of account {} would overflow",
                        credit_account_id
                    ))
                })?;

            self.accounts
                .set_balance(&mut uow, debit_account_id, debit_balance - amount.get())
                .await?;
            self.accounts
                .set_balance(&mut uow, credit_account_id, new_credit_balance)
                .await?;
        }

        let transaction_id = self
            .journal
            .record_transfer(&mut uow, debit_account_id, credit_account_id, amount)
            .await?;

        uow.commit().await?;

        tracing::debug!(
            transaction_id,
            debit_account_id,
            credit_account_id,
            amount = amount.get(),
            "transfer committed"
        );

        Ok(transaction_id)
    }
}

/// Deterministic lock-acquisition order: ascending account identifier.
fn lock_order(a: AccountId, b: AccountId) -> (AccountId, AccountId) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lock_order_ascending() {
        assert_eq!(lock_order(1, 2), (1, 2));
        assert_eq!(lock_order(2, 1), (1, 2));
        assert_eq!(lock_order(5, 5), (5, 5));
    }
}
