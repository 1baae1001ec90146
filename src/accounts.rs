//! Account repository
//!
//! CRUD against the `accounts` and `balances` tables. An account and its
//! zero balance are created together in one unit of work; neither row ever
//! exists without the other.

use crate::error::{LedgerError, LedgerResult};
use crate::store::{Params, Store, UnitOfWork};

/// Store-assigned account identifier
pub type AccountId = i64;

/// Repository for accounts and their balance rows
#[derive(Clone)]
pub struct AccountRepository {
    store: Store,
}

impl AccountRepository {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    /// Create an account with a zero balance.
    ///
    /// Both rows land in one unit of work, and the generated identifier is
    /// returned directly from the insert, so no caller can observe an
    /// account without a balance and there is no read-after-insert race.
    pub async fn create_account(&self, name: &str) -> LedgerResult<AccountId> {
        if name.trim().is_empty() {
            return Err(LedgerError::InvalidArgument(
                "account name must not be empty".to_string(),
            ));
        }

        let mut uow = self.store.begin().await?;

        let account_id: AccountId = uow
            .fetch_scalar(
                "INSERT INTO accounts (name) VALUES ($1) RETURNING account_id",
                Params::new().bind(name),
            )
            .await?;

        uow.execute(
            "INSERT INTO balances (account_id, balance) VALUES ($1, 0)",
            Params::new().bind(account_id),
        )
        .await?;

        uow.commit().await?;

        tracing::debug!(account_id, name, "account created");
        Ok(account_id)
    }

    /// All current account identifiers, in store-defined order.
    /// Returns an empty list when no accounts exist.
    pub async fn list_account_ids(&self) -> LedgerResult<Vec<AccountId>> {
        self.store
            .fetch_all_scalar("SELECT account_id FROM accounts", Params::new())
            .await
    }

    /// Committed balance of an account, read outside any unit of work.
    pub async fn balance(&self, account_id: AccountId) -> LedgerResult<i64> {
        self.store
            .fetch_optional_scalar(
                "SELECT balance FROM balances WHERE account_id = $1",
                Params::new().bind(account_id),
            )
            .await?
            .ok_or(LedgerError::AccountNotFound(account_id))
    }

    /// Locking read of a balance inside an active unit of work.
    ///
    /// Holds a row lock until the unit of work ends, so a concurrent
    /// transfer touching the same account blocks here rather than
    /// interleaving its read and write.
    pub async fn balance_for_update(
        &self,
        uow: &mut UnitOfWork,
        account_id: AccountId,
    ) -> LedgerResult<i64> {
        uow.fetch_optional_scalar(
            "SELECT balance FROM balances WHERE account_id = $1 FOR UPDATE",
            Params::new().bind(account_id),
        )
        .await?
        .ok_or(LedgerError::AccountNotFound(account_id))
    }

    /// Overwrite a balance inside an active unit of work. The caller is
    /// responsible for invariant enforcement before calling.
    pub async fn set_balance(
        &self,
        uow: &mut UnitOfWork,
        account_id: AccountId,
        new_balance: i64,
    ) -> LedgerResult<()> {
        let rows = uow
            .execute(
                "UPDATE balances SET balance = $2 WHERE account_id = $1",
                Params::new().bind(account_id).bind(new_balance),
            )
            .await?;

        if rows == 0 {
            return Err(LedgerError::AccountNotFound(account_id));
        }

        Ok(())
    }
}
