//! Ledger facade
//!
//! The public entry point: account creation, balance queries, and fund
//! transfers over one shared store.

use crate::accounts::{AccountId, AccountRepository};
use crate::config::Config;
use crate::engine::TransferEngine;
use crate::error::LedgerResult;
use crate::journal::{TransactionId, TransferJournal, TransferRecord};
use crate::store::Store;

/// A double-entry ledger backed by a transactional store
#[derive(Clone)]
pub struct Ledger {
    accounts: AccountRepository,
    engine: TransferEngine,
    journal: TransferJournal,
}

impl Ledger {
    /// Build a ledger over an existing store handle.
    pub fn new(store: Store, config: &Config) -> Self {
        Self {
            accounts: AccountRepository::new(store.clone()),
            engine: TransferEngine::new(store.clone(), config.transfer_timeout),
            journal: TransferJournal::new(store),
        }
    }

    /// Connect to the store in the configuration and build a ledger on it.
    pub async fn connect(config: &Config) -> LedgerResult<Self> {
        let store = Store::connect(config).await?;
        Ok(Self::new(store, config))
    }

    /// Create an account with a zero balance; returns its identifier.
    pub async fn create_account(&self, name: &str) -> LedgerResult<AccountId> {
        self.accounts.create_account(name).await
    }

    /// All current account identifiers.
    pub async fn list_account_ids(&self) -> LedgerResult<Vec<AccountId>> {
        self.accounts.list_account_ids().await
    }

    /// Committed balance of an account, in minor currency units.
    pub async fn balance(&self, account_id: AccountId) -> LedgerResult<i64> {
        self.accounts.balance(account_id).await
    }

    /// Atomically move funds between two accounts; returns the identifier
    /// of the appended transaction record. See [`TransferEngine::transfer`]
    /// for the full contract.
    pub async fn transfer(
        &self,
        debit_account_id: AccountId,
        credit_account_id: AccountId,
        amount: i64,
    ) -> LedgerResult<TransactionId> {
        self.engine
            .transfer(debit_account_id, credit_account_id, amount)
            .await
    }

    /// Committed transaction records touching an account, oldest first.
    pub async fn history(&self, account_id: AccountId) -> LedgerResult<Vec<TransferRecord>> {
        self.journal.entries_for_account(account_id).await
    }
}
