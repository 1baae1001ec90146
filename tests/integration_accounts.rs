//! Integration tests for account creation and queries

use ledger_core::LedgerError;

mod common;

#[tokio::test]
async fn test_create_account_has_zero_balance() {
    let Some(ctx) = common::setup().await else {
        eprintln!("skipping: DATABASE_URL not set");
        return;
    };

    let account_id = ctx
        .ledger
        .create_account("co-creation check")
        .await
        .unwrap();

    // The balance row must be visible together with the account.
    let balance = ctx.ledger.balance(account_id).await.unwrap();
    assert_eq!(balance, 0);
}

#[tokio::test]
async fn test_create_account_rejects_empty_name() {
    let Some(ctx) = common::setup().await else {
        eprintln!("skipping: DATABASE_URL not set");
        return;
    };

    let result = ctx.ledger.create_account("   ").await;
    assert!(matches!(result, Err(LedgerError::InvalidArgument(_))));
}

#[tokio::test]
async fn test_list_account_ids_contains_new_accounts() {
    let Some(ctx) = common::setup().await else {
        eprintln!("skipping: DATABASE_URL not set");
        return;
    };

    let a = ctx.ledger.create_account("list check a").await.unwrap();
    let b = ctx.ledger.create_account("list check b").await.unwrap();

    let ids = ctx.ledger.list_account_ids().await.unwrap();
    assert!(ids.contains(&a));
    assert!(ids.contains(&b));
}

#[tokio::test]
async fn test_balance_of_unknown_account() {
    let Some(ctx) = common::setup().await else {
        eprintln!("skipping: DATABASE_URL not set");
        return;
    };

    // Identifiers are assigned from 1, so 0 never exists.
    let result = ctx.ledger.balance(0).await;
    assert!(matches!(result, Err(LedgerError::AccountNotFound(0))));
}
