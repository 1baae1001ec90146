//! Integration tests for the transfer engine: atomicity, conservation,
//! and the error contract.

use std::time::Duration;

use ledger_core::{LedgerError, TransferEngine};

mod common;

#[tokio::test]
async fn test_transfer_example_scenario() {
    let Some(ctx) = common::setup().await else {
        eprintln!("skipping: DATABASE_URL not set");
        return;
    };

    let a = ctx.ledger.create_account("scenario a").await.unwrap();
    let b = ctx.ledger.create_account("scenario b").await.unwrap();
    common::seed_balance(&ctx, a, 500).await;

    // First transfer succeeds and appends exactly one record.
    ctx.ledger.transfer(a, b, 200).await.unwrap();
    assert_eq!(ctx.ledger.balance(a).await.unwrap(), 300);
    assert_eq!(ctx.ledger.balance(b).await.unwrap(), 200);

    let history = ctx.ledger.history(a).await.unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].debit_account_id, a);
    assert_eq!(history[0].credit_account_id, b);
    assert_eq!(history[0].amount, 200);

    // Second transfer overdraws and must leave everything untouched.
    let result = ctx.ledger.transfer(a, b, 400).await;
    assert!(matches!(
        result,
        Err(LedgerError::InsufficientFunds {
            balance: 300,
            requested: 400,
            ..
        })
    ));

    assert_eq!(ctx.ledger.balance(a).await.unwrap(), 300);
    assert_eq!(ctx.ledger.balance(b).await.unwrap(), 200);
    assert_eq!(ctx.ledger.history(a).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_transfer_rejects_non_positive_amount() {
    let Some(ctx) = common::setup().await else {
        eprintln!("skipping: DATABASE_URL not set");
        return;
    };

    let a = ctx.ledger.create_account("non-positive a").await.unwrap();
    let b = ctx.ledger.create_account("non-positive b").await.unwrap();
    common::seed_balance(&ctx, a, 100).await;

    for amount in [0, -5] {
        let result = ctx.ledger.transfer(a, b, amount).await;
        assert!(matches!(result, Err(LedgerError::InvalidArgument(_))));
    }

    assert_eq!(ctx.ledger.balance(a).await.unwrap(), 100);
    assert_eq!(ctx.ledger.balance(b).await.unwrap(), 0);
    assert!(ctx.ledger.history(a).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_transfer_unknown_account_has_no_side_effects() {
    let Some(ctx) = common::setup().await else {
        eprintln!("skipping: DATABASE_URL not set");
        return;
    };

    let a = ctx.ledger.create_account("unknown peer").await.unwrap();
    common::seed_balance(&ctx, a, 50).await;

    let result = ctx.ledger.transfer(a, 0, 10).await;
    assert!(matches!(result, Err(LedgerError::AccountNotFound(0))));

    let result = ctx.ledger.transfer(0, a, 10).await;
    assert!(matches!(result, Err(LedgerError::AccountNotFound(0))));

    assert_eq!(ctx.ledger.balance(a).await.unwrap(), 50);
    assert!(ctx.ledger.history(a).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_transfers_conserve_total_funds() {
    let Some(ctx) = common::setup().await else {
        eprintln!("skipping: DATABASE_URL not set");
        return;
    };

    let mut accounts = Vec::new();
    for i in 0..3 {
        let id = ctx
            .ledger
            .create_account(&format!("conservation {}", i))
            .await
            .unwrap();
        common::seed_balance(&ctx, id, 1_000).await;
        accounts.push(id);
    }

    for (debit, credit, amount) in [
        (accounts[0], accounts[1], 700),
        (accounts[1], accounts[2], 1_500),
        (accounts[2], accounts[0], 300),
        (accounts[2], accounts[1], 900),
    ] {
        ctx.ledger.transfer(debit, credit, amount).await.unwrap();
    }

    let mut total = 0;
    for &id in &accounts {
        let balance = ctx.ledger.balance(id).await.unwrap();
        assert!(balance >= 0);
        total += balance;
    }
    assert_eq!(total, 3_000);
}

#[tokio::test]
async fn test_same_account_transfer_is_a_balance_noop() {
    let Some(ctx) = common::setup().await else {
        eprintln!("skipping: DATABASE_URL not set");
        return;
    };

    let x = ctx.ledger.create_account("self transfer").await.unwrap();
    common::seed_balance(&ctx, x, 100).await;

    // Debit and credit cancel, but the record is still appended.
    ctx.ledger.transfer(x, x, 40).await.unwrap();
    assert_eq!(ctx.ledger.balance(x).await.unwrap(), 100);

    let history = ctx.ledger.history(x).await.unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].debit_account_id, x);
    assert_eq!(history[0].credit_account_id, x);
    assert_eq!(history[0].amount, 40);

    // Sufficiency is still enforced.
    let result = ctx.ledger.transfer(x, x, 200).await;
    assert!(matches!(result, Err(LedgerError::InsufficientFunds { .. })));
    assert_eq!(ctx.ledger.balance(x).await.unwrap(), 100);
}

#[tokio::test]
async fn test_transfer_deadline_expiry_is_rolled_back() {
    let Some(ctx) = common::setup().await else {
        eprintln!("skipping: DATABASE_URL not set");
        return;
    };

    let a = ctx.ledger.create_account("deadline a").await.unwrap();
    let b = ctx.ledger.create_account("deadline b").await.unwrap();
    common::seed_balance(&ctx, a, 100).await;

    let engine = TransferEngine::new(ctx.store.clone(), ctx.config.transfer_timeout);
    let result = engine
        .transfer_with_timeout(a, b, 10, Duration::from_nanos(1))
        .await;
    assert!(matches!(result, Err(LedgerError::Timeout(_))));

    // "Did not happen": balances and journal are untouched.
    assert_eq!(ctx.ledger.balance(a).await.unwrap(), 100);
    assert_eq!(ctx.ledger.balance(b).await.unwrap(), 0);
    assert!(ctx.ledger.history(a).await.unwrap().is_empty());
}
