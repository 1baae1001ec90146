//! Common test utilities

#![allow(dead_code)]

use ledger_core::{store, AccountId, AccountRepository, Config, Ledger, Store};

pub struct TestContext {
    pub store: Store,
    pub ledger: Ledger,
    pub config: Config,
}

/// Connect to the test database and ensure the ledger schema exists.
///
/// Returns `None` when `DATABASE_URL` is not set so tests can skip instead
/// of failing on machines without a database. Tests create their own
/// accounts and only assert on those, so they are safe to run in parallel
/// against a shared database.
pub async fn setup() -> Option<TestContext> {
    dotenvy::dotenv().ok();
    let database_url = std::env::var("DATABASE_URL").ok()?;

    let config = Config::with_database_url(database_url);
    let store = Store::connect(&config)
        .await
        .expect("Failed to connect to DB");

    store::apply_schema(store.pool())
        .await
        .expect("Failed to apply ledger schema");

    let ledger = Ledger::new(store.clone(), &config);

    Some(TestContext {
        store,
        ledger,
        config,
    })
}

/// Set a balance directly, bypassing the transfer engine. Test seeding only.
pub async fn seed_balance(ctx: &TestContext, account_id: AccountId, balance: i64) {
    let accounts = AccountRepository::new(ctx.store.clone());

    let mut uow = ctx.store.begin().await.expect("Failed to begin");
    accounts
        .set_balance(&mut uow, account_id, balance)
        .await
        .expect("Failed to seed balance");
    uow.commit().await.expect("Failed to commit");
}
