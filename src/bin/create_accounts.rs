//! Account seeding tool
//!
//! Run with: cargo run --bin create_accounts --release -- --accounts 100

use std::sync::Arc;
use std::time::Instant;

use ledger_core::{store, Config, Ledger, Store, TracingObserver};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ledger_core=info".into()),
        )
        .init();

    let args: Vec<String> = std::env::args().collect();
    let account_count: u64 = args
        .iter()
        .position(|a| a == "--accounts")
        .and_then(|i| args.get(i + 1))
        .and_then(|s| s.parse().ok())
        .unwrap_or(100);

    let config = Config::from_env()?;

    println!("Seeding {} accounts", account_count);
    println!("Connecting to database...");

    let store = Store::connect(&config)
        .await?
        .with_observer(Arc::new(TracingObserver));

    if !store::check_schema(store.pool()).await? {
        anyhow::bail!(
            "Ledger schema is missing. Apply migrations/0001_create_ledger.sql first."
        );
    }

    let ledger = Ledger::new(store, &config);

    let start = Instant::now();

    for i in 0..account_count {
        let name = format!("test_account_{:04}", i);
        ledger.create_account(&name).await?;

        if (i + 1) % 1000 == 0 {
            println!("Created {} accounts...", i + 1);
        }
    }

    let elapsed = start.elapsed();
    let rate = account_count as f64 / elapsed.as_secs_f64();

    println!("\n=== Seeding Results ===");
    println!("Accounts created: {}", account_count);
    println!("Time: {:.2}s", elapsed.as_secs_f64());
    println!("Rate: {:.0} accounts/sec", rate);

    Ok(())
}
