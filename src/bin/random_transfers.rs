//! Synthetic transfer workload
//!
//! Issues random transfers between existing accounts. Failed transfers are
//! counted, not retried; the ledger guarantees a failed transfer has no
//! side effects.
//!
//! Run with: cargo run --bin random_transfers --release -- --transfers 1000

use std::time::Instant;

use rand::Rng;

use ledger_core::{Config, Ledger, LedgerError};

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
    let transfer_count: u64 = args
        .iter()
        .position(|a| a == "--transfers")
        .and_then(|i| args.get(i + 1))
        .and_then(|s| s.parse().ok())
        .unwrap_or(1000);

    let config = Config::from_env()?;

    println!("Running {} random transfers", transfer_count);
    println!("Connecting to database...");

    let ledger = Ledger::connect(&config).await?;

    let account_ids = ledger.list_account_ids().await?;
    if account_ids.len() < 2 {
        anyhow::bail!("Need at least two accounts. Did you run create_accounts?");
    }

    let mut rng = rand::thread_rng();
    let start = Instant::now();

    let mut transferred = 0u64;
    let mut insufficient = 0u64;
    let mut failed = 0u64;

    for i in 0..transfer_count {
        let debit_account_id = account_ids[rng.gen_range(0..account_ids.len())];
        let mut credit_account_id = debit_account_id;
        while credit_account_id == debit_account_id {
            credit_account_id = account_ids[rng.gen_range(0..account_ids.len())];
        }
        let amount = rng.gen_range(100..=1000);

        match ledger
            .transfer(debit_account_id, credit_account_id, amount)
            .await
        {
            Ok(_) => transferred += 1,
            Err(LedgerError::InsufficientFunds { .. }) => insufficient += 1,
            Err(e) => {
                failed += 1;
                tracing::warn!(error = %e, "transfer failed");
            }
        }

        if (i + 1) % 1000 == 0 {
            println!("Attempted {} transfers...", i + 1);
        }
    }

    let elapsed = start.elapsed();
    let rate = transfer_count as f64 / elapsed.as_secs_f64();

    println!("\n=== Workload Results ===");
    println!("Attempted: {}", transfer_count);
    println!("Committed: {}", transferred);
    println!("Insufficient funds: {}", insufficient);
    println!("Storage failures: {}", failed);
    println!("Time: {:.2}s", elapsed.as_secs_f64());
    println!("Rate: {:.0} transfers/sec", rate);

    Ok(())
}
