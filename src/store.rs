//! Storage adapter
//!
//! Thin wrapper over the PostgreSQL pool: pooled connections, unit-of-work
//! lifecycle, and strictly parameterized statement execution. No business
//! logic lives here.
//!
//! Statement text and values travel separately everywhere: every adapter
//! method takes the SQL and a [`Params`] of bind values, so raw values can
//! never end up interpolated into statement text.

use std::sync::Arc;
use std::time::Duration;

use sqlx::postgres::{PgArguments, PgPoolOptions, PgRow};
use sqlx::{Arguments, Executor, PgPool, Postgres, Transaction};

use crate::config::Config;
use crate::error::LedgerResult;

/// Embedded schema, kept as a raw SQL file in migrations/
const SCHEMA_SQL: &str = include_str!("../migrations/0001_create_ledger.sql");

/// Bind parameters for one statement.
///
/// Values are encoded into the wire buffer as they are bound; they never
/// touch the statement text.
#[derive(Default)]
pub struct Params(PgArguments);

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind the next positional parameter ($1, $2, ...).
    pub fn bind<'q, T>(mut self, value: T) -> Self
    where
        T: 'q + Send + sqlx::Encode<'q, Postgres> + sqlx::Type<Postgres>,
    {
        self.0.add(value);
        self
    }

    fn into_arguments(self) -> PgArguments {
        self.0
    }
}

/// Observer for statement execution. Injected into the store by callers
/// that want statement-level logging; the core itself emits nothing here.
pub trait StatementObserver: Send + Sync {
    /// Called with the statement text (never the bound values) before
    /// the statement runs.
    fn on_statement(&self, sql: &str);
}

/// Observer that emits each statement at DEBUG level via `tracing`.
#[derive(Debug, Default)]
pub struct TracingObserver;

impl StatementObserver for TracingObserver {
    fn on_statement(&self, sql: &str) {
        tracing::debug!(statement = sql, "executing statement");
    }
}

/// Handle to the transactional store.
///
/// Cloning is cheap; all clones share one connection pool.
#[derive(Clone)]
pub struct Store {
    pool: PgPool,
    observer: Option<Arc<dyn StatementObserver>>,
    lock_timeout: Duration,
}

impl Store {
    /// Connect to the store described by the configuration.
    pub async fn connect(config: &Config) -> LedgerResult<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(config.database_max_connections)
            .connect(&config.database_url)
            .await?;

        Ok(Self::new(pool, config.lock_timeout))
    }

    /// Wrap an existing pool.
    pub fn new(pool: PgPool, lock_timeout: Duration) -> Self {
        Self {
            pool,
            observer: None,
            lock_timeout,
        }
    }

    /// Attach a statement observer.
    pub fn with_observer(mut self, observer: Arc<dyn StatementObserver>) -> Self {
        self.observer = Some(observer);
        self
    }

    /// The underlying pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Open a unit of work on a pooled connection.
    ///
    /// The configured lock deadline is applied with transaction scope, so a
    /// blocked locking read aborts the unit of work instead of waiting
    /// forever. `set_config` keeps the deadline value a bind parameter.
    pub async fn begin(&self) -> LedgerResult<UnitOfWork> {
        let mut tx = self.pool.begin().await?;

        let millis = self.lock_timeout.as_millis().to_string();
        sqlx::query("SELECT set_config('lock_timeout', $1, true)")
            .bind(&millis)
            .execute(&mut *tx)
            .await?;

        Ok(UnitOfWork {
            tx,
            observer: self.observer.clone(),
        })
    }

    /// Read a column of scalars outside any unit of work (committed data).
    pub async fn fetch_all_scalar<T>(&self, sql: &str, params: Params) -> LedgerResult<Vec<T>>
    where
        T: Send + Unpin,
        (T,): Send + Unpin + for<'r> sqlx::FromRow<'r, PgRow>,
    {
        self.observe(sql);
        Ok(sqlx::query_scalar_with(sql, params.into_arguments())
            .fetch_all(&self.pool)
            .await?)
    }

    /// Read a single optional scalar outside any unit of work.
    pub async fn fetch_optional_scalar<T>(
        &self,
        sql: &str,
        params: Params,
    ) -> LedgerResult<Option<T>>
    where
        T: Send + Unpin,
        (T,): Send + Unpin + for<'r> sqlx::FromRow<'r, PgRow>,
    {
        self.observe(sql);
        Ok(sqlx::query_scalar_with(sql, params.into_arguments())
            .fetch_optional(&self.pool)
            .await?)
    }

    /// Read full rows outside any unit of work.
    pub async fn fetch_all_rows<T>(&self, sql: &str, params: Params) -> LedgerResult<Vec<T>>
    where
        T: Send + Unpin + for<'r> sqlx::FromRow<'r, PgRow>,
    {
        self.observe(sql);
        Ok(sqlx::query_as_with(sql, params.into_arguments())
            .fetch_all(&self.pool)
            .await?)
    }

    fn observe(&self, sql: &str) {
        if let Some(observer) = &self.observer {
            observer.on_statement(sql);
        }
    }
}

/// An open transaction against the store.
///
/// Commits or rolls back as a single atomic step. Dropping a unit of work
/// without committing rolls it back and returns its connection to the pool.
pub struct UnitOfWork {
    tx: Transaction<'static, Postgres>,
    observer: Option<Arc<dyn StatementObserver>>,
}

impl UnitOfWork {
    /// Execute a parameterized statement; returns the affected row count.
    pub async fn execute(&mut self, sql: &str, params: Params) -> LedgerResult<u64> {
        self.observe(sql);
        let result = sqlx::query_with(sql, params.into_arguments())
            .execute(&mut *self.tx)
            .await?;
        Ok(result.rows_affected())
    }

    /// Fetch exactly one scalar within this unit of work.
    pub async fn fetch_scalar<T>(&mut self, sql: &str, params: Params) -> LedgerResult<T>
    where
        T: Send + Unpin,
        (T,): Send + Unpin + for<'r> sqlx::FromRow<'r, PgRow>,
    {
        self.observe(sql);
        Ok(sqlx::query_scalar_with(sql, params.into_arguments())
            .fetch_one(&mut *self.tx)
            .await?)
    }

    /// Fetch at most one scalar within this unit of work.
    pub async fn fetch_optional_scalar<T>(
        &mut self,
        sql: &str,
        params: Params,
    ) -> LedgerResult<Option<T>>
    where
        T: Send + Unpin,
        (T,): Send + Unpin + for<'r> sqlx::FromRow<'r, PgRow>,
    {
        self.observe(sql);
        Ok(sqlx::query_scalar_with(sql, params.into_arguments())
            .fetch_optional(&mut *self.tx)
            .await?)
    }

    /// Commit the unit of work.
    pub async fn commit(self) -> LedgerResult<()> {
        self.tx.commit().await?;
        Ok(())
    }

    /// Roll back the unit of work explicitly.
    pub async fn rollback(self) -> LedgerResult<()> {
        self.tx.rollback().await?;
        Ok(())
    }

    fn observe(&self, sql: &str) {
        if let Some(observer) = &self.observer {
            observer.on_statement(sql);
        }
    }
}

/// Apply the embedded schema (idempotent; every statement is
/// CREATE TABLE IF NOT EXISTS).
pub async fn apply_schema(pool: &PgPool) -> Result<(), sqlx::Error> {
    pool.execute(SCHEMA_SQL).await?;
    Ok(())
}

/// Check if required tables exist
pub async fn check_schema(pool: &PgPool) -> Result<bool, sqlx::Error> {
    let required_tables = ["accounts", "balances", "transactions"];

    for table in required_tables {
        let exists: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM information_schema.tables
                WHERE table_schema = 'public' AND table_name = $1
            )
            "#,
        )
        .bind(table)
        .fetch_one(pool)
        .await?;

        if !exists {
            tracing::error!("Required table '{}' does not exist", table);
            return Ok(false);
        }
    }

    Ok(true)
}
