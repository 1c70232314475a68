use std::sync::Arc;
use std::time::Duration;

use diesel::connection::SimpleConnection;
use diesel::Connection;
use diesel::r2d2::{ConnectionManager, CustomizeConnection, Pool};
use diesel::sqlite::SqliteConnection;
use rand::Rng;
use tracing::{debug, warn};

use crate::errors::StoreError;

pub type DbPool = Pool<ConnectionManager<SqliteConnection>>;

/// Pragmas applied to every connection handed out by the pool
#[derive(Debug, Clone, Copy)]
struct SqlitePragmas {
    busy_timeout_ms: u64,
}

impl CustomizeConnection<SqliteConnection, diesel::r2d2::Error> for SqlitePragmas {
    fn on_acquire(&self, conn: &mut SqliteConnection) -> Result<(), diesel::r2d2::Error> {
        conn.batch_execute(&format!(
            "PRAGMA foreign_keys = ON; PRAGMA busy_timeout = {};",
            self.busy_timeout_ms
        ))
        .map_err(diesel::r2d2::Error::QueryError)
    }
}

/// Builds a connection pool for the given database URL
///
/// Every connection has foreign keys enforced (column and card deletes
/// cascade through them) and waits up to five seconds on a locked database
/// before reporting `SQLITE_BUSY`.
pub fn init_pool(database_url: &str) -> Result<DbPool, StoreError> {
    let manager = ConnectionManager::<SqliteConnection>::new(database_url);
    let pool = Pool::builder()
        .connection_customizer(Box::new(SqlitePragmas { busy_timeout_ms: 5_000 }))
        .build(manager)?;
    Ok(pool)
}

/// Backoff policy for write transactions that hit a locked database
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Maximum number of re-attempts after the first try
    pub max_retries: u32,
    /// Base delay in milliseconds, doubled on every attempt
    pub base_delay_ms: u64,
    /// Upper bound for a single delay in milliseconds
    pub max_delay_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 5,
            base_delay_ms: 20,
            max_delay_ms: 1_000,
        }
    }
}

impl RetryConfig {
    pub fn with_max_retries(max_retries: u32) -> Self {
        Self {
            max_retries,
            ..Self::default()
        }
    }

    /// Delay before re-attempt number `attempt` (zero-based), with up to 25% jitter
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let exponential = self
            .base_delay_ms
            .saturating_mul(2u64.saturating_pow(attempt))
            .min(self.max_delay_ms);
        let jitter = if exponential >= 4 {
            rand::rng().random_range(0..=exponential / 4)
        } else {
            0
        };
        Duration::from_millis(exponential + jitter)
    }
}

/// Explicit storage handle shared by every request
///
/// Reads run in a deferred transaction so they see one consistent snapshot.
/// Writes run in `BEGIN IMMEDIATE` transactions, which take the write lock up
/// front: two writers can never interleave their position shifts, and a
/// writer that cannot get the lock is re-run from a fresh read.
///
/// The async entry points run the transaction on tokio's blocking thread
/// pool, so a connection waiting out `busy_timeout` never ties up a runtime
/// worker. Everything the transaction body needs must therefore be owned.
#[derive(Clone)]
pub struct Store {
    pool: DbPool,
    retry: RetryConfig,
}

impl Store {
    pub fn new(pool: DbPool, retry: RetryConfig) -> Self {
        Self { pool, retry }
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }

    /// Runs `op` inside a read transaction on the calling thread
    ///
    /// Meant for startup code and tests. Request paths use [`Store::query`].
    pub fn read<T, F>(&self, op: F) -> Result<T, StoreError>
    where
        F: FnOnce(&mut SqliteConnection) -> Result<T, StoreError>,
    {
        let mut pooled = self.pool.get()?;
        let conn: &mut SqliteConnection = &mut pooled;
        conn.transaction(op)
    }

    /// Runs `op` inside a read transaction on a blocking thread
    pub async fn query<T, F>(&self, op: F) -> Result<T, StoreError>
    where
        F: FnOnce(&mut SqliteConnection) -> Result<T, StoreError> + Send + 'static,
        T: Send + 'static,
    {
        let store = self.clone();
        tokio::task::spawn_blocking(move || store.read(op)).await?
    }

    /// Runs `op` inside an immediate write transaction, re-running it on lock contention
    ///
    /// `op` may be called several times; each call starts from the committed
    /// state left by other writers. When the retry budget is spent the
    /// operation fails with [`StoreError::Conflict`].
    pub async fn write<T, F>(&self, name: &str, op: F) -> Result<T, StoreError>
    where
        F: Fn(&mut SqliteConnection) -> Result<T, StoreError> + Send + Sync + 'static,
        T: Send + 'static,
    {
        let op = Arc::new(op);
        let mut attempt = 0;
        loop {
            let pool = self.pool.clone();
            let attempt_op = Arc::clone(&op);
            let result = tokio::task::spawn_blocking(move || {
                let mut pooled = pool.get()?;
                let conn: &mut SqliteConnection = &mut pooled;
                conn.immediate_transaction(|conn| attempt_op(conn))
            })
            .await?;

            match result {
                Err(err) if err.is_transient() => {
                    if attempt >= self.retry.max_retries {
                        warn!("{} gave up after {} retries: {}", name, attempt, err);
                        return Err(StoreError::Conflict(format!(
                            "The board is being modified concurrently, please retry ({})",
                            name
                        )));
                    }
                    let delay = self.retry.delay_for(attempt);
                    debug!("{} hit a locked database, retrying in {:?}", name, delay);
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                other => return other,
            }
        }
    }
}
