//! Linear-backoff retry for write units of work against SQLite.
//!
//! SQLite has a single writer. A competing writer surfaces as `SQLITE_BUSY`
//! or `SQLITE_LOCKED` (or one of their extended codes); those attempts are
//! rolled back and retried after `base_delay * attempt`. Any other error is
//! returned to the caller straight away.

use sea_orm::{DatabaseConnection, DatabaseTransaction, DbErr, RuntimeErr, TransactionTrait};
use std::future::Future;
use std::pin::Pin;
use std::time::Duration;
use util::config::AppConfig;

/// Primary and extended result codes for busy/locked databases.
const CONTENTION_CODES: [&str; 5] = ["5", "6", "261", "262", "517"];

/// How often and how patiently a unit of work is retried.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            base_delay: Duration::from_millis(200),
        }
    }
}

/// Result of a unit of work that exhausted or aborted its retries.
#[derive(Debug)]
pub struct RetryError {
    /// Attempts made, including the one that produced `source`.
    pub attempts: u32,
    pub source: DbErr,
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, base_delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            base_delay,
        }
    }

    /// Policy built from `DB_RETRY_MAX_ATTEMPTS` / `DB_RETRY_BASE_DELAY_MS`.
    pub fn from_config() -> Self {
        let cfg = AppConfig::global();
        Self::new(
            cfg.db_retry_max_attempts,
            Duration::from_millis(cfg.db_retry_base_delay_ms),
        )
    }

    /// Sleep before retrying after the given (1-based) failed attempt.
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        self.base_delay * attempt
    }

    /// Runs `work` inside a fresh transaction per attempt.
    ///
    /// The transaction is committed when `work` returns `Ok`. A retryable
    /// error from `work` or from the commit rolls the attempt back and, if
    /// attempts remain, sleeps and starts over.
    pub async fn run<T, F>(&self, db: &DatabaseConnection, mut work: F) -> Result<T, RetryError>
    where
        T: Send,
        F: for<'t> FnMut(
            &'t DatabaseTransaction,
        ) -> Pin<Box<dyn Future<Output = Result<T, DbErr>> + Send + 't>>,
    {
        let mut attempt = 0;
        loop {
            attempt += 1;
            match self.attempt_once(db, &mut work).await {
                Ok(value) => return Ok(value),
                Err(err) if is_retryable(&err) && attempt < self.max_attempts => {
                    let delay = self.delay_for_attempt(attempt);
                    tracing::warn!(
                        attempt,
                        max_attempts = self.max_attempts,
                        delay_ms = delay.as_millis() as u64,
                        error = %err,
                        "database busy, retrying unit of work"
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(err) => {
                    return Err(RetryError {
                        attempts: attempt,
                        source: err,
                    });
                }
            }
        }
    }

    async fn attempt_once<T, F>(&self, db: &DatabaseConnection, work: &mut F) -> Result<T, DbErr>
    where
        F: for<'t> FnMut(
            &'t DatabaseTransaction,
        ) -> Pin<Box<dyn Future<Output = Result<T, DbErr>> + Send + 't>>,
    {
        let txn = db.begin().await?;
        match work(&txn).await {
            Ok(value) => {
                txn.commit().await?;
                Ok(value)
            }
            Err(err) => {
                if let Err(rollback_err) = txn.rollback().await {
                    tracing::error!(error = %rollback_err, "rollback failed");
                }
                Err(err)
            }
        }
    }
}

/// True for SQLite busy/locked failures, which are worth retrying.
pub fn is_retryable(err: &DbErr) -> bool {
    let runtime = match err {
        DbErr::Conn(e) | DbErr::Exec(e) | DbErr::Query(e) => e,
        DbErr::ConnectionAcquire(_) => return false,
        other => return mentions_lock(&other.to_string()),
    };

    match runtime {
        RuntimeErr::SqlxError(sea_orm::sqlx::Error::Database(db_err)) => {
            let code_matches = db_err
                .code()
                .map(|code| CONTENTION_CODES.contains(&code.as_ref()))
                .unwrap_or(false);
            code_matches || mentions_lock(db_err.message())
        }
        RuntimeErr::SqlxError(other) => mentions_lock(&other.to_string()),
        RuntimeErr::Internal(msg) => mentions_lock(msg),
    }
}

fn mentions_lock(message: &str) -> bool {
    let lower = message.to_lowercase();
    lower.contains("database is locked") || lower.contains("database table is locked")
}

/// A `DbErr` shaped like the one SQLite reports for a busy database.
pub fn contention_error() -> DbErr {
    DbErr::Exec(RuntimeErr::Internal("database is locked".to_string()))
}
