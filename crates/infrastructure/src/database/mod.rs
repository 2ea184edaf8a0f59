use rdns_cache_domain::config::DatabaseConfig;
use rdns_cache_domain::DomainError;
use sqlx::sqlite::{
    SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions, SqliteSynchronous,
};
use std::str::FromStr;
use std::time::Duration;
use tracing::{error, warn};

const SQLITE_BUSY: i32 = 5;
const SQLITE_LOCKED: i32 = 6;

pub async fn create_pool(database_url: &str, cfg: &DatabaseConfig) -> Result<SqlitePool, sqlx::Error> {
    let busy_timeout = Duration::from_millis(cfg.busy_timeout_ms);

    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        // WAL mode: the dispatcher's reads don't block ingestion writes
        .journal_mode(SqliteJournalMode::Wal)
        .synchronous(SqliteSynchronous::Normal)
        // Lock-wait bound; past it writers see SQLITE_BUSY
        .busy_timeout(busy_timeout);

    let pool = SqlitePoolOptions::new()
        .max_connections(cfg.max_connections.max(1))
        .min_connections(1)
        .acquire_timeout(busy_timeout)
        .connect_with(options)
        .await?;

    run_migrations(&pool).await?;

    Ok(pool)
}

pub async fn run_migrations(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}

/// Classify a sqlx failure: lock contention and pool exhaustion become
/// `StoreBusy` so callers can back off, everything else `DatabaseError`.
pub fn map_sqlx_error(operation: &str, e: sqlx::Error) -> DomainError {
    if is_busy(&e) {
        warn!(operation, error = %e, "Store busy");
        DomainError::StoreBusy(format!("{}: {}", operation, e))
    } else {
        error!(operation, error = %e, "Database operation failed");
        DomainError::DatabaseError(format!("{}: {}", operation, e))
    }
}

fn is_busy(e: &sqlx::Error) -> bool {
    match e {
        sqlx::Error::PoolTimedOut => true,
        sqlx::Error::Database(db) => {
            let primary = db
                .code()
                .and_then(|code| code.parse::<i32>().ok())
                .map(|code| code & 0xff);
            matches!(primary, Some(SQLITE_BUSY) | Some(SQLITE_LOCKED))
                || db.message().contains("database is locked")
        }
        _ => false,
    }
}
