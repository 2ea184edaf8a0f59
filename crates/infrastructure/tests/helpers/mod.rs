#![allow(dead_code)]

pub use ptr_server_mock::MockPtrServer;

use rdns_cache_domain::config::DatabaseConfig;
use rdns_cache_infrastructure::database::create_pool;
use sqlx::SqlitePool;
use tempfile::TempDir;

/// File-backed pool with migrations applied. Keep the `TempDir` alive for
/// the duration of the test.
pub async fn create_test_db() -> (TempDir, SqlitePool) {
    let dir = tempfile::tempdir().unwrap();
    let url = format!("sqlite:{}", dir.path().join("test.db").display());
    let cfg = DatabaseConfig {
        busy_timeout_ms: 5_000,
        max_connections: 4,
        ..Default::default()
    };
    let pool = create_pool(&url, &cfg).await.unwrap();
    (dir, pool)
}
