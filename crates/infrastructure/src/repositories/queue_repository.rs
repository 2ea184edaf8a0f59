use async_trait::async_trait;
use rdns_cache_application::ports::QueueRepository;
use rdns_cache_domain::{DomainError, QueueItem};
use sqlx::SqlitePool;
use std::net::IpAddr;
use tracing::{debug, instrument, warn};

use crate::database::map_sqlx_error;

pub struct SqliteQueueRepository {
    pool: SqlitePool,
}

impl SqliteQueueRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl QueueRepository for SqliteQueueRepository {
    #[instrument(skip(self))]
    async fn push(&self, ip: IpAddr) -> Result<i64, DomainError> {
        let result = sqlx::query("INSERT INTO queue (ip_address) VALUES (?)")
            .bind(ip.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("queue.push", e))?;

        Ok(result.last_insert_rowid())
    }

    #[instrument(skip(self))]
    async fn take_batch(&self, limit: u32) -> Result<Vec<QueueItem>, DomainError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| map_sqlx_error("queue.take_batch", e))?;

        // Select and delete in one statement: a row can only ever be
        // returned to the caller whose transaction deleted it.
        let mut rows = sqlx::query_as::<_, (i64, String)>(
            "DELETE FROM queue
             WHERE id IN (SELECT id FROM queue ORDER BY id ASC LIMIT ?)
             RETURNING id, ip_address",
        )
        .bind(i64::from(limit))
        .fetch_all(&mut *tx)
        .await
        .map_err(|e| map_sqlx_error("queue.take_batch", e))?;

        tx.commit()
            .await
            .map_err(|e| map_sqlx_error("queue.take_batch", e))?;

        // RETURNING order is unspecified
        rows.sort_unstable_by_key(|(id, _)| *id);

        let items: Vec<QueueItem> = rows
            .into_iter()
            .filter_map(|(id, raw)| match raw.parse::<IpAddr>() {
                Ok(ip_address) => Some(QueueItem { id, ip_address }),
                Err(_) => {
                    warn!(id, value = %raw, "Dropping queue row that is not an IP address");
                    None
                }
            })
            .collect();

        debug!(taken = items.len(), limit, "Queue batch extracted");
        Ok(items)
    }

    async fn len(&self) -> Result<u64, DomainError> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM queue")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("queue.len", e))?;

        Ok(count.0.max(0) as u64)
    }
}
