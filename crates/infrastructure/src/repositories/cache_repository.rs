use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rdns_cache_application::ports::CacheRepository;
use rdns_cache_domain::{CacheEntry, DomainError};
use sqlx::SqlitePool;
use std::net::IpAddr;
use tracing::{instrument, warn};

use crate::database::map_sqlx_error;

type CacheRow = (String, String, String);

pub struct SqliteCacheRepository {
    pool: SqlitePool,
}

impl SqliteCacheRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn row_to_entry(row: CacheRow) -> Result<CacheEntry, DomainError> {
        let (ip_address, hostname, last_resolved) = row;

        let ip_address = ip_address
            .parse::<IpAddr>()
            .map_err(|_| DomainError::InvalidIpAddress(ip_address.clone()))?;
        let last_resolved = CacheEntry::parse_timestamp(&last_resolved).ok_or_else(|| {
            DomainError::DatabaseError(format!(
                "Unreadable last_resolved '{}' for {}",
                last_resolved, ip_address
            ))
        })?;

        Ok(CacheEntry {
            ip_address,
            hostname,
            last_resolved,
        })
    }
}

#[async_trait]
impl CacheRepository for SqliteCacheRepository {
    #[instrument(skip(self))]
    async fn get(&self, ip: IpAddr) -> Result<Option<CacheEntry>, DomainError> {
        let row = sqlx::query_as::<_, CacheRow>(
            "SELECT ip_address, hostname, last_resolved FROM cache WHERE ip_address = ?",
        )
        .bind(ip.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("cache.get", e))?;

        row.map(Self::row_to_entry).transpose()
    }

    #[instrument(skip(self, entry), fields(ip = %entry.ip_address))]
    async fn upsert(&self, entry: &CacheEntry) -> Result<(), DomainError> {
        sqlx::query(
            "INSERT INTO cache (ip_address, hostname, last_resolved)
             VALUES (?, ?, ?)
             ON CONFLICT(ip_address) DO UPDATE SET
                 hostname = excluded.hostname,
                 last_resolved = MAX(cache.last_resolved, excluded.last_resolved)",
        )
        .bind(entry.ip_address.to_string())
        .bind(&entry.hostname)
        .bind(CacheEntry::format_timestamp(&entry.last_resolved))
        .execute(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("cache.upsert", e))?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn get_all(&self) -> Result<Vec<CacheEntry>, DomainError> {
        let rows = sqlx::query_as::<_, CacheRow>(
            "SELECT ip_address, hostname, last_resolved FROM cache ORDER BY ip_address",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("cache.get_all", e))?;

        let mut entries = Vec::with_capacity(rows.len());
        for row in rows {
            match Self::row_to_entry(row) {
                Ok(entry) => entries.push(entry),
                Err(e) => warn!(error = %e, "Skipping unreadable cache row"),
            }
        }
        Ok(entries)
    }

    #[instrument(skip(self))]
    async fn delete_older_than(&self, cutoff: DateTime<Utc>) -> Result<u64, DomainError> {
        let result = sqlx::query("DELETE FROM cache WHERE last_resolved < ?")
            .bind(CacheEntry::format_timestamp(&cutoff))
            .execute(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("cache.delete_older_than", e))?;

        Ok(result.rows_affected())
    }
}
