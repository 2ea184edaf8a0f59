use chrono::{DateTime, NaiveDateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use std::net::IpAddr;

/// Storage format for `last_resolved`. Fixed width, so lexicographic order
/// matches chronological order inside SQLite comparisons.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f";

/// A reverse-resolution result cached for one address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheEntry {
    pub ip_address: IpAddr,
    pub hostname: String,
    pub last_resolved: DateTime<Utc>,
}

impl CacheEntry {
    pub fn new(ip_address: IpAddr, hostname: impl Into<String>, last_resolved: DateTime<Utc>) -> Self {
        Self {
            ip_address,
            hostname: hostname.into(),
            last_resolved,
        }
    }

    /// Fresh iff `now - last_resolved < freshness_window`.
    pub fn is_fresh(&self, now: DateTime<Utc>, freshness_window: TimeDelta) -> bool {
        now.signed_duration_since(self.last_resolved) < freshness_window
    }

    pub fn format_timestamp(ts: &DateTime<Utc>) -> String {
        ts.format(TIMESTAMP_FORMAT).to_string()
    }

    pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
        NaiveDateTime::parse_from_str(raw, TIMESTAMP_FORMAT)
            .ok()
            .map(|naive| naive.and_utc())
    }
}
