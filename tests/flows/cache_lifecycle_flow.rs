//! Resolve, snapshot and evict against a real SQLite store.

#[path = "../common/mod.rs"]
mod common;

use chrono::{TimeDelta, Utc};
use common::TestStore;
use rdns_cache_application::ports::{CacheRepository, QueueRepository};
use rdns_cache_application::use_cases::{EvictExpiredEntriesUseCase, ExportSnapshotUseCase};
use rdns_cache_domain::{CacheEntry, DomainError};
use std::collections::BTreeSet;
use std::net::IpAddr;

fn ip(s: &str) -> IpAddr {
    s.parse().unwrap()
}

#[tokio::test]
async fn test_second_resolve_is_a_cache_hit() {
    // Arrange
    let store = TestStore::open(&[("142.250.189.174", "sfo03s24-in-f14.1e100.net.")]).await;

    // Act
    let first = store.engine.resolve(ip("142.250.189.174")).await.unwrap();
    let second = store.engine.resolve(ip("142.250.189.174")).await.unwrap();

    // Assert
    assert_eq!(first, "sfo03s24-in-f14.1e100.net.");
    assert_eq!(second, first);
    assert_eq!(store.provider.calls(), 1);
    assert!(store.cache_repo.get(ip("142.250.189.174")).await.unwrap().is_some());
}

#[tokio::test]
async fn test_not_found_is_not_cached_by_engine() {
    let store = TestStore::open(&[]).await;

    let result = store.engine.resolve(ip("192.0.2.7")).await;

    assert_eq!(result, Err(DomainError::HostnameNotFound(ip("192.0.2.7"))));
    assert!(store.cache_repo.get(ip("192.0.2.7")).await.unwrap().is_none());
}

#[tokio::test]
async fn test_eviction_forces_fresh_lookup() {
    // Arrange - a row older than the eviction window
    let store = TestStore::open(&[("8.8.8.8", "dns.google.")]).await;
    store
        .cache_repo
        .upsert(&CacheEntry::new(ip("8.8.8.8"), "dns.google.", Utc::now() - TimeDelta::days(2)))
        .await
        .unwrap();

    // Act
    let evicted = EvictExpiredEntriesUseCase::new(store.engine.clone())
        .execute(TimeDelta::days(1))
        .await
        .unwrap();

    // Assert - gone, and the next resolve goes to the provider and recreates it
    assert_eq!(evicted, 1);
    assert!(store.cache_repo.get(ip("8.8.8.8")).await.unwrap().is_none());

    store.engine.resolve(ip("8.8.8.8")).await.unwrap();
    assert_eq!(store.provider.calls(), 1);
    let row = store.cache_repo.get(ip("8.8.8.8")).await.unwrap().unwrap();
    assert!(row.last_resolved > Utc::now() - TimeDelta::minutes(1));
}

#[tokio::test]
async fn test_eviction_is_idempotent() {
    let store = TestStore::open(&[]).await;
    store
        .cache_repo
        .upsert(&CacheEntry::new(ip("10.0.0.1"), "old.", Utc::now() - TimeDelta::days(3)))
        .await
        .unwrap();
    let evict = EvictExpiredEntriesUseCase::new(store.engine.clone());

    assert_eq!(evict.execute(TimeDelta::days(1)).await.unwrap(), 1);
    assert_eq!(evict.execute(TimeDelta::days(1)).await.unwrap(), 0);
}

#[tokio::test]
async fn test_snapshot_round_trip_preserves_pairs() {
    // Arrange
    let store = TestStore::open(&[
        ("8.8.8.8", "dns.google."),
        ("1.1.1.1", "one.one.one.one."),
        ("2606:4700:4700::1111", "one.one.one.one."),
    ])
    .await;
    for addr in ["8.8.8.8", "1.1.1.1", "2606:4700:4700::1111"] {
        store.engine.resolve(ip(addr)).await.unwrap();
    }
    store.engine.record(ip("192.0.2.1"), "NXDOMAIN").await.unwrap();

    // Act
    let json = ExportSnapshotUseCase::new(store.engine.clone())
        .execute()
        .await
        .unwrap();
    let restored = ExportSnapshotUseCase::from_json(&json).unwrap();

    // Assert
    let expected: BTreeSet<(IpAddr, String)> = store
        .cache_repo
        .get_all()
        .await
        .unwrap()
        .into_iter()
        .map(|e| (e.ip_address, e.hostname))
        .collect();
    let actual: BTreeSet<(IpAddr, String)> = restored
        .into_iter()
        .map(|e| (e.ip_address, e.hostname))
        .collect();
    assert_eq!(actual.len(), 4);
    assert_eq!(actual, expected);
}

#[tokio::test]
async fn test_enqueue_then_dequeue_preserves_order() {
    let store = TestStore::open(&[]).await;
    let addrs = ["10.0.0.1", "10.0.0.2", "10.0.0.3", "10.0.0.4", "10.0.0.5"];
    for addr in addrs {
        store.queue.enqueue(ip(addr)).await.unwrap();
    }

    let batch = store.queue.dequeue_batch(5).await.unwrap();

    assert_eq!(
        batch.iter().map(|item| item.ip_address).collect::<Vec<_>>(),
        addrs.iter().copied().map(ip).collect::<Vec<_>>()
    );
    assert_eq!(store.queue_repo.len().await.unwrap(), 0);
}
