mod common;

use std::time::Duration;

use camino::Utf8PathBuf;
use common::{browse_body, detail_body, record, FakeCatalog, GatedCatalog};
use neo_orrery::cache_store::{CacheEntry, CacheStore, FileCacheStore, MemoryCacheStore};
use neo_orrery::catalog::CatalogClient;
use neo_orrery::env_state::FixedClock;
use neo_orrery::OrreryError;

const NOW: u64 = 1_700_000_000_000;

fn cached(fetched_at: u64) -> MemoryCacheStore {
    MemoryCacheStore::with_entry(&CacheEntry::new(vec![record("cached", 1.0)], fetched_at))
        .unwrap()
}

#[tokio::test]
async fn test_valid_cache_skips_network() {
    let client = CatalogClient::with_clock(
        FakeCatalog::with_bodies(&["1", "2"]),
        cached(NOW - 3_599_999),
        FixedClock::new(NOW),
    );

    let records = client.resolve_bodies().await;
    assert_eq!(records, vec![record("cached", 1.0)]);
    assert!(client.transport().requests().is_empty());
    assert_eq!(client.cache().write_count(), 0);
}

#[tokio::test]
async fn test_stale_cache_refreshes() {
    let client = CatalogClient::with_clock(
        FakeCatalog::with_bodies(&["1", "2"]),
        cached(NOW - 3_600_001),
        FixedClock::new(NOW),
    );

    let records = client.resolve_bodies().await;
    assert_eq!(client.transport().browse_count(), 1);
    assert_eq!(records.iter().map(|r| r.id.as_str()).collect::<Vec<_>>(), ["1", "2"]);

    let entry = client.cache().read().unwrap();
    assert_eq!(entry.fetched_at, NOW);
    assert_eq!(entry.payload, records);
}

#[tokio::test]
async fn test_corrupted_cache_is_a_miss() {
    let client = CatalogClient::with_clock(
        FakeCatalog::with_bodies(&["7"]),
        MemoryCacheStore::with_raw("{\"neoData\": [{\"id\": 1}], \"neoDataTime\": \"yesterday\"}"),
        FixedClock::new(NOW),
    );

    let records = client.resolve_bodies().await;
    assert_eq!(records.len(), 1);
    assert_eq!(client.transport().browse_count(), 1);
}

#[tokio::test]
async fn test_second_resolution_hits_the_cache() {
    let client = CatalogClient::with_clock(
        FakeCatalog::with_bodies(&["1", "2", "3"]),
        MemoryCacheStore::new(),
        FixedClock::new(NOW),
    );

    let first = client.resolve_bodies().await;
    client.clock().advance(60_000);
    let second = client.resolve_bodies().await;

    assert_eq!(first, second);
    assert_eq!(client.transport().browse_count(), 1);
    assert_eq!(client.transport().requests().len(), 4);

    client.clock().advance(3_600_000);
    client.resolve_bodies().await;
    assert_eq!(client.transport().browse_count(), 2);
}

#[tokio::test]
async fn test_partial_failures_keep_order() {
    let ids = ["a", "b", "c", "d", "e", "f"];
    let catalog = FakeCatalog::default()
        .browse(200, &browse_body(&ids))
        .detail("a", 200, &detail_body("a", 1.0))
        .detail("b", 500, "internal error")
        .detail("c", 200, &detail_body("c", 3.0))
        .detail_network_error("d")
        .detail("e", 200, r#"{"id": "e", "name": "no size"}"#)
        .detail("f", 200, &detail_body("f", 6.0));

    let client = CatalogClient::with_clock(catalog, MemoryCacheStore::new(), FixedClock::new(NOW));
    let records = client.resolve_bodies().await;

    // N = 6 candidates, M = 3 failures
    assert_eq!(records.len(), 3);
    assert_eq!(
        records.iter().map(|r| r.id.as_str()).collect::<Vec<_>>(),
        ["a", "c", "f"]
    );
    assert_eq!(records[2].max_estimated_diameter_meters, 6.0);
    assert_eq!(client.transport().requests().len(), 7);
    assert_eq!(client.cache().read().unwrap().payload, records);
}

#[tokio::test]
async fn test_details_are_requested_together() {
    let ids = ["a", "b", "c", "d", "e"];
    let catalog = FakeCatalog::default()
        .browse(200, &browse_body(&ids))
        .detail("a", 200, &detail_body("a", 1.0))
        .detail_network_error("b")
        .detail("c", 503, "")
        .detail("d", 200, &detail_body("d", 4.0))
        .detail("e", 200, &detail_body("e", 5.0));
    // the first failure and the last success answer late
    let gated = GatedCatalog::new(catalog, ids.len()).slow("b").slow("e");
    let client = CatalogClient::with_clock(gated, MemoryCacheStore::new(), FixedClock::new(NOW));

    let records = tokio::time::timeout(Duration::from_secs(5), client.resolve_bodies())
        .await
        .expect("detail requests were not issued concurrently");

    assert_eq!(client.transport().peak_in_flight(), ids.len());
    assert_eq!(
        records.iter().map(|r| r.id.as_str()).collect::<Vec<_>>(),
        ["a", "d", "e"]
    );
    assert_eq!(client.transport().requests().len(), 6);
    assert_eq!(client.cache().read().unwrap().payload, records);
}

#[tokio::test]
async fn test_detail_ids_do_not_override_browse_ids() {
    let catalog = FakeCatalog::default()
        .browse(200, &browse_body(&["1", "2"]))
        .detail("1", 200, &detail_body("X", 10.0))
        .detail("2", 200, &detail_body("X", 20.0));
    let client = CatalogClient::with_clock(catalog, MemoryCacheStore::new(), FixedClock::new(NOW));

    let records = client.resolve_bodies().await;
    assert_eq!(
        records.iter().map(|r| r.id.as_str()).collect::<Vec<_>>(),
        ["1", "2"]
    );
    assert_eq!(records[1].max_estimated_diameter_meters, 20.0);
}

#[tokio::test]
async fn test_numeric_ids_resolve() {
    let numeric_detail = |id: u64, size: f64| {
        serde_json::json!({
            "id": id,
            "name": format!("NEO {id}"),
            "estimated_diameter": { "meters": { "estimated_diameter_max": size } }
        })
        .to_string()
    };
    let catalog = FakeCatalog::default()
        .browse(200, r#"{"near_earth_objects": [{"id": 11}, {"id": 12}]}"#)
        .detail("11", 200, &numeric_detail(11, 110.0))
        .detail("12", 200, &numeric_detail(12, 120.0));
    let client = CatalogClient::with_clock(catalog, MemoryCacheStore::new(), FixedClock::new(NOW));

    let records = client.resolve_bodies().await;
    assert_eq!(records, vec![record("11", 110.0), record("12", 120.0)]);
    assert_eq!(client.cache().read().unwrap().payload.len(), 2);
}

#[tokio::test]
async fn test_rate_limit_degrades_without_caching() {
    let catalog = FakeCatalog::default().browse(429, r#"{"error": {"code": "OVER_RATE_LIMIT"}}"#);
    let client = CatalogClient::with_clock(catalog, MemoryCacheStore::new(), FixedClock::new(NOW));

    assert_eq!(client.fetch_catalog().await, Err(OrreryError::RateLimited));
    assert!(client.resolve_bodies().await.is_empty());
    assert_eq!(client.cache().write_count(), 0);
    assert!(client.cache().read().is_none());
    assert!(client
        .transport()
        .requests()
        .iter()
        .all(|path| path == "neo/browse"));
}

#[tokio::test]
async fn test_rate_limit_keeps_stale_cache_untouched() {
    let catalog = FakeCatalog::default().browse(429, "");
    let client = CatalogClient::with_clock(catalog, cached(NOW - 7_200_000), FixedClock::new(NOW));

    assert!(client.resolve_bodies().await.is_empty());
    assert_eq!(client.cache().read().unwrap().fetched_at, NOW - 7_200_000);
}

#[tokio::test]
async fn test_malformed_browse_is_empty() {
    let catalog = FakeCatalog::default().browse(200, r#"{"page": {"size": 0}}"#);
    let client = CatalogClient::with_clock(catalog, MemoryCacheStore::new(), FixedClock::new(NOW));

    assert!(matches!(
        client.fetch_catalog().await,
        Err(OrreryError::MalformedResponse(_))
    ));
    assert!(client.resolve_bodies().await.is_empty());
    assert_eq!(client.cache().write_count(), 0);
}

#[tokio::test]
async fn test_server_error_is_unavailable() {
    let catalog = FakeCatalog::default().browse(500, "");
    let client = CatalogClient::with_clock(catalog, MemoryCacheStore::new(), FixedClock::new(NOW));

    assert_eq!(
        client.fetch_catalog().await,
        Err(OrreryError::CatalogUnavailable(
            "HTTP error! status: 500".into()
        ))
    );
    assert!(client.resolve_bodies().await.is_empty());
}

#[tokio::test]
async fn test_file_cache_write_through() {
    let dir = tempfile::tempdir().unwrap();
    let path = Utf8PathBuf::from_path_buf(dir.path().join("neo_data.json")).unwrap();

    let client = CatalogClient::with_clock(
        FakeCatalog::with_bodies(&["10", "20"]),
        FileCacheStore::new(path.clone()),
        FixedClock::new(NOW),
    );
    let records = client.resolve_bodies().await;
    assert_eq!(records.len(), 2);

    // a fresh client on the same file reads the snapshot back without any request
    let reloaded = CatalogClient::with_clock(
        FakeCatalog::default(),
        FileCacheStore::new(path),
        FixedClock::new(NOW + 1_000),
    );
    assert_eq!(reloaded.resolve_bodies().await, records);
    assert!(reloaded.transport().requests().is_empty());
}
