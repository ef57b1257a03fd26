mod common;

use camino::Utf8PathBuf;
use common::{entry_json, ok_body, FakeTransport};
use procyon_lib::core::cache::MetadataCache;
use procyon_lib::core::catalog::CatalogClient;
use procyon_lib::core::transport::{CatalogRequest, RawResponse};
use procyon_lib::models::error::SError;
use serde_json::json;
use tempfile::TempDir;

fn client_with(transport: FakeTransport) -> (TempDir, CatalogClient<FakeTransport>) {
    let tmp = tempfile::tempdir().unwrap();
    let path = Utf8PathBuf::from_path_buf(tmp.path().join("catalog_cache.json")).unwrap();
    (tmp, CatalogClient::new(transport, MetadataCache::new(path)))
}

fn ids(values: &[&str]) -> Vec<String> {
    values.iter().map(|s| s.to_string()).collect()
}

#[tokio::test]
async fn test_warm_cache_makes_no_second_call() {
    let (_tmp, mut client) = client_with(FakeTransport::echo());

    let first = client.fetch_one("10").await.unwrap();
    let second = client.fetch_one("10").await.unwrap();

    assert_eq!(first, second);
    assert_eq!(first[0].name, "Game 10");
    assert_eq!(client.transport().call_count(), 1);
    assert!(client.has_cache());
}

#[tokio::test]
async fn test_fresh_results_are_persisted() {
    let (tmp, mut client) = client_with(FakeTransport::echo());
    client.fetch_one("10").await.unwrap();

    let path = Utf8PathBuf::from_path_buf(tmp.path().join("catalog_cache.json")).unwrap();
    let mut reloaded = MetadataCache::new(path);
    reloaded.load().await;
    assert!(reloaded.get("10").is_some());
}

#[tokio::test]
async fn test_blacklisted_id_never_reaches_network() {
    let (_tmp, mut client) = client_with(FakeTransport::echo());

    let entries = client.fetch_one("228980").await.unwrap();
    assert!(entries.is_empty());
    assert_eq!(client.transport().call_count(), 0);
    assert!(client.cache().is_empty());
}

#[tokio::test]
async fn test_http_error_surfaces_for_single_fetch() {
    let transport = FakeTransport::new(|_| {
        Ok(RawResponse {
            status: 503,
            body: Vec::new(),
        })
    });
    let (_tmp, mut client) = client_with(transport);

    match client.fetch_one("10").await {
        Err(SError::Http { status }) => assert_eq!(status, 503),
        other => panic!("expected HTTP error, got {other:?}"),
    }
    assert!(client.cache().is_empty());
}

#[tokio::test]
async fn test_decode_failure_degrades_to_empty_and_is_not_cached() {
    // `name` is missing from the entry
    let transport = FakeTransport::new(|_| {
        let mut entry = entry_json(10, "x");
        entry.as_object_mut().unwrap().remove("name");
        Ok(ok_body(&[entry]))
    });
    let (_tmp, mut client) = client_with(transport);

    assert!(client.fetch_one("10").await.unwrap().is_empty());
    assert!(client.cache().get("10").is_none());

    // Not cached, so the next call goes out again
    client.fetch_one("10").await.unwrap();
    assert_eq!(client.transport().call_count(), 2);
}

#[tokio::test]
async fn test_empty_batch_reports_no_progress() {
    let (_tmp, mut client) = client_with(FakeTransport::echo());
    let mut reports = Vec::new();

    let entries = client.fetch_batch(&[], |p| reports.push(p)).await;
    assert!(entries.is_empty());
    assert!(reports.is_empty());
    assert_eq!(client.transport().call_count(), 0);
}

#[tokio::test]
async fn test_batch_progress_is_monotonic_and_ends_at_100() {
    let (_tmp, mut client) = client_with(FakeTransport::echo());
    let mut reports = Vec::new();

    let entries = client
        .fetch_batch(&ids(&["1", "2", "3"]), |p| reports.push(p))
        .await;

    assert_eq!(entries.len(), 3);
    assert_eq!(reports.len(), 3);
    assert!(reports.windows(2).all(|w| w[0] <= w[1]));
    assert_eq!(*reports.last().unwrap(), 100.0);
}

#[tokio::test]
async fn test_batch_isolates_per_item_failures() {
    let transport = FakeTransport::new(|req| match req {
        CatalogRequest::Single(id) if id == "2" => Ok(RawResponse {
            status: 500,
            body: Vec::new(),
        }),
        CatalogRequest::Single(id) => Ok(ok_body(&[entry_json(id.parse().unwrap(), id)])),
        CatalogRequest::Multi(_) => unreachable!(),
    });
    let (_tmp, mut client) = client_with(transport);

    let grouped = client
        .fetch_batch_grouped(&ids(&["1", "2", "3"]), |_| {})
        .await;

    let sizes: Vec<(String, usize)> = grouped.into_iter().map(|(id, e)| (id, e.len())).collect();
    assert_eq!(
        sizes,
        vec![
            ("1".to_string(), 1),
            ("2".to_string(), 0),
            ("3".to_string(), 1)
        ]
    );

    // Requests went out one by one, in input order
    let calls = client.transport().calls.lock().clone();
    assert_eq!(
        calls,
        vec![
            CatalogRequest::Single("1".into()),
            CatalogRequest::Single("2".into()),
            CatalogRequest::Single("3".into()),
        ]
    );
}

#[tokio::test]
async fn test_uncached_batch_requests_only_missing_ids() {
    let (_tmp, mut client) = client_with(FakeTransport::echo());
    client.fetch_one("1").await.unwrap();

    let entries = client
        .fetch_uncached(&ids(&["1", "2", "3", "228980", "2"]))
        .await
        .unwrap();

    assert_eq!(entries.len(), 3);
    let calls = client.transport().calls.lock().clone();
    assert_eq!(
        calls.last(),
        Some(&CatalogRequest::Multi(vec!["2".into(), "3".into()]))
    );
    assert!(client.cache().get("3").is_some());
}

#[tokio::test]
async fn test_uncached_batch_with_warm_cache_makes_no_call() {
    let (_tmp, mut client) = client_with(FakeTransport::echo());
    client.fetch_one("1").await.unwrap();
    client.fetch_one("2").await.unwrap();

    let entries = client.fetch_uncached(&ids(&["2", "1"])).await.unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(client.transport().call_count(), 2);
}

#[tokio::test]
async fn test_uncached_bundle_is_cached_under_requested_id() {
    let transport = FakeTransport::new(|_| {
        Ok(ok_body(&[entry_json(501, "Part One"), entry_json(502, "Part Two")]))
    });
    let (_tmp, mut client) = client_with(transport);

    let first = client.fetch_uncached(&ids(&["500"])).await.unwrap();
    let second = client.fetch_uncached(&ids(&["500"])).await.unwrap();

    assert_eq!(first.len(), 2);
    assert_eq!(first, second);
    assert_eq!(client.transport().call_count(), 1);
    assert_eq!(client.cache().get("500").map(Vec::len), Some(2));
}

#[tokio::test]
async fn test_uncached_entries_sharing_an_id_are_all_kept() {
    let transport = FakeTransport::new(|_| {
        Ok(ok_body(&[
            entry_json(7, "Edition A"),
            entry_json(7, "Edition B"),
            entry_json(8, "Other"),
        ]))
    });
    let (_tmp, mut client) = client_with(transport);

    let first = client.fetch_uncached(&ids(&["7", "8"])).await.unwrap();
    let second = client.fetch_uncached(&ids(&["7", "8"])).await.unwrap();

    assert_eq!(first.len(), 3);
    assert_eq!(second.len(), 3);
    assert_eq!(client.transport().call_count(), 1);
    assert_eq!(client.cache().get("7").map(Vec::len), Some(2));
}

#[tokio::test]
async fn test_corrupted_body_degrades_to_empty() {
    let transport = FakeTransport::new(|_| {
        Ok(RawResponse {
            status: 200,
            body: serde_json::to_vec(&json!({ "data": "nope" })).unwrap()[..5].to_vec(),
        })
    });
    let (_tmp, mut client) = client_with(transport);

    assert!(client.fetch_one("10").await.unwrap().is_empty());
}

#[tokio::test]
async fn test_delete_cache_forces_refetch() {
    let (_tmp, mut client) = client_with(FakeTransport::echo());
    client.fetch_one("10").await.unwrap();

    client.delete_cache().await;
    assert!(!client.has_cache());

    client.fetch_one("10").await.unwrap();
    assert_eq!(client.transport().call_count(), 2);
}
