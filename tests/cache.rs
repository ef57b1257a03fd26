mod common;

use camino::Utf8PathBuf;
use common::catalog_entry;
use procyon_lib::core::cache::{MetadataCache, CACHE_FILE_NAME};
use std::fs;

fn cache_path(tmp: &tempfile::TempDir) -> Utf8PathBuf {
    Utf8PathBuf::from_path_buf(tmp.path().join("cache").join(CACHE_FILE_NAME)).unwrap()
}

#[tokio::test]
async fn test_put_save_load_round_trip() {
    let tmp = tempfile::tempdir().unwrap();
    let path = cache_path(&tmp);
    let entry = catalog_entry(100, "Hundred");

    let mut cache = MetadataCache::new(path.clone());
    cache.put("100", vec![entry.clone()]);
    cache.save().await;

    let mut reloaded = MetadataCache::new(path);
    reloaded.load().await;
    assert!(reloaded.has_cache());
    assert_eq!(reloaded.get("100"), Some(&vec![entry]));
}

#[tokio::test]
async fn test_missing_or_corrupt_blob_loads_empty() {
    let tmp = tempfile::tempdir().unwrap();
    let path = cache_path(&tmp);

    let mut cache = MetadataCache::new(path.clone());
    cache.load().await;
    assert!(!cache.has_cache());

    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(&path, b"{ not json").unwrap();
    cache.load().await;
    assert!(!cache.has_cache());
    assert!(cache.is_empty());
}

#[tokio::test]
async fn test_blacklisted_and_empty_results_are_never_stored() {
    let tmp = tempfile::tempdir().unwrap();
    let mut cache = MetadataCache::new(cache_path(&tmp));

    cache.put("228980", vec![catalog_entry(228980, "Redist")]);
    cache.put("7", Vec::new());
    assert!(cache.is_empty());
    assert!(cache.get("228980").is_none());
}

#[tokio::test]
async fn test_load_filters_blacklisted_keys_on_disk() {
    let tmp = tempfile::tempdir().unwrap();
    let path = cache_path(&tmp);
    fs::create_dir_all(path.parent().unwrap()).unwrap();

    let blob = serde_json::json!({
        "228980": [common::entry_json(228980, "Redist")],
        "42": [common::entry_json(42, "Answer")],
        "43": []
    });
    fs::write(&path, serde_json::to_vec(&blob).unwrap()).unwrap();

    let mut cache = MetadataCache::new(path);
    cache.load().await;
    assert_eq!(cache.len(), 1);
    assert!(cache.get("42").is_some());
}

#[tokio::test]
async fn test_delete_removes_blob_and_entries() {
    let tmp = tempfile::tempdir().unwrap();
    let path = cache_path(&tmp);

    let mut cache = MetadataCache::new(path.clone());
    cache.put("100", vec![catalog_entry(100, "Hundred")]);
    cache.save().await;
    assert!(path.exists());

    cache.delete().await;
    assert!(!path.exists());
    assert!(!cache.has_cache());

    // Deleting twice is harmless
    cache.delete().await;
}
