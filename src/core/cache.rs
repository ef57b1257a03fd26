use crate::models::blacklist::is_blacklisted;
use crate::models::catalog::CatalogEntry;
use crate::models::error::SError;
use crate::utils::file::FileUtils;
use camino::{Utf8Path, Utf8PathBuf};
use std::collections::BTreeMap;
use tracing::{debug, error, info, warn};

pub const CACHE_FILE_NAME: &str = "catalog_cache.json";

type CacheMap = BTreeMap<String, Vec<CatalogEntry>>;

/// Persistent map of app id to catalog entries.
///
/// A present key always holds a non-empty list. Entries never expire; they
/// are only dropped by [`MetadataCache::delete`].
#[derive(Debug)]
pub struct MetadataCache {
    path: Utf8PathBuf,
    entries: CacheMap,
    has_cache: bool,
}

impl MetadataCache {
    pub fn new(path: impl Into<Utf8PathBuf>) -> Self {
        Self {
            path: path.into(),
            entries: CacheMap::new(),
            has_cache: false,
        }
    }

    pub fn path(&self) -> &Utf8Path {
        &self.path
    }

    /// Whether the last load found a usable blob, or anything was put since.
    pub fn has_cache(&self) -> bool {
        self.has_cache && !self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Reads the persisted blob. A missing or unreadable blob leaves the cache
    /// empty; this never fails.
    pub async fn load(&mut self) {
        let loaded = match tokio::fs::read(&self.path).await {
            Ok(bytes) => serde_json::from_slice::<CacheMap>(&bytes).map_err(|e| {
                warn!("Cache at {} is corrupted: {e}", self.path);
            }),
            Err(e) => {
                debug!("Cache at {} not readable: {e}", self.path);
                Err(())
            }
        };

        match loaded {
            Ok(mut map) => {
                map.retain(|id, entries| !is_blacklisted(id) && !entries.is_empty());
                info!("Cache loaded with {} entries", map.len());
                self.entries = map;
                self.has_cache = true;
            }
            Err(()) => {
                info!("Cache is empty");
                self.entries.clear();
                self.has_cache = false;
            }
        }
    }

    /// Writes the whole map atomically. Failures are logged; in-memory state
    /// is kept either way.
    pub async fn save(&self) {
        if let Err(e) = self.try_save().await {
            error!("{e}");
        }
    }

    async fn try_save(&self) -> Result<(), SError> {
        let bytes = serde_json::to_vec(&self.entries)
            .map_err(|e| SError::CacheIO(format!("serialize: {e}")))?;
        FileUtils::write_atomic(&self.path, &bytes)
            .await
            .map_err(|e| SError::CacheIO(format!("{}: {e}", self.path)))?;
        debug!("Cache saved to {}", self.path);
        Ok(())
    }

    pub fn get(&self, app_id: &str) -> Option<&Vec<CatalogEntry>> {
        if is_blacklisted(app_id) {
            return None;
        }
        self.entries.get(app_id)
    }

    /// Upserts without saving. Blacklisted ids and empty lists are ignored.
    pub fn put(&mut self, app_id: &str, entries: Vec<CatalogEntry>) {
        if is_blacklisted(app_id) {
            warn!("Refusing to cache blacklisted app {app_id}");
            return;
        }
        if entries.is_empty() {
            debug!("Not caching empty result for {app_id}");
            return;
        }
        self.entries.insert(app_id.to_string(), entries);
        self.has_cache = true;
    }

    /// Clears the map and removes the blob. Removal failures are ignored.
    pub async fn delete(&mut self) {
        self.entries.clear();
        self.has_cache = false;
        let _ = tokio::fs::remove_file(&self.path).await;
        info!("Cache deleted");
    }
}
