use crate::core::cache::MetadataCache;
use crate::core::transport::{CatalogRequest, CatalogTransport, RawResponse};
use crate::models::blacklist::is_blacklisted;
use crate::models::catalog::{CatalogEntry, CatalogResponse};
use crate::models::error::SError;
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, error, info, instrument, warn};

/// Cache-first client for the remote catalog.
///
/// The client is the only mutator of its cache; `&mut self` on every fetch
/// serializes cache writes.
pub struct CatalogClient<T> {
    transport: T,
    cache: MetadataCache,
}

impl<T: CatalogTransport> CatalogClient<T> {
    pub fn new(transport: T, cache: MetadataCache) -> Self {
        Self { transport, cache }
    }

    pub fn cache(&self) -> &MetadataCache {
        &self.cache
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn has_cache(&self) -> bool {
        self.cache.has_cache()
    }

    pub async fn delete_cache(&mut self) {
        self.cache.delete().await;
    }

    /// Entries for one app id, from the cache when present.
    ///
    /// A non-2xx response is an error. A payload that fails to decode is
    /// logged and yields an empty list, so one bad title never blocks others.
    #[instrument(skip(self))]
    pub async fn fetch_one(&mut self, app_id: &str) -> Result<Vec<CatalogEntry>, SError> {
        if is_blacklisted(app_id) {
            debug!("App {app_id} is blacklisted, not fetching");
            return Ok(Vec::new());
        }

        if let Some(cached) = self.cache.get(app_id) {
            debug!("Returning from cache for id {app_id}");
            return Ok(cached.clone());
        }

        let response = self
            .transport
            .fetch(CatalogRequest::Single(app_id.to_string()))
            .await?;

        let entries = Self::or_empty_on_decode(Self::decode(&response), app_id)?;
        if entries.is_empty() {
            return Ok(entries);
        }
        info!("Decoded {} items for game {app_id}", entries.len());

        self.cache.put(app_id, entries.clone());
        self.cache.save().await;
        Ok(entries)
    }

    /// Fetches each id in order, one at a time, and returns the results per id.
    ///
    /// Failures are logged and give that id an empty list. `on_progress`
    /// receives `100 * processed / total` after each item and exactly `100.0`
    /// after the last; it is never called for an empty input.
    pub async fn fetch_batch_grouped<F>(
        &mut self,
        app_ids: &[String],
        mut on_progress: F,
    ) -> Vec<(String, Vec<CatalogEntry>)>
    where
        F: FnMut(f64),
    {
        let total = app_ids.len();
        let mut results = Vec::with_capacity(total);

        for (index, app_id) in app_ids.iter().enumerate() {
            let entries = self.fetch_one(app_id).await.unwrap_or_else(|e| {
                warn!("Fetching {app_id} failed: {e}");
                Vec::new()
            });
            results.push((app_id.clone(), entries));

            let processed = index + 1;
            let percent = if processed == total {
                100.0
            } else {
                100.0 * (processed as f64 / total as f64)
            };
            on_progress(percent);
        }

        results
    }

    /// Flattened form of [`CatalogClient::fetch_batch_grouped`].
    pub async fn fetch_batch<F>(&mut self, app_ids: &[String], on_progress: F) -> Vec<CatalogEntry>
    where
        F: FnMut(f64),
    {
        self.fetch_batch_grouped(app_ids, on_progress)
            .await
            .into_iter()
            .flat_map(|(_, entries)| entries)
            .collect()
    }

    /// Fetches every uncached, non-blacklisted id in a single multi-id request
    /// and merges the result with the cached subset.
    ///
    /// When everything is cached no request is made. Fresh entries are cached
    /// under the requested id they answer and the cache is saved once.
    #[instrument(skip_all, fields(count = app_ids.len()))]
    pub async fn fetch_uncached(&mut self, app_ids: &[String]) -> Result<Vec<CatalogEntry>, SError> {
        let wanted: Vec<&String> = app_ids
            .iter()
            .filter(|id| !is_blacklisted(id))
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        let mut cached: Vec<CatalogEntry> = Vec::new();
        let mut missing: Vec<String> = Vec::new();
        for id in wanted {
            match self.cache.get(id) {
                Some(entries) => cached.extend(entries.iter().cloned()),
                None => missing.push(id.clone()),
            }
        }

        if missing.is_empty() {
            debug!("All {} requested ids are cached", cached.len());
            return Ok(cached);
        }

        let label = missing.join(",");
        let response = self
            .transport
            .fetch(CatalogRequest::Multi(missing.clone()))
            .await?;
        let fresh = Self::or_empty_on_decode(Self::decode(&response), &label)?;
        info!("Decoded {} items for {label}", fresh.len());

        let grouped = Self::group_by_request(&missing, &fresh);
        let stored = !grouped.is_empty();
        for (id, entries) in grouped {
            self.cache.put(&id, entries);
        }
        if stored {
            self.cache.save().await;
        }

        cached.extend(fresh);
        Ok(cached)
    }

    /// Attributes fresh entries to the requested ids, keeping every entry of
    /// a group. With a single requested id the whole list belongs to it;
    /// otherwise entries whose id was not requested cannot be cached.
    fn group_by_request(
        missing: &[String],
        fresh: &[CatalogEntry],
    ) -> BTreeMap<String, Vec<CatalogEntry>> {
        let mut grouped: BTreeMap<String, Vec<CatalogEntry>> = BTreeMap::new();
        if let [only] = missing {
            if !fresh.is_empty() {
                grouped.insert(only.clone(), fresh.to_vec());
            }
            return grouped;
        }

        for entry in fresh {
            let id = entry.app_id();
            if missing.contains(&id) {
                grouped.entry(id).or_default().push(entry.clone());
            } else {
                warn!("Entry {id} matches no requested id, not caching it");
            }
        }
        grouped
    }

    fn decode(response: &RawResponse) -> Result<Vec<CatalogEntry>, SError> {
        if !response.is_success() {
            return Err(SError::Http {
                status: response.status,
            });
        }

        let root: CatalogResponse = serde_json::from_slice(&response.body)?;
        Ok(root.data)
    }

    /// Decode failures are logged and become an empty list; other errors pass through.
    fn or_empty_on_decode(
        result: Result<Vec<CatalogEntry>, SError>,
        label: &str,
    ) -> Result<Vec<CatalogEntry>, SError> {
        match result {
            Err(SError::Decode(cause, msg)) => {
                error!("Decoding failed for id {label}: {cause}: {msg}");
                Ok(Vec::new())
            }
            other => other,
        }
    }
}
