// src/core/registry.rs
use crate::config::{AppPaths, AppSettings};
use crate::core::cache::MetadataCache;
use crate::core::catalog::CatalogClient;
use crate::core::library::Library;
use crate::core::transport::HttpTransport;
use crate::models::error::SError;
use std::sync::Arc;

/// Shared state handed to every command.
pub struct AppRegistry<T = HttpTransport> {
    // Scanner work runs on blocking threads, so this lock may park
    pub library: Arc<parking_lot::Mutex<Library>>,
    // Held across network awaits
    pub client: Arc<tokio::sync::Mutex<CatalogClient<T>>>,
    pub settings: Arc<parking_lot::Mutex<AppSettings>>,
}

impl AppRegistry<HttpTransport> {
    /// Builds the registry with the HTTP catalog and the on-disk cache loaded.
    pub async fn new(settings: AppSettings, paths: &AppPaths) -> Result<Self, SError> {
        let transport = HttpTransport::new(settings.catalog.clone())?;
        let mut cache = MetadataCache::new(paths.cache_file.clone());
        cache.load().await;

        Ok(Self::with_client(settings, CatalogClient::new(transport, cache)))
    }
}

impl<T> AppRegistry<T> {
    pub fn with_client(settings: AppSettings, client: CatalogClient<T>) -> Self {
        Self {
            library: Arc::new(parking_lot::Mutex::new(Library::new())),
            client: Arc::new(tokio::sync::Mutex::new(client)),
            settings: Arc::new(parking_lot::Mutex::new(settings)),
        }
    }
}
