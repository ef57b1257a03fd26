use crate::config::AppSettings;
use crate::core::catalog::CatalogClient;
use crate::core::library::Library;
use crate::core::transport::CatalogTransport;
use crate::models::error::SError;
use crate::models::game::Game;
use crate::models::library::GameMeta;
use crate::utils::thread::with_library_mut;
use camino::{Utf8Path, Utf8PathBuf};
use parking_lot::Mutex;
use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;
use tracing::{error, info, instrument, warn};

/// Service for managing library roots and resolving them into games.
/// Keeps the registered roots in the settings in step with the scanner.
pub struct LibraryService {
    settings_path: Option<Utf8PathBuf>,
}

impl LibraryService {
    /// Persists settings to the default confy location.
    pub fn new() -> Self {
        Self {
            settings_path: None,
        }
    }

    /// Persists settings to an explicit file instead.
    pub fn with_settings_path(path: impl Into<Utf8PathBuf>) -> Self {
        Self {
            settings_path: Some(path.into()),
        }
    }

    fn persist(&self, settings: &AppSettings) {
        let result = match &self.settings_path {
            Some(path) => settings.save_path(path),
            None => settings.save(),
        };
        if let Err(e) = result {
            error!("Failed to save settings: {e}");
        }
    }

    /// Registers a library root and scans it.
    pub fn add_library(
        &self,
        settings: &mut AppSettings,
        library: &mut Library,
        root: &Utf8Path,
    ) -> Result<Vec<GameMeta>, SError> {
        // 1. Resolve the root. Failures propagate and the settings stay untouched.
        let root = canonical_root(root)?;

        // 2. Reject folders without any manifest
        if Library::read_root(&root)?.is_empty() {
            return Err(SError::EmptyLibrary(root.to_string()));
        }

        library.forget(&root);
        let games = library.scan(&root)?;

        // 3. Update config only on success
        if !settings.library_roots.contains(&root) {
            settings.library_roots.push(root.clone());
            self.persist(settings);
        }
        info!("Library {root} added with {} games", games.len());

        Ok(games)
    }

    /// Unregisters a root and drops its titles. Returns whether it was registered.
    /// An unmounted root cannot be resolved and is matched as given.
    pub fn remove_library(&self, settings: &mut AppSettings, library: &mut Library, root: &Utf8Path) -> bool {
        let root = canonical_root(root).unwrap_or_else(|_| root.to_path_buf());
        library.forget(&root);

        let before = settings.library_roots.len();
        settings.library_roots.retain(|r| *r != root);
        let removed = settings.library_roots.len() != before;
        if removed {
            self.persist(settings);
        }
        removed
    }

    pub fn library_roots(&self, settings: &AppSettings) -> Vec<Utf8PathBuf> {
        settings.library_roots.clone()
    }

    /// Scans every registered root and joins the titles with their catalog
    /// entries. Roots that cannot be read are logged and skipped; titles with
    /// no catalog entry are left out.
    #[instrument(skip_all)]
    pub async fn load_games<T, F>(
        &self,
        settings: &AppSettings,
        library: Arc<Mutex<Library>>,
        client: &mut CatalogClient<T>,
        on_progress: F,
    ) -> Result<Vec<Game>, SError>
    where
        T: CatalogTransport,
        F: FnMut(f64),
    {
        if settings.library_roots.is_empty() {
            return Err(SError::NoLibraries);
        }

        // 1. Scan (blocking file IO)
        let roots = settings.library_roots.clone();
        let metas = with_library_mut(library, move |lib| {
            for root in &roots {
                if let Err(e) = lib.scan(root) {
                    warn!("Skipping library {root}: {e}");
                }
            }
            lib.games().to_vec()
        })
        .await?;

        // 2. Resolve each distinct id once
        let ids: Vec<String> = metas
            .iter()
            .map(|m| m.app_id.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        let resolved: HashMap<String, _> = client
            .fetch_batch_grouped(&ids, on_progress)
            .await
            .into_iter()
            .collect();

        // 3. Join
        let games: Vec<Game> = metas
            .into_iter()
            .flat_map(|meta| {
                resolved
                    .get(&meta.app_id)
                    .cloned()
                    .unwrap_or_default()
                    .into_iter()
                    .map(move |entry| Game {
                        entry,
                        meta: meta.clone(),
                    })
            })
            .collect();

        info!("Loaded {} games", games.len());
        Ok(games)
    }

    /// Case-insensitive name filter; an empty query keeps everything.
    pub fn filter_games(games: &[Game], query: &str) -> Vec<Game> {
        games.iter().filter(|g| g.matches(query)).cloned().collect()
    }
}

fn canonical_root(root: &Utf8Path) -> Result<Utf8PathBuf, SError> {
    let resolved = dunce::canonicalize(root).map_err(|e| SError::Access(root.to_string(), e.to_string()))?;
    Utf8PathBuf::from_path_buf(resolved)
        .map_err(|p| SError::Access(p.display().to_string(), "non UTF-8 path".into()))
}

impl Default for LibraryService {
    fn default() -> Self {
        Self::new()
    }
}
