// src/config/options_store.rs
use crate::models::error::SError;
use crate::models::launch_options::LaunchOptions;
use camino::{Utf8Path, Utf8PathBuf};
use tracing::{debug, warn};

const KEY_NAMESPACE: &str = "GameOptions";

/// Persists per-title launch options, one file per `GameOptions.<appID>` key.
#[derive(Debug, Clone)]
pub struct OptionsStore {
    root: Utf8PathBuf,
}

impl OptionsStore {
    pub fn new(root: impl Into<Utf8PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Utf8Path {
        &self.root
    }

    pub fn key(app_id: &str) -> String {
        format!("{KEY_NAMESPACE}.{app_id}")
    }

    fn file_for(&self, app_id: &str) -> Utf8PathBuf {
        self.root.join(format!("{}.toml", Self::key(app_id)))
    }

    /// Saved options for `app_id`, or `None` if none were ever stored or the
    /// stored file is unreadable.
    pub fn load(&self, app_id: &str) -> Option<LaunchOptions> {
        let path = self.file_for(app_id);
        if !path.exists() {
            return None;
        }

        match confy::load_path::<LaunchOptions>(&path) {
            // Round-trip through the builder so hand-edited values are normalized
            Ok(opts) => Some(opts.to_builder().build()),
            Err(e) => {
                warn!("Ignoring unreadable options at {path}: {e}");
                None
            }
        }
    }

    pub fn save(&self, app_id: &str, options: &LaunchOptions) -> Result<(), SError> {
        let path = self.file_for(app_id);
        debug!("Storing options for {app_id} at {path}");
        confy::store_path(&path, options)?;
        Ok(())
    }

    pub fn remove(&self, app_id: &str) -> Result<(), SError> {
        let path = self.file_for(app_id);
        if path.exists() {
            std::fs::remove_file(&path)?;
        }
        Ok(())
    }
}
