use crate::core::manifest::{self, ManifestRecord};
use crate::models::blacklist::is_blacklisted;
use crate::models::error::SError;
use crate::models::library::GameMeta;
use crate::models::paths::{SteamLibraryPaths, MANIFEST_EXTENSION, NON_NATIVE_EXTENSION};
use camino::{Utf8Path, Utf8PathBuf};
use regex::Regex;
use std::sync::OnceLock;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

fn manifest_name_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(&format!(r"^appmanifest_(\d+)\.{MANIFEST_EXTENSION}$"))
            .expect("manifest name pattern is valid")
    })
}

fn volume_name_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^/Volumes/(.+?)/steamapps/?$").expect("volume name pattern is valid")
    })
}

/// Extracts the numeric app id from a manifest file name.
pub fn extract_app_id(file_name: &str) -> Option<&str> {
    manifest_name_pattern()
        .captures(file_name)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Display name for a library root: the volume name for roots on mounted
/// volumes, the full path otherwise.
pub fn volume_name(root: &Utf8Path) -> String {
    volume_name_pattern()
        .captures(root.as_str())
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .unwrap_or_else(|| root.to_string())
}

/// True when no file under `game_dir` has the Windows executable extension.
/// Stops at the first match.
pub fn probe_is_native(game_dir: &Utf8Path) -> bool {
    !WalkDir::new(game_dir)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .any(|e| {
            e.path()
                .extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| ext.eq_ignore_ascii_case(NON_NATIVE_EXTENSION))
        })
}

/// The set of installed titles discovered in this session.
#[derive(Default, Debug)]
pub struct Library {
    games: Vec<GameMeta>,
}

impl Library {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn games(&self) -> &[GameMeta] {
        &self.games
    }

    pub fn is_known_root(&self, root: &Utf8Path) -> bool {
        self.games.iter().any(|g| g.belongs_to(root))
    }

    /// Distinct roots that currently contribute at least one title.
    pub fn known_roots(&self) -> Vec<Utf8PathBuf> {
        let mut roots: Vec<Utf8PathBuf> = self.games.iter().map(|g| g.library_root.clone()).collect();
        roots.sort();
        roots.dedup();
        roots
    }

    pub fn find(&self, app_id: &str) -> Option<&GameMeta> {
        self.games.iter().find(|g| g.app_id == app_id)
    }

    /// Drops every title that came from `root`.
    pub fn forget(&mut self, root: &Utf8Path) {
        self.games.retain(|g| !g.belongs_to(root));
    }

    /// Scans `root` and records the titles found there.
    ///
    /// A root that already contributed titles this session is not scanned
    /// again; the call returns an empty list. Use [`Library::rescan`] to
    /// refresh it.
    pub fn scan(&mut self, root: &Utf8Path) -> Result<Vec<GameMeta>, SError> {
        if self.is_known_root(root) {
            debug!("Library root {root} already scanned, skipping");
            return Ok(Vec::new());
        }

        let found = Self::read_root(root)?;
        info!("Found {} games in {root}", found.len());
        self.games.extend(found.iter().cloned());
        Ok(found)
    }

    /// Forgets and scans each root again. Roots that fail are logged and skipped.
    pub fn rescan(&mut self, roots: &[Utf8PathBuf]) -> Vec<GameMeta> {
        roots
            .iter()
            .flat_map(|root| {
                self.forget(root);
                self.scan(root).unwrap_or_else(|e| {
                    warn!("Rescan of {root} failed: {e}");
                    Vec::new()
                })
            })
            .collect()
    }

    /// Reads the manifests directly inside `root` without touching session state.
    pub fn read_root(root: &Utf8Path) -> Result<Vec<GameMeta>, SError> {
        let entries = std::fs::read_dir(root)
            .map_err(|e| SError::Access(root.to_string(), e.to_string()))?;
        let lib_paths = SteamLibraryPaths::new(root);

        let mut games: Vec<GameMeta> = entries
            .flatten()
            .filter_map(|entry| Utf8PathBuf::from_path_buf(entry.path()).ok())
            .filter(|path| path.is_file())
            .filter(|path| path.extension() == Some(MANIFEST_EXTENSION))
            .filter_map(|path| {
                let file_name = path.file_name()?;
                if file_name.starts_with('.') {
                    return None;
                }
                let Some(id) = extract_app_id(file_name) else {
                    debug!("Skipping manifest with unexpected name: {path}");
                    return None;
                };
                if is_blacklisted(id) {
                    debug!("Skipping blacklisted app {id}");
                    return None;
                }
                Some(path)
            })
            .map(|path| {
                let record = Self::read_manifest(&path);
                Self::to_game_meta(root, &lib_paths, record)
            })
            .collect();

        games.sort_by(|a, b| a.app_id.cmp(&b.app_id));
        Ok(games)
    }

    /// Parses one manifest file. Read failures degrade to an empty map, which
    /// yields `"unknown"` fields.
    fn read_manifest(path: &Utf8Path) -> ManifestRecord {
        let text = std::fs::read_to_string(path).unwrap_or_else(|e| {
            warn!("Failed to read manifest {path}: {e}");
            String::new()
        });
        manifest::map_to_record(&manifest::parse_manifest(&text), path)
    }

    fn to_game_meta(root: &Utf8Path, lib_paths: &SteamLibraryPaths, record: ManifestRecord) -> GameMeta {
        let game_dir = lib_paths.common.join(&record.install_dir);
        let is_native = probe_is_native(&game_dir);

        GameMeta {
            app_id: record.app_id,
            install_dir: record.install_dir,
            library_root: root.to_path_buf(),
            game_dir,
            is_native,
        }
    }
}
