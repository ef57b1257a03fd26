pub mod options_store;

use crate::core::cache::CACHE_FILE_NAME;
use camino::{Utf8Path, Utf8PathBuf};
use directories::{ProjectDirs, UserDirs};
use serde::{Deserialize, Serialize};

const APP_NAME: &str = "procyon";
const API_KEY_ENV: &str = "PROCYON_API_KEY";

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("com", "procyon", APP_NAME)
}

pub fn home_dir() -> Utf8PathBuf {
    UserDirs::new()
        .and_then(|dirs| Utf8PathBuf::from_path_buf(dirs.home_dir().to_path_buf()).ok())
        .unwrap_or_else(|| Utf8PathBuf::from("."))
}

/// Where the remote catalog lives.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct CatalogSettings {
    pub protocol: String,
    pub host: String,
    pub path: String,
    pub multi_path: String,
    pub api_key: String,
}

impl Default for CatalogSettings {
    fn default() -> Self {
        Self {
            protocol: "https".to_string(),
            host: "localhost".to_string(),
            path: "/api/games".to_string(),
            multi_path: "/api/games/multi".to_string(),
            api_key: String::new(),
        }
    }
}

impl CatalogSettings {
    pub fn base_url(&self) -> String {
        format!("{}://{}{}", self.protocol, self.host, self.path)
    }

    pub fn multi_url(&self) -> String {
        format!("{}://{}{}", self.protocol, self.host, self.multi_path)
    }

    /// The configured key, unless overridden by `PROCYON_API_KEY`.
    pub fn api_key(&self) -> String {
        std::env::var(API_KEY_ENV).unwrap_or_else(|_| self.api_key.clone())
    }
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(default)]
pub struct AppSettings {
    pub version: u8,
    /// Registered `steamapps` directories.
    pub library_roots: Vec<Utf8PathBuf>,
    pub crossover_app: Utf8PathBuf,
    pub native_client: Utf8PathBuf,
    pub shell: String,
    pub selected_bottle: Option<String>,
    pub include_patched_bottles: bool,
    pub catalog: CatalogSettings,
}

impl Default for AppSettings {
    fn default() -> Self {
        let home = home_dir();
        Self {
            version: 0,
            library_roots: Vec::new(),
            crossover_app: "/Applications/CrossOver.app".into(),
            native_client: home.join(
                "Library/Application Support/Steam/Steam.AppBundle/Steam/Contents/MacOS/steam_osx",
            ),
            shell: "/bin/zsh".to_string(),
            selected_bottle: None,
            include_patched_bottles: false,
            catalog: CatalogSettings::default(),
        }
    }
}

impl AppSettings {
    pub fn load() -> Result<AppSettings, confy::ConfyError> {
        confy::load(APP_NAME, None)
    }

    pub fn save(&self) -> Result<(), confy::ConfyError> {
        confy::store(APP_NAME, None, self)
    }

    pub fn load_path(path: &Utf8Path) -> Result<AppSettings, confy::ConfyError> {
        confy::load_path(path)
    }

    pub fn save_path(&self, path: &Utf8Path) -> Result<(), confy::ConfyError> {
        confy::store_path(path, self)
    }
}

/// Per-user directories for everything that is not a setting.
#[derive(Debug, Clone)]
pub struct AppPaths {
    pub cache_file: Utf8PathBuf,
    pub log_dir: Utf8PathBuf,
    pub options_dir: Utf8PathBuf,
}

impl AppPaths {
    pub fn resolve() -> Self {
        let dirs = project_dirs();
        let dir = |pick: fn(&ProjectDirs) -> &std::path::Path| {
            dirs.as_ref()
                .and_then(|d| Utf8PathBuf::from_path_buf(pick(d).to_path_buf()).ok())
                .unwrap_or_else(|| Utf8PathBuf::from("."))
        };

        let cache_dir = dir(ProjectDirs::cache_dir);
        let data_dir = dir(ProjectDirs::data_dir);
        let config_dir = dir(ProjectDirs::config_dir);

        Self {
            cache_file: cache_dir.join(CACHE_FILE_NAME),
            log_dir: data_dir.join("logs"),
            options_dir: config_dir.join("options"),
        }
    }
}
