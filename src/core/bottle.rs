use crate::models::error::SError;
use crate::models::launch_options::LaunchOptions;
use crate::models::paths::{BottlePaths, BottleRoots};
use camino::{Utf8Path, Utf8PathBuf};
use tracing::{debug, info, warn};

pub const GRAPHICS_BACKEND_KEY: &str = "CX_GRAPHICS_BACKEND";
pub const MSYNC_KEY: &str = "WINEMSYNC";

/// A CrossOver bottle: an isolated wine prefix with its own config file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bottle {
    pub name: String,
    pub root: Utf8PathBuf,
}

impl Bottle {
    pub fn new(root: impl Into<Utf8PathBuf>) -> Self {
        let root = root.into();
        let name = root.file_name().unwrap_or_default().to_string();
        Self { name, root }
    }

    pub fn paths(&self) -> BottlePaths {
        BottlePaths::new(&self.root)
    }
}

/// Bottle directories under the CrossOver bottle root, plus the patched
/// bottle root when asked. Missing roots are skipped.
pub fn list_bottles(home: &Utf8Path, include_patched: bool) -> Vec<Bottle> {
    let roots = BottleRoots::new(home);
    let mut dirs = vec![roots.crossover];
    if include_patched {
        dirs.push(roots.patched);
    }

    let mut bottles: Vec<Bottle> = dirs
        .iter()
        .flat_map(|dir| match std::fs::read_dir(dir) {
            Ok(entries) => entries.flatten().collect::<Vec<_>>(),
            Err(e) => {
                warn!("Cannot list bottles in {dir}: {e}");
                Vec::new()
            }
        })
        .filter(|entry| entry.file_type().map(|t| t.is_dir()).unwrap_or(false))
        .filter_map(|entry| Utf8PathBuf::from_path_buf(entry.path()).ok())
        .map(Bottle::new)
        .collect();

    bottles.sort_by(|a, b| a.name.cmp(&b.name));
    bottles
}

/// The listed bottle called `name`.
pub fn find_bottle(home: &Utf8Path, include_patched: bool, name: &str) -> Result<Bottle, SError> {
    list_bottles(home, include_patched)
        .into_iter()
        .find(|b| b.name == name)
        .ok_or_else(|| SError::UnknownBottle(name.to_string()))
}

/// Bottle config values driven by the launch options.
pub fn tracked_values(options: &LaunchOptions) -> Vec<(&'static str, String)> {
    vec![
        (GRAPHICS_BACKEND_KEY, options.backend().to_string()),
        (MSYNC_KEY, if options.sync_mode() { "1" } else { "0" }.to_string()),
    ]
}

/// Replaces every line that starts with a tracked key's quoted form by
/// `"<key>"="<value>"`, keeping its carriage return if it had one. All other
/// lines are returned untouched, line endings included.
pub fn rewrite_lines(text: &str, values: &[(&str, String)]) -> String {
    text.split('\n')
        .map(|line| {
            values
                .iter()
                .find(|(key, _)| line.starts_with(&format!("\"{key}\"")))
                .map(|(key, value)| {
                    let cr = if line.ends_with('\r') { "\r" } else { "" };
                    format!("\"{key}\"=\"{value}\"{cr}")
                })
                .unwrap_or_else(|| line.to_string())
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Rewrites the bottle config file in place.
///
/// The file is overwritten directly rather than replaced; an interrupted
/// write can leave it truncated.
pub fn rewrite_config(path: &Utf8Path, values: &[(&str, String)]) -> Result<(), SError> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| SError::ConfigRewrite(format!("read {path}: {e}")))?;

    let rewritten = rewrite_lines(&text, values);
    if rewritten == text {
        debug!("Bottle config {path} already up to date");
    }

    std::fs::write(path, rewritten)
        .map_err(|e| SError::ConfigRewrite(format!("write {path}: {e}")))?;
    info!("Bottle config {path} rewritten");
    Ok(())
}
