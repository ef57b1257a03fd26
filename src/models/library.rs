use camino::{Utf8Path, Utf8PathBuf};
use serde::{Deserialize, Serialize};

/// One installed title, as described by a manifest inside a library root.
///
/// Identity is the `(library_root, app_id)` pair: the same title may be
/// installed under more than one root.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct GameMeta {
    pub app_id: String,
    pub install_dir: String,
    pub library_root: Utf8PathBuf,
    pub game_dir: Utf8PathBuf,
    pub is_native: bool,
}

impl GameMeta {
    pub fn belongs_to(&self, root: &Utf8Path) -> bool {
        self.library_root == root
    }
}
