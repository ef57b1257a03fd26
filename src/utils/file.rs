use crate::models::error::SError;
use camino::{Utf8Path, Utf8PathBuf};

pub struct FileUtils;

impl FileUtils {
    /// Writes `data` to a sibling temp file and renames it over `path`, so
    /// readers see either the old or the new content, never a partial file.
    pub async fn write_atomic(path: &Utf8Path, data: &[u8]) -> Result<(), SError> {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let tmp = Self::temp_sibling(path);
        tokio::fs::write(&tmp, data).await?;
        if let Err(e) = tokio::fs::rename(&tmp, path).await {
            let _ = tokio::fs::remove_file(&tmp).await;
            return Err(e.into());
        }
        Ok(())
    }

    fn temp_sibling(path: &Utf8Path) -> Utf8PathBuf {
        let name = path.file_name().unwrap_or("data");
        path.with_file_name(format!(".{name}.tmp"))
    }
}
