use crate::core::library::Library;
use crate::models::error::SError;
use parking_lot::Mutex;
use std::sync::Arc;

/// Runs `f` against the shared scanner on a blocking thread.
pub async fn with_library_mut<F, R>(handle: Arc<Mutex<Library>>, f: F) -> Result<R, SError>
where
    F: FnOnce(&mut Library) -> R + Send + 'static,
    R: Send + 'static,
{
    let r = tokio::task::spawn_blocking(move || {
        let mut guard = handle.lock();
        f(&mut *guard)
    })
    .await?;
    Ok(r)
}
