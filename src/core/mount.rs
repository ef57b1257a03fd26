use crate::core::library::Library;
use crate::models::library::GameMeta;
use crate::utils::thread::with_library_mut;
use camino::{Utf8Path, Utf8PathBuf};
use parking_lot::Mutex;
use std::collections::{BTreeSet, VecDeque};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

pub const VOLUMES_DIR: &str = "/Volumes";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MountEvent {
    Mounted(Utf8PathBuf),
    Unmounted(Utf8PathBuf),
}

/// Source of volume mount and unmount notifications.
pub trait MountEventSource {
    /// Waits for the next event. `None` ends the stream.
    fn next_event(&mut self) -> impl Future<Output = Option<MountEvent>> + Send;
}

/// Watches a volumes directory by diffing its listing on an interval.
pub struct VolumePoller {
    dir: Utf8PathBuf,
    interval: Duration,
    known: BTreeSet<Utf8PathBuf>,
    pending: VecDeque<MountEvent>,
}

impl VolumePoller {
    /// Takes the current listing as the baseline; only later changes are reported.
    pub async fn new(dir: impl Into<Utf8PathBuf>, interval: Duration) -> Self {
        let dir = dir.into();
        let known = Self::list(&dir).await;
        Self {
            dir,
            interval,
            known,
            pending: VecDeque::new(),
        }
    }

    async fn list(dir: &Utf8Path) -> BTreeSet<Utf8PathBuf> {
        let mut found = BTreeSet::new();
        let mut entries = match tokio::fs::read_dir(dir).await {
            Ok(entries) => entries,
            Err(e) => {
                warn!("Cannot list volumes in {dir}: {e}");
                return found;
            }
        };
        while let Ok(Some(entry)) = entries.next_entry().await {
            if let Ok(path) = Utf8PathBuf::from_path_buf(entry.path()) {
                found.insert(path);
            }
        }
        found
    }

    /// Diffs the listing against the previous one.
    pub async fn poll_once(&mut self) -> Vec<MountEvent> {
        let current = Self::list(&self.dir).await;

        let mut events: Vec<MountEvent> = current
            .difference(&self.known)
            .cloned()
            .map(MountEvent::Mounted)
            .collect();
        events.extend(
            self.known
                .difference(&current)
                .cloned()
                .map(MountEvent::Unmounted),
        );

        self.known = current;
        events
    }
}

impl MountEventSource for VolumePoller {
    async fn next_event(&mut self) -> Option<MountEvent> {
        loop {
            if let Some(event) = self.pending.pop_front() {
                return Some(event);
            }
            tokio::time::sleep(self.interval).await;
            let events = self.poll_once().await;
            self.pending.extend(events);
        }
    }
}

/// Rescans `roots` plus every root the scanner already knows each time the
/// source reports a mount change. Returns once the source ends.
pub async fn watch_mounts<S, F>(
    source: &mut S,
    library: Arc<Mutex<Library>>,
    roots: Vec<Utf8PathBuf>,
    mut on_rescan: F,
) where
    S: MountEventSource,
    F: FnMut(Vec<GameMeta>),
{
    while let Some(event) = source.next_event().await {
        info!("Volume change: {event:?}");

        let registered = roots.clone();
        let result = with_library_mut(library.clone(), move |lib| {
            let mut all: BTreeSet<Utf8PathBuf> = registered.into_iter().collect();
            all.extend(lib.known_roots());
            let all: Vec<Utf8PathBuf> = all.into_iter().collect();
            lib.rescan(&all)
        })
        .await;

        match result {
            Ok(games) => {
                debug!("Rescan found {} games", games.len());
                on_rescan(games);
            }
            Err(e) => warn!("Rescan after volume change failed: {e}"),
        }
    }
}
