mod common;

use camino::Utf8PathBuf;
use common::{setup_library_root, write_manifest};
use parking_lot::Mutex;
use procyon_lib::core::library::Library;
use procyon_lib::core::mount::{watch_mounts, MountEvent, MountEventSource, VolumePoller};
use std::collections::VecDeque;
use std::fs;
use std::sync::Arc;
use std::time::Duration;

struct ScriptedEvents(VecDeque<MountEvent>);

impl MountEventSource for ScriptedEvents {
    async fn next_event(&mut self) -> Option<MountEvent> {
        self.0.pop_front()
    }
}

#[tokio::test]
async fn test_poller_reports_mounts_and_unmounts() {
    let tmp = tempfile::tempdir().unwrap();
    let volumes = Utf8PathBuf::from_path_buf(tmp.path().to_path_buf()).unwrap();
    fs::create_dir_all(volumes.join("Macintosh HD")).unwrap();

    let mut poller = VolumePoller::new(volumes.clone(), Duration::from_millis(10)).await;
    assert!(poller.poll_once().await.is_empty());

    fs::create_dir_all(volumes.join("Games")).unwrap();
    assert_eq!(
        poller.poll_once().await,
        vec![MountEvent::Mounted(volumes.join("Games"))]
    );

    fs::remove_dir_all(volumes.join("Games")).unwrap();
    assert_eq!(
        poller.next_event().await,
        Some(MountEvent::Unmounted(volumes.join("Games")))
    );
}

#[tokio::test]
async fn test_watch_mounts_rescans_on_each_event() {
    let (_tmp, root) = setup_library_root();
    write_manifest(&root, "10", "Alpha");

    let library = Arc::new(Mutex::new(Library::new()));
    library.lock().scan(&root).unwrap();

    // The volume comes back with a second title installed
    write_manifest(&root, "20", "Beta");
    let mut events = ScriptedEvents(VecDeque::from([MountEvent::Mounted(root.clone())]));

    let mut rescans = Vec::new();
    watch_mounts(&mut events, library.clone(), vec![root.clone()], |games| {
        rescans.push(games.len())
    })
    .await;

    assert_eq!(rescans, vec![2]);
    assert_eq!(library.lock().games().len(), 2);
}
