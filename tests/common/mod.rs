#![allow(dead_code)]

use camino::{Utf8Path, Utf8PathBuf};
use parking_lot::Mutex;
use procyon_lib::core::transport::{CatalogRequest, CatalogTransport, RawResponse};
use procyon_lib::models::catalog::CatalogEntry;
use procyon_lib::models::error::SError;
use procyon_lib::utils::process::ProcessTable;
use procyon_lib::utils::shell::ShellSpawner;
use serde_json::json;
use std::collections::BTreeMap;
use std::fs;
use std::sync::Arc;
use tempfile::TempDir;

/// Temp dir plus a `steamapps`-like root inside it.
pub fn setup_library_root() -> (TempDir, Utf8PathBuf) {
    let tmp = tempfile::tempdir().unwrap();
    let base = Utf8PathBuf::from_path_buf(tmp.path().to_path_buf()).unwrap();
    let root = base.join("steamapps");
    fs::create_dir_all(root.join("common")).unwrap();
    (tmp, root)
}

/// Writes `appmanifest_<id>.acf` with the usual vendor layout.
pub fn write_manifest(root: &Utf8Path, app_id: &str, install_dir: &str) {
    let text = format!(
        "\"AppState\"\n{{\n\t\"appid\"\t\t\"{app_id}\"\n\t\"Universe\"\t\t\"1\"\n\t\"name\"\t\t\"Game {app_id}\"\n\t\"installdir\"\t\t\"{install_dir}\"\n\t\"UserConfig\"\n\t{{\n\t\t\"language\"\t\t\"english\"\n\t}}\n}}\n"
    );
    fs::write(root.join(format!("appmanifest_{app_id}.acf")), text).unwrap();
}

/// Creates `root/common/<install_dir>/<file>` for each file.
pub fn write_game_files(root: &Utf8Path, install_dir: &str, files: &[&str]) {
    let dir = root.join("common").join(install_dir);
    for file in files {
        let path = dir.join(file);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "bin").unwrap();
    }
}

pub fn entry_json(app_id: u64, name: &str) -> serde_json::Value {
    json!({
        "type": "game",
        "name": name,
        "steam_appid": app_id,
        "required_age": "0",
        "is_free": false,
        "detailed_description": "",
        "about_the_game": "",
        "short_description": "",
        "header_image": "",
        "capsule_image": "",
        "developers": ["Dev"],
        "publishers": ["Pub"],
        "platforms": { "windows": true, "mac": false, "linux": false },
        "categories": [],
        "release_date": { "coming_soon": false, "date": "1 Jan, 2020" }
    })
}

pub fn catalog_entry(app_id: u64, name: &str) -> CatalogEntry {
    serde_json::from_value(entry_json(app_id, name)).unwrap()
}

pub fn ok_body(entries: &[serde_json::Value]) -> RawResponse {
    RawResponse {
        status: 200,
        body: serde_json::to_vec(&json!({ "data": entries })).unwrap(),
    }
}

type Responder = Box<dyn Fn(&CatalogRequest) -> Result<RawResponse, SError> + Send + Sync>;

/// In-memory catalog that records every request.
pub struct FakeTransport {
    responder: Responder,
    pub calls: Arc<Mutex<Vec<CatalogRequest>>>,
}

impl FakeTransport {
    pub fn new<F>(responder: F) -> Self
    where
        F: Fn(&CatalogRequest) -> Result<RawResponse, SError> + Send + Sync + 'static,
    {
        Self {
            responder: Box::new(responder),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Answers single requests with one entry named `Game <id>`, and multi
    /// requests with one entry per id.
    pub fn echo() -> Self {
        Self::new(|req| {
            let ids = match req {
                CatalogRequest::Single(id) => vec![id.clone()],
                CatalogRequest::Multi(ids) => ids.clone(),
            };
            let entries: Vec<_> = ids
                .iter()
                .map(|id| entry_json(id.parse().unwrap(), &format!("Game {id}")))
                .collect();
            Ok(ok_body(&entries))
        })
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }
}

impl CatalogTransport for FakeTransport {
    async fn fetch(&self, request: CatalogRequest) -> Result<RawResponse, SError> {
        self.calls.lock().push(request.clone());
        (self.responder)(&request)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signal {
    Term,
    Kill,
}

#[derive(Debug, Clone)]
pub struct FakeProcess {
    pub name: String,
    pub exits_on_term: bool,
    pub exits_on_kill: bool,
    pub alive: bool,
}

/// Process table where each process honours SIGTERM, needs SIGKILL, or
/// survives both.
#[derive(Default)]
pub struct FakeProcessTable {
    pub processes: BTreeMap<u32, FakeProcess>,
    pub signals: Vec<(Signal, u32)>,
}

impl FakeProcessTable {
    pub fn with(mut self, pid: u32, name: &str, exits_on_term: bool) -> Self {
        self.processes.insert(
            pid,
            FakeProcess {
                name: name.to_string(),
                exits_on_term,
                exits_on_kill: true,
                alive: true,
            },
        );
        self
    }

    /// A process that ignores both signals, like one stuck in the kernel.
    pub fn with_unkillable(mut self, pid: u32, name: &str) -> Self {
        self.processes.insert(
            pid,
            FakeProcess {
                name: name.to_string(),
                exits_on_term: false,
                exits_on_kill: false,
                alive: true,
            },
        );
        self
    }

    pub fn count(&self, signal: Signal) -> usize {
        self.signals.iter().filter(|(s, _)| *s == signal).count()
    }
}

impl ProcessTable for FakeProcessTable {
    fn find_by_suffix(&mut self, suffix: &str) -> Vec<u32> {
        let suffix = suffix.to_lowercase();
        self.processes
            .iter()
            .filter(|(_, p)| p.alive && p.name.to_lowercase().ends_with(&suffix))
            .map(|(pid, _)| *pid)
            .collect()
    }

    fn terminate(&mut self, pid: u32) -> bool {
        self.signals.push((Signal::Term, pid));
        match self.processes.get_mut(&pid) {
            Some(p) => {
                if p.exits_on_term {
                    p.alive = false;
                }
                true
            }
            None => false,
        }
    }

    fn kill(&mut self, pid: u32) -> bool {
        self.signals.push((Signal::Kill, pid));
        match self.processes.get_mut(&pid) {
            Some(p) => {
                if p.exits_on_kill {
                    p.alive = false;
                }
                true
            }
            None => false,
        }
    }

    fn is_alive(&mut self, pid: u32) -> bool {
        self.processes.get(&pid).is_some_and(|p| p.alive)
    }
}

/// Records commands instead of running them.
pub struct FakeSpawner {
    pub commands: Vec<String>,
    pub next_pid: u32,
    pub fail: bool,
}

impl Default for FakeSpawner {
    fn default() -> Self {
        Self {
            commands: Vec::new(),
            next_pid: 4242,
            fail: false,
        }
    }
}

impl ShellSpawner for FakeSpawner {
    fn spawn(&mut self, command: &str) -> Result<u32, SError> {
        self.commands.push(command.to_string());
        if self.fail {
            return Err(SError::Spawn("refused".into()));
        }
        Ok(self.next_pid)
    }
}
