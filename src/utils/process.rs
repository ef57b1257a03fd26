use sysinfo::{Pid, Signal, System};
use tracing::debug;

/// Running-process introspection used to tear down a previous launch.
pub trait ProcessTable {
    /// Pids whose executable name (or first argv entry) ends with `suffix`,
    /// compared case-insensitively.
    fn find_by_suffix(&mut self, suffix: &str) -> Vec<u32>;
    /// Graceful terminate (SIGTERM). Returns whether the signal was sent.
    fn terminate(&mut self, pid: u32) -> bool;
    /// Forceful terminate (SIGKILL).
    fn kill(&mut self, pid: u32) -> bool;
    fn is_alive(&mut self, pid: u32) -> bool;
}

fn ends_with_ignore_case(haystack: &str, suffix: &str) -> bool {
    haystack.len() >= suffix.len()
        && haystack
            .get(haystack.len() - suffix.len()..)
            .is_some_and(|tail| tail.eq_ignore_ascii_case(suffix))
}

pub struct ProcessChecker {
    sys: System,
}

impl Default for ProcessChecker {
    fn default() -> Self {
        Self::new()
    }
}

impl ProcessChecker {
    pub fn new() -> Self {
        Self { sys: System::new() }
    }
}

impl ProcessTable for ProcessChecker {
    fn find_by_suffix(&mut self, suffix: &str) -> Vec<u32> {
        // Refresh only what we need
        self.sys.refresh_processes();

        self.sys
            .processes()
            .iter()
            .filter(|(_, p)| {
                ends_with_ignore_case(p.name(), suffix)
                    || p.cmd()
                        .first()
                        .is_some_and(|arg0| ends_with_ignore_case(arg0, suffix))
            })
            .map(|(pid, _)| pid.as_u32())
            .collect()
    }

    fn terminate(&mut self, pid: u32) -> bool {
        let sent = self
            .sys
            .process(Pid::from_u32(pid))
            .and_then(|p| p.kill_with(Signal::Term))
            .unwrap_or(false);
        debug!("SIGTERM to {pid}: {sent}");
        sent
    }

    fn kill(&mut self, pid: u32) -> bool {
        let sent = self
            .sys
            .process(Pid::from_u32(pid))
            .map(|p| p.kill())
            .unwrap_or(false);
        debug!("SIGKILL to {pid}: {sent}");
        sent
    }

    fn is_alive(&mut self, pid: u32) -> bool {
        let pid = Pid::from_u32(pid);
        self.sys.refresh_process(pid) && self.sys.process(pid).is_some()
    }
}
