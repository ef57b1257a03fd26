use crate::models::error::SError;
use std::process::{Command, Stdio};
use tracing::info;

/// Starts a command line through a shell and returns the child's pid
/// without waiting for it.
pub trait ShellSpawner {
    fn spawn(&mut self, command: &str) -> Result<u32, SError>;
}

pub struct Shell {
    program: String,
}

impl Shell {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl ShellSpawner for Shell {
    fn spawn(&mut self, command: &str) -> Result<u32, SError> {
        info!("Spawning via {}: {command}", self.program);
        let child = Command::new(&self.program)
            .arg("-c")
            .arg(command)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| SError::Spawn(format!("{}: {e}", self.program)))?;
        Ok(child.id())
    }
}
