pub mod file;
pub mod logging;
pub mod process;
pub mod progress;
pub mod shell;
pub mod thread;
