pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod explorer;
pub mod logging;
pub mod models;
pub mod repo;
pub mod session;
pub mod shell;

pub use config::{SessionConfig, SimulationConfig};
pub use error::{FsError, OperationError};
pub use session::Session;
pub use shell::{Control, Interpreter};

/// Prompt shown before each line in interactive mode.
pub fn prompt(cwd: &str) -> String {
    format!("{cwd}$ ")
}
