use clap::Parser;
use std::time::Duration;

use crate::config::{SessionConfig, SimulationConfig};
use crate::core::BuildOptions;

const GITHUB_PREFIX: &str = "github:";

#[derive(Parser, Debug)]
#[command(name = "reposhell")]
#[command(about = "Browse a repository as a virtual filesystem from a small shell", long_about = None)]
pub struct Cli {
    /// Repository to open: a local directory (default: current directory)
    /// or `github:owner/repo[@branch]`
    pub source: Option<String>,

    /// Extra pipe-separated names or globs to leave out (e.g., "fixtures|*.log")
    #[arg(short = 'I', long = "ignore", value_name = "PATTERN")]
    pub ignore_pattern: Option<String>,

    /// Leave out entries whose name starts with '.'
    #[arg(long)]
    pub no_hidden: bool,

    /// Keep tooling directories such as .git, node_modules and target
    #[arg(long)]
    pub no_default_ignore: bool,

    /// Seconds before a file fetch or save is abandoned
    #[arg(long, env = "REPOSHELL_FETCH_TIMEOUT", default_value_t = 30)]
    pub fetch_timeout: u64,

    /// Milliseconds `npm install` takes
    #[arg(long, env = "REPOSHELL_INSTALL_DELAY_MS", default_value_t = 3000)]
    pub install_delay_ms: u64,

    /// Milliseconds `npm start` and `npm run dev` take
    #[arg(long, env = "REPOSHELL_START_DELAY_MS", default_value_t = 2000)]
    pub start_delay_ms: u64,

    /// Token for the GitHub API
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
    pub github_token: Option<String>,

    /// Log filter used when RUST_LOG is unset (e.g., "info", "reposhell=debug")
    #[arg(long, env = "REPOSHELL_LOG", default_value = "warn")]
    pub log_level: String,
}

#[derive(Debug, Eq, PartialEq)]
pub enum Source {
    Local(String),
    Github(String),
}

impl Cli {
    pub fn source(&self) -> Source {
        match self.source.as_deref() {
            None => Source::Local(".".to_owned()),
            Some(raw) => match raw.strip_prefix(GITHUB_PREFIX) {
                Some(repo) => Source::Github(repo.to_owned()),
                None => Source::Local(raw.to_owned()),
            },
        }
    }

    pub fn build_options(&self) -> BuildOptions {
        BuildOptions {
            ignore_pattern: self.ignore_pattern.clone(),
            show_hidden: !self.no_hidden,
            default_ignore: !self.no_default_ignore,
        }
    }

    pub fn session_config(&self) -> SessionConfig {
        SessionConfig {
            fetch_timeout: Duration::from_secs(self.fetch_timeout),
            simulation: SimulationConfig {
                install_delay: Duration::from_millis(self.install_delay_ms),
                start_delay: Duration::from_millis(self.start_delay_ms),
            },
        }
    }
}
