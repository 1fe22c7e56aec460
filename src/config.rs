use std::time::Duration;

/// Durations of the canned build-tool simulations.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SimulationConfig {
    pub install_delay: Duration,
    pub start_delay: Duration,
}

impl SimulationConfig {
    /// No delays at all; used by tests and non-interactive runs.
    pub fn instant() -> Self {
        Self {
            install_delay: Duration::ZERO,
            start_delay: Duration::ZERO,
        }
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            install_delay: Duration::from_secs(3),
            start_delay: Duration::from_secs(2),
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SessionConfig {
    /// Upper bound on a single fetch or save.
    pub fetch_timeout: Duration,
    pub simulation: SimulationConfig,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            fetch_timeout: Duration::from_secs(30),
            simulation: SimulationConfig::default(),
        }
    }
}
