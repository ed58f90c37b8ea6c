use crate::config_error;
use crate::errors::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Tunable knobs of the command pipeline.
///
/// Every field has a working default, so a config file only needs to name
/// what it changes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Engine name reported in the `uci` handshake
    pub name: String,
    /// Author reported in the `uci` handshake
    pub author: String,
    /// Number of command workers
    pub workers: usize,
    /// How long a worker waits on an empty queue before rechecking the
    /// lifecycle flag
    pub pop_timeout_ms: u64,
    /// How long the line source waits for input before rechecking the
    /// lifecycle flag
    pub poll_interval_ms: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            name: "botSalmon".to_string(),
            author: "camaral".to_string(),
            workers: 2,
            pop_timeout_ms: 500,
            poll_interval_ms: 500,
        }
    }
}

impl EngineConfig {
    /// Load a configuration from a JSON file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: EngineConfig = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the pipeline cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.workers == 0 {
            return Err(config_error!("workers must be at least 1"));
        }
        if self.pop_timeout_ms == 0 {
            return Err(config_error!("pop_timeout_ms must be positive"));
        }
        if self.poll_interval_ms == 0 {
            return Err(config_error!("poll_interval_ms must be positive"));
        }
        Ok(())
    }

    /// Worker count clamped to the machine's logical CPUs
    pub fn effective_workers(&self) -> usize {
        self.workers.clamp(1, num_cpus::get())
    }

    pub fn pop_timeout(&self) -> Duration {
        Duration::from_millis(self.pop_timeout_ms)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}
