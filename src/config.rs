//! Configuration files for saving and loading runner settings and selections.
//!
//! Both files are JSON. `RunnerConfig` controls how privileged commands are
//! launched; `Profile` is a saved, ordered selection of optimization ids.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::DebtuneError;
use crate::tasks::TaskRegistry;

/// Default wall-clock bound for a single elevated command (10 minutes)
pub const DEFAULT_COMMAND_TIMEOUT_SECS: u64 = 600;

/// How privileged commands are launched
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunnerConfig {
    /// Program that elevates the shell (`pkexec`, `sudo`, ...)
    pub elevation_program: String,
    /// Shell that receives `-c <command>`
    pub shell: String,
    /// Hard per-command timeout
    pub command_timeout_secs: u64,
    /// Prefix every command with `DEBIAN_FRONTEND=noninteractive`
    pub noninteractive: bool,
    /// Where the interactive UI writes its log
    pub log_file: Option<PathBuf>,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            elevation_program: "pkexec".to_string(),
            shell: "bash".to_string(),
            command_timeout_secs: DEFAULT_COMMAND_TIMEOUT_SECS,
            noninteractive: true,
            log_file: None,
        }
    }
}

impl RunnerConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.command_timeout_secs)
    }

    /// Load configuration from a JSON file; missing keys take defaults
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read configuration from {:?}", path.as_ref()))?;

        let config: Self =
            serde_json::from_str(&content).context("Failed to parse configuration JSON")?;

        Ok(config)
    }

    pub fn validate(&self) -> crate::error::Result<()> {
        if self.elevation_program.trim().is_empty() {
            return Err(DebtuneError::config("Elevation program must be specified"));
        }
        if self.shell.trim().is_empty() {
            return Err(DebtuneError::config("Shell must be specified"));
        }
        if self.command_timeout_secs == 0 {
            return Err(DebtuneError::config("Command timeout must be at least 1 second"));
        }
        Ok(())
    }

    /// Log file for the interactive UI, falling back to the temp dir
    pub fn log_path(&self) -> PathBuf {
        self.log_file
            .clone()
            .unwrap_or_else(|| std::env::temp_dir().join("debtune.log"))
    }
}

/// A saved selection, applied in the order listed
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub tasks: Vec<String>,
}

impl Profile {
    pub fn new(tasks: Vec<String>) -> Self {
        Self { tasks }
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let json =
            serde_json::to_string_pretty(self).context("Failed to serialize profile to JSON")?;

        fs::write(&path, json)
            .with_context(|| format!("Failed to write profile to {:?}", path.as_ref()))?;

        Ok(())
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read profile from {:?}", path.as_ref()))?;

        let profile: Self =
            serde_json::from_str(&content).context("Failed to parse profile JSON")?;

        Ok(profile)
    }

    /// Every id must exist and appear once
    pub fn validate(&self, registry: &TaskRegistry) -> crate::error::Result<()> {
        let mut seen = HashSet::new();
        for id in &self.tasks {
            if registry.get(id).is_none() {
                return Err(DebtuneError::unknown_task(id.as_str()));
            }
            if !seen.insert(id.as_str()) {
                return Err(DebtuneError::config(format!(
                    "Optimization '{}' is listed more than once",
                    id
                )));
            }
        }
        Ok(())
    }
}
