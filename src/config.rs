use crate::error::{FilterError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

const APP_NAME: &str = "fzr";
const CONFIG_FILE: &str = "config.json";

/// Environment variable pointing at an explicit config file
pub const CONFIG_ENV: &str = "FZR_CONFIG";

/// Settings read from the config file; CLI flags override them
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Maximum lines taken from a directory scan or command
    #[serde(default = "default_max_lines")]
    pub max_lines: usize,

    /// Deadline for a command source, in milliseconds
    #[serde(default = "default_command_timeout_ms")]
    pub command_timeout_ms: u64,

    /// Evaluate lines on the rayon thread pool
    #[serde(default = "default_parallel")]
    pub parallel: bool,

    /// Honour .gitignore and friends when scanning a directory
    #[serde(default)]
    pub respect_gitignore: bool,
}

fn default_max_lines() -> usize {
    250
}

fn default_command_timeout_ms() -> u64 {
    1000
}

fn default_parallel() -> bool {
    true
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            max_lines: default_max_lines(),
            command_timeout_ms: default_command_timeout_ms(),
            parallel: default_parallel(),
            respect_gitignore: false,
        }
    }
}

impl AppConfig {
    /// Load config from `$FZR_CONFIG` or the user config directory, or
    /// return defaults if there is none
    pub fn load() -> Result<Self> {
        match get_config_path() {
            Some(path) => Self::load_from(&path),
            None => Ok(Self::default()),
        }
    }

    /// Load config from `path`; a missing file yields defaults
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|source| FilterError::Config {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn command_timeout(&self) -> Duration {
        Duration::from_millis(self.command_timeout_ms)
    }
}

/// Get the path to the config file
pub fn get_config_path() -> Option<PathBuf> {
    if let Some(path) = std::env::var_os(CONFIG_ENV) {
        return Some(PathBuf::from(path));
    }

    dirs::config_dir().map(|base| base.join(APP_NAME).join(CONFIG_FILE))
}
