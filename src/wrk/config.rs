use crate::error::{Result, WrkError};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

const CONFIG_FILENAME: &str = "config.json";
const DEFAULT_API_BASE: &str = "https://api.trello.com/1";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

pub const ENV_CONFIG_DIR: &str = "WRK_CONFIG_DIR";
pub const ENV_DATA_DIR: &str = "WRK_DATA_DIR";
pub const ENV_API_KEY: &str = "WRK_TRELLO_KEY";
pub const ENV_TOKEN: &str = "WRK_TRELLO_TOKEN";
pub const ENV_API_BASE: &str = "WRK_API_BASE";

/// Configuration for wrk, stored in `<config dir>/config.json`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct WrkConfig {
    /// Trello application key
    #[serde(default)]
    pub api_key: Option<String>,

    /// Trello user token granting read access
    #[serde(default)]
    pub token: Option<String>,

    #[serde(default = "default_api_base")]
    pub api_base: String,

    /// Per request timeout
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_api_base() -> String {
    DEFAULT_API_BASE.to_string()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl Default for WrkConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            token: None,
            api_base: default_api_base(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl WrkConfig {
    /// Load config from the given directory, or return defaults if not found
    pub fn load<P: AsRef<Path>>(config_dir: P) -> Result<Self> {
        let config_path = config_dir.as_ref().join(CONFIG_FILENAME);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&config_path).map_err(WrkError::Io)?;
        serde_json::from_str(&content).map_err(|e| {
            WrkError::Config(format!("{}: {}", config_path.display(), e))
        })
    }

    /// Environment variables win over the file.
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides(|name| env::var(name).ok())
    }

    fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(key) = lookup(ENV_API_KEY) {
            self.api_key = Some(key);
        }
        if let Some(token) = lookup(ENV_TOKEN) {
            self.token = Some(token);
        }
        if let Some(base) = lookup(ENV_API_BASE) {
            self.api_base = base;
        }
        self
    }
}

/// Where wrk keeps its config and its alias store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrkPaths {
    pub config_dir: PathBuf,
    pub data_dir: PathBuf,
}

impl WrkPaths {
    /// Platform directories, each overridable through the environment.
    pub fn resolve() -> Result<Self> {
        Self::resolve_with(|name| env::var_os(name).map(PathBuf::from))
    }

    fn resolve_with(lookup: impl Fn(&str) -> Option<PathBuf>) -> Result<Self> {
        let config_override = lookup(ENV_CONFIG_DIR);
        let data_override = lookup(ENV_DATA_DIR);
        if let (Some(config_dir), Some(data_dir)) = (&config_override, &data_override) {
            return Ok(Self {
                config_dir: config_dir.clone(),
                data_dir: data_dir.clone(),
            });
        }

        let dirs = ProjectDirs::from("net", "ocheyedan", "wrk").ok_or_else(|| {
            WrkError::Config(format!(
                "could not determine a home directory; set {} and {}",
                ENV_CONFIG_DIR, ENV_DATA_DIR
            ))
        })?;
        Ok(Self {
            config_dir: config_override.unwrap_or_else(|| dirs.config_dir().to_path_buf()),
            data_dir: data_override.unwrap_or_else(|| dirs.data_dir().to_path_buf()),
        })
    }
}
