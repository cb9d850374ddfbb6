//! Client Configuration
//!
//! Where the analysis service lives and where reports are written.
//!
//! # Precedence (lowest to highest)
//!
//! 1. Built-in defaults
//! 2. TOML file (`$XDG_CONFIG_HOME/bugai/client.toml`, or an explicit path)
//! 3. Environment variables
//! 4. Command-line overrides
//!
//! # Environment Variables
//!
//! - `BUGAI_API_URL`: service base URL (default: `http://localhost:8000`)
//! - `BUGAI_TIMEOUT_SECS`: request timeout in seconds (default: 120)
//! - `BUGAI_REPORT_DIR`: directory for exported reports (default: `.`)
//!
//! # Example File
//!
//! ```toml
//! api_base_url = "https://bugai.example.com"
//! request_timeout_secs = 60
//! report_dir = "/home/me/reports"
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default service base URL
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8000";

/// Default request timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Errors while loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Config file exists but could not be read
    #[error("failed to read config file {path}: {source}")]
    Read {
        /// File that failed
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Config file is not valid TOML for [`ClientConfig`]
    #[error("invalid config file {path}: {source}")]
    Parse {
        /// File that failed
        path: PathBuf,
        /// Underlying parse error
        #[source]
        source: toml::de::Error,
    },

    /// Environment variable has an unusable value
    #[error("invalid value for {name}: {value:?}")]
    InvalidEnv {
        /// Variable name
        name: &'static str,
        /// Offending value
        value: String,
    },
}

/// Where the file layer of a loaded configuration came from
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConfigSource {
    /// No file was found; defaults plus env/overrides
    Defaults,
    /// Loaded from this file
    File(PathBuf),
}

/// Client configuration
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Base URL of the analysis service
    pub api_base_url: String,
    /// Per-request timeout in seconds
    pub request_timeout_secs: u64,
    /// Directory where exported reports are written
    pub report_dir: PathBuf,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            request_timeout_secs: DEFAULT_TIMEOUT_SECS,
            report_dir: PathBuf::from("."),
        }
    }
}

impl ClientConfig {
    /// Request timeout as a `Duration`
    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Apply `BUGAI_*` variables from the process environment
    pub fn apply_env(&mut self) -> Result<(), ConfigError> {
        self.apply_env_from(|name| std::env::var(name).ok())
    }

    /// Apply `BUGAI_*` variables from an arbitrary lookup
    pub fn apply_env_from<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("BUGAI_API_URL").filter(|v| !v.trim().is_empty()) {
            self.api_base_url = url.trim().to_string();
        }
        if let Some(value) = lookup("BUGAI_TIMEOUT_SECS") {
            self.request_timeout_secs = value
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidEnv {
                    name: "BUGAI_TIMEOUT_SECS",
                    value,
                })?;
        }
        if let Some(dir) = lookup("BUGAI_REPORT_DIR").filter(|v| !v.trim().is_empty()) {
            self.report_dir = PathBuf::from(dir);
        }
        Ok(())
    }

    /// Apply command-line overrides
    pub fn apply_overrides(&mut self, overrides: &ConfigOverrides) {
        if let Some(ref url) = overrides.api_base_url {
            self.api_base_url.clone_from(url);
        }
        if let Some(secs) = overrides.request_timeout_secs {
            self.request_timeout_secs = secs;
        }
        if let Some(ref dir) = overrides.report_dir {
            self.report_dir.clone_from(dir);
        }
    }
}

/// Values given on the command line
#[derive(Clone, Debug, Default)]
pub struct ConfigOverrides {
    /// Explicit config file (skips the default location)
    pub config_path: Option<PathBuf>,
    /// Service base URL
    pub api_base_url: Option<String>,
    /// Request timeout in seconds
    pub request_timeout_secs: Option<u64>,
    /// Report directory
    pub report_dir: Option<PathBuf>,
}

/// A fully resolved configuration
#[derive(Clone, Debug)]
pub struct LoadedConfig {
    /// The merged values
    pub config: ClientConfig,
    /// Where the file layer came from
    pub source: ConfigSource,
}

/// Default config file location
#[must_use]
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("bugai").join("client.toml"))
}

/// Parse a config file
pub fn load_config_from_path(path: &Path) -> Result<ClientConfig, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Resolve configuration from every layer
///
/// An explicit `config_path` must exist; the default location is optional.
pub fn load_config(overrides: &ConfigOverrides) -> Result<LoadedConfig, ConfigError> {
    let (mut config, source) = match overrides.config_path {
        Some(ref path) => (load_config_from_path(path)?, ConfigSource::File(path.clone())),
        None => match default_config_path().filter(|path| path.exists()) {
            Some(path) => (load_config_from_path(&path)?, ConfigSource::File(path)),
            None => (ClientConfig::default(), ConfigSource::Defaults),
        },
    };

    config.apply_env()?;
    config.apply_overrides(overrides);

    tracing::debug!(
        api_base_url = %config.api_base_url,
        timeout_secs = config.request_timeout_secs,
        source = ?source,
        "Configuration loaded"
    );

    Ok(LoadedConfig { config, source })
}
