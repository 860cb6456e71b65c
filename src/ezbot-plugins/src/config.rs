//! Plugin host configuration.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

use rand::Rng;
use rand::distr::Alphanumeric;
use tracing::{debug, info};

use crate::storage;
use crate::{PluginError, Result};

/// Prefix of the discovered data directory name.
pub const DATA_DIR_PREFIX: &str = "data_";

/// Length of the random suffix appended to [`DATA_DIR_PREFIX`].
pub const DATA_DIR_SUFFIX_LEN: usize = 16;

/// Subdirectory of the data root holding log files.
pub const LOGS_DIR: &str = "logs";

/// Numeric log level used by plugin log files.
///
/// Values outside `1..=5` are accepted and rendered as `UNKNOWN`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LogLevel(pub i32);

impl LogLevel {
    pub const DEBUG: Self = Self(1);
    pub const INFO: Self = Self(2);
    pub const WARN: Self = Self(3);
    pub const ERROR: Self = Self(4);
    pub const FATAL: Self = Self(5);

    /// Label written into log lines.
    pub fn label(self) -> &'static str {
        match self.0 {
            1 => "DEBUG",
            2 => "INFO",
            3 => "WARN",
            4 => "ERROR",
            5 => "FATAL",
            _ => "UNKNOWN",
        }
    }
}

impl Default for LogLevel {
    fn default() -> Self {
        Self::INFO
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl From<i32> for LogLevel {
    fn from(level: i32) -> Self {
        Self(level)
    }
}

/// Plugin host configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HostConfig {
    /// Resolve caller identity from the call-frame stack instead of the
    /// ambient slot. Slower, but correct for plugin-to-plugin calls.
    #[serde(default)]
    pub accurate_identity: bool,

    /// Minimum level written by `write_log`
    #[serde(default)]
    pub log_level: LogLevel,

    /// Store each plugin's config under `<package>/config` instead of `<package>`
    #[serde(default = "default_true")]
    pub data_isolation: bool,

    /// Directory scanned for the data root
    #[serde(default = "default_base_dir")]
    pub base_dir: PathBuf,

    /// Explicit data root; skips discovery when set
    #[serde(default)]
    pub data_dir: Option<PathBuf>,

    /// Log directory; defaults to `<data root>/logs`
    #[serde(default)]
    pub logs_dir: Option<PathBuf>,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            accurate_identity: false,
            log_level: LogLevel::default(),
            data_isolation: true,
            base_dir: default_base_dir(),
            data_dir: None,
            logs_dir: None,
        }
    }
}

impl HostConfig {
    /// Create a configuration rooted at an explicit data directory.
    pub fn with_data_dir(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: Some(data_dir.into()),
            ..Default::default()
        }
    }

    /// Parse a configuration from TOML.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Load a configuration file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            PluginError::ConfigError(format!("failed to read {}: {}", path.display(), e))
        })?;
        Self::from_toml_str(&content)
    }

    /// Resolve the data root, creating it when needed.
    ///
    /// Called once at host construction; the result is stored rather than
    /// re-derived on each access.
    pub fn resolve_data_dir(&self) -> Result<PathBuf> {
        match &self.data_dir {
            Some(dir) => {
                storage::make_dir(dir).map_err(|e| PluginError::data_dir(dir, e.to_string()))?;
                Ok(dir.clone())
            }
            None => discover_data_dir(&self.base_dir),
        }
    }

    /// Log directory for a resolved data root.
    pub fn resolve_logs_dir(&self, data_dir: &Path) -> PathBuf {
        self.logs_dir
            .clone()
            .unwrap_or_else(|| data_dir.join(LOGS_DIR))
    }
}

/// Find the `data_XXXXXXXXXXXXXXXX` directory under `base_dir`, or create one
/// with a random suffix.
pub fn discover_data_dir(base_dir: &Path) -> Result<PathBuf> {
    storage::make_dir(base_dir).map_err(|e| PluginError::data_dir(base_dir, e.to_string()))?;

    let mut found = Vec::new();
    for entry in std::fs::read_dir(base_dir)? {
        let entry = entry?;
        let name = entry.file_name();
        let Some(name) = name.to_str() else {
            continue;
        };
        if is_data_dir_name(name) && entry.file_type()?.is_dir() {
            found.push(entry.path());
        }
    }

    // read_dir order is platform dependent
    found.sort();
    if let Some(dir) = found.into_iter().next() {
        debug!(data_dir = %dir.display(), "Using existing data directory");
        return Ok(dir);
    }

    let dir = base_dir.join(format!("{}{}", DATA_DIR_PREFIX, random_suffix()));
    std::fs::create_dir(&dir).map_err(|e| PluginError::data_dir(&dir, e.to_string()))?;
    info!(data_dir = %dir.display(), "Created data directory");
    Ok(dir)
}

fn is_data_dir_name(name: &str) -> bool {
    name.len() == DATA_DIR_PREFIX.len() + DATA_DIR_SUFFIX_LEN && name.starts_with(DATA_DIR_PREFIX)
}

fn random_suffix() -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(DATA_DIR_SUFFIX_LEN)
        .map(char::from)
        .collect()
}

fn default_base_dir() -> PathBuf {
    dirs::data_dir()
        .map(|p| p.join("ezbot"))
        .unwrap_or_else(|| PathBuf::from("ezbot"))
}

fn default_true() -> bool {
    true
}
