//! Plugin host error types.

use std::path::PathBuf;

use thiserror::Error;

/// Plugin host errors.
#[derive(Error, Debug)]
pub enum PluginError {
    /// Plugin not found.
    #[error("Plugin not found: {0}")]
    NotFound(String),

    /// Plugin already exists.
    #[error("Plugin already exists: {0}")]
    AlreadyExists(String),

    /// The plugin does not expose a constructor for extra instances.
    #[error("Plugin '{0}' cannot be instantiated by other plugins")]
    NotInstantiable(String),

    /// Plugin construction error.
    #[error("Failed to instantiate plugin '{plugin}': {message}")]
    InitError { plugin: String, message: String },

    /// Configuration error.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Data directory could not be resolved or created.
    #[error("Data directory error at {path}: {message}")]
    DataDir { path: PathBuf, message: String },

    /// A global host was already installed.
    #[error("Plugin host already installed")]
    HostAlreadyInstalled,

    /// IO error.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl PluginError {
    /// Create an init error.
    pub fn init_error(plugin: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InitError {
            plugin: plugin.into(),
            message: message.into(),
        }
    }

    /// Create a data directory error.
    pub fn data_dir(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::DataDir {
            path: path.into(),
            message: message.into(),
        }
    }
}

impl From<toml::de::Error> for PluginError {
    fn from(err: toml::de::Error) -> Self {
        Self::SerializationError(err.to_string())
    }
}

impl From<serde_json::Error> for PluginError {
    fn from(err: serde_json::Error) -> Self {
        Self::SerializationError(err.to_string())
    }
}

/// Result type alias for plugin host operations.
pub type Result<T> = std::result::Result<T, PluginError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = PluginError::NotFound("com.example.echo".to_string());
        assert_eq!(err.to_string(), "Plugin not found: com.example.echo");
    }

    #[test]
    fn test_init_error() {
        let err = PluginError::init_error("com.example.echo", "bad args");
        assert!(err.to_string().contains("com.example.echo"));
        assert!(err.to_string().contains("bad args"));
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let plugin_err: PluginError = io_err.into();
        assert!(matches!(plugin_err, PluginError::IoError(_)));
    }

    #[test]
    fn test_from_json_error() {
        let json_err = serde_json::from_str::<serde_json::Value>("{oops").unwrap_err();
        let plugin_err: PluginError = json_err.into();
        assert!(matches!(plugin_err, PluginError::SerializationError(_)));
    }
}
