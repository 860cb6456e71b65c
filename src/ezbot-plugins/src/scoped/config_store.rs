//! Per-plugin JSON config documents.

use std::path::PathBuf;

use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use super::encode::{self, EncodeOptions};
use crate::host::PluginHost;
use crate::storage;

/// A decoded config document.
pub type ConfigMap = serde_json::Map<String, Value>;

/// Content written when a config document is first created.
const EMPTY_DOCUMENT: &[u8] = b"{}";

/// Decode a stored config document.
///
/// Never fails: unparseable content and non-container values decode to an
/// empty map, and arrays decode to a map keyed by index.
pub fn decode_config(content: &str) -> ConfigMap {
    match serde_json::from_str::<Value>(content) {
        Ok(Value::Object(map)) => map,
        Ok(Value::Array(items)) => items
            .into_iter()
            .enumerate()
            .map(|(i, v)| (i.to_string(), v))
            .collect(),
        Ok(_) => ConfigMap::new(),
        Err(e) => {
            warn!("Malformed config document, using empty config: {}", e);
            ConfigMap::new()
        }
    }
}

impl PluginHost {
    /// Path of the config document for a normalized name.
    pub fn config_path(&self, name: &str) -> PathBuf {
        self.data_dir().join(format!("{}.json", name))
    }

    /// Load a config document.
    ///
    /// With `name` unset, the calling plugin's own document is used; that needs
    /// callback context and a resolvable caller, otherwise `None` is returned.
    /// A missing document is created empty.
    pub fn load_config(&self, name: Option<&str>) -> Option<ConfigMap> {
        let name = self.resolve_config_name(name)?;
        let path = self.config_path(&name);

        match storage::read_to_string_opt(&path) {
            Ok(Some(content)) => Some(decode_config(&content)),
            Ok(None) => {
                match storage::save_file(&path, EMPTY_DOCUMENT) {
                    Ok(()) => debug!("Created config {}", path.display()),
                    Err(e) => warn!("Failed to create config {}: {}", path.display(), e),
                }
                Some(ConfigMap::new())
            }
            Err(e) => {
                warn!("Failed to read config {}: {}", path.display(), e);
                Some(ConfigMap::new())
            }
        }
    }

    /// Save a config document, replacing its previous content.
    ///
    /// Name resolution matches [`load_config`](Self::load_config). Concurrent
    /// saves to the same document are not coordinated: the last one wins.
    pub fn save_config<T>(&self, name: Option<&str>, content: &T, options: EncodeOptions) -> bool
    where
        T: Serialize + ?Sized,
    {
        let Some(name) = self.resolve_config_name(name) else {
            return false;
        };
        let path = self.config_path(&name);

        let data = match encode::to_vec(content, options) {
            Ok(data) => data,
            Err(e) => {
                warn!("Failed to encode config {}: {}", name, e);
                return false;
            }
        };

        match storage::save_file(&path, &data) {
            Ok(()) => true,
            Err(e) => {
                warn!("Failed to save config {}: {}", path.display(), e);
                false
            }
        }
    }
}
