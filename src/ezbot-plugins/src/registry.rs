//! Plugin registry for tracking loaded plugins.

use indexmap::IndexMap;
use parking_lot::RwLock;

use crate::plugin::{PluginRecord, PluginState};
use crate::{PluginError, Result};

/// Registry of plugin records, keyed by package.
///
/// Entries are added by the loader and never removed; iteration follows
/// registration order.
pub struct PluginRegistry {
    plugins: RwLock<IndexMap<String, PluginRecord>>,
}

impl PluginRegistry {
    /// Create a new plugin registry.
    pub fn new() -> Self {
        Self {
            plugins: RwLock::new(IndexMap::new()),
        }
    }

    /// Register a plugin record.
    pub fn register(&self, record: PluginRecord) -> Result<()> {
        let mut plugins = self.plugins.write();
        if plugins.contains_key(&record.package) {
            return Err(PluginError::AlreadyExists(record.package));
        }

        tracing::info!(
            "Registered plugin: {} v{} ({})",
            record.info.name,
            record.info.version,
            record.state()
        );
        plugins.insert(record.package.clone(), record);
        Ok(())
    }

    /// Update a registered record in place.
    pub fn update<F>(&self, package: &str, f: F) -> Result<()>
    where
        F: FnOnce(&mut PluginRecord),
    {
        let mut plugins = self.plugins.write();
        let record = plugins
            .get_mut(package)
            .ok_or_else(|| PluginError::NotFound(package.to_string()))?;
        f(record);
        tracing::debug!("Updated plugin {}: {}", package, record.state());
        Ok(())
    }

    /// Get a plugin record by package.
    pub fn get(&self, package: &str) -> Option<PluginRecord> {
        self.plugins.read().get(package).cloned()
    }

    /// Check if a plugin is registered.
    pub fn contains(&self, package: &str) -> bool {
        self.plugins.read().contains_key(package)
    }

    /// Current state of a registered plugin.
    pub fn state(&self, package: &str) -> Option<PluginState> {
        self.plugins.read().get(package).map(PluginRecord::state)
    }

    /// Snapshot of all records in registration order.
    pub fn records(&self) -> Vec<PluginRecord> {
        self.plugins.read().values().cloned().collect()
    }

    /// Registered packages in registration order.
    pub fn packages(&self) -> Vec<String> {
        self.plugins.read().keys().cloned().collect()
    }

    /// Get plugin count.
    pub fn len(&self) -> usize {
        self.plugins.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.plugins.read().is_empty()
    }
}

impl Default for PluginRegistry {
    fn default() -> Self {
        Self::new()
    }
}
