//! Read-only registry queries for plugins and host code.

use indexmap::IndexMap;
use serde::Serialize;

use crate::host::PluginHost;
use crate::plugin::{Plugin, PluginInfo, PluginRecord, PluginState, PluginSummary};

/// Plugins grouped by lifecycle state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PluginBuckets<T> {
    pub active: T,
    pub failed: T,
    pub disabled: T,
}

impl<T> PluginBuckets<T> {
    /// Bucket for a state.
    pub fn bucket(&self, state: PluginState) -> &T {
        match state {
            PluginState::Active => &self.active,
            PluginState::Failed => &self.failed,
            PluginState::Disabled => &self.disabled,
        }
    }

    fn bucket_mut(&mut self, state: PluginState) -> &mut T {
        match state {
            PluginState::Active => &mut self.active,
            PluginState::Failed => &mut self.failed,
            PluginState::Disabled => &mut self.disabled,
        }
    }
}

/// Package to version, per state.
pub type VersionBuckets = PluginBuckets<IndexMap<String, String>>;

/// Plugin summaries in registration order, per state.
pub type DetailedBuckets = PluginBuckets<Vec<PluginSummary>>;

/// Result of [`PluginHost::list_plugins`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum PluginListing {
    Versions(VersionBuckets),
    Detailed(DetailedBuckets),
}

/// Outcome of a front-lib lookup.
///
/// Keeps "no such plugin" apart from "plugin exists but may not be used".
#[derive(Debug)]
pub enum FrontLookup<T> {
    /// No plugin is registered under the package
    Unregistered,
    /// The plugin is not live or is not a front lib
    Refused,
    Found(T),
}

impl<T> FrontLookup<T> {
    pub fn found(self) -> Option<T> {
        match self {
            Self::Found(value) => Some(value),
            _ => None,
        }
    }

    pub fn is_unregistered(&self) -> bool {
        matches!(self, Self::Unregistered)
    }

    pub fn is_refused(&self) -> bool {
        matches!(self, Self::Refused)
    }
}

impl PluginHost {
    /// List plugins by state, as versions or as detailed summaries.
    pub fn list_plugins(&self, detailed: bool) -> PluginListing {
        if detailed {
            PluginListing::Detailed(self.list_detailed())
        } else {
            PluginListing::Versions(self.list_versions())
        }
    }

    /// Package to version, per state.
    pub fn list_versions(&self) -> VersionBuckets {
        let mut buckets = VersionBuckets::default();
        for record in self.registry().records() {
            buckets
                .bucket_mut(record.state())
                .insert(record.package.clone(), record.info.version.clone());
        }
        buckets
    }

    /// Plugin summaries in registration order, per state.
    pub fn list_detailed(&self) -> DetailedBuckets {
        let mut buckets = DetailedBuckets::default();
        for record in self.registry().records() {
            buckets.bucket_mut(record.state()).push(record.summary());
        }
        buckets
    }

    /// Whether a plugin is active; `None` when it is not registered.
    pub fn is_loaded(&self, package: &str) -> Option<bool> {
        self.registry()
            .state(package)
            .map(|state| state == PluginState::Active)
    }

    /// Descriptive information for a registered plugin.
    pub fn get_info(&self, package: &str) -> Option<PluginInfo> {
        self.registry().get(package).map(|record| record.info)
    }

    /// Class name of a front-lib plugin.
    pub fn get_front_class(&self, package: &str) -> FrontLookup<String> {
        match self.front_instance(package) {
            FrontLookup::Found((record, _)) => FrontLookup::Found(record.class),
            FrontLookup::Refused => FrontLookup::Refused,
            FrontLookup::Unregistered => FrontLookup::Unregistered,
        }
    }

    /// Create a new instance of a front-lib plugin, independent of the one the
    /// registry holds.
    pub fn load_front_object(
        &self,
        package: &str,
        args: &[serde_json::Value],
    ) -> FrontLookup<Box<dyn Plugin>> {
        let (_, plugin) = match self.front_instance(package) {
            FrontLookup::Found(found) => found,
            FrontLookup::Refused => return FrontLookup::Refused,
            FrontLookup::Unregistered => return FrontLookup::Unregistered,
        };

        match plugin.instantiate(args) {
            Ok(instance) => FrontLookup::Found(instance),
            Err(e) => {
                tracing::warn!("Failed to instantiate front plugin {}: {}", package, e);
                FrontLookup::Refused
            }
        }
    }

    fn front_instance(
        &self,
        package: &str,
    ) -> FrontLookup<(PluginRecord, std::sync::Arc<dyn Plugin>)> {
        let Some(record) = self.registry().get(package) else {
            return FrontLookup::Unregistered;
        };
        match record.object.as_instance() {
            Some(plugin) if plugin.is_front_lib() => {
                let plugin = plugin.clone();
                FrontLookup::Found((record, plugin))
            }
            _ => FrontLookup::Refused,
        }
    }
}
