//! Core plugin types and traits.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

use crate::{PluginError, Result};

/// Trait implemented by every plugin instance the host can run.
///
/// `package` is the identity marker the call-frame resolver looks for.
pub trait Plugin: Send + Sync {
    /// Package identifier of the plugin this instance belongs to.
    fn package(&self) -> &str;

    /// Identifier of the implementing type.
    fn class_name(&self) -> &str {
        std::any::type_name::<Self>()
    }

    /// Whether other plugins may create their own instances of this plugin.
    fn is_front_lib(&self) -> bool {
        false
    }

    /// Construct a new, independent instance from constructor arguments.
    fn instantiate(&self, args: &[serde_json::Value]) -> Result<Box<dyn Plugin>> {
        let _ = args;
        Err(PluginError::NotInstantiable(self.package().to_string()))
    }
}

/// What the loader managed to build for a plugin.
#[derive(Clone, Default)]
pub enum PluginObject {
    /// The loader constructed this instance.
    Instance(Arc<dyn Plugin>),
    /// The plugin is disabled and was never constructed.
    Disabled,
    /// Loading was attempted but no instance exists.
    #[default]
    Unconstructed,
}

impl PluginObject {
    /// Wrap a plugin instance.
    pub fn instance(plugin: impl Plugin + 'static) -> Self {
        Self::Instance(Arc::new(plugin))
    }

    /// Get the live instance, if any.
    pub fn as_instance(&self) -> Option<&Arc<dyn Plugin>> {
        match self {
            Self::Instance(plugin) => Some(plugin),
            _ => None,
        }
    }

    pub fn is_disabled(&self) -> bool {
        matches!(self, Self::Disabled)
    }
}

impl fmt::Debug for PluginObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Instance(plugin) => f
                .debug_tuple("Instance")
                .field(&plugin.class_name())
                .finish(),
            Self::Disabled => f.write_str("Disabled"),
            Self::Unconstructed => f.write_str("Unconstructed"),
        }
    }
}

/// Plugin lifecycle classification.
///
/// Never stored: derived from a record's `object` and `hooked` fields each time
/// it is asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PluginState {
    /// Plugin is constructed and its hooks are registered
    Active,
    /// Plugin failed to construct or to register hooks
    Failed,
    /// Plugin is disabled
    Disabled,
}

impl PluginState {
    /// Classify a record's state fields.
    ///
    /// `Disabled` wins over `Failed`: a disabled plugin never attempts hooking.
    /// A hooked record with no constructed instance counts as `Failed`, not
    /// `Active`, so listings and `is_loaded` agree that nothing is running.
    pub fn classify(object: &PluginObject, hooked: bool) -> Self {
        match object {
            PluginObject::Disabled => Self::Disabled,
            _ if !hooked => Self::Failed,
            PluginObject::Unconstructed => Self::Failed,
            PluginObject::Instance(_) => Self::Active,
        }
    }
}

impl fmt::Display for PluginState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Active => write!(f, "active"),
            Self::Failed => write!(f, "failed"),
            Self::Disabled => write!(f, "disabled"),
        }
    }
}

/// Descriptive plugin information.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PluginInfo {
    /// Human-readable name
    pub name: String,

    /// Author
    pub author: String,

    /// Description
    pub description: String,

    /// Version string
    pub version: String,

    /// Source location
    pub file: String,
}

/// Name, author, description and version of a plugin, as listed in detailed
/// plugin listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PluginSummary {
    pub name: String,
    pub author: String,
    pub description: String,
    pub version: String,
}

/// A registry entry, keyed by package.
#[derive(Debug, Clone)]
pub struct PluginRecord {
    /// Package identifier
    pub package: String,

    /// Descriptive metadata
    pub info: PluginInfo,

    /// Identifier of the implementing type
    pub class: String,

    /// Constructed instance or disabled marker
    pub object: PluginObject,

    /// Whether the plugin registered its event hooks
    pub hooked: bool,
}

impl PluginRecord {
    /// Create a record for a plugin that has not been constructed yet.
    pub fn new(package: impl Into<String>, info: PluginInfo) -> Self {
        Self {
            package: package.into(),
            info,
            class: String::new(),
            object: PluginObject::Unconstructed,
            hooked: false,
        }
    }

    /// Attach a constructed instance, taking its class name.
    pub fn with_instance(mut self, plugin: Arc<dyn Plugin>) -> Self {
        self.class = plugin.class_name().to_string();
        self.object = PluginObject::Instance(plugin);
        self
    }

    /// Mark the plugin disabled.
    pub fn disabled(mut self) -> Self {
        self.object = PluginObject::Disabled;
        self
    }

    /// Set whether hooks were registered.
    pub fn with_hooked(mut self, hooked: bool) -> Self {
        self.hooked = hooked;
        self
    }

    /// Current lifecycle state.
    pub fn state(&self) -> PluginState {
        PluginState::classify(&self.object, self.hooked)
    }

    pub fn summary(&self) -> PluginSummary {
        PluginSummary {
            name: self.info.name.clone(),
            author: self.info.author.clone(),
            description: self.info.description.clone(),
            version: self.info.version.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Echo;

    impl Plugin for Echo {
        fn package(&self) -> &str {
            "com.example.echo"
        }
    }

    fn info() -> PluginInfo {
        PluginInfo {
            name: "Echo".to_string(),
            author: "tester".to_string(),
            description: "Repeats messages".to_string(),
            version: "1.0.0".to_string(),
            file: "plugins/echo".to_string(),
        }
    }

    #[test]
    fn test_plugin_state_display() {
        assert_eq!(PluginState::Active.to_string(), "active");
        assert_eq!(PluginState::Failed.to_string(), "failed");
        assert_eq!(PluginState::Disabled.to_string(), "disabled");
    }

    #[test]
    fn test_classify_disabled_wins() {
        assert_eq!(
            PluginState::classify(&PluginObject::Disabled, false),
            PluginState::Disabled
        );
        assert_eq!(
            PluginState::classify(&PluginObject::Disabled, true),
            PluginState::Disabled
        );
    }

    #[test]
    fn test_classify_failed_and_active() {
        let live = PluginObject::instance(Echo);
        assert_eq!(PluginState::classify(&live, false), PluginState::Failed);
        assert_eq!(PluginState::classify(&live, true), PluginState::Active);
        assert_eq!(
            PluginState::classify(&PluginObject::Unconstructed, true),
            PluginState::Failed
        );
        assert_eq!(
            PluginState::classify(&PluginObject::Unconstructed, false),
            PluginState::Failed
        );
    }

    #[test]
    fn test_record_builders() {
        let record = PluginRecord::new("com.example.echo", info())
            .with_instance(Arc::new(Echo))
            .with_hooked(true);

        assert_eq!(record.state(), PluginState::Active);
        assert!(record.class.ends_with("Echo"));
        assert_eq!(record.summary().name, "Echo");

        let record = record.disabled();
        assert_eq!(record.state(), PluginState::Disabled);
    }

    #[test]
    fn test_default_instantiate_refuses() {
        let err = Echo.instantiate(&[]).err().unwrap();
        assert!(matches!(err, PluginError::NotInstantiable(p) if p == "com.example.echo"));
    }
}
