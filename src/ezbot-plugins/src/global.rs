//! Process-wide plugin host and free helper functions.
//!
//! The bootstrap code installs one [`PluginHost`]; plugins then call the
//! helpers below without holding a reference to it. Every helper degrades to
//! its "unresolved" value when no host is installed.

use std::sync::Arc;

use once_cell::sync::OnceCell;
use serde::Serialize;

use crate::config::LogLevel;
use crate::host::PluginHost;
use crate::introspection::{FrontLookup, PluginListing};
use crate::plugin::{Plugin, PluginInfo};
use crate::scoped::{ConfigMap, EncodeOptions};
use crate::{PluginError, Result};

/// Global plugin host instance.
static GLOBAL_HOST: OnceCell<Arc<PluginHost>> = OnceCell::new();

/// Install the global plugin host. Fails if one is already installed.
pub fn install(host: Arc<PluginHost>) -> Result<()> {
    GLOBAL_HOST
        .set(host)
        .map_err(|_| PluginError::HostAlreadyInstalled)
}

/// Get the global plugin host.
pub fn host() -> Option<Arc<PluginHost>> {
    GLOBAL_HOST.get().cloned()
}

/// See [`PluginHost::list_plugins`]. `None` without an installed host.
pub fn list_plugins(detailed: bool) -> Option<PluginListing> {
    GLOBAL_HOST.get().map(|h| h.list_plugins(detailed))
}

/// See [`PluginHost::is_loaded`].
pub fn is_loaded(package: &str) -> Option<bool> {
    GLOBAL_HOST.get().and_then(|h| h.is_loaded(package))
}

/// See [`PluginHost::get_info`].
pub fn get_info(package: &str) -> Option<PluginInfo> {
    GLOBAL_HOST.get().and_then(|h| h.get_info(package))
}

/// See [`PluginHost::whoami`]. Without a host, the ambient slot is read.
pub fn whoami() -> Option<String> {
    match GLOBAL_HOST.get() {
        Some(h) => h.whoami(),
        None => crate::identity::whoami(false),
    }
}

/// See [`PluginHost::get_front_class`].
pub fn get_front_class(package: &str) -> FrontLookup<String> {
    match GLOBAL_HOST.get() {
        Some(h) => h.get_front_class(package),
        None => FrontLookup::Unregistered,
    }
}

/// See [`PluginHost::load_front_object`].
pub fn load_front_object(
    package: &str,
    args: &[serde_json::Value],
) -> FrontLookup<Box<dyn Plugin>> {
    match GLOBAL_HOST.get() {
        Some(h) => h.load_front_object(package, args),
        None => FrontLookup::Unregistered,
    }
}

/// See [`PluginHost::load_config`].
pub fn load_config(name: Option<&str>) -> Option<ConfigMap> {
    GLOBAL_HOST.get().and_then(|h| h.load_config(name))
}

/// See [`PluginHost::save_config`].
pub fn save_config<T>(name: Option<&str>, content: &T, options: EncodeOptions) -> bool
where
    T: Serialize + ?Sized,
{
    GLOBAL_HOST
        .get()
        .is_some_and(|h| h.save_config(name, content, options))
}

/// See [`PluginHost::write_log`].
pub fn write_log(content: &str, module: &str, log_name: &str, level: impl Into<LogLevel>) -> bool {
    GLOBAL_HOST
        .get()
        .is_some_and(|h| h.write_log(content, module, log_name, level))
}
