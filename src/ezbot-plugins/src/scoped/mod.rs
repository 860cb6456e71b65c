//! Config and log persistence scoped to the calling plugin.
//!
//! When a helper is called without an explicit name, the target file is
//! derived from the resolved caller identity:
//!
//! ```text
//! <data root>/<package>/config.json   data isolation on
//! <data root>/<package>.json          data isolation off
//! <logs dir>/<package>.log
//! ```

pub mod config_store;
pub mod encode;
pub mod log_writer;

pub use config_store::{ConfigMap, decode_config};
pub use encode::EncodeOptions;
pub use log_writer::{DEFAULT_LOG_NAME, PLUGIN_FALLBACK_LOG_NAME, format_log_line};

use crate::host::PluginHost;

/// Normalize a caller-supplied file name so it stays under its root.
///
/// `./` and `.\` sequences collapse to `.` until none remain. Each segment then
/// loses its `:` characters, empty, `.` and `..` segments are dropped, and the
/// rest is joined with `/`. The result is always relative and never climbs out
/// of the directory it is joined to.
pub fn normalize_name(name: &str) -> String {
    let mut name = name.to_string();
    loop {
        let collapsed = name.replace("./", ".").replace(".\\", ".");
        if collapsed == name {
            break;
        }
        name = collapsed;
    }

    // A `:` would let a segment read as a drive or stream prefix on Windows
    name.split(['/', '\\'])
        .map(|segment| segment.replace(':', ""))
        .filter(|segment| !segment.is_empty() && segment != "." && segment != "..")
        .collect::<Vec<_>>()
        .join("/")
}

/// Config name for a package under the given isolation mode.
pub fn isolated_name(package: &str, data_isolation: bool) -> String {
    let package = normalize_name(package);
    if data_isolation {
        format!("{}/config", package)
    } else {
        package
    }
}

impl PluginHost {
    /// Resolve the config name for a helper call.
    ///
    /// An explicit name wins. Otherwise the caller's package is used, which
    /// requires callback context and a resolvable identity.
    pub(crate) fn resolve_config_name(&self, explicit: Option<&str>) -> Option<String> {
        if let Some(name) = explicit.map(normalize_name).filter(|n| !n.is_empty()) {
            return Some(name);
        }

        if !self.in_callback_context() {
            tracing::debug!("Config name not given outside callback context");
            return None;
        }

        match self.whoami() {
            Some(package) => Some(isolated_name(&package, self.config().data_isolation)),
            None => {
                tracing::debug!("Config name not given and caller identity unresolved");
                None
            }
        }
    }
}
