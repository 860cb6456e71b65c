//! Plugin host - the main interface for plugins and host code.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use crate::config::HostConfig;
use crate::identity;
use crate::plugin::Plugin;
use crate::registry::PluginRegistry;
use crate::Result;

/// Plugin host - owns the registry and the process-wide settings every
/// scoped helper consults.
///
/// The host handles:
/// - Plugin registry access for the loader
/// - Caller identity resolution
/// - Config and log persistence scoped to the calling plugin
/// - Introspection queries
pub struct PluginHost {
    /// Configuration
    config: HostConfig,

    /// Data root, resolved once at construction
    data_dir: PathBuf,

    /// Log directory
    logs_dir: PathBuf,

    /// Plugin registry
    registry: Arc<PluginRegistry>,

    /// Callback context set explicitly by the host
    callback: AtomicBool,

    /// Number of callback scopes currently open, across all threads
    callback_depth: AtomicUsize,
}

impl PluginHost {
    /// Create a new plugin host, resolving the data root.
    pub fn new(config: HostConfig) -> Result<Self> {
        Self::with_registry(config, Arc::new(PluginRegistry::new()))
    }

    /// Create a host around an existing registry.
    pub fn with_registry(config: HostConfig, registry: Arc<PluginRegistry>) -> Result<Self> {
        let data_dir = config.resolve_data_dir()?;
        let logs_dir = config.resolve_logs_dir(&data_dir);

        tracing::debug!(
            data_dir = %data_dir.display(),
            logs_dir = %logs_dir.display(),
            accurate_identity = config.accurate_identity,
            "Plugin host created"
        );

        Ok(Self {
            config,
            data_dir,
            logs_dir,
            registry,
            callback: AtomicBool::new(false),
            callback_depth: AtomicUsize::new(0),
        })
    }

    // ========== Registry ==========

    /// Get the plugin registry.
    pub fn registry(&self) -> &Arc<PluginRegistry> {
        &self.registry
    }

    // ========== Configuration ==========

    /// Get configuration.
    pub fn config(&self) -> &HostConfig {
        &self.config
    }

    /// Resolved data root.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Resolved log directory.
    pub fn logs_dir(&self) -> &Path {
        &self.logs_dir
    }

    // ========== Callback context ==========

    /// Mark whether the host is handling an event callback.
    pub fn set_callback_context(&self, active: bool) {
        self.callback.store(active, Ordering::SeqCst);
    }

    /// Whether the host is handling an event callback.
    ///
    /// True while the explicit flag is set or any callback scope is open.
    pub fn in_callback_context(&self) -> bool {
        self.callback.load(Ordering::SeqCst) || self.callback_depth.load(Ordering::SeqCst) > 0
    }

    /// Open a callback scope until the guard drops.
    ///
    /// Scopes are counted, so one thread leaving its scope never ends another
    /// thread's.
    pub fn enter_callback(&self) -> CallbackGuard<'_> {
        self.callback_depth.fetch_add(1, Ordering::SeqCst);
        CallbackGuard { host: self }
    }

    // ========== Identity ==========

    /// Package of the currently executing plugin, using the configured
    /// strategy.
    pub fn whoami(&self) -> Option<String> {
        self.whoami_with(self.config.accurate_identity)
    }

    /// Package of the currently executing plugin, choosing the strategy.
    pub fn whoami_with(&self, accurate: bool) -> Option<String> {
        identity::whoami(accurate)
    }

    /// Run a plugin entry point: callback context on, ambient identity and
    /// call frame set for the duration of `f`.
    pub fn run_entry<R>(&self, plugin: &dyn Plugin, f: impl FnOnce() -> R) -> R {
        let _callback = self.enter_callback();
        identity::run_entry(plugin, f)
    }
}

/// Closes its callback scope when dropped.
#[must_use = "callback context ends as soon as the guard is dropped"]
pub struct CallbackGuard<'a> {
    host: &'a PluginHost,
}

impl Drop for CallbackGuard<'_> {
    fn drop(&mut self) {
        self.host.callback_depth.fetch_sub(1, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    struct Greeter;

    impl Plugin for Greeter {
        fn package(&self) -> &str {
            "com.example.greeter"
        }
    }

    #[test]
    fn test_create_host() {
        let temp = TempDir::new().unwrap();
        let host = PluginHost::new(HostConfig::with_data_dir(temp.path())).unwrap();

        assert_eq!(host.data_dir(), temp.path());
        assert_eq!(host.logs_dir(), temp.path().join("logs"));
        assert!(host.registry().is_empty());
        assert!(!host.in_callback_context());
    }

    #[test]
    fn test_discovered_data_dir() {
        let temp = TempDir::new().unwrap();
        let config = HostConfig {
            base_dir: temp.path().to_path_buf(),
            ..Default::default()
        };
        let host = PluginHost::new(config.clone()).unwrap();
        let again = PluginHost::new(config).unwrap();

        assert!(host.data_dir().starts_with(temp.path()));
        assert_eq!(host.data_dir(), again.data_dir());
    }

    #[test]
    fn test_callback_guard_restores() {
        let temp = TempDir::new().unwrap();
        let host = PluginHost::new(HostConfig::with_data_dir(temp.path())).unwrap();

        {
            let _guard = host.enter_callback();
            assert!(host.in_callback_context());
        }
        assert!(!host.in_callback_context());

        host.set_callback_context(true);
        {
            let _guard = host.enter_callback();
        }
        assert!(host.in_callback_context());
    }

    #[test]
    fn test_callback_scopes_overlap_across_threads() {
        use std::sync::Barrier;

        let temp = TempDir::new().unwrap();
        let host = Arc::new(PluginHost::new(HostConfig::with_data_dir(temp.path())).unwrap());
        let entered = Arc::new(Barrier::new(2));
        let first_left = Arc::new(Barrier::new(2));

        let first = {
            let (host, entered, first_left) = (host.clone(), entered.clone(), first_left.clone());
            std::thread::spawn(move || {
                host.run_entry(&Greeter, || {
                    entered.wait();
                });
                first_left.wait();
            })
        };

        host.run_entry(&Greeter, || {
            entered.wait();
            first_left.wait();
            assert!(host.in_callback_context());
            assert_eq!(host.whoami().as_deref(), Some("com.example.greeter"));
        });
        first.join().unwrap();

        assert!(!host.in_callback_context());
    }

    #[test]
    fn test_run_entry() {
        let temp = TempDir::new().unwrap();
        let host = PluginHost::new(HostConfig::with_data_dir(temp.path())).unwrap();

        let seen = host.run_entry(&Greeter, || (host.in_callback_context(), host.whoami()));
        assert_eq!(seen, (true, Some("com.example.greeter".to_string())));
        assert!(!host.in_callback_context());
        assert_eq!(host.whoami(), None);
    }
}
