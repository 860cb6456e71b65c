//! # EzBot Plugin Host
//!
//! Runtime glue between the EzBot host and its plugins: a registry of loaded
//! plugins, resolution of which plugin is currently executing, and config/log
//! persistence that scopes itself to that plugin.
//!
//! ## Features
//!
//! - **Registry**: plugin records classified as active, failed or disabled
//! - **Identity**: `whoami` through the ambient entry slot or the explicit
//!   call-frame stack
//! - **Scoped config**: `load_config` / `save_config` on per-plugin JSON documents
//! - **Logging**: `write_log` to per-plugin plain-text log files
//! - **Front libs**: plugins other plugins may instantiate privately
//!
//! ## Data Layout
//!
//! ```text
//! <base dir>/
//! └── data_XXXXXXXXXXXXXXXX/     # data root, discovered or configured
//!     ├── com.example.echo/
//!     │   └── config.json        # with data isolation
//!     ├── shared.json            # explicit config name
//!     └── logs/
//!         ├── com.example.echo.log
//!         └── EzBot.log
//! ```
//!
//! ## Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use ezbot_plugins::{HostConfig, PluginHost, PluginInfo, PluginRecord};
//!
//! let host = PluginHost::new(HostConfig::default())?;
//! host.registry().register(
//!     PluginRecord::new("com.example.echo", info)
//!         .with_instance(Arc::new(Echo))
//!         .with_hooked(true),
//! )?;
//!
//! host.run_entry(&Echo, || {
//!     let mut config = host.load_config(None).unwrap_or_default();
//!     config.insert("greeted".into(), true.into());
//!     host.save_config(None, &config, Default::default());
//!     host.write_log("greeted", "", "", 2);
//! });
//! ```

pub mod config;
pub mod error;
pub mod global;
pub mod host;
pub mod identity;
pub mod introspection;
pub mod plugin;
pub mod registry;
pub mod scoped;
pub mod storage;

// Re-exports for convenience
pub use config::{HostConfig, LogLevel};
pub use error::{PluginError, Result};
pub use host::{CallbackGuard, PluginHost};
pub use identity::{AmbientGuard, CallFrame, CallStack, Dispatch, FrameGuard, enter_plugin};
pub use introspection::{
    DetailedBuckets, FrontLookup, PluginBuckets, PluginListing, VersionBuckets,
};
pub use plugin::{Plugin, PluginInfo, PluginObject, PluginRecord, PluginState, PluginSummary};
pub use registry::PluginRegistry;
pub use scoped::{ConfigMap, EncodeOptions, normalize_name};
pub use storage::{make_dir, save_file};

/// Plugin host version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
