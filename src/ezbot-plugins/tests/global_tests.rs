//! Tests for the process-wide host and its free helper functions.
//!
//! The global host can only be installed once per process, so every test in
//! this binary shares it and runs serially.

use std::sync::Arc;

use once_cell::sync::Lazy;
use serde_json::json;
use serial_test::serial;
use tempfile::TempDir;

use ezbot_plugins::{
    EncodeOptions, HostConfig, Plugin, PluginError, PluginHost, PluginInfo, PluginRecord, global,
};

struct Weather;

impl Plugin for Weather {
    fn package(&self) -> &str {
        "com.example.weather"
    }
}

static DATA: Lazy<TempDir> = Lazy::new(|| TempDir::new().unwrap());

static HOST: Lazy<Arc<PluginHost>> = Lazy::new(|| {
    let host = Arc::new(PluginHost::new(HostConfig::with_data_dir(DATA.path())).unwrap());
    host.registry()
        .register(
            PluginRecord::new(
                "com.example.weather",
                PluginInfo {
                    name: "Weather".to_string(),
                    author: "tester".to_string(),
                    description: "Forecasts".to_string(),
                    version: "0.3.0".to_string(),
                    file: "plugins/weather".to_string(),
                },
            )
            .with_instance(Arc::new(Weather))
            .with_hooked(true),
        )
        .unwrap();
    global::install(host.clone()).unwrap();
    host
});

#[test]
#[serial]
fn test_install_twice_fails() {
    let host = HOST.clone();
    let result = global::install(host);
    assert!(matches!(result, Err(PluginError::HostAlreadyInstalled)));
    assert!(Arc::ptr_eq(&global::host().unwrap(), &HOST));
}

#[test]
#[serial]
fn test_queries_through_global() {
    Lazy::force(&HOST);

    assert_eq!(global::is_loaded("com.example.weather"), Some(true));
    assert_eq!(global::is_loaded("com.example.missing"), None);
    assert_eq!(global::get_info("com.example.weather").unwrap().version, "0.3.0");
    assert!(global::list_plugins(false).is_some());
    assert!(global::get_front_class("com.example.weather").is_refused());
    assert!(global::load_front_object("com.example.missing", &[]).is_unregistered());
}

#[test]
#[serial]
fn test_scoped_helpers_through_global() {
    let host = HOST.clone();

    assert_eq!(global::load_config(None), None);

    host.run_entry(&Weather, || {
        assert_eq!(global::whoami().as_deref(), Some("com.example.weather"));
        assert!(global::save_config(None, &json!({"city": "Paris"}), EncodeOptions::default()));
        assert!(global::write_log("forecast sent", "cron", "", 2));
    });

    let config = global::load_config(Some("com.example.weather/config")).unwrap();
    assert_eq!(config.get("city"), Some(&json!("Paris")));
    assert!(host.log_path("com.example.weather").is_file());
    assert_eq!(global::whoami(), None);
}
