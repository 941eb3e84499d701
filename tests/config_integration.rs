// SPDX-License-Identifier: MPL-2.0
use viewer_session::application::port::SurfaceHandle;
use viewer_session::config::{self, BackoffStrategy, CatalogEntry, Config};
use viewer_session::domain::activation::ViewerMode;
use viewer_session::session::SessionOptions;
use std::time::Duration;
use tempfile::tempdir;

#[test]
fn settings_file_drives_session_options() {
    let dir = tempdir().expect("Failed to create temporary directory");
    let path = dir.path().join("settings.toml");
    std::fs::write(
        &path,
        r#"
[engine]
asset_path = "/static/webviewer"
license_key = "demo"
initial_mode = "default"
auxiliary_panels = []

[session]
auto_load_default = false

[activation]
strategy = "fixed"
fixed_interval_ms = 500
deadline_ms = 3000
"#,
    )
    .expect("Failed to write settings");

    let config = config::load_from_path(&path).expect("Failed to load settings");
    let options = SessionOptions::from_config(&config, SurfaceHandle::new("viewer"));

    assert_eq!(options.engine.asset_path, "/static/webviewer");
    assert_eq!(options.engine.license_key.as_deref(), Some("demo"));
    assert_eq!(options.engine.initial_mode, ViewerMode::Default);
    assert!(options.auxiliary_panels.is_empty());
    assert!(!options.auto_load_default);
    assert_eq!(options.policy.strategy(), BackoffStrategy::Fixed);
    assert_eq!(options.policy.delay_after(3), Duration::from_millis(500));
    assert_eq!(options.policy.deadline(), Duration::from_millis(3000));
}

#[test]
fn out_of_range_activation_values_are_clamped() {
    let config: Config = toml::from_str(
        r#"
[activation]
initial_backoff_ms = 1
deadline_ms = 999999
"#,
    )
    .expect("Failed to parse settings");

    let options = SessionOptions::from_config(&config, SurfaceHandle::new("viewer"));

    assert_eq!(
        options.policy.delay_after(1),
        Duration::from_millis(config::MIN_BACKOFF_MS)
    );
    assert_eq!(
        options.policy.deadline(),
        Duration::from_millis(config::MAX_ACTIVATION_DEADLINE_MS)
    );
}

#[test]
fn custom_catalog_replaces_builtin_samples() {
    let dir = tempdir().expect("Failed to create temporary directory");
    let config = Config {
        samples: vec![CatalogEntry {
            name: "forecast".to_string(),
            display_name: "Forecast".to_string(),
            path: "/files/forecast.xlsx".to_string(),
            extension: "xlsx".to_string(),
            display_extension: None,
            id: Some(7),
            thumbnail: None,
        }],
        ..Config::default()
    };

    config::save_with_override(&config, Some(dir.path().to_path_buf()))
        .expect("Failed to save settings");
    let (loaded, warning) = config::load_with_override(Some(dir.path().to_path_buf()));

    assert!(warning.is_none());
    let catalog = loaded.catalog();
    let default = catalog.default_selection().expect("catalog has a default");
    assert_eq!(default.file_name(), "forecast.xlsx");
    assert!(!catalog.gallery().is_empty());
}

#[test]
fn unreadable_settings_fall_back_to_defaults() {
    let dir = tempdir().expect("Failed to create temporary directory");
    std::fs::write(dir.path().join("settings.toml"), "[activation\nbroken")
        .expect("Failed to write settings");

    let (loaded, warning) = config::load_with_override(Some(dir.path().to_path_buf()));

    assert_eq!(loaded, Config::default());
    assert_eq!(warning.as_deref(), Some("notification-config-load-error"));
}
