use std::fs;
use std::path::PathBuf;

use gstudio_config::{ConfigError, ConfigOverrides, StudioConfig};
use serial_test::serial;
use tempfile::TempDir;

fn write(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, contents).unwrap();
    path
}

fn set_env(key: &str, value: &str) {
    // SAFETY: env-mutating tests are serialized with #[serial].
    unsafe { std::env::set_var(key, value) }
}

fn remove_env(key: &str) {
    // SAFETY: env-mutating tests are serialized with #[serial].
    unsafe { std::env::remove_var(key) }
}

#[test]
#[serial]
fn defaults_without_sources() {
    let dir = TempDir::new().unwrap();
    let config = StudioConfig::load_from(dir.path(), None, &ConfigOverrides::default()).unwrap();

    assert!(config.enabled);
    assert_eq!(config.base_path, "/graph-studio");
    assert_eq!(config.health_path, "/health");
    assert_eq!(config.port, 4400);
    assert_eq!(config.diagnostics_controller, "GraphStudioController");
    assert_eq!(config.redaction.max_size, 1024);
    assert!(config.redaction.patterns.contains(&"password".to_string()));
    assert!(config.manifest.is_none());
}

#[test]
#[serial]
fn discovers_toml_in_root() {
    let dir = TempDir::new().unwrap();
    write(
        &dir,
        "gstudio.toml",
        r#"
basePath = "/studio"
port = 8080
excludedModules = ["InternalModule"]

[redaction]
patterns = ["apiKey", "/^x-/"]
maxSize = 64
"#,
    );

    let config = StudioConfig::load_from(dir.path(), None, &ConfigOverrides::default()).unwrap();
    assert_eq!(config.base_path, "/studio");
    assert_eq!(config.port, 8080);
    assert_eq!(config.excluded_modules, vec!["InternalModule".to_string()]);
    assert_eq!(config.redaction.max_size, 64);
    assert_eq!(config.redaction_options().unwrap().patterns.len(), 2);
    // untouched fields keep their defaults
    assert_eq!(config.health_path, "/health");
}

#[test]
#[serial]
fn explicit_json_file() {
    let dir = TempDir::new().unwrap();
    let path = write(
        &dir,
        "studio.json",
        r#"{ "enabled": false, "manifest": "app.json", "diagnosticsController": "DebugController" }"#,
    );

    let config =
        StudioConfig::load_from(dir.path(), Some(&path), &ConfigOverrides::default()).unwrap();
    assert!(!config.enabled);
    assert_eq!(config.manifest, Some(PathBuf::from("app.json")));
    assert_eq!(
        config.collector_options().diagnostics_controller,
        "DebugController"
    );
}

#[test]
#[serial]
fn missing_explicit_file_is_an_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nope.toml");

    let err = StudioConfig::load_from(dir.path(), Some(&path), &ConfigOverrides::default())
        .unwrap_err();
    assert!(matches!(err, ConfigError::NotFound(p) if p == path));
}

#[test]
#[serial]
fn unknown_extension_is_rejected() {
    let dir = TempDir::new().unwrap();
    let path = write(&dir, "studio.yaml", "port: 1");

    let err = StudioConfig::load_from(dir.path(), Some(&path), &ConfigOverrides::default())
        .unwrap_err();
    assert!(matches!(err, ConfigError::UnsupportedFormat(ext) if ext == "yaml"));
}

#[test]
#[serial]
fn env_overrides_file() {
    let dir = TempDir::new().unwrap();
    write(&dir, "gstudio.toml", "port = 8080\nbasePath = \"/studio\"\n");

    set_env("GSTUDIO_PORT", "9090");
    set_env("GSTUDIO_REDACTION__MAX_SIZE", "32");
    let result = StudioConfig::load_from(dir.path(), None, &ConfigOverrides::default());
    remove_env("GSTUDIO_PORT");
    remove_env("GSTUDIO_REDACTION__MAX_SIZE");

    let config = result.unwrap();
    assert_eq!(config.port, 9090);
    assert_eq!(config.redaction.max_size, 32);
    assert_eq!(config.base_path, "/studio");
}

#[test]
#[serial]
fn production_env_disables_by_default() {
    let dir = TempDir::new().unwrap();

    set_env("GSTUDIO_ENV", "production");
    let result = StudioConfig::load_from(dir.path(), None, &ConfigOverrides::default());
    remove_env("GSTUDIO_ENV");

    assert!(!result.unwrap().enabled);
}

#[test]
#[serial]
fn overrides_win_over_everything() {
    let dir = TempDir::new().unwrap();
    write(&dir, "gstudio.toml", "port = 8080\nenabled = false\n");

    set_env("GSTUDIO_PORT", "9090");
    let overrides = ConfigOverrides {
        port: Some(7000),
        enabled: Some(true),
        ..ConfigOverrides::default()
    };
    let result = StudioConfig::load_from(dir.path(), None, &overrides);
    remove_env("GSTUDIO_PORT");

    let config = result.unwrap();
    assert_eq!(config.port, 7000);
    assert!(config.enabled);
    assert_eq!(config.bind_address(), "127.0.0.1:7000");
}

#[test]
#[serial]
fn invalid_values_fail_validation() {
    let dir = TempDir::new().unwrap();
    write(&dir, "gstudio.toml", "basePath = \"studio\"\n");

    let err =
        StudioConfig::load_from(dir.path(), None, &ConfigOverrides::default()).unwrap_err();
    assert!(matches!(err, ConfigError::InvalidValue { ref field, .. } if field == "basePath"));
}

#[test]
#[serial]
fn malformed_file_reports_load_error() {
    let dir = TempDir::new().unwrap();
    write(&dir, "gstudio.toml", "port = \"not a number\"\n");

    let err =
        StudioConfig::load_from(dir.path(), None, &ConfigOverrides::default()).unwrap_err();
    assert!(matches!(err, ConfigError::Load(_)));
}
