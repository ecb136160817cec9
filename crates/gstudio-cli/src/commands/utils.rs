//! Shared utilities for command implementations.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use gstudio_config::{ConfigOverrides, StudioConfig};
use gstudio_graph::{ContainerManifest, SnapshotCollector, StaticMetadataReader};
use serde::Serialize;

use crate::cli::ManifestArg;
use crate::error::{CliError, Result, ResultExt};
use crate::ui;

/// Collector over a manifest-built container.
pub type ManifestCollector = SnapshotCollector<StaticMetadataReader>;

/// Load configuration with `overrides` applied on top.
pub fn load_config(config_path: Option<&Path>, overrides: &ConfigOverrides) -> Result<StudioConfig> {
    let config = StudioConfig::load(config_path, overrides)?;
    tracing::debug!(
        enabled = config.enabled,
        base_path = %config.base_path,
        manifest = ?config.manifest,
        "configuration loaded"
    );
    Ok(config)
}

/// Overrides carrying only the manifest flag.
pub fn manifest_overrides(arg: &ManifestArg) -> ConfigOverrides {
    ConfigOverrides {
        manifest: arg.manifest.clone(),
        ..ConfigOverrides::default()
    }
}

/// Read the configured manifest and build a collector over it.
pub fn load_collector(config: &StudioConfig) -> Result<ManifestCollector> {
    let path = config.manifest.as_deref().ok_or(CliError::NoManifest)?;
    if !path.is_file() {
        return Err(CliError::FileNotFound(path.to_path_buf()));
    }

    let manifest = ContainerManifest::from_path(path)?;
    let (container, reader) = manifest.build()?;
    tracing::debug!(
        path = %path.display(),
        modules = container.len(),
        classes = reader.len(),
        "container manifest loaded"
    );

    Ok(SnapshotCollector::new(Arc::new(container), reader).with_options(config.collector_options()))
}

/// Serialize `value` to stdout, or to `output` when given.
pub fn write_json<T: Serialize + ?Sized>(value: &T, pretty: bool, output: Option<&Path>) -> Result<()> {
    let json = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };

    match output {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent).with_path(parent)?;
            }
            fs::write(path, json + "\n").with_path(path)?;
            ui::success(&format!("Wrote {}", path.display()));
        }
        None => println!("{}", json),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use tempfile::TempDir;

    #[test]
    fn test_load_collector_without_manifest() {
        let config = StudioConfig::default();
        assert!(matches!(load_collector(&config), Err(CliError::NoManifest)));
    }

    #[test]
    fn test_load_collector_missing_file() {
        let config = StudioConfig {
            manifest: Some(PathBuf::from("/definitely/not/here.json")),
            ..StudioConfig::default()
        };
        assert!(matches!(load_collector(&config), Err(CliError::FileNotFound(_))));
    }

    #[test]
    fn test_load_collector_applies_options() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("app.toml");
        fs::write(
            &path,
            "[[modules]]\nname = \"AppModule\"\nproviders = [\"AppService\"]\n",
        )
        .unwrap();

        let config = StudioConfig {
            manifest: Some(path),
            diagnostics_controller: "DebugController".to_string(),
            ..StudioConfig::default()
        };
        let collector = load_collector(&config).unwrap();
        assert_eq!(collector.options().diagnostics_controller, "DebugController");
        assert_eq!(collector.collect().stats.providers, 1);
    }

    #[test]
    fn test_write_json_creates_parent_dirs() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("out/nested/graph.json");

        write_json(&serde_json::json!({ "a": 1 }), false, Some(&path)).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "{\"a\":1}\n");
    }
}
