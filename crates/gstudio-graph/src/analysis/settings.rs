//! Display toggles for the analysis overlays and where they persist.

use std::path::{Path, PathBuf};

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// User-toggleable overlays. Every toggle is off by default.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GraphDisplaySettings {
    pub highlight_request_scoped: bool,
    pub highlight_implicit_request_scoped: bool,
    pub detect_circular_deps: bool,
    pub lock_nodes: bool,
}

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to write settings to {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to encode settings: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Persistence for [`GraphDisplaySettings`].
///
/// `load` never fails: unreadable or absent settings come back as defaults.
pub trait SettingsStore: Send + Sync {
    fn load(&self) -> GraphDisplaySettings;

    fn save(&self, settings: &GraphDisplaySettings) -> Result<(), SettingsError>;
}

/// Process-local store.
#[derive(Debug, Default)]
pub struct MemorySettingsStore {
    settings: Mutex<GraphDisplaySettings>,
}

impl MemorySettingsStore {
    pub fn new(settings: GraphDisplaySettings) -> Self {
        Self {
            settings: Mutex::new(settings),
        }
    }
}

impl SettingsStore for MemorySettingsStore {
    fn load(&self) -> GraphDisplaySettings {
        *self.settings.lock()
    }

    fn save(&self, settings: &GraphDisplaySettings) -> Result<(), SettingsError> {
        *self.settings.lock() = *settings;
        Ok(())
    }
}

/// JSON file store. Fields missing from the file keep their defaults.
#[derive(Debug, Clone)]
pub struct FileSettingsStore {
    path: PathBuf,
}

impl FileSettingsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SettingsStore for FileSettingsStore {
    fn load(&self) -> GraphDisplaySettings {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return GraphDisplaySettings::default();
            }
            Err(err) => {
                tracing::warn!(path = %self.path.display(), error = %err, "failed to read graph settings");
                return GraphDisplaySettings::default();
            }
        };

        serde_json::from_str(&content).unwrap_or_else(|err| {
            tracing::warn!(path = %self.path.display(), error = %err, "failed to parse graph settings");
            GraphDisplaySettings::default()
        })
    }

    fn save(&self, settings: &GraphDisplaySettings) -> Result<(), SettingsError> {
        let io_error = |source| SettingsError::Io {
            path: self.path.clone(),
            source,
        };

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(io_error)?;
        }

        let json = serde_json::to_string_pretty(settings)?;
        std::fs::write(&self.path, json).map_err(io_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_all_off() {
        let settings = GraphDisplaySettings::default();
        assert!(!settings.highlight_request_scoped);
        assert!(!settings.highlight_implicit_request_scoped);
        assert!(!settings.detect_circular_deps);
        assert!(!settings.lock_nodes);
    }

    #[test]
    fn partial_json_merges_over_defaults() {
        let settings: GraphDisplaySettings =
            serde_json::from_str(r#"{"detectCircularDeps": true, "unknown": 1}"#).unwrap();
        assert!(settings.detect_circular_deps);
        assert!(!settings.lock_nodes);
    }

    #[test]
    fn memory_store_round_trips() {
        let store = MemorySettingsStore::default();
        let settings = GraphDisplaySettings {
            lock_nodes: true,
            ..GraphDisplaySettings::default()
        };

        store.save(&settings).unwrap();
        assert_eq!(store.load(), settings);
    }

    #[test]
    fn file_store_persists_settings() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileSettingsStore::new(dir.path().join("nested/settings.json"));

        assert_eq!(store.load(), GraphDisplaySettings::default());

        let settings = GraphDisplaySettings {
            highlight_request_scoped: true,
            detect_circular_deps: true,
            ..GraphDisplaySettings::default()
        };
        store.save(&settings).unwrap();

        let reopened = FileSettingsStore::new(store.path());
        assert_eq!(reopened.load(), settings);
    }

    #[test]
    fn file_store_falls_back_on_corrupt_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, "{ not json").unwrap();

        let store = FileSettingsStore::new(&path);
        assert_eq!(store.load(), GraphDisplaySettings::default());
    }
}
