//! Multi-source configuration loading.
//!
//! Priority: overrides > environment > config file > defaults.

use std::path::{Path, PathBuf};

use figment::Figment;
use figment::providers::{Env, Format as _, Json, Serialized, Toml};
use figment::value::Uncased;
use serde::{Deserialize, Serialize};

use crate::config::StudioConfig;
use crate::error::{ConfigError, Result};

/// Prefix of environment variables read by [`StudioConfig::load`].
pub const ENV_PREFIX: &str = "GSTUDIO_";

/// File names probed when no explicit path is given, in order.
pub const CONFIG_FILE_NAMES: &[&str] = &["gstudio.toml", "gstudio.json"];

/// Values set explicitly by the caller, usually from command-line flags.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub manifest: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub settings_file: Option<PathBuf>,
}

/// Find a config file in `root`.
pub fn discover(root: &Path) -> Option<PathBuf> {
    CONFIG_FILE_NAMES
        .iter()
        .map(|name| root.join(name))
        .find(|path| path.is_file())
}

impl StudioConfig {
    /// Load configuration, discovering a config file in the working
    /// directory when `config_path` is `None`.
    pub fn load(config_path: Option<&Path>, overrides: &ConfigOverrides) -> Result<Self> {
        Self::load_from(Path::new("."), config_path, overrides)
    }

    /// Load configuration with `root` as the discovery directory.
    pub fn load_from(
        root: &Path,
        config_path: Option<&Path>,
        overrides: &ConfigOverrides,
    ) -> Result<Self> {
        let mut figment = Figment::new().merge(Serialized::defaults(StudioConfig::default()));

        let config_file = match config_path {
            Some(path) if !path.is_file() => return Err(ConfigError::NotFound(path.to_path_buf())),
            Some(path) => Some(path.to_path_buf()),
            None => discover(root),
        };

        if let Some(path) = config_file {
            tracing::debug!(path = %path.display(), "loading config file");
            figment = match path.extension().and_then(|ext| ext.to_str()) {
                Some("toml") => figment.merge(Toml::file(&path)),
                Some("json") => figment.merge(Json::file(&path)),
                other => {
                    return Err(ConfigError::UnsupportedFormat(
                        other.unwrap_or_default().to_string(),
                    ));
                }
            };
        }

        // GSTUDIO_BASE_PATH, GSTUDIO_REDACTION__MAX_SIZE, ...
        figment = figment.merge(
            Env::prefixed(ENV_PREFIX)
                .ignore(&["env"])
                .map(|key| env_key(key.as_str()))
                .lowercase(false),
        );

        figment = figment.merge(Serialized::defaults(overrides));

        let config: StudioConfig = figment.extract()?;
        config.validate()?;
        Ok(config)
    }
}

/// `redaction__max_size` becomes `redaction.maxSize`.
fn env_key(key: &str) -> Uncased<'static> {
    let nested: Vec<String> = key.split("__").map(snake_to_camel).collect();
    Uncased::from_owned(nested.join("."))
}

fn snake_to_camel(segment: &str) -> String {
    let mut camel = String::with_capacity(segment.len());
    let mut upper = false;
    for ch in segment.chars() {
        if ch == '_' {
            upper = true;
        } else if upper {
            camel.extend(ch.to_uppercase());
            upper = false;
        } else {
            camel.extend(ch.to_lowercase());
        }
    }
    camel
}
