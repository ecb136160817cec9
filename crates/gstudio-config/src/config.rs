//! Studio configuration types.

use std::path::PathBuf;

use gstudio_graph::{CollectorOptions, RedactionOptions};
use serde::{Deserialize, Serialize};

use crate::defaults::*;
use crate::error::{ConfigError, Result};

/// Graph Studio configuration, loaded from `gstudio.toml` or `gstudio.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudioConfig {
    /// Mount the HTTP endpoints at all.
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// Prefix under which the endpoints are mounted.
    #[serde(default = "default_base_path")]
    pub base_path: String,

    #[serde(default = "default_health_path")]
    pub health_path: String,

    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Container manifest to collect from.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manifest: Option<PathBuf>,

    /// Where display settings persist. In memory when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub settings_file: Option<PathBuf>,

    #[serde(default = "default_diagnostics_controller")]
    pub diagnostics_controller: String,

    /// Modules hidden by the analysis views.
    #[serde(default = "default_excluded_modules")]
    pub excluded_modules: Vec<String>,

    #[serde(default)]
    pub redaction: RedactionConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RedactionConfig {
    /// Leaf keys, dotted paths or `/regex/` patterns.
    #[serde(default = "default_redaction_patterns")]
    pub patterns: Vec<String>,

    #[serde(default = "default_max_size")]
    pub max_size: usize,
}

impl Default for RedactionConfig {
    fn default() -> Self {
        Self {
            patterns: default_redaction_patterns(),
            max_size: default_max_size(),
        }
    }
}

impl Default for StudioConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            base_path: default_base_path(),
            health_path: default_health_path(),
            host: default_host(),
            port: default_port(),
            manifest: None,
            settings_file: None,
            diagnostics_controller: default_diagnostics_controller(),
            excluded_modules: default_excluded_modules(),
            redaction: RedactionConfig::default(),
        }
    }
}

impl StudioConfig {
    pub fn collector_options(&self) -> CollectorOptions {
        CollectorOptions {
            diagnostics_controller: self.diagnostics_controller.clone(),
        }
    }

    pub fn redaction_options(&self) -> Result<RedactionOptions> {
        self.redaction.options()
    }

    /// Socket address string for the HTTP shell.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl RedactionConfig {
    pub fn options(&self) -> Result<RedactionOptions> {
        RedactionOptions::parse(&self.patterns, self.max_size).map_err(|e| {
            ConfigError::invalid(
                "redaction.patterns",
                e.to_string(),
                "Regex patterns are written as /expr/ and must compile",
            )
        })
    }
}
