use gstudio_graph::analysis::DEFAULT_EXCLUDED_MODULES;
use gstudio_graph::collector::DIAGNOSTICS_CONTROLLER;
use gstudio_graph::redact::{DEFAULT_MAX_SIZE, DEFAULT_PATTERNS};

/// Environment variable naming the deployment environment.
pub const ENV_VAR: &str = "GSTUDIO_ENV";

/// Enabled everywhere except production.
pub fn default_enabled() -> bool {
    std::env::var(ENV_VAR).map_or(true, |env| env != "production")
}

pub fn default_base_path() -> String {
    "/graph-studio".to_string()
}

pub fn default_health_path() -> String {
    "/health".to_string()
}

pub fn default_host() -> String {
    "127.0.0.1".to_string()
}

pub fn default_port() -> u16 {
    4400
}

pub fn default_diagnostics_controller() -> String {
    DIAGNOSTICS_CONTROLLER.to_string()
}

pub fn default_excluded_modules() -> Vec<String> {
    DEFAULT_EXCLUDED_MODULES
        .iter()
        .map(|name| name.to_string())
        .collect()
}

pub fn default_redaction_patterns() -> Vec<String> {
    DEFAULT_PATTERNS
        .iter()
        .map(|pattern| pattern.to_string())
        .collect()
}

pub fn default_max_size() -> usize {
    DEFAULT_MAX_SIZE
}
