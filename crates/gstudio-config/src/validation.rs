use crate::config::StudioConfig;
use crate::error::{ConfigError, Result};

/// Endpoint paths mounted next to the health check.
const RESERVED_PATHS: &[&str] = &["/graph", "/routes"];

fn validate_mount_path(field: &str, path: &str) -> Result<()> {
    if !path.starts_with('/') {
        return Err(ConfigError::invalid(
            field,
            path,
            format!("Paths must start with '/' (try '/{}')", path),
        ));
    }
    Ok(())
}

impl StudioConfig {
    /// Validate configuration for logical consistency.
    pub fn validate(&self) -> Result<()> {
        validate_mount_path("basePath", &self.base_path)?;
        validate_mount_path("healthPath", &self.health_path)?;

        if RESERVED_PATHS.contains(&self.health_path.trim_end_matches('/')) {
            return Err(ConfigError::invalid(
                "healthPath",
                &self.health_path,
                "The graph and routes endpoints already use this path",
            ));
        }

        if self.redaction.max_size == 0 {
            return Err(ConfigError::invalid(
                "redaction.maxSize",
                "0",
                "Use a positive number of characters",
            ));
        }

        if self.diagnostics_controller.trim().is_empty() {
            return Err(ConfigError::invalid(
                "diagnosticsController",
                "",
                "Name the controller that serves the studio endpoints",
            ));
        }

        self.redaction.options()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert!(StudioConfig::default().validate().is_ok());
    }

    #[test]
    fn rejects_relative_paths() {
        let config = StudioConfig {
            base_path: "graph-studio".to_string(),
            ..StudioConfig::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("basePath"));
        assert!(err.to_string().contains("'/graph-studio'"));

        let config = StudioConfig {
            health_path: "health".to_string(),
            ..StudioConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_health_path_shadowing_endpoints() {
        let config = StudioConfig {
            health_path: "/routes/".to_string(),
            ..StudioConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_zero_max_size() {
        let mut config = StudioConfig::default();
        config.redaction.max_size = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_invalid_regex_patterns() {
        let mut config = StudioConfig::default();
        config.redaction.patterns.push("/(unclosed/".to_string());

        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("redaction.patterns"));
    }

    #[test]
    fn rejects_blank_diagnostics_controller() {
        let config = StudioConfig {
            diagnostics_controller: "  ".to_string(),
            ..StudioConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
