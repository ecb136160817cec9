//! Layered configuration for Graph Studio.
//!
//! Sources are merged in order, later ones winning:
//!
//! 1. Built-in defaults
//! 2. `gstudio.toml` / `gstudio.json` (or an explicit path)
//! 3. `GSTUDIO_*` environment variables, with `__` separating nested keys
//! 4. Explicit overrides, typically command-line flags

mod config;
mod defaults;
mod error;
mod loading;
mod validation;

pub use config::{RedactionConfig, StudioConfig};
pub use defaults::ENV_VAR;
pub use error::{ConfigError, Result};
pub use loading::{CONFIG_FILE_NAMES, ConfigOverrides, ENV_PREFIX, discover};
