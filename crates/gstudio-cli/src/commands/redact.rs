//! Redact command implementation.

use std::fs;
use std::path::Path;

use gstudio_config::ConfigOverrides;
use gstudio_graph::{RedactionOptions, RedactionPattern, sample_payload};
use serde_json::Value;

use crate::cli::RedactArgs;
use crate::commands::utils;
use crate::error::{CliError, Result, ResultExt};

/// Sample a JSON payload file through the redaction engine.
pub fn execute(args: RedactArgs, config_path: Option<&Path>) -> Result<()> {
    let config = utils::load_config(config_path, &ConfigOverrides::default())?;
    let options = options_for(&args, config.redaction_options()?)?;

    let content = fs::read_to_string(&args.file).with_path(&args.file)?;
    let payload: Value =
        serde_json::from_str(&content).with_hint("The payload file must contain valid JSON")?;

    utils::write_json(&sample_payload(&payload, &options), args.pretty, None)
}

/// Layer the command-line patterns and size limit over the configured ones.
fn options_for(args: &RedactArgs, mut options: RedactionOptions) -> Result<RedactionOptions> {
    for pattern in &args.patterns {
        let parsed = RedactionPattern::parse(pattern).map_err(|e| {
            CliError::InvalidArgument(format!("pattern '{}': {}", pattern, e))
        })?;
        options.patterns.push(parsed);
    }

    match args.max_size {
        Some(0) => Err(CliError::InvalidArgument(
            "--max-size must be at least 1".to_string(),
        )),
        Some(max_size) => Ok(RedactionOptions { max_size, ..options }),
        None => Ok(options),
    }
}
