//! Miette diagnostic conversion for CLI errors.

use gstudio_graph::ManifestError;
use miette::Report;

use crate::error::CliError;

/// Convert CliError to miette Report
pub fn cli_error_to_miette(err: CliError) -> Report {
    match err {
        CliError::Config(e) => miette::miette!("Configuration error: {}", e),
        CliError::Manifest(e) => manifest_error_to_miette(e),
        CliError::NoManifest => miette::miette!(
            "No container manifest given\n\nHint: Pass --manifest <file> or set `manifest` in gstudio.toml"
        ),
        CliError::FileNotFound(path) => miette::miette!(
            "File not found: {}\n\nHint: Paths are resolved from the current directory",
            path.display()
        ),
        _ => miette::miette!("{}", err),
    }
}

fn manifest_error_to_miette(err: ManifestError) -> Report {
    match err {
        ManifestError::UnknownImport { module, import } => miette::miette!(
            "Module '{}' imports '{}', which is not declared\n\nHint: Add an entry for '{}' to `modules`, or use null for an unnamed import",
            module,
            import,
            import
        ),
        ManifestError::UnsupportedExtension(ext) => miette::miette!(
            "Unsupported manifest format: {}\n\nHint: Use a .json or .toml manifest",
            ext
        ),
        other => miette::miette!("Manifest error: {}", other),
    }
}
