use std::path::PathBuf;

use clap::{Args, Subcommand};

/// Available Graph Studio subcommands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Collect the container graph and print it as JSON
    ///
    /// Output has the same shape as the `GET {basePath}/graph` endpoint.
    Snapshot(SnapshotArgs),

    /// Print every route with its execution chain as JSON
    Routes(RoutesArgs),

    /// Summarize the graph: missing dependencies, request scope and cycles
    ///
    /// Framework-internal modules are hidden unless --include-internal is
    /// given. Overlay toggles are read from the settings file and can be
    /// switched on with flags.
    Analyze(AnalyzeArgs),

    /// Redact and truncate a JSON payload
    ///
    /// Applies the configured redaction patterns and size limit, exactly as
    /// trace payloads are sampled.
    Redact(RedactArgs),

    /// Serve the graph, routes and health endpoints over HTTP
    Serve(ServeArgs),
}

/// Container manifest selection shared by every graph command.
#[derive(Args, Debug, Clone, Default)]
pub struct ManifestArg {
    /// Container manifest (.json or .toml); overrides `manifest` in the config
    #[arg(short, long, value_name = "FILE")]
    pub manifest: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct SnapshotArgs {
    #[command(flatten)]
    pub manifest: ManifestArg,

    /// Pretty-print the JSON
    #[arg(long)]
    pub pretty: bool,

    /// Write to a file instead of stdout
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct RoutesArgs {
    #[command(flatten)]
    pub manifest: ManifestArg,

    /// Pretty-print the JSON
    #[arg(long)]
    pub pretty: bool,
}

#[derive(Args, Debug)]
pub struct AnalyzeArgs {
    #[command(flatten)]
    pub manifest: ManifestArg,

    /// Keep framework-internal modules in the graph
    #[arg(long)]
    pub include_internal: bool,

    /// Highlight explicitly request-scoped providers
    #[arg(long)]
    pub request_scoped: bool,

    /// Highlight providers that are request-scoped through a dependency
    #[arg(long)]
    pub implicit_request: bool,

    /// Detect provider and module cycles
    #[arg(long)]
    pub cycles: bool,

    /// Display settings file; overrides `settingsFile` in the config
    #[arg(long, value_name = "FILE")]
    pub settings: Option<PathBuf>,

    /// Persist the resulting toggles to the settings file
    #[arg(long, requires = "settings")]
    pub save_settings: bool,

    /// Print the report as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct RedactArgs {
    /// JSON payload to sample
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Longest string kept intact; overrides `redaction.maxSize`
    #[arg(long, value_name = "CHARS")]
    pub max_size: Option<usize>,

    /// Extra pattern (leaf key, dotted path or /regex/), repeatable
    #[arg(short, long = "pattern", value_name = "PATTERN")]
    pub patterns: Vec<String>,

    /// Pretty-print the JSON
    #[arg(long)]
    pub pretty: bool,
}

#[derive(Args, Debug)]
pub struct ServeArgs {
    #[command(flatten)]
    pub manifest: ManifestArg,

    /// Port to listen on; overrides `port` in the config
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Host to bind; overrides `host` in the config
    #[arg(long)]
    pub host: Option<String>,
}
