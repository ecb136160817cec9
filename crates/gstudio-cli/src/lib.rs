//! Graph Studio CLI.
//!
//! Loads a container manifest, runs the snapshot collector over it and
//! presents the result in the terminal or over HTTP.
//!
//! # Architecture
//!
//! - [`cli`] - clap argument definitions
//! - [`commands`] - one module per subcommand
//! - [`error`] - `CliError` and miette conversion
//! - [`logger`] - tracing subscriber setup
//! - [`server`] - axum router for the read endpoints
//! - [`ui`] - status messages and report formatting
//!
//! # Example
//!
//! ```rust
//! use gstudio_cli::{error::Result, logger};
//!
//! fn main() -> Result<()> {
//!     logger::init_logger(false, false, false);
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod commands;
pub mod error;
pub mod logger;
pub mod server;
pub mod ui;

pub use error::{CliError, Result, ResultExt};
