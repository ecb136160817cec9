//! Command implementations for the Graph Studio CLI.
//!
//! Each command exposes an `execute` function taking its parsed arguments
//! and the optional `--config` path.

pub mod analyze;
pub mod redact;
pub mod routes;
pub mod serve;
pub mod snapshot;
pub(crate) mod utils;

pub use analyze::execute as analyze_execute;
pub use redact::execute as redact_execute;
pub use routes::execute as routes_execute;
pub use serve::execute as serve_execute;
pub use snapshot::execute as snapshot_execute;
