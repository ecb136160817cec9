//! Terminal output: status messages on stderr, plain reports on stdout.
//!
//! ```no_run
//! use gstudio_cli::ui;
//!
//! ui::init_colors(false);
//! ui::success("Snapshot written");
//! ui::warning("1 missing dependency");
//! ```

mod format;
mod messages;

pub use format::{format_chain, format_id_list, format_stats, section};
pub use messages::{info, success, warning};

/// Check if color output should be enabled.
///
/// `--no-color` and NO_COLOR win over FORCE_COLOR, then it falls back to
/// whether stderr is a terminal.
pub fn should_use_color(no_color: bool) -> bool {
    if no_color || std::env::var("NO_COLOR").is_ok() {
        return false;
    }
    if std::env::var("FORCE_COLOR").is_ok() {
        return true;
    }
    console::user_attended_stderr()
}

/// Apply the color decision to `console` styling.
pub fn init_colors(no_color: bool) {
    let enabled = should_use_color(no_color);
    console::set_colors_enabled(enabled);
    console::set_colors_enabled_stderr(enabled);
}
