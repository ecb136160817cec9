//! Status lines on stderr.

use owo_colors::OwoColorize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Status {
    Success,
    Info,
    Warning,
}

impl Status {
    fn symbol(self) -> &'static str {
        match self {
            Status::Success => "✓",
            Status::Info => "ℹ",
            Status::Warning => "⚠",
        }
    }

    /// Symbol and message, colored only when stderr styling is enabled.
    fn render(self, message: &str, colors: bool) -> String {
        if !colors {
            return format!("{} {}", self.symbol(), message);
        }
        match self {
            Status::Success => format!("{} {}", self.symbol().green().bold(), message),
            Status::Info => format!("{} {}", self.symbol().blue().bold(), message),
            Status::Warning => format!("{} {}", self.symbol().yellow().bold(), message.yellow()),
        }
    }
}

fn emit(status: Status, message: &str) {
    eprintln!("{}", status.render(message, console::colors_enabled_stderr()));
}

pub fn success(message: &str) {
    emit(Status::Success, message);
}

pub fn info(message: &str) {
    emit(Status::Info, message);
}

pub fn warning(message: &str) {
    emit(Status::Warning, message);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_render_has_no_escapes() {
        let line = Status::Warning.render("1 unresolved dependencies", false);
        assert_eq!(line, "⚠ 1 unresolved dependencies");
    }

    #[test]
    fn test_colored_render_keeps_message() {
        let line = Status::Success.render("Wrote graph.json", true);
        assert!(line.contains('\u{1b}'));
        assert!(line.ends_with("Wrote graph.json"));
    }
}
