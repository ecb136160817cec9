//! Plain-text formatting for graph reports.

use console::style;
use gstudio_graph::GraphStats;
use gstudio_graph::model::RouteChain;

/// One-line node count summary.
///
/// ```
/// use gstudio_graph::GraphStats;
/// use gstudio_cli::ui::format_stats;
///
/// let stats = GraphStats { modules: 2, providers: 1, controllers: 1, routes: 3 };
/// assert_eq!(format_stats(&stats), "2 modules, 1 provider, 1 controller, 3 routes");
/// ```
pub fn format_stats(stats: &GraphStats) -> String {
    [
        plural(stats.modules, "module"),
        plural(stats.providers, "provider"),
        plural(stats.controllers, "controller"),
        plural(stats.routes, "route"),
    ]
    .join(", ")
}

fn plural(count: usize, noun: &str) -> String {
    if count == 1 {
        format!("{count} {noun}")
    } else {
        format!("{count} {noun}s")
    }
}

/// Non-empty chain stages, e.g. `guards: AuthGuard, RolesGuard | pipes: ValidationPipe`.
pub fn format_chain(chain: &RouteChain) -> String {
    if chain.is_empty() {
        return "-".to_string();
    }

    [
        ("guards", &chain.guards),
        ("pipes", &chain.pipes),
        ("interceptors", &chain.interceptors),
        ("filters", &chain.filters),
    ]
    .into_iter()
    .filter(|(_, entries)| !entries.is_empty())
    .map(|(stage, entries)| format!("{stage}: {}", entries.join(", ")))
    .collect::<Vec<_>>()
    .join(" | ")
}

/// Comma-separated ids, or `none`.
pub fn format_id_list<'a>(ids: impl IntoIterator<Item = &'a String>) -> String {
    let ids: Vec<&str> = ids.into_iter().map(String::as_str).collect();
    if ids.is_empty() {
        "none".to_string()
    } else {
        ids.join(", ")
    }
}

/// Section heading with its item count.
pub fn section(title: &str, count: usize) -> String {
    format!("{} ({count})", style(title).bold())
}
