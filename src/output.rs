//! CLI output formatting.
//!
//! # Information-First Display
//!
//! Reports lead with what a thing *is* (a listing, a route) and show where it
//! comes from as indented context. The `check` report reads as an inventory
//! of what the portal will serve:
//!
//! ```text
//! Site
//!     PrimoJobs - Premier Job Portal for Career Growth
//!     https://primojobs.com
//!
//! Backend
//!     memory (seed.json)
//!     listening on 0.0.0.0:3000
//!
//! Listings
//!     latest jobs: 6 rows
//!         Source: jobs
//!     upcoming webinars: FAILED (request failed: timeout)
//!         Source: webinars
//!
//! 1 of 2 listings unavailable
//! ```
//!
//! # Architecture
//!
//! Each report has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout.

use crate::backend::listings::ListingCheck;
use crate::config::{BackendKind, SiteConfig};
use crate::routes::Route;

fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

fn plural(n: usize, one: &str, many: &str) -> String {
    if n == 1 {
        format!("{n} {one}")
    } else {
        format!("{n} {many}")
    }
}

// ============================================================================
// check
// ============================================================================

fn backend_line(config: &SiteConfig) -> String {
    match config.backend.kind {
        BackendKind::Postgrest => format!("postgrest ({})", config.backend.url),
        BackendKind::Memory => match &config.backend.seed_file {
            Some(seed) => format!("memory ({})", seed.display()),
            None => "memory (empty)".to_string(),
        },
    }
}

/// Config summary plus one line per checked listing.
pub fn format_check_report(config: &SiteConfig, checks: &[ListingCheck]) -> Vec<String> {
    let mut lines = vec![
        "Site".to_string(),
        format!("{}{} - {}", indent(1), config.site.name, config.site.tagline),
        format!("{}{}", indent(1), config.site.url),
        String::new(),
        "Backend".to_string(),
        format!("{}{}", indent(1), backend_line(config)),
        format!("{}listening on {}", indent(1), config.bind_address()),
        format!("{}session cookie: {}", indent(1), config.session.cookie),
        String::new(),
        "Listings".to_string(),
    ];

    for check in checks {
        let status = match &check.outcome {
            Ok(n) => plural(*n, "row", "rows"),
            Err(e) => format!("FAILED ({e})"),
        };
        lines.push(format!("{}{}: {}", indent(1), check.name, status));
        lines.push(format!("{}Source: {}", indent(2), check.collection));
    }

    let failed = checks.iter().filter(|p| p.outcome.is_err()).count();
    lines.push(String::new());
    if failed == 0 {
        lines.push(format!("All {} listings reachable", checks.len()));
    } else {
        lines.push(format!("{failed} of {} listings unavailable", checks.len()));
    }
    lines
}

pub fn print_check_report(config: &SiteConfig, checks: &[ListingCheck]) {
    for line in format_check_report(config, checks) {
        println!("{}", line);
    }
}

// ============================================================================
// routes
// ============================================================================

fn route_note(pattern: &str) -> Option<&'static str> {
    if pattern == Route::SignOut.href() {
        Some("POST")
    } else if pattern.starts_with("/dashboard") {
        Some("signed in")
    } else if pattern == Route::Stylesheet.href() {
        Some("asset")
    } else {
        None
    }
}

/// The path contract, one route per line with access notes.
pub fn format_routes() -> Vec<String> {
    let width = Route::PATTERNS.iter().map(|p| p.len()).max().unwrap_or(0);
    Route::PATTERNS
        .iter()
        .map(|pattern| match route_note(pattern) {
            Some(note) => format!("{pattern:<width$}  ({note})"),
            None => pattern.to_string(),
        })
        .collect()
}

pub fn print_routes() {
    for line in format_routes() {
        println!("{}", line);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{Collection, FetchError};

    fn check(name: &'static str, outcome: Result<usize, FetchError>) -> ListingCheck {
        ListingCheck {
            name,
            collection: Collection::Jobs,
            outcome,
        }
    }

    #[test]
    fn check_report_lists_rows_and_failures() {
        let config = SiteConfig::default();
        let lines = format_check_report(
            &config,
            &[
                check("latest jobs", Ok(6)),
                check("recent posts", Ok(1)),
                check("upcoming webinars", Err(FetchError::Transport("timeout".into()))),
            ],
        );

        assert_eq!(lines[0], "Site");
        assert!(lines.contains(&"    memory (empty)".to_string()));
        assert!(lines.contains(&"    latest jobs: 6 rows".to_string()));
        assert!(lines.contains(&"    recent posts: 1 row".to_string()));
        assert!(lines.iter().any(|l| l.starts_with("    upcoming webinars: FAILED")));
        assert!(lines.contains(&"        Source: jobs".to_string()));
        assert_eq!(lines.last().unwrap(), "1 of 3 listings unavailable");
    }

    #[test]
    fn check_report_all_reachable() {
        let lines = format_check_report(&SiteConfig::default(), &[check("latest jobs", Ok(0))]);
        assert_eq!(lines.last().unwrap(), "All 1 listings reachable");
    }

    #[test]
    fn routes_cover_contract_with_notes() {
        let lines = format_routes();
        assert_eq!(lines.len(), Route::PATTERNS.len());
        assert_eq!(lines[0], "/");
        assert!(lines.iter().any(|l| l.starts_with("/auth/signout") && l.ends_with("(POST)")));
        assert!(
            lines
                .iter()
                .any(|l| l.starts_with("/dashboard/profile") && l.ends_with("(signed in)"))
        );
    }
}
