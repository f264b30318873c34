//! Path contracts for every page the portal exposes.
//!
//! Views never format URLs by hand: they build a [`Route`] and call
//! [`Route::href`]. The router in [`crate::server`] registers the same
//! patterns listed by [`Route::PATTERNS`], so a link and its handler cannot
//! drift apart.

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Home,
    Jobs,
    Job(String),
    Webinars,
    Webinar(String),
    Blog,
    BlogPost(String),
    Services,
    Search(String),
    Login,
    Signup,
    SignOut,
    Dashboard,
    DashboardApplications,
    DashboardWebinars,
    DashboardProfile,
    PostJob,
    Pricing,
    Contact,
    Help,
    Privacy,
    Terms,
    Stylesheet,
}

impl Route {
    /// Router patterns, in the same order as the navigation contract.
    pub const PATTERNS: &'static [&'static str] = &[
        "/",
        "/jobs",
        "/jobs/{id}",
        "/webinars",
        "/webinars/{id}",
        "/blog",
        "/blog/{slug}",
        "/services",
        "/search",
        "/auth/login",
        "/auth/signup",
        "/auth/signout",
        "/dashboard",
        "/dashboard/applications",
        "/dashboard/webinars",
        "/dashboard/profile",
        "/employer/post-job",
        "/employer/pricing",
        "/employer/contact",
        "/help",
        "/privacy",
        "/terms",
        "/static/style.css",
    ];

    /// Absolute path (plus query) for links and redirects.
    pub fn href(&self) -> String {
        match self {
            Route::Home => "/".to_string(),
            Route::Jobs => "/jobs".to_string(),
            Route::Job(id) => format!("/jobs/{}", encode_uri_component(id)),
            Route::Webinars => "/webinars".to_string(),
            Route::Webinar(id) => format!("/webinars/{}", encode_uri_component(id)),
            Route::Blog => "/blog".to_string(),
            Route::BlogPost(slug) => format!("/blog/{}", encode_uri_component(slug)),
            Route::Services => "/services".to_string(),
            Route::Search(query) => format!("/search?query={}", encode_uri_component(query)),
            Route::Login => "/auth/login".to_string(),
            Route::Signup => "/auth/signup".to_string(),
            Route::SignOut => "/auth/signout".to_string(),
            Route::Dashboard => "/dashboard".to_string(),
            Route::DashboardApplications => "/dashboard/applications".to_string(),
            Route::DashboardWebinars => "/dashboard/webinars".to_string(),
            Route::DashboardProfile => "/dashboard/profile".to_string(),
            Route::PostJob => "/employer/post-job".to_string(),
            Route::Pricing => "/employer/pricing".to_string(),
            Route::Contact => "/employer/contact".to_string(),
            Route::Help => "/help".to_string(),
            Route::Privacy => "/privacy".to_string(),
            Route::Terms => "/terms".to_string(),
            Route::Stylesheet => "/static/style.css".to_string(),
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.href())
    }
}

/// Percent-encode like the browser's `encodeURIComponent`: everything except
/// `A-Z a-z 0-9 - _ . ! ~ * ' ( )` is escaped as UTF-8 bytes.
pub fn encode_uri_component(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for byte in input.bytes() {
        match byte {
            b'A'..=b'Z'
            | b'a'..=b'z'
            | b'0'..=b'9'
            | b'-'
            | b'_'
            | b'.'
            | b'!'
            | b'~'
            | b'*'
            | b'\''
            | b'('
            | b')' => out.push(byte as char),
            _ => out.push_str(&format!("%{byte:02X}")),
        }
    }
    out
}

/// Search box submission.
///
/// The pending query is trimmed; a blank query is a no-op (`None`, no
/// navigation), anything else yields the results destination.
pub fn submit_search(pending: &str) -> Option<Route> {
    let trimmed = pending.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(Route::Search(trimmed.to_string()))
    }
}
