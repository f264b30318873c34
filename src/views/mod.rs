//! Server-rendered pages.
//!
//! Every page is a pure function from already-fetched data to [`Markup`]:
//! handlers in [`crate::server`] do the I/O, then call into here. Shared
//! per-request inputs (config, viewer, clock) travel in [`Chrome`].
//!
//! | Module | Role |
//! |--------|------|
//! | [`layout`] | Document shell, `<head>` meta, footer |
//! | [`nav`] | Header: links, search box, identity region |
//! | [`cards`] | Job, webinar, post and service cards |
//! | [`home`] | Landing page sections |
//! | [`listings`] | Listing, detail and search pages |
//! | [`account`] | Auth forms and dashboard pages |
//! | [`info`] | Employer and static content pages |
//! | [`errors`] | Not-found and failure pages |

pub mod account;
pub mod cards;
pub mod errors;
pub mod home;
pub mod info;
pub mod layout;
pub mod listings;
pub mod nav;

use crate::backend::FetchError;
use crate::config::SiteConfig;
use crate::identity::{MenuState, SessionState};
use chrono::{DateTime, Utc};
use tracing::warn;

/// Per-request inputs shared by every page.
pub struct Chrome<'a> {
    pub config: &'a SiteConfig,
    pub session: &'a SessionState,
    /// Sign-out control state for the viewer's session.
    pub menu: MenuState,
    /// Request path, for marking the current nav link.
    pub current: &'a str,
    /// Prefill for the header search box.
    pub search: &'a str,
    pub now: DateTime<Utc>,
}

/// Title and description for one page.
#[derive(Debug, Clone, Default)]
pub struct PageMeta {
    /// `None` uses the site's default title.
    pub title: Option<String>,
    pub description: Option<String>,
}

impl PageMeta {
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            description: None,
        }
    }

    pub fn describe(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// A fetched page section: either rendered (possibly with zero cards) or
/// left out because its listing failed.
#[derive(Debug, Clone, PartialEq)]
pub enum Section<T> {
    Ready(Vec<T>),
    Unavailable,
}

impl<T> Section<T> {
    /// Keep the rows, or log the failure and mark the section unavailable.
    pub fn from_fetch(name: &str, result: Result<Vec<T>, FetchError>) -> Self {
        match result {
            Ok(rows) => Section::Ready(rows),
            Err(e) => {
                warn!(section = name, error = %e, "listing failed, omitting section");
                Section::Unavailable
            }
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, Section::Ready(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fetch_failure_becomes_unavailable() {
        let section: Section<u8> =
            Section::from_fetch("jobs", Err(FetchError::Transport("down".into())));
        assert_eq!(section, Section::Unavailable);
    }

    #[test]
    fn empty_success_stays_ready() {
        let section: Section<u8> = Section::from_fetch("jobs", Ok(vec![]));
        assert_eq!(section, Section::Ready(vec![]));
        assert!(section.is_ready());
    }
}
