//! Backend trait and the read-query model shared by every adapter.
//!
//! A [`ListQuery`] names a collection, AND-combined [`Filter`]s, one sort key
//! with a direction, and a positive row cap. Adapters return raw JSON rows;
//! decoding into schema records happens in [`super::listings`].

use async_trait::async_trait;
use serde_json::Value;
use std::fmt;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum FetchError {
    #[error("backend unreachable: {0}")]
    Transport(String),
    #[error("backend returned {code}: {body}")]
    Status { code: u16, body: String },
    #[error("malformed backend response: {0}")]
    Decode(String),
    #[error("backend unavailable: {0}")]
    Unavailable(String),
}

/// Named record sets exposed by the hosted database.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Profiles,
    Jobs,
    Webinars,
    BlogPosts,
    Services,
    JobApplications,
    WebinarRegistrations,
}

impl Collection {
    pub const ALL: &'static [Collection] = &[
        Collection::Profiles,
        Collection::Jobs,
        Collection::Webinars,
        Collection::BlogPosts,
        Collection::Services,
        Collection::JobApplications,
        Collection::WebinarRegistrations,
    ];

    /// Table name on the wire.
    pub fn table(self) -> &'static str {
        match self {
            Collection::Profiles => "profiles",
            Collection::Jobs => "jobs",
            Collection::Webinars => "webinars",
            Collection::BlogPosts => "blog_posts",
            Collection::Services => "services",
            Collection::JobApplications => "job_applications",
            Collection::WebinarRegistrations => "webinar_registrations",
        }
    }

    pub fn from_table(table: &str) -> Option<Collection> {
        Collection::ALL.iter().copied().find(|c| c.table() == table)
    }

    /// Columns a full-text search matches against when the backend has no
    /// search index of its own.
    pub fn text_columns(self) -> &'static [&'static str] {
        match self {
            Collection::Jobs => &["title", "company_name", "description", "location", "tech_stack"],
            Collection::BlogPosts => &["title", "content", "tags"],
            Collection::Webinars => &["title", "description", "speaker_name"],
            Collection::Services => &["name", "description"],
            Collection::Profiles => &["full_name"],
            Collection::JobApplications | Collection::WebinarRegistrations => &[],
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.table())
    }
}

/// One predicate on a column. All filters of a query must hold.
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    Eq { column: String, value: Value },
    In { column: String, values: Vec<Value> },
    Gte { column: String, value: Value },
    Lte { column: String, value: Value },
    /// Case-insensitive substring match.
    ILike { column: String, needle: String },
    /// Array column contains every listed element.
    Contains { column: String, values: Vec<String> },
    /// Full-text search over the collection's search index.
    TextSearch { column: String, query: String },
}

impl Filter {
    pub fn eq(column: &str, value: impl Into<Value>) -> Self {
        Filter::Eq {
            column: column.to_string(),
            value: value.into(),
        }
    }

    pub fn one_of<V: Into<Value>>(column: &str, values: impl IntoIterator<Item = V>) -> Self {
        Filter::In {
            column: column.to_string(),
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    pub fn gte(column: &str, value: impl Into<Value>) -> Self {
        Filter::Gte {
            column: column.to_string(),
            value: value.into(),
        }
    }

    pub fn lte(column: &str, value: impl Into<Value>) -> Self {
        Filter::Lte {
            column: column.to_string(),
            value: value.into(),
        }
    }

    pub fn ilike(column: &str, needle: &str) -> Self {
        Filter::ILike {
            column: column.to_string(),
            needle: needle.to_string(),
        }
    }

    pub fn contains(column: &str, values: &[String]) -> Self {
        Filter::Contains {
            column: column.to_string(),
            values: values.to_vec(),
        }
    }

    pub fn text_search(column: &str, query: &str) -> Self {
        Filter::TextSearch {
            column: column.to_string(),
            query: query.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Ascending,
    Descending,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Order {
    pub column: String,
    pub direction: Direction,
}

/// Row cap applied when a query doesn't set one.
pub const DEFAULT_LIMIT: usize = 50;

/// A filtered, sorted, capped read against one collection.
#[derive(Debug, Clone, PartialEq)]
pub struct ListQuery {
    pub collection: Collection,
    pub filters: Vec<Filter>,
    pub order: Option<Order>,
    limit: usize,
}

impl ListQuery {
    pub fn new(collection: Collection) -> Self {
        Self {
            collection,
            filters: Vec::new(),
            order: None,
            limit: DEFAULT_LIMIT,
        }
    }

    pub fn filter(mut self, filter: Filter) -> Self {
        self.filters.push(filter);
        self
    }

    pub fn order_by(mut self, column: &str, direction: Direction) -> Self {
        self.order = Some(Order {
            column: column.to_string(),
            direction,
        });
        self
    }

    /// Set the row cap. The cap is always at least one row.
    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = limit.max(1);
        self
    }

    pub fn row_limit(&self) -> usize {
        self.limit
    }
}

/// A read-only handle to the hosted database.
///
/// "No rows" is `Ok(vec![])`; only transport, status, and decode problems
/// are errors.
#[async_trait]
pub trait Backend: Send + Sync {
    /// Short tag for logs and the `check` report.
    fn name(&self) -> &'static str;

    /// Run a listing query and return raw rows in the requested order.
    async fn query(&self, query: &ListQuery) -> Result<Vec<Value>, FetchError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn limit_is_clamped_to_one() {
        let query = ListQuery::new(Collection::Jobs).limit(0);
        assert_eq!(query.row_limit(), 1);
    }

    #[test]
    fn default_limit_applies() {
        assert_eq!(ListQuery::new(Collection::Jobs).row_limit(), DEFAULT_LIMIT);
    }

    #[test]
    fn builder_accumulates_filters() {
        let query = ListQuery::new(Collection::Webinars)
            .filter(Filter::one_of("status", ["upcoming", "live"]))
            .order_by("webinar_date", Direction::Ascending)
            .limit(3);
        assert_eq!(
            query.filters,
            vec![Filter::In {
                column: "status".into(),
                values: vec![json!("upcoming"), json!("live")],
            }]
        );
        assert_eq!(query.order.unwrap().direction, Direction::Ascending);
    }

    #[test]
    fn table_names_round_trip() {
        for collection in Collection::ALL {
            assert_eq!(Collection::from_table(collection.table()), Some(*collection));
        }
        assert_eq!(Collection::from_table("payments"), None);
    }
}
