//! Typed listing facade.
//!
//! Every page section reads through one of these functions. Each returns
//! `Ok(vec![])` when nothing matches and `Err(FetchError)` only when the
//! backend itself failed, so a composer can tell an empty section from a
//! missing one.
//!
//! Rows are decoded individually: a row that does not fit its record type is
//! dropped with a warning and the rest of the listing survives.

use super::store::{Backend, Collection, DEFAULT_LIMIT, Direction, FetchError, Filter, ListQuery};
use crate::types::{
    BlogPost, Job, JobApplication, JobFilters, Profile, Service, Webinar, WebinarRegistration,
    WebinarStatus,
};
use serde::de::DeserializeOwned;
use tracing::warn;

/// Home page: newest active postings.
pub const LATEST_JOBS_LIMIT: usize = 6;
/// Home page: next webinars on the calendar.
pub const UPCOMING_WEBINARS_LIMIT: usize = 3;
/// Home page: newest published articles.
pub const RECENT_POSTS_LIMIT: usize = 3;

/// Column holding the jobs full-text index.
const SEARCH_COLUMN: &str = "search_vector";

/// Run a query and decode the rows that fit `T`.
pub async fn list<T: DeserializeOwned>(
    backend: &dyn Backend,
    query: &ListQuery,
) -> Result<Vec<T>, FetchError> {
    let rows = backend.query(query).await?;
    let limit = query.row_limit();
    let mut records = Vec::with_capacity(rows.len().min(limit));
    for row in rows.into_iter().take(limit) {
        let id = row.get("id").and_then(|v| v.as_str()).unwrap_or("?").to_string();
        match serde_json::from_value::<T>(row) {
            Ok(record) => records.push(record),
            Err(e) => warn!(collection = %query.collection, id, error = %e, "dropping malformed row"),
        }
    }
    Ok(records)
}

async fn first<T: DeserializeOwned>(
    backend: &dyn Backend,
    query: ListQuery,
) -> Result<Option<T>, FetchError> {
    Ok(list(backend, &query.limit(1)).await?.into_iter().next())
}

// ============================================================================
// Home page sections
// ============================================================================

pub fn latest_jobs_query() -> ListQuery {
    ListQuery::new(Collection::Jobs)
        .filter(Filter::eq("is_active", true))
        .order_by("posted_at", Direction::Descending)
        .limit(LATEST_JOBS_LIMIT)
}

pub fn upcoming_webinars_query() -> ListQuery {
    ListQuery::new(Collection::Webinars)
        .filter(Filter::one_of(
            "status",
            [WebinarStatus::Upcoming.as_str(), WebinarStatus::Live.as_str()],
        ))
        .order_by("webinar_date", Direction::Ascending)
        .limit(UPCOMING_WEBINARS_LIMIT)
}

pub fn recent_posts_query() -> ListQuery {
    ListQuery::new(Collection::BlogPosts)
        .filter(Filter::eq("is_published", true))
        .order_by("published_at", Direction::Descending)
        .limit(RECENT_POSTS_LIMIT)
}

pub async fn latest_jobs(backend: &dyn Backend) -> Result<Vec<Job>, FetchError> {
    list(backend, &latest_jobs_query()).await
}

pub async fn upcoming_webinars(backend: &dyn Backend) -> Result<Vec<Webinar>, FetchError> {
    list(backend, &upcoming_webinars_query()).await
}

pub async fn recent_posts(backend: &dyn Backend) -> Result<Vec<BlogPost>, FetchError> {
    list(backend, &recent_posts_query()).await
}

// ============================================================================
// Listing pages
// ============================================================================

/// Active postings matching every present criterion, newest first.
pub fn jobs_query(filters: &JobFilters) -> ListQuery {
    let mut query = ListQuery::new(Collection::Jobs).filter(Filter::eq("is_active", true));
    if let Some(search) = &filters.search {
        query = query.filter(Filter::text_search(SEARCH_COLUMN, search));
    }
    if let Some(job_type) = filters.job_type {
        query = query.filter(Filter::eq("job_type", job_type.as_str()));
    }
    if let Some(level) = filters.experience_level {
        query = query.filter(Filter::eq("experience_level", level.as_str()));
    }
    if let Some(mode) = filters.work_mode {
        query = query.filter(Filter::eq("work_mode", mode.as_str()));
    }
    if let Some(location) = &filters.location {
        query = query.filter(Filter::ilike("location", location));
    }
    if !filters.tech_stack.is_empty() {
        query = query.filter(Filter::contains("tech_stack", &filters.tech_stack));
    }
    if let Some(min) = filters.salary_min {
        query = query.filter(Filter::gte("salary_min", min));
    }
    if let Some(max) = filters.salary_max {
        query = query.filter(Filter::lte("salary_max", max));
    }
    query
        .order_by("posted_at", Direction::Descending)
        .limit(DEFAULT_LIMIT)
}

pub async fn jobs_matching(
    backend: &dyn Backend,
    filters: &JobFilters,
) -> Result<Vec<Job>, FetchError> {
    list(backend, &jobs_query(filters)).await
}

/// Free-text job search used by the header search box.
pub async fn search_jobs(backend: &dyn Backend, text: &str) -> Result<Vec<Job>, FetchError> {
    let filters = JobFilters {
        search: Some(text.trim().to_string()),
        ..Default::default()
    };
    jobs_matching(backend, &filters).await
}

pub async fn all_webinars(backend: &dyn Backend) -> Result<Vec<Webinar>, FetchError> {
    let query = ListQuery::new(Collection::Webinars)
        .order_by("webinar_date", Direction::Ascending)
        .limit(DEFAULT_LIMIT);
    list(backend, &query).await
}

pub async fn published_posts(backend: &dyn Backend) -> Result<Vec<BlogPost>, FetchError> {
    let query = ListQuery::new(Collection::BlogPosts)
        .filter(Filter::eq("is_published", true))
        .order_by("published_at", Direction::Descending)
        .limit(DEFAULT_LIMIT);
    list(backend, &query).await
}

pub async fn active_services(backend: &dyn Backend) -> Result<Vec<Service>, FetchError> {
    let query = ListQuery::new(Collection::Services)
        .filter(Filter::eq("is_active", true))
        .order_by("price", Direction::Ascending)
        .limit(DEFAULT_LIMIT);
    list(backend, &query).await
}

// ============================================================================
// Detail lookups
// ============================================================================

pub async fn job_by_id(backend: &dyn Backend, id: &str) -> Result<Option<Job>, FetchError> {
    first(backend, ListQuery::new(Collection::Jobs).filter(Filter::eq("id", id))).await
}

pub async fn webinar_by_id(backend: &dyn Backend, id: &str) -> Result<Option<Webinar>, FetchError> {
    first(backend, ListQuery::new(Collection::Webinars).filter(Filter::eq("id", id))).await
}

/// Drafts are not reachable by slug.
pub async fn post_by_slug(backend: &dyn Backend, slug: &str) -> Result<Option<BlogPost>, FetchError> {
    let query = ListQuery::new(Collection::BlogPosts)
        .filter(Filter::eq("slug", slug))
        .filter(Filter::eq("is_published", true));
    first(backend, query).await
}

// ============================================================================
// Viewer-scoped reads (dashboard)
// ============================================================================

pub async fn profile_for(backend: &dyn Backend, user_id: &str) -> Result<Option<Profile>, FetchError> {
    first(backend, ListQuery::new(Collection::Profiles).filter(Filter::eq("id", user_id))).await
}

pub async fn applications_for(
    backend: &dyn Backend,
    user_id: &str,
) -> Result<Vec<JobApplication>, FetchError> {
    let query = ListQuery::new(Collection::JobApplications)
        .filter(Filter::eq("user_id", user_id))
        .order_by("applied_at", Direction::Descending)
        .limit(DEFAULT_LIMIT);
    list(backend, &query).await
}

pub async fn registrations_for(
    backend: &dyn Backend,
    user_id: &str,
) -> Result<Vec<WebinarRegistration>, FetchError> {
    let query = ListQuery::new(Collection::WebinarRegistrations)
        .filter(Filter::eq("user_id", user_id))
        .order_by("registered_at", Direction::Descending)
        .limit(DEFAULT_LIMIT);
    list(backend, &query).await
}

// ============================================================================
// Reachability check
// ============================================================================

/// Outcome of running one named query once.
#[derive(Debug, Clone, PartialEq)]
pub struct ListingCheck {
    pub name: &'static str,
    pub collection: Collection,
    /// Rows returned, or why the query failed.
    pub outcome: Result<usize, FetchError>,
}

/// Run each listing the home page depends on, plus services, once.
pub async fn check_listings(backend: &dyn Backend) -> Vec<ListingCheck> {
    let services = ListQuery::new(Collection::Services)
        .filter(Filter::eq("is_active", true))
        .limit(DEFAULT_LIMIT);
    let named = [
        ("latest jobs", latest_jobs_query()),
        ("upcoming webinars", upcoming_webinars_query()),
        ("recent posts", recent_posts_query()),
        ("active services", services),
    ];
    let mut checks = Vec::with_capacity(named.len());
    for (name, query) in named {
        let outcome = backend.query(&query).await.map(|rows| rows.len());
        checks.push(ListingCheck {
            name,
            collection: query.collection,
            outcome,
        });
    }
    checks
}
