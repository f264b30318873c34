//! Shared test fixtures.
//!
//! Record builders pinned to a fixed clock, a seeded in-memory backend, and
//! panicking lookups that keep assertions short.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let backend = seeded_backend();
//! let jobs = latest_jobs(&backend).await.unwrap();
//! assert_eq!(job_ids(&jobs)[0], "active-0");
//! ```

use chrono::{DateTime, Duration, TimeZone, Utc};

use crate::backend::{Collection, MemoryBackend};
use crate::config::SiteConfig;
use crate::identity::{MenuState, SessionState, User, Viewer};
use crate::types::{
    BlogCategory, BlogPost, ExperienceLevel, Job, JobType, Service, ServiceCategory, Webinar,
    WebinarStatus, WorkMode,
};
use crate::views::Chrome;

// =========================================================================
// Clock
// =========================================================================

/// The instant every fixture is relative to: 2025-06-15 12:00 UTC.
pub fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 15, 12, 0, 0).unwrap()
}

// =========================================================================
// Record builders
// =========================================================================

/// A full-time remote posting made `hours_ago` before [`now`].
pub fn job(id: &str, hours_ago: i64, active: bool) -> Job {
    Job {
        id: id.to_string(),
        employer_id: "employer-1".to_string(),
        title: format!("Backend Engineer {id}"),
        description: "Build and operate web services.".to_string(),
        company_name: "Acme".to_string(),
        location: Some("Berlin".to_string()),
        job_type: JobType::FullTime,
        experience_level: ExperienceLevel::MidSenior,
        work_mode: WorkMode::Remote,
        salary_min: Some(80_000.0),
        salary_max: Some(100_000.0),
        currency: "USD".to_string(),
        tech_stack: vec!["rust".to_string(), "postgres".to_string()],
        application_link: None,
        posted_at: now() - Duration::hours(hours_ago),
        expires_at: None,
        is_active: active,
    }
}

/// Ten active postings (`active-0` newest) and five inactive ones that are
/// newer still, so ordering and the active filter are both exercised.
pub fn sample_jobs() -> Vec<Job> {
    let active = (0..10).map(|i| job(&format!("active-{i}"), i + 1, true));
    let inactive = (0..5).map(|i| job(&format!("inactive-{i}"), 0, false));
    active.chain(inactive).collect()
}

/// A webinar scheduled `days_from_now` days after [`now`] (negative is past).
pub fn webinar(id: &str, status: WebinarStatus, days_from_now: i64) -> Webinar {
    Webinar {
        id: id.to_string(),
        title: format!("Career Talk {id}"),
        description: "Practical advice from hiring managers.".to_string(),
        speaker_name: Some("Dana Lee".to_string()),
        speaker_bio: None,
        webinar_date: now() + Duration::days(days_from_now),
        duration_minutes: Some(60),
        status,
        live_link: None,
        replay_link: None,
        thumbnail_url: None,
        created_at: now() - Duration::days(30),
    }
}

pub fn post(id: &str, slug: &str, published: bool, days_ago: i64) -> BlogPost {
    BlogPost {
        id: id.to_string(),
        author_id: "author-1".to_string(),
        title: format!("Post {id}"),
        slug: slug.to_string(),
        content: "Some *useful* advice.".to_string(),
        category: BlogCategory::CareerAdvice,
        tags: vec!["career".to_string()],
        thumbnail_url: None,
        published_at: now() - Duration::days(days_ago),
        is_published: published,
        seo_title: None,
        seo_description: None,
    }
}

pub fn service(id: &str, price: f64) -> Service {
    Service {
        id: id.to_string(),
        provider_id: "provider-1".to_string(),
        name: format!("Resume Review {id}"),
        description: "Line-by-line feedback on your resume.".to_string(),
        category: ServiceCategory::ResumeReview,
        price,
        currency: "USD".to_string(),
        image_url: None,
        is_active: true,
        created_at: now() - Duration::days(10),
    }
}

/// A backend holding [`sample_jobs`], four webinars (one recorded), five
/// published posts plus a `draft-post` draft, and three services.
pub fn seeded_backend() -> MemoryBackend {
    let backend = MemoryBackend::new();
    backend.insert(Collection::Jobs, &sample_jobs());
    backend.insert(
        Collection::Webinars,
        &[
            webinar("w-live", WebinarStatus::Live, 0),
            webinar("w-soon", WebinarStatus::Upcoming, 2),
            webinar("w-later", WebinarStatus::Upcoming, 9),
            webinar("w-past", WebinarStatus::Recorded, -7),
        ],
    );
    let mut posts: Vec<BlogPost> = (0..5)
        .map(|i| post(&format!("post-{i}"), &format!("post-{i}"), true, i))
        .collect();
    posts.push(post("draft", "draft-post", false, 0));
    backend.insert(Collection::BlogPosts, &posts);
    backend.insert(
        Collection::Services,
        &[service("s-1", 149.0), service("s-2", 49.0), service("s-3", 99.0)],
    );
    backend
}

// =========================================================================
// Identity
// =========================================================================

pub fn user(id: &str, email: &str) -> User {
    User {
        id: id.to_string(),
        email: email.to_string(),
        display_name: None,
        avatar_url: None,
    }
}

pub fn viewer(id: &str, email: &str) -> Viewer {
    Viewer::from(user(id, email))
}

/// Page chrome for `path` with an idle menu, empty search box and [`now`].
pub fn chrome<'a>(config: &'a SiteConfig, session: &'a SessionState, path: &'a str) -> Chrome<'a> {
    Chrome {
        config,
        session,
        menu: MenuState::Idle,
        current: path,
        search: "",
        now: now(),
    }
}

// =========================================================================
// Lookups
// =========================================================================

pub fn job_ids(jobs: &[Job]) -> Vec<&str> {
    jobs.iter().map(|j| j.id.as_str()).collect()
}

/// Find a job by id, panicking with the available ids if missing.
pub fn find_job<'a>(jobs: &'a [Job], id: &str) -> &'a Job {
    jobs.iter()
        .find(|j| j.id == id)
        .unwrap_or_else(|| panic!("job {id:?} not found; have {:?}", job_ids(jobs)))
}
