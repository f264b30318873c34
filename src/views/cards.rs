//! Listing cards.
//!
//! A card never fails to render: missing descriptive fields get a
//! placeholder and optional rows (location, salary, speaker, thumbnail) are
//! simply left out.

use crate::format::{
    format_currency, format_salary, format_webinar_date, overflow_label, time_ago,
};
use crate::routes::Route;
use crate::types::{BlogPost, Job, Service, Webinar, WebinarStatus};
use chrono::{DateTime, Utc};
use maud::{Markup, html};

/// Badges shown before collapsing into "+N more".
const MAX_BADGES: usize = 3;

fn or_placeholder<'a>(value: &'a str, placeholder: &'a str) -> &'a str {
    if value.trim().is_empty() {
        placeholder
    } else {
        value
    }
}

fn badges(items: &[String], show_overflow: bool) -> Markup {
    html! {
        @if !items.is_empty() {
            div.badges {
                @for item in items.iter().take(MAX_BADGES) {
                    span.badge.badge-outline { (item) }
                }
                @if show_overflow {
                    @if let Some(more) = overflow_label(items.len(), MAX_BADGES) {
                        span.badge.badge-outline { (more) }
                    }
                }
            }
        }
    }
}

pub fn job_card(job: &Job, now: DateTime<Utc>) -> Markup {
    html! {
        article.card.job-card {
            header.card-header {
                div {
                    h3.card-title { (or_placeholder(&job.title, "Untitled position")) }
                    p.card-subtitle { (or_placeholder(&job.company_name, "Company not listed")) }
                }
                span.badge { (job.job_type.label()) }
            }
            div.card-body {
                @if let Some(location) = job.location.as_deref().filter(|l| !l.trim().is_empty()) {
                    p.card-meta.location { (location) }
                }
                p.card-meta.level { (job.experience_level.label()) " · " (job.work_mode.label()) }
                @if job.has_salary() {
                    p.salary { (format_salary(job.salary_min, job.salary_max, &job.currency)) }
                }
                (badges(&job.tech_stack, true))
            }
            footer.card-footer {
                span.muted { (time_ago(job.posted_at, now)) }
                a.button.button-small href=(Route::Job(job.id.clone()).href()) { "View Details" }
            }
        }
    }
}

fn webinar_badge(status: WebinarStatus) -> Markup {
    html! {
        @match status {
            WebinarStatus::Live => { span.badge.badge-live { "LIVE NOW" } }
            WebinarStatus::Upcoming => { span.badge { "UPCOMING" } }
            WebinarStatus::Recorded => { span.badge.badge-outline { "RECORDED" } }
        }
    }
}

fn webinar_action(status: WebinarStatus) -> &'static str {
    match status {
        WebinarStatus::Live => "Join Now",
        WebinarStatus::Upcoming => "Register",
        WebinarStatus::Recorded => "Watch Replay",
    }
}

pub fn webinar_card(webinar: &Webinar) -> Markup {
    let title = or_placeholder(&webinar.title, "Untitled webinar");
    html! {
        article.card.webinar-card {
            @if let Some(thumbnail) = &webinar.thumbnail_url {
                div.card-media { img src=(thumbnail) alt=(title) loading="lazy"; }
            }
            header.card-header {
                div {
                    h3.card-title { (title) }
                    @if let Some(speaker) = &webinar.speaker_name {
                        p.card-subtitle { "By " (speaker) }
                    }
                }
            }
            div.card-body {
                p.card-meta.schedule { (format_webinar_date(webinar.webinar_date)) }
                @if let Some(minutes) = webinar.duration_minutes {
                    p.card-meta { "Duration: " (minutes) " minutes" }
                }
                (webinar_badge(webinar.status))
            }
            footer.card-footer {
                a.button.button-block href=(Route::Webinar(webinar.id.clone()).href()) {
                    (webinar_action(webinar.status))
                }
            }
        }
    }
}

pub fn post_card(post: &BlogPost, now: DateTime<Utc>) -> Markup {
    let title = or_placeholder(&post.title, "Untitled article");
    html! {
        article.card.post-card {
            @if let Some(thumbnail) = &post.thumbnail_url {
                div.card-media { img src=(thumbnail) alt=(title) loading="lazy"; }
            }
            header.card-header {
                div {
                    span.badge.badge-outline { (post.category.label()) }
                    h3.card-title { (title) }
                }
            }
            div.card-body {
                p.card-meta { (time_ago(post.published_at, now)) }
                (badges(&post.tags, false))
            }
            footer.card-footer {
                a.button.button-ghost.button-block href=(Route::BlogPost(post.slug.clone()).href()) {
                    "Read More"
                }
            }
        }
    }
}

pub fn service_card(service: &Service) -> Markup {
    let name = or_placeholder(&service.name, "Career service");
    html! {
        article.card.service-card id=(service.id) {
            @if let Some(image) = &service.image_url {
                div.card-media { img src=(image) alt=(name) loading="lazy"; }
            }
            header.card-header {
                div {
                    h3.card-title { (name) }
                    p.card-subtitle { (service.category.label()) }
                }
                span.price { (format_currency(service.price, &service.currency)) }
            }
            div.card-body {
                p { (service.description) }
            }
            footer.card-footer {
                a.button.button-block href=(Route::Signup.href()) { "Get Started" }
            }
        }
    }
}
