//! Listing, detail and search pages.

use super::cards::{job_card, post_card, service_card, webinar_card};
use super::layout::page;
use super::{Chrome, PageMeta, Section};
use crate::format::{format_date, format_salary, format_webinar_date, time_ago};
use crate::routes::Route;
use crate::types::{
    BlogPost, ExperienceLevel, Job, JobFilters, JobType, Service, Webinar, WebinarStatus, WorkMode,
};
use maud::{Markup, PreEscaped, html};
use pulldown_cmark::{Event, Parser, html as md_html};

fn unavailable_notice(what: &str) -> Markup {
    html! {
        p.notice { (what) " are unavailable right now. Please try again shortly." }
    }
}

fn empty_notice(message: &str) -> Markup {
    html! { p.empty-state { (message) } }
}

/// Markdown to HTML with raw HTML blocks dropped.
pub fn render_markdown(source: &str) -> Markup {
    let parser = Parser::new(source)
        .filter(|event| !matches!(event, Event::Html(_) | Event::InlineHtml(_)));
    let mut body = String::new();
    md_html::push_html(&mut body, parser);
    PreEscaped(body)
}

fn paragraphs(text: &str) -> Markup {
    html! {
        @for para in text.split("\n\n").map(str::trim).filter(|p| !p.is_empty()) {
            p { (para) }
        }
    }
}

// ============================================================================
// Jobs
// ============================================================================

fn select<T: Copy + PartialEq>(
    name: &str,
    label: &str,
    options: &[T],
    selected: Option<T>,
    value: fn(T) -> &'static str,
    text: fn(T) -> &'static str,
) -> Markup {
    html! {
        label {
            span { (label) }
            select name=(name) {
                option value="" { "Any" }
                @for choice in options {
                    option value=(value(*choice)) selected[selected == Some(*choice)] { (text(*choice)) }
                }
            }
        }
    }
}

fn filter_form(filters: &JobFilters) -> Markup {
    let number = |v: Option<f64>| v.map(|n| n.to_string()).unwrap_or_default();
    html! {
        form.filters action=(Route::Jobs.href()) method="get" {
            label {
                span { "Keywords" }
                input type="search" name="search" value=[filters.search.as_deref()];
            }
            (select("job_type", "Job type", JobType::ALL, filters.job_type, JobType::as_str, JobType::label))
            (select("experience_level", "Experience", ExperienceLevel::ALL, filters.experience_level, ExperienceLevel::as_str, ExperienceLevel::label))
            (select("work_mode", "Work mode", WorkMode::ALL, filters.work_mode, WorkMode::as_str, WorkMode::label))
            label {
                span { "Location" }
                input type="text" name="location" value=[filters.location.as_deref()];
            }
            label {
                span { "Tech stack" }
                input type="text" name="tech_stack" placeholder="rust, postgres"
                    value=(filters.tech_stack.join(", "));
            }
            label {
                span { "Min salary" }
                input type="number" name="salary_min" min="0" value=(number(filters.salary_min));
            }
            label {
                span { "Max salary" }
                input type="number" name="salary_max" min="0" value=(number(filters.salary_max));
            }
            div.actions {
                button.button type="submit" { "Apply filters" }
                a.button.button-ghost href=(Route::Jobs.href()) { "Clear" }
            }
        }
    }
}

pub fn render_jobs(chrome: &Chrome, filters: &JobFilters, jobs: &Section<Job>) -> Markup {
    let content = html! {
        section.container {
            h1 { "Browse Jobs" }
            (filter_form(filters))
            @match jobs {
                Section::Ready(jobs) if jobs.is_empty() => {
                    (empty_notice("No jobs match these filters."))
                }
                Section::Ready(jobs) => {
                    p.result-count { (jobs.len()) " open positions" }
                    div.card-grid {
                        @for job in jobs { (job_card(job, chrome.now)) }
                    }
                }
                Section::Unavailable => { (unavailable_notice("Job listings")) }
            }
        }
    };
    page(
        chrome,
        &PageMeta::titled("Jobs").describe("Browse open positions from top companies."),
        content,
    )
}

pub fn render_job(chrome: &Chrome, job: &Job) -> Markup {
    let title = if job.title.trim().is_empty() {
        "Untitled position"
    } else {
        &job.title
    };
    let content = html! {
        article.container.detail.job-detail {
            header.detail-header {
                h1 { (title) }
                p.card-subtitle { (job.company_name) }
                div.badges {
                    span.badge { (job.job_type.label()) }
                    span.badge.badge-outline { (job.experience_level.label()) }
                    span.badge.badge-outline { (job.work_mode.label()) }
                }
            }
            dl.facts {
                @if let Some(location) = &job.location {
                    dt { "Location" } dd { (location) }
                }
                dt { "Salary" }
                dd { (format_salary(job.salary_min, job.salary_max, &job.currency)) }
                dt { "Posted" }
                dd { (time_ago(job.posted_at, chrome.now)) }
                @if let Some(expires) = job.expires_at {
                    dt { "Apply by" } dd { (format_date(expires)) }
                }
            }
            @if !job.is_active {
                p.notice { "This position is no longer accepting applications." }
            }
            section.description { (paragraphs(&job.description)) }
            @if !job.tech_stack.is_empty() {
                section {
                    h2 { "Tech stack" }
                    div.badges {
                        @for tech in &job.tech_stack { span.badge.badge-outline { (tech) } }
                    }
                }
            }
            div.actions {
                @match (&job.application_link, job.is_active) {
                    (Some(link), true) => {
                        a.button.button-large href=(link) rel="noopener" target="_blank" { "Apply Now" }
                    }
                    (None, true) => {
                        a.button.button-large href=(Route::Login.href()) { "Sign in to apply" }
                    }
                    (_, false) => {}
                }
                a.button.button-ghost href=(Route::Jobs.href()) { "Back to jobs" }
            }
        }
    };
    page(
        chrome,
        &PageMeta::titled(format!("{title} at {}", job.company_name)),
        content,
    )
}

// ============================================================================
// Webinars
// ============================================================================

pub fn render_webinars(chrome: &Chrome, webinars: &Section<Webinar>) -> Markup {
    let content = html! {
        section.container {
            h1 { "Career Webinars" }
            p.lead { "Learn from industry experts and advance your career" }
            @match webinars {
                Section::Ready(all) => {
                    @let (recorded, scheduled): (Vec<&Webinar>, Vec<&Webinar>) =
                        all.iter().partition(|w| w.status == WebinarStatus::Recorded);
                    h2 { "Upcoming & Live" }
                    @if scheduled.is_empty() {
                        (empty_notice("No webinars are scheduled right now."))
                    } @else {
                        div.card-grid { @for w in &scheduled { (webinar_card(w)) } }
                    }
                    @if !recorded.is_empty() {
                        h2 { "Recordings" }
                        div.card-grid { @for w in &recorded { (webinar_card(w)) } }
                    }
                }
                Section::Unavailable => { (unavailable_notice("Webinars")) }
            }
        }
    };
    page(
        chrome,
        &PageMeta::titled("Webinars").describe("Expert-led career webinars, live and on demand."),
        content,
    )
}

pub fn render_webinar(chrome: &Chrome, webinar: &Webinar) -> Markup {
    let content = html! {
        article.container.detail.webinar-detail {
            @if let Some(thumbnail) = &webinar.thumbnail_url {
                img.detail-media src=(thumbnail) alt=(webinar.title);
            }
            h1 { (webinar.title) }
            p.card-meta.schedule { (format_webinar_date(webinar.webinar_date)) }
            @if let Some(minutes) = webinar.duration_minutes {
                p.card-meta { "Duration: " (minutes) " minutes" }
            }
            section.description { (paragraphs(&webinar.description)) }
            @if let Some(speaker) = &webinar.speaker_name {
                section.speaker {
                    h2 { "About the speaker" }
                    p.speaker-name { (speaker) }
                    @if let Some(bio) = &webinar.speaker_bio { p { (bio) } }
                }
            }
            div.actions {
                @match (webinar.status, &webinar.live_link, &webinar.replay_link) {
                    (WebinarStatus::Live, Some(link), _) => {
                        a.button.button-large href=(link) target="_blank" rel="noopener" { "Join Now" }
                    }
                    (WebinarStatus::Recorded, _, Some(link)) => {
                        a.button.button-large href=(link) target="_blank" rel="noopener" { "Watch Replay" }
                    }
                    (WebinarStatus::Recorded, _, None) => {
                        p.muted { "The recording will be available soon." }
                    }
                    _ => {
                        a.button.button-large href=(Route::Signup.href()) { "Register" }
                    }
                }
                a.button.button-ghost href=(Route::Webinars.href()) { "All webinars" }
            }
        }
    };
    page(chrome, &PageMeta::titled(webinar.title.clone()), content)
}

// ============================================================================
// Blog
// ============================================================================

pub fn render_blog(chrome: &Chrome, posts: &Section<BlogPost>) -> Markup {
    let content = html! {
        section.container {
            h1 { "Career Insights & Advice" }
            @match posts {
                Section::Ready(posts) if posts.is_empty() => {
                    (empty_notice("No articles have been published yet."))
                }
                Section::Ready(posts) => {
                    div.card-grid { @for post in posts { (post_card(post, chrome.now)) } }
                }
                Section::Unavailable => { (unavailable_notice("Articles")) }
            }
        }
    };
    page(
        chrome,
        &PageMeta::titled("Blog").describe("Career advice, interview tips and industry news."),
        content,
    )
}

pub fn render_post(chrome: &Chrome, post: &BlogPost) -> Markup {
    let mut meta = PageMeta::titled(post.seo_title.clone().unwrap_or_else(|| post.title.clone()));
    meta.description = post.seo_description.clone();

    let content = html! {
        article.container.detail.post-detail {
            @if let Some(thumbnail) = &post.thumbnail_url {
                img.detail-media src=(thumbnail) alt=(post.title);
            }
            span.badge.badge-outline { (post.category.label()) }
            h1 { (post.title) }
            p.muted { "Published " (format_date(post.published_at)) }
            div.prose { (render_markdown(&post.content)) }
            @if !post.tags.is_empty() {
                div.badges { @for tag in &post.tags { span.badge.badge-outline { (tag) } } }
            }
            a.button.button-ghost href=(Route::Blog.href()) { "All articles" }
        }
    };
    page(chrome, &meta, content)
}

// ============================================================================
// Services and search
// ============================================================================

pub fn render_services(chrome: &Chrome, services: &Section<Service>) -> Markup {
    let content = html! {
        section.container {
            h1 { "Career Services" }
            p.lead { "Resume reviews, mock interviews and coaching from working professionals." }
            @match services {
                Section::Ready(services) if services.is_empty() => {
                    (empty_notice("No services are offered at the moment."))
                }
                Section::Ready(services) => {
                    div.card-grid { @for service in services { (service_card(service)) } }
                }
                Section::Unavailable => { (unavailable_notice("Services")) }
            }
        }
    };
    page(chrome, &PageMeta::titled("Services"), content)
}

/// `results` is `None` when no query was given.
pub fn render_search(chrome: &Chrome, query: &str, results: Option<&Section<Job>>) -> Markup {
    let content = html! {
        section.container {
            @match results {
                None => {
                    h1 { "Search" }
                    p.lead { "Search jobs by title, company, skill or location using the box above." }
                }
                Some(Section::Ready(jobs)) => {
                    h1 { "Results for \u{201c}" (query) "\u{201d}" }
                    @if jobs.is_empty() {
                        (empty_notice("No jobs matched your search. Try fewer or different words."))
                    } @else {
                        p.result-count { (jobs.len()) " matching jobs" }
                        div.card-grid { @for job in jobs { (job_card(job, chrome.now)) } }
                    }
                }
                Some(Section::Unavailable) => {
                    h1 { "Results for \u{201c}" (query) "\u{201d}" }
                    (unavailable_notice("Search results"))
                }
            }
        }
    };
    let title = if query.is_empty() {
        "Search".to_string()
    } else {
        format!("Search: {query}")
    };
    page(chrome, &PageMeta::titled(title), content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SiteConfig;
    use crate::identity::SessionState;
    use crate::test_helpers::{chrome, job, post, webinar};

    fn with_chrome(path: &str, f: impl FnOnce(&Chrome) -> Markup) -> String {
        let config = SiteConfig::default();
        let session = SessionState::Anonymous;
        f(&chrome(&config, &session, path)).into_string()
    }

    #[test]
    fn markdown_renders_and_drops_raw_html() {
        let html = render_markdown("# Tips\n\nBe **bold**.\n\n<script>x()</script>\n").into_string();
        assert!(html.contains("<h1>Tips</h1>"));
        assert!(html.contains("<strong>bold</strong>"));
        assert!(!html.contains("<script>"));
    }

    #[test]
    fn jobs_page_keeps_selected_filters() {
        let filters = JobFilters {
            job_type: Some(JobType::Contract),
            location: Some("Berlin".into()),
            ..Default::default()
        };
        let html = with_chrome("/jobs", |c| {
            render_jobs(c, &filters, &Section::Ready(vec![job("a", 1, true)]))
        });
        assert!(html.contains(r#"<option value="contract" selected>Contract</option>"#));
        assert!(html.contains(r#"value="Berlin""#));
        assert!(html.contains("1 open positions"));
        assert!(html.contains("<title>Jobs | PrimoJobs</title>"));
    }

    #[test]
    fn jobs_page_unavailable_notice() {
        let html = with_chrome("/jobs", |c| {
            render_jobs(c, &JobFilters::default(), &Section::Unavailable)
        });
        assert!(html.contains("Job listings are unavailable right now."));
        assert!(!html.contains("job-card"));
    }

    #[test]
    fn job_detail_shows_apply_link_only_when_active() {
        let mut j = job("j1", 3, true);
        j.application_link = Some("https://acme.example.com/apply".into());
        let html = with_chrome("/jobs/j1", |c| render_job(c, &j));
        assert!(html.contains("Apply Now"));

        j.is_active = false;
        let html = with_chrome("/jobs/j1", |c| render_job(c, &j));
        assert!(!html.contains("Apply Now"));
        assert!(html.contains("no longer accepting applications"));
    }

    #[test]
    fn webinars_page_splits_recordings() {
        let all = vec![
            webinar("live", WebinarStatus::Live, 0),
            webinar("old", WebinarStatus::Recorded, -10),
        ];
        let html = with_chrome("/webinars", |c| render_webinars(c, &Section::Ready(all)));
        assert!(html.contains("Upcoming &amp; Live"));
        assert!(html.contains("Recordings"));
        assert_eq!(html.matches("webinar-card").count(), 2);
    }

    #[test]
    fn post_page_uses_seo_title() {
        let mut p = post("p1", "ten-tips", true, 1);
        p.seo_title = Some("Ten Interview Tips".into());
        p.content = "Intro *text*".into();
        let html = with_chrome("/blog/ten-tips", |c| render_post(c, &p));
        assert!(html.contains("<title>Ten Interview Tips | PrimoJobs</title>"));
        assert!(html.contains("<em>text</em>"));
    }

    #[test]
    fn blank_search_shows_prompt() {
        let html = with_chrome("/search", |c| render_search(c, "", None));
        assert!(html.contains("using the box above"));
        assert!(html.contains("<title>Search | PrimoJobs</title>"));
    }

    #[test]
    fn search_results_echo_query_escaped() {
        let html = with_chrome("/search", |c| {
            render_search(c, "<rust>", Some(&Section::Ready(vec![])))
        });
        assert!(html.contains("&lt;rust&gt;"));
        assert!(html.contains("No jobs matched your search"));
    }
}
