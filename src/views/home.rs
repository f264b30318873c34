//! Landing page.
//!
//! Hero, stat tiles, the three fetched sections, then the closing call to
//! action. Each fetched section is independent: an unavailable one is left
//! out entirely, an empty one renders its heading with an empty grid.

use super::cards::{job_card, post_card, webinar_card};
use super::layout::page;
use super::{Chrome, PageMeta, Section};
use crate::routes::Route;
use crate::types::{BlogPost, Job, Webinar};
use maud::{Markup, html};

pub struct HomeData {
    pub jobs: Section<Job>,
    pub webinars: Section<Webinar>,
    pub posts: Section<BlogPost>,
}

pub fn render_home(chrome: &Chrome, data: &HomeData) -> Markup {
    let site = &chrome.config.site;
    let content = html! {
        section.hero {
            div.container.narrow {
                h1 { "Find Your Dream Job with " span.accent { (site.name) } }
                p.lead {
                    "Discover thousands of opportunities, join expert-led webinars, and accelerate your career growth"
                }
                div.actions {
                    a.button.button-large href=(Route::Jobs.href()) { "Browse Jobs" }
                    a.button.button-large.button-outline href=(Route::Webinars.href()) { "View Webinars" }
                }
            }
        }

        section.stats {
            div.container.stat-grid {
                @for tile in &chrome.config.stats {
                    div.stat {
                        div.stat-value { (tile.value) }
                        div.stat-label { (tile.label) }
                    }
                }
            }
        }

        @if let Section::Ready(jobs) = &data.jobs {
            (listing_section(
                "latest-jobs",
                "Latest Job Opportunities",
                "Discover your next career move from top companies",
                html! { @for job in jobs { (job_card(job, chrome.now)) } },
                ("View All Jobs", Route::Jobs),
            ))
        }

        @if let Section::Ready(webinars) = &data.webinars {
            (listing_section(
                "upcoming-webinars",
                "Upcoming Career Webinars",
                "Learn from industry experts and advance your career",
                html! { @for webinar in webinars { (webinar_card(webinar)) } },
                ("View All Webinars", Route::Webinars),
            ))
        }

        @if let Section::Ready(posts) = &data.posts {
            (listing_section(
                "recent-posts",
                "Career Insights & Advice",
                "Stay updated with the latest industry trends and career tips",
                html! { @for post in posts { (post_card(post, chrome.now)) } },
                ("Read All Posts", Route::Blog),
            ))
        }

        section.cta {
            div.container.narrow {
                h2 { "Ready to Start Your Career Journey?" }
                p.lead {
                    "Join thousands of professionals who have found their dream jobs through " (site.name)
                }
                div.actions {
                    a.button.button-large.button-inverse href=(Route::Signup.href()) { "Create Account" }
                    a.button.button-large.button-outline href=(Route::Jobs.href()) { "Browse Jobs" }
                }
            }
        }
    };

    page(chrome, &PageMeta::default(), content)
}

fn listing_section(
    id: &str,
    heading: &str,
    blurb: &str,
    cards: Markup,
    more: (&str, Route),
) -> Markup {
    html! {
        section.listing id=(id) {
            div.container {
                div.section-heading {
                    h2 { (heading) }
                    p.lead { (blurb) }
                }
                div.card-grid { (cards) }
                div.section-more {
                    a.button.button-outline href=(more.1.href()) { (more.0) }
                }
            }
        }
    }
}
