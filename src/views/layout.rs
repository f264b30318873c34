//! Document shell shared by every page.

use super::nav::site_header;
use super::{Chrome, PageMeta};
use crate::config::{self, SiteConfig};
use crate::routes::Route;
use chrono::Datelike;
use maud::{DOCTYPE, Markup, html};

const CSS_STATIC: &str = include_str!("../../static/style.css");

/// Stylesheet link, versioned per build so deploys bust browser caches.
pub const STYLESHEET_HREF: &str = concat!("/static/style.css?v=", env!("ASSET_VERSION"));

/// Full stylesheet: color variables from config, then the static rules.
pub fn stylesheet(config: &SiteConfig) -> String {
    format!("{}\n\n{}", config::generate_color_css(&config.colors), CSS_STATIC)
}

/// `"{page} | {site}"`, or `"{site} - {tagline}"` for the home page.
pub fn document_title(site: &SiteConfig, meta: &PageMeta) -> String {
    match &meta.title {
        Some(title) => format!("{title} | {}", site.site.name),
        None => format!("{} - {}", site.site.name, site.site.tagline),
    }
}

/// Wrap page content in the document, header and footer.
pub fn page(chrome: &Chrome, meta: &PageMeta, content: Markup) -> Markup {
    let site = &chrome.config.site;
    let title = document_title(chrome.config, meta);
    let description = meta.description.as_deref().unwrap_or(&site.description);
    let og_url = format!("{}{}", site.url.trim_end_matches('/'), chrome.current);

    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (title) }
                meta name="description" content=(description);
                meta property="og:type" content="website";
                meta property="og:locale" content="en_US";
                meta property="og:site_name" content=(site.name);
                meta property="og:title" content=(title);
                meta property="og:description" content=(description);
                meta property="og:url" content=(og_url);
                link rel="stylesheet" href=(STYLESHEET_HREF);
            }
            body {
                div.page {
                    (site_header(chrome))
                    main.page-main {
                        (content)
                    }
                    (site_footer(chrome.config, chrome.now.year()))
                }
            }
        }
    }
}

struct LinkGroup {
    heading: &'static str,
    links: &'static [(&'static str, Route)],
}

const FOOTER_GROUPS: &[LinkGroup] = &[
    LinkGroup {
        heading: "For Job Seekers",
        links: &[
            ("Browse Jobs", Route::Jobs),
            ("Career Webinars", Route::Webinars),
            ("Career Services", Route::Services),
        ],
    },
    LinkGroup {
        heading: "For Employers",
        links: &[
            ("Post a Job", Route::PostJob),
            ("Pricing", Route::Pricing),
            ("Contact Sales", Route::Contact),
        ],
    },
    LinkGroup {
        heading: "Resources",
        links: &[
            ("Blog", Route::Blog),
            ("Help Center", Route::Help),
            ("Privacy Policy", Route::Privacy),
            ("Terms of Service", Route::Terms),
        ],
    },
];

fn site_footer(config: &SiteConfig, year: i32) -> Markup {
    html! {
        footer.site-footer {
            div.footer-grid {
                div.footer-brand {
                    span.brand-name { (config.site.name) }
                    p.muted { "Your premier job portal for career growth and opportunities." }
                }
                @for group in FOOTER_GROUPS {
                    div.footer-group {
                        h4 { (group.heading) }
                        nav {
                            @for (label, route) in group.links {
                                a href=(route.href()) { (label) }
                            }
                        }
                    }
                }
            }
            p.footer-copyright {
                "© " (year) " " (config.site.name) ". All rights reserved."
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::SessionState;
    use crate::test_helpers::chrome;

    #[test]
    fn titles_use_site_template() {
        let config = SiteConfig::default();
        assert_eq!(
            document_title(&config, &PageMeta::titled("Jobs")),
            "Jobs | PrimoJobs"
        );
        assert_eq!(
            document_title(&config, &PageMeta::default()),
            "PrimoJobs - Premier Job Portal for Career Growth"
        );
    }

    #[test]
    fn document_has_doctype_meta_and_footer() {
        let config = SiteConfig::default();
        let session = SessionState::Anonymous;
        let html = page(
            &chrome(&config, &session, "/jobs"),
            &PageMeta::titled("Jobs").describe("All open roles"),
            html! { p { "body" } },
        )
        .into_string();

        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<title>Jobs | PrimoJobs</title>"));
        assert!(html.contains(r#"content="All open roles""#));
        assert!(html.contains(r#"content="https://primojobs.com/jobs""#));
        assert!(html.contains("© 2025 PrimoJobs. All rights reserved."));
        assert!(html.contains(r#"href="/employer/post-job""#));
    }

    #[test]
    fn stylesheet_starts_with_color_variables() {
        let css = stylesheet(&SiteConfig::default());
        assert!(css.starts_with(":root"));
        assert!(css.contains("--color-primary: #2563eb"));
    }
}
