//! Employer and static content pages.
//!
//! Long-form copy is kept as markdown and rendered through the same
//! pipeline as blog posts.

use super::layout::page;
use super::listings::render_markdown;
use super::{Chrome, PageMeta};
use crate::routes::Route;
use maud::{Markup, html};

struct Plan {
    name: &'static str,
    price: &'static str,
    period: &'static str,
    features: &'static [&'static str],
    featured: bool,
}

const PLANS: &[Plan] = &[
    Plan {
        name: "Starter",
        price: "$99",
        period: "per posting",
        features: &["30-day listing", "Standard placement", "Applicant tracking"],
        featured: false,
    },
    Plan {
        name: "Growth",
        price: "$299",
        period: "per month",
        features: &[
            "5 active listings",
            "Featured placement",
            "Company profile page",
            "Email support",
        ],
        featured: true,
    },
    Plan {
        name: "Enterprise",
        price: "Custom",
        period: "annual contract",
        features: &[
            "Unlimited listings",
            "Sponsored webinars",
            "Dedicated account manager",
        ],
        featured: false,
    },
];

const FAQ: &[(&str, &str)] = &[
    (
        "How do I apply for a job?",
        "Open the posting and use the Apply Now button. Some employers collect applications on their own site.",
    ),
    (
        "Are webinars free?",
        "Yes. Register for upcoming sessions from the webinar page; recordings are available afterwards.",
    ),
    (
        "How do I track my applications?",
        "Sign in and open My Applications from the account menu.",
    ),
    (
        "How do I post a job?",
        "Employers can publish listings from the Post a Job page. See Pricing for plans.",
    ),
];

const PRIVACY_MD: &str = "\
## What we collect

Account details you provide (name, email), the jobs you apply to and the
webinars you register for.

## How we use it

To run your account, show your applications and registrations, and send the
notifications you ask for. We do not sell personal data.

## Your choices

You can update your profile at any time and request deletion of your account
by contacting support.
";

const TERMS_MD: &str = "\
## Using the service

You agree to provide accurate information and to use the portal only for
lawful job searching, hiring and learning.

## Listings

Employers are responsible for the accuracy of their postings. We may remove
listings that are misleading or violate these terms.

## Liability

The service is provided as is. We are not a party to any employment
agreement made through the portal.
";

pub fn render_post_job(chrome: &Chrome) -> Markup {
    let content = html! {
        section.container.narrow {
            h1 { "Post a Job" }
            p.lead { "Reach thousands of qualified candidates in minutes." }
            ol.steps {
                li { "Create an employer account." }
                li { "Describe the role, salary range and tech stack." }
                li { "Publish and track applicants from your dashboard." }
            }
            div.actions {
                a.button.button-large href=(Route::Signup.href()) { "Get Started" }
                a.button.button-large.button-outline href=(Route::Pricing.href()) { "See Pricing" }
            }
        }
    };
    page(
        chrome,
        &PageMeta::titled("Post a Job").describe("Hire top talent with a job listing."),
        content,
    )
}

pub fn render_pricing(chrome: &Chrome) -> Markup {
    let content = html! {
        section.container {
            h1 { "Pricing" }
            p.lead { "Simple plans for teams of every size." }
            div.card-grid.pricing {
                @for plan in PLANS {
                    article.card.plan-card.featured[plan.featured] {
                        h3.card-title { (plan.name) }
                        p.price { (plan.price) span.muted { " " (plan.period) } }
                        ul {
                            @for feature in plan.features { li { (feature) } }
                        }
                        a.button.button-block href=(Route::Contact.href()) { "Choose " (plan.name) }
                    }
                }
            }
        }
    };
    page(chrome, &PageMeta::titled("Pricing"), content)
}

pub fn render_contact(chrome: &Chrome) -> Markup {
    let content = html! {
        section.container.narrow {
            h1 { "Contact Sales" }
            p.lead { "Tell us about your hiring needs and we'll be in touch within one business day." }
            dl.facts {
                dt { "Email" } dd { a href="mailto:sales@primojobs.com" { "sales@primojobs.com" } }
                dt { "Hours" } dd { "Monday to Friday, 9am to 6pm" }
            }
        }
    };
    page(chrome, &PageMeta::titled("Contact Sales"), content)
}

pub fn render_help(chrome: &Chrome) -> Markup {
    let content = html! {
        section.container.narrow {
            h1 { "Help Center" }
            @for (question, answer) in FAQ {
                details.faq {
                    summary { (question) }
                    p { (answer) }
                }
            }
        }
    };
    page(chrome, &PageMeta::titled("Help Center"), content)
}

fn legal_page(chrome: &Chrome, title: &str, body: &str) -> Markup {
    let content = html! {
        article.container.narrow.prose {
            h1 { (title) }
            (render_markdown(body))
        }
    };
    page(chrome, &PageMeta::titled(title), content)
}

pub fn render_privacy(chrome: &Chrome) -> Markup {
    legal_page(chrome, "Privacy Policy", PRIVACY_MD)
}

pub fn render_terms(chrome: &Chrome) -> Markup {
    legal_page(chrome, "Terms of Service", TERMS_MD)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SiteConfig;
    use crate::identity::SessionState;
    use crate::test_helpers::chrome;

    #[test]
    fn pricing_marks_featured_plan() {
        let config = SiteConfig::default();
        let session = SessionState::Anonymous;
        let html = render_pricing(&chrome(&config, &session, "/employer/pricing")).into_string();
        assert_eq!(html.matches("plan-card").count(), PLANS.len());
        assert_eq!(html.matches("featured").count(), 1);
    }

    #[test]
    fn legal_pages_render_markdown_sections() {
        let config = SiteConfig::default();
        let session = SessionState::Anonymous;
        let html = render_terms(&chrome(&config, &session, "/terms")).into_string();
        assert!(html.contains("<h2>Listings</h2>"));
        assert!(html.contains("<title>Terms of Service | PrimoJobs</title>"));
    }
}
