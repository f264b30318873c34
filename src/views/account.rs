//! Sign-in forms and the signed-in dashboard.
//!
//! Credentials are exchanged with the hosted identity provider, not here:
//! the forms render, and a submission back to this server only explains
//! that. Dashboard pages assume the handler already checked the session.

use super::layout::page;
use super::{Chrome, PageMeta, Section};
use crate::format::{format_date, time_ago};
use crate::identity::Viewer;
use crate::routes::Route;
use crate::types::{JobApplication, Profile, WebinarRegistration};
use maud::{Markup, html};

/// Which auth form to show.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthForm {
    Login,
    Signup,
}

impl AuthForm {
    fn title(self) -> &'static str {
        match self {
            AuthForm::Login => "Login",
            AuthForm::Signup => "Sign Up",
        }
    }

    fn route(self) -> Route {
        match self {
            AuthForm::Login => Route::Login,
            AuthForm::Signup => Route::Signup,
        }
    }
}

/// `notice` is shown above the form, e.g. after a submission.
pub fn render_auth_form(chrome: &Chrome, form: AuthForm, notice: Option<&str>) -> Markup {
    let content = html! {
        section.container.narrow.auth-page {
            @match form {
                AuthForm::Login => {
                    h1 { "Welcome back" }
                    p.lead { "Sign in to track applications and webinar registrations." }
                }
                AuthForm::Signup => {
                    h1 { "Create your account" }
                    p.lead { "Join " (chrome.config.site.name) " and start applying today." }
                }
            }
            @if let Some(notice) = notice {
                p.notice role="status" { (notice) }
            }
            form.auth-form method="post" action=(form.route().href()) {
                @if form == AuthForm::Signup {
                    label {
                        span { "Full name" }
                        input type="text" name="full_name" autocomplete="name";
                    }
                }
                label {
                    span { "Email" }
                    input type="email" name="email" required autocomplete="email";
                }
                label {
                    span { "Password" }
                    input type="password" name="password" required minlength="8"
                        autocomplete=(if form == AuthForm::Login { "current-password" } else { "new-password" });
                }
                button.button.button-block type="submit" { (form.title()) }
            }
            @match form {
                AuthForm::Login => {
                    p.muted { "New here? " a href=(Route::Signup.href()) { "Create an account" } }
                }
                AuthForm::Signup => {
                    p.muted { "Already have an account? " a href=(Route::Login.href()) { "Login" } }
                }
            }
        }
    };
    page(chrome, &PageMeta::titled(form.title()), content)
}

// ============================================================================
// Dashboard
// ============================================================================

/// Rows shown on the dashboard overview.
pub struct DashboardData {
    pub profile: Option<Profile>,
    pub applications: Section<JobApplication>,
    pub registrations: Section<WebinarRegistration>,
}

fn dashboard_nav(current: &str) -> Markup {
    let links = [
        ("Overview", Route::Dashboard),
        ("Applications", Route::DashboardApplications),
        ("Webinars", Route::DashboardWebinars),
        ("Settings", Route::DashboardProfile),
    ];
    html! {
        nav.dashboard-nav {
            @for (label, route) in links {
                @let href = route.href();
                a href=(href) class=[(href == current).then_some("current")] { (label) }
            }
        }
    }
}

fn count<T>(section: &Section<T>) -> String {
    match section {
        Section::Ready(rows) => rows.len().to_string(),
        Section::Unavailable => "–".to_string(),
    }
}

fn display_name<'a>(viewer: &'a Viewer, profile: Option<&'a Profile>) -> &'a str {
    profile
        .and_then(|p| p.full_name.as_deref())
        .filter(|name| !name.trim().is_empty())
        .unwrap_or_else(|| viewer.label())
}

pub fn render_dashboard(chrome: &Chrome, viewer: &Viewer, data: &DashboardData) -> Markup {
    let content = html! {
        section.container.dashboard {
            (dashboard_nav(chrome.current))
            h1 { "Welcome, " (display_name(viewer, data.profile.as_ref())) }
            div.stat-grid {
                a.stat href=(Route::DashboardApplications.href()) {
                    div.stat-value { (count(&data.applications)) }
                    div.stat-label { "Applications" }
                }
                a.stat href=(Route::DashboardWebinars.href()) {
                    div.stat-value { (count(&data.registrations)) }
                    div.stat-label { "Webinar registrations" }
                }
            }
            div.actions {
                a.button href=(Route::Jobs.href()) { "Find Jobs" }
                a.button.button-outline href=(Route::Webinars.href()) { "Browse Webinars" }
            }
        }
    };
    page(chrome, &PageMeta::titled("Dashboard"), content)
}

pub fn render_applications(chrome: &Chrome, applications: &Section<JobApplication>) -> Markup {
    let content = html! {
        section.container.dashboard {
            (dashboard_nav(chrome.current))
            h1 { "My Applications" }
            @match applications {
                Section::Ready(rows) if rows.is_empty() => {
                    p.empty-state {
                        "You haven't applied to any jobs yet. "
                        a href=(Route::Jobs.href()) { "Browse open positions" }
                    }
                }
                Section::Ready(rows) => {
                    table.records {
                        thead { tr { th { "Job" } th { "Applied" } th { "Status" } } }
                        tbody {
                            @for application in rows {
                                tr {
                                    td { a href=(Route::Job(application.job_id.clone()).href()) { "View posting" } }
                                    td { (time_ago(application.applied_at, chrome.now)) }
                                    td { span.badge.badge-outline { (application.status) } }
                                }
                            }
                        }
                    }
                }
                Section::Unavailable => {
                    p.notice { "Your applications are unavailable right now. Please try again shortly." }
                }
            }
        }
    };
    page(chrome, &PageMeta::titled("My Applications"), content)
}

pub fn render_registrations(
    chrome: &Chrome,
    registrations: &Section<WebinarRegistration>,
) -> Markup {
    let content = html! {
        section.container.dashboard {
            (dashboard_nav(chrome.current))
            h1 { "My Webinars" }
            @match registrations {
                Section::Ready(rows) if rows.is_empty() => {
                    p.empty-state {
                        "You haven't registered for any webinars. "
                        a href=(Route::Webinars.href()) { "See what's coming up" }
                    }
                }
                Section::Ready(rows) => {
                    ul.record-list {
                        @for registration in rows {
                            li {
                                a href=(Route::Webinar(registration.webinar_id.clone()).href()) { "View webinar" }
                                span.muted { " registered " (format_date(registration.registered_at)) }
                            }
                        }
                    }
                }
                Section::Unavailable => {
                    p.notice { "Your registrations are unavailable right now. Please try again shortly." }
                }
            }
        }
    };
    page(chrome, &PageMeta::titled("My Webinars"), content)
}

pub fn render_profile(chrome: &Chrome, viewer: &Viewer, profile: Option<&Profile>) -> Markup {
    let content = html! {
        section.container.dashboard {
            (dashboard_nav(chrome.current))
            h1 { "Settings" }
            dl.facts {
                dt { "Name" } dd { (display_name(viewer, profile)) }
                dt { "Email" } dd { (viewer.email) }
                @if let Some(profile) = profile {
                    dt { "Account type" } dd { (profile.role.label()) }
                    dt { "Member since" } dd { (format_date(profile.created_at)) }
                }
            }
            p.muted { "Profile changes are made through your account provider." }
        }
    };
    page(chrome, &PageMeta::titled("Settings"), content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SiteConfig;
    use crate::identity::SessionState;
    use crate::test_helpers::{chrome, now, viewer};

    fn render_as(path: &str, f: impl FnOnce(&Chrome, &Viewer) -> Markup) -> String {
        let config = SiteConfig::default();
        let v = viewer("u1", "jane@example.com");
        let session = SessionState::Authenticated(v.clone());
        f(&chrome(&config, &session, path), &v).into_string()
    }

    #[test]
    fn login_and_signup_forms_differ() {
        let config = SiteConfig::default();
        let session = SessionState::Anonymous;
        let c = chrome(&config, &session, "/auth/login");

        let login = render_auth_form(&c, AuthForm::Login, None).into_string();
        assert!(login.contains(r#"action="/auth/login""#));
        assert!(!login.contains("full_name"));
        assert!(login.contains("<title>Login | PrimoJobs</title>"));

        let signup = render_auth_form(&c, AuthForm::Signup, Some("Check your inbox")).into_string();
        assert!(signup.contains("full_name"));
        assert!(signup.contains("Check your inbox"));
    }

    #[test]
    fn dashboard_counts_and_unavailable_dash() {
        let html = render_as("/dashboard", |c, v| {
            render_dashboard(
                c,
                v,
                &DashboardData {
                    profile: None,
                    applications: Section::Ready(vec![JobApplication {
                        id: "a1".into(),
                        job_id: "j1".into(),
                        user_id: "u1".into(),
                        applied_at: now(),
                        status: "pending".into(),
                    }]),
                    registrations: Section::Unavailable,
                },
            )
        });
        assert!(html.contains("Welcome, User"));
        assert!(html.contains(r#"<div class="stat-value">1</div>"#));
        assert!(html.contains(r#"<div class="stat-value">–</div>"#));
        assert!(html.contains(r#"<a href="/dashboard" class="current">Overview</a>"#));
    }

    #[test]
    fn empty_applications_invite_browsing() {
        let html = render_as("/dashboard/applications", |c, _| {
            render_applications(c, &Section::Ready(vec![]))
        });
        assert!(html.contains("haven't applied"));
    }

    #[test]
    fn registrations_link_to_webinars() {
        let html = render_as("/dashboard/webinars", |c, _| {
            render_registrations(
                c,
                &Section::Ready(vec![WebinarRegistration {
                    id: "r1".into(),
                    webinar_id: "w9".into(),
                    user_id: "u1".into(),
                    registered_at: now(),
                }]),
            )
        });
        assert!(html.contains(r#"href="/webinars/w9""#));
        assert!(html.contains("June 15, 2025"));
    }
}
