//! Site header: primary links, the search box, and the identity region.
//!
//! The identity region renders exactly one branch per viewer: the account
//! menu for an authenticated session, login and signup actions otherwise.
//! The menu is a `<details>` disclosure so it works without scripts.

use super::Chrome;
use crate::format::initials;
use crate::identity::{MenuState, SessionState, Viewer};
use crate::routes::Route;
use maud::{Markup, html};

const NAV_LINKS: &[(&str, Route)] = &[
    ("Jobs", Route::Jobs),
    ("Webinars", Route::Webinars),
    ("Blog", Route::Blog),
    ("Services", Route::Services),
];

/// Menu entries in display order.
const MENU_LINKS: &[(&str, Route)] = &[
    ("Dashboard", Route::Dashboard),
    ("My Applications", Route::DashboardApplications),
    ("My Webinars", Route::DashboardWebinars),
    ("Settings", Route::DashboardProfile),
];

pub fn site_header(chrome: &Chrome) -> Markup {
    html! {
        header.site-header {
            a.brand href=(Route::Home.href()) {
                span.brand-mark aria-hidden="true" { "◆" }
                span.brand-name { (chrome.config.site.name) }
            }
            nav.site-nav {
                @for (label, route) in NAV_LINKS {
                    @let href = route.href();
                    @let current = is_current(chrome.current, &href);
                    a href=(href) class=[current.then_some("current")] { (label) }
                }
            }
            div.header-tools {
                (search_form(chrome.search))
                (identity_region(chrome.session, &chrome.menu))
            }
        }
    }
}

fn is_current(path: &str, href: &str) -> bool {
    path == href || path.starts_with(&format!("{href}/"))
}

/// Header search box. Submits `GET /search?query=...`; the browser refuses
/// blank or whitespace-only input, so an empty submit goes nowhere.
pub fn search_form(pending: &str) -> Markup {
    html! {
        form.search-form action="/search" method="get" role="search" {
            input type="search" name="query" value=(pending)
                placeholder="Search jobs, companies, or skills..."
                aria-label="Search" required pattern=".*\\S.*";
            button.button.button-small type="submit" { "Search" }
        }
    }
}

pub fn identity_region(session: &SessionState, menu: &MenuState) -> Markup {
    match session {
        SessionState::Authenticated(viewer) => user_menu(viewer, menu),
        SessionState::Anonymous => html! {
            div.auth-actions {
                a.button.button-ghost href=(Route::Login.href()) { "Login" }
                a.button href=(Route::Signup.href()) { "Sign Up" }
            }
        },
    }
}

fn avatar(viewer: &Viewer) -> Markup {
    html! {
        @if let Some(url) = &viewer.avatar_url {
            img.avatar src=(url) alt=(viewer.email);
        } @else {
            span.avatar.avatar-fallback { (initials(&viewer.email)) }
        }
    }
}

fn user_menu(viewer: &Viewer, menu: &MenuState) -> Markup {
    // Keep the menu open while signing out or after a failure so the state
    // is visible.
    let open = matches!(menu, MenuState::SigningOut | MenuState::Failed(_));
    html! {
        details.user-menu open[open] {
            summary.avatar-trigger aria-label="Account menu" { (avatar(viewer)) }
            div.menu-panel {
                div.menu-label {
                    p.menu-name { (viewer.label()) }
                    p.menu-email { (viewer.email) }
                }
                hr;
                ul.menu-links {
                    @for (label, route) in MENU_LINKS {
                        li { a href=(route.href()) { (label) } }
                    }
                }
                hr;
                (sign_out_control(menu))
            }
        }
    }
}

/// The sign-out button for each menu state.
pub fn sign_out_control(menu: &MenuState) -> Markup {
    html! {
        form.sign-out method="post" action=(Route::SignOut.href()) {
            @match menu {
                MenuState::SigningOut => {
                    button.menu-signout type="submit" disabled aria-busy="true" { "Signing out..." }
                }
                MenuState::Failed(_) => {
                    p.menu-error role="alert" { "Sign out failed." }
                    button.menu-signout type="submit" { "Try again" }
                }
                MenuState::Idle | MenuState::Resolved => {
                    button.menu-signout type="submit" { "Sign out" }
                }
            }
        }
    }
}
