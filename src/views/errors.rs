//! Not-found and failure pages.

use super::layout::{STYLESHEET_HREF, page};
use super::{Chrome, PageMeta};
use crate::routes::Route;
use maud::{DOCTYPE, Markup, html};

/// Unknown path or missing record. Rendered inside the full layout.
pub fn render_not_found(chrome: &Chrome) -> Markup {
    let content = html! {
        section.container.narrow.error-page {
            p.error-code { "404" }
            h1 { "Page Not Found" }
            p.lead { "The page you're looking for doesn't exist or has been moved." }
            div.actions {
                a.button href=(Route::Home.href()) { "Go Home" }
                a.button.button-ghost href=(Route::Jobs.href()) { "Browse Jobs" }
            }
        }
    };
    page(chrome, &PageMeta::titled("Page Not Found"), content)
}

/// Standalone failure document.
///
/// Used when the page's own data could not be loaded, so it depends on
/// nothing but the stylesheet: no config, no session, no header.
pub fn failure_document(title: &str, message: &str) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (title) }
                link rel="stylesheet" href=(STYLESHEET_HREF);
            }
            body {
                main.container.narrow.error-page {
                    p.error-code { "500" }
                    h1 { (title) }
                    p.lead { (message) }
                    a.button href=(Route::Home.href()) { "Go Home" }
                }
            }
        }
    }
}
