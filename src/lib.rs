//! # PrimoJobs
//!
//! Server-rendered front end for a job portal: job listings, career
//! webinars, a blog, and paid career services. All data and authentication
//! live in a hosted backend; this crate is the presentation layer in front
//! of it.
//!
//! # Architecture: Fetch, Then Render
//!
//! Every request goes through the same two steps:
//!
//! ```text
//! 1. Fetch    handler  →  session + listings   (async, concurrent, fallible)
//! 2. Render   data     →  HTML                 (pure, infallible)
//! ```
//!
//! Handlers in [`server`] resolve the viewer and read listings through the
//! typed facade in [`backend::listings`], then pass plain records to
//! [`views`]. Views never perform I/O, so every page can be tested by
//! building records in memory and asserting on the markup.
//!
//! Failure is scoped to the smallest unit that can fail. A listing that
//! cannot be fetched drops its own section and nothing else. A viewer whose
//! session cannot be resolved is shown the anonymous header. Only a page
//! whose primary record failed to load renders the failure page.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`server`] | axum router, handlers, graceful shutdown, `render` support |
//! | [`context`] | [`context::AppContext`]: config plus backend and identity handles |
//! | [`backend`] | `Backend` trait, PostgREST and in-memory adapters, listing facade |
//! | [`identity`] | `IdentityProvider` trait, GoTrue and in-memory adapters, session and sign-out |
//! | [`views`] | Maud page templates and shared layout |
//! | [`routes`] | Path contract for every page and the search submission rule |
//! | [`types`] | Backend schema records, patches, enums, job filters |
//! | [`format`] | Salary, date, relative-time and slug helpers |
//! | [`config`] | `primojobs.toml` loading, merging, env overrides, validation, CSS variables |
//! | [`error`] | Startup and request-level errors |
//! | [`output`] | CLI report formatting for `check` and `routes` |
//!
//! # Design Decisions
//!
//! ## Maud Over Template Engines
//!
//! HTML is generated with [Maud](https://maud.lambda.xyz/). Templates are
//! Rust functions over typed records, checked at compile time, and every
//! interpolation is escaped, which matters when job titles and descriptions
//! come from employers.
//!
//! ## Traits at the Backend Seams
//!
//! Both external services sit behind a trait (`Backend`, `IdentityProvider`)
//! with a hosted adapter and an in-memory one. The in-memory adapters apply
//! the same filter, sort and limit semantics, so the whole portal runs
//! offline from a JSON seed and the integration tests drive the real router
//! over loopback with no outside services.
//!
//! ## No JavaScript Required
//!
//! The account menu is a `<details>` disclosure, sign-out is a form POST,
//! and the search box refuses blank input with a `pattern` attribute. Pages
//! work the same with scripts disabled.

pub mod backend;
pub mod config;
pub mod context;
pub mod error;
pub mod format;
pub mod identity;
pub mod output;
pub mod routes;
pub mod server;
pub mod types;
pub mod views;

#[cfg(test)]
pub(crate) mod test_helpers;
