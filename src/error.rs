//! Errors that reach the process or HTTP boundary.

use crate::backend::FetchError;
use crate::config::ConfigError;
use crate::identity::AuthError;
use crate::views::errors::failure_document;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use thiserror::Error;
use tracing::error;

/// Anything that stops the server from starting.
#[derive(Error, Debug)]
pub enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("backend setup failed: {0}")]
    Backend(#[from] FetchError),
    #[error("identity provider setup failed: {0}")]
    Identity(#[from] AuthError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("seed file is not valid JSON: {0}")]
    Seed(#[from] serde_json::Error),
}

/// A request whose primary content could not be produced.
///
/// Section-level fetch failures never become an `AppError`; they only drop
/// their section. This is for pages whose main record is the thing that
/// failed to load.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("primary content unavailable: {0}")]
    Backend(#[from] FetchError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        error!(error = %self, "rendering failure page");
        let page = failure_document(
            "Something went wrong",
            "We couldn't load this page right now. Please try again in a moment.",
        );
        (StatusCode::INTERNAL_SERVER_ERROR, Html(page.into_string())).into_response()
    }
}
