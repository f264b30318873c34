//! HTTP surface: the router, one handler per route, and serving.
//!
//! Handlers do all the I/O for a page, then hand plain data to
//! [`crate::views`]. Independent reads for one page (the viewer's session and
//! each listing) run concurrently with `tokio::join!`. A failed listing only
//! drops its section; a failed primary record becomes an [`AppError`].

use crate::backend::listings;
use crate::context::AppContext;
use crate::error::AppError;
use crate::identity::{Credential, MenuState, SessionState, SignOutError, Viewer};
use crate::routes::{Route, submit_search};
use crate::types::JobFilters;
use crate::views::account::{self, AuthForm, DashboardData};
use crate::views::errors::render_not_found;
use crate::views::home::{HomeData, render_home};
use crate::views::layout::stylesheet;
use crate::views::{Chrome, Section, info, listings as pages};
use axum::extract::rejection::QueryRejection;
use axum::extract::{Path, Query, State};
use axum::http::header::{CACHE_CONTROL, CONTENT_TYPE, SET_COOKIE};
use axum::http::{HeaderMap, StatusCode, Uri};
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::Router;
use axum::routing::{get, post};
use chrono::Utc;
use maud::Markup;
use serde::Deserialize;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

/// The full application router.
pub fn router(ctx: AppContext) -> Router {
    Router::new()
        .route("/", get(home))
        .route("/jobs", get(jobs))
        .route("/jobs/{id}", get(job_detail))
        .route("/webinars", get(webinars))
        .route("/webinars/{id}", get(webinar_detail))
        .route("/blog", get(blog))
        .route("/blog/{slug}", get(blog_post))
        .route("/services", get(services))
        .route("/search", get(search))
        .route("/auth/login", get(login).post(login_submitted))
        .route("/auth/signup", get(signup).post(signup_submitted))
        .route("/auth/signout", post(sign_out))
        .route("/dashboard", get(dashboard))
        .route("/dashboard/applications", get(dashboard_applications))
        .route("/dashboard/webinars", get(dashboard_webinars))
        .route("/dashboard/profile", get(dashboard_profile))
        .route("/employer/post-job", get(post_job))
        .route("/employer/pricing", get(pricing))
        .route("/employer/contact", get(contact))
        .route("/help", get(help))
        .route("/privacy", get(privacy))
        .route("/terms", get(terms))
        .route("/static/style.css", get(style))
        .fallback(not_found)
        .layer(TraceLayer::new_for_http())
        .with_state(ctx)
}

/// Bind and serve until Ctrl+C or SIGTERM.
pub async fn serve(ctx: AppContext) -> std::io::Result<()> {
    let address = ctx.config.bind_address();
    info!("Binding to {address}");
    let listener = TcpListener::bind(&address).await?;
    info!("Server running on http://{}", listener.local_addr()?);

    axum::serve(listener, router(ctx))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shut down");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!(error = %e, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
        info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                warn!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

/// Fetch one path through the real router on a loopback port.
///
/// Returns the status code and body. Used by the `render` command so that
/// what it prints is exactly what a browser would get.
pub async fn render_path(
    ctx: AppContext,
    path: &str,
    token: Option<&str>,
) -> Result<(u16, String), RenderError> {
    let listener = TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0))).await?;
    let address = listener.local_addr()?;
    let cookie = ctx.config.session.cookie.clone();
    let server = tokio::spawn(async move { axum::serve(listener, router(ctx)).await });

    let path = if path.starts_with('/') {
        path.to_string()
    } else {
        format!("/{path}")
    };
    let client = reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .build()?;
    let mut request = client.get(format!("http://{address}{path}"));
    if let Some(token) = token {
        request = request.header(reqwest::header::COOKIE, format!("{cookie}={token}"));
    }
    let result = async {
        let response = request.send().await?;
        let status = response.status().as_u16();
        Ok::<_, reqwest::Error>((status, response.text().await?))
    }
    .await;

    server.abort();
    Ok(result?)
}

#[derive(thiserror::Error, Debug)]
pub enum RenderError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
}

// ============================================================================
// Per-request viewer
// ============================================================================

/// Everything about the requester a page needs for its chrome.
struct Visit {
    path: String,
    session: SessionState,
    menu: MenuState,
}

impl Visit {
    fn new(
        ctx: &AppContext,
        uri: &Uri,
        credential: Option<&Credential>,
        session: SessionState,
    ) -> Self {
        let menu = credential.map_or(MenuState::Idle, |c| ctx.sign_outs.state(c));
        Self {
            path: uri.path().to_string(),
            session,
            menu,
        }
    }

    /// Resolve the session on its own, for pages with nothing else to fetch.
    async fn resolve(ctx: &AppContext, uri: &Uri, headers: &HeaderMap) -> Self {
        let credential = ctx.credential(headers);
        let session = ctx.session(credential.as_ref()).await;
        Self::new(ctx, uri, credential.as_ref(), session)
    }

    fn chrome<'a>(&'a self, ctx: &'a AppContext, search: &'a str) -> Chrome<'a> {
        Chrome {
            config: &ctx.config,
            session: &self.session,
            menu: self.menu.clone(),
            current: &self.path,
            search,
            now: Utc::now(),
        }
    }
}

fn html(markup: Markup) -> Response {
    Html(markup.into_string()).into_response()
}

fn not_found_page(chrome: &Chrome) -> Response {
    (StatusCode::NOT_FOUND, Html(render_not_found(chrome).into_string())).into_response()
}

// ============================================================================
// Home and listings
// ============================================================================

async fn home(State(ctx): State<AppContext>, uri: Uri, headers: HeaderMap) -> Response {
    let credential = ctx.credential(&headers);
    let backend = ctx.backend.as_ref();
    let (session, jobs, webinars, posts) = tokio::join!(
        ctx.session(credential.as_ref()),
        listings::latest_jobs(backend),
        listings::upcoming_webinars(backend),
        listings::recent_posts(backend),
    );
    let visit = Visit::new(&ctx, &uri, credential.as_ref(), session);
    let data = HomeData {
        jobs: Section::from_fetch("latest_jobs", jobs),
        webinars: Section::from_fetch("upcoming_webinars", webinars),
        posts: Section::from_fetch("recent_posts", posts),
    };
    html(render_home(&visit.chrome(&ctx, ""), &data))
}

async fn jobs(
    State(ctx): State<AppContext>,
    uri: Uri,
    headers: HeaderMap,
    filters: Result<Query<JobFilters>, QueryRejection>,
) -> Response {
    let filters = match filters {
        Ok(Query(filters)) => filters,
        Err(e) => {
            warn!(error = %e, "ignoring malformed job filters");
            JobFilters::default()
        }
    };
    let credential = ctx.credential(&headers);
    let (session, found) = tokio::join!(
        ctx.session(credential.as_ref()),
        listings::jobs_matching(ctx.backend.as_ref(), &filters),
    );
    let visit = Visit::new(&ctx, &uri, credential.as_ref(), session);
    let found = Section::from_fetch("jobs", found);
    html(pages::render_jobs(&visit.chrome(&ctx, ""), &filters, &found))
}

async fn job_detail(
    State(ctx): State<AppContext>,
    Path(id): Path<String>,
    uri: Uri,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    let credential = ctx.credential(&headers);
    let (session, job) = tokio::join!(
        ctx.session(credential.as_ref()),
        listings::job_by_id(ctx.backend.as_ref(), &id),
    );
    let visit = Visit::new(&ctx, &uri, credential.as_ref(), session);
    let chrome = visit.chrome(&ctx, "");
    Ok(match job? {
        Some(job) => html(pages::render_job(&chrome, &job)),
        None => not_found_page(&chrome),
    })
}

async fn webinars(State(ctx): State<AppContext>, uri: Uri, headers: HeaderMap) -> Response {
    let credential = ctx.credential(&headers);
    let (session, found) = tokio::join!(
        ctx.session(credential.as_ref()),
        listings::all_webinars(ctx.backend.as_ref()),
    );
    let visit = Visit::new(&ctx, &uri, credential.as_ref(), session);
    let found = Section::from_fetch("webinars", found);
    html(pages::render_webinars(&visit.chrome(&ctx, ""), &found))
}

async fn webinar_detail(
    State(ctx): State<AppContext>,
    Path(id): Path<String>,
    uri: Uri,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    let credential = ctx.credential(&headers);
    let (session, webinar) = tokio::join!(
        ctx.session(credential.as_ref()),
        listings::webinar_by_id(ctx.backend.as_ref(), &id),
    );
    let visit = Visit::new(&ctx, &uri, credential.as_ref(), session);
    let chrome = visit.chrome(&ctx, "");
    Ok(match webinar? {
        Some(webinar) => html(pages::render_webinar(&chrome, &webinar)),
        None => not_found_page(&chrome),
    })
}

async fn blog(State(ctx): State<AppContext>, uri: Uri, headers: HeaderMap) -> Response {
    let credential = ctx.credential(&headers);
    let (session, posts) = tokio::join!(
        ctx.session(credential.as_ref()),
        listings::published_posts(ctx.backend.as_ref()),
    );
    let visit = Visit::new(&ctx, &uri, credential.as_ref(), session);
    let posts = Section::from_fetch("blog", posts);
    html(pages::render_blog(&visit.chrome(&ctx, ""), &posts))
}

async fn blog_post(
    State(ctx): State<AppContext>,
    Path(slug): Path<String>,
    uri: Uri,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    let credential = ctx.credential(&headers);
    let (session, post) = tokio::join!(
        ctx.session(credential.as_ref()),
        listings::post_by_slug(ctx.backend.as_ref(), &slug),
    );
    let visit = Visit::new(&ctx, &uri, credential.as_ref(), session);
    let chrome = visit.chrome(&ctx, "");
    Ok(match post? {
        Some(post) => html(pages::render_post(&chrome, &post)),
        None => not_found_page(&chrome),
    })
}

async fn services(State(ctx): State<AppContext>, uri: Uri, headers: HeaderMap) -> Response {
    let credential = ctx.credential(&headers);
    let (session, found) = tokio::join!(
        ctx.session(credential.as_ref()),
        listings::active_services(ctx.backend.as_ref()),
    );
    let visit = Visit::new(&ctx, &uri, credential.as_ref(), session);
    let found = Section::from_fetch("services", found);
    html(pages::render_services(&visit.chrome(&ctx, ""), &found))
}

#[derive(Deserialize)]
struct SearchParams {
    #[serde(default)]
    query: String,
}

async fn search(
    State(ctx): State<AppContext>,
    uri: Uri,
    headers: HeaderMap,
    Query(params): Query<SearchParams>,
) -> Response {
    let credential = ctx.credential(&headers);

    let Some(Route::Search(query)) = submit_search(&params.query) else {
        let session = ctx.session(credential.as_ref()).await;
        let visit = Visit::new(&ctx, &uri, credential.as_ref(), session);
        return html(pages::render_search(&visit.chrome(&ctx, ""), "", None));
    };

    let (session, found) = tokio::join!(
        ctx.session(credential.as_ref()),
        listings::search_jobs(ctx.backend.as_ref(), &query),
    );
    let visit = Visit::new(&ctx, &uri, credential.as_ref(), session);
    let found = Section::from_fetch("search", found);
    html(pages::render_search(&visit.chrome(&ctx, &query), &query, Some(&found)))
}

// ============================================================================
// Auth
// ============================================================================

const PROVIDER_NOTICE: &str =
    "Email sign-in is handled by our account provider. Please use the app link from your welcome email.";

async fn login(State(ctx): State<AppContext>, uri: Uri, headers: HeaderMap) -> Response {
    auth_page(&ctx, &uri, &headers, AuthForm::Login, None).await
}

async fn login_submitted(State(ctx): State<AppContext>, uri: Uri, headers: HeaderMap) -> Response {
    auth_page(&ctx, &uri, &headers, AuthForm::Login, Some(PROVIDER_NOTICE)).await
}

async fn signup(State(ctx): State<AppContext>, uri: Uri, headers: HeaderMap) -> Response {
    auth_page(&ctx, &uri, &headers, AuthForm::Signup, None).await
}

async fn signup_submitted(State(ctx): State<AppContext>, uri: Uri, headers: HeaderMap) -> Response {
    auth_page(&ctx, &uri, &headers, AuthForm::Signup, Some(PROVIDER_NOTICE)).await
}

async fn auth_page(
    ctx: &AppContext,
    uri: &Uri,
    headers: &HeaderMap,
    form: AuthForm,
    notice: Option<&str>,
) -> Response {
    let visit = Visit::resolve(ctx, uri, headers).await;
    if visit.session.is_authenticated() {
        return Redirect::to(&Route::Dashboard.href()).into_response();
    }
    html(account::render_auth_form(&visit.chrome(ctx, ""), form, notice))
}

/// Expire the access-token cookie.
fn clear_cookie(name: &str) -> String {
    format!("{name}=; Path=/; Max-Age=0; HttpOnly; SameSite=Lax")
}

/// `POST /auth/signout`.
///
/// Always answers with a redirect home. On success the cookie is cleared and
/// the next render re-resolves to anonymous. A concurrent trigger is dropped.
/// On failure the cookie is kept and the menu renders the failed state with a
/// retry.
async fn sign_out(State(ctx): State<AppContext>, headers: HeaderMap) -> Response {
    let home = Redirect::to(&Route::Home.href());
    let Some(credential) = ctx.credential(&headers) else {
        return home.into_response();
    };

    match ctx
        .sign_outs
        .sign_out(ctx.identity.as_ref(), &credential)
        .await
    {
        Ok(session) => {
            if session.is_authenticated() {
                warn!("session still resolves after sign-out");
            }
            (
                [(SET_COOKIE, clear_cookie(&ctx.config.session.cookie))],
                home,
            )
                .into_response()
        }
        Err(SignOutError::InFlight | SignOutError::Provider { .. }) => home.into_response(),
    }
}

// ============================================================================
// Dashboard
// ============================================================================

/// The viewer, or a redirect to the login page.
async fn signed_in(
    ctx: &AppContext,
    uri: &Uri,
    headers: &HeaderMap,
) -> Result<(Visit, Viewer), Response> {
    let visit = Visit::resolve(ctx, uri, headers).await;
    match visit.session.viewer().cloned() {
        Some(viewer) => Ok((visit, viewer)),
        None => Err(Redirect::to(&Route::Login.href()).into_response()),
    }
}

async fn dashboard(State(ctx): State<AppContext>, uri: Uri, headers: HeaderMap) -> Response {
    let (visit, viewer) = match signed_in(&ctx, &uri, &headers).await {
        Ok(signed_in) => signed_in,
        Err(redirect) => return redirect,
    };
    let backend = ctx.backend.as_ref();
    let (profile, applications, registrations) = tokio::join!(
        listings::profile_for(backend, &viewer.id),
        listings::applications_for(backend, &viewer.id),
        listings::registrations_for(backend, &viewer.id),
    );
    let profile = profile.unwrap_or_else(|e| {
        warn!(error = %e, "profile unavailable");
        None
    });
    let data = DashboardData {
        profile,
        applications: Section::from_fetch("applications", applications),
        registrations: Section::from_fetch("registrations", registrations),
    };
    html(account::render_dashboard(&visit.chrome(&ctx, ""), &viewer, &data))
}

async fn dashboard_applications(
    State(ctx): State<AppContext>,
    uri: Uri,
    headers: HeaderMap,
) -> Response {
    let (visit, viewer) = match signed_in(&ctx, &uri, &headers).await {
        Ok(signed_in) => signed_in,
        Err(redirect) => return redirect,
    };
    let found = listings::applications_for(ctx.backend.as_ref(), &viewer.id).await;
    let found = Section::from_fetch("applications", found);
    html(account::render_applications(&visit.chrome(&ctx, ""), &found))
}

async fn dashboard_webinars(
    State(ctx): State<AppContext>,
    uri: Uri,
    headers: HeaderMap,
) -> Response {
    let (visit, viewer) = match signed_in(&ctx, &uri, &headers).await {
        Ok(signed_in) => signed_in,
        Err(redirect) => return redirect,
    };
    let found = listings::registrations_for(ctx.backend.as_ref(), &viewer.id).await;
    let found = Section::from_fetch("registrations", found);
    html(account::render_registrations(&visit.chrome(&ctx, ""), &found))
}

async fn dashboard_profile(
    State(ctx): State<AppContext>,
    uri: Uri,
    headers: HeaderMap,
) -> Response {
    let (visit, viewer) = match signed_in(&ctx, &uri, &headers).await {
        Ok(signed_in) => signed_in,
        Err(redirect) => return redirect,
    };
    let profile = listings::profile_for(ctx.backend.as_ref(), &viewer.id)
        .await
        .unwrap_or_else(|e| {
            warn!(error = %e, "profile unavailable");
            None
        });
    html(account::render_profile(&visit.chrome(&ctx, ""), &viewer, profile.as_ref()))
}

// ============================================================================
// Static pages and assets
// ============================================================================

macro_rules! static_page {
    ($($handler:ident => $render:path;)+) => {
        $(
            async fn $handler(State(ctx): State<AppContext>, uri: Uri, headers: HeaderMap) -> Response {
                let visit = Visit::resolve(&ctx, &uri, &headers).await;
                html($render(&visit.chrome(&ctx, "")))
            }
        )+
    };
}

static_page! {
    post_job => info::render_post_job;
    pricing => info::render_pricing;
    contact => info::render_contact;
    help => info::render_help;
    privacy => info::render_privacy;
    terms => info::render_terms;
}

async fn style(State(ctx): State<AppContext>) -> Response {
    (
        [
            (CONTENT_TYPE, "text/css; charset=utf-8"),
            (CACHE_CONTROL, "public, max-age=31536000, immutable"),
        ],
        stylesheet(&ctx.config),
    )
        .into_response()
}

async fn not_found(State(ctx): State<AppContext>, uri: Uri, headers: HeaderMap) -> Response {
    let visit = Visit::resolve(&ctx, &uri, &headers).await;
    not_found_page(&visit.chrome(&ctx, ""))
}
