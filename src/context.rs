//! Explicit handles every request reads through.
//!
//! No client is global: the server builds one [`AppContext`] at startup and
//! hands it to every handler, and tests build one around in-memory fakes.

use crate::backend::{Backend, MemoryBackend, PostgrestBackend};
use crate::config::{BackendKind, SiteConfig};
use crate::error::StartupError;
use crate::identity::{
    Credential, GoTrueProvider, IdentityProvider, MemoryIdentity, SessionState, SignOutTracker,
    User, resolve,
};
use axum::http::HeaderMap;
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

#[derive(Clone)]
pub struct AppContext {
    pub config: Arc<SiteConfig>,
    pub backend: Arc<dyn Backend>,
    pub identity: Arc<dyn IdentityProvider>,
    pub sign_outs: Arc<SignOutTracker>,
}

/// Seed file for the memory mode: table rows plus optional live sessions.
#[derive(Deserialize, Default)]
struct Seed {
    #[serde(default)]
    sessions: HashMap<String, User>,
    #[serde(flatten)]
    tables: HashMap<String, Vec<Value>>,
}

const SIGN_OUT_SLACK: Duration = Duration::from_secs(5);

impl AppContext {
    pub fn new(
        config: SiteConfig,
        backend: Arc<dyn Backend>,
        identity: Arc<dyn IdentityProvider>,
    ) -> Self {
        // The provider call and the re-resolve are each bounded by the timeout.
        let in_flight_limit =
            Duration::from_secs(config.backend.timeout_secs) * 2 + SIGN_OUT_SLACK;
        Self {
            config: Arc::new(config),
            backend,
            identity,
            sign_outs: Arc::new(SignOutTracker::with_in_flight_limit(in_flight_limit)),
        }
    }

    /// Build the adapters the configuration asks for.
    pub fn from_config(config: SiteConfig) -> Result<Self, StartupError> {
        let timeout = Duration::from_secs(config.backend.timeout_secs);
        let (backend, identity): (Arc<dyn Backend>, Arc<dyn IdentityProvider>) =
            match config.backend.kind {
                BackendKind::Postgrest => {
                    let url = &config.backend.url;
                    let key = &config.backend.anon_key;
                    (
                        Arc::new(PostgrestBackend::new(url, key, timeout)?),
                        Arc::new(GoTrueProvider::new(url, key, timeout)?),
                    )
                }
                BackendKind::Memory => {
                    let seed = match &config.backend.seed_file {
                        Some(path) => {
                            let content = std::fs::read_to_string(path)?;
                            serde_json::from_str::<Seed>(&content)?
                        }
                        None => Seed::default(),
                    };
                    let identity = MemoryIdentity::new();
                    for (token, user) in seed.sessions {
                        identity.sign_in(&token, user);
                    }
                    (
                        Arc::new(MemoryBackend::from_seed_tables(seed.tables)),
                        Arc::new(identity),
                    )
                }
            };
        info!(
            backend = backend.name(),
            identity = identity.name(),
            "adapters ready"
        );
        Ok(Self::new(config, backend, identity))
    }

    /// The access token the request carries, if any.
    pub fn credential(&self, headers: &HeaderMap) -> Option<Credential> {
        Credential::from_headers(headers, &self.config.session.cookie)
    }

    /// Resolve the viewer for a request. Never fails.
    pub async fn session(&self, credential: Option<&Credential>) -> SessionState {
        resolve(self.identity.as_ref(), credential).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::Collection;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn memory_seed_loads_rows_and_sessions() {
        let mut seed = NamedTempFile::new().unwrap();
        write!(
            seed,
            r#"{{
                "jobs": [{{"id": "j1"}}],
                "sessions": {{"tok": {{"id": "u1", "email": "jane@example.com"}}}}
            }}"#
        )
        .unwrap();

        let mut config = SiteConfig::default();
        config.backend.seed_file = Some(seed.path().to_path_buf());
        let ctx = AppContext::from_config(config).unwrap();

        assert_eq!(ctx.backend.name(), "memory");
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        let session = rt.block_on(ctx.session(Some(&Credential::new("tok"))));
        assert_eq!(session.viewer().unwrap().email, "jane@example.com");
        let rows = rt
            .block_on(ctx.backend.query(&crate::backend::ListQuery::new(Collection::Jobs)))
            .unwrap();
        assert_eq!(rows.len(), 1);
    }

    #[test]
    fn missing_seed_file_is_a_startup_error() {
        let mut config = SiteConfig::default();
        config.backend.seed_file = Some("/nonexistent/seed.json".into());
        assert!(matches!(
            AppContext::from_config(config),
            Err(StartupError::Io(_))
        ));
    }

    #[test]
    fn postgrest_mode_builds_http_adapters() {
        let mut config = SiteConfig::default();
        config.backend.kind = BackendKind::Postgrest;
        config.backend.url = "https://db.example.com".into();
        config.backend.anon_key = "anon".into();
        let ctx = AppContext::from_config(config).unwrap();
        assert_eq!(ctx.backend.name(), "postgrest");
        assert_eq!(ctx.identity.name(), "gotrue");
    }
}
