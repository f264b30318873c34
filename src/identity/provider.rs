//! Identity provider seam.
//!
//! The provider owns sessions: it issues access tokens at login, answers
//! "who holds this token", and revokes tokens on sign-out. This crate only
//! reads the token the browser presents and asks.

use async_trait::async_trait;
use axum::http::HeaderMap;
use axum::http::header::{AUTHORIZATION, COOKIE};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum AuthError {
    #[error("identity provider unreachable: {0}")]
    Transport(String),
    #[error("identity provider rejected the request ({status})")]
    Rejected { status: u16 },
    #[error("malformed identity response: {0}")]
    Decode(String),
}

/// An access token as presented by the browser.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Credential(String);

impl Credential {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn token(&self) -> &str {
        &self.0
    }

    /// Read the token from the session cookie, falling back to an
    /// `Authorization: Bearer` header. Blank values count as absent.
    pub fn from_headers(headers: &HeaderMap, cookie_name: &str) -> Option<Credential> {
        let from_cookie = headers
            .get_all(COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .flat_map(|v| v.split(';'))
            .filter_map(|pair| pair.trim().split_once('='))
            .find(|(name, _)| *name == cookie_name)
            .map(|(_, value)| value.trim().to_string());

        let token = from_cookie.filter(|t| !t.is_empty()).or_else(|| {
            headers
                .get(AUTHORIZATION)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.strip_prefix("Bearer "))
                .map(|t| t.trim().to_string())
                .filter(|t| !t.is_empty())
        })?;
        Some(Credential(token))
    }
}

// Tokens stay out of logs.
impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(..)")
    }
}

/// Account as reported by the provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub email: String,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub avatar_url: Option<String>,
}

#[async_trait]
pub trait IdentityProvider: Send + Sync {
    fn name(&self) -> &'static str;

    /// The account behind `credential`. An invalid or expired token is
    /// `Ok(None)`; `Err` means the provider could not answer.
    async fn get_user(&self, credential: &Credential) -> Result<Option<User>, AuthError>;

    /// Revoke the session. Returns once the provider has committed the
    /// revocation, so a following `get_user` observes it.
    async fn sign_out(&self, credential: &Credential) -> Result<(), AuthError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(pairs: &[(&'static str, &str)]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for (name, value) in pairs {
            map.append(*name, HeaderValue::from_str(value).unwrap());
        }
        map
    }

    #[test]
    fn token_from_named_cookie() {
        let map = headers(&[("cookie", "theme=dark; pj-access-token=abc123; other=1")]);
        let credential = Credential::from_headers(&map, "pj-access-token").unwrap();
        assert_eq!(credential.token(), "abc123");
    }

    #[test]
    fn bearer_header_is_fallback() {
        let map = headers(&[("authorization", "Bearer xyz")]);
        let credential = Credential::from_headers(&map, "pj-access-token").unwrap();
        assert_eq!(credential.token(), "xyz");
    }

    #[test]
    fn cookie_wins_over_bearer() {
        let map = headers(&[
            ("cookie", "pj-access-token=from-cookie"),
            ("authorization", "Bearer from-header"),
        ]);
        let credential = Credential::from_headers(&map, "pj-access-token").unwrap();
        assert_eq!(credential.token(), "from-cookie");
    }

    #[test]
    fn blank_or_missing_is_none() {
        assert!(Credential::from_headers(&HeaderMap::new(), "t").is_none());
        let map = headers(&[("cookie", "t=; x=1"), ("authorization", "Basic abc")]);
        assert!(Credential::from_headers(&map, "t").is_none());
    }

    #[test]
    fn debug_hides_token() {
        let credential = Credential::new("secret");
        assert!(!format!("{credential:?}").contains("secret"));
    }
}
