//! Hosted auth service (GoTrue REST contract).

use super::provider::{AuthError, Credential, IdentityProvider, User};
use async_trait::async_trait;
use reqwest::StatusCode;
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, instrument};

pub struct GoTrueProvider {
    base_url: String,
    client: reqwest::Client,
}

#[derive(Deserialize)]
struct UserResponse {
    id: String,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    user_metadata: UserMetadata,
}

#[derive(Deserialize, Default)]
struct UserMetadata {
    #[serde(default)]
    full_name: Option<String>,
    #[serde(default)]
    avatar_url: Option<String>,
}

impl From<UserResponse> for User {
    fn from(raw: UserResponse) -> Self {
        User {
            id: raw.id,
            email: raw.email.unwrap_or_default(),
            display_name: raw.user_metadata.full_name.filter(|n| !n.trim().is_empty()),
            avatar_url: raw.user_metadata.avatar_url.filter(|u| !u.trim().is_empty()),
        }
    }
}

impl GoTrueProvider {
    pub fn new(base_url: &str, anon_key: &str, timeout: Duration) -> Result<Self, AuthError> {
        let mut headers = HeaderMap::new();
        let key = HeaderValue::from_str(anon_key)
            .map_err(|e| AuthError::Transport(format!("invalid anon key: {e}")))?;
        headers.insert("apikey", key);

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .default_headers(headers)
            .build()
            .map_err(|e| AuthError::Transport(e.to_string()))?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/auth/v1/{path}", self.base_url)
    }
}

fn bearer(credential: &Credential) -> Result<HeaderValue, AuthError> {
    HeaderValue::from_str(&format!("Bearer {}", credential.token()))
        .map_err(|_| AuthError::Rejected { status: 400 })
}

#[async_trait]
impl IdentityProvider for GoTrueProvider {
    fn name(&self) -> &'static str {
        "gotrue"
    }

    #[instrument(name = "gotrue_get_user", skip_all)]
    async fn get_user(&self, credential: &Credential) -> Result<Option<User>, AuthError> {
        let response = self
            .client
            .get(self.endpoint("user"))
            .header(AUTHORIZATION, bearer(credential)?)
            .send()
            .await
            .map_err(|e| AuthError::Transport(e.to_string()))?;

        match response.status() {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                debug!("token not accepted");
                Ok(None)
            }
            status if status.is_success() => {
                let raw: UserResponse = response
                    .json()
                    .await
                    .map_err(|e| AuthError::Decode(e.to_string()))?;
                Ok(Some(raw.into()))
            }
            status => Err(AuthError::Rejected {
                status: status.as_u16(),
            }),
        }
    }

    #[instrument(name = "gotrue_sign_out", skip_all)]
    async fn sign_out(&self, credential: &Credential) -> Result<(), AuthError> {
        let response = self
            .client
            .post(self.endpoint("logout"))
            .header(AUTHORIZATION, bearer(credential)?)
            .send()
            .await
            .map_err(|e| AuthError::Transport(e.to_string()))?;

        match response.status() {
            // An already-dead token is as signed out as it gets.
            StatusCode::UNAUTHORIZED | StatusCode::NOT_FOUND => Ok(()),
            status if status.is_success() => Ok(()),
            status => Err(AuthError::Rejected {
                status: status.as_u16(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_metadata_maps_to_display_fields() {
        let raw: UserResponse = serde_json::from_str(
            r#"{"id":"u1","email":"jane@example.com","user_metadata":{"full_name":"Jane Doe","avatar_url":""}}"#,
        )
        .unwrap();
        let user = User::from(raw);
        assert_eq!(user.email, "jane@example.com");
        assert_eq!(user.display_name.as_deref(), Some("Jane Doe"));
        assert_eq!(user.avatar_url, None);
    }

    #[test]
    fn missing_metadata_is_fine() {
        let raw: UserResponse = serde_json::from_str(r#"{"id":"u2"}"#).unwrap();
        let user = User::from(raw);
        assert_eq!(user.email, "");
        assert_eq!(user.display_name, None);
    }

    #[test]
    fn endpoints_join_cleanly() {
        let provider =
            GoTrueProvider::new("https://auth.example.com/", "anon", Duration::from_secs(3)).unwrap();
        assert_eq!(provider.endpoint("user"), "https://auth.example.com/auth/v1/user");
        assert_eq!(provider.endpoint("logout"), "https://auth.example.com/auth/v1/logout");
    }
}
