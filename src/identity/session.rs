//! Per-request viewer resolution.

use super::provider::{Credential, IdentityProvider, User};
use tracing::{debug, warn};

/// Who is looking at the page.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionState {
    Authenticated(Viewer),
    Anonymous,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Viewer {
    pub id: String,
    pub email: String,
    pub display_name: Option<String>,
    pub avatar_url: Option<String>,
}

impl From<User> for Viewer {
    fn from(user: User) -> Self {
        Viewer {
            id: user.id,
            email: user.email,
            display_name: user.display_name,
            avatar_url: user.avatar_url,
        }
    }
}

impl Viewer {
    /// Name for the menu header. Accounts without a display name show as "User".
    pub fn label(&self) -> &str {
        self.display_name.as_deref().unwrap_or("User")
    }
}

impl SessionState {
    pub fn viewer(&self) -> Option<&Viewer> {
        match self {
            SessionState::Authenticated(viewer) => Some(viewer),
            SessionState::Anonymous => None,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.viewer().is_some()
    }
}

/// Resolve the viewer for a request. Never fails: no credential, a rejected
/// credential and an unreachable provider all resolve to `Anonymous`.
pub async fn resolve(
    identity: &dyn IdentityProvider,
    credential: Option<&Credential>,
) -> SessionState {
    let Some(credential) = credential else {
        return SessionState::Anonymous;
    };
    match identity.get_user(credential).await {
        Ok(Some(user)) => SessionState::Authenticated(user.into()),
        Ok(None) => {
            debug!(provider = identity.name(), "credential not accepted");
            SessionState::Anonymous
        }
        Err(e) => {
            warn!(provider = identity.name(), error = %e, "session resolution failed, treating viewer as anonymous");
            SessionState::Anonymous
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::MemoryIdentity;
    use crate::test_helpers::user;

    #[tokio::test]
    async fn no_credential_is_anonymous_without_lookup() {
        let identity = MemoryIdentity::new();
        assert_eq!(resolve(&identity, None).await, SessionState::Anonymous);
        assert_eq!(identity.lookups(), 0);
    }

    #[tokio::test]
    async fn valid_credential_is_authenticated_with_fields() {
        let identity = MemoryIdentity::new();
        let mut account = user("u1", "jane@example.com");
        account.display_name = Some("Jane Doe".into());
        account.avatar_url = Some("https://cdn.example.com/jane.png".into());
        identity.sign_in("tok", account);

        let state = resolve(&identity, Some(&Credential::new("tok"))).await;
        let viewer = state.viewer().unwrap();
        assert_eq!(viewer.id, "u1");
        assert_eq!(viewer.email, "jane@example.com");
        assert_eq!(viewer.label(), "Jane Doe");
        assert_eq!(viewer.avatar_url.as_deref(), Some("https://cdn.example.com/jane.png"));
    }

    #[tokio::test]
    async fn unknown_token_is_anonymous() {
        let identity = MemoryIdentity::new();
        let state = resolve(&identity, Some(&Credential::new("expired"))).await;
        assert_eq!(state, SessionState::Anonymous);
    }

    #[tokio::test]
    async fn provider_outage_is_anonymous() {
        let identity = MemoryIdentity::new();
        identity.sign_in("tok", user("u1", "jane@example.com"));
        identity.set_lookup_failure(true);
        let state = resolve(&identity, Some(&Credential::new("tok"))).await;
        assert_eq!(state, SessionState::Anonymous);
    }

    #[test]
    fn label_falls_back_to_generic_name() {
        let viewer = Viewer::from(user("u1", "sam@example.com"));
        assert_eq!(viewer.label(), "User");
    }
}
