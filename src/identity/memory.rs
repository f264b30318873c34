//! In-process identity provider.
//!
//! Maps tokens to users. Sign-out revokes the token before returning, so a
//! lookup issued afterwards sees the revocation. Counts calls and can be
//! told to fail or stall.

use super::provider::{AuthError, Credential, IdentityProvider, User};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::RwLock;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::time::Duration;

#[derive(Default)]
pub struct MemoryIdentity {
    sessions: RwLock<HashMap<String, User>>,
    sign_out_calls: AtomicUsize,
    lookups: AtomicUsize,
    fail_sign_out: AtomicBool,
    fail_lookup: AtomicBool,
    latency_ms: AtomicU64,
}

impl MemoryIdentity {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a live session.
    pub fn sign_in(&self, token: &str, user: User) {
        let mut sessions = self.sessions.write().unwrap_or_else(|e| e.into_inner());
        sessions.insert(token.to_string(), user);
    }

    pub fn is_signed_in(&self, token: &str) -> bool {
        let sessions = self.sessions.read().unwrap_or_else(|e| e.into_inner());
        sessions.contains_key(token)
    }

    pub fn sign_out_calls(&self) -> usize {
        self.sign_out_calls.load(Ordering::SeqCst)
    }

    pub fn lookups(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }

    /// Make sign-out fail (without revoking) until turned off.
    pub fn set_sign_out_failure(&self, fail: bool) {
        self.fail_sign_out.store(fail, Ordering::SeqCst);
    }

    /// Make user lookups fail as if the provider were down.
    pub fn set_lookup_failure(&self, fail: bool) {
        self.fail_lookup.store(fail, Ordering::SeqCst);
    }

    /// Delay every call by `latency`.
    pub fn set_latency(&self, latency: Duration) {
        self.latency_ms
            .store(latency.as_millis() as u64, Ordering::SeqCst);
    }

    async fn stall(&self) {
        let ms = self.latency_ms.load(Ordering::SeqCst);
        if ms > 0 {
            tokio::time::sleep(Duration::from_millis(ms)).await;
        }
    }
}

#[async_trait]
impl IdentityProvider for MemoryIdentity {
    fn name(&self) -> &'static str {
        "memory"
    }

    async fn get_user(&self, credential: &Credential) -> Result<Option<User>, AuthError> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        self.stall().await;
        if self.fail_lookup.load(Ordering::SeqCst) {
            return Err(AuthError::Transport("identity provider offline".into()));
        }
        let sessions = self.sessions.read().unwrap_or_else(|e| e.into_inner());
        Ok(sessions.get(credential.token()).cloned())
    }

    async fn sign_out(&self, credential: &Credential) -> Result<(), AuthError> {
        self.sign_out_calls.fetch_add(1, Ordering::SeqCst);
        self.stall().await;
        if self.fail_sign_out.load(Ordering::SeqCst) {
            return Err(AuthError::Rejected { status: 503 });
        }
        let mut sessions = self.sessions.write().unwrap_or_else(|e| e.into_inner());
        sessions.remove(credential.token());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::user;

    #[tokio::test]
    async fn sign_out_revokes_before_returning() {
        let identity = MemoryIdentity::new();
        identity.sign_in("tok", user("u1", "jane@example.com"));
        let credential = Credential::new("tok");

        assert!(identity.get_user(&credential).await.unwrap().is_some());
        identity.sign_out(&credential).await.unwrap();
        assert_eq!(identity.get_user(&credential).await, Ok(None));
        assert_eq!(identity.sign_out_calls(), 1);
    }

    #[tokio::test]
    async fn failed_sign_out_keeps_session() {
        let identity = MemoryIdentity::new();
        identity.sign_in("tok", user("u1", "jane@example.com"));
        identity.set_sign_out_failure(true);

        let result = identity.sign_out(&Credential::new("tok")).await;
        assert_eq!(result, Err(AuthError::Rejected { status: 503 }));
        assert!(identity.is_signed_in("tok"));
    }

    #[tokio::test]
    async fn lookup_failure_is_an_error_not_none() {
        let identity = MemoryIdentity::new();
        identity.set_lookup_failure(true);
        assert!(identity.get_user(&Credential::new("tok")).await.is_err());
    }
}
