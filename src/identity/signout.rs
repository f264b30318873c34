//! Sign-out state machine for the identity menu.
//!
//! Each session's menu moves `Idle → SigningOut → Resolved | Failed`.
//! While a sign-out is in flight a second trigger for the same session is
//! rejected without touching the provider. Once the provider returns
//! (success or not) the session is resolved again, strictly after the
//! provider call, so the caller never renders from a stale identity.
//!
//! `Failed` is retry-eligible; `Resolved` is terminal and further triggers
//! are no-ops.
//!
//! A sign-out whose request is dropped mid-call (client gone, task aborted)
//! falls back to `Idle` through a guard, and a `SigningOut` entry older than
//! the in-flight limit is treated as abandoned.

use super::provider::{AuthError, Credential, IdentityProvider};
use super::session::{SessionState, resolve};
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::{info, warn};

#[derive(Debug, Clone, PartialEq)]
pub enum MenuState {
    Idle,
    SigningOut,
    Resolved,
    Failed(AuthError),
}

impl MenuState {
    /// Whether the sign-out control accepts a click in this state.
    pub fn accepts_trigger(&self) -> bool {
        matches!(self, MenuState::Idle | MenuState::Failed(_))
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SignOutError {
    #[error("sign-out already in progress")]
    InFlight,
    #[error("sign-out failed: {source}")]
    Provider {
        #[source]
        source: AuthError,
        /// Session as re-resolved after the failed attempt.
        session: SessionState,
    },
}

/// Terminal states are forgotten after this long.
const SETTLED_TTL: Duration = Duration::from_secs(300);

/// Default bound on how long a sign-out may stay in flight.
const DEFAULT_IN_FLIGHT_LIMIT: Duration = Duration::from_secs(60);

struct Entry {
    state: MenuState,
    changed: Instant,
}

impl Entry {
    fn expired(&self, in_flight_limit: Duration) -> bool {
        let limit = if self.state == MenuState::SigningOut {
            in_flight_limit
        } else {
            SETTLED_TTL
        };
        self.changed.elapsed() >= limit
    }
}

/// Menu state per session token.
pub struct SignOutTracker {
    menus: Mutex<HashMap<Credential, Entry>>,
    in_flight_limit: Duration,
}

impl Default for SignOutTracker {
    fn default() -> Self {
        Self::with_in_flight_limit(DEFAULT_IN_FLIGHT_LIMIT)
    }
}

/// Resets an unfinished sign-out to `Idle` when dropped.
struct PendingSignOut<'a> {
    tracker: &'a SignOutTracker,
    credential: &'a Credential,
    settled: bool,
}

impl PendingSignOut<'_> {
    fn settle(mut self, state: MenuState) {
        self.settled = true;
        self.tracker.set(self.credential, state);
    }
}

impl Drop for PendingSignOut<'_> {
    fn drop(&mut self) {
        if self.settled {
            return;
        }
        warn!("sign-out abandoned before the provider answered");
        let mut menus = self.tracker.menus.lock().unwrap_or_else(|e| e.into_inner());
        if menus
            .get(self.credential)
            .is_some_and(|entry| entry.state == MenuState::SigningOut)
        {
            menus.remove(self.credential);
        }
    }
}

enum Begin {
    Start,
    AlreadyDone,
}

impl SignOutTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// A tracker that gives up on a sign-out left in flight for `limit`.
    pub fn with_in_flight_limit(limit: Duration) -> Self {
        Self {
            menus: Mutex::new(HashMap::new()),
            in_flight_limit: limit,
        }
    }

    /// Current menu state for a session; unknown sessions are `Idle`.
    pub fn state(&self, credential: &Credential) -> MenuState {
        let menus = self.menus.lock().unwrap_or_else(|e| e.into_inner());
        menus
            .get(credential)
            .map_or(MenuState::Idle, |entry| entry.state.clone())
    }

    fn set(&self, credential: &Credential, state: MenuState) {
        let mut menus = self.menus.lock().unwrap_or_else(|e| e.into_inner());
        menus.insert(
            credential.clone(),
            Entry {
                state,
                changed: Instant::now(),
            },
        );
    }

    fn begin(&self, credential: &Credential) -> Result<Begin, SignOutError> {
        let mut menus = self.menus.lock().unwrap_or_else(|e| e.into_inner());
        let limit = self.in_flight_limit;
        menus.retain(|_, entry| !entry.expired(limit));
        let current = menus
            .get(credential)
            .map_or(MenuState::Idle, |entry| entry.state.clone());
        match current {
            MenuState::SigningOut => Err(SignOutError::InFlight),
            MenuState::Resolved => Ok(Begin::AlreadyDone),
            MenuState::Idle | MenuState::Failed(_) => {
                menus.insert(
                    credential.clone(),
                    Entry {
                        state: MenuState::SigningOut,
                        changed: Instant::now(),
                    },
                );
                Ok(Begin::Start)
            }
        }
    }

    /// Sign the session out and return the freshly resolved session.
    ///
    /// The lock is never held across the provider call.
    pub async fn sign_out(
        &self,
        identity: &dyn IdentityProvider,
        credential: &Credential,
    ) -> Result<SessionState, SignOutError> {
        if let Begin::AlreadyDone = self.begin(credential)? {
            return Ok(resolve(identity, Some(credential)).await);
        }
        let guard = PendingSignOut {
            tracker: self,
            credential,
            settled: false,
        };

        let outcome = identity.sign_out(credential).await;
        let session = resolve(identity, Some(credential)).await;

        match outcome {
            Ok(()) => {
                info!(provider = identity.name(), "signed out");
                guard.settle(MenuState::Resolved);
                Ok(session)
            }
            Err(source) => {
                warn!(provider = identity.name(), error = %source, "sign-out failed");
                guard.settle(MenuState::Failed(source.clone()));
                Err(SignOutError::Provider { source, session })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::MemoryIdentity;
    use crate::test_helpers::user;
    use std::sync::Arc;

    fn signed_in() -> (MemoryIdentity, Credential) {
        let identity = MemoryIdentity::new();
        identity.sign_in("tok", user("u1", "jane@example.com"));
        (identity, Credential::new("tok"))
    }

    #[tokio::test]
    async fn successful_sign_out_resolves_anonymous() {
        let (identity, credential) = signed_in();
        let tracker = SignOutTracker::new();

        let session = tracker.sign_out(&identity, &credential).await.unwrap();
        assert_eq!(session, SessionState::Anonymous);
        assert_eq!(tracker.state(&credential), MenuState::Resolved);
        assert_eq!(identity.sign_out_calls(), 1);
    }

    #[tokio::test]
    async fn concurrent_triggers_call_provider_once() {
        let (identity, credential) = signed_in();
        identity.set_latency(Duration::from_millis(50));
        let tracker = SignOutTracker::new();

        let (first, second) = tokio::join!(
            tracker.sign_out(&identity, &credential),
            tracker.sign_out(&identity, &credential),
        );

        assert_eq!(first, Ok(SessionState::Anonymous));
        assert_eq!(second, Err(SignOutError::InFlight));
        assert_eq!(identity.sign_out_calls(), 1);
    }

    #[tokio::test]
    async fn trigger_after_resolution_is_a_noop() {
        let (identity, credential) = signed_in();
        let tracker = SignOutTracker::new();

        tracker.sign_out(&identity, &credential).await.unwrap();
        let again = tracker.sign_out(&identity, &credential).await;
        assert_eq!(again, Ok(SessionState::Anonymous));
        assert_eq!(identity.sign_out_calls(), 1);
    }

    #[tokio::test]
    async fn failure_is_retry_eligible_and_re_resolves() {
        let (identity, credential) = signed_in();
        identity.set_sign_out_failure(true);
        let tracker = SignOutTracker::new();
        let lookups_before = identity.lookups();

        let err = tracker.sign_out(&identity, &credential).await.unwrap_err();
        match err {
            SignOutError::Provider { session, .. } => assert!(session.is_authenticated()),
            other => panic!("expected provider error, got {other:?}"),
        }
        assert!(identity.lookups() > lookups_before);
        let state = tracker.state(&credential);
        assert!(matches!(state, MenuState::Failed(_)));
        assert!(state.accepts_trigger());

        identity.set_sign_out_failure(false);
        let session = tracker.sign_out(&identity, &credential).await.unwrap();
        assert_eq!(session, SessionState::Anonymous);
        assert_eq!(identity.sign_out_calls(), 2);
    }

    #[tokio::test]
    async fn aborted_sign_out_can_be_retried() {
        let (identity, credential) = signed_in();
        let identity = Arc::new(identity);
        identity.set_latency(Duration::from_millis(200));
        let tracker = Arc::new(SignOutTracker::new());

        let task = {
            let (identity, tracker, credential) =
                (identity.clone(), tracker.clone(), credential.clone());
            tokio::spawn(async move { tracker.sign_out(identity.as_ref(), &credential).await })
        };
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert_eq!(tracker.state(&credential), MenuState::SigningOut);
        task.abort();
        assert!(task.await.unwrap_err().is_cancelled());

        assert_eq!(tracker.state(&credential), MenuState::Idle);
        identity.set_latency(Duration::ZERO);
        let retry = tracker.sign_out(identity.as_ref(), &credential).await;
        assert_eq!(retry, Ok(SessionState::Anonymous));
        assert_eq!(identity.sign_out_calls(), 2);
    }

    #[tokio::test]
    async fn stale_in_flight_entry_expires() {
        let (identity, credential) = signed_in();
        let tracker = SignOutTracker::with_in_flight_limit(Duration::from_millis(30));

        // Leave an entry in flight without a guard, as a lost task would.
        assert!(matches!(tracker.begin(&credential), Ok(Begin::Start)));
        assert_eq!(
            tracker.sign_out(&identity, &credential).await,
            Err(SignOutError::InFlight)
        );

        tokio::time::sleep(Duration::from_millis(50)).await;
        let session = tracker.sign_out(&identity, &credential).await.unwrap();
        assert_eq!(session, SessionState::Anonymous);
        assert_eq!(identity.sign_out_calls(), 1);
    }

    #[test]
    fn unknown_sessions_start_idle() {
        let tracker = SignOutTracker::new();
        assert_eq!(tracker.state(&Credential::new("x")), MenuState::Idle);
        assert!(MenuState::Idle.accepts_trigger());
        assert!(!MenuState::SigningOut.accepts_trigger());
        assert!(!MenuState::Resolved.accepts_trigger());
    }
}
