//! Viewer identity: who is signed in, and signing them out.
//!
//! | Module | Role |
//! |--------|------|
//! | [`provider`] | `IdentityProvider` trait, `Credential`, `User`, `AuthError` |
//! | [`gotrue`] | HTTP adapter for the hosted auth service |
//! | [`memory`] | In-process provider for tests and offline runs |
//! | [`session`] | Per-request resolution to `SessionState` |
//! | [`signout`] | Identity-menu sign-out state machine |

pub mod gotrue;
pub mod memory;
pub mod provider;
pub mod session;
pub mod signout;

pub use gotrue::GoTrueProvider;
pub use memory::MemoryIdentity;
pub use provider::{AuthError, Credential, IdentityProvider, User};
pub use session::{SessionState, Viewer, resolve};
pub use signout::{MenuState, SignOutError, SignOutTracker};
