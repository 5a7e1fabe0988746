//! Identity provider abstraction
//!
//! The hosted identity service is consumed as an opaque collaborator:
//! account creation, sign-in/out, and a session change notification that
//! also reports the initial state. [`mock::MockIdentityProvider`] is the
//! in-memory implementation used by tests and headless runs.

pub mod mock;

pub use mock::MockIdentityProvider;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use shared::error::AppResult;
use tokio::sync::watch;

/// An authenticated user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub uid: String,
    pub email: String,
}

/// Hosted identity service contract
///
/// `subscribe` returns a watch channel whose receiver immediately yields
/// the current session state and then every transition. It is the single
/// source of truth for login/logout; nothing polls.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Register a new account and start a session for it
    ///
    /// Fails with `EmailInUse`, `WeakPassword` or `InvalidEmail`.
    async fn create_account(&self, email: &str, password: &str) -> AppResult<Identity>;

    /// Start a session for an existing account
    ///
    /// Fails with `AccountNotFound`, `InvalidCredentials` or
    /// `TooManyAttempts`.
    async fn sign_in(&self, email: &str, password: &str) -> AppResult<Identity>;

    /// End the current session; a no-op when signed out
    async fn sign_out(&self) -> AppResult<()>;

    /// The currently signed-in identity, if any
    fn current(&self) -> Option<Identity>;

    /// Subscribe to session transitions (including the current state)
    fn subscribe(&self) -> watch::Receiver<Option<Identity>>;
}
