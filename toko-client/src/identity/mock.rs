//! In-memory identity provider
//!
//! Implements the [`IdentityProvider`] contract against a process-local
//! account map. Backs the integration tests and headless demos.

use super::{Identity, IdentityProvider};
use async_trait::async_trait;
use dashmap::DashMap;
use shared::error::{AppError, AppResult, ErrorCode};
use tokio::sync::watch;
use uuid::Uuid;

const MIN_PASSWORD_LEN: usize = 8;
const MAX_FAILED_ATTEMPTS: u32 = 5;

#[derive(Debug, Clone)]
struct MockAccount {
    uid: String,
    password: String,
    failed_attempts: u32,
}

/// Process-local [`IdentityProvider`]
#[derive(Debug)]
pub struct MockIdentityProvider {
    accounts: DashMap<String, MockAccount>,
    session_tx: watch::Sender<Option<Identity>>,
    // Retain a receiver so `session_tx.send` keeps a live receiver count and
    // actually stores the value (tokio's `watch::Sender::send` is a no-op when
    // no receivers exist).
    _session_rx: watch::Receiver<Option<Identity>>,
}

impl Default for MockIdentityProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl MockIdentityProvider {
    pub fn new() -> Self {
        let (session_tx, _session_rx) = watch::channel(None);
        Self {
            accounts: DashMap::new(),
            session_tx,
            _session_rx,
        }
    }

    fn set_session(&self, identity: Option<Identity>) {
        let _ = self.session_tx.send(identity);
    }

    fn validate_email(email: &str) -> AppResult<()> {
        let Some((local, domain)) = email.split_once('@') else {
            return Err(AppError::new(ErrorCode::InvalidEmail).with_detail("email", email));
        };
        if local.is_empty() || domain.is_empty() || !domain.contains('.') {
            return Err(AppError::new(ErrorCode::InvalidEmail).with_detail("email", email));
        }
        Ok(())
    }
}

#[async_trait]
impl IdentityProvider for MockIdentityProvider {
    async fn create_account(&self, email: &str, password: &str) -> AppResult<Identity> {
        Self::validate_email(email)?;
        if password.len() < MIN_PASSWORD_LEN {
            return Err(AppError::new(ErrorCode::WeakPassword));
        }
        if self.accounts.contains_key(email) {
            return Err(AppError::new(ErrorCode::EmailInUse).with_detail("email", email));
        }

        let account = MockAccount {
            uid: Uuid::new_v4().to_string(),
            password: password.to_string(),
            failed_attempts: 0,
        };
        let identity = Identity {
            uid: account.uid.clone(),
            email: email.to_string(),
        };
        self.accounts.insert(email.to_string(), account);

        tracing::info!(email, "account created");
        self.set_session(Some(identity.clone()));
        Ok(identity)
    }

    async fn sign_in(&self, email: &str, password: &str) -> AppResult<Identity> {
        let Some(mut account) = self.accounts.get_mut(email) else {
            return Err(AppError::new(ErrorCode::AccountNotFound).with_detail("email", email));
        };

        if account.failed_attempts >= MAX_FAILED_ATTEMPTS {
            return Err(AppError::new(ErrorCode::TooManyAttempts));
        }
        if account.password != password {
            account.failed_attempts += 1;
            tracing::warn!(email, attempts = account.failed_attempts, "sign-in rejected");
            return Err(AppError::invalid_credentials());
        }
        account.failed_attempts = 0;

        let identity = Identity {
            uid: account.uid.clone(),
            email: email.to_string(),
        };
        drop(account);

        tracing::info!(email, "signed in");
        self.set_session(Some(identity.clone()));
        Ok(identity)
    }

    async fn sign_out(&self) -> AppResult<()> {
        self.set_session(None);
        Ok(())
    }

    fn current(&self) -> Option<Identity> {
        self.session_tx.borrow().clone()
    }

    fn subscribe(&self) -> watch::Receiver<Option<Identity>> {
        self.session_tx.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_create_account_signs_in() {
        let provider = MockIdentityProvider::new();
        let identity = provider
            .create_account("budi@example.com", "rahasia-sekali")
            .await
            .unwrap();
        assert_eq!(provider.current(), Some(identity));
    }

    #[tokio::test]
    async fn test_create_account_rejections() {
        let provider = MockIdentityProvider::new();

        let err = provider.create_account("no-at-sign", "longenough").await.unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidEmail);

        let err = provider.create_account("a@b", "longenough").await.unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidEmail);

        let err = provider.create_account("budi@example.com", "short").await.unwrap_err();
        assert_eq!(err.code, ErrorCode::WeakPassword);

        provider
            .create_account("budi@example.com", "rahasia-sekali")
            .await
            .unwrap();
        let err = provider
            .create_account("budi@example.com", "rahasia-sekali")
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::EmailInUse);
    }

    #[tokio::test]
    async fn test_sign_in_wrong_password_then_lockout() {
        let provider = MockIdentityProvider::new();
        provider
            .create_account("budi@example.com", "rahasia-sekali")
            .await
            .unwrap();
        provider.sign_out().await.unwrap();

        let err = provider.sign_in("nobody@example.com", "x").await.unwrap_err();
        assert_eq!(err.code, ErrorCode::AccountNotFound);

        for _ in 0..MAX_FAILED_ATTEMPTS {
            let err = provider
                .sign_in("budi@example.com", "wrong-password")
                .await
                .unwrap_err();
            assert_eq!(err.code, ErrorCode::InvalidCredentials);
        }
        // even the right password is rejected once locked
        let err = provider
            .sign_in("budi@example.com", "rahasia-sekali")
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::TooManyAttempts);
    }

    #[tokio::test]
    async fn test_subscription_sees_transitions() {
        let provider = MockIdentityProvider::new();
        let rx = provider.subscribe();
        assert!(rx.borrow().is_none());

        provider
            .create_account("budi@example.com", "rahasia-sekali")
            .await
            .unwrap();
        assert!(rx.borrow().is_some());

        provider.sign_out().await.unwrap();
        assert!(rx.borrow().is_none());
    }
}
