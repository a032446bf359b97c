//! The credential provider seam.
//!
//! The realtime transport and REST clients consume credentials through
//! [`CredentialProvider`]; they never touch storage or login flows directly.
//! An `Unauthenticated` error from any method means "do not attempt the
//! operation" — it is never surfaced to UI code as a failure.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::errors::{AuthError, Result};

/// Authenticated user identity.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Server-assigned numeric id; part of the socket URL.
    pub id: i64,
    /// Account email.
    pub email: String,
    /// Display name.
    pub name: String,
}

/// Supplies the bearer token and current-user identity.
#[async_trait]
pub trait CredentialProvider: Send + Sync {
    /// The bearer token, or `Unauthenticated` if none is stored.
    async fn token(&self) -> Result<String>;

    /// The current user's identity, or `Unauthenticated`.
    async fn current_user(&self) -> Result<User>;

    /// Drop any stored credential.
    async fn logout(&self) -> Result<()>;
}

/// Fixed in-memory credentials, for tests and embedded use.
#[derive(Clone, Debug)]
pub struct StaticCredentials {
    token: Option<String>,
    user: User,
}

impl StaticCredentials {
    /// Create a provider that always yields the given token and user.
    pub fn new(token: impl Into<String>, user: User) -> Self {
        Self {
            token: Some(token.into()),
            user,
        }
    }

    /// Create a provider that always reports `Unauthenticated`.
    #[must_use]
    pub fn logged_out() -> Self {
        Self {
            token: None,
            user: User {
                id: 0,
                email: String::new(),
                name: String::new(),
            },
        }
    }
}

#[async_trait]
impl CredentialProvider for StaticCredentials {
    async fn token(&self) -> Result<String> {
        self.token.clone().ok_or(AuthError::Unauthenticated)
    }

    async fn current_user(&self) -> Result<User> {
        if self.token.is_none() {
            return Err(AuthError::Unauthenticated);
        }
        Ok(self.user.clone())
    }

    async fn logout(&self) -> Result<()> {
        Ok(())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn user() -> User {
        User {
            id: 7,
            email: "parent@example.com".into(),
            name: "Parent".into(),
        }
    }

    #[tokio::test]
    async fn static_credentials_yield_token_and_user() {
        let creds = StaticCredentials::new("secret", user());
        assert_eq!(creds.token().await.unwrap(), "secret");
        assert_eq!(creds.current_user().await.unwrap().id, 7);
    }

    #[tokio::test]
    async fn logged_out_is_unauthenticated() {
        let creds = StaticCredentials::logged_out();
        assert!(matches!(
            creds.token().await.unwrap_err(),
            AuthError::Unauthenticated
        ));
        assert!(matches!(
            creds.current_user().await.unwrap_err(),
            AuthError::Unauthenticated
        ));
    }

    #[test]
    fn user_serde_roundtrip() {
        let u = user();
        let json = serde_json::to_string(&u).unwrap();
        let back: User = serde_json::from_str(&json).unwrap();
        assert_eq!(u, back);
    }
}
