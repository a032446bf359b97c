//! REST authentication client.
//!
//! Thin wrapper over the `/auth/*` endpoints. A successful login persists
//! the returned token through [`TokenStore`]; the client then implements
//! [`CredentialProvider`] on top of the store.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::{AuthError, Result};
use crate::provider::{CredentialProvider, User};
use crate::storage::TokenStore;

/// Login/register request body.
#[derive(Debug, Serialize)]
struct CredentialsBody<'a> {
    email: &'a str,
    password: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<&'a str>,
}

/// Response body of `/auth/login` and `/auth/register`.
#[derive(Debug, Deserialize)]
struct AuthResponse {
    access_token: String,
    #[allow(dead_code)]
    token_type: Option<String>,
    user: Option<User>,
}

/// Authenticated session established by [`AuthClient::login`].
#[derive(Clone, Debug)]
pub struct Session {
    /// The bearer token, also persisted to the store.
    pub access_token: String,
    /// User identity when the server includes it.
    pub user: Option<User>,
}

/// REST client for the auth endpoints.
pub struct AuthClient {
    http: reqwest::Client,
    base_url: String,
    store: TokenStore,
}

impl AuthClient {
    /// Create a client for the given API base URL.
    pub fn new(base_url: impl Into<String>, store: TokenStore, timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_owned(),
            store,
        })
    }

    /// Authenticate and persist the returned token.
    pub async fn login(&self, email: &str, password: &str) -> Result<Session> {
        let body = CredentialsBody {
            email,
            password,
            name: None,
        };
        let response = self.post_credentials("/auth/login", &body).await?;
        self.store.save(&response.access_token)?;
        debug!(email, "login succeeded");
        Ok(Session {
            access_token: response.access_token,
            user: response.user,
        })
    }

    /// Create an account. Does not persist a token; callers log in after.
    pub async fn register(&self, email: &str, password: &str, name: &str) -> Result<()> {
        let body = CredentialsBody {
            email,
            password,
            name: Some(name),
        };
        let _ = self.post_credentials("/auth/register", &body).await?;
        Ok(())
    }

    /// Fetch the current user's identity with the stored token.
    pub async fn me(&self) -> Result<User> {
        let token = self.store.load().ok_or(AuthError::Unauthenticated)?;
        let response = self
            .http
            .get(format!("{}/auth/me", self.base_url))
            .bearer_auth(token)
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(AuthError::Api {
                status: status.as_u16(),
                message,
            });
        }
        Ok(response.json().await?)
    }

    async fn post_credentials(
        &self,
        path: &str,
        body: &CredentialsBody<'_>,
    ) -> Result<AuthResponse> {
        let response = self
            .http
            .post(format!("{}{path}", self.base_url))
            .json(body)
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(AuthError::Api {
                status: status.as_u16(),
                message,
            });
        }
        Ok(response.json().await?)
    }
}

#[async_trait]
impl CredentialProvider for AuthClient {
    async fn token(&self) -> Result<String> {
        self.store.load().ok_or(AuthError::Unauthenticated)
    }

    async fn current_user(&self) -> Result<User> {
        self.me().await
    }

    async fn logout(&self) -> Result<()> {
        self.store.clear()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
