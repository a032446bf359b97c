//! # cradle-auth
//!
//! Authentication for the Cradle monitor client:
//!
//! - [`CredentialProvider`]: the trait the realtime transport and REST
//!   clients consume; failure mode `Unauthenticated` means "do not attempt
//!   connect"
//! - [`TokenStore`]: file-backed single opaque token (`~/.cradle/auth.json`,
//!   0o600)
//! - [`AuthClient`]: REST client for login/register/me, implementing the
//!   provider on top of the store
//! - [`StaticCredentials`]: in-memory provider for tests and embedding

#![deny(unsafe_code)]

pub mod client;
pub mod errors;
pub mod provider;
pub mod storage;

pub use client::{AuthClient, Session};
pub use errors::{AuthError, Result};
pub use provider::{CredentialProvider, StaticCredentials, User};
pub use storage::TokenStore;
