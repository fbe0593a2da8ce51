//! Identity and session management for the VetSupport family companion
//!
//! This crate owns the authenticated principal of the current process:
//! the [`IdentityProvider`] interface to the external identity service,
//! an HTTP implementation of it, an in-memory implementation for tests
//! and demos, and the [`SessionStore`] state machine that the rest of
//! the SDK observes for sign-in and sign-out events.

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod provider;
pub mod store;

pub use provider::{HttpIdentityProvider, IdentityProvider, MockIdentityProvider};
pub use store::{AuthEvent, SessionStore};

/// Error type
#[derive(Error, Debug)]
pub enum AuthError {
    /// The identity provider rejected the supplied credentials.
    #[error("invalid email or password")]
    InvalidCredentials,

    /// The identity provider could not be reached.
    #[error("identity provider unreachable: {0}")]
    ProviderUnavailable(#[from] reqwest::Error),

    /// The identity provider answered with an unexpected error.
    #[error("identity provider error: {0}")]
    Api(String),

    #[error("JSON serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("no active session")]
    MissingSession,

    /// A second sign-in was submitted while one was still in flight.
    #[error("a sign-in attempt is already in progress")]
    AuthenticationInProgress,
}

/// The authenticated principal of the current session.
///
/// `user_metadata` carries provider-side hints such as `full_name`,
/// `relationship` and `connected_veteran`, which the profile store uses
/// when provisioning a first-time profile.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Identity {
    pub id: String,
    pub email: Option<String>,
    #[serde(default)]
    pub user_metadata: serde_json::Value,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

/// Session information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: String,
    #[serde(default)]
    pub expires_in: i64,
    #[serde(default)]
    pub token_type: String,
    pub user: Identity,
}

/// Authentication state of the [`SessionStore`].
///
/// `Authenticating` is transient and blocks redundant submissions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthState {
    Unauthenticated,
    Authenticating,
    Authenticated,
}
