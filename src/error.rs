//! Error handling for the family companion client

use std::fmt;

use thiserror::Error;
use vetsupport_family_auth::AuthError;
use vetsupport_family_link::LinkError;
use vetsupport_family_profile::ProfileError;

/// Unified error type for the family companion client
#[derive(Error, Debug)]
pub enum Error {
    /// Authentication and session errors
    #[error("authentication error: {0}")]
    Auth(#[from] AuthError),

    /// Family profile errors
    #[error("profile error: {0}")]
    Profile(#[from] ProfileError),

    /// Veteran connection errors
    #[error("veteran link error: {0}")]
    Link(#[from] LinkError),

    /// Configuration errors
    #[error("configuration error: {0}")]
    Config(String),

    /// Network or HTTP related errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// URL parsing errors
    #[error("URL error: {0}")]
    Url(#[from] url::ParseError),
}

impl Error {
    /// Create a new configuration error
    pub fn config<T: fmt::Display>(msg: T) -> Self {
        Error::Config(msg.to_string())
    }
}
