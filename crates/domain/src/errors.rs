//! Error types used throughout the application

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Failures of the interactive OAuth handshake
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "message")]
pub enum OAuthFailure {
    /// Returned `state` differs from the one issued at login (or none was issued)
    #[error("State parameter does not match")]
    StateMismatch,

    /// The identity provider redirected back with an `error` parameter
    #[error("OAuth error: {0}")]
    Provider(String),

    /// The authorization code could not be exchanged for a token
    #[error("Failed to exchange token: {0}")]
    ExchangeFailed(String),
}

/// Main error type for TeamLink
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "message")]
pub enum TeamLinkError {
    #[error("Authentication error: {0}")]
    Auth(String),

    #[error(transparent)]
    OAuth(#[from] OAuthFailure),

    #[error("{operation} failed (status {status}): {body}")]
    RemoteApi { operation: String, status: u16, body: String },

    #[error("{operation} did not complete after {attempts} attempts")]
    Timeout { operation: String, attempts: u32 },

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(String),

    #[error("Entropy source failure: {0}")]
    Entropy(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl TeamLinkError {
    /// Builds a [`TeamLinkError::RemoteApi`] from a non-success response.
    pub fn remote(operation: impl Into<String>, status: u16, body: impl Into<String>) -> Self {
        Self::RemoteApi { operation: operation.into(), status, body: body.into() }
    }

    /// Short machine-readable label, used as a structured logging field.
    pub const fn category(&self) -> &'static str {
        match self {
            Self::Auth(_) => "auth",
            Self::OAuth(_) => "oauth",
            Self::RemoteApi { .. } => "remote_api",
            Self::Timeout { .. } => "timeout",
            Self::Conflict(_) => "conflict",
            Self::Network(_) => "network",
            Self::NotFound(_) => "not_found",
            Self::InvalidInput(_) => "invalid_input",
            Self::Config(_) => "config",
            Self::Io(_) => "io",
            Self::Entropy(_) => "entropy",
            Self::Internal(_) => "internal",
        }
    }
}

impl From<std::io::Error> for TeamLinkError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for TeamLinkError {
    fn from(err: serde_json::Error) -> Self {
        Self::Internal(format!("JSON error: {err}"))
    }
}

/// Result type alias for TeamLink operations
pub type Result<T> = std::result::Result<T, TeamLinkError>;
