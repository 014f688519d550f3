//! Mapping of domain errors onto plain-text HTTP responses

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use teamlink_domain::{OAuthFailure, TeamLinkError};
use tracing::{error, warn};

/// Handler error rendered as `status` with `message` as the body
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppError {
    status: StatusCode,
    message: String,
}

impl AppError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self { status, message: message.into() }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }

    /// Prepend `prefix: ` to the message, keeping the status
    #[must_use]
    pub fn with_prefix(mut self, prefix: &str) -> Self {
        self.message = format!("{prefix}: {}", self.message);
        self
    }

    pub const fn status(&self) -> StatusCode {
        self.status
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// HTTP status for a domain error
pub const fn status_for(err: &TeamLinkError) -> StatusCode {
    match err {
        TeamLinkError::Auth(_) => StatusCode::UNAUTHORIZED,
        TeamLinkError::OAuth(OAuthFailure::StateMismatch | OAuthFailure::Provider(_))
        | TeamLinkError::InvalidInput(_) => StatusCode::BAD_REQUEST,
        TeamLinkError::OAuth(OAuthFailure::ExchangeFailed(_))
        | TeamLinkError::Config(_)
        | TeamLinkError::Io(_)
        | TeamLinkError::Entropy(_)
        | TeamLinkError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        TeamLinkError::RemoteApi { .. } | TeamLinkError::Network(_) => StatusCode::BAD_GATEWAY,
        TeamLinkError::Timeout { .. } => StatusCode::GATEWAY_TIMEOUT,
        TeamLinkError::Conflict(_) => StatusCode::CONFLICT,
        TeamLinkError::NotFound(_) => StatusCode::NOT_FOUND,
    }
}

impl From<TeamLinkError> for AppError {
    fn from(err: TeamLinkError) -> Self {
        let status = status_for(&err);
        if status.is_server_error() {
            error!(category = err.category(), error = %err, "request failed");
        } else {
            warn!(category = err.category(), error = %err, "request rejected");
        }
        Self::new(status, err.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        (self.status, self.message).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn oauth_failures_split_between_client_and_server_errors() {
        assert_eq!(status_for(&OAuthFailure::StateMismatch.into()), StatusCode::BAD_REQUEST);
        assert_eq!(status_for(&OAuthFailure::Provider("invalid_scope".into()).into()), StatusCode::BAD_REQUEST);
        assert_eq!(
            status_for(&OAuthFailure::ExchangeFailed("invalid_grant".into()).into()),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn remote_failures_map_to_gateway_statuses() {
        assert_eq!(status_for(&TeamLinkError::remote("create team", 500, "")), StatusCode::BAD_GATEWAY);
        assert_eq!(
            status_for(&TeamLinkError::Timeout { operation: "team creation".into(), attempts: 30 }),
            StatusCode::GATEWAY_TIMEOUT
        );
        assert_eq!(status_for(&TeamLinkError::Conflict("Team already exists".into())), StatusCode::CONFLICT);
    }

    #[test]
    fn message_is_the_error_text_verbatim() {
        let err = AppError::from(TeamLinkError::OAuth(OAuthFailure::StateMismatch));
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.message(), "State parameter does not match");
    }

    #[test]
    fn prefix_keeps_status() {
        let err = AppError::from(TeamLinkError::Conflict("Team already exists".into()))
            .with_prefix("Failed to setup environment");
        assert_eq!(err.status(), StatusCode::CONFLICT);
        assert_eq!(err.message(), "Failed to setup environment: Conflict: Team already exists");
    }
}
