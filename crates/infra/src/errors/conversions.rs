//! Conversions from external infrastructure errors into domain errors.

use reqwest::Error as HttpError;
use teamlink_domain::TeamLinkError;

/// Error newtype that keeps conversions on the infrastructure side and can be
/// converted back into the domain error.
#[derive(Debug)]
pub struct InfraError(pub TeamLinkError);

impl From<InfraError> for TeamLinkError {
    fn from(value: InfraError) -> Self {
        value.0
    }
}

impl From<TeamLinkError> for InfraError {
    fn from(value: TeamLinkError) -> Self {
        Self(value)
    }
}

/// Transport-level failures only; status handling belongs to the callers
/// that know which statuses their endpoint treats as success.
impl From<HttpError> for InfraError {
    fn from(err: HttpError) -> Self {
        let mapped = if err.is_timeout() {
            TeamLinkError::Network("HTTP request timed out".into())
        } else if err.is_connect() {
            TeamLinkError::Network(format!("HTTP connection failure: {err}"))
        } else if err.is_decode() {
            TeamLinkError::Internal(format!("failed to decode HTTP response: {err}"))
        } else if err.is_builder() {
            TeamLinkError::Internal(format!("invalid HTTP request: {err}"))
        } else {
            TeamLinkError::Network(format!("HTTP error: {err}"))
        };
        Self(mapped)
    }
}
