//! Authorization code login for browser users
//!
//! [`AuthSessionFlow`] owns the protocol decisions (state checks, provider
//! errors, code exchange, session creation). The HTTP handlers only move
//! values in and out of cookies.

use std::sync::Arc;

use serde::Deserialize;
use teamlink_common::auth::{generate_session_id, generate_state, validate_state};
use teamlink_common::{OAuthClientTrait, SessionCredentialStore};
use teamlink_domain::{Credential, OAuthFailure, Result, TeamLinkError};
use tracing::{info, instrument, warn};

/// Provider error meaning the user declined consent
const ACCESS_DENIED: &str = "access_denied";

/// Query parameters of `GET /callback`
#[derive(Debug, Default, Deserialize)]
pub struct CallbackParams {
    pub code: Option<String>,
    pub state: Option<String>,
    pub error: Option<String>,
    pub error_description: Option<String>,
}

/// Where to send the browser to start a login
#[derive(Debug, Clone)]
pub struct LoginRedirect {
    pub state: String,
    pub url: String,
}

#[derive(Debug)]
pub enum CallbackOutcome {
    /// The user declined; start over without exchanging anything
    Denied,
    Authenticated { session_id: String, credential: Credential },
}

pub struct AuthSessionFlow {
    oauth: Arc<dyn OAuthClientTrait>,
    sessions: Arc<SessionCredentialStore>,
}

impl AuthSessionFlow {
    pub fn new(oauth: Arc<dyn OAuthClientTrait>, sessions: Arc<SessionCredentialStore>) -> Self {
        Self { oauth, sessions }
    }

    /// Credential of a still-live session, if the browser presented one
    pub fn active_session(&self, session_id: Option<&str>) -> Option<Credential> {
        session_id.and_then(|id| self.sessions.get(id).ok())
    }

    /// Issue a fresh state and build the provider authorization URL
    ///
    /// # Errors
    /// [`TeamLinkError::Entropy`] when the OS random source fails.
    pub fn begin_login(&self) -> Result<LoginRedirect> {
        let state = generate_state()?;
        let url = self.oauth.authorization_url(&state);
        info!("login started");
        Ok(LoginRedirect { state, url })
    }

    /// Validate the provider redirect and open a session
    ///
    /// `expected_state` is the value from the browser's state cookie; a
    /// missing cookie never matches.
    ///
    /// # Errors
    /// - [`OAuthFailure::Provider`] for provider errors other than `access_denied`
    /// - [`OAuthFailure::StateMismatch`] when the state does not match
    /// - [`TeamLinkError::InvalidInput`] when no code was returned
    /// - [`OAuthFailure::ExchangeFailed`] when the code is rejected
    #[instrument(skip_all)]
    pub async fn complete_login(
        &self,
        params: &CallbackParams,
        expected_state: Option<&str>,
    ) -> Result<CallbackOutcome> {
        if let Some(error) = params.error.as_deref().filter(|e| !e.is_empty()) {
            if error == ACCESS_DENIED {
                info!("user declined consent");
                return Ok(CallbackOutcome::Denied);
            }
            warn!(error, description = params.error_description.as_deref().unwrap_or_default(), "provider error");
            return Err(OAuthFailure::Provider(error.to_string()).into());
        }

        let received = params.state.as_deref().unwrap_or_default();
        let state_ok = expected_state.is_some_and(|expected| !expected.is_empty() && validate_state(expected, received));
        if !state_ok {
            warn!(cookie_present = expected_state.is_some(), "state mismatch on callback");
            return Err(OAuthFailure::StateMismatch.into());
        }

        let code = params
            .code
            .as_deref()
            .filter(|c| !c.is_empty())
            .ok_or_else(|| TeamLinkError::InvalidInput("Missing authorization code".to_string()))?;

        let credential = self
            .oauth
            .exchange_code(code)
            .await
            .map_err(|err| OAuthFailure::ExchangeFailed(err.to_string()))?;

        let session_id = generate_session_id()?;
        self.sessions.put(&session_id, credential.clone());
        info!(expires_at = %credential.expires_at(), "user signed in");

        Ok(CallbackOutcome::Authenticated { session_id, credential })
    }

    /// Forget the session; returns whether one existed
    pub fn logout(&self, session_id: Option<&str>) -> bool {
        let removed = session_id.is_some_and(|id| self.sessions.remove(id));
        info!(removed, "user signed out");
        removed
    }
}
