//! OAuth 2.0 types and structures
//!
//! Wire formats for the identity provider's token endpoint plus the client
//! configuration derived from [`OAuthSettings`].

use std::fmt;

use serde::Deserialize;
use teamlink_domain::{Credential, OAuthSettings};

use super::client::OAuthClientError;

/// OAuth token response from authorization server
///
/// Standard OAuth 2.0 token response format (RFC 6749). Only the access
/// token and its lifetime are kept; refresh and ID tokens are ignored.
#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub id_token: Option<String>,
    #[serde(default = "default_token_type")]
    pub token_type: String,
    pub expires_in: i64,
    #[serde(default)]
    pub scope: Option<String>,
}

fn default_token_type() -> String {
    "Bearer".to_string()
}

/// Non-positive or implausibly long lifetimes are rejected as a parse error.
impl TryFrom<TokenResponse> for Credential {
    type Error = OAuthClientError;

    fn try_from(response: TokenResponse) -> Result<Self, Self::Error> {
        let expires_in = response.expires_in;
        Self::expiring_in(response.access_token, expires_in)
            .ok_or_else(|| OAuthClientError::ParseError(format!("unusable expires_in: {expires_in}")))
    }
}

/// OAuth error response (RFC 6749 section 5.2)
#[derive(Debug, Clone, Deserialize)]
pub struct OAuthError {
    pub error: String,
    #[serde(default)]
    pub error_description: Option<String>,
}

impl fmt::Display for OAuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.error_description {
            Some(description) => write!(f, "{}: {description}", self.error),
            None => f.write_str(&self.error),
        }
    }
}

/// OAuth configuration for the authorization code flow
#[derive(Clone)]
pub struct OAuthConfig {
    pub authorize_url: String,
    pub token_url: String,
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: String,
    pub scopes: Vec<String>,
}

impl OAuthConfig {
    #[must_use]
    pub fn from_settings(settings: &OAuthSettings) -> Self {
        Self {
            authorize_url: settings.authorize_endpoint(),
            token_url: settings.token_endpoint(),
            client_id: settings.client_id.clone(),
            client_secret: settings.client_secret.clone(),
            redirect_uri: settings.redirect_url.clone(),
            scopes: settings.scopes.clone(),
        }
    }

    /// Scopes as the space-separated string the provider expects
    #[must_use]
    pub fn scope_string(&self) -> String {
        self.scopes.join(" ")
    }

    /// Provider-specific parameters appended to the authorize request.
    ///
    /// Consent is forced on every login and offline access requested.
    #[must_use]
    pub fn extra_authorize_params(&self) -> &'static [(&'static str, &'static str)] {
        &[("response_mode", "query"), ("prompt", "consent"), ("access_type", "offline")]
    }
}

impl fmt::Debug for OAuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OAuthConfig")
            .field("authorize_url", &self.authorize_url)
            .field("token_url", &self.token_url)
            .field("client_id", &self.client_id)
            .field("client_secret", &"[REDACTED]")
            .field("redirect_uri", &self.redirect_uri)
            .field("scopes", &self.scopes)
            .finish()
    }
}

/// Client-credentials grant parameters for the service (bot) token
#[derive(Clone)]
pub struct ServiceCredentialsConfig {
    pub token_url: String,
    pub client_id: String,
    pub client_secret: String,
    pub scope: String,
}

impl fmt::Debug for ServiceCredentialsConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceCredentialsConfig")
            .field("token_url", &self.token_url)
            .field("client_id", &self.client_id)
            .field("client_secret", &"[REDACTED]")
            .field("scope", &self.scope)
            .finish()
    }
}
