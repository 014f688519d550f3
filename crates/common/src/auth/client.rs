//! OAuth 2.0 clients
//!
//! - [`OAuthClient`]: authorization code flow for signed-in users
//! - [`ServiceTokenIssuer`]: client-credentials grant for the bot identity

use async_trait::async_trait;
use reqwest::Client;
use teamlink_domain::{Credential, TeamLinkError};
use tracing::{debug, warn};

use super::traits::{OAuthClientTrait, TokenIssuer};
use super::types::{OAuthConfig, OAuthError, ServiceCredentialsConfig, TokenResponse};

/// Error type for OAuth client operations
#[derive(Debug)]
pub enum OAuthClientError {
    /// HTTP request failed
    RequestFailed(reqwest::Error),

    /// OAuth server returned a structured error
    OAuthError(OAuthError),

    /// Non-success response without an OAuth error body
    UnexpectedStatus { status: u16, body: String },

    /// Failed to parse response
    ParseError(String),
}

impl std::fmt::Display for OAuthClientError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::RequestFailed(e) => write!(f, "HTTP request failed: {e}"),
            Self::OAuthError(e) => write!(f, "{e}"),
            Self::UnexpectedStatus { status, body } => write!(f, "status {status}: {body}"),
            Self::ParseError(msg) => write!(f, "Parse error: {msg}"),
        }
    }
}

impl std::error::Error for OAuthClientError {}

impl From<reqwest::Error> for OAuthClientError {
    fn from(err: reqwest::Error) -> Self {
        Self::RequestFailed(err)
    }
}

impl From<OAuthClientError> for TeamLinkError {
    fn from(err: OAuthClientError) -> Self {
        match err {
            OAuthClientError::RequestFailed(e) => Self::Network(e.to_string()),
            OAuthClientError::OAuthError(e) => Self::Auth(e.to_string()),
            OAuthClientError::UnexpectedStatus { status, body } => Self::remote("token request", status, body),
            OAuthClientError::ParseError(msg) => Self::Internal(format!("token response: {msg}")),
        }
    }
}

fn http_client() -> Client {
    Client::builder()
        .timeout(std::time::Duration::from_secs(30))
        .build()
        .unwrap_or_else(|_| Client::new())
}

/// POST a form to a token endpoint and decode the credential
async fn request_token(
    client: &Client,
    token_url: &str,
    params: &[(&str, &str)],
) -> Result<Credential, OAuthClientError> {
    let response = client.post(token_url).form(params).send().await?;
    let status = response.status();

    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        warn!(status = status.as_u16(), "token endpoint rejected request");
        return Err(serde_json::from_str::<OAuthError>(&body).map_or(
            OAuthClientError::UnexpectedStatus { status: status.as_u16(), body },
            OAuthClientError::OAuthError,
        ));
    }

    let token_response: TokenResponse =
        response.json().await.map_err(|e| OAuthClientError::ParseError(e.to_string()))?;

    Credential::try_from(token_response)
}

/// OAuth 2.0 authorization code client (confidential, uses client secret)
#[derive(Debug, Clone)]
pub struct OAuthClient {
    config: OAuthConfig,
    client: Client,
}

impl OAuthClient {
    #[must_use]
    pub fn new(config: OAuthConfig) -> Self {
        Self { config, client: http_client() }
    }

    /// Generate the authorization URL for browser-based login
    ///
    /// `state` is echoed back by the provider and must be validated in the
    /// callback.
    #[must_use]
    pub fn authorization_url(&self, state: &str) -> String {
        let scope_string = self.config.scope_string();

        let mut params = vec![
            ("response_type", "code"),
            ("client_id", self.config.client_id.as_str()),
            ("redirect_uri", self.config.redirect_uri.as_str()),
            ("scope", scope_string.as_str()),
            ("state", state),
        ];
        params.extend(self.config.extra_authorize_params().iter().copied());

        let query_string = params
            .iter()
            .map(|(k, v)| format!("{k}={}", urlencoding::encode(v)))
            .collect::<Vec<_>>()
            .join("&");

        format!("{}?{}", self.config.authorize_url, query_string)
    }

    /// Exchange authorization code for a user credential
    ///
    /// # Errors
    /// Returns error if the token request fails, the provider rejects the
    /// code or the response cannot be parsed
    pub async fn exchange_code(&self, code: &str) -> Result<Credential, OAuthClientError> {
        debug!("exchanging authorization code");
        let params = [
            ("grant_type", "authorization_code"),
            ("client_id", self.config.client_id.as_str()),
            ("client_secret", self.config.client_secret.as_str()),
            ("code", code),
            ("redirect_uri", self.config.redirect_uri.as_str()),
        ];
        request_token(&self.client, &self.config.token_url, &params).await
    }

    #[must_use]
    pub fn config(&self) -> &OAuthConfig {
        &self.config
    }
}

#[async_trait]
impl OAuthClientTrait for OAuthClient {
    fn authorization_url(&self, state: &str) -> String {
        self.authorization_url(state)
    }

    async fn exchange_code(&self, code: &str) -> Result<Credential, OAuthClientError> {
        self.exchange_code(code).await
    }
}

/// Client-credentials issuer for the bot's service token
#[derive(Debug, Clone)]
pub struct ServiceTokenIssuer {
    config: ServiceCredentialsConfig,
    client: Client,
}

impl ServiceTokenIssuer {
    #[must_use]
    pub fn new(config: ServiceCredentialsConfig) -> Self {
        Self { config, client: http_client() }
    }
}

#[async_trait]
impl TokenIssuer for ServiceTokenIssuer {
    async fn issue(&self) -> Result<Credential, OAuthClientError> {
        debug!(scope = %self.config.scope, "requesting service token");
        let params = [
            ("grant_type", "client_credentials"),
            ("client_id", self.config.client_id.as_str()),
            ("client_secret", self.config.client_secret.as_str()),
            ("scope", self.config.scope.as_str()),
        ];
        request_token(&self.client, &self.config.token_url, &params).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> OAuthConfig {
        OAuthConfig {
            authorize_url: "https://login.example.com/common/oauth2/v2.0/authorize".to_string(),
            token_url: "https://login.example.com/common/oauth2/v2.0/token".to_string(),
            client_id: "test_client_id".to_string(),
            client_secret: "secret".to_string(),
            redirect_uri: "http://localhost:3958/callback".to_string(),
            scopes: vec!["openid".to_string(), "User.Read".to_string()],
        }
    }

    /// Validates the authorization URL carries the state and forced consent.
    ///
    /// Assertions:
    /// - URL targets the configured authorize endpoint.
    /// - `state`, `prompt=consent` and `access_type=offline` are present.
    /// - Redirect URI and scopes are percent-encoded.
    #[test]
    fn test_authorization_url() {
        let client = OAuthClient::new(test_config());
        let url = client.authorization_url("xyz-state");

        assert!(url.starts_with("https://login.example.com/common/oauth2/v2.0/authorize?"));
        assert!(url.contains("response_type=code"));
        assert!(url.contains("client_id=test_client_id"));
        assert!(url.contains("state=xyz-state"));
        assert!(url.contains("prompt=consent"));
        assert!(url.contains("access_type=offline"));
        assert!(url.contains("redirect_uri=http%3A%2F%2Flocalhost%3A3958%2Fcallback"));
        assert!(url.contains("scope=openid%20User.Read"));
    }

    #[test]
    fn test_client_error_maps_to_domain_error() {
        let err: TeamLinkError = OAuthClientError::UnexpectedStatus { status: 503, body: "down".into() }.into();
        assert_eq!(err, TeamLinkError::remote("token request", 503, "down"));
    }
}
