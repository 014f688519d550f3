//! Traits for OAuth and token issuance
//!
//! These traits enable dependency injection and testing by abstracting
//! external dependencies (the identity provider and the service token
//! endpoint).

use async_trait::async_trait;
use teamlink_domain::{Credential, Result};

use super::client::OAuthClientError;

/// Trait for the interactive OAuth client
#[async_trait]
pub trait OAuthClientTrait: Send + Sync {
    /// Build the provider authorize URL carrying `state`
    fn authorization_url(&self, state: &str) -> String;

    /// Exchange an authorization code for a user credential
    ///
    /// # Errors
    /// Returns error if the request fails or the provider rejects the code
    async fn exchange_code(&self, code: &str) -> std::result::Result<Credential, OAuthClientError>;
}

/// Source of fresh service credentials (client-credentials grant)
#[async_trait]
pub trait TokenIssuer: Send + Sync {
    /// Request a new credential from the issuer
    ///
    /// # Errors
    /// Returns error on transport failure or a non-success response
    async fn issue(&self) -> std::result::Result<Credential, OAuthClientError>;
}

/// Anything that can hand out a currently valid bearer token
#[async_trait]
pub trait AccessTokenProvider: Send + Sync {
    /// Return a token valid at the time of the call
    ///
    /// # Errors
    /// Returns error if a fresh token could not be obtained
    async fn access_token(&self) -> Result<String>;

    /// Forget any cached token so the next call fetches a new one
    async fn invalidate(&self);
}
