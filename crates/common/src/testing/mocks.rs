//! Mock implementations of the auth traits
//!
//! Both mocks count their calls so tests can assert on how often the network
//! would have been hit.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Duration as ChronoDuration;
use parking_lot::Mutex;
use teamlink_domain::Credential;

use crate::auth::{OAuthClientError, OAuthClientTrait, OAuthError, TokenIssuer};

/// Mock service token issuer.
///
/// Each issuance returns `"{prefix}-{n}"` valid for the configured lifetime.
/// An optional delay widens the race window in concurrency tests.
#[derive(Clone, Debug)]
pub struct MockTokenIssuer {
    calls: Arc<AtomicUsize>,
    prefix: String,
    ttl: ChronoDuration,
    delay: Duration,
    failure: Arc<Mutex<Option<(u16, String)>>>,
}

impl MockTokenIssuer {
    #[must_use]
    pub fn new(prefix: &str) -> Self {
        Self {
            calls: Arc::new(AtomicUsize::new(0)),
            prefix: prefix.to_string(),
            ttl: ChronoDuration::hours(1),
            delay: Duration::ZERO,
            failure: Arc::new(Mutex::new(None)),
        }
    }

    /// Lifetime of issued credentials
    #[must_use]
    pub fn with_ttl(mut self, ttl: ChronoDuration) -> Self {
        self.ttl = ttl;
        self
    }

    /// Sleep this long inside every issuance
    #[must_use]
    pub const fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Make subsequent issuances fail with the given status and body
    pub fn fail_with(&self, status: u16, body: &str) {
        *self.failure.lock() = Some((status, body.to_string()));
    }

    /// Number of issuances performed so far
    #[must_use]
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TokenIssuer for MockTokenIssuer {
    async fn issue(&self) -> Result<Credential, OAuthClientError> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        if let Some((status, body)) = self.failure.lock().clone() {
            return Err(OAuthClientError::UnexpectedStatus { status, body });
        }
        Ok(Credential::from_ttl(format!("{}-{n}", self.prefix), self.ttl))
    }
}

/// Mock OAuth client that simulates the code exchange without network calls.
#[derive(Clone, Debug, Default)]
pub struct MockOAuthClient {
    exchanges: Arc<AtomicUsize>,
    reject_with: Arc<Mutex<Option<String>>>,
}

impl MockOAuthClient {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the exchange fail with an `invalid_grant` error carrying `description`
    pub fn reject_exchange(&self, description: &str) {
        *self.reject_with.lock() = Some(description.to_string());
    }

    /// Number of code exchanges attempted
    #[must_use]
    pub fn exchange_count(&self) -> usize {
        self.exchanges.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl OAuthClientTrait for MockOAuthClient {
    fn authorization_url(&self, state: &str) -> String {
        format!("https://login.mock/authorize?client_id=test&state={state}")
    }

    async fn exchange_code(&self, code: &str) -> Result<Credential, OAuthClientError> {
        self.exchanges.fetch_add(1, Ordering::SeqCst);
        if let Some(description) = self.reject_with.lock().clone() {
            return Err(OAuthClientError::OAuthError(OAuthError {
                error: "invalid_grant".to_string(),
                error_description: Some(description),
            }));
        }
        Ok(Credential::from_ttl(format!("user-token-for-{code}"), ChronoDuration::hours(1)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn mock_issuer_counts_and_numbers_tokens() {
        let issuer = MockTokenIssuer::new("bot");
        assert_eq!(issuer.issue().await.unwrap().token(), "bot-1");
        assert_eq!(issuer.issue().await.unwrap().token(), "bot-2");
        assert_eq!(issuer.call_count(), 2);
    }

    #[tokio::test]
    async fn mock_oauth_client_can_reject() {
        let client = MockOAuthClient::new();
        client.reject_exchange("code expired");

        let err = client.exchange_code("abc").await.unwrap_err();
        assert_eq!(err.to_string(), "invalid_grant: code expired");
        assert_eq!(client.exchange_count(), 1);
    }
}
