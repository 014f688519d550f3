//! Shared service credential with single-flight refresh
//!
//! One bearer token is shared by every caller of the bot channel. Reads take
//! the fast path under a read lock; a missing or expired credential is
//! replaced under the write lock after re-checking, so concurrent callers
//! that observe expiry together trigger exactly one issuance.

use std::sync::Arc;

use async_trait::async_trait;
use teamlink_domain::{Credential, Result, TeamLinkError};
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use super::traits::{AccessTokenProvider, TokenIssuer};

/// Expiry-aware cache for a single service credential
pub struct CredentialCache<I: TokenIssuer + 'static> {
    issuer: Arc<I>,
    current: RwLock<Option<Credential>>,
}

impl<I: TokenIssuer + 'static> CredentialCache<I> {
    #[must_use]
    pub fn new(issuer: Arc<I>) -> Self {
        Self { issuer, current: RwLock::new(None) }
    }

    /// Return a token that is valid now, issuing a new one if needed.
    ///
    /// Issuance failures surface to the caller that performed the refresh.
    /// Callers that were waiting on the write lock re-check and refresh
    /// themselves, so a failure is never cached.
    ///
    /// # Errors
    /// Returns error if the issuer fails or hands back an already expired
    /// credential
    pub async fn get(&self) -> Result<String> {
        {
            let current = self.current.read().await;
            if let Some(credential) = current.as_ref().filter(|c| c.is_valid()) {
                return Ok(credential.token().to_string());
            }
        }

        let mut current = self.current.write().await;

        // Another caller may have refreshed while we waited for the write lock
        if let Some(credential) = current.as_ref().filter(|c| c.is_valid()) {
            debug!("service credential refreshed by a concurrent caller");
            return Ok(credential.token().to_string());
        }

        let fresh = self.issuer.issue().await.map_err(|e| {
            warn!(error = %e, "service credential issuance failed");
            TeamLinkError::from(e)
        })?;

        if !fresh.is_valid() {
            return Err(TeamLinkError::Auth("issuer returned an already expired credential".to_string()));
        }

        info!(expires_at = %fresh.expires_at(), "service credential refreshed");
        let token = fresh.token().to_string();
        *current = Some(fresh);
        Ok(token)
    }

    /// Drop the cached credential (e.g. after the remote side rejected it)
    pub async fn invalidate(&self) {
        *self.current.write().await = None;
        debug!("service credential invalidated");
    }
}

#[async_trait]
impl<I: TokenIssuer + 'static> AccessTokenProvider for CredentialCache<I> {
    async fn access_token(&self) -> Result<String> {
        self.get().await
    }

    async fn invalidate(&self) {
        Self::invalidate(self).await;
    }
}
