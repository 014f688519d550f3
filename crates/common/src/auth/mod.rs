//! OAuth 2.0 and credential lifecycle
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────┐
//! │  OAuthClient         │  authorization code flow (user login)
//! └──────────────────────┘
//! ┌──────────────────────┐      ┌────────────────────┐
//! │  CredentialCache     │ ───► │ ServiceTokenIssuer │  client credentials
//! └──────────────────────┘      └────────────────────┘
//! ┌──────────────────────┐
//! │ SessionCredentialStore│  sessionID -> user credential
//! └──────────────────────┘
//!          ▲
//!          └── secure_token  (state, session IDs, cookie keys)
//! ```
//!
//! # Module Organization
//!
//! - **[`types`]**: wire types (`TokenResponse`, `OAuthError`) and configs
//! - **[`secure_token`]**: CSPRNG-backed keys, states and session IDs
//! - **[`client`]**: OAuth HTTP clients for both grants
//! - **[`credential_cache`]**: shared service credential with single-flight
//!   refresh
//! - **[`session_store`]**: in-memory session map with TTL eviction
//! - **[`traits`]**: seams for dependency injection and mocking

pub mod client;
pub mod credential_cache;
pub mod secure_token;
pub mod session_store;
pub mod traits;
pub mod types;

// Re-export commonly used types and functions
pub use client::{OAuthClient, OAuthClientError, ServiceTokenIssuer};
pub use credential_cache::CredentialCache;
pub use secure_token::{
    generate_secure_key, generate_session_id, generate_state, random_bytes, validate_state, EntropyError,
};
pub use session_store::{SessionCredentialStore, SessionStoreError};
pub use traits::{AccessTokenProvider, OAuthClientTrait, TokenIssuer};
pub use types::{OAuthConfig, OAuthError, ServiceCredentialsConfig, TokenResponse};
