//! Shared auth building blocks for TeamLink crates.
//!
//! - [`auth`]: secure token generation, OAuth clients, the shared service
//!   credential cache and the session credential store
//! - [`testing`]: counting mocks (`test-utils` feature)

#![forbid(unsafe_code)]
#![warn(rust_2018_idioms)]
#![warn(clippy::all, clippy::perf, clippy::complexity, clippy::suspicious)]

pub mod auth;

// Testing utilities
// ---------------------------------------------------------------
#[cfg(any(feature = "test-utils", test))]
pub mod testing;

pub use auth::{
    AccessTokenProvider, CredentialCache, OAuthClient, OAuthClientTrait, ServiceTokenIssuer, SessionCredentialStore,
    TokenIssuer,
};
