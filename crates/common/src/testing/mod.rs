//! Testing utilities and helpers
//!
//! - **[`mocks`]**: counting mock implementations of the auth traits
//!
//! Enabled for this crate's own tests and, through the `test-utils` feature,
//! for downstream crates.

pub mod mocks;

pub use mocks::{MockOAuthClient, MockTokenIssuer};
