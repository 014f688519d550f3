//! # TeamLink Domain
//!
//! Business domain types and models for TeamLink.
//!
//! This crate contains:
//! - Domain error types and Result definitions
//! - Credentials and provisioning states
//! - Configuration structures
//! - Domain constants
//!
//! ## Architecture
//! - No dependencies on other TeamLink crates
//! - Only external dependencies allowed
//! - Pure domain models and data structures

pub mod config;
pub mod constants;
pub mod errors;
pub mod macros;
pub mod types;

// Re-export commonly used items
pub use config::*;
pub use errors::*;
pub use types::*;
