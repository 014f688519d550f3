//! Configuration loading and management
//!
//! This module provides utilities for loading application configuration
//! from environment variables and for writing provisioned IDs back to the
//! env file.

pub mod env_file;
pub mod loader;

// Re-export commonly used items
pub use env_file::EnvFileStore;
pub use loader::{load, load_from_env, load_from_lookup};
