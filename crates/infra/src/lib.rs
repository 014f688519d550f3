//! # TeamLink Infrastructure
//!
//! Everything that talks to the outside world.
//!
//! This crate contains:
//! - Environment configuration loading and the durable env file store
//! - The retrying HTTP client
//! - Microsoft Graph provisioning and Bot Framework messaging
//!
//! ## Architecture
//! - Builds on the auth primitives in `teamlink-common`
//! - Produces and consumes the types in `teamlink-domain`

pub mod config;
pub mod errors;
pub mod http;
pub mod teams;

pub use config::EnvFileStore;
pub use errors::InfraError;
pub use http::{HttpClient, HttpClientBuilder};
pub use teams::{BotConnector, ChannelNotifier, ChannelSlot, GraphClient, ProvisioningWorkflow, TeamSelection};
