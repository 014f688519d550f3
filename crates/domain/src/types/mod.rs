//! Domain types and models

pub mod credential;
pub mod provisioning;

pub use credential::Credential;
pub use provisioning::{OperationStatus, ProvisioningState};
