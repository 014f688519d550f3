//! Microsoft Teams integration: Graph provisioning and bot messaging

pub mod bot;
pub mod cards;
pub mod channel_slot;
pub mod graph;
pub mod provisioning;
pub mod types;

pub use bot::{BotConnector, ChannelNotifier};
pub use channel_slot::ChannelSlot;
pub use graph::GraphClient;
pub use provisioning::{ProvisioningWorkflow, TeamSelection};
