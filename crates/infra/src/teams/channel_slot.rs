//! Channel the report endpoint posts to
//!
//! Seeded from `CHANNEL_ID` at startup and replaced whenever provisioning or
//! team selection persists a new channel.

use parking_lot::RwLock;

#[derive(Debug, Default)]
pub struct ChannelSlot {
    channel_id: RwLock<Option<String>>,
}

impl ChannelSlot {
    pub fn new(initial: Option<String>) -> Self {
        Self { channel_id: RwLock::new(initial.filter(|id| !id.is_empty())) }
    }

    pub fn get(&self) -> Option<String> {
        self.channel_id.read().clone()
    }

    pub fn set(&self, channel_id: impl Into<String>) {
        *self.channel_id.write() = Some(channel_id.into());
    }
}
