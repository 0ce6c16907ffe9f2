use serenity::all::ChannelId;
use tokio::sync::RwLock;
use tracing::{debug, instrument};

/// Holds the single destination channel for view count posts.
///
/// Written by the `setchannel` command, read by the scheduler. Starts empty
/// and is never persisted; the last write wins.
#[derive(Debug, Default)]
pub struct ChannelRegistry {
    destination: RwLock<Option<ChannelId>>,
}

impl ChannelRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the destination, returning the previous one.
    #[instrument(skip(self))]
    pub async fn set(&self, channel: ChannelId) -> Option<ChannelId> {
        let previous = self.destination.write().await.replace(channel);
        debug!("destination changed from {previous:?} to {channel}");
        previous
    }

    pub async fn get(&self) -> Option<ChannelId> {
        *self.destination.read().await
    }
}
