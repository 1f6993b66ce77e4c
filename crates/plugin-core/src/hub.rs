//! Hub trait definition

use crate::{ChannelSource, CommandMetadata, Event, Result};
use async_trait::async_trait;
use futures::stream::BoxStream;

/// Stream of inbound events; ends when the hub closes the subscription
pub type EventStream = BoxStream<'static, Result<Event>>;

/// Connection to the chat hub
///
/// Implementations must be safe to share between handler tasks: replies are
/// sent concurrently while the event stream is being read.
#[async_trait]
pub trait Hub: Send + Sync {
    /// Register `commands` and start receiving events
    ///
    /// A connection carries a single subscription; calling this twice is an
    /// error.
    async fn stream_events(&self, commands: Vec<CommandMetadata>) -> Result<EventStream>;

    /// Send `text` to a channel
    async fn send_message(&self, channel_id: &str, text: &str) -> Result<()>;

    /// Reply to the user that triggered an event
    async fn mention_reply(&self, source: &ChannelSource, text: &str) -> Result<()> {
        self.send_message(&source.channel_id, &source.mention(text))
            .await
    }
}
