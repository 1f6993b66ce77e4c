//! In-process hub
//!
//! `MemoryHub` stands in for a real hub connection: events are pushed in by the
//! caller and every outbound message is recorded. Closing the hub ends the
//! event stream the same way a hub disconnect would.

use crate::{CommandEvent, CommandMetadata, Error, Event, EventStream, Hub, Result};
use async_trait::async_trait;
use futures::StreamExt;
use std::time::Duration;
use tokio::sync::{Mutex, Notify, mpsc};

/// A message delivered through [`MemoryHub`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentMessage {
    pub channel_id: String,
    pub text: String,
}

/// Hub that lives entirely in memory
pub struct MemoryHub {
    sender: Mutex<Option<mpsc::UnboundedSender<Event>>>,
    receiver: Mutex<Option<mpsc::UnboundedReceiver<Event>>>,
    registered: Mutex<Vec<CommandMetadata>>,
    sent: Mutex<Vec<SentMessage>>,
    delivered: Notify,
}

impl MemoryHub {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            sender: Mutex::new(Some(tx)),
            receiver: Mutex::new(Some(rx)),
            registered: Mutex::new(Vec::new()),
            sent: Mutex::new(Vec::new()),
            delivered: Notify::new(),
        }
    }

    /// Queue an event for the subscriber
    pub async fn push(&self, event: Event) -> Result<()> {
        let sender = self.sender.lock().await;
        let sender = sender.as_ref().ok_or(Error::StreamClosed)?;
        sender.send(event).map_err(|_| Error::StreamClosed)
    }

    /// Queue a command event for the subscriber
    pub async fn push_command(&self, event: CommandEvent) -> Result<()> {
        self.push(Event::Command(event)).await
    }

    /// End the event stream once queued events are drained
    pub async fn close(&self) {
        self.sender.lock().await.take();
    }

    /// Commands registered by the subscriber
    pub async fn registered(&self) -> Vec<CommandMetadata> {
        self.registered.lock().await.clone()
    }

    /// Messages sent so far
    pub async fn sent(&self) -> Vec<SentMessage> {
        self.sent.lock().await.clone()
    }

    /// Wait until at least `count` messages were sent
    pub async fn wait_for_messages(&self, count: usize, timeout: Duration) -> Result<Vec<SentMessage>> {
        let wait = async {
            loop {
                let delivered = self.delivered.notified();
                {
                    let sent = self.sent.lock().await;
                    if sent.len() >= count {
                        return sent.clone();
                    }
                }
                delivered.await;
            }
        };

        tokio::time::timeout(timeout, wait)
            .await
            .map_err(|_| Error::Timeout(timeout))
    }
}

impl Default for MemoryHub {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Hub for MemoryHub {
    async fn stream_events(&self, commands: Vec<CommandMetadata>) -> Result<EventStream> {
        let receiver = self
            .receiver
            .lock()
            .await
            .take()
            .ok_or(Error::AlreadyStreaming)?;

        *self.registered.lock().await = commands;

        let stream = futures::stream::unfold(receiver, |mut receiver| async move {
            receiver.recv().await.map(|event| (Ok(event), receiver))
        });
        Ok(stream.boxed())
    }

    async fn send_message(&self, channel_id: &str, text: &str) -> Result<()> {
        self.sent.lock().await.push(SentMessage {
            channel_id: channel_id.to_string(),
            text: text.to_string(),
        });
        self.delivered.notify_waiters();
        Ok(())
    }
}
