//! Events exchanged with the hub

use serde::{Deserialize, Serialize};

/// Chat user that triggered an event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub display_name: String,
}

/// Where an event came from and where replies go
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelSource {
    pub channel_id: String,
    #[serde(default)]
    pub user: Option<User>,
}

impl ChannelSource {
    /// Create a source for a channel without user information
    pub fn new(channel_id: impl Into<String>) -> Self {
        Self {
            channel_id: channel_id.into(),
            user: None,
        }
    }

    /// Attach the invoking user
    pub fn with_user(mut self, id: impl Into<String>, display_name: impl Into<String>) -> Self {
        self.user = Some(User {
            id: id.into(),
            display_name: display_name.into(),
        });
        self
    }

    /// Address `text` to the invoking user, if known
    pub fn mention(&self, text: &str) -> String {
        match &self.user {
            Some(user) => format!("{}: {text}", user.display_name),
            None => text.to_string(),
        }
    }
}

/// A user invoking a named command with a free-text argument
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandEvent {
    pub source: ChannelSource,
    pub command: String,
    #[serde(default)]
    pub arg: String,
}

impl CommandEvent {
    pub fn new(source: ChannelSource, command: impl Into<String>, arg: impl Into<String>) -> Self {
        Self {
            source,
            command: command.into(),
            arg: arg.into(),
        }
    }
}

/// Help metadata registered with the hub for each command
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandMetadata {
    pub name: String,
    pub short_help: String,
    pub full_help: String,
}

impl CommandMetadata {
    pub fn new(
        name: impl Into<String>,
        short_help: impl Into<String>,
        full_help: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            short_help: short_help.into(),
            full_help: full_help.into(),
        }
    }
}

/// Inbound hub event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// A registered command was invoked
    Command(CommandEvent),
    /// Any other hub event; plugins are free to ignore these
    Other,
}
