//! Hub protocol for chat plugins
//!
//! A plugin subscribes to the hub with the set of commands it handles, receives
//! a stream of [`Event`]s and answers through [`Hub::send_message`] or
//! [`Hub::mention_reply`].
//!
//! Two hub implementations are provided:
//!
//! - [`WsHub`]: JSON frames over an authenticated WebSocket connection
//! - [`MemoryHub`]: an in-process hub for tests and local runs

pub mod error;
pub mod event;
pub mod hub;
pub mod memory;
pub mod ws;

pub use error::{Error, Result};
pub use event::{ChannelSource, CommandEvent, CommandMetadata, Event, User};
pub use hub::{EventStream, Hub};
pub use memory::{MemoryHub, SentMessage};
pub use ws::{WsHub, WsHubConfig};

/// Transport crate whose error type appears in [`Error::Connection`]
pub use tokio_tungstenite::tungstenite;
