//! WebSocket hub client
//!
//! Speaks JSON text frames tagged by `type`:
//!
//! - client → hub: `register` (command table), `send_message`
//! - hub → client: `command`; every other frame type is surfaced as
//!   [`Event::Other`]
//!
//! The upgrade request carries `Authorization: Bearer <token>`.

use crate::{CommandEvent, CommandMetadata, Error, Event, EventStream, Hub, Result};
use async_trait::async_trait;
use futures::stream::{SplitSink, SplitStream};
use futures::{SinkExt, StreamExt};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::net::TcpStream;
use tokio::sync::Mutex;
use tokio_tungstenite::tungstenite::client::IntoClientRequest;
use tokio_tungstenite::tungstenite::http::{HeaderValue, header::AUTHORIZATION};
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};
use tracing::{debug, info, instrument, warn};
use url::Url;

const DEFAULT_SEND_TIMEOUT_SECS: u64 = 5;

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Frames sent to the hub
#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ClientFrame<'a> {
    Register { commands: &'a [CommandMetadata] },
    SendMessage { channel_id: &'a str, text: &'a str },
}

/// Frames received from the hub
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ServerFrame {
    Command(CommandEvent),
    #[serde(other)]
    Unknown,
}

/// Connection settings for [`WsHub`]
#[derive(Debug, Clone)]
pub struct WsHubConfig {
    /// Hub endpoint; `http(s)` schemes are mapped to `ws(s)`
    pub url: Url,

    /// Bearer token presented on connect
    pub token: String,

    /// Upper bound for handing a frame to the socket
    pub send_timeout: Duration,
}

impl WsHubConfig {
    /// Validate the hub URL and token
    pub fn new(url: &str, token: impl Into<String>) -> Result<Self> {
        let mut parsed =
            Url::parse(url).map_err(|e| Error::Config(format!("invalid hub URL {url}: {e}")))?;

        let scheme = match parsed.scheme() {
            "ws" | "http" => "ws",
            "wss" | "https" => "wss",
            other => {
                return Err(Error::Config(format!(
                    "unsupported hub URL scheme: {other}"
                )));
            }
        };
        parsed
            .set_scheme(scheme)
            .map_err(|()| Error::Config(format!("cannot use {scheme} for {url}")))?;

        let token = token.into();
        if token.trim().is_empty() {
            return Err(Error::Config("hub token is empty".to_string()));
        }

        Ok(Self {
            url: parsed,
            token,
            send_timeout: Duration::from_secs(DEFAULT_SEND_TIMEOUT_SECS),
        })
    }

    /// Set the frame send timeout
    pub fn with_send_timeout(mut self, timeout: Duration) -> Self {
        self.send_timeout = timeout;
        self
    }
}

/// Hub connection over WebSocket
pub struct WsHub {
    sink: Mutex<SplitSink<WsStream, Message>>,
    stream: Mutex<Option<SplitStream<WsStream>>>,
    send_timeout: Duration,
}

impl WsHub {
    /// Open the connection and authenticate
    #[instrument(skip(config), fields(url = %config.url))]
    pub async fn connect(config: WsHubConfig) -> Result<Self> {
        let mut request = config.url.as_str().into_client_request()?;
        let bearer = HeaderValue::from_str(&format!("Bearer {}", config.token))
            .map_err(|e| Error::Config(format!("invalid hub token: {e}")))?;
        request.headers_mut().insert(AUTHORIZATION, bearer);

        let (socket, response) = connect_async(request).await?;
        debug!(status = %response.status(), "Hub handshake complete");

        let (sink, stream) = socket.split();
        Ok(Self {
            sink: Mutex::new(sink),
            stream: Mutex::new(Some(stream)),
            send_timeout: config.send_timeout,
        })
    }

    async fn send_frame(&self, frame: &ClientFrame<'_>) -> Result<()> {
        let json = serde_json::to_string(frame)?;
        let mut sink = self.sink.lock().await;
        tokio::time::timeout(self.send_timeout, sink.send(Message::Text(json.into())))
            .await
            .map_err(|_| Error::Timeout(self.send_timeout))??;
        Ok(())
    }
}

/// Decode a text frame; undecodable frames are dropped
fn decode_frame(text: &str) -> Option<Event> {
    match serde_json::from_str::<ServerFrame>(text) {
        Ok(ServerFrame::Command(event)) => Some(Event::Command(event)),
        Ok(ServerFrame::Unknown) => Some(Event::Other),
        Err(e) => {
            warn!(error = %e, "Skipping undecodable hub frame");
            None
        }
    }
}

#[async_trait]
impl Hub for WsHub {
    async fn stream_events(&self, commands: Vec<CommandMetadata>) -> Result<EventStream> {
        let stream = self
            .stream
            .lock()
            .await
            .take()
            .ok_or(Error::AlreadyStreaming)?;

        self.send_frame(&ClientFrame::Register {
            commands: &commands,
        })
        .await?;
        info!(commands = commands.len(), "Registered commands with hub");

        let events = futures::stream::unfold(stream, |mut stream| async move {
            loop {
                match stream.next().await? {
                    Ok(Message::Text(text)) => {
                        if let Some(event) = decode_frame(&text) {
                            return Some((Ok(event), stream));
                        }
                    }
                    Ok(Message::Close(frame)) => {
                        info!(?frame, "Hub closed the connection");
                        return None;
                    }
                    Ok(_) => {}
                    Err(e) => return Some((Err(Error::from(e)), stream)),
                }
            }
        });

        Ok(events.boxed())
    }

    async fn send_message(&self, channel_id: &str, text: &str) -> Result<()> {
        self.send_frame(&ClientFrame::SendMessage { channel_id, text })
            .await
    }
}
