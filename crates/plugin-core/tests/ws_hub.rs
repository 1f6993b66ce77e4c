//! WebSocket hub round trip against a local server

use futures::{SinkExt, StreamExt};
use plugin_core::{CommandMetadata, Event, Hub, WsHub, WsHubConfig};
use serde_json::{Value, json};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio_tungstenite::accept_hdr_async;
use tokio_tungstenite::tungstenite::error::UrlError;
use tokio_tungstenite::tungstenite::{self, Message};
use tokio_tungstenite::tungstenite::handshake::server::{ErrorResponse, Request, Response};

const TIMEOUT: Duration = Duration::from_secs(5);

#[tokio::test]
async fn test_register_stream_and_reply() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let auth_header = Arc::new(Mutex::new(None::<String>));
    let (register_tx, register_rx) = oneshot::channel::<Value>();
    let (reply_tx, reply_rx) = oneshot::channel::<Value>();

    let captured = Arc::clone(&auth_header);
    tokio::spawn(async move {
        let (tcp, _) = listener.accept().await.unwrap();
        let mut socket = accept_hdr_async(tcp, move |req: &Request, resp: Response| -> Result<Response, ErrorResponse> {
            let header = req
                .headers()
                .get("authorization")
                .and_then(|v| v.to_str().ok())
                .map(str::to_string);
            *captured.lock().unwrap() = header;
            Ok(resp)
        })
        .await
        .unwrap();

        let register = socket.next().await.unwrap().unwrap();
        register_tx
            .send(serde_json::from_str(register.to_text().unwrap()).unwrap())
            .unwrap();

        let command = json!({
            "type": "command",
            "source": {"channel_id": "#stocks", "user": {"id": "1", "display_name": "ana"}},
            "command": "stock",
            "arg": "msft"
        });
        socket
            .send(Message::Text(command.to_string().into()))
            .await
            .unwrap();
        socket
            .send(Message::Text(r#"{"type":"ping"}"#.into()))
            .await
            .unwrap();
        socket.send(Message::Text("garbage".into())).await.unwrap();

        let reply = socket.next().await.unwrap().unwrap();
        reply_tx
            .send(serde_json::from_str(reply.to_text().unwrap()).unwrap())
            .unwrap();

        socket.close(None).await.unwrap();
    });

    let config = WsHubConfig::new(&format!("ws://{addr}/"), "secret-token").unwrap();
    let hub = WsHub::connect(config).await.unwrap();

    let mut events = hub
        .stream_events(vec![CommandMetadata::new(
            "stock",
            "<ticker>",
            "Returns current stock price for given ticker",
        )])
        .await
        .unwrap();

    let register = tokio::time::timeout(TIMEOUT, register_rx)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(register["type"], "register");
    assert_eq!(register["commands"][0]["name"], "stock");
    assert_eq!(register["commands"][0]["short_help"], "<ticker>");
    assert_eq!(
        auth_header.lock().unwrap().as_deref(),
        Some("Bearer secret-token")
    );

    let first = tokio::time::timeout(TIMEOUT, events.next())
        .await
        .unwrap()
        .unwrap()
        .unwrap();
    match first {
        Event::Command(cmd) => {
            assert_eq!(cmd.command, "stock");
            assert_eq!(cmd.arg, "msft");
            assert_eq!(cmd.source.channel_id, "#stocks");
        }
        Event::Other => panic!("Expected a command event"),
    }

    let second = tokio::time::timeout(TIMEOUT, events.next())
        .await
        .unwrap()
        .unwrap()
        .unwrap();
    assert_eq!(second, Event::Other);

    hub.send_message("#stocks", "ana: hello").await.unwrap();
    let reply = tokio::time::timeout(TIMEOUT, reply_rx)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(
        reply,
        json!({"type": "send_message", "channel_id": "#stocks", "text": "ana: hello"})
    );

    let end = tokio::time::timeout(TIMEOUT, events.next()).await.unwrap();
    assert!(end.is_none());
}

#[tokio::test]
async fn test_connect_refused() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let config = WsHubConfig::new(&format!("ws://{addr}/"), "token").unwrap();
    let result = WsHub::connect(config).await;
    assert!(matches!(result, Err(plugin_core::Error::Connection(_))));
}

#[tokio::test]
async fn test_secure_url_attempts_tls_handshake() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        // Accept and hang up without speaking TLS
        let (tcp, _) = listener.accept().await.unwrap();
        drop(tcp);
    });

    let config = WsHubConfig::new(&format!("https://{addr}/"), "token").unwrap();
    assert_eq!(config.url.scheme(), "wss");

    let err = tokio::time::timeout(TIMEOUT, WsHub::connect(config))
        .await
        .unwrap()
        .err()
        .unwrap();
    assert!(
        !matches!(
            err,
            plugin_core::Error::Connection(tungstenite::Error::Url(UrlError::TlsFeatureNotEnabled))
        ),
        "wss connect rejected before the handshake: {err:?}"
    );
}
