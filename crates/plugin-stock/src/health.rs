//! Liveness endpoint for container orchestration

use crate::error::Result;
use axum::Router;
use axum::routing::get;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tracing::info;

async fn ok() -> &'static str {
    "OK"
}

/// Router answering `GET /` and `GET /healthz` with `OK`
pub fn router() -> Router {
    Router::new()
        .route("/", get(ok))
        .route("/healthz", get(ok))
}

/// Serve the health router on `addr` until the process exits
pub async fn serve(addr: SocketAddr) -> Result<()> {
    let listener = TcpListener::bind(addr).await?;
    info!(addr = %listener.local_addr()?, "Health endpoint listening");
    serve_on(listener).await
}

/// Serve the health router on an already bound listener
pub async fn serve_on(listener: TcpListener) -> Result<()> {
    axum::serve(listener, router()).await?;
    Ok(())
}
