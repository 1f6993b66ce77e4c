//! Quote plugin process
//!
//! Connects to the hub and answers quote commands until the hub closes the
//! stream. Exits non-zero on every termination so a supervisor restarts it.
//!
//! # Usage
//!
//! ```bash
//! export SEABIRD_HOST="wss://hub.example.com/plugin"
//! export SEABIRD_TOKEN="hub-token"
//! export FINNHUB_TOKEN="finnhub-token"
//!
//! cargo run --bin stock-plugin -p plugin-stock
//! ```

use anyhow::Context;
use clap::Parser;
use plugin_core::{WsHub, WsHubConfig};
use plugin_stock::{Dispatcher, FinnhubClient, QuoteService, StockConfig};
use plugin_utils::LogFormat;
use std::net::{Ipv4Addr, SocketAddr};
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info};

#[derive(Parser, Debug)]
#[command(name = "stock-plugin")]
#[command(about = "Answers stock and crypto quote commands from the chat hub", long_about = None)]
struct Cli {
    /// Hub WebSocket URL
    #[arg(long, env = "SEABIRD_HOST")]
    hub_url: String,

    /// Hub bearer token
    #[arg(long, env = "SEABIRD_TOKEN", hide_env_values = true)]
    hub_token: String,

    /// Finnhub API token
    #[arg(long, env = "FINNHUB_TOKEN", hide_env_values = true)]
    finnhub_token: String,

    /// Finnhub REST base URL
    #[arg(long, env = "FINNHUB_API_BASE", default_value = plugin_stock::config::DEFAULT_FINNHUB_API_BASE)]
    finnhub_api_base: String,

    /// Timeout for each Finnhub request, in seconds
    #[arg(long, env = "REQUEST_TIMEOUT_SECS", default_value_t = 10)]
    request_timeout_secs: u64,

    /// Timeout for delivering a reply, in seconds
    #[arg(long, env = "REPLY_TIMEOUT_SECS", default_value_t = 5)]
    reply_timeout_secs: u64,

    /// Cache crypto symbol tables for this many seconds; 0 disables
    #[arg(long, env = "SYMBOL_CACHE_TTL_SECS", default_value_t = 0)]
    symbol_cache_ttl_secs: u64,

    /// Serve the health endpoint on this port
    #[arg(long, env = "PORT")]
    port: Option<u16>,

    /// Log output: auto, text or json
    #[arg(long, env = "LOG_FORMAT", default_value = "auto")]
    log_format: LogFormat,
}

impl Cli {
    fn into_config(self) -> plugin_stock::Result<StockConfig> {
        let mut builder = StockConfig::builder()
            .hub_url(self.hub_url)
            .hub_token(self.hub_token)
            .finnhub_token(self.finnhub_token)
            .finnhub_api_base(self.finnhub_api_base)
            .request_timeout(Duration::from_secs(self.request_timeout_secs))
            .reply_timeout(Duration::from_secs(self.reply_timeout_secs));

        if self.symbol_cache_ttl_secs > 0 {
            builder = builder.symbol_cache_ttl(Duration::from_secs(self.symbol_cache_ttl_secs));
        }
        if let Some(port) = self.port {
            builder = builder.health_addr(SocketAddr::from((Ipv4Addr::UNSPECIFIED, port)));
        }

        builder.build()
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let dotenv_loaded = plugin_utils::load_dotenv();
    let cli = Cli::parse();

    plugin_utils::init_tracing_with(cli.log_format);
    if dotenv_loaded {
        info!("Loaded environment from .env");
    }

    let config = cli.into_config().context("invalid configuration")?;

    if let Some(addr) = config.health_addr {
        tokio::spawn(async move {
            if let Err(e) = plugin_stock::health::serve(addr).await {
                error!(error = %e, "Health endpoint stopped");
            }
        });
    }

    let market = Arc::new(FinnhubClient::from_config(&config)?);
    let service = Arc::new(QuoteService::new(market, &config));

    let hub_config = WsHubConfig::new(&config.hub_url, config.hub_token.clone())?
        .with_send_timeout(config.reply_timeout);
    let hub = Arc::new(
        WsHub::connect(hub_config)
            .await
            .context("failed to connect to hub")?,
    );
    info!(url = %config.hub_url, "Connected to hub");

    let dispatcher = Dispatcher::new(hub, service, config.reply_timeout);
    dispatcher.run().await?;

    Ok(())
}
