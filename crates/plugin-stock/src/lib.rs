//! Stock and crypto quote plugin
//!
//! Subscribes to a chat hub for the quote commands, looks prices up on
//! Finnhub and answers the invoking user in the same channel.
//!
//! - `stock`/`stocks <ticker>`: open, current and percent change
//! - `stonk`/`stonks <ticker>`: the same, rendered in emoji
//! - `crypto [<exchange>:]<symbol>[/<conversion>]`: latest daily close
//! - `exchange`: supported crypto exchanges
//! - `symbols <exchange>`: crypto pairs listed on an exchange
//!
//! # Example
//!
//! ```rust,ignore
//! use plugin_core::{WsHub, WsHubConfig};
//! use plugin_stock::{Dispatcher, FinnhubClient, QuoteService, StockConfig};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = StockConfig::builder()
//!         .hub_url("wss://hub.example.com")
//!         .hub_token("hub-token")
//!         .finnhub_token("finnhub-token")
//!         .build()?;
//!
//!     let market = Arc::new(FinnhubClient::from_config(&config)?);
//!     let service = Arc::new(QuoteService::new(market, &config));
//!     let hub = Arc::new(WsHub::connect(WsHubConfig::new(&config.hub_url, config.hub_token.clone())?).await?);
//!
//!     Dispatcher::new(hub, service, config.reply_timeout).run().await?;
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod cache;
pub mod commands;
pub mod config;
pub mod dispatcher;
pub mod error;
pub mod format;
pub mod health;
pub mod service;

pub use api::{FinnhubClient, MarketData, QuoteLookup};
pub use cache::SymbolCache;
pub use commands::{Command, CryptoQuery, QuoteStyle};
pub use config::{StockConfig, StockConfigBuilder};
pub use dispatcher::Dispatcher;
pub use error::{Result, StockError};
pub use service::QuoteService;
