//! Configuration for the quote plugin

use crate::error::{Result, StockError};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::time::Duration;

/// Default Finnhub REST endpoint
pub const DEFAULT_FINNHUB_API_BASE: &str = "https://finnhub.io/api/v1";

/// Configuration for the quote plugin
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StockConfig {
    /// Hub endpoint
    pub hub_url: String,

    /// Hub bearer token
    pub hub_token: String,

    /// Finnhub API token
    pub finnhub_token: String,

    /// Finnhub REST base URL
    pub finnhub_api_base: String,

    /// Timeout for each provider request
    pub request_timeout: Duration,

    /// Timeout for delivering a reply to the hub
    pub reply_timeout: Duration,

    /// Lifetime of cached crypto symbol tables; `None` fetches per request
    pub symbol_cache_ttl: Option<Duration>,

    /// Exchange used when a crypto query names none
    pub default_exchange: String,

    /// Quote currency used when a crypto query names none
    pub default_currency: String,

    /// Address of the health endpoint; disabled when `None`
    pub health_addr: Option<SocketAddr>,
}

impl Default for StockConfig {
    fn default() -> Self {
        Self {
            hub_url: String::new(),
            hub_token: String::new(),
            finnhub_token: String::new(),
            finnhub_api_base: DEFAULT_FINNHUB_API_BASE.to_string(),
            request_timeout: Duration::from_secs(10),
            reply_timeout: Duration::from_secs(5),
            symbol_cache_ttl: None,
            default_exchange: "COINBASE".to_string(),
            default_currency: "USD".to_string(),
            health_addr: None,
        }
    }
}

impl StockConfig {
    /// Create a new configuration builder
    pub fn builder() -> StockConfigBuilder {
        StockConfigBuilder::default()
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        let required = [
            ("hub URL", &self.hub_url),
            ("hub token", &self.hub_token),
            ("Finnhub token", &self.finnhub_token),
        ];
        for (name, value) in required {
            if value.trim().is_empty() {
                return Err(StockError::ConfigError(format!("missing {name}")));
            }
        }

        if self.finnhub_api_base.trim().is_empty() {
            return Err(StockError::ConfigError(
                "Finnhub API base must not be empty".to_string(),
            ));
        }

        if self.request_timeout.is_zero() || self.reply_timeout.is_zero() {
            return Err(StockError::ConfigError(
                "timeouts must be greater than 0".to_string(),
            ));
        }

        if self.symbol_cache_ttl.is_some_and(|ttl| ttl.is_zero()) {
            return Err(StockError::ConfigError(
                "symbol cache TTL must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}

/// Builder for StockConfig
#[derive(Debug, Default)]
pub struct StockConfigBuilder {
    hub_url: Option<String>,
    hub_token: Option<String>,
    finnhub_token: Option<String>,
    finnhub_api_base: Option<String>,
    request_timeout: Option<Duration>,
    reply_timeout: Option<Duration>,
    symbol_cache_ttl: Option<Duration>,
    default_exchange: Option<String>,
    default_currency: Option<String>,
    health_addr: Option<SocketAddr>,
}

impl StockConfigBuilder {
    /// Set the hub endpoint
    pub fn hub_url(mut self, url: impl Into<String>) -> Self {
        self.hub_url = Some(url.into());
        self
    }

    /// Set the hub token
    pub fn hub_token(mut self, token: impl Into<String>) -> Self {
        self.hub_token = Some(token.into());
        self
    }

    /// Set the Finnhub token
    pub fn finnhub_token(mut self, token: impl Into<String>) -> Self {
        self.finnhub_token = Some(token.into());
        self
    }

    /// Set the Finnhub base URL
    pub fn finnhub_api_base(mut self, base: impl Into<String>) -> Self {
        self.finnhub_api_base = Some(base.into());
        self
    }

    /// Set provider request timeout
    pub fn request_timeout(mut self, duration: Duration) -> Self {
        self.request_timeout = Some(duration);
        self
    }

    /// Set reply delivery timeout
    pub fn reply_timeout(mut self, duration: Duration) -> Self {
        self.reply_timeout = Some(duration);
        self
    }

    /// Enable the crypto symbol cache
    pub fn symbol_cache_ttl(mut self, ttl: Duration) -> Self {
        self.symbol_cache_ttl = Some(ttl);
        self
    }

    /// Set the default crypto exchange
    pub fn default_exchange(mut self, exchange: impl Into<String>) -> Self {
        self.default_exchange = Some(exchange.into());
        self
    }

    /// Set the default crypto quote currency
    pub fn default_currency(mut self, currency: impl Into<String>) -> Self {
        self.default_currency = Some(currency.into());
        self
    }

    /// Serve the health endpoint on `addr`
    pub fn health_addr(mut self, addr: SocketAddr) -> Self {
        self.health_addr = Some(addr);
        self
    }

    /// Build the configuration
    pub fn build(self) -> Result<StockConfig> {
        let defaults = StockConfig::default();

        let config = StockConfig {
            hub_url: self.hub_url.unwrap_or(defaults.hub_url),
            hub_token: self.hub_token.unwrap_or(defaults.hub_token),
            finnhub_token: self.finnhub_token.unwrap_or(defaults.finnhub_token),
            finnhub_api_base: self.finnhub_api_base.unwrap_or(defaults.finnhub_api_base),
            request_timeout: self.request_timeout.unwrap_or(defaults.request_timeout),
            reply_timeout: self.reply_timeout.unwrap_or(defaults.reply_timeout),
            symbol_cache_ttl: self.symbol_cache_ttl.or(defaults.symbol_cache_ttl),
            default_exchange: self
                .default_exchange
                .map(|e| e.trim().to_uppercase())
                .unwrap_or(defaults.default_exchange),
            default_currency: self
                .default_currency
                .map(|c| c.trim().to_uppercase())
                .unwrap_or(defaults.default_currency),
            health_addr: self.health_addr.or(defaults.health_addr),
        };

        config.validate()?;
        Ok(config)
    }
}
