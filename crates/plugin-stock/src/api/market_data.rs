//! Market data provider seam

use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Company profile; empty fields mean the provider could not resolve them
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanyProfile {
    #[serde(default)]
    pub ticker: String,
    #[serde(default)]
    pub name: String,
}

/// Opening and current price for a trading day
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    pub open: f64,
    pub current: f64,
}

impl Quote {
    pub fn new(open: f64, current: f64) -> Self {
        Self { open, current }
    }

    /// Percent change from open to current
    pub fn percent_change(&self) -> f64 {
        (self.current - self.open) / self.open * 100.0
    }

    /// Absolute price movement since open
    pub fn abs_change(&self) -> f64 {
        (self.current - self.open).abs()
    }

    /// Strictly above the open; an unchanged price does not count
    pub fn is_up(&self) -> bool {
        self.current > self.open
    }
}

/// Outcome of a quote request that reached the provider
#[derive(Debug, Clone, PartialEq)]
pub enum QuoteLookup {
    Found(Quote),
    NotFound,
}

/// Crypto pair listed on an exchange
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CryptoSymbol {
    /// Provider-internal identifier, e.g. `COINBASE:BTC-USD`
    pub symbol: String,
    /// Human readable pair, e.g. `BTC/USD`
    pub display_symbol: String,
    #[serde(default)]
    pub description: String,
}

/// Candle series; only close prices are consumed
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Candles {
    #[serde(rename = "c", default)]
    pub close: Vec<f64>,
    #[serde(rename = "t", default)]
    pub timestamps: Vec<i64>,
    #[serde(rename = "s", default)]
    pub status: String,
}

impl Candles {
    /// Close price of the most recent candle
    pub fn latest_close(&self) -> Option<f64> {
        if self.status == "no_data" {
            return None;
        }
        self.close.last().copied()
    }
}

/// Market data provider
///
/// Implementations return `Err` only when the provider could not be asked or
/// answered garbage. A symbol the provider does not know is a regular answer
/// (`QuoteLookup::NotFound`, empty profile fields, empty lists).
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MarketData: Send + Sync {
    /// Company profile by ticker
    async fn company_profile(&self, symbol: &str) -> Result<CompanyProfile>;

    /// Current quote by ticker
    async fn quote(&self, symbol: &str) -> Result<QuoteLookup>;

    /// Supported crypto exchanges
    async fn crypto_exchanges(&self) -> Result<Vec<String>>;

    /// Crypto pairs listed on an exchange
    async fn crypto_symbols(&self, exchange: &str) -> Result<Vec<CryptoSymbol>>;

    /// Candles for a provider-internal crypto symbol between two UNIX timestamps
    async fn crypto_candles(
        &self,
        symbol: &str,
        resolution: &str,
        from: i64,
        to: i64,
    ) -> Result<Candles>;
}
