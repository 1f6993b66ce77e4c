//! Finnhub API client

use super::market_data::{Candles, CompanyProfile, CryptoSymbol, MarketData, Quote, QuoteLookup};
use crate::config::StockConfig;
use crate::error::{Result, StockError};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, instrument};

const TOKEN_HEADER: &str = "X-Finnhub-Token";

/// Raw `/quote` body
///
/// Finnhub answers unknown symbols with HTTP 200 and a zeroed body, so
/// existence is decided from the values rather than the status.
#[derive(Debug, Deserialize)]
struct QuoteResponse {
    #[serde(rename = "c", default)]
    current: Option<f64>,
    #[serde(rename = "o", default)]
    open: Option<f64>,
    #[serde(rename = "t", default)]
    timestamp: Option<i64>,
}

impl From<QuoteResponse> for QuoteLookup {
    fn from(raw: QuoteResponse) -> Self {
        match (raw.open, raw.current, raw.timestamp) {
            (Some(open), Some(current), Some(timestamp)) if timestamp > 0 && open > 0.0 => {
                QuoteLookup::Found(Quote::new(open, current))
            }
            _ => QuoteLookup::NotFound,
        }
    }
}

/// Finnhub REST client
#[derive(Debug, Clone)]
pub struct FinnhubClient {
    client: Client,
    api_base: String,
    token: String,
}

impl FinnhubClient {
    /// Create a client for `api_base` authenticating with `token`
    pub fn new(
        token: impl Into<String>,
        api_base: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            api_base: api_base.into().trim_end_matches('/').to_string(),
            token: token.into(),
        })
    }

    /// Create a client from plugin configuration
    pub fn from_config(config: &StockConfig) -> Result<Self> {
        Self::new(
            config.finnhub_token.clone(),
            config.finnhub_api_base.clone(),
            config.request_timeout,
        )
    }

    async fn get<T: DeserializeOwned>(&self, path: &str, query: &[(&str, &str)]) -> Result<T> {
        let url = format!("{}{path}", self.api_base);
        debug!(%url, "Finnhub request");

        let response = self
            .client
            .get(&url)
            .header(TOKEN_HEADER, &self.token)
            .query(query)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(StockError::ApiError(format!(
                "Finnhub {path} returned {status}: {body}"
            )));
        }

        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }
}

#[async_trait]
impl MarketData for FinnhubClient {
    #[instrument(skip(self))]
    async fn company_profile(&self, symbol: &str) -> Result<CompanyProfile> {
        self.get("/stock/profile2", &[("symbol", symbol)]).await
    }

    #[instrument(skip(self))]
    async fn quote(&self, symbol: &str) -> Result<QuoteLookup> {
        let raw: QuoteResponse = self.get("/quote", &[("symbol", symbol)]).await?;
        Ok(raw.into())
    }

    #[instrument(skip(self))]
    async fn crypto_exchanges(&self) -> Result<Vec<String>> {
        self.get("/crypto/exchange", &[]).await
    }

    #[instrument(skip(self))]
    async fn crypto_symbols(&self, exchange: &str) -> Result<Vec<CryptoSymbol>> {
        self.get("/crypto/symbol", &[("exchange", exchange)]).await
    }

    #[instrument(skip(self))]
    async fn crypto_candles(
        &self,
        symbol: &str,
        resolution: &str,
        from: i64,
        to: i64,
    ) -> Result<Candles> {
        let from = from.to_string();
        let to = to.to_string();
        self.get(
            "/crypto/candle",
            &[
                ("symbol", symbol),
                ("resolution", resolution),
                ("from", &from),
                ("to", &to),
            ],
        )
        .await
    }
}
