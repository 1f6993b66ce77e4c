//! Quote lookups
//!
//! Turns a parsed [`Command`] into reply text. Every path ends in a reply:
//! provider failures are logged and reported to the user rather than
//! propagated, so callers never need to handle an error here.

use crate::api::{CryptoSymbol, MarketData, QuoteLookup};
use crate::cache::SymbolCache;
use crate::commands::{Command, CryptoQuery, QuoteStyle};
use crate::config::StockConfig;
use crate::format;
use chrono::{Duration as ChronoDuration, Utc};
use std::sync::Arc;
use tracing::{debug, instrument, warn};

/// Candle resolution used for crypto prices
const CANDLE_RESOLUTION: &str = "D";

/// Answers commands from market data
pub struct QuoteService {
    market: Arc<dyn MarketData>,
    symbols: SymbolCache,
    default_exchange: String,
    default_currency: String,
}

impl QuoteService {
    pub fn new(market: Arc<dyn MarketData>, config: &StockConfig) -> Self {
        let symbols = SymbolCache::from_ttl(config.symbol_cache_ttl);
        debug!(
            symbol_cache = symbols.is_enabled(),
            ttl = ?config.symbol_cache_ttl,
            "Quote service ready"
        );

        Self {
            market,
            symbols,
            default_exchange: config.default_exchange.clone(),
            default_currency: config.default_currency.clone(),
        }
    }

    /// Reply text for a command
    pub async fn respond(&self, command: &Command) -> String {
        match command {
            Command::Stock { query, style } => self.stock(query, *style).await,
            Command::Crypto { query } => self.crypto(query).await,
            Command::Exchanges => self.exchanges().await,
            Command::Symbols { exchange } => self.symbols(exchange).await,
        }
    }

    /// Stock quote for an already-normalised ticker
    #[instrument(skip(self))]
    pub async fn stock(&self, query: &str, style: QuoteStyle) -> String {
        if query.is_empty() {
            let name = match style {
                QuoteStyle::Plain => "stock",
                QuoteStyle::Stonk => "stonk",
            };
            return Command::usage(name);
        }

        let profile = match self.market.company_profile(query).await {
            Ok(profile) => profile,
            Err(e) => {
                warn!(error = %e, "Company profile lookup failed");
                return format::lookup_failed_reply(query);
            }
        };

        let quote = match self.market.quote(query).await {
            Ok(QuoteLookup::Found(quote)) => quote,
            Ok(QuoteLookup::NotFound) => {
                debug!("Unknown ticker");
                return format::not_found_reply(query);
            }
            Err(e) => {
                warn!(error = %e, "Quote lookup failed");
                return format::lookup_failed_reply(query);
            }
        };

        let company = format::display_name(query, &profile);
        match style {
            QuoteStyle::Plain => format::stock_reply(&company, &quote),
            QuoteStyle::Stonk => format::stonk_reply(&company, &quote),
        }
    }

    /// Crypto price for `[EXCHANGE:]TICKER[/CURRENCY]`
    #[instrument(skip(self))]
    pub async fn crypto(&self, query: &str) -> String {
        let target =
            match CryptoQuery::parse(query, &self.default_exchange, &self.default_currency) {
                Ok(target) => target,
                Err(_) => return Command::usage("crypto"),
            };

        let symbols = match self.exchange_symbols(&target.exchange).await {
            Ok(symbols) => symbols,
            Err(e) => {
                warn!(error = %e, exchange = %target.exchange, "Symbol lookup failed");
                return format::SYMBOLS_FAILED.to_string();
            }
        };

        let display_symbol = target.display_symbol();
        let Some(symbol) = symbols
            .iter()
            .find(|symbol| symbol.display_symbol == display_symbol)
        else {
            debug!(%display_symbol, exchange = %target.exchange, "Pair not listed");
            return format::CRYPTO_NOT_FOUND.to_string();
        };

        let to = Utc::now();
        let from = to - ChronoDuration::days(1);
        let candles = match self
            .market
            .crypto_candles(
                &symbol.symbol,
                CANDLE_RESOLUTION,
                from.timestamp(),
                to.timestamp(),
            )
            .await
        {
            Ok(candles) => candles,
            Err(e) => {
                warn!(error = %e, symbol = %symbol.symbol, "Candle lookup failed");
                return format::lookup_failed_reply(query);
            }
        };

        match candles.latest_close() {
            Some(price) => format::crypto_reply(query, price, &target.exchange),
            None => format::NO_RESULTS.to_string(),
        }
    }

    /// Supported crypto exchanges
    #[instrument(skip(self))]
    pub async fn exchanges(&self) -> String {
        match self.market.crypto_exchanges().await {
            Ok(exchanges) => format::exchanges_reply(exchanges),
            Err(e) => {
                warn!(error = %e, "Exchange list lookup failed");
                format::lookup_failed_reply("exchanges")
            }
        }
    }

    /// Display symbols listed on an exchange; empty means the default one
    #[instrument(skip(self))]
    pub async fn symbols(&self, exchange: &str) -> String {
        let exchange = if exchange.is_empty() {
            self.default_exchange.as_str()
        } else {
            exchange
        };

        match self.exchange_symbols(exchange).await {
            Ok(symbols) if symbols.is_empty() => format::no_symbols_reply(exchange),
            Ok(symbols) => format::symbols_reply(
                exchange,
                symbols.into_iter().map(|s| s.display_symbol).collect(),
            ),
            Err(e) => {
                warn!(error = %e, exchange, "Symbol lookup failed");
                format::SYMBOLS_FAILED.to_string()
            }
        }
    }

    async fn exchange_symbols(&self, exchange: &str) -> crate::error::Result<Vec<CryptoSymbol>> {
        self.symbols
            .get_or_fetch(exchange, || self.market.crypto_symbols(exchange))
            .await
    }
}
