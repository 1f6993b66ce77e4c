//! API clients for market data providers

pub mod finnhub;
pub mod market_data;

pub use finnhub::FinnhubClient;
pub use market_data::{Candles, CompanyProfile, CryptoSymbol, MarketData, Quote, QuoteLookup};

#[cfg(test)]
pub use market_data::MockMarketData;
