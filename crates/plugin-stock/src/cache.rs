//! Crypto symbol table cache
//!
//! Symbol tables change rarely but are needed on every `crypto` lookup. When a
//! TTL is configured they are kept per exchange; otherwise every call goes to
//! the provider.

use crate::api::CryptoSymbol;
use cached::{Cached, TimedCache};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

type SymbolTable = Vec<CryptoSymbol>;

/// Thread-safe per-exchange symbol cache
#[derive(Clone, Default)]
pub struct SymbolCache {
    cache: Option<Arc<RwLock<TimedCache<String, SymbolTable>>>>,
}

impl SymbolCache {
    /// Create a cache whose entries expire after `ttl`
    pub fn new(ttl: Duration) -> Self {
        Self {
            cache: Some(Arc::new(RwLock::new(TimedCache::with_lifespan(ttl)))),
        }
    }

    /// A cache that never stores anything
    pub fn disabled() -> Self {
        Self { cache: None }
    }

    /// Build from an optional TTL
    pub fn from_ttl(ttl: Option<Duration>) -> Self {
        ttl.map_or_else(Self::disabled, Self::new)
    }

    pub fn is_enabled(&self) -> bool {
        self.cache.is_some()
    }

    /// Get the table for an exchange
    pub async fn get(&self, exchange: &str) -> Option<SymbolTable> {
        let cache = self.cache.as_ref()?;
        let mut cache = cache.write().await;
        cache.cache_get(&exchange.to_string()).cloned()
    }

    /// Store the table for an exchange
    pub async fn insert(&self, exchange: &str, symbols: SymbolTable) {
        if let Some(cache) = &self.cache {
            let mut cache = cache.write().await;
            let _ = cache.cache_set(exchange.to_string(), symbols);
        }
    }

    /// Get or fetch the table for an exchange
    ///
    /// Failed fetches are not cached.
    pub async fn get_or_fetch<F, Fut, E>(&self, exchange: &str, fetcher: F) -> Result<SymbolTable, E>
    where
        F: FnOnce() -> Fut,
        Fut: std::future::Future<Output = Result<SymbolTable, E>>,
    {
        if let Some(symbols) = self.get(exchange).await {
            tracing::debug!(exchange, "Symbol cache hit");
            return Ok(symbols);
        }

        let symbols = fetcher().await?;
        self.insert(exchange, symbols.clone()).await;
        Ok(symbols)
    }

}
