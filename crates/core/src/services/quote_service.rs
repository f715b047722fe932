use futures::future::join_all;
use std::collections::HashMap;
use std::time::Instant;
use tokio::sync::Mutex;
use tracing::warn;

use crate::models::quote::{Quote, QuoteCache};
use crate::providers::registry::QuoteProviderRegistry;

/// Fetches live quotes with a TTL cache and per-symbol failure isolation.
///
/// Cache strategy: every successful lookup is cached for the configured
/// TTL (60 s by default) to stay inside provider rate limits; a stale
/// entry is simply superseded by the next fetch. Lookup failures are
/// logged and reported as "no quote" — a holding without a quote is
/// still valued at its cost basis by the report layer.
pub struct QuoteService {
    registry: QuoteProviderRegistry,
    cache: Mutex<QuoteCache>,
}

impl QuoteService {
    pub fn new(registry: QuoteProviderRegistry) -> Self {
        Self::with_cache(registry, QuoteCache::default())
    }

    /// Construct with an explicit cache (tests inject a short TTL).
    pub fn with_cache(registry: QuoteProviderRegistry, cache: QuoteCache) -> Self {
        Self {
            registry,
            cache: Mutex::new(cache),
        }
    }

    /// Current quote for one symbol, from cache when fresh.
    ///
    /// `None` covers every miss: no provider for the market, a provider
    /// error (logged), or a symbol the source does not know.
    pub async fn quote(&self, symbol: &str) -> Option<Quote> {
        if let Some(quote) = self.cache.lock().await.get(symbol, Instant::now()) {
            return Some(quote);
        }

        let provider = match self.registry.provider_for(symbol) {
            Some(p) => p,
            None => {
                warn!(symbol, "no quote provider configured for symbol");
                return None;
            }
        };

        match provider.current_quote(symbol).await {
            Ok(Some(quote)) => {
                self.cache
                    .lock()
                    .await
                    .insert(symbol, quote, Instant::now());
                Some(quote)
            }
            Ok(None) => None,
            Err(e) => {
                warn!(symbol, provider = provider.name(), error = %e, "quote lookup failed");
                None
            }
        }
    }

    /// Fetch quotes for all given symbols concurrently — one request per
    /// symbol, all settled before merging. A failure on one symbol never
    /// blocks or corrupts the others; only successes land in the map.
    pub async fn quotes_for<S: AsRef<str>>(&self, symbols: &[S]) -> HashMap<String, Quote> {
        let lookups = symbols.iter().map(|symbol| async move {
            let symbol = symbol.as_ref();
            self.quote(symbol).await.map(|q| (symbol.to_string(), q))
        });

        join_all(lookups).await.into_iter().flatten().collect()
    }
}
