use async_trait::async_trait;

use crate::errors::CoreError;
use crate::models::quote::{Market, Quote, SymbolMatch};

/// Trait abstraction for market-data sources.
///
/// Each external API (Finnhub for US equities, KIS for Korean domestic
/// equities) implements this trait. If a vendor changes or goes away, we
/// replace that one implementation — nothing else is touched.
#[async_trait]
pub trait QuoteProvider: Send + Sync {
    /// Human-readable name of this source (for logs/errors).
    fn name(&self) -> &str;

    /// Which market this source serves.
    fn market(&self) -> Market;

    /// Current price for a symbol. `Ok(None)` means the source does not
    /// know the symbol — callers treat that the same as a failed lookup.
    async fn current_quote(&self, symbol: &str) -> Result<Option<Quote>, CoreError>;

    /// Candidate matches for a free-text query, capped at a small count
    /// per source (5).
    async fn search(&self, query: &str) -> Result<Vec<SymbolMatch>, CoreError>;
}

/// Trait abstraction for the exchange-rate source.
#[async_trait]
pub trait FxRateProvider: Send + Sync {
    /// Current USD→KRW rate.
    async fn usd_krw(&self) -> Result<f64, CoreError>;
}
