use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

use crate::errors::CoreError;
use crate::models::quote::{Currency, Market, Quote, SymbolMatch};
use super::traits::QuoteProvider;

const BASE_URL: &str = "https://finnhub.io/api/v1";

/// How many search matches this source contributes.
const SEARCH_LIMIT: usize = 5;

/// Finnhub API provider for US equity quotes and symbol search.
///
/// - **Requires**: API key (settings field `finnhub_api_key`).
/// - **Quote**: `/quote` returns the current price in the `c` field;
///   a price of 0 means Finnhub does not know the symbol.
/// - **Search**: `/search` over tickers and company names.
///
/// All prices are USD; KRW normalization happens in the report layer.
pub struct FinnhubProvider {
    client: Client,
    api_key: String,
}

impl FinnhubProvider {
    pub fn new(api_key: String) -> Self {
        let builder = Client::builder().timeout(Duration::from_secs(10));
        Self {
            client: builder.build().unwrap_or_else(|_| Client::new()),
            api_key,
        }
    }
}

// ── Finnhub API response types ──────────────────────────────────────

#[derive(Deserialize)]
struct QuoteResponse {
    /// Current price
    c: Option<f64>,
}

#[derive(Deserialize)]
struct SearchResponse {
    #[serde(default)]
    result: Vec<SearchResult>,
}

#[derive(Deserialize)]
struct SearchResult {
    symbol: String,
    description: String,
}

#[async_trait]
impl QuoteProvider for FinnhubProvider {
    fn name(&self) -> &str {
        "Finnhub"
    }

    fn market(&self) -> Market {
        Market::UnitedStates
    }

    async fn current_quote(&self, symbol: &str) -> Result<Option<Quote>, CoreError> {
        let url = format!("{BASE_URL}/quote");
        let symbol_upper = symbol.to_uppercase();
        let resp: QuoteResponse = self
            .client
            .get(&url)
            .query(&[("symbol", symbol_upper.as_str()), ("token", self.api_key.as_str())])
            .send()
            .await?
            .json()
            .await
            .map_err(|e| CoreError::Api {
                provider: "Finnhub".into(),
                message: format!("Failed to parse quote for {symbol}: {e}"),
            })?;

        // Finnhub reports unknown symbols as a zero quote rather than an error
        match resp.c {
            Some(price) if price > 0.0 && price.is_finite() => Ok(Some(Quote {
                price,
                currency: Currency::Usd,
            })),
            _ => Ok(None),
        }
    }

    async fn search(&self, query: &str) -> Result<Vec<SymbolMatch>, CoreError> {
        let url = format!("{BASE_URL}/search");
        let resp: SearchResponse = self
            .client
            .get(&url)
            .query(&[("q", query), ("token", &self.api_key)])
            .send()
            .await?
            .json()
            .await
            .map_err(|e| CoreError::Api {
                provider: "Finnhub".into(),
                message: format!("Failed to parse search results for '{query}': {e}"),
            })?;

        Ok(resp
            .result
            .into_iter()
            .take(SEARCH_LIMIT)
            .map(|r| SymbolMatch {
                symbol: r.symbol,
                name: r.description,
                currency: Currency::Usd,
                market: Market::UnitedStates,
            })
            .collect())
    }
}
