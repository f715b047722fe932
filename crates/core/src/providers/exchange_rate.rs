use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;

use crate::errors::CoreError;
use super::traits::FxRateProvider;

const BASE_URL: &str = "https://open.er-api.com/v6";

/// open.er-api.com provider for fiat exchange rates.
///
/// - **Free**: no API key required.
/// - **Endpoint**: `/latest/{base}` returns rates for every quote
///   currency keyed by code.
///
/// Only the USD→KRW pair is consumed here; valuation fetches it once per
/// session and falls back to a constant when this call fails.
pub struct OpenErApiProvider {
    client: Client,
    base_url: String,
}

impl OpenErApiProvider {
    pub fn new() -> Self {
        Self::with_base_url(BASE_URL.to_string())
    }

    pub fn with_base_url(base_url: String) -> Self {
        let builder = Client::builder().timeout(Duration::from_secs(10));
        Self {
            client: builder.build().unwrap_or_else(|_| Client::new()),
            base_url,
        }
    }
}

impl Default for OpenErApiProvider {
    fn default() -> Self {
        Self::new()
    }
}

// ── open.er-api.com response types ──────────────────────────────────

#[derive(Deserialize)]
struct LatestRatesResponse {
    rates: HashMap<String, f64>,
}

#[async_trait]
impl FxRateProvider for OpenErApiProvider {
    async fn usd_krw(&self) -> Result<f64, CoreError> {
        let url = format!("{}/latest/USD", self.base_url);

        let resp: LatestRatesResponse = self
            .client
            .get(&url)
            .send()
            .await?
            .json()
            .await
            .map_err(|e| CoreError::Api {
                provider: "open.er-api.com".into(),
                message: format!("Failed to parse USD rates: {e}"),
            })?;

        resp.rates.get("KRW").copied().ok_or_else(|| CoreError::Api {
            provider: "open.er-api.com".into(),
            message: "No KRW rate in USD response".into(),
        })
    }
}
