use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;

use crate::errors::CoreError;
use crate::models::quote::{Currency, Market, Quote, SymbolMatch};
use super::krx::KrxSymbolIndex;
use super::traits::QuoteProvider;

const BASE_URL: &str = "https://openapi.koreainvestment.com:9443";

/// Reuse a token only while it has at least this long left to live.
pub const TOKEN_EXPIRY_BUFFER: Duration = Duration::from_secs(60);

/// Refresh policy: a cached token is reusable only while `now` is more
/// than [`TOKEN_EXPIRY_BUFFER`] before its expiry.
pub fn token_reusable(expires_at: Instant, now: Instant) -> bool {
    expires_at.checked_duration_since(now).is_some_and(|left| left > TOKEN_EXPIRY_BUFFER)
}

struct CachedToken {
    access_token: String,
    expires_at: Instant,
}

/// Manages the KIS OAuth-style access token.
///
/// The exchange is client-credentials: app key + secret are traded for a
/// bearer token with a server-supplied lifetime. The token is held here —
/// not in process-global state — and re-issued when it comes within the
/// safety buffer of expiry.
pub struct KisTokenManager {
    client: Client,
    base_url: String,
    app_key: String,
    app_secret: String,
    token: Mutex<Option<CachedToken>>,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: u64,
}

impl KisTokenManager {
    pub fn new(client: Client, app_key: String, app_secret: String) -> Self {
        Self::with_base_url(client, app_key, app_secret, BASE_URL.to_string())
    }

    /// Point the token exchange at a different host (for tests).
    pub fn with_base_url(
        client: Client,
        app_key: String,
        app_secret: String,
        base_url: String,
    ) -> Self {
        Self {
            client,
            base_url,
            app_key,
            app_secret,
            token: Mutex::new(None),
        }
    }

    /// Return a valid bearer token, re-running the credentials exchange
    /// if the cached one is missing or inside the expiry buffer.
    pub async fn access_token(&self) -> Result<String, CoreError> {
        let mut guard = self.token.lock().await;
        if let Some(cached) = guard.as_ref() {
            if token_reusable(cached.expires_at, Instant::now()) {
                return Ok(cached.access_token.clone());
            }
        }

        let url = format!("{}/oauth2/tokenP", self.base_url);
        let body = serde_json::json!({
            "grant_type": "client_credentials",
            "appkey": self.app_key,
            "appsecret": self.app_secret,
        });

        let resp: TokenResponse = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await?
            .json()
            .await
            .map_err(|e| CoreError::Auth {
                provider: "KIS".into(),
                message: format!("Failed to parse token response: {e}"),
            })?;

        let token = resp.access_token.clone();
        *guard = Some(CachedToken {
            access_token: resp.access_token,
            expires_at: Instant::now() + Duration::from_secs(resp.expires_in),
        });
        Ok(token)
    }
}

/// Korea Investment & Securities OpenAPI provider for domestic equities.
///
/// Quotes require a bearer token (see [`KisTokenManager`]); symbol search
/// is served from the bundled KRX listing index, the same way the app
/// resolved Korean names locally.
pub struct KisProvider {
    client: Client,
    base_url: String,
    app_key: String,
    app_secret: String,
    tokens: KisTokenManager,
    index: KrxSymbolIndex,
}

impl KisProvider {
    pub fn new(app_key: String, app_secret: String) -> Self {
        Self::with_base_url(app_key, app_secret, BASE_URL.to_string())
    }

    pub fn with_base_url(app_key: String, app_secret: String, base_url: String) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .unwrap_or_else(|_| Client::new());
        let tokens = KisTokenManager::with_base_url(
            client.clone(),
            app_key.clone(),
            app_secret.clone(),
            base_url.clone(),
        );
        Self {
            client,
            base_url,
            app_key,
            app_secret,
            tokens,
            index: KrxSymbolIndex::bundled(),
        }
    }
}

// ── KIS API response types ──────────────────────────────────────────

#[derive(Deserialize)]
struct InquirePriceResponse {
    rt_cd: String,
    #[serde(default)]
    msg1: Option<String>,
    #[serde(default)]
    output: Option<InquirePriceOutput>,
}

#[derive(Deserialize)]
struct InquirePriceOutput {
    /// Current traded price, serialized as a string of won
    stck_prpr: String,
}

#[async_trait]
impl QuoteProvider for KisProvider {
    fn name(&self) -> &str {
        "KIS"
    }

    fn market(&self) -> Market {
        Market::Korea
    }

    async fn current_quote(&self, symbol: &str) -> Result<Option<Quote>, CoreError> {
        let token = self.tokens.access_token().await?;

        let url = format!(
            "{}/uapi/domestic-stock/v1/quotations/inquire-price",
            self.base_url
        );
        let resp: InquirePriceResponse = self
            .client
            .get(&url)
            .header("authorization", format!("Bearer {token}"))
            .header("appkey", &self.app_key)
            .header("appsecret", &self.app_secret)
            .header("tr_id", "FHKST01010100")
            .query(&[("fid_cond_mrkt_div_code", "J"), ("fid_input_iscd", symbol)])
            .send()
            .await?
            .json()
            .await
            .map_err(|e| CoreError::Api {
                provider: "KIS".into(),
                message: format!("Failed to parse quote for {symbol}: {e}"),
            })?;

        if resp.rt_cd != "0" {
            return Err(CoreError::Api {
                provider: "KIS".into(),
                message: resp
                    .msg1
                    .unwrap_or_else(|| format!("quote request for {symbol} rejected")),
            });
        }

        let price = match resp.output {
            Some(output) => output.stck_prpr.parse::<f64>().map_err(|e| CoreError::Api {
                provider: "KIS".into(),
                message: format!("Invalid price format for {symbol}: {e}"),
            })?,
            None => return Ok(None),
        };

        Ok(Some(Quote {
            price,
            currency: Currency::Krw,
        }))
    }

    async fn search(&self, query: &str) -> Result<Vec<SymbolMatch>, CoreError> {
        Ok(self.index.search(query))
    }
}
