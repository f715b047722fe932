use serde::{Deserialize, Serialize};

/// Currency all dashboard figures are displayed in.
///
/// Internally everything is computed in KRW; USD display divides by the
/// live exchange rate. This is the one piece of user preference the host
/// app persists locally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DisplayCurrency {
    #[serde(rename = "KRW")]
    Krw,
    #[serde(rename = "USD")]
    Usd,
}

impl DisplayCurrency {
    pub fn toggle(self) -> Self {
        match self {
            DisplayCurrency::Krw => DisplayCurrency::Usd,
            DisplayCurrency::Usd => DisplayCurrency::Krw,
        }
    }
}

/// Fallback USD→KRW rate used when the FX service cannot be reached.
pub const FALLBACK_USD_KRW: f64 = 1400.0;

/// User-configurable settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Dashboard display currency
    pub display_currency: DisplayCurrency,

    /// Finnhub API key (US quotes and search)
    pub finnhub_api_key: Option<String>,

    /// Korea Investment & Securities app key/secret (Korean quotes)
    pub kis_app_key: Option<String>,
    pub kis_app_secret: Option<String>,

    /// USD→KRW rate used when the live fetch fails
    pub fallback_usd_krw: f64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            display_currency: DisplayCurrency::Krw,
            finnhub_api_key: None,
            kis_app_key: None,
            kis_app_secret: None,
            fallback_usd_krw: FALLBACK_USD_KRW,
        }
    }
}
