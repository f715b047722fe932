use tokio::sync::OnceCell;
use tracing::warn;

use crate::providers::traits::FxRateProvider;

/// Provides the USD→KRW exchange rate for valuation.
///
/// The rate is fetched once per service lifetime; a fetch failure is
/// logged and silently replaced by the configured fallback constant so
/// valuation is never blocked on the FX source.
pub struct FxService {
    provider: Box<dyn FxRateProvider>,
    fallback: f64,
    rate: OnceCell<f64>,
}

impl FxService {
    pub fn new(provider: Box<dyn FxRateProvider>, fallback: f64) -> Self {
        Self {
            provider,
            fallback,
            rate: OnceCell::new(),
        }
    }

    /// The USD→KRW rate. Never fails: falls back to the constant when
    /// the live fetch does.
    pub async fn usd_krw(&self) -> f64 {
        *self
            .rate
            .get_or_init(|| async {
                match self.provider.usd_krw().await {
                    Ok(rate) => rate,
                    Err(e) => {
                        warn!(error = %e, fallback = self.fallback, "FX rate fetch failed");
                        self.fallback
                    }
                }
            })
            .await
    }
}
