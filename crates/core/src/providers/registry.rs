use crate::models::quote::Market;
use crate::models::settings::Settings;

use super::finnhub::FinnhubProvider;
use super::kis::KisProvider;
use super::traits::QuoteProvider;

/// Registry of all configured quote providers.
///
/// Routes requests to the correct source based on the symbol's market.
/// New sources can be added without modifying existing code.
pub struct QuoteProviderRegistry {
    providers: Vec<Box<dyn QuoteProvider>>,
}

impl QuoteProviderRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            providers: Vec::new(),
        }
    }

    /// Create a registry with every provider the settings hold
    /// credentials for.
    pub fn from_settings(settings: &Settings) -> Self {
        let mut registry = Self::new();

        // KIS — Korean domestic equities, requires app key + secret
        if let (Some(key), Some(secret)) = (&settings.kis_app_key, &settings.kis_app_secret) {
            registry.register(Box::new(KisProvider::new(key.clone(), secret.clone())));
        }

        // Finnhub — US equities, requires API key
        if let Some(key) = &settings.finnhub_api_key {
            registry.register(Box::new(FinnhubProvider::new(key.clone())));
        }

        registry
    }

    /// Register a new quote provider.
    pub fn register(&mut self, provider: Box<dyn QuoteProvider>) {
        self.providers.push(provider);
    }

    /// Find the provider serving the symbol's market.
    pub fn provider_for(&self, symbol: &str) -> Option<&dyn QuoteProvider> {
        let market = Market::of(symbol);
        self.providers
            .iter()
            .find(|p| p.market() == market)
            .map(|p| p.as_ref())
    }

    /// All registered providers, Korean sources first (search merges in
    /// this order).
    pub fn all(&self) -> Vec<&dyn QuoteProvider> {
        let mut providers: Vec<&dyn QuoteProvider> =
            self.providers.iter().map(|p| p.as_ref()).collect();
        providers.sort_by_key(|p| match p.market() {
            Market::Korea => 0,
            Market::UnitedStates => 1,
        });
        providers
    }

    /// Whether any provider serves the given market.
    pub fn has_provider_for(&self, market: Market) -> bool {
        self.providers.iter().any(|p| p.market() == market)
    }
}

impl Default for QuoteProviderRegistry {
    fn default() -> Self {
        Self::new()
    }
}
