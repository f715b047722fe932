use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tracing::warn;

use crate::models::quote::SymbolMatch;
use crate::providers::registry::QuoteProviderRegistry;

/// Minimum query length before a search is dispatched.
const MIN_QUERY_LEN: usize = 2;

/// Quiet period a keystroke must survive before its search runs.
pub const DEBOUNCE_DELAY: Duration = Duration::from_millis(500);

/// Ticker search across all configured sources, with keystroke debounce.
///
/// Each source caps its own result count (5 local Korean matches, 5
/// remote US matches); results merge Korean-first. A failing source is
/// logged and skipped — the other side's matches still come back.
pub struct SearchService {
    registry: QuoteProviderRegistry,
    delay: Duration,
    generation: AtomicU64,
}

impl SearchService {
    pub fn new(registry: QuoteProviderRegistry) -> Self {
        Self::with_delay(registry, DEBOUNCE_DELAY)
    }

    /// Construct with an explicit debounce delay (tests use a short one).
    pub fn with_delay(registry: QuoteProviderRegistry, delay: Duration) -> Self {
        Self {
            registry,
            delay,
            generation: AtomicU64::new(0),
        }
    }

    /// Search every source immediately and merge the matches.
    pub async fn search(&self, query: &str) -> Vec<SymbolMatch> {
        let query = query.trim();
        if query.chars().count() < MIN_QUERY_LEN {
            return Vec::new();
        }

        let mut matches = Vec::new();
        for provider in self.registry.all() {
            match provider.search(query).await {
                Ok(found) => matches.extend(found),
                Err(e) => {
                    warn!(provider = provider.name(), error = %e, "symbol search failed");
                }
            }
        }
        matches
    }

    /// Debounced search: waits out the quiet period and dispatches only
    /// if no newer call arrived meanwhile. A superseded call returns
    /// `None` — its search is never sent.
    pub async fn search_debounced(&self, query: &str) -> Option<Vec<SymbolMatch>> {
        let ticket = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        tokio::time::sleep(self.delay).await;
        if self.generation.load(Ordering::SeqCst) != ticket {
            return None;
        }
        Some(self.search(query).await)
    }
}
