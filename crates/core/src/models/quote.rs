use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::{Duration, Instant};

/// Currency a quoted price is denominated in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Currency {
    #[serde(rename = "KRW")]
    Krw,
    #[serde(rename = "USD")]
    Usd,
}

impl std::fmt::Display for Currency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Currency::Krw => write!(f, "KRW"),
            Currency::Usd => write!(f, "USD"),
        }
    }
}

/// A live price for a symbol, as returned by a quote provider.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    pub price: f64,
    pub currency: Currency,
}

impl Quote {
    /// Normalize this quote to KRW using the given USD→KRW rate.
    pub fn price_in_krw(&self, usd_krw: f64) -> f64 {
        match self.currency {
            Currency::Krw => self.price,
            Currency::Usd => self.price * usd_krw,
        }
    }
}

/// Which market-data source handles a symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Market {
    /// Korean domestic equities (KOSPI/KOSDAQ)
    Korea,
    /// US equities
    UnitedStates,
}

impl Market {
    /// Route a symbol to its market.
    ///
    /// Korean listings use 6-digit numeric codes (e.g., "005930"); a
    /// Hangul name entered directly also routes to the Korean source.
    /// Everything else goes to the US provider.
    pub fn of(symbol: &str) -> Market {
        let six_digit = symbol.len() == 6 && symbol.chars().all(|c| c.is_ascii_digit());
        let hangul = symbol.chars().any(|c| ('가'..='힣').contains(&c));
        if six_digit || hangul {
            Market::Korea
        } else {
            Market::UnitedStates
        }
    }
}

impl std::fmt::Display for Market {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Market::Korea => write!(f, "KR"),
            Market::UnitedStates => write!(f, "US"),
        }
    }
}

/// A candidate match from symbol search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SymbolMatch {
    pub symbol: String,
    pub name: String,
    pub currency: Currency,
    pub market: Market,
}

/// How long a cached quote stays fresh.
pub const QUOTE_TTL: Duration = Duration::from_secs(60);

/// In-memory TTL cache for quotes, keyed by symbol.
///
/// Explicitly constructed and passed where needed — no process-global
/// state. Entries live for the configured TTL after insertion; stale
/// entries are only ever superseded, never proactively removed. All
/// methods take `now` so freshness is testable without sleeping.
#[derive(Debug)]
pub struct QuoteCache {
    ttl: Duration,
    entries: HashMap<String, (Quote, Instant)>,
}

impl QuoteCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: HashMap::new(),
        }
    }

    /// Get a cached quote if it is still within its TTL.
    pub fn get(&self, symbol: &str, now: Instant) -> Option<Quote> {
        let (quote, inserted_at) = self.entries.get(symbol)?;
        if now.duration_since(*inserted_at) < self.ttl {
            Some(*quote)
        } else {
            None
        }
    }

    /// Insert or supersede the cached quote for a symbol.
    pub fn insert(&mut self, symbol: impl Into<String>, quote: Quote, now: Instant) {
        self.entries.insert(symbol.into(), (quote, now));
    }

    /// Number of entries currently held (fresh or stale).
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for QuoteCache {
    fn default() -> Self {
        Self::new(QUOTE_TTL)
    }
}
