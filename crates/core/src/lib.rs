pub mod errors;
pub mod models;
pub mod providers;
pub mod services;
pub mod store;

use chrono::NaiveDate;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::watch;

use models::{
    holding::Holding,
    quote::{Quote, SymbolMatch},
    record::{NewTradeRecord, RawTradeRecord, TradeRecord, TradeRecordPatch, TradeType},
    report::{RealizedReport, TimeWindow, ValuationSummary},
    settings::{DisplayCurrency, Settings},
};
use providers::exchange_rate::OpenErApiProvider;
use providers::registry::QuoteProviderRegistry;
use services::{
    fx_service::FxService, portfolio_service::PortfolioService, quote_service::QuoteService,
    report_service::ReportService, search_service::SearchService,
};
use store::normalize::normalize_snapshot;
use store::traits::TradeStore;

use errors::CoreError;

/// Main entry point for the trade journal core.
///
/// Holds the latest record snapshot pushed by the store and all services
/// needed to derive holdings, P/L figures, and quote/search results from
/// it. Holdings and reports are recomputed from the snapshot on every
/// read — there is no incrementally-maintained state to drift.
#[must_use]
pub struct TradeJournal {
    store: Arc<dyn TradeStore>,
    user_id: String,
    records: Vec<TradeRecord>,
    settings: Settings,
    portfolio_service: PortfolioService,
    report_service: ReportService,
    quote_service: QuoteService,
    search_service: SearchService,
    fx_service: FxService,
}

impl std::fmt::Debug for TradeJournal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TradeJournal")
            .field("user_id", &self.user_id)
            .field("records", &self.records.len())
            .field("display_currency", &self.settings.display_currency)
            .finish()
    }
}

impl TradeJournal {
    /// Create a journal for a user against a trade record store.
    pub fn new(store: Arc<dyn TradeStore>, user_id: impl Into<String>, settings: Settings) -> Self {
        let quote_registry = QuoteProviderRegistry::from_settings(&settings);
        let search_registry = QuoteProviderRegistry::from_settings(&settings);
        let fx_service = FxService::new(
            Box::new(OpenErApiProvider::new()),
            settings.fallback_usd_krw,
        );

        Self {
            store,
            user_id: user_id.into(),
            records: Vec::new(),
            settings,
            portfolio_service: PortfolioService::new(),
            report_service: ReportService::new(),
            quote_service: QuoteService::new(quote_registry),
            search_service: SearchService::new(search_registry),
            fx_service,
        }
    }

    /// Create a journal with explicitly built services (tests inject
    /// mock providers and short timers here).
    pub fn with_services(
        store: Arc<dyn TradeStore>,
        user_id: impl Into<String>,
        settings: Settings,
        quote_service: QuoteService,
        search_service: SearchService,
        fx_service: FxService,
    ) -> Self {
        Self {
            store,
            user_id: user_id.into(),
            records: Vec::new(),
            settings,
            portfolio_service: PortfolioService::new(),
            report_service: ReportService::new(),
            quote_service,
            search_service,
            fx_service,
        }
    }

    // ── Snapshot intake ─────────────────────────────────────────────

    /// Replace the record snapshot. Invoked for every store push; the
    /// latest push wins wholesale.
    pub fn apply_snapshot(&mut self, mut records: Vec<TradeRecord>) {
        // Stable sort keeps the store's same-day ordering intact
        records.sort_by(|a, b| b.date.cmp(&a.date));
        self.records = records;
    }

    /// Replace the snapshot from wire-shaped records, resolving legacy
    /// fields at this boundary.
    pub fn apply_raw_snapshot(&mut self, raw: Vec<RawTradeRecord>) {
        self.apply_snapshot(normalize_snapshot(raw));
    }

    /// Pull the current record set from the store. A read failure is
    /// logged and clears the snapshot rather than propagating.
    pub async fn refresh(&mut self) {
        match self.store.list(&self.user_id).await {
            Ok(records) => self.apply_snapshot(records),
            Err(e) => {
                tracing::warn!(error = %e, "trade record list failed; clearing snapshot");
                self.records.clear();
            }
        }
    }

    /// Subscribe to the store's snapshot pushes for this user.
    /// Feed received snapshots back through [`Self::apply_snapshot`].
    pub async fn subscribe(&self) -> watch::Receiver<Vec<TradeRecord>> {
        self.store.subscribe(&self.user_id).await
    }

    // ── Record management ───────────────────────────────────────────

    /// Add a trade record. Write failures surface as errors and are not
    /// retried.
    pub async fn add_record(&self, record: NewTradeRecord) -> Result<String, CoreError> {
        self.store.create(&self.user_id, record).await
    }

    /// Edit an existing record.
    pub async fn edit_record(&self, id: &str, patch: TradeRecordPatch) -> Result<(), CoreError> {
        self.store.update(&self.user_id, id, patch).await
    }

    /// Delete a record.
    pub async fn remove_record(&self, id: &str) -> Result<(), CoreError> {
        self.store.delete(&self.user_id, id).await
    }

    // ── Journal views ───────────────────────────────────────────────

    /// All records in the current snapshot, newest date first.
    #[must_use]
    pub fn records(&self) -> &[TradeRecord] {
        &self.records
    }

    /// The `n` most recent records (dashboard activity feed).
    #[must_use]
    pub fn recent(&self, n: usize) -> &[TradeRecord] {
        &self.records[..n.min(self.records.len())]
    }

    /// Records filtered by trade type.
    #[must_use]
    pub fn records_by_type(&self, trade_type: TradeType) -> Vec<&TradeRecord> {
        self.records
            .iter()
            .filter(|r| r.trade_type == trade_type)
            .collect()
    }

    /// Search records by matching query against symbol, name, and notes
    /// (case-insensitive).
    #[must_use]
    pub fn search_records(&self, query: &str) -> Vec<&TradeRecord> {
        let q = query.to_lowercase();
        self.records
            .iter()
            .filter(|r| {
                r.symbol.to_lowercase().contains(&q)
                    || r.name.to_lowercase().contains(&q)
                    || r.notes.as_deref().unwrap_or("").to_lowercase().contains(&q)
            })
            .collect()
    }

    /// Total number of records in the snapshot.
    #[must_use]
    pub fn trade_count(&self) -> usize {
        self.records.len()
    }

    // ── Holdings & valuation ────────────────────────────────────────

    /// Current holdings, derived from the full snapshot.
    #[must_use]
    pub fn holdings(&self) -> Vec<Holding> {
        self.portfolio_service.calculate_holdings(&self.records)
    }

    /// Live quotes for every current holding, fetched concurrently.
    /// Symbols whose lookup failed are simply absent.
    pub async fn refresh_quotes(&self) -> HashMap<String, Quote> {
        let holdings = self.holdings();
        let symbols: Vec<String> = holdings.into_iter().map(|h| h.symbol).collect();
        self.quote_service.quotes_for(&symbols).await
    }

    /// Unrealized P/L across current holdings, using live quotes and
    /// the USD→KRW rate.
    pub async fn valuation(&self) -> ValuationSummary {
        let quotes = self.refresh_quotes().await;
        let rate = self.fx_service.usd_krw().await;
        self.valuation_with(&quotes, rate)
    }

    /// Pure valuation from pre-fetched quotes and rate.
    #[must_use]
    pub fn valuation_with(&self, quotes: &HashMap<String, Quote>, usd_krw: f64) -> ValuationSummary {
        self.report_service
            .valuation(&self.holdings(), quotes, usd_krw)
    }

    // ── Realized P/L & win rate ─────────────────────────────────────

    /// Realized P/L for a window ending today (local time).
    #[must_use]
    pub fn realized(&self, window: TimeWindow) -> RealizedReport {
        self.realized_at(window, chrono::Local::now().date_naive())
    }

    /// Realized P/L for a window relative to an explicit `today`.
    #[must_use]
    pub fn realized_at(&self, window: TimeWindow, today: NaiveDate) -> RealizedReport {
        self.report_service.realized(&self.records, window, today)
    }

    /// Win rate over all sell records, in whole percent.
    #[must_use]
    pub fn win_rate(&self) -> u32 {
        self.report_service.win_rate(&self.records)
    }

    // ── Display currency ────────────────────────────────────────────

    #[must_use]
    pub fn display_currency(&self) -> DisplayCurrency {
        self.settings.display_currency
    }

    /// Flip between KRW and USD display.
    pub fn toggle_display_currency(&mut self) -> DisplayCurrency {
        self.settings.display_currency = self.settings.display_currency.toggle();
        self.settings.display_currency
    }

    /// Convert an internal KRW figure to the current display currency.
    pub async fn to_display(&self, value_krw: f64) -> f64 {
        let rate = self.fx_service.usd_krw().await;
        self.report_service
            .to_display(value_krw, self.settings.display_currency, rate)
    }

    /// Current settings.
    #[must_use]
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    // ── Symbol search ───────────────────────────────────────────────

    /// Search all configured quote sources for ticker matches.
    pub async fn search_symbols(&self, query: &str) -> Vec<SymbolMatch> {
        self.search_service.search(query).await
    }

    /// Debounced variant for keystroke-driven search; returns `None`
    /// when a newer query superseded this one.
    pub async fn search_symbols_debounced(&self, query: &str) -> Option<Vec<SymbolMatch>> {
        self.search_service.search_debounced(query).await
    }

    /// Current quote for a single symbol (add-entry price auto-fill).
    pub async fn quote(&self, symbol: &str) -> Option<Quote> {
        self.quote_service.quote(symbol).await
    }
}
