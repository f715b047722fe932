use chrono::NaiveDate;
use std::collections::HashMap;

use crate::models::holding::Holding;
use crate::models::quote::Quote;
use crate::models::record::{TradeRecord, TradeType};
use crate::models::report::{HoldingValuation, RealizedReport, TimeWindow, ValuationSummary};
use crate::models::settings::DisplayCurrency;

/// Computes display figures: unrealized P/L, realized P/L over time
/// windows, win rate, and display-currency conversion.
///
/// All inputs (quotes, exchange rate, today) are parameters — the service
/// itself holds no state and is re-run whenever any input changes.
pub struct ReportService;

impl ReportService {
    pub fn new() -> Self {
        Self
    }

    // ── Unrealized P/L ──────────────────────────────────────────────

    /// Enrich holdings with live quotes and the USD→KRW rate.
    ///
    /// Every figure is normalized to KRW: USD quotes are multiplied by
    /// the rate, KRW quotes pass through, and a holding with no quote
    /// falls back to its own cost basis (valuing at break-even rather
    /// than dropping out of the total).
    pub fn valuation(
        &self,
        holdings: &[Holding],
        quotes: &HashMap<String, Quote>,
        usd_krw: f64,
    ) -> ValuationSummary {
        let mut rows = Vec::with_capacity(holdings.len());
        let mut total_value = 0.0;
        let mut total_invested = 0.0;

        for holding in holdings {
            let quote = quotes.get(&holding.symbol).copied();

            let current_price_krw = match quote {
                Some(q) => q.price_in_krw(usd_krw),
                None => holding.avg_price as f64,
            };

            let profit_rate = quote.map(|_| {
                if holding.avg_price == 0 {
                    0.0
                } else {
                    (current_price_krw - holding.avg_price as f64)
                        / holding.avg_price as f64
                        * 100.0
                }
            });

            total_value += current_price_krw * holding.quantity as f64;
            total_invested += (holding.avg_price * holding.quantity) as f64;

            rows.push(HoldingValuation {
                holding: holding.clone(),
                quote,
                current_price_krw,
                profit_rate,
            });
        }

        let unrealized = total_value - total_invested;
        let unrealized_rate = if total_invested > 0.0 {
            unrealized / total_invested * 100.0
        } else {
            0.0
        };

        ValuationSummary {
            total_holdings_value_krw: total_value,
            total_invested_krw: total_invested,
            unrealized_krw: unrealized,
            unrealized_rate,
            holdings: rows,
        }
    }

    // ── Realized P/L ────────────────────────────────────────────────

    /// Sum the `profit` field over records inside the window.
    ///
    /// A pure re-filter of the record set: changing the window never
    /// mutates stored records. All record types are summed — buys carry
    /// a constructed profit of 0, so only sells contribute.
    pub fn realized(
        &self,
        records: &[TradeRecord],
        window: TimeWindow,
        today: NaiveDate,
    ) -> RealizedReport {
        let mut realized = 0i64;
        let mut count = 0usize;

        for record in records {
            if window.contains(record.date, today) {
                realized += record.profit;
                count += 1;
            }
        }

        RealizedReport {
            window,
            realized_krw: realized,
            trade_count: count,
        }
    }

    /// Win rate over ALL sell records regardless of time window:
    /// `round(wins / sells * 100)`, 0 when there are no sells.
    pub fn win_rate(&self, records: &[TradeRecord]) -> u32 {
        let sells: Vec<&TradeRecord> = records
            .iter()
            .filter(|r| r.trade_type == TradeType::Sell)
            .collect();
        if sells.is_empty() {
            return 0;
        }
        let wins = sells.iter().filter(|r| r.profit > 0).count();
        ((wins as f64 / sells.len() as f64) * 100.0).round() as u32
    }

    // ── Display currency ────────────────────────────────────────────

    /// Convert an internal KRW figure to the display currency.
    pub fn to_display(&self, value_krw: f64, currency: DisplayCurrency, usd_krw: f64) -> f64 {
        match currency {
            DisplayCurrency::Krw => value_krw,
            DisplayCurrency::Usd => value_krw / usd_krw,
        }
    }

    /// Convert a display-currency figure back to KRW.
    pub fn from_display(&self, value: f64, currency: DisplayCurrency, usd_krw: f64) -> f64 {
        match currency {
            DisplayCurrency::Krw => value,
            DisplayCurrency::Usd => value * usd_krw,
        }
    }
}

impl Default for ReportService {
    fn default() -> Self {
        Self::new()
    }
}
