use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use super::holding::Holding;
use super::quote::Quote;

/// Time window for realized P/L filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeWindow {
    /// Since local midnight today
    Day,
    /// Since the most recent week start (Sunday)
    Week,
    /// Since the 1st of the current month
    Month,
    /// Since January 1st of the current year
    Year,
    /// No filter
    All,
}

impl TimeWindow {
    /// Inclusive start date of this window relative to `today`,
    /// or `None` for the unbounded window.
    pub fn start(&self, today: NaiveDate) -> Option<NaiveDate> {
        match self {
            TimeWindow::Day => Some(today),
            TimeWindow::Week => {
                let back = today.weekday().num_days_from_sunday() as i64;
                Some(today - Duration::days(back))
            }
            TimeWindow::Month => today.with_day(1),
            TimeWindow::Year => NaiveDate::from_ymd_opt(today.year(), 1, 1),
            TimeWindow::All => None,
        }
    }

    /// Whether `date` falls inside this window relative to `today`.
    pub fn contains(&self, date: NaiveDate, today: NaiveDate) -> bool {
        match self.start(today) {
            Some(start) => date >= start,
            None => true,
        }
    }
}

/// A holding enriched with its live quote, all figures normalized to KRW.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HoldingValuation {
    pub holding: Holding,

    /// The live quote, if one was available
    pub quote: Option<Quote>,

    /// Quote normalized to KRW; falls back to the cost basis when no
    /// quote is available, so the holding still values at break-even
    pub current_price_krw: f64,

    /// `(current_price_krw - avg_price) / avg_price * 100`;
    /// `None` when no quote is available
    pub profit_rate: Option<f64>,
}

/// Unrealized P/L across all holdings, normalized to KRW.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValuationSummary {
    /// Sum of `current_price_krw * quantity` across holdings
    pub total_holdings_value_krw: f64,

    /// Sum of `avg_price * quantity` across holdings
    pub total_invested_krw: f64,

    /// `total_holdings_value_krw - total_invested_krw`
    pub unrealized_krw: f64,

    /// `unrealized / invested * 100`; 0 when nothing is invested
    pub unrealized_rate: f64,

    /// Per-holding breakdown
    pub holdings: Vec<HoldingValuation>,
}

/// Realized P/L over a time window.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RealizedReport {
    pub window: TimeWindow,

    /// Sum of the `profit` field over records in the window
    pub realized_krw: i64,

    /// Number of records in the window
    pub trade_count: usize,
}
