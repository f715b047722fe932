use std::collections::HashMap;

use crate::models::holding::Holding;
use crate::models::record::{TradeRecord, TradeType};

/// Folds trade records into current holdings.
///
/// Pure business logic — no I/O, no API calls. Easy to test.
pub struct PortfolioService;

#[derive(Debug)]
struct Accumulator {
    symbol: String,
    name: String,
    quantity: i64,
    total_cost: i64,
    avg_price: i64,
}

impl PortfolioService {
    pub fn new() -> Self {
        Self
    }

    /// Calculate current holdings from the full record set.
    ///
    /// Records are folded in chronological order (same-day records keep
    /// their input order), pooling all lots of a symbol into one
    /// weighted-average position:
    /// - a buy adds to the cost accumulator and recomputes the average;
    /// - a sell reduces quantity and rescales the accumulator so the
    ///   average stays put — selling never moves the cost basis of the
    ///   remaining shares;
    /// - a position whose quantity reaches zero or below is dropped
    ///   entirely. Overselling therefore silently closes the position
    ///   rather than erroring; the next buy starts from a fresh basis.
    ///
    /// Returns holdings sorted by symbol for deterministic output.
    pub fn calculate_holdings(&self, records: &[TradeRecord]) -> Vec<Holding> {
        let mut ordered: Vec<&TradeRecord> = records.iter().collect();
        // Stable sort: same-day records retain their relative input order
        ordered.sort_by_key(|r| r.date);

        let mut positions: HashMap<String, Accumulator> = HashMap::new();

        for record in ordered {
            let acc = positions
                .entry(record.symbol.clone())
                .or_insert_with(|| Accumulator {
                    symbol: record.symbol.clone(),
                    name: record.name.clone(),
                    quantity: 0,
                    total_cost: 0,
                    avg_price: 0,
                });

            match record.trade_type {
                TradeType::Buy => {
                    acc.total_cost += record.price * record.quantity;
                    acc.quantity += record.quantity;
                    acc.avg_price = if acc.quantity > 0 {
                        ((acc.total_cost as f64) / (acc.quantity as f64)).round() as i64
                    } else {
                        0
                    };
                }
                TradeType::Sell => {
                    acc.quantity -= record.quantity;
                    acc.total_cost = acc.quantity * acc.avg_price;
                }
            }

            if acc.quantity <= 0 {
                positions.remove(&record.symbol);
            }
        }

        let mut holdings: Vec<Holding> = positions
            .into_values()
            .map(|acc| Holding {
                symbol: acc.symbol,
                name: acc.name,
                quantity: acc.quantity,
                avg_price: acc.avg_price,
                total_cost: acc.total_cost,
            })
            .collect();
        holdings.sort_by(|a, b| a.symbol.cmp(&b.symbol));
        holdings
    }
}

impl Default for PortfolioService {
    fn default() -> Self {
        Self::new()
    }
}
