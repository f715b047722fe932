use serde::{Deserialize, Serialize};

/// Current net position in a symbol, derived from trade history.
///
/// Holdings are never persisted — they are recomputed from the full
/// ordered record set on every read and vanish the moment net quantity
/// reaches zero or below. A later buy starts a fresh zero-cost-basis
/// position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Holding {
    /// Ticker identifier
    pub symbol: String,

    /// Display name carried over from the trade records
    pub name: String,

    /// Net position; `> 0` by construction
    pub quantity: i64,

    /// Weighted-average cost basis per unit, rounded to the nearest integer
    pub avg_price: i64,

    /// Cost-basis accumulator; kept at `avg_price * quantity` after sells
    /// so the average stays stable
    pub total_cost: i64,
}

impl Holding {
    /// Cost basis of the whole position (`avg_price * quantity`).
    pub fn invested(&self) -> i64 {
        self.avg_price * self.quantity
    }
}
