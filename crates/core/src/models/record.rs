use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::errors::CoreError;

/// Direction of a trade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TradeType {
    /// Buying / opening or adding to a position
    Buy,
    /// Selling / reducing or closing a position
    Sell,
}

impl std::fmt::Display for TradeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TradeType::Buy => write!(f, "buy"),
            TradeType::Sell => write!(f, "sell"),
        }
    }
}

/// A single buy/sell entry in the journal, in canonical form.
///
/// Produced by [`RawTradeRecord::normalize`] at the store boundary —
/// business logic never sees the legacy wire shape.
///
/// **Currency**: `price` and `profit` carry no currency of their own and
/// are treated as KRW everywhere. A USD-denominated trade logged here is
/// silently mixed in — a known limitation of the original data model,
/// preserved as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeRecord {
    /// Opaque identifier assigned by the store
    pub id: String,

    /// Trade date (no time component — daily granularity)
    pub date: NaiveDate,

    /// Ticker identifier (e.g., "005930", "AAPL")
    pub symbol: String,

    /// Human-readable display name; falls back to `symbol` for legacy records
    pub name: String,

    /// Buy or sell
    #[serde(rename = "type")]
    pub trade_type: TradeType,

    /// Unit price at time of trade, non-negative, implicitly KRW
    pub price: i64,

    /// Number of shares/units, positive
    pub quantity: i64,

    /// User-entered realized profit/loss; meaningful only on sells,
    /// always 0 on buys
    #[serde(default)]
    pub profit: i64,

    /// Optional free-text annotation
    #[serde(default)]
    pub notes: Option<String>,
}

impl TradeRecord {
    /// Check the record invariants: `quantity > 0`, `price >= 0`.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.quantity <= 0 {
            return Err(CoreError::Validation(format!(
                "quantity must be positive, got {}",
                self.quantity
            )));
        }
        if self.price < 0 {
            return Err(CoreError::Validation(format!(
                "price must be non-negative, got {}",
                self.price
            )));
        }
        Ok(())
    }

    /// The profit figure that counts toward realized P/L.
    /// Buys always contribute 0 regardless of what was stored.
    pub fn effective_profit(&self) -> i64 {
        match self.trade_type {
            TradeType::Sell => self.profit,
            TradeType::Buy => 0,
        }
    }
}

/// The wire shape of a trade record as older clients stored it.
///
/// Legacy records carry a `ticker` field instead of `symbol` and may lack
/// a display `name`. Normalization resolves both fallbacks exactly once,
/// here, so the rest of the crate deals only in [`TradeRecord`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawTradeRecord {
    pub id: String,
    pub date: NaiveDate,
    #[serde(default)]
    pub symbol: Option<String>,
    /// Legacy field name, superseded by `symbol`
    #[serde(default)]
    pub ticker: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub trade_type: TradeType,
    pub price: i64,
    pub quantity: i64,
    #[serde(default)]
    pub profit: i64,
    #[serde(default)]
    pub notes: Option<String>,
}

impl RawTradeRecord {
    /// Resolve the legacy fallbacks into the canonical record shape.
    ///
    /// `symbol` falls back to `ticker`; `name` falls back to the resolved
    /// symbol. A record with neither `symbol` nor `ticker` is malformed.
    pub fn normalize(self) -> Result<TradeRecord, CoreError> {
        let symbol = self
            .symbol
            .filter(|s| !s.is_empty())
            .or(self.ticker.filter(|t| !t.is_empty()))
            .ok_or_else(|| {
                CoreError::Validation(format!("record {} has no symbol or ticker", self.id))
            })?;

        let name = self
            .name
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| symbol.clone());

        Ok(TradeRecord {
            id: self.id,
            date: self.date,
            symbol,
            name,
            trade_type: self.trade_type,
            price: self.price,
            quantity: self.quantity,
            profit: self.profit,
            notes: self.notes,
        })
    }
}

/// Fields for a record about to be created; the store assigns the id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewTradeRecord {
    pub date: NaiveDate,
    pub symbol: String,
    pub name: String,
    #[serde(rename = "type")]
    pub trade_type: TradeType,
    pub price: i64,
    pub quantity: i64,
    #[serde(default)]
    pub profit: i64,
    #[serde(default)]
    pub notes: Option<String>,
}

impl NewTradeRecord {
    /// Attach a store-assigned id, producing the canonical record.
    /// Buys get their `profit` forced to 0 here.
    pub fn into_record(self, id: String) -> TradeRecord {
        let profit = match self.trade_type {
            TradeType::Sell => self.profit,
            TradeType::Buy => 0,
        };
        TradeRecord {
            id,
            date: self.date,
            symbol: self.symbol,
            name: self.name,
            trade_type: self.trade_type,
            price: self.price,
            quantity: self.quantity,
            profit,
            notes: self.notes,
        }
    }
}

/// Partial update applied to an existing record. `None` fields are left
/// untouched; `notes` uses a nested Option so it can be cleared explicitly.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TradeRecordPatch {
    pub date: Option<NaiveDate>,
    pub symbol: Option<String>,
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub trade_type: Option<TradeType>,
    pub price: Option<i64>,
    pub quantity: Option<i64>,
    pub profit: Option<i64>,
    pub notes: Option<Option<String>>,
}

impl TradeRecordPatch {
    /// Apply this patch on top of `record`.
    pub fn apply(self, record: &mut TradeRecord) {
        if let Some(date) = self.date {
            record.date = date;
        }
        if let Some(symbol) = self.symbol {
            record.symbol = symbol;
        }
        if let Some(name) = self.name {
            record.name = name;
        }
        if let Some(trade_type) = self.trade_type {
            record.trade_type = trade_type;
        }
        if let Some(price) = self.price {
            record.price = price;
        }
        if let Some(quantity) = self.quantity {
            record.quantity = quantity;
        }
        if let Some(profit) = self.profit {
            record.profit = profit;
        }
        if let Some(notes) = self.notes {
            record.notes = notes;
        }
        // A record edited into a buy loses its realized profit
        if record.trade_type == TradeType::Buy {
            record.profit = 0;
        }
    }
}
