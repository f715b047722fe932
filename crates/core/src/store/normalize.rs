use tracing::warn;

use crate::models::record::{RawTradeRecord, TradeRecord};

/// Normalize a wire snapshot into canonical records.
///
/// This is the single place the legacy `ticker` fallback is resolved —
/// applied once where data enters from the store, so business logic
/// never carries fallback checks. Malformed records (no symbol at all)
/// are logged and dropped rather than failing the whole snapshot.
pub fn normalize_snapshot(raw: Vec<RawTradeRecord>) -> Vec<TradeRecord> {
    raw.into_iter()
        .filter_map(|r| {
            let id = r.id.clone();
            match r.normalize() {
                Ok(record) => Some(record),
                Err(e) => {
                    warn!(record_id = %id, error = %e, "dropping malformed trade record");
                    None
                }
            }
        })
        .collect()
}
