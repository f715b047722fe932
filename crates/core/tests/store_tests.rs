// ═══════════════════════════════════════════════════════════════════
// Store Tests — InMemoryTradeStore contract & snapshot normalization
// ═══════════════════════════════════════════════════════════════════

use chrono::NaiveDate;

use trade_journal_core::errors::CoreError;
use trade_journal_core::models::record::{
    NewTradeRecord, RawTradeRecord, TradeRecordPatch, TradeType,
};
use trade_journal_core::store::memory::InMemoryTradeStore;
use trade_journal_core::store::normalize::normalize_snapshot;
use trade_journal_core::store::traits::TradeStore;

fn make_date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn new_record(date: NaiveDate, symbol: &str, trade_type: TradeType) -> NewTradeRecord {
    NewTradeRecord {
        date,
        symbol: symbol.to_string(),
        name: symbol.to_string(),
        trade_type,
        price: 100,
        quantity: 1,
        profit: 0,
        notes: None,
    }
}

// ═══════════════════════════════════════════════════════════════════
// CRUD
// ═══════════════════════════════════════════════════════════════════

mod crud {
    use super::*;

    #[tokio::test]
    async fn create_assigns_distinct_ids() {
        let store = InMemoryTradeStore::new();
        let id1 = store
            .create("u1", new_record(make_date(2025, 1, 1), "AAPL", TradeType::Buy))
            .await
            .unwrap();
        let id2 = store
            .create("u1", new_record(make_date(2025, 1, 2), "AAPL", TradeType::Buy))
            .await
            .unwrap();

        assert_ne!(id1, id2);
        assert_eq!(store.list("u1").await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn list_is_ordered_newest_first() {
        let store = InMemoryTradeStore::new();
        for (day, sym) in [(1, "A"), (3, "C"), (2, "B")] {
            store
                .create("u1", new_record(make_date(2025, 1, day), sym, TradeType::Buy))
                .await
                .unwrap();
        }

        let records = store.list("u1").await.unwrap();
        let symbols: Vec<&str> = records.iter().map(|r| r.symbol.as_str()).collect();
        assert_eq!(symbols, vec!["C", "B", "A"]);
    }

    #[tokio::test]
    async fn create_validates_the_record() {
        let store = InMemoryTradeStore::new();
        let mut invalid = new_record(make_date(2025, 1, 1), "AAPL", TradeType::Buy);
        invalid.quantity = 0;

        let result = store.create("u1", invalid).await;
        assert!(matches!(result, Err(CoreError::Validation(_))));
        assert!(store.list("u1").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn create_zeroes_profit_on_buys() {
        let store = InMemoryTradeStore::new();
        let mut buy = new_record(make_date(2025, 1, 1), "AAPL", TradeType::Buy);
        buy.profit = 5000;

        store.create("u1", buy).await.unwrap();
        assert_eq!(store.list("u1").await.unwrap()[0].profit, 0);
    }

    #[tokio::test]
    async fn update_applies_partial_patch() {
        let store = InMemoryTradeStore::new();
        let id = store
            .create("u1", new_record(make_date(2025, 1, 1), "AAPL", TradeType::Buy))
            .await
            .unwrap();

        let patch = TradeRecordPatch {
            price: Some(175),
            notes: Some(Some("adjusted".to_string())),
            ..Default::default()
        };
        store.update("u1", &id, patch).await.unwrap();

        let records = store.list("u1").await.unwrap();
        assert_eq!(records[0].price, 175);
        assert_eq!(records[0].notes.as_deref(), Some("adjusted"));
        // Untouched fields survive
        assert_eq!(records[0].symbol, "AAPL");
    }

    #[tokio::test]
    async fn update_rejects_invalid_result() {
        let store = InMemoryTradeStore::new();
        let id = store
            .create("u1", new_record(make_date(2025, 1, 1), "AAPL", TradeType::Buy))
            .await
            .unwrap();

        let patch = TradeRecordPatch {
            quantity: Some(-3),
            ..Default::default()
        };
        assert!(store.update("u1", &id, patch).await.is_err());

        // Original record is left untouched
        assert_eq!(store.list("u1").await.unwrap()[0].quantity, 1);
    }

    #[tokio::test]
    async fn update_unknown_id_fails() {
        let store = InMemoryTradeStore::new();
        store
            .create("u1", new_record(make_date(2025, 1, 1), "AAPL", TradeType::Buy))
            .await
            .unwrap();

        let result = store
            .update("u1", "missing", TradeRecordPatch::default())
            .await;
        assert!(matches!(result, Err(CoreError::RecordNotFound(_))));
    }

    #[tokio::test]
    async fn delete_removes_the_record() {
        let store = InMemoryTradeStore::new();
        let id = store
            .create("u1", new_record(make_date(2025, 1, 1), "AAPL", TradeType::Buy))
            .await
            .unwrap();

        store.delete("u1", &id).await.unwrap();
        assert!(store.list("u1").await.unwrap().is_empty());

        let again = store.delete("u1", &id).await;
        assert!(matches!(again, Err(CoreError::RecordNotFound(_))));
    }

    #[tokio::test]
    async fn users_are_isolated() {
        let store = InMemoryTradeStore::new();
        store
            .create("u1", new_record(make_date(2025, 1, 1), "AAPL", TradeType::Buy))
            .await
            .unwrap();

        assert!(store.list("u2").await.unwrap().is_empty());
    }
}

// ═══════════════════════════════════════════════════════════════════
// Subscription
// ═══════════════════════════════════════════════════════════════════

mod subscription {
    use super::*;

    #[tokio::test]
    async fn every_mutation_pushes_a_full_snapshot() {
        let store = InMemoryTradeStore::new();
        let mut rx = store.subscribe("u1").await;
        assert!(rx.borrow().is_empty());

        let id = store
            .create("u1", new_record(make_date(2025, 1, 1), "AAPL", TradeType::Buy))
            .await
            .unwrap();
        rx.changed().await.unwrap();
        assert_eq!(rx.borrow().len(), 1);

        store.delete("u1", &id).await.unwrap();
        rx.changed().await.unwrap();
        assert!(rx.borrow().is_empty());
    }

    #[tokio::test]
    async fn slow_consumer_sees_only_the_latest_snapshot() {
        let store = InMemoryTradeStore::new();
        let mut rx = store.subscribe("u1").await;

        // Three mutations land before the consumer looks again
        for day in 1..=3 {
            store
                .create("u1", new_record(make_date(2025, 1, day), "AAPL", TradeType::Buy))
                .await
                .unwrap();
        }

        rx.changed().await.unwrap();
        // Last write wins: the receiver holds the final state, not a queue
        assert_eq!(rx.borrow_and_update().len(), 3);
        assert!(!rx.has_changed().unwrap());
    }

    #[tokio::test]
    async fn late_subscriber_is_seeded_with_current_state() {
        let store = InMemoryTradeStore::new();
        store
            .create("u1", new_record(make_date(2025, 1, 1), "AAPL", TradeType::Buy))
            .await
            .unwrap();

        let rx = store.subscribe("u1").await;
        assert_eq!(rx.borrow().len(), 1);
    }
}

// ═══════════════════════════════════════════════════════════════════
// Wire-snapshot normalization
// ═══════════════════════════════════════════════════════════════════

mod normalization {
    use super::*;

    fn raw(id: &str, symbol: Option<&str>, ticker: Option<&str>) -> RawTradeRecord {
        RawTradeRecord {
            id: id.to_string(),
            date: make_date(2025, 1, 1),
            symbol: symbol.map(String::from),
            ticker: ticker.map(String::from),
            name: None,
            trade_type: TradeType::Buy,
            price: 100,
            quantity: 1,
            profit: 0,
            notes: None,
        }
    }

    #[test]
    fn legacy_records_are_canonicalized() {
        let records = normalize_snapshot(vec![
            raw("r1", Some("005930"), None),
            raw("r2", None, Some("AAPL")),
        ]);

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].symbol, "005930");
        assert_eq!(records[1].symbol, "AAPL");
        assert_eq!(records[1].name, "AAPL");
    }

    #[test]
    fn malformed_records_are_dropped_not_fatal() {
        let records = normalize_snapshot(vec![
            raw("r1", None, None),
            raw("r2", Some("AAPL"), None),
        ]);

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].symbol, "AAPL");
    }
}
