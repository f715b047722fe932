// ═══════════════════════════════════════════════════════════════════
// Model Tests — TradeRecord normalization/validation, TimeWindow,
// Market routing, QuoteCache, DisplayCurrency
// ═══════════════════════════════════════════════════════════════════

use chrono::NaiveDate;
use std::time::{Duration, Instant};

use trade_journal_core::models::quote::{Currency, Market, Quote, QuoteCache};
use trade_journal_core::models::record::{
    NewTradeRecord, RawTradeRecord, TradeRecord, TradeRecordPatch, TradeType,
};
use trade_journal_core::models::report::TimeWindow;
use trade_journal_core::models::settings::DisplayCurrency;

fn make_date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn raw(id: &str, symbol: Option<&str>, ticker: Option<&str>, name: Option<&str>) -> RawTradeRecord {
    RawTradeRecord {
        id: id.to_string(),
        date: make_date(2025, 3, 1),
        symbol: symbol.map(String::from),
        ticker: ticker.map(String::from),
        name: name.map(String::from),
        trade_type: TradeType::Buy,
        price: 72500,
        quantity: 10,
        profit: 0,
        notes: None,
    }
}

// ═══════════════════════════════════════════════════════════════════
// Record normalization
// ═══════════════════════════════════════════════════════════════════

mod normalization {
    use super::*;

    #[test]
    fn symbol_passes_through() {
        let record = raw("r1", Some("005930"), None, Some("삼성전자"))
            .normalize()
            .unwrap();
        assert_eq!(record.symbol, "005930");
        assert_eq!(record.name, "삼성전자");
    }

    #[test]
    fn legacy_ticker_fills_missing_symbol() {
        let record = raw("r2", None, Some("AAPL"), None).normalize().unwrap();
        assert_eq!(record.symbol, "AAPL");
    }

    #[test]
    fn symbol_wins_over_ticker() {
        let record = raw("r3", Some("005930"), Some("AAPL"), None)
            .normalize()
            .unwrap();
        assert_eq!(record.symbol, "005930");
    }

    #[test]
    fn missing_name_falls_back_to_symbol() {
        let record = raw("r4", None, Some("TSLA"), None).normalize().unwrap();
        assert_eq!(record.name, "TSLA");
    }

    #[test]
    fn empty_symbol_treated_as_missing() {
        let record = raw("r5", Some(""), Some("AAPL"), None).normalize().unwrap();
        assert_eq!(record.symbol, "AAPL");
    }

    #[test]
    fn no_symbol_or_ticker_is_malformed() {
        let result = raw("r6", None, None, None).normalize();
        assert!(result.is_err());
    }

    #[test]
    fn missing_profit_deserializes_to_zero() {
        let json = r#"{
            "id": "abc",
            "date": "2025-03-01",
            "ticker": "AAPL",
            "type": "buy",
            "price": 150,
            "quantity": 3
        }"#;
        let raw: RawTradeRecord = serde_json::from_str(json).unwrap();
        assert_eq!(raw.profit, 0);
        assert_eq!(raw.trade_type, TradeType::Buy);
    }

    #[test]
    fn trade_type_uses_lowercase_wire_names() {
        let record = raw("r7", Some("AAPL"), None, None).normalize().unwrap();
        let json = serde_json::to_string(&record).unwrap();
        assert!(json.contains(r#""type":"buy""#));
    }
}

// ═══════════════════════════════════════════════════════════════════
// Record validation & construction
// ═══════════════════════════════════════════════════════════════════

mod validation {
    use super::*;

    fn record_with(price: i64, quantity: i64) -> TradeRecord {
        TradeRecord {
            id: "id".into(),
            date: make_date(2025, 1, 1),
            symbol: "AAPL".into(),
            name: "Apple".into(),
            trade_type: TradeType::Buy,
            price,
            quantity,
            profit: 0,
            notes: None,
        }
    }

    #[test]
    fn valid_record_passes() {
        assert!(record_with(100, 1).validate().is_ok());
    }

    #[test]
    fn zero_price_allowed() {
        assert!(record_with(0, 1).validate().is_ok());
    }

    #[test]
    fn zero_quantity_rejected() {
        assert!(record_with(100, 0).validate().is_err());
    }

    #[test]
    fn negative_quantity_rejected() {
        assert!(record_with(100, -5).validate().is_err());
    }

    #[test]
    fn negative_price_rejected() {
        assert!(record_with(-1, 5).validate().is_err());
    }

    #[test]
    fn buy_profit_forced_to_zero_on_create() {
        let new = NewTradeRecord {
            date: make_date(2025, 1, 1),
            symbol: "AAPL".into(),
            name: "Apple".into(),
            trade_type: TradeType::Buy,
            price: 100,
            quantity: 1,
            profit: 9999,
            notes: None,
        };
        let record = new.into_record("id".into());
        assert_eq!(record.profit, 0);
    }

    #[test]
    fn sell_keeps_entered_profit() {
        let new = NewTradeRecord {
            date: make_date(2025, 1, 1),
            symbol: "AAPL".into(),
            name: "Apple".into(),
            trade_type: TradeType::Sell,
            price: 100,
            quantity: 1,
            profit: -250,
            notes: None,
        };
        let record = new.into_record("id".into());
        assert_eq!(record.profit, -250);
        assert_eq!(record.effective_profit(), -250);
    }

    #[test]
    fn buy_effective_profit_is_zero() {
        let mut record = record_with(100, 1);
        record.profit = 500; // corrupt legacy data
        assert_eq!(record.effective_profit(), 0);
    }

    #[test]
    fn patch_edit_to_buy_clears_profit() {
        let mut record = record_with(100, 1);
        record.trade_type = TradeType::Sell;
        record.profit = 300;

        let patch = TradeRecordPatch {
            trade_type: Some(TradeType::Buy),
            ..Default::default()
        };
        patch.apply(&mut record);

        assert_eq!(record.trade_type, TradeType::Buy);
        assert_eq!(record.profit, 0);
    }

    #[test]
    fn patch_can_clear_notes() {
        let mut record = record_with(100, 1);
        record.notes = Some("memo".into());

        let patch = TradeRecordPatch {
            notes: Some(None),
            ..Default::default()
        };
        patch.apply(&mut record);

        assert_eq!(record.notes, None);
    }
}

// ═══════════════════════════════════════════════════════════════════
// Time windows
// ═══════════════════════════════════════════════════════════════════

mod time_windows {
    use super::*;

    // 2025-06-18 is a Wednesday
    fn today() -> NaiveDate {
        make_date(2025, 6, 18)
    }

    #[test]
    fn day_starts_at_today() {
        assert_eq!(TimeWindow::Day.start(today()), Some(make_date(2025, 6, 18)));
    }

    #[test]
    fn week_starts_on_most_recent_sunday() {
        assert_eq!(
            TimeWindow::Week.start(today()),
            Some(make_date(2025, 6, 15))
        );
    }

    #[test]
    fn week_start_on_a_sunday_is_that_sunday() {
        let sunday = make_date(2025, 6, 15);
        assert_eq!(TimeWindow::Week.start(sunday), Some(sunday));
    }

    #[test]
    fn month_starts_on_the_first() {
        assert_eq!(
            TimeWindow::Month.start(today()),
            Some(make_date(2025, 6, 1))
        );
    }

    #[test]
    fn year_starts_on_january_first() {
        assert_eq!(TimeWindow::Year.start(today()), Some(make_date(2025, 1, 1)));
    }

    #[test]
    fn all_has_no_start() {
        assert_eq!(TimeWindow::All.start(today()), None);
    }

    #[test]
    fn contains_is_inclusive_of_the_start() {
        assert!(TimeWindow::Month.contains(make_date(2025, 6, 1), today()));
        assert!(!TimeWindow::Month.contains(make_date(2025, 5, 31), today()));
        assert!(TimeWindow::All.contains(make_date(1999, 1, 1), today()));
    }
}

// ═══════════════════════════════════════════════════════════════════
// Market routing
// ═══════════════════════════════════════════════════════════════════

mod market_routing {
    use super::*;

    #[test]
    fn six_digit_numeric_routes_to_korea() {
        assert_eq!(Market::of("005930"), Market::Korea);
        assert_eq!(Market::of("373220"), Market::Korea);
    }

    #[test]
    fn hangul_routes_to_korea() {
        assert_eq!(Market::of("삼성전자"), Market::Korea);
    }

    #[test]
    fn alphabetic_routes_to_us() {
        assert_eq!(Market::of("AAPL"), Market::UnitedStates);
        assert_eq!(Market::of("TSLA"), Market::UnitedStates);
    }

    #[test]
    fn five_digit_numeric_is_not_korean() {
        assert_eq!(Market::of("12345"), Market::UnitedStates);
    }

    #[test]
    fn seven_digit_numeric_is_not_korean() {
        assert_eq!(Market::of("1234567"), Market::UnitedStates);
    }

    #[test]
    fn mixed_alphanumeric_is_not_korean() {
        assert_eq!(Market::of("00593A"), Market::UnitedStates);
    }
}

// ═══════════════════════════════════════════════════════════════════
// Quote cache TTL
// ═══════════════════════════════════════════════════════════════════

mod quote_cache {
    use super::*;

    fn krw(price: f64) -> Quote {
        Quote {
            price,
            currency: Currency::Krw,
        }
    }

    #[test]
    fn fresh_entry_is_returned() {
        let mut cache = QuoteCache::new(Duration::from_secs(60));
        let t0 = Instant::now();
        cache.insert("005930", krw(71900.0), t0);

        let just_before = t0 + Duration::from_secs(59);
        assert_eq!(cache.get("005930", just_before), Some(krw(71900.0)));
    }

    #[test]
    fn stale_entry_is_not_returned() {
        let mut cache = QuoteCache::new(Duration::from_secs(60));
        let t0 = Instant::now();
        cache.insert("005930", krw(71900.0), t0);

        let at_ttl = t0 + Duration::from_secs(60);
        assert_eq!(cache.get("005930", at_ttl), None);
    }

    #[test]
    fn stale_entry_is_kept_until_superseded() {
        let mut cache = QuoteCache::new(Duration::from_secs(60));
        let t0 = Instant::now();
        cache.insert("005930", krw(71900.0), t0);

        // Past the TTL the entry still occupies the cache...
        assert_eq!(cache.len(), 1);

        // ...and a re-insert supersedes it in place
        let t1 = t0 + Duration::from_secs(120);
        cache.insert("005930", krw(72000.0), t1);
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get("005930", t1), Some(krw(72000.0)));
    }

    #[test]
    fn unknown_symbol_misses() {
        let cache = QuoteCache::new(Duration::from_secs(60));
        assert_eq!(cache.get("AAPL", Instant::now()), None);
    }
}

// ═══════════════════════════════════════════════════════════════════
// Display currency
// ═══════════════════════════════════════════════════════════════════

mod display_currency {
    use super::*;

    #[test]
    fn toggle_flips_both_ways() {
        assert_eq!(DisplayCurrency::Krw.toggle(), DisplayCurrency::Usd);
        assert_eq!(DisplayCurrency::Usd.toggle(), DisplayCurrency::Krw);
    }

    #[test]
    fn serializes_as_iso_codes() {
        assert_eq!(
            serde_json::to_string(&DisplayCurrency::Krw).unwrap(),
            r#""KRW""#
        );
        assert_eq!(
            serde_json::to_string(&DisplayCurrency::Usd).unwrap(),
            r#""USD""#
        );
    }

    #[test]
    fn quote_normalizes_usd_to_krw() {
        let quote = Quote {
            price: 200.0,
            currency: Currency::Usd,
        };
        assert_eq!(quote.price_in_krw(1400.0), 280_000.0);

        let domestic = Quote {
            price: 71900.0,
            currency: Currency::Krw,
        };
        assert_eq!(domestic.price_in_krw(1400.0), 71900.0);
    }
}
