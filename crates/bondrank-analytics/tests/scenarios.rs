//! End-to-end calculation scenarios with hand-checked figures.

use bondrank_analytics::prelude::*;
use bondrank_config::{BatchConfig, EngineConfig};
use bondrank_core::prelude::*;
use rust_decimal_macros::dec;

fn date(y: i32, m: u32, d: u32) -> Date {
    Date::from_ymd(y, m, d).unwrap()
}

fn reference_bond(today: Date) -> InstrumentSnapshot {
    InstrumentSnapshot::new("RU000A105SG2")
        .with_names("RU000A105SG2", "Sample 1P1")
        .with_coupon(dec!(40), 182, 90)
        .with_face_value(dec!(1000))
        .with_price(dec!(980))
        .with_maturity_date(today.add_days(365))
}

#[test]
fn test_reference_bond_from_config_defaults() {
    let today = date(2025, 6, 2);
    let config = EngineConfig::default();
    let calc = MetricsCalculator::new(config.calculation_params()).unwrap();

    let m = calc.calculate(&reference_bond(today), today).unwrap();

    assert_eq!(m.as_of, today);
    assert_eq!(m.accrued_interest, dec!(20.0000));
    assert_eq!(m.fee, dec!(3.0000));
    assert_eq!(m.total_cost, dec!(1003.0000));
    assert_eq!(m.projected_coupon_income_to_maturity, dec!(100.0000));
    assert_eq!(m.gross_profit, dec!(97.0000));
    assert_eq!(m.net_profit, dec!(84.3900));
    assert_eq!(m.annual_yield, dec!(8.4138));
}

#[test]
fn test_expired_bond_is_counted_and_batch_continues() {
    let today = date(2025, 6, 2);
    let expired = InstrumentSnapshot::new("RU000AEXPIRED")
        .with_coupon(dec!(40), 182, 90)
        .with_face_value(dec!(1000))
        .with_price(dec!(999))
        .with_maturity_date(today.add_days(-1));

    let outcome = calculate_batch(
        &[expired, reference_bond(today)],
        &CalculationParams::default(),
        today,
        &BatchConfig::default(),
    )
    .unwrap();

    assert_eq!(outcome.calculated.len(), 1);
    assert_eq!(outcome.calculated[0].isin(), "RU000A105SG2");
    assert_eq!(outcome.skipped.len(), 1);
    assert_eq!(outcome.skipped[0].isin, "RU000AEXPIRED");
    assert_eq!(outcome.skipped[0].reason, SkipReason::MaturityNotInFuture);
    assert_eq!(outcome.stats.count(SkipKind::MaturityNotInFuture), 1);
}

#[test]
fn test_offer_disappears_once_passed() {
    let offer_date = date(2025, 12, 1);
    let snapshot = reference_bond(date(2025, 6, 2)).with_offer_date(offer_date);
    let params = CalculationParams::default();

    let before = calculate(&snapshot, &params, date(2025, 11, 30)).unwrap();
    assert_eq!(before.offer.as_ref().map(|o| o.days_to_offer), Some(1));
    let offer = before.offer.as_ref().unwrap();
    assert_eq!(offer.projected_coupon_income_to_offer, before.accrued_interest);

    let on_the_day = calculate(&snapshot, &params, offer_date).unwrap();
    assert!(on_the_day.offer.is_none());
}

#[test]
fn test_store_round_trip() {
    let today = date(2025, 6, 2);
    let store = MetricsStore::new();
    let outcome = calculate_batch(
        &[reference_bond(today)],
        &CalculationParams::default(),
        today,
        &BatchConfig::sequential(),
    )
    .unwrap();
    store.publish(outcome);

    let book = store.current();
    let record = book.get("RU000A105SG2").unwrap();
    assert_eq!(record.metrics.annual_yield, dec!(8.4138));
}
