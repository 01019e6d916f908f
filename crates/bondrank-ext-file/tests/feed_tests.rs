//! Reading and merging file feeds.

use std::io::Write;

use bondrank_core::Date;
use bondrank_ext_file::*;
use rust_decimal_macros::dec;
use tempfile::NamedTempFile;

fn temp_file(suffix: &str, content: &str) -> NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

#[test]
fn test_csv_feed_with_empty_cells() {
    let file = temp_file(
        ".csv",
        "isin,ticker,short_name,coupon_value,coupon_length_days,coupon_days_passed,face_value,maturity_date,offer_date,price\n\
         RU000A1,SU26238,OFZ 26238,35.4,182,20,1000,2041-05-15,,612.3\n\
         RU000A2,,,,,,,,,\n",
    );

    let records = CsvSnapshotSource::new(file.path()).load().unwrap();
    assert_eq!(records.len(), 2);

    let first = &records[0];
    assert_eq!(first.ticker.as_deref(), Some("SU26238"));
    assert_eq!(first.coupon_value, Some(dec!(35.4)));
    assert_eq!(first.coupon_length_days, Some(182));
    assert_eq!(first.maturity_date, Some(Date::from_ymd(2041, 5, 15).unwrap()));
    assert_eq!(first.offer_date, None);
    assert_eq!(first.price, Some(dec!(612.3)));

    assert_eq!(records[1].isin.as_deref(), Some("RU000A2"));
    assert_eq!(records[1].price, None);
}

#[test]
fn test_csv_partial_columns() {
    let file = temp_file(".csv", "isin,rating_label\nRU000A1,ruAA+\n");
    let records = CsvSnapshotSource::new(file.path()).load().unwrap();
    assert_eq!(records[0].rating_label.as_deref(), Some("ruAA+"));
    assert_eq!(records[0].price, None);
}

#[test]
fn test_csv_bad_cell_names_row() {
    let file = temp_file(".csv", "isin,price\nRU000A1,980\nRU000A2,abc\n");
    let source = CsvSnapshotSource::new(file.path());
    let err = source.load().unwrap_err();
    match err {
        ExtError::Parse {
            source_name, row, message,
        } => {
            assert_eq!(source_name, source.name());
            assert_eq!(row, 2);
            assert!(message.contains("price"));
        }
        other => panic!("unexpected error {other:?}"),
    }
}

#[test]
fn test_csv_row_without_isin_rejected() {
    let file = temp_file(".csv", "isin,price\n,980\n");
    let err = CsvSnapshotSource::new(file.path()).load().unwrap_err();
    assert!(matches!(err, ExtError::MissingIsin { row: 1, .. }));
}

#[test]
fn test_json_feed() {
    let file = temp_file(
        ".json",
        r#"[
            {"isin": "RU000A1", "price": "980.25", "rating_code": 40},
            {"isin": "RU000A2", "face_value": 1000, "maturity_date": "2027-01-31"}
        ]"#,
    );
    let records = JsonSnapshotSource::new(file.path()).load().unwrap();
    assert_eq!(records[0].price, Some(dec!(980.25)));
    assert_eq!(records[0].rating_code, Some(40));
    assert_eq!(records[1].face_value, Some(dec!(1000)));
    assert_eq!(records[1].maturity_date, Some(Date::from_ymd(2027, 1, 31).unwrap()));
}

#[test]
fn test_json_malformed_document() {
    let file = temp_file(".json", r#"{"isin": "RU000A1"}"#);
    let err = JsonSnapshotSource::new(file.path()).load().unwrap_err();
    assert!(matches!(err, ExtError::Parse { row: 0, .. }));
}

#[test]
fn test_missing_file_is_io_error() {
    let err = CsvSnapshotSource::new("/nonexistent/feed.csv").load().unwrap_err();
    assert!(matches!(err, ExtError::Io { .. }));
}

#[test]
fn test_unsupported_extension() {
    assert!(matches!(
        source_for_path("feed.xlsx"),
        Err(ExtError::UnsupportedFormat(_))
    ));
}

#[test]
fn test_load_snapshots_merges_in_order() {
    let reference = temp_file(
        ".csv",
        "isin,short_name,coupon_value,coupon_length_days,coupon_days_passed,face_value,maturity_date,price\n\
         RU000A1,Alpha 1P,40,182,90,1000,2026-03-01,975\n\
         RU000A2,Beta 2P,20,91,10,1000,2027-06-30,990\n",
    );
    let prices = temp_file(
        ".json",
        r#"[{"isin": "RU000A1", "price": "980"}, {"isin": "RU000A3", "price": "101.5"}]"#,
    );
    let ratings = temp_file(".csv", "isin,rating_label,price\nRU000A1,ruAA,\nRU000A2,ruBBB-,\n");

    let snapshots = load_snapshots(&[reference.path(), prices.path(), ratings.path()]).unwrap();

    let isins: Vec<&str> = snapshots.iter().map(|s| s.isin.as_str()).collect();
    assert_eq!(isins, vec!["RU000A1", "RU000A2", "RU000A3"]);

    let alpha = &snapshots[0];
    assert_eq!(alpha.price, Some(dec!(980)));
    assert_eq!(alpha.rating_label.as_deref(), Some("ruAA"));
    assert_eq!(alpha.short_name.as_deref(), Some("Alpha 1P"));

    let beta = &snapshots[1];
    assert_eq!(beta.price, Some(dec!(990)));

    let only_price = &snapshots[2];
    assert_eq!(only_price.price, Some(dec!(101.5)));
    assert_eq!(only_price.maturity_date, None);
}
