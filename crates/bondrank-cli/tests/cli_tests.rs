//! End-to-end tests for the bondrank binary.

use std::io::Write;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::NamedTempFile;

fn temp_file(suffix: &str, content: &str) -> NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

/// Three bonds as of 2025-03-01: one expired, one plain, one with a pending offer.
fn universe() -> NamedTempFile {
    temp_file(
        ".csv",
        "isin,ticker,short_name,coupon_value,coupon_length_days,coupon_days_passed,face_value,maturity_date,offer_date,price,rating_label\n\
         RU000A0PLAIN,PLN1,Plain 1P,40,182,90,1000,2026-03-01,,980,ruAA\n\
         RU000A0OFFER,OFR1,Offer 2P,40,182,90,1000,2027-03-01,2025-08-28,980,ruBBB\n\
         RU000A0EXPRD,EXP1,Expired 3P,40,182,90,1000,2025-02-28,,990,ruA\n",
    )
}

fn bondrank() -> Command {
    let mut cmd = Command::cargo_bin("bondrank").unwrap();
    cmd.env_remove("BONDRANK_CONFIG").env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_calc_json_output() {
    let input = universe();
    bondrank()
        .args(["-f", "json", "calc", "--as-of", "2025-03-01", "--input"])
        .arg(input.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("RU000A0PLAIN"))
        .stdout(predicate::str::contains("\"annual_yield\": \"8.4138\""))
        .stdout(predicate::str::contains("\"total_cost\": \"1003.0000\""))
        .stdout(predicate::str::contains("RU000A0EXPRD").not())
        .stderr(predicate::str::contains("1 of 3 instruments skipped"));
}

#[test]
fn test_calc_fee_override() {
    let input = universe();
    bondrank()
        .args(["-f", "csv", "-q", "calc", "--as-of", "2025-03-01", "--fee-rate", "1.0", "--input"])
        .arg(input.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("1010.0000"))
        .stdout(predicate::str::contains("7.7525"));
}

#[test]
fn test_calc_rejects_bad_tax_rate() {
    let input = universe();
    bondrank()
        .args(["calc", "--as-of", "2025-03-01", "--tax-rate", "120", "--input"])
        .arg(input.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("tax_rate_pct"));
}

#[test]
fn test_rank_prefers_offer() {
    let input = universe();
    bondrank()
        .args(["-f", "json", "rank", "--as-of", "2025-03-01", "--prefer-offer", "--input"])
        .arg(input.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("\"basis\": \"offer\""))
        .stdout(predicate::str::contains("2025-08-28"));
}

#[test]
fn test_rank_rating_whitelist() {
    let input = universe();
    bondrank()
        .args(["-f", "csv", "-q", "rank", "--as-of", "2025-03-01", "--rating", "RUAA", "--input"])
        .arg(input.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("RU000A0PLAIN"))
        .stdout(predicate::str::contains("RU000A0OFFER").not());
}

#[test]
fn test_rank_inverted_yield_band_fails() {
    bondrank()
        .args([
            "rank", "--input", "does-not-matter.csv", "--min-yield", "5", "--max-yield", "4",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("min_yield"));
}

#[test]
fn test_rank_missing_input_file_fails() {
    bondrank()
        .args(["rank", "--input", "/nonexistent/universe.csv"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to load input feeds"));
}

#[test]
fn test_config_show_defaults() {
    bondrank()
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("fee_rate_pct"))
        .stdout(predicate::str::contains("built-in defaults"));
}

#[test]
fn test_config_from_file_drives_calc() {
    let config = temp_file(".toml", "fee_rate_pct = \"1.0\"\n");
    let input = universe();
    bondrank()
        .arg("--config")
        .arg(config.path())
        .args(["-f", "csv", "-q", "calc", "--as-of", "2025-03-01", "--input"])
        .arg(input.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("7.7525"));
}

#[test]
fn test_config_validate() {
    let good = temp_file(".toml", "tax_rate_pct = \"15\"\n");
    bondrank()
        .args(["config", "validate"])
        .arg(good.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("is valid"));

    let bad = temp_file(".toml", "[screen]\nmin_maturity_weeks = 10\nmax_maturity_weeks = 5\n");
    bondrank()
        .args(["config", "validate"])
        .arg(bad.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("screen.min_maturity_weeks"));
}
