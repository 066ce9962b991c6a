//! End-to-end runs of the `tipsplit` binary against fixture templates.

use std::path::PathBuf;
use assert_cmd::Command;

use assert_cmd::prelude::*;
use predicates::prelude::*;

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

/// The binary with a pinned config file and no `TIPSPLIT_*` / `RUST_LOG` leakage.
fn tipsplit(config: &str) -> Command {
    let mut cmd = Command::cargo_bin("tipsplit").expect("binary built");
    cmd.arg("--config")
        .arg(fixture(config))
        .env_remove("TIPSPLIT_LOG_LEVEL")
        .env_remove("TIPSPLIT_OUTPUT")
        .env_remove("TIPSPLIT_PRETTY")
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn split_prints_compact_json() {
    tipsplit("compact.toml")
        .args(["split", "--template"])
        .arg(fixture("shift.json"))
        .args(["--pool", "10.00"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"calculatedAmount\":334"))
        .stdout(predicate::str::contains("\"warnings\":[]"));
}

#[test]
fn split_reads_template_from_stdin() {
    let json = std::fs::read_to_string(fixture("hybrid.json")).expect("fixture");

    tipsplit("compact.toml")
        .args(["split", "--template", "-", "--pool", "100"])
        .write_stdin(json)
        .assert()
        .success()
        .stdout(predicate::str::contains("\"calculatedAmount\":3000"))
        .stdout(predicate::str::contains("\"calculatedAmount\":2000"))
        .stdout(predicate::str::contains("40.00"));
}

#[test]
fn table_format_from_config_file() {
    tipsplit("table.toml")
        .args(["split", "--template"])
        .arg(fixture("shift.json"))
        .args(["--pool", "10.00"])
        .assert()
        .success()
        .stdout(predicate::str::contains("$3.34"))
        .stdout(predicate::str::contains("Total"))
        .stdout(predicate::str::contains("$10.00"));
}

#[test]
fn format_flag_overrides_config_file() {
    tipsplit("table.toml")
        .args(["split", "--format", "json", "--compact", "--template"])
        .arg(fixture("shift.json"))
        .args(["--pool", "10.00"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("{"));
}

#[test]
fn env_override_beats_config_file() {
    tipsplit("compact.toml")
        .env("TIPSPLIT_OUTPUT", "table")
        .args(["split", "--template"])
        .arg(fixture("shift.json"))
        .args(["--pool", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Name"));
}

#[test]
fn negative_pool_is_a_warning_for_split() {
    tipsplit("compact.toml")
        .args(["split", "--template"])
        .arg(fixture("shift.json"))
        .args(["--pool", "-5.00"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Pool cannot be negative."))
        .stdout(predicate::str::contains("calculatedAmount").not());
}

#[test]
fn validate_reports_failure_with_exit_code() {
    tipsplit("compact.toml")
        .args(["validate", "--template"])
        .arg(fixture("shift.json"))
        .args(["--pool", "-5"])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("invalid: Pool cannot be negative."));
}

#[test]
fn validate_accepts_good_input() {
    tipsplit("compact.toml")
        .args(["validate", "--template"])
        .arg(fixture("hybrid.json"))
        .args(["--pool", "100.00"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("ok: 4 participants"));
}

#[test]
fn garbage_pool_is_rejected() {
    tipsplit("compact.toml")
        .args(["split", "--template"])
        .arg(fixture("shift.json"))
        .args(["--pool", "ten dollars"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid pool amount"));
}

#[test]
fn pool_beyond_cent_range_is_rejected() {
    tipsplit("compact.toml")
        .args(["split", "--template"])
        .arg(fixture("shift.json"))
        .args(["--pool", "92233720368547758.07"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("amount is too large"));
}

#[test]
fn validate_accepts_largest_pool() {
    tipsplit("compact.toml")
        .args(["validate", "--template"])
        .arg(fixture("shift.json"))
        .args(["--pool", "90071992547409.92"])
        .assert()
        .success();
}

#[test]
fn missing_template_file_fails() {
    tipsplit("compact.toml")
        .args(["split", "--template", "no-such-template.json", "--pool", "1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read template"));
}

#[test]
fn show_config_prints_effective_values() {
    tipsplit("table.toml")
        .arg("show-config")
        .assert()
        .success()
        .stdout(predicate::str::contains("table.toml"))
        .stdout(predicate::str::contains("format = \"table\""))
        .stdout(predicate::str::contains("level = \"error\""));
}

#[test]
fn missing_config_file_fails() {
    tipsplit("does-not-exist.toml")
        .arg("show-config")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Config file not found"));
}
