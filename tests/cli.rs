use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::prelude::*;

const EXPORT: &str = "\
Trans. Date,Posted Date,Description,Amount,Category
10/05/2023,10/06/2023,CLEMSON GROCERY,60.00,Supermarkets
11/12/2023,11/13/2023,KING SOOPERS,140.00,Supermarkets
01/03/2024,01/04/2024,KING SOOPERS,250.00,Supermarkets
01/09/2024,01/10/2024,TARGET,115.00,Merchandise
01/12/2024,01/13/2024,KING SOOPERS,240.00,Supermarkets
01/14/2024,01/15/2024,DENVER AIRPORT PARKING,140.00,Travel/Entertainment
01/20/2024,01/20/2024,INTERNET PAYMENT - THANK YOU,-1000.00,Payments and Credits
01/22/2024,01/23/2024,AMAZON,115.00,Merchandise
01/28/2024,01/29/2024,CINEMA,140.00,Travel/Entertainment
02/01/2024,02/02/2024,KING SOOPERS,90.00,Supermarkets
";

fn write_export(dir: &Path) -> PathBuf {
    let path = dir.join("Discover-Last12Months.csv");
    std::fs::write(&path, EXPORT).unwrap();
    path
}

/// Command with HOME pointed at a scratch dir so user settings never leak in.
fn spendscope(home: &Path) -> Command {
    let mut cmd = Command::cargo_bin("spendscope").unwrap();
    cmd.env("HOME", home).env_remove("RUST_LOG");
    cmd
}

#[test]
fn summary_prints_window_totals_and_shares() {
    let dir = tempfile::tempdir().unwrap();
    let csv = write_export(dir.path());
    spendscope(dir.path())
        .arg("summary")
        .arg(&csv)
        .assert()
        .success()
        .stdout(predicate::str::contains("$490.00"))
        .stdout(predicate::str::contains("49%"))
        .stdout(predicate::str::contains("23%"))
        .stdout(predicate::str::contains("28%"))
        .stdout(predicate::str::contains("Payments and Credits").not());
}

#[test]
fn counts_respects_exclusive_window() {
    let dir = tempfile::tempdir().unwrap();
    let csv = write_export(dir.path());
    spendscope(dir.path())
        .args(["counts", "--from", "01/12/2024", "--to", "01/22/2024"])
        .arg(&csv)
        .assert()
        .success()
        .stdout(predicate::str::contains("Travel/Entertainment"))
        .stdout(predicate::str::contains("TARGET").not())
        .stdout(predicate::str::contains("Merchandise").not());
}

#[test]
fn monthly_lists_focus_category_by_month() {
    let dir = tempfile::tempdir().unwrap();
    let csv = write_export(dir.path());
    spendscope(dir.path())
        .arg("monthly")
        .arg(&csv)
        .assert()
        .success()
        .stdout(predicate::str::contains("2023-10"))
        .stdout(predicate::str::contains("2024-01"))
        .stdout(predicate::str::contains("$490.00"));
}

#[test]
fn explore_text_is_repeatable() {
    let dir = tempfile::tempdir().unwrap();
    let csv = write_export(dir.path());
    let run = || {
        let out = spendscope(dir.path())
            .args(["explore", "--mode", "text"])
            .arg(&csv)
            .output()
            .unwrap();
        assert!(out.status.success());
        String::from_utf8(out.stdout).unwrap()
    };
    let first = run();
    assert!(first.contains("Fingerprint:"));
    assert!(first.contains("Total expenses for the window"));
    assert_eq!(first, run());
}

#[test]
fn explore_export_writes_svg_sequence() {
    let dir = tempfile::tempdir().unwrap();
    let csv = write_export(dir.path());
    let out = dir.path().join("charts");
    spendscope(dir.path())
        .arg("explore")
        .arg(&csv)
        .arg("--out")
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::contains("07-monthly-supermarkets.svg"));
    let count = std::fs::read_dir(&out).unwrap().count();
    assert_eq!(count, 7);
    assert!(out.join("05-pie-window.svg").exists());
}

#[test]
fn chart_writes_single_svg() {
    let dir = tempfile::tempdir().unwrap();
    let csv = write_export(dir.path());
    let svg = dir.path().join("nested").join("pie.svg");
    spendscope(dir.path())
        .args(["chart", "pie"])
        .arg(&csv)
        .arg("--output")
        .arg(&svg)
        .assert()
        .success();
    let content = std::fs::read_to_string(&svg).unwrap();
    assert!(content.contains("49%"));
}

#[test]
fn missing_file_fails_cleanly() {
    let dir = tempfile::tempdir().unwrap();
    spendscope(dir.path())
        .args(["summary", "does-not-exist.csv"])
        .assert()
        .failure()
        .stderr(predicate::str::starts_with("Error: IO error"));
}

#[test]
fn missing_column_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let csv = dir.path().join("bad.csv");
    std::fs::write(&csv, "Trans. Date,Description,Amount\n01/03/2024,X,1.00\n").unwrap();
    spendscope(dir.path())
        .arg("summary")
        .arg(&csv)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Missing column: Category"));
}

#[test]
fn config_set_changes_default_focus() {
    let dir = tempfile::tempdir().unwrap();
    let csv = write_export(dir.path());
    spendscope(dir.path())
        .args(["config", "set", "focus_category", "Merchandise"])
        .assert()
        .success();
    spendscope(dir.path())
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Merchandise"));
    spendscope(dir.path())
        .arg("monthly")
        .arg(&csv)
        .assert()
        .success()
        .stdout(predicate::str::contains("Monthly Merchandise spending"))
        .stdout(predicate::str::contains("$230.00"));
}

#[test]
fn config_set_rejects_unknown_key() {
    let dir = tempfile::tempdir().unwrap();
    spendscope(dir.path())
        .args(["config", "set", "colour", "blue"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown key"));
}

#[test]
fn inverted_window_is_rejected_everywhere() {
    let dir = tempfile::tempdir().unwrap();
    let csv = write_export(dir.path());
    for cmd in [&["summary"][..], &["counts"][..], &["chart", "bars", "--output", "bars.svg"][..]] {
        spendscope(dir.path())
            .current_dir(dir.path())
            .args(cmd)
            .args(["--from", "02/01/2024", "--to", "01/01/2024"])
            .arg(&csv)
            .assert()
            .failure()
            .stderr(predicate::str::contains("must be before"));
    }
    assert!(!dir.path().join("bars.svg").exists());
}

#[test]
fn summary_table_lists_categories_by_name() {
    let dir = tempfile::tempdir().unwrap();
    let csv = write_export(dir.path());
    let out = spendscope(dir.path()).arg("summary").arg(&csv).output().unwrap();
    assert!(out.status.success());
    let stdout = String::from_utf8(out.stdout).unwrap();
    let table = stdout.split("Total expenses").next().unwrap();
    let merch = table.find("Merchandise").unwrap();
    let market = table.find("Supermarkets").unwrap();
    assert!(merch < market, "{table}");
}
