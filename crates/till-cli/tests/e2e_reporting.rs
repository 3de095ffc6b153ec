//! E2E CLI reporting tests: status, total, history, show, output formats.
//!
//! Each test runs the `till` binary as a subprocess in an isolated temp
//! directory. Under a pipe the CLI defaults to text mode, so bare
//! invocations here assert the script-friendly shapes.

use assert_cmd::Command;
use serde_json::Value;
use std::path::Path;
use tempfile::TempDir;

// ---------------------------------------------------------------------------
// Test Harness
// ---------------------------------------------------------------------------

/// Build a Command targeting the till binary, rooted in `dir`.
fn till_cmd(dir: &Path) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("till"));
    cmd.current_dir(dir);
    // Suppress tracing output
    cmd.env("TILL_LOG", "error");
    cmd
}

/// Initialize a register in `dir`.
fn init_register(dir: &Path) {
    till_cmd(dir).args(["init"]).assert().success();
}

/// Ring up one item and assert it succeeded.
fn add_item(dir: &Path, name: &str, price: &str, quantity: &str) {
    till_cmd(dir)
        .args(["add", name, price, quantity, "--quiet"])
        .assert()
        .success();
}

/// Close the open sale, returning the receipt number.
fn checkout(dir: &Path) -> String {
    let output = till_cmd(dir)
        .args(["checkout", "--json"])
        .output()
        .expect("checkout should not crash");
    assert!(
        output.status.success(),
        "checkout failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let json: Value = serde_json::from_slice(&output.stdout).expect("valid JSON");
    json["number"]
        .as_str()
        .expect("receipt should have a number")
        .to_string()
}

/// Run a subcommand with `--json` and parse stdout.
fn run_json(dir: &Path, args: &[&str]) -> Value {
    let mut full_args = args.to_vec();
    full_args.push("--json");
    let output = till_cmd(dir)
        .args(&full_args)
        .output()
        .expect("command should not crash");
    assert!(
        output.status.success(),
        "{args:?} failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).expect("--json should produce valid JSON")
}

// ===========================================================================
// Test 1: Status
// ===========================================================================

#[test]
fn status_idle_text() {
    let dir = TempDir::new().unwrap();
    init_register(dir.path());

    till_cmd(dir.path())
        .args(["status"])
        .assert()
        .success()
        .stdout(predicates::str::starts_with("idle"))
        .stdout(predicates::str::contains("closed sales 0"));
}

#[test]
fn status_text_lists_the_open_rows() {
    let dir = TempDir::new().unwrap();
    init_register(dir.path());
    add_item(dir.path(), "Milk", "3.50", "2");
    add_item(dir.path(), "Bread", "2.00", "1");

    till_cmd(dir.path())
        .args(["status"])
        .assert()
        .success()
        .stdout(predicates::str::starts_with("open "))
        .stdout(predicates::str::contains("Milk - $3.50 x 2"))
        .stdout(predicates::str::contains("Bread - $2.00 x 1"))
        .stdout(predicates::str::contains("total $9.00"));
}

#[test]
fn status_pretty_frames_the_sale() {
    let dir = TempDir::new().unwrap();
    init_register(dir.path());
    add_item(dir.path(), "Milk", "3.50", "2");

    till_cmd(dir.path())
        .args(["status", "--format", "pretty"])
        .assert()
        .success()
        .stdout(predicates::str::contains("(open)"))
        .stdout(predicates::str::contains("Total:"))
        .stdout(predicates::str::contains("$7.00"));
}

#[test]
fn status_pretty_idle_suggests_add() {
    let dir = TempDir::new().unwrap();
    init_register(dir.path());

    till_cmd(dir.path())
        .args(["status", "--format", "pretty"])
        .assert()
        .success()
        .stdout(predicates::str::contains("Register idle"))
        .stdout(predicates::str::contains("till add"));
}

// ===========================================================================
// Test 2: Total
// ===========================================================================

#[test]
fn total_text_is_the_bare_amount() {
    let dir = TempDir::new().unwrap();
    init_register(dir.path());
    add_item(dir.path(), "Milk", "3.50", "2");

    till_cmd(dir.path())
        .args(["total"])
        .assert()
        .success()
        .stdout("7.00\n");
}

#[test]
fn total_idle_is_zero() {
    let dir = TempDir::new().unwrap();
    init_register(dir.path());

    till_cmd(dir.path())
        .args(["total"])
        .assert()
        .success()
        .stdout("0.00\n");

    let report = run_json(dir.path(), &["total"]);
    assert_eq!(report["total"], "0");
    assert!(report.get("sale").is_none(), "idle total has no sale key");
}

#[test]
fn total_json_carries_the_sale_context() {
    let dir = TempDir::new().unwrap();
    init_register(dir.path());
    add_item(dir.path(), "Apple", "1.99", "3");
    add_item(dir.path(), "Milk", "3.50", "1");

    let report = run_json(dir.path(), &["total"]);
    assert_eq!(report["total"], "9.47");
    assert_eq!(report["items"], 2);
    assert!(report["sale"].is_string());
}

#[test]
fn total_pretty_names_the_sale() {
    let dir = TempDir::new().unwrap();
    init_register(dir.path());
    add_item(dir.path(), "Milk", "3.50", "2");

    till_cmd(dir.path())
        .args(["total", "--format", "pretty"])
        .assert()
        .success()
        .stdout(predicates::str::contains("Running total: $7.00"))
        .stdout(predicates::str::contains("on sale"));
}

// ===========================================================================
// Test 3: History
// ===========================================================================

#[test]
fn history_empty_text_prints_nothing() {
    let dir = TempDir::new().unwrap();
    init_register(dir.path());

    till_cmd(dir.path())
        .args(["history"])
        .assert()
        .success()
        .stdout("");
}

#[test]
fn history_empty_pretty_notes_it() {
    let dir = TempDir::new().unwrap();
    init_register(dir.path());

    till_cmd(dir.path())
        .args(["history", "--format", "pretty"])
        .assert()
        .success()
        .stdout(predicates::str::contains("No closed sales yet."));
}

#[test]
fn history_text_lists_rows_under_headers() {
    let dir = TempDir::new().unwrap();
    init_register(dir.path());
    add_item(dir.path(), "Milk", "3.50", "2");
    checkout(dir.path());
    add_item(dir.path(), "Apple", "1.99", "3");
    checkout(dir.path());

    let output = till_cmd(dir.path())
        .args(["history"])
        .output()
        .expect("history should not crash");
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines.len(), 3, "headers plus one row per closed sale");
    assert_eq!(lines[0], "NUMBER  CLOSED_AT  ITEMS  TOTAL");
    assert!(lines[1].contains('\t'), "rows are tab-separated");
    assert!(lines[1].ends_with("7.00"));
    assert!(lines[2].ends_with("5.97"));
}

#[test]
fn history_json_is_an_array_of_receipts() {
    let dir = TempDir::new().unwrap();
    init_register(dir.path());
    add_item(dir.path(), "Milk", "3.50", "2");
    let first = checkout(dir.path());
    add_item(dir.path(), "Apple", "1.99", "3");
    let second = checkout(dir.path());

    let history = run_json(dir.path(), &["history"]);
    let rows = history.as_array().expect("history is a JSON array");
    assert_eq!(rows.len(), 2);

    // Oldest first.
    assert_eq!(rows[0]["number"], first.as_str());
    assert_eq!(rows[1]["number"], second.as_str());
    for row in rows {
        assert_eq!(row["state"], "closed");
        assert!(row["closed_at"].is_string());
        assert!(row["total"].is_string());
    }
}

#[test]
fn history_skips_the_open_sale() {
    let dir = TempDir::new().unwrap();
    init_register(dir.path());
    add_item(dir.path(), "Milk", "3.50", "2");
    checkout(dir.path());
    add_item(dir.path(), "Bread", "2.00", "1");

    let history = run_json(dir.path(), &["history"]);
    let rows = history.as_array().expect("history is a JSON array");
    assert_eq!(rows.len(), 1, "only closed sales are listed");
}

#[test]
fn history_pretty_shows_one_line_per_sale() {
    let dir = TempDir::new().unwrap();
    init_register(dir.path());
    add_item(dir.path(), "Milk", "3.50", "2");
    let number = checkout(dir.path());

    till_cmd(dir.path())
        .args(["history", "--format", "pretty"])
        .assert()
        .success()
        .stdout(predicates::str::contains(number.as_str()))
        .stdout(predicates::str::contains("1 items"))
        .stdout(predicates::str::contains("$7.00"));
}

// ===========================================================================
// Test 4: Show
// ===========================================================================

#[test]
fn show_finds_a_closed_sale() {
    let dir = TempDir::new().unwrap();
    init_register(dir.path());
    add_item(dir.path(), "Apple", "1.99", "3");
    let number = checkout(dir.path());

    let receipt = run_json(dir.path(), &["show", &number]);
    assert_eq!(receipt["number"], number.as_str());
    assert_eq!(receipt["state"], "closed");
    assert_eq!(receipt["total"], "5.97");
}

#[test]
fn show_finds_the_open_sale_too() {
    let dir = TempDir::new().unwrap();
    init_register(dir.path());
    let report = till_cmd(dir.path())
        .args(["add", "Milk", "3.50", "2", "--json"])
        .output()
        .expect("add should not crash");
    assert!(report.status.success());
    let json: Value = serde_json::from_slice(&report.stdout).expect("valid JSON");
    let number = json["sale"].as_str().expect("sale number").to_string();

    let receipt = run_json(dir.path(), &["show", &number]);
    assert_eq!(receipt["state"], "open");
    assert!(receipt.get("closed_at").is_none());
}

#[test]
fn show_lookup_ignores_case() {
    let dir = TempDir::new().unwrap();
    init_register(dir.path());
    add_item(dir.path(), "Apple", "1.99", "3");
    let number = checkout(dir.path());

    let receipt = run_json(dir.path(), &["show", &number.to_lowercase()]);
    assert_eq!(receipt["number"], number.as_str());
}

#[test]
fn show_text_row_summarizes_the_sale() {
    let dir = TempDir::new().unwrap();
    init_register(dir.path());
    add_item(dir.path(), "Apple", "1.99", "3");
    let number = checkout(dir.path());

    till_cmd(dir.path())
        .args(["show", &number])
        .assert()
        .success()
        .stdout(predicates::str::starts_with("sale "))
        .stdout(predicates::str::contains("closed"))
        .stdout(predicates::str::contains("total $5.97"));
}

#[test]
fn show_pretty_prints_the_receipt_card() {
    let dir = TempDir::new().unwrap();
    init_register(dir.path());
    add_item(dir.path(), "Apple", "1.99", "3");
    let number = checkout(dir.path());

    till_cmd(dir.path())
        .args(["show", &number, "--format", "pretty"])
        .assert()
        .success()
        .stdout(predicates::str::contains("State:"))
        .stdout(predicates::str::contains("Opened:"))
        .stdout(predicates::str::contains("Closed:"))
        .stdout(predicates::str::contains("Total:"));
}

#[test]
fn show_unknown_number_fails() {
    let dir = TempDir::new().unwrap();
    init_register(dir.path());

    till_cmd(dir.path())
        .args(["show", "NOPE0000"])
        .assert()
        .failure()
        .stderr(predicates::str::contains("no sale numbered"));
}

// ===========================================================================
// Test 5: Output Format Resolution
// ===========================================================================

#[test]
fn format_env_var_switches_to_json() {
    let dir = TempDir::new().unwrap();
    init_register(dir.path());
    add_item(dir.path(), "Milk", "3.50", "2");

    let output = till_cmd(dir.path())
        .args(["total"])
        .env("TILL_FORMAT", "json")
        .output()
        .expect("total should not crash");
    assert!(output.status.success());

    let json: Value = serde_json::from_slice(&output.stdout).expect("env var selects JSON");
    assert_eq!(json["total"], "7.00");
}

#[test]
fn format_flag_overrides_the_env_var() {
    let dir = TempDir::new().unwrap();
    init_register(dir.path());
    add_item(dir.path(), "Milk", "3.50", "2");

    till_cmd(dir.path())
        .args(["total", "--format", "text"])
        .env("TILL_FORMAT", "json")
        .assert()
        .success()
        .stdout("7.00\n");
}

#[test]
fn json_flag_matches_format_json() {
    let dir = TempDir::new().unwrap();
    init_register(dir.path());
    add_item(dir.path(), "Milk", "3.50", "2");

    let via_alias = till_cmd(dir.path())
        .args(["status", "--json"])
        .output()
        .expect("status should not crash");
    let via_format = till_cmd(dir.path())
        .args(["status", "--format", "json"])
        .output()
        .expect("status should not crash");

    let alias: Value = serde_json::from_slice(&via_alias.stdout).expect("valid JSON");
    let format: Value = serde_json::from_slice(&via_format.stdout).expect("valid JSON");
    assert_eq!(alias, format);
}
