//! Integration tests for the calpoint binary.
//!
//! These tests verify end-to-end behavior including:
//! - Profile onboarding and settings
//! - Logging, editing and deleting days
//! - Stats, history and chart output
//! - CSV export and WAL compaction

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn setup_test_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp dir")
}

/// CLI pinned to a data dir, an isolated config home and a fixed "today"
fn cli(data_dir: &Path) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("calpoint"));
    cmd.env("XDG_CONFIG_HOME", data_dir.join("config"))
        .arg("--data-dir")
        .arg(data_dir)
        .arg("--today")
        .arg("2024-01-10");
    cmd
}

fn init_profile(data_dir: &Path) {
    cli(data_dir)
        .args([
            "init",
            "--height",
            "180",
            "--age",
            "30",
            "--sex",
            "male",
            "--starting-weight",
            "80",
            "--goal-weight",
            "70",
            "--target-calories",
            "1700",
            "--start-date",
            "2024-01-01",
            "--tdee",
            "2200",
        ])
        .assert()
        .success();
}

fn log_day(data_dir: &Path, date: &str, calories: &str, workout: &str) {
    cli(data_dir)
        .args(["log", "--date", date, "--calories", calories, "--workout", workout])
        .assert()
        .success();
}

fn json_output(cmd: &mut Command) -> Value {
    let output = cmd.assert().success().get_output().stdout.clone();
    serde_json::from_slice(&output).expect("stdout should be JSON")
}

#[test]
fn test_cli_help() {
    Command::new(assert_cmd::cargo::cargo_bin!("calpoint"))
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Calorie points tracker"));
}

#[test]
fn test_stats_without_profile_fails() {
    let temp_dir = setup_test_dir();

    cli(temp_dir.path())
        .arg("stats")
        .assert()
        .failure()
        .stderr(predicate::str::contains("ProfileMissing"));
}

#[test]
fn test_init_writes_profile_and_shows_presets() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();

    cli(data_dir)
        .args([
            "init",
            "--height",
            "180",
            "--age",
            "30",
            "--sex",
            "male",
            "--starting-weight",
            "80",
            "--goal-weight",
            "70",
            "--target-calories",
            "1700",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Points needed: 77.0"))
        .stdout(predicate::str::contains("Aggressive"));

    let profile: Value =
        serde_json::from_str(&fs::read_to_string(data_dir.join("profile.json")).unwrap()).unwrap();
    // 10*80 + 6.25*180 - 5*30 + 5 = 1780, * 1.2 = 2136
    assert_eq!(profile["tdee"], 2136);
    assert_eq!(profile["current_weight"], 80.0);
    assert_eq!(profile["start_date"], "2024-01-10");
}

#[test]
fn test_init_refuses_to_overwrite() {
    let temp_dir = setup_test_dir();
    init_profile(temp_dir.path());

    cli(temp_dir.path())
        .args([
            "init",
            "--height",
            "170",
            "--age",
            "40",
            "--sex",
            "f",
            "--starting-weight",
            "70",
            "--goal-weight",
            "65",
            "--target-calories",
            "1500",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--force"));
}

#[test]
fn test_init_rejects_out_of_range_height() {
    let temp_dir = setup_test_dir();

    cli(temp_dir.path())
        .args([
            "init",
            "--height",
            "90",
            "--age",
            "30",
            "--sex",
            "male",
            "--starting-weight",
            "80",
            "--goal-weight",
            "70",
            "--target-calories",
            "1700",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("height"));

    assert!(!temp_dir.path().join("profile.json").exists());
}

#[test]
fn test_log_appends_to_wal() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();
    init_profile(data_dir);

    cli(data_dir)
        .args(["log", "--date", "2024-01-01", "--calories", "1700", "--workout", "300"])
        .assert()
        .success()
        .stdout(predicate::str::contains("0.800 points"));

    let wal = fs::read_to_string(data_dir.join("wal/daily_logs.wal")).unwrap();
    assert_eq!(wal.lines().count(), 1);
    assert!(wal.contains("\"event\":\"created\""));
}

#[test]
fn test_duplicate_date_rejected() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();
    init_profile(data_dir);
    log_day(data_dir, "2024-01-01", "1700", "0");

    cli(data_dir)
        .args(["log", "--date", "2024-01-01", "--calories", "2000"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("DuplicateDate"));
}

#[test]
fn test_log_defaults_to_today() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();
    init_profile(data_dir);

    cli(data_dir)
        .args(["log", "--calories", "2000"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Logged 2024-01-10"));
}

#[test]
fn test_weight_log_updates_current_weight() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();
    init_profile(data_dir);

    cli(data_dir)
        .args(["log", "--date", "2024-01-05", "--calories", "1700", "--weight", "78.5"])
        .assert()
        .success();
    // Older weigh-in does not override the newer one
    cli(data_dir)
        .args(["log", "--date", "2024-01-02", "--calories", "1700", "--weight", "79.5"])
        .assert()
        .success();

    let profile = json_output(cli(data_dir).args(["profile", "--json"]));
    assert_eq!(profile["current_weight"], 78.5);

    cli(data_dir)
        .args(["delete", "--date", "2024-01-05"])
        .assert()
        .success();

    let profile = json_output(cli(data_dir).args(["profile", "--json"]));
    assert_eq!(profile["current_weight"], 78.5);
}

#[test]
fn test_edit_keeps_unspecified_fields() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();
    init_profile(data_dir);

    cli(data_dir)
        .args([
            "log",
            "--date",
            "2024-01-01",
            "--calories",
            "1700",
            "--workout",
            "300",
            "--notes",
            "pizza night avoided",
        ])
        .assert()
        .success();

    cli(data_dir)
        .args(["edit", "--date", "2024-01-01", "--calories", "2200"])
        .assert()
        .success()
        .stdout(predicate::str::contains("0.300 points"));

    let history = json_output(cli(data_dir).args(["history", "--json"]));
    assert_eq!(history[0]["calories_consumed"], 2200);
    assert_eq!(history[0]["workout_calories"], 300);
    assert_eq!(history[0]["notes"], "pizza night avoided");
}

#[test]
fn test_edit_and_delete_missing_date() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();
    init_profile(data_dir);

    cli(data_dir)
        .args(["edit", "--date", "2024-01-03", "--calories", "1500"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("LogNotFound(2024-01-03)"));

    cli(data_dir)
        .args(["delete", "--date", "2024-01-03"])
        .assert()
        .failure();
}

#[test]
fn test_negative_calories_rejected() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();
    init_profile(data_dir);

    cli(data_dir)
        .args(["log", "--date", "2024-01-01", "--calories=-100"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot be negative"));

    assert!(!data_dir.join("wal/daily_logs.wal").exists());
}

#[test]
fn test_history_running_totals_newest_first() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();
    init_profile(data_dir);
    log_day(data_dir, "2024-01-02", "2400", "0");
    log_day(data_dir, "2024-01-01", "1700", "0");
    log_day(data_dir, "2024-01-03", "1900", "0");

    let history = json_output(cli(data_dir).args(["history", "--json"]));
    let rows = history.as_array().unwrap();
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[0]["date"], "2024-01-03");
    assert_eq!(rows[0]["running_total"], 0.6);
    assert_eq!(rows[1]["running_total"], 0.3);
    assert_eq!(rows[2]["running_total"], 0.5);

    let filtered = json_output(cli(data_dir).args([
        "history",
        "--from",
        "2024-01-02",
        "--to",
        "2024-01-02",
        "--json",
    ]));
    assert_eq!(filtered.as_array().unwrap().len(), 1);
}

#[test]
fn test_stats_report_json() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();
    init_profile(data_dir);
    log_day(data_dir, "2024-01-01", "1700", "300");
    log_day(data_dir, "2024-01-02", "1700", "300");

    let stats = json_output(cli(data_dir).args(["stats", "--json"]));
    assert_eq!(stats["mode"], "loss");
    assert_eq!(stats["summary"]["days_logged"], 2);
    assert_eq!(stats["summary"]["days_elapsed"], 9);
    assert_eq!(stats["points"]["total_needed"], 77.0);
    assert_eq!(stats["points"]["collected"], 1.6);
    assert_eq!(stats["pace"]["target_points_per_day"], 0.5);
    assert_eq!(stats["pace"]["actual_avg_points_per_day"], 0.8);
    assert_eq!(stats["pace"]["on_track"], true);
    assert_eq!(stats["pace"]["status"], "on_track");
    // ceil(75.4 / 0.8) = 95 days after 2024-01-10
    assert_eq!(stats["pace"]["days_to_goal"], 95);
    assert_eq!(stats["pace"]["projected_completion_date"], "2024-04-14");
    assert_eq!(stats["calories"]["deficit_created"], 1600.0);
}

#[test]
fn test_stats_is_default_command() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();
    init_profile(data_dir);

    cli(data_dir)
        .assert()
        .success()
        .stdout(predicate::str::contains("Log a day to see your pace"));
}

#[test]
fn test_settings_recalculates_tdee() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();
    init_profile(data_dir);

    cli(data_dir)
        .args(["settings", "--current-weight", "75", "--recalc-tdee"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Settings saved"));

    let profile = json_output(cli(data_dir).args(["profile", "--json"]));
    // 10*75 + 1125 - 150 + 5 = 1730, * 1.2 = 2076
    assert_eq!(profile["tdee"], 2076);
    assert_eq!(profile["current_weight"], 75.0);
}

#[test]
fn test_settings_rejects_invalid_edit() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();
    init_profile(data_dir);

    cli(data_dir)
        .args(["settings", "--age", "12"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("age"));

    let profile = json_output(cli(data_dir).args(["profile", "--json"]));
    assert_eq!(profile["age"], 30);
}

#[test]
fn test_presets_use_profile_tdee() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();
    init_profile(data_dir);

    cli(data_dir)
        .arg("presets")
        .assert()
        .success()
        .stdout(predicate::str::contains("1450 kcal"))
        .stdout(predicate::str::contains("1700 kcal"))
        .stdout(predicate::str::contains("1900 kcal"));
}

#[test]
fn test_charts_json() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();
    init_profile(data_dir);
    log_day(data_dir, "2024-01-01", "1700", "0");
    log_day(data_dir, "2024-01-02", "2400", "0");

    let charts = json_output(cli(data_dir).arg("charts"));
    assert_eq!(charts["progress_data"].as_array().unwrap().len(), 2);
    assert_eq!(charts["progress_data"][1]["actual"], 0.3);
    assert_eq!(charts["progress_data"][1]["target"], 1.0);
    assert_eq!(charts["heatmap_data"][0]["level"], 3);
    assert_eq!(charts["points_breakdown"]["diet"], 0.3);
}

#[test]
fn test_export_csv() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();
    init_profile(data_dir);
    log_day(data_dir, "2024-01-02", "2000", "0");
    log_day(data_dir, "2024-01-01", "1700", "0");

    let csv_path = data_dir.join("export.csv");
    cli(data_dir)
        .arg("export")
        .arg(&csv_path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Exported 2 logs"));

    let csv = fs::read_to_string(&csv_path).unwrap();
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines.len(), 3);
    assert!(lines[0].starts_with("date,"));
    assert!(lines[1].starts_with("2024-01-01"));
}

#[test]
fn test_compact_collapses_history() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();
    init_profile(data_dir);
    log_day(data_dir, "2024-01-01", "1700", "0");
    log_day(data_dir, "2024-01-02", "1800", "0");
    cli(data_dir)
        .args(["edit", "--date", "2024-01-01", "--calories", "1600"])
        .assert()
        .success();
    cli(data_dir)
        .args(["delete", "--date", "2024-01-02"])
        .assert()
        .success();

    cli(data_dir)
        .args(["compact", "--cleanup"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Compacted WAL to 1 logs"));

    let wal = fs::read_to_string(data_dir.join("wal/daily_logs.wal")).unwrap();
    assert_eq!(wal.lines().count(), 1);
    assert!(!data_dir.join("wal/daily_logs.wal.processed").exists());

    let history = json_output(cli(data_dir).args(["history", "--json"]));
    assert_eq!(history[0]["calories_consumed"], 1600);
}

#[test]
fn test_compact_without_wal() {
    let temp_dir = setup_test_dir();

    cli(temp_dir.path())
        .arg("compact")
        .assert()
        .success()
        .stdout(predicate::str::contains("nothing to compact"));
}

#[test]
fn test_config_file_presets() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();
    init_profile(data_dir);

    let config_path = data_dir.join("custom.toml");
    fs::write(
        &config_path,
        "[presets]\naggressive_deficit = 1000\nmoderate_deficit = 600\nslow_deficit = 250\n",
    )
    .unwrap();

    cli(data_dir)
        .arg("--config")
        .arg(&config_path)
        .arg("presets")
        .assert()
        .success()
        .stdout(predicate::str::contains("1200 kcal"))
        .stdout(predicate::str::contains("1950 kcal"));
}
