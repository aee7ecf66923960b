use assert_cmd::prelude::*;
use predicates::prelude::*;
use rstest::rstest;
use std::fs;
use std::io::Write;
use std::path::PathBuf;
use std::process::Command;
use tempfile::tempdir;

const NOW_MS: i64 = 1_700_000_600_000;

// Build a TOML config that spells out the stock constants
fn write_valid_config(dir: &tempfile::TempDir) -> PathBuf {
    let toml = r#"
[accuracy]
green_m = 12.0
yellow_m = 35.0
red_m = 80.0

[window]
base_ms = 45000
max_ms = 180000
min_samples = 5

[freshness]
fresh_s = 10.0
stale_s = 60.0

[availability]
expected_hz = 1.0

[weights]
accuracy = 0.85
freshness = 0.10
availability = 0.05

[fleet]
red_below = 40.0
yellow_below = 70.0
"#;
    let path = dir.path().join("cfg.toml");
    fs::write(&path, toml).unwrap();
    path
}

// Ten 1 Hz fixes per device ending at NOW_MS, all with the given accuracy.
// Devices listed in `silent` only have a fix from ten minutes earlier.
fn write_snapshot(dir: &tempfile::TempDir, accurate: &[(&str, f64)], silent: &[&str]) -> PathBuf {
    let path = dir.path().join("snapshot.csv");
    let mut f = fs::File::create(&path).unwrap();
    writeln!(f, "device_id,timestamp_ms,accuracy_m,speed_kmh").unwrap();
    for (id, acc) in accurate {
        for i in 0..10 {
            writeln!(f, "{id},{},{acc},20", NOW_MS - i * 1000).unwrap();
        }
    }
    for id in silent {
        writeln!(f, "{id},{},5.0,", NOW_MS - 600_000).unwrap();
    }
    path
}

#[rstest]
#[case(&["--help"], 0, "Usage:", "stdout")]
#[case(&["check-config"], 0, "config ok", "stdout")]
#[case(&["score"], 2, "required", "stderr")]
#[case(&["devices", "--samples"], 2, "value is required", "stderr")]
#[case(&["score", "--samples", "does-not-exist.csv"], 1, "could not be opened", "stderr")]
fn cli_table_cases(
    #[case] args: &[&str],
    #[case] exit_code: i32,
    #[case] needle: &str,
    #[case] stream: &str,
) {
    let dir = tempdir().unwrap();
    let cfg = write_valid_config(&dir);

    let mut cmd = Command::cargo_bin("fleet_cli").unwrap();
    cmd.arg("--config").arg(&cfg);
    for a in args {
        cmd.arg(a);
    }

    let assert = cmd.assert().code(exit_code);
    match stream {
        "stdout" => {
            assert.stdout(predicate::str::contains(needle));
        }
        "stderr" => {
            assert.stderr(predicate::str::contains(needle));
        }
        other => panic!("unknown stream: {other}"),
    }
}

#[rstest]
fn score_prints_verdict_for_healthy_fleet() {
    let dir = tempdir().unwrap();
    let cfg = write_valid_config(&dir);
    let csv = write_snapshot(&dir, &[("bus-1", 4.0), ("bus-2", 6.5)], &["bus-3"]);

    let mut cmd = Command::cargo_bin("fleet_cli").unwrap();
    cmd.arg("--config")
        .arg(&cfg)
        .arg("score")
        .arg("--samples")
        .arg(&csv)
        .arg("--now-ms")
        .arg(NOW_MS.to_string());

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("fleet: Good"))
        .stdout(predicate::str::contains("p50: 95.0"))
        .stdout(predicate::str::contains("2 scored, 1 without data"));
}

#[rstest]
fn config_is_optional() {
    let dir = tempdir().unwrap();
    let csv = write_snapshot(&dir, &[("bus-1", 4.0)], &[]);

    let mut cmd = Command::cargo_bin("fleet_cli").unwrap();
    cmd.arg("score")
        .arg("--samples")
        .arg(&csv)
        .arg("--now-ms")
        .arg(NOW_MS.to_string());
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("fleet: Good"));
}

#[rstest]
#[case::poor(&[("bus-1", 200.0), ("bus-2", 150.0)], &[], 3, "fleet: Poor")]
#[case::unknown(&[], &["bus-1", "bus-2"], 4, "fleet: Unknown")]
#[case::good(&[("bus-1", 3.0)], &[], 0, "fleet: Good")]
fn strict_mode_maps_labels_to_exit_codes(
    #[case] accurate: &[(&str, f64)],
    #[case] silent: &[&str],
    #[case] exit_code: i32,
    #[case] needle: &str,
) {
    let dir = tempdir().unwrap();
    let csv = write_snapshot(&dir, accurate, silent);

    let mut cmd = Command::cargo_bin("fleet_cli").unwrap();
    cmd.arg("score")
        .arg("--samples")
        .arg(&csv)
        .arg("--now-ms")
        .arg(NOW_MS.to_string())
        .arg("--strict");
    cmd.assert()
        .code(exit_code)
        .stdout(predicate::str::contains(needle));
}

#[rstest]
fn poor_fleet_without_strict_exits_zero() {
    let dir = tempdir().unwrap();
    let csv = write_snapshot(&dir, &[("bus-1", 200.0)], &[]);

    let mut cmd = Command::cargo_bin("fleet_cli").unwrap();
    cmd.arg("score")
        .arg("--samples")
        .arg(&csv)
        .arg("--now-ms")
        .arg(NOW_MS.to_string());
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("fleet: Poor"));
}

#[rstest]
fn devices_lists_each_device_in_id_order() {
    let dir = tempdir().unwrap();
    let csv = write_snapshot(&dir, &[("b", 4.0), ("a", 4.0)], &["c"]);

    let mut cmd = Command::cargo_bin("fleet_cli").unwrap();
    cmd.arg("devices")
        .arg("--samples")
        .arg(&csv)
        .arg("--now-ms")
        .arg(NOW_MS.to_string());
    let out = cmd.assert().success().get_output().stdout.clone();
    let stdout = String::from_utf8_lossy(&out);
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines.len(), 3, "stdout was: {stdout}");
    assert!(lines[0].starts_with("a: score=95.0"), "{}", lines[0]);
    assert!(lines[1].starts_with("b: score=95.0"), "{}", lines[1]);
    assert_eq!(lines[2], "c: no data");
}

#[rstest]
fn cli_reports_bad_samples_header() {
    let dir = tempdir().unwrap();

    let bad_csv = dir.path().join("snapshot.csv");
    let mut f = fs::File::create(&bad_csv).unwrap();
    writeln!(f, "id,ts,acc,speed").unwrap();
    writeln!(f, "bus-1,1700000000000,5.0,10").unwrap();

    let mut cmd = Command::cargo_bin("fleet_cli").unwrap();
    cmd.arg("score")
        .arg("--samples")
        .arg(&bad_csv)
        .arg("--now-ms")
        .arg(NOW_MS.to_string());
    cmd.assert()
        .code(1)
        .stderr(predicate::str::contains("Invalid headers in samples CSV"));
}

#[rstest]
fn cli_reports_bad_row_with_line_number() {
    let dir = tempdir().unwrap();

    let bad_csv = dir.path().join("snapshot.csv");
    let mut f = fs::File::create(&bad_csv).unwrap();
    writeln!(f, "device_id,timestamp_ms,accuracy_m,speed_kmh").unwrap();
    writeln!(f, "bus-1,1700000000000,5.0,10").unwrap();
    writeln!(f, "bus-1,yesterday,5.0,10").unwrap();

    let mut cmd = Command::cargo_bin("fleet_cli").unwrap();
    cmd.arg("score").arg("--samples").arg(&bad_csv);
    cmd.assert()
        .code(1)
        .stderr(predicate::str::contains("invalid CSV row 3"));
}

#[rstest]
#[case::inverted_thresholds("[accuracy]\ngreen_m = 40.0\nyellow_m = 35.0\n", "green_m < yellow_m < red_m")]
#[case::zero_rate("[availability]\nexpected_hz = 0.0\n", "expected_hz must be > 0")]
#[case::bad_rotation("[logging]\nrotation = \"weekly\"\n", "logging.rotation")]
#[case::nan_boost("[accuracy]\nmoderate_boost_m = nan\n", "boosts must be finite")]
fn check_config_rejects_invalid_values(#[case] toml: &str, #[case] needle: &str) {
    let dir = tempdir().unwrap();
    let path = dir.path().join("cfg.toml");
    fs::write(&path, toml).unwrap();

    let mut cmd = Command::cargo_bin("fleet_cli").unwrap();
    cmd.arg("--config").arg(&path).arg("check-config");
    cmd.assert()
        .code(1)
        .stderr(predicate::str::contains("config file was rejected"))
        .stderr(predicate::str::contains(needle));
}

#[rstest]
fn unparseable_config_is_reported() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("cfg.toml");
    fs::write(&path, "[window]\nbase_ms = \"soon\"\n").unwrap();

    let mut cmd = Command::cargo_bin("fleet_cli").unwrap();
    cmd.arg("--config").arg(&path).arg("check-config");
    cmd.assert()
        .code(1)
        .stderr(predicate::str::contains("not valid TOML"));
}

#[rstest]
fn non_finite_rate_override_is_rejected() {
    let dir = tempdir().unwrap();
    let csv = write_snapshot(&dir, &[("bus-1", 4.0)], &[]);

    let mut cmd = Command::cargo_bin("fleet_cli").unwrap();
    cmd.arg("score")
        .arg("--samples")
        .arg(&csv)
        .arg("--now-ms")
        .arg(NOW_MS.to_string())
        .arg("--expected-hz")
        .arg("inf");
    cmd.assert()
        .code(1)
        .stderr(predicate::str::contains("expected_hz must be finite"));
}

#[rstest]
fn log_file_is_written_when_configured() {
    let dir = tempdir().unwrap();
    let log = dir.path().join("fleet.log");
    let cfg = dir.path().join("cfg.toml");
    fs::write(
        &cfg,
        format!(
            "[logging]\nfile = {:?}\nlevel = \"info\"\n",
            log.to_string_lossy()
        ),
    )
    .unwrap();
    let csv = write_snapshot(&dir, &[("bus-1", 4.0)], &[]);

    let mut cmd = Command::cargo_bin("fleet_cli").unwrap();
    cmd.arg("--config")
        .arg(&cfg)
        .arg("score")
        .arg("--samples")
        .arg(&csv)
        .arg("--now-ms")
        .arg(NOW_MS.to_string());
    cmd.assert().success();

    // The writer is flushed before the process exits
    let text = fs::read_to_string(&log).unwrap_or_default();
    assert!(text.contains("fleet verdict"), "log was: {text}");
}
