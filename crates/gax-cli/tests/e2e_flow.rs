//! End-to-end tests driving the `gax` binary.
//!
//! Tests the full pipeline: setup → days → migrate.

use std::path::Path;
use std::process::{Command, Output};

use tempfile::TempDir;

const REPORT: &str = r#"{"2022-03-19": [
    {"dimensions": ["/blog/69", "Chrome", "Linux", "desktop", "1850x950", "es-us", "Venezuela", "t.co/"], "metrics": [{"values": ["5", "5"]}]},
    {"dimensions": ["/", "Chrome", "Android", "mobile", "420x800", "en-us", "Malaysia", "google"], "metrics": [{"values": ["1", "0"]}]},
    {"dimensions": ["/blog/51", "Chrome", "Macintosh", "desktop", "1540x850", "en-us", "United States", "(direct)"], "metrics": [{"values": ["4", "2"]}]},
    {"dimensions": ["/blog/68", "Firefox", "Android", "mobile", "410x780", "es-us", "Colombia", "betterprogramming.pub/building-github-apps-with-golang-43b27f3e9621"], "metrics": [{"values": ["3", "2"]}]}
]}"#;

fn gax_binary() -> String {
    env!("CARGO_BIN_EXE_gax").to_string()
}

/// Runs gax with an isolated home directory.
fn gax(home: &Path, args: &[&str]) -> Output {
    Command::new(gax_binary())
        .env("HOME", home)
        .env_remove("XDG_CONFIG_HOME")
        .env_remove("XDG_DATA_HOME")
        .env_remove("RUST_LOG")
        .args(args)
        .output()
        .expect("failed to run gax")
}

fn stdout(output: &Output) -> String {
    assert!(
        output.status.success(),
        "gax should succeed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8(output.stdout.clone()).unwrap()
}

fn write_report(temp: &TempDir) -> String {
    let path = temp.path().join("report.json");
    std::fs::write(&path, REPORT).unwrap();
    path.to_str().unwrap().to_string()
}

#[test]
fn test_setup_then_days_uses_saved_range() {
    let temp = TempDir::new().unwrap();

    let out = stdout(&gax(
        temp.path(),
        &[
            "setup",
            "--metrics",
            "ga:pageviews,ga:sessions",
            "--dimensions",
            "ga:pagePath",
            "--sa-key-path",
            "/keys/sa.json",
            "--table-id",
            "123456",
            "--start-date",
            "2022-03-19",
            "--end-date",
            "2022-03-21",
        ],
    ));
    assert!(out.starts_with("Config written to"), "{out}");

    let days = stdout(&gax(temp.path(), &["days"]));
    let lines: Vec<&str> = days.lines().collect();
    assert_eq!(
        lines,
        [
            r#"{"start":"2022-03-19","end":"2022-03-19"}"#,
            r#"{"start":"2022-03-20","end":"2022-03-20"}"#,
            r#"{"start":"2022-03-21","end":"2022-03-21"}"#,
        ]
    );
}

#[test]
fn test_setup_dry_run_writes_nothing() {
    let temp = TempDir::new().unwrap();
    let config_path = temp.path().join("custom.toml");

    let out = stdout(&gax(
        temp.path(),
        &[
            "--config",
            config_path.to_str().unwrap(),
            "setup",
            "--metrics",
            "ga:pageviews",
            "--dimensions",
            "ga:pagePath",
            "--sa-key-path",
            "/keys/sa.json",
            "--table-id",
            "1",
            "--sampling-level",
            "SMALL",
            "--start-date",
            "2022-03-19",
            "--end-date",
            "2022-03-19",
            "--dry-run",
        ],
    ));
    assert!(out.contains(r#"sampling_level = "SMALL""#), "{out}");
    assert!(!config_path.exists());
}

#[test]
fn test_migrate_umami_sql() {
    let temp = TempDir::new().unwrap();
    let input = write_report(&temp);
    let output = temp.path().join("migration.sql");

    stdout(&gax(
        temp.path(),
        &[
            "migrate",
            "--input",
            &input,
            "--website-id",
            "1",
            "--hostname",
            "localhost",
            "--output",
            output.to_str().unwrap(),
        ],
    ));

    let sql = std::fs::read_to_string(&output).unwrap();
    let lines: Vec<&str> = sql.lines().collect();
    assert_eq!(lines.len(), 25);
    assert_eq!(
        lines.iter().filter(|l| l.starts_with("INSERT INTO session")).count(),
        10
    );
    assert_eq!(
        lines.iter().filter(|l| l.starts_with("INSERT INTO pageview")).count(),
        13
    );
    assert_eq!(lines.iter().filter(|l| l.contains("/blog/68")).count(), 3);
    assert!(lines[0].ends_with("'desktop', '1850x950', 'es', NULL);"), "{}", lines[0]);
}

#[test]
fn test_migrate_csv_to_default_location() {
    let temp = TempDir::new().unwrap();
    let input = write_report(&temp);

    let out = stdout(&gax(
        temp.path(),
        &["migrate", "--input", &input, "--format", "csv"],
    ));
    let path = out
        .trim()
        .strip_prefix("Output written to ")
        .expect("output path should be printed");
    assert!(path.ends_with("_extract.csv"), "{path}");

    let csv = std::fs::read_to_string(path).unwrap();
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(
        lines,
        [
            "path,browser,os,device,screen,language,country,referral_path,count,date",
            "/blog/69,Chrome,Linux,desktop,1850x950,es-us,Venezuela,t.co/,5,2022-03-19",
            "/,Chrome,Android,mobile,420x800,en-us,Malaysia,google,1,2022-03-19",
            "/blog/51,Chrome,Macintosh,desktop,1540x850,en-us,United States,(direct),4,2022-03-19",
            "/blog/68,Firefox,Android,mobile,410x780,es-us,Colombia,betterprogramming.pub/building-github-apps-with-golang-43b27f3e9621,3,2022-03-19",
        ]
    );
}

#[test]
fn test_migrate_json_from_stdin() {
    use std::io::Write;
    use std::process::Stdio;

    let temp = TempDir::new().unwrap();
    let output = temp.path().join("report-copy.json");

    let mut child = Command::new(gax_binary())
        .env("HOME", temp.path())
        .env_remove("XDG_CONFIG_HOME")
        .env_remove("XDG_DATA_HOME")
        .args([
            "migrate",
            "--input",
            "-",
            "--format",
            "json",
            "--output",
            output.to_str().unwrap(),
        ])
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .unwrap();
    child
        .stdin
        .take()
        .unwrap()
        .write_all(REPORT.as_bytes())
        .unwrap();
    let result = child.wait_with_output().unwrap();
    stdout(&result);

    let written: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&output).unwrap()).unwrap();
    let expected: serde_json::Value = serde_json::from_str(REPORT).unwrap();
    assert_eq!(written, expected);
}

#[test]
fn test_migrate_json_keeps_empty_days_and_metric_fields() {
    let temp = TempDir::new().unwrap();
    let input = temp.path().join("report.json");
    let report = r#"{"2022-03-19": [{"dimensions": ["/", "Chrome", "Android", "mobile", "420x800", "en-us", "Malaysia", "google"], "metrics": [{"values": ["1", "0"], "pivotValueRegions": []}]}], "2022-03-20": []}"#;
    std::fs::write(&input, report).unwrap();
    let output = temp.path().join("copy.json");

    stdout(&gax(
        temp.path(),
        &[
            "migrate",
            "--input",
            input.to_str().unwrap(),
            "--format",
            "json",
            "--output",
            output.to_str().unwrap(),
        ],
    ));

    let written: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&output).unwrap()).unwrap();
    let expected: serde_json::Value = serde_json::from_str(report).unwrap();
    assert_eq!(written, expected);
}

#[test]
fn test_migrate_rejects_unknown_format() {
    let temp = TempDir::new().unwrap();
    let input = write_report(&temp);

    let output = gax(temp.path(), &["migrate", "--input", &input, "--format", "postgres"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("invalid output format"));
}
