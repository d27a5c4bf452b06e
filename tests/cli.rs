use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use std::io::Write;
use std::path::PathBuf;

fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn line_count(expected: usize) -> impl Predicate<str> {
    predicate::function(move |out: &str| out.lines().count() == expected)
}

#[test]
fn check_clean_source_succeeds() {
    let mut cmd = cargo_bin_cmd!("zatlin");
    cmd.arg("check").arg(fixture_path("english.ztl"));

    cmd.assert().success().stdout(predicate::str::is_empty());
}

#[test]
fn check_reports_errors_and_warnings() {
    let mut cmd = cargo_bin_cmd!("zatlin");
    cmd.arg("check").arg(fixture_path("broken.ztl"));

    let output_pred = predicate::str::contains("error: Undefined identifier Missing")
        .and(predicate::str::contains("error: Circular reference involving identifier"))
        .and(predicate::str::contains("2:1: warning: Unused identifier Unused"));

    cmd.assert().code(1).stdout(output_pred);
}

#[test]
fn check_can_hide_warnings() {
    let mut config = tempfile::Builder::new()
        .suffix(".toml")
        .tempfile()
        .expect("temp file");
    writeln!(config, "[output]\nshow_warnings = false").expect("write");

    let mut cmd = cargo_bin_cmd!("zatlin");
    cmd.arg("check")
        .arg(fixture_path("broken.ztl"))
        .arg("--config")
        .arg(config.path());

    cmd.assert()
        .code(1)
        .stdout(predicate::str::contains("warning").not());
}

#[test]
fn check_json_output() {
    let mut cmd = cargo_bin_cmd!("zatlin");
    cmd.arg("check")
        .arg(fixture_path("lexical.ztl"))
        .arg("--format")
        .arg("json");

    let output_pred = predicate::str::contains("\"message\": \"Invalid symbol $\"")
        .and(predicate::str::contains("\"severity\": \"error\""));

    cmd.assert().code(1).stdout(output_pred);
}

#[test]
fn generate_requested_count() {
    let mut cmd = cargo_bin_cmd!("zatlin");
    cmd.arg("generate")
        .arg(fixture_path("english.ztl"))
        .arg("-n")
        .arg("7")
        .arg("--seed")
        .arg("11");

    cmd.assert().success().stdout(line_count(7));
}

#[test]
fn generate_is_reproducible_with_seed() {
    let run = || {
        let mut cmd = cargo_bin_cmd!("zatlin");
        cmd.arg("generate")
            .arg(fixture_path("english.ztl"))
            .arg("--seed")
            .arg("42");
        cmd.output().expect("binary runs").stdout
    };

    let first = run();
    assert!(!first.is_empty());
    assert_eq!(first, run());
}

#[test]
fn generate_unique_stops_when_exhausted() {
    let mut cmd = cargo_bin_cmd!("zatlin");
    cmd.arg("generate")
        .arg(fixture_path("excluded.ztl"))
        .arg("-n")
        .arg("5")
        .arg("--unique");

    cmd.assert().success().stdout("y\n");
}

#[test]
fn generate_count_from_config_file() {
    let mut config = tempfile::Builder::new()
        .suffix(".toml")
        .tempfile()
        .expect("temp file");
    writeln!(config, "[generate]\ncount = 3\nseed = 5").expect("write");

    let mut cmd = cargo_bin_cmd!("zatlin");
    cmd.arg("generate")
        .arg(fixture_path("english.ztl"))
        .arg("-c")
        .arg(config.path());

    cmd.assert().success().stdout(line_count(3));
}

#[test]
fn generate_reads_project_file_beside_source() {
    let dir = tempfile::tempdir().expect("temp dir");
    let source = dir.path().join("words.ztl");
    std::fs::write(&source, "% \"ka\" | \"ti\"\n").expect("write");
    std::fs::write(dir.path().join("zatlin.toml"), "[generate]\ncount = 2\nseed = 1\n")
        .expect("write");

    let mut cmd = cargo_bin_cmd!("zatlin");
    cmd.arg("generate").arg(&source);
    cmd.assert().success().stdout(line_count(2));

    // flags win over the project file
    let mut cmd = cargo_bin_cmd!("zatlin");
    cmd.arg("generate").arg(&source).arg("-n").arg("4");
    cmd.assert().success().stdout(line_count(4));
}

#[test]
fn generate_yaml_report() {
    let mut cmd = cargo_bin_cmd!("zatlin");
    cmd.arg("generate")
        .arg(fixture_path("excluded.ztl"))
        .arg("-n")
        .arg("2")
        .arg("-f")
        .arg("yaml");

    let output_pred =
        predicate::str::contains("words:").and(predicate::str::contains("- y"));

    cmd.assert().success().stdout(output_pred);
}

#[test]
fn generate_refuses_broken_source() {
    let mut cmd = cargo_bin_cmd!("zatlin");
    cmd.arg("generate").arg(fixture_path("broken.ztl"));

    cmd.assert()
        .code(1)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("does not compile"));
}

#[test]
fn tokens_dump() {
    let mut cmd = cargo_bin_cmd!("zatlin");
    cmd.arg("tokens").arg(fixture_path("excluded.ztl"));

    let output_pred = predicate::str::starts_with("1:1 % \"%\"")
        .and(predicate::str::contains("1:3 literal \"\\\"x\\\"\""));

    cmd.assert().success().stdout(output_pred);
}

#[test]
fn missing_source_is_an_operational_error() {
    let mut cmd = cargo_bin_cmd!("zatlin");
    cmd.arg("check").arg(fixture_path("does-not-exist.ztl"));

    cmd.assert()
        .code(2)
        .stderr(predicate::str::contains("Error: failed to read"));
}

#[test]
fn unknown_format_is_an_operational_error() {
    let mut cmd = cargo_bin_cmd!("zatlin");
    cmd.arg("check")
        .arg(fixture_path("english.ztl"))
        .arg("--format")
        .arg("xml");

    cmd.assert()
        .code(2)
        .stderr(predicate::str::contains("unknown output format 'xml'"));
}
