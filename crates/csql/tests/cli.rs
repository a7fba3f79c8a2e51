//! Runs the csql binary against files on disk.

use std::path::Path;
use std::process::{Command, Output};

fn csql(args: &[&str], config_dir: &Path) -> Output {
    Command::new(env!("CARGO_BIN_EXE_csql"))
        .args(args)
        .env("CSQL_CONFIG_DIR", config_dir)
        .env_remove("CSQL_LOG")
        .output()
        .unwrap()
}

#[test]
fn test_spans_for_csharp_file() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("Query.cs");
    std::fs::write(&file, "var q = $\"SELECT {col} FROM t\";\n").unwrap();

    let output = csql(&["--spans", file.to_str().unwrap()], dir.path());
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(
        lines,
        vec!["1:11\t10..16\tkeyword\t\"SELECT\"", "1:24\t23..27\tkeyword\t\"FROM\""]
    );
}

#[test]
fn test_highlight_without_color_reproduces_source() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("Query.cs");
    let source = "var q = @\"SELECT *\nFROM t\";\nvar s = \"hello\";\n";
    std::fs::write(&file, source).unwrap();

    let output = csql(&["--no-color", file.to_str().unwrap()], dir.path());
    assert!(output.status.success());
    assert_eq!(String::from_utf8(output.stdout).unwrap(), source);
}

#[test]
fn test_format_reports_parse_errors() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("broken.sql");
    std::fs::write(&file, "SELECT (1").unwrap();

    let output = csql(&["--format", "--no-color", file.to_str().unwrap()], dir.path());
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.starts_with("--WARNING! ERRORS ENCOUNTERED DURING SQL PARSING!\n"));
}

#[test]
fn test_invalid_config_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("bad.toml");
    std::fs::write(&config, "[classifier]\nfiller = \"\u{e9}\"\n").unwrap();
    let file = dir.path().join("Query.cs");
    std::fs::write(&file, "").unwrap();

    let output = csql(
        &["--config", config.to_str().unwrap(), file.to_str().unwrap()],
        dir.path(),
    );
    assert!(!output.status.success());
}

#[test]
fn test_missing_file_argument() {
    let dir = tempfile::tempdir().unwrap();
    let output = csql(&[], dir.path());
    assert_eq!(output.status.code(), Some(2));
}
