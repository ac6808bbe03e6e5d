//! End-to-end tests for `matrixsync extract` command.

use std::fs;
use tempfile::TempDir;

mod fixtures;
use fixtures::*;

#[test]
fn test_extract_human_readable() {
    let config_dir = TempDir::new().unwrap();
    let (input, _sketch, _dir) = workspace();

    let output = isolated_command(
        &["extract", "--input", input.to_str().unwrap()],
        config_dir.path(),
    )
    .output()
    .expect("Failed to execute command");

    assert_eq!(
        output.status.code(),
        Some(0),
        "Extract should succeed. stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Dimensions: 2x3"));
    assert!(stdout.contains("Input pins:  {14,15,16}"));
    assert!(stdout.contains("Output pins: {2,3}"));
    assert!(stdout.contains("KEY:"));
}

#[test]
fn test_extract_json_structure() {
    let config_dir = TempDir::new().unwrap();
    let (input, _sketch, _dir) = workspace();

    let output = isolated_command(
        &["extract", "--input", input.to_str().unwrap(), "--json"],
        config_dir.path(),
    )
    .output()
    .unwrap();
    assert_eq!(output.status.code(), Some(0));

    let result: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("Should parse JSON output");

    assert_eq!(result["dimensions"]["rows"], 2);
    assert_eq!(result["dimensions"]["cols"], 3);
    assert_eq!(result["pins"]["input_pins"], serde_json::json!([14, 15, 16]));
    assert_eq!(result["pins"]["output_pins"], serde_json::json!([2, 3]));

    let matrices = result["matrices"].as_object().unwrap();
    let mut names: Vec<&str> = matrices.keys().map(String::as_str).collect();
    names.sort_unstable();
    assert_eq!(names, vec!["FN", "KEY", "MODIFIER", "ONE"]);
    assert_eq!(
        matrices["KEY"],
        "{\n{KEY_0,KEY_1,KEY_2},\n{KEY_3,KEY_4,KEY_5}\n}"
    );
}

#[test]
fn test_extract_nested_literal_survives() {
    let config_dir = TempDir::new().unwrap();
    let generator = generator_output(2, 2).replace(
        "-----FN-----\n{\n{0,0},\n{0,0}\n}",
        "-----FN-----\n{\n{{0},{0}},\n{{0},{0}}\n}",
    );
    let (input, _sketch, _dir) = workspace_with(&generator, &sketch_template());

    let output = isolated_command(
        &["extract", "--input", input.to_str().unwrap(), "--json"],
        config_dir.path(),
    )
    .output()
    .unwrap();
    assert_eq!(output.status.code(), Some(0));

    let result: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(result["matrices"]["FN"], "{\n{{0},{0}},\n{{0},{0}}\n}");
}

#[test]
fn test_extract_invalid_pin() {
    let config_dir = TempDir::new().unwrap();
    let generator = generator_output(2, 3).replace("input pins: [14, 15, 16]", "input pins: [14, A0]");
    let (input, _sketch, _dir) = workspace_with(&generator, &sketch_template());

    let output = isolated_command(
        &["extract", "--input", input.to_str().unwrap()],
        config_dir.path(),
    )
    .output()
    .unwrap();

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("A0"), "stderr: {stderr}");
}

#[test]
fn test_extract_missing_pins() {
    let config_dir = TempDir::new().unwrap();
    let generator = generator_output(2, 3).replace("output pins: [2, 3]", "output pins: []");
    let (input, _sketch, _dir) = workspace_with(&generator, &sketch_template());

    let output = isolated_command(
        &["extract", "--input", input.to_str().unwrap()],
        config_dir.path(),
    )
    .output()
    .unwrap();

    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("output pins"));
}

#[test]
fn test_extract_missing_one_block() {
    let config_dir = TempDir::new().unwrap();
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("output.txt");
    fs::write(&input, "no matrices here\n").unwrap();

    let output = isolated_command(
        &["extract", "--input", input.to_str().unwrap()],
        config_dir.path(),
    )
    .output()
    .unwrap();

    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("'ONE'"));
}

#[test]
fn test_extract_logs_to_stderr_when_verbose() {
    let config_dir = TempDir::new().unwrap();
    let (input, _sketch, _dir) = workspace();

    let output = isolated_command(
        &["-v", "extract", "--input", input.to_str().unwrap(), "--json"],
        config_dir.path(),
    )
    .output()
    .unwrap();

    assert_eq!(output.status.code(), Some(0));
    // stdout stays pure JSON even with debug logging on
    let _: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert!(!output.stderr.is_empty());
}
