//! Shared test fixtures for E2E CLI tests.
#![allow(dead_code)] // Not every test binary uses every fixture

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

/// Path to the matrixsync binary
pub fn matrixsync_bin() -> &'static str {
    env!("CARGO_BIN_EXE_matrixsync")
}

/// Creates a Command with an isolated config directory.
///
/// Pass the same directory to several commands to share configuration.
pub fn isolated_command(args: &[&str], config_dir: &Path) -> Command {
    let mut cmd = Command::new(matrixsync_bin());
    cmd.env("MATRIXSYNC_CONFIG_DIR", config_dir);
    cmd.env_remove("RUST_LOG");
    cmd.args(args);
    cmd
}

/// Builds a `rows` x `cols` matrix literal, one row per line.
///
/// `cell` receives the zero-based row and column.
pub fn matrix_literal(rows: usize, cols: usize, cell: impl Fn(usize, usize) -> String) -> String {
    let body = (0..rows)
        .map(|row| {
            let cells: Vec<String> = (0..cols).map(|col| cell(row, col)).collect();
            format!("{{{}}}", cells.join(","))
        })
        .collect::<Vec<_>>()
        .join(",\n");
    format!("{{\n{body}\n}}")
}

/// Generator output with all four blocks and a TEENSY PINS section.
///
/// Output pins are `2..2+rows` and input pins `14..14+cols`, so the pin counts
/// agree with the matrix shape.
pub fn generator_output(rows: usize, cols: usize) -> String {
    let zeros = matrix_literal(rows, cols, |_, _| "0".to_string());
    let keys = matrix_literal(rows, cols, |r, c| format!("KEY_{}", r * cols + c));
    let output_pins: Vec<String> = (0..rows).map(|i| (2 + i).to_string()).collect();
    let input_pins: Vec<String> = (0..cols).map(|i| (14 + i).to_string()).collect();

    format!(
        "Reading keyboard file...\n\
         -----ONE-----\n{zeros}\n\
         -----KEY-----\n{keys}\n\
         -----MODIFIER-----\n{zeros}\n\
         -----FN-----\n{zeros}\n\
         TEENSY PINS\n\
         input pins: [{}]\n\
         output pins: [{}]\n",
        input_pins.join(", "),
        output_pins.join(", ")
    )
}

/// Generator output with the FN block left out.
pub fn generator_output_without_fn(rows: usize, cols: usize) -> String {
    let full = generator_output(rows, cols);
    let start = full.find("-----FN-----").unwrap();
    let end = full.find("TEENSY PINS").unwrap();
    format!("{}{}", &full[..start], &full[end..])
}

/// A firmware sketch with 1x1 placeholder declarations for every anchor.
pub fn sketch_template() -> String {
    "\
#include <Keyboard.h>

const byte rows_max = 1;
const byte cols_max = 1;

int normal[rows_max][cols_max] = {
{0}
};

int modifier[rows_max][cols_max] = {
{0}
};

int media[rows_max][cols_max] = {
{0}
};

boolean old_key[rows_max][cols_max] = {
{0}
};

int Row_IO[rows_max] = {0}; // row pins
int Col_IO[cols_max] = {0}; // column pins

void setup() {
  for (int c = 0; c < cols_max; c++) {
    pinMode(Col_IO[c], INPUT_PULLUP);
  }
}

void loop() {
}
"
    .to_string()
}

/// Writes generator output and a sketch into a fresh temp directory.
///
/// Returns `(input_path, sketch_path, temp_dir)`; keep the `TempDir` alive.
pub fn workspace_with(output: &str, sketch: &str) -> (PathBuf, PathBuf, TempDir) {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let input = dir.path().join("generator_output.txt");
    let sketch_path = dir.path().join("script3revolt.ino");
    fs::write(&input, output).expect("Failed to write generator output");
    fs::write(&sketch_path, sketch).expect("Failed to write sketch");
    (input, sketch_path, dir)
}

/// Standard 2x3 workspace.
pub fn workspace() -> (PathBuf, PathBuf, TempDir) {
    workspace_with(&generator_output(2, 3), &sketch_template())
}
