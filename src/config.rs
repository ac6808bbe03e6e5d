//! Configuration management for the application.
//!
//! This module handles loading, validating, and saving application configuration
//! in TOML format with platform-specific directory resolution.

use crate::constants::{
    APP_NAME, CONFIG_DIR_ENV, DEFAULT_FQBN, DEFAULT_GENERATOR_ANSWERS, DEFAULT_KEYBOARD_FILE,
    DEFAULT_PORT, DEFAULT_REVIEW_TIMEOUT_SECS, DEFAULT_SKETCH,
};
use crate::firmware::PatchTargets;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Path configuration for file system locations.
///
/// Relative paths resolve against the working directory of the invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathConfig {
    /// Firmware sketch patched with the generated matrices
    pub sketch: PathBuf,
    /// Key list the generator reads (must exist before it runs)
    pub keyboard_file: PathBuf,
    /// Working directory for the generator process
    pub generator_dir: PathBuf,
}

impl Default for PathConfig {
    fn default() -> Self {
        Self {
            sketch: PathBuf::from(DEFAULT_SKETCH),
            keyboard_file: PathBuf::from(DEFAULT_KEYBOARD_FILE),
            generator_dir: PathBuf::from("."),
        }
    }
}

/// How to invoke the matrix generator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Interpreter or executable (e.g. `python3`)
    pub program: String,
    /// Arguments, usually the generator script
    pub args: Vec<String>,
    /// Answers written to stdin, one per line
    pub answers: Vec<String>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            program: "python3".to_string(),
            args: vec!["matrixgenerator.py".to_string()],
            answers: DEFAULT_GENERATOR_ANSWERS
                .iter()
                .map(ToString::to_string)
                .collect(),
        }
    }
}

/// Compile/upload toolchain settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolchainConfig {
    /// Toolchain executable
    pub cli: String,
    /// Fully qualified board name
    pub fqbn: String,
    /// Upload port
    pub port: String,
    /// Sketch folder that prints the raw key matrix
    pub decoder_sketch: PathBuf,
    /// Sketch folder of the keyboard firmware
    pub firmware_sketch: PathBuf,
}

impl Default for ToolchainConfig {
    fn default() -> Self {
        Self {
            cli: "arduino-cli".to_string(),
            fqbn: DEFAULT_FQBN.to_string(),
            port: DEFAULT_PORT.to_string(),
            decoder_sketch: PathBuf::from("matrix_decoder"),
            firmware_sketch: PathBuf::from("script3revolt"),
        }
    }
}

/// Editor used to review the key list before generation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Editor executable
    pub program: String,
    /// Arguments placed before the cursor position and file.
    ///
    /// `--block` keeps `kate` attached when another instance is already open.
    pub args: Vec<String>,
    /// Line to place the cursor on
    pub line: u32,
    /// Column to place the cursor on
    pub column: u32,
    /// Seconds the review may take before the editor is closed (0 = no limit)
    pub timeout_secs: u64,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            program: "kate".to_string(),
            args: vec!["--block".to_string()],
            line: 1,
            column: 33,
            timeout_secs: DEFAULT_REVIEW_TIMEOUT_SECS,
        }
    }
}

/// Application configuration.
///
/// # File Location
///
/// - `$MATRIXSYNC_CONFIG_DIR/config.toml` when the variable is set
/// - Linux: `~/.config/MatrixSync/config.toml`
/// - macOS: `~/Library/Application Support/MatrixSync/config.toml`
/// - Windows: `%APPDATA%\MatrixSync\config.toml`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// File system paths
    pub paths: PathConfig,
    /// Generator invocation
    pub generator: GeneratorConfig,
    /// Compile/upload toolchain
    pub toolchain: ToolchainConfig,
    /// Editor invocation
    pub editor: EditorConfig,
    /// Sketch declaration names
    pub anchors: PatchTargets,
}

impl Config {
    /// Creates a new Config with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Gets the config directory path, honouring `MATRIXSYNC_CONFIG_DIR`.
    pub fn config_dir() -> Result<PathBuf> {
        if let Some(dir) = std::env::var_os(CONFIG_DIR_ENV) {
            return Ok(PathBuf::from(dir));
        }

        let config_dir = dirs::config_dir()
            .context("Failed to determine config directory")?
            .join(APP_NAME);

        Ok(config_dir)
    }

    /// Gets the full path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Loads configuration from the config file.
    ///
    /// If the file doesn't exist, returns default configuration.
    pub fn load() -> Result<Self> {
        let config_path = Self::config_file_path()?;

        if !config_path.exists() {
            return Ok(Self::new());
        }

        let content = fs::read_to_string(&config_path).context(format!(
            "Failed to read config file: {}",
            config_path.display()
        ))?;

        let config: Self = toml::from_str(&content).context(format!(
            "Failed to parse config file: {}",
            config_path.display()
        ))?;

        config.validate()?;
        Ok(config)
    }

    /// Saves configuration to the config file using atomic write.
    pub fn save(&self) -> Result<()> {
        self.validate()?;

        let config_dir = Self::config_dir()?;
        fs::create_dir_all(&config_dir).context(format!(
            "Failed to create config directory: {}",
            config_dir.display()
        ))?;

        let content = toml::to_string_pretty(self).context("Failed to serialize configuration")?;

        let config_path = Self::config_file_path()?;
        let temp_path = config_path.with_extension("toml.tmp");

        fs::write(&temp_path, content).context(format!(
            "Failed to write temp config file: {}",
            temp_path.display()
        ))?;

        fs::rename(&temp_path, &config_path).context(format!(
            "Failed to rename temp config file to: {}",
            config_path.display()
        ))?;

        Ok(())
    }

    /// Validates configuration values.
    ///
    /// Checks:
    /// - executables and board settings are non-empty
    /// - every anchor name is a C identifier
    pub fn validate(&self) -> Result<()> {
        let required = [
            ("generator.program", self.generator.program.as_str()),
            ("toolchain.cli", self.toolchain.cli.as_str()),
            ("toolchain.fqbn", self.toolchain.fqbn.as_str()),
            ("toolchain.port", self.toolchain.port.as_str()),
            ("editor.program", self.editor.program.as_str()),
        ];
        for (key, value) in required {
            if value.trim().is_empty() {
                anyhow::bail!("Configuration value '{key}' must not be empty");
            }
        }

        let anchors = &self.anchors;
        let names = [
            ("anchors.rows_constant", &anchors.rows_constant),
            ("anchors.cols_constant", &anchors.cols_constant),
            ("anchors.normal_matrix", &anchors.normal_matrix),
            ("anchors.modifier_matrix", &anchors.modifier_matrix),
            ("anchors.media_matrix", &anchors.media_matrix),
            ("anchors.state_matrix", &anchors.state_matrix),
            ("anchors.row_pins", &anchors.row_pins),
            ("anchors.col_pins", &anchors.col_pins),
        ];
        for (key, name) in names {
            if !is_identifier(name) {
                anyhow::bail!("Configuration value '{key}' is not a valid identifier: '{name}'");
            }
        }

        Ok(())
    }
}

/// Whether `name` is a C identifier.
fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    chars
        .next()
        .is_some_and(|first| first.is_ascii_alphabetic() || first == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.paths.sketch, PathBuf::from(DEFAULT_SKETCH));
        assert_eq!(config.generator.answers, vec!["1", "4", "n"]);
        assert_eq!(config.toolchain.fqbn, DEFAULT_FQBN);
        assert_eq!(config.anchors.row_pins, "Row_IO");
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config: Config = toml::from_str(
            r#"
            [toolchain]
            port = "usb1/1-2"

            [anchors]
            state_matrix = "prev_state"
            "#,
        )
        .unwrap();

        assert_eq!(config.toolchain.port, "usb1/1-2");
        assert_eq!(config.toolchain.cli, "arduino-cli");
        assert_eq!(config.anchors.state_matrix, "prev_state");
        assert_eq!(config.anchors.normal_matrix, "normal");
        assert_eq!(config.editor.program, "kate");
        assert_eq!(config.editor.args, vec!["--block"]);
        assert_eq!(config.editor.timeout_secs, 60);
    }

    #[test]
    fn test_toml_round_trip() {
        let mut config = Config::default();
        config.generator.answers = vec!["2".to_string()];
        let text = toml::to_string_pretty(&config).unwrap();
        let back: Config = toml::from_str(&text).unwrap();
        assert_eq!(back, config);
    }

    #[test]
    fn test_invalid_anchor_name_rejected() {
        let mut config = Config::default();
        config.anchors.row_pins = "Row IO".to_string();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("anchors.row_pins"));
    }

    #[test]
    fn test_empty_fqbn_rejected() {
        let mut config = Config::default();
        config.toolchain.fqbn = "  ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_is_identifier() {
        assert!(is_identifier("Row_IO"));
        assert!(is_identifier("_x1"));
        assert!(!is_identifier("1x"));
        assert!(!is_identifier(""));
        assert!(!is_identifier("a-b"));
    }
}
