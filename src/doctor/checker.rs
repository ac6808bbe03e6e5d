//! Environment checks for the matrix sync workflow.
//!
//! A run needs three external programs (the toolchain, the generator
//! interpreter and the editor) plus three files on disk (the sketch, the
//! generator script and the key list). Each check produces a
//! [`DependencyStatus`] and never panics; anything that cannot be decided is
//! reported as [`ToolStatus::Unknown`].
//!
//! # Example
//!
//! ```rust
//! use matrixsync::config::Config;
//! use matrixsync::doctor::{DependencyChecker, ToolStatus};
//!
//! let checker = DependencyChecker::new();
//! for status in checker.check_all(&Config::default()) {
//!     if status.status != ToolStatus::Available {
//!         println!("{}: {}", status.name, status.message);
//!     }
//! }
//! ```

use crate::config::Config;
use anyhow::{Context, Result};
use std::path::Path;
use std::process::Command;

/// Status of a single dependency check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolStatus {
    /// Dependency is present and working
    Available,
    /// Dependency is not found or not working
    Missing,
    /// Could not determine status
    Unknown,
}

/// What a check looked at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DependencyKind {
    /// An executable on `PATH`
    Program,
    /// A file the workflow reads or writes
    File,
}

/// Result of checking a single dependency.
#[derive(Debug, Clone)]
pub struct DependencyStatus {
    /// Display name (e.g. "Toolchain", "Sketch")
    pub name: String,
    /// Program or file
    pub kind: DependencyKind,
    /// Status of the dependency
    pub status: ToolStatus,
    /// Version string if detected
    pub version: Option<String>,
    /// Human-readable message about the status
    pub message: String,
}

impl DependencyStatus {
    /// Creates a new dependency status.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        kind: DependencyKind,
        status: ToolStatus,
        version: Option<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            kind,
            status,
            version,
            message: message.into(),
        }
    }

    /// Creates a status for an available program.
    #[must_use]
    pub fn available(name: impl Into<String>, version: impl Into<String>) -> Self {
        let version_str = version.into();
        Self::new(
            name,
            DependencyKind::Program,
            ToolStatus::Available,
            Some(version_str.clone()),
            format!("Found version {version_str}"),
        )
    }

    /// Creates a status for a file that exists.
    #[must_use]
    pub fn present(name: impl Into<String>, path: &Path) -> Self {
        Self::new(
            name,
            DependencyKind::File,
            ToolStatus::Available,
            None,
            format!("Found {}", path.display()),
        )
    }

    /// Creates a status for a missing dependency.
    #[must_use]
    pub fn missing(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(name, DependencyKind::Program, ToolStatus::Missing, None, message)
    }

    /// Creates a status for an unknown dependency state.
    #[must_use]
    pub fn unknown(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(name, DependencyKind::Program, ToolStatus::Unknown, None, message)
    }

    #[must_use]
    fn as_file(mut self) -> Self {
        self.kind = DependencyKind::File;
        self
    }
}

/// Checker for the programs and files a run depends on.
#[derive(Debug, Default)]
pub struct DependencyChecker;

impl DependencyChecker {
    /// Creates a new dependency checker.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Checks every program and file named by `config`.
    pub fn check_all(&self, config: &Config) -> Vec<DependencyStatus> {
        let generator_script = config
            .generator
            .args
            .first()
            .map(|script| config.paths.generator_dir.join(script));

        let mut statuses = vec![
            self.check_program("Toolchain", &config.toolchain.cli, &["version"]),
            self.check_program("Generator", &config.generator.program, &["--version"]),
            self.check_program("Editor", &config.editor.program, &["--version"]),
            self.check_file("Sketch", &config.paths.sketch),
        ];
        if let Some(script) = generator_script {
            statuses.push(self.check_file("Generator Script", &script));
        }
        statuses.push(self.check_file("Keyboard File", &config.paths.keyboard_file));
        statuses
    }

    /// Checks that `command` runs and reports a version.
    pub fn check_program(&self, name: &str, command: &str, args: &[&str]) -> DependencyStatus {
        match self.run_version_command(command, args) {
            Ok(output) => {
                if let Some(version) = Self::parse_version(&output) {
                    DependencyStatus::available(name, version)
                } else {
                    DependencyStatus::unknown(
                        name,
                        format!(
                            "Found '{command}' but could not parse version: {}",
                            output.lines().next().unwrap_or("").trim()
                        ),
                    )
                }
            }
            Err(e) => {
                if Self::is_command_not_found(&e) {
                    DependencyStatus::missing(name, format!("'{command}' not found in PATH"))
                } else {
                    DependencyStatus::unknown(name, format!("Error checking '{command}': {e:#}"))
                }
            }
        }
    }

    /// Checks that `path` is an existing file.
    pub fn check_file(&self, name: &str, path: &Path) -> DependencyStatus {
        if path.is_file() {
            DependencyStatus::present(name, path)
        } else if path.exists() {
            DependencyStatus::missing(name, format!("Not a file: {}", path.display())).as_file()
        } else {
            DependencyStatus::missing(name, format!("File does not exist: {}", path.display()))
                .as_file()
        }
    }

    /// Runs a command and returns whichever of stdout/stderr has content.
    fn run_version_command(&self, command: &str, args: &[&str]) -> Result<String> {
        let output = Command::new(command)
            .args(args)
            .output()
            .context(format!("Failed to execute '{command}'"))?;

        // python2 and some editors print their version on stderr
        let stdout = String::from_utf8_lossy(&output.stdout);
        let stderr = String::from_utf8_lossy(&output.stderr);

        let result = if stdout.trim().is_empty() {
            stderr.to_string()
        } else {
            stdout.to_string()
        };

        Ok(result)
    }

    /// Finds the first `X.Y[.Z]` token in the output.
    ///
    /// Examples:
    /// - "Python 3.11.4" -> Some("3.11.4")
    /// - "arduino-cli  Version: 0.35.3 Commit: 95cfd654" -> Some("0.35.3")
    /// - "kate 23.08.1" -> Some("23.08.1")
    fn parse_version(output: &str) -> Option<String> {
        output
            .split_whitespace()
            .map(|word| word.trim_matches(|c: char| !c.is_ascii_digit() && c != '.'))
            .map(|word| word.trim_matches('.'))
            .find(|word| {
                let parts: Vec<&str> = word.split('.').collect();
                parts.len() >= 2
                    && parts
                        .iter()
                        .all(|part| !part.is_empty() && part.chars().all(|c| c.is_ascii_digit()))
            })
            .map(String::from)
    }

    /// Checks if an error indicates a command was not found.
    fn is_command_not_found(error: &anyhow::Error) -> bool {
        let error_msg = format!("{error:#}").to_lowercase();
        error_msg.contains("not found")
            || error_msg.contains("no such file")
            || error_msg.contains("cannot find")
            || error_msg.contains("os error 2") // ENOENT on Unix
    }
}
