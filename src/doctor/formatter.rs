//! Output formatting for dependency check results.
//!
//! Terminal output lists each check with a ✓/✗/⚠ marker, the detected version
//! and, for anything missing, a platform-specific hint. JSON output carries
//! the same information for scripts.

use crate::constants::APP_BINARY_NAME;
use crate::doctor::{DependencyKind, DependencyStatus, ToolStatus};
use serde::{Deserialize, Serialize};
use std::fmt::Write;

/// Output format for doctor results.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable terminal output
    Terminal,
    /// Machine-readable JSON output
    Json,
}

/// Platform used to pick installation hints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    /// macOS
    MacOs,
    /// Linux
    Linux,
    /// Windows
    Windows,
    /// Unknown platform
    Unknown,
}

impl Platform {
    /// Detects the current platform from OS configuration.
    #[must_use]
    pub fn detect() -> Self {
        if cfg!(target_os = "macos") {
            Self::MacOs
        } else if cfg!(target_os = "linux") {
            Self::Linux
        } else if cfg!(target_os = "windows") {
            Self::Windows
        } else {
            Self::Unknown
        }
    }

    /// Returns the platform name as a string.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::MacOs => "macOS",
            Self::Linux => "Linux",
            Self::Windows => "Windows",
            Self::Unknown => "Unknown",
        }
    }
}

/// JSON output structure for doctor results.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonOutput {
    /// Overall health status
    pub status: String,
    /// Number of successful checks
    pub passed: usize,
    /// Number of failed checks
    pub failed: usize,
    /// Number of unknown checks
    pub unknown: usize,
    /// Individual dependency results
    pub dependencies: Vec<JsonDependency>,
    /// Platform information
    pub platform: String,
}

/// JSON representation of a single dependency check.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonDependency {
    /// Dependency name
    pub name: String,
    /// "program" or "file"
    pub kind: String,
    /// Status (available, missing, unknown)
    pub status: String,
    /// Version string if detected
    pub version: Option<String>,
    /// Status message
    pub message: String,
    /// Installation hint if missing
    pub installation_hint: Option<String>,
}

/// Formatter for dependency check results.
pub struct DoctorFormatter {
    format: OutputFormat,
    platform: Platform,
}

impl DoctorFormatter {
    /// Creates a new formatter with terminal output and auto-detected platform.
    #[must_use]
    pub fn new() -> Self {
        Self {
            format: OutputFormat::Terminal,
            platform: Platform::detect(),
        }
    }

    /// Creates a new formatter with specified output format.
    #[must_use]
    pub fn with_format(format: OutputFormat) -> Self {
        Self {
            format,
            platform: Platform::detect(),
        }
    }

    /// Creates a new formatter with specified platform (for testing).
    #[must_use]
    pub const fn with_platform(platform: Platform) -> Self {
        Self {
            format: OutputFormat::Terminal,
            platform,
        }
    }

    /// Formats dependency check results into a human-readable or JSON string.
    pub fn format_results(&self, statuses: &[DependencyStatus]) -> String {
        match self.format {
            OutputFormat::Terminal => self.format_terminal(statuses),
            OutputFormat::Json => self.format_json(statuses),
        }
    }

    fn counts(statuses: &[DependencyStatus]) -> (usize, usize, usize) {
        let count = |wanted: ToolStatus| statuses.iter().filter(|s| s.status == wanted).count();
        (
            count(ToolStatus::Available),
            count(ToolStatus::Missing),
            count(ToolStatus::Unknown),
        )
    }

    fn format_terminal(&self, statuses: &[DependencyStatus]) -> String {
        let mut output = String::new();

        output.push_str("Matrix Sync Environment Status\n");
        output.push_str("══════════════════════════════\n\n");

        let (passed, failed, unknown) = Self::counts(statuses);

        for status in statuses {
            let (symbol, status_text) = match status.status {
                ToolStatus::Available => ("✓", "OK"),
                ToolStatus::Missing => ("✗", "MISSING"),
                ToolStatus::Unknown => ("⚠", "UNKNOWN"),
            };

            // ✓ Toolchain ............ OK (v0.35.3)
            let name_width: usize = 20;
            let dots = ".".repeat(name_width.saturating_sub(status.name.len()));
            write!(output, "{} {}{} {}", symbol, status.name, dots, status_text)
                .expect("Writing to String should not fail");

            if let Some(version) = &status.version {
                write!(output, " (v{version})").expect("Writing to String should not fail");
            }
            output.push('\n');

            if status.status == ToolStatus::Missing {
                if let Some(hint) = self.installation_hint(status) {
                    output.push_str("    Fix: ");
                    output.push_str(&hint);
                    output.push('\n');
                }
            }

            if status.status == ToolStatus::Available {
                output.push('\n');
            } else {
                for line in status.message.lines() {
                    writeln!(output, "    {line}").expect("Writing to String should not fail");
                }
                output.push('\n');
            }
        }

        output.push_str("──────────────────────────────\n");
        write!(output, "Summary: {passed} passed")
            .expect("Writing to String should not fail");
        if failed > 0 {
            write!(output, ", {failed} failed").expect("Writing to String should not fail");
        }
        if unknown > 0 {
            write!(output, ", {unknown} unknown").expect("Writing to String should not fail");
        }
        output.push('\n');

        if failed == 0 && unknown == 0 {
            output.push_str("\n✓ Everything needed for a run is in place.\n");
        } else if failed > 0 {
            output.push_str("\n✗ Missing required programs or files\n");
            output.push_str("  Fix the entries above and run 'doctor' again.\n");
        } else {
            output.push_str("\n⚠ Some checks could not be completed\n");
            output.push_str("  Review warnings above and verify your setup.\n");
        }

        output
    }

    fn format_json(&self, statuses: &[DependencyStatus]) -> String {
        let (passed, failed, unknown) = Self::counts(statuses);

        let overall_status = if failed == 0 && unknown == 0 {
            "ready"
        } else if failed > 0 {
            "missing_dependencies"
        } else {
            "warnings"
        };

        let dependencies = statuses
            .iter()
            .map(|s| JsonDependency {
                name: s.name.clone(),
                kind: match s.kind {
                    DependencyKind::Program => "program".to_string(),
                    DependencyKind::File => "file".to_string(),
                },
                status: match s.status {
                    ToolStatus::Available => "available".to_string(),
                    ToolStatus::Missing => "missing".to_string(),
                    ToolStatus::Unknown => "unknown".to_string(),
                },
                version: s.version.clone(),
                message: s.message.clone(),
                installation_hint: if s.status == ToolStatus::Missing {
                    self.installation_hint(s)
                } else {
                    None
                },
            })
            .collect();

        let json_output = JsonOutput {
            status: overall_status.to_string(),
            passed,
            failed,
            unknown,
            dependencies,
            platform: self.platform.name().to_string(),
        };

        serde_json::to_string_pretty(&json_output).unwrap_or_else(|_| {
            r#"{"status":"error","message":"Failed to serialize JSON output"}"#.to_string()
        })
    }

    fn installation_hint(&self, status: &DependencyStatus) -> Option<String> {
        let config_set = |flag: &str| format!("{APP_BINARY_NAME} config set {flag}");
        match (status.kind, status.name.as_str()) {
            (DependencyKind::Program, "Toolchain") => Some(self.arduino_cli_install()),
            (DependencyKind::Program, "Generator") => Some(self.python_install()),
            (DependencyKind::Program, "Editor") => Some(format!(
                "Install it or pick another: {}",
                config_set("--editor <PROGRAM>")
            )),
            (DependencyKind::File, "Sketch") => Some(config_set("--sketch <FILE>")),
            (DependencyKind::File, "Keyboard File") => Some(config_set("--keyboard-file <FILE>")),
            (DependencyKind::File, "Generator Script") => {
                Some(config_set("--generator-dir <DIR>"))
            }
            _ => None,
        }
    }

    fn arduino_cli_install(&self) -> String {
        match self.platform {
            Platform::MacOs => "brew install arduino-cli".to_string(),
            Platform::Linux => {
                "curl -fsSL https://raw.githubusercontent.com/arduino/arduino-cli/master/install.sh | sh"
                    .to_string()
            }
            Platform::Windows => "winget install ArduinoSA.CLI".to_string(),
            Platform::Unknown => {
                "See https://arduino.github.io/arduino-cli/latest/installation/".to_string()
            }
        }
    }

    fn python_install(&self) -> String {
        match self.platform {
            Platform::MacOs => "brew install python3".to_string(),
            Platform::Linux => "sudo apt-get install python3  (Debian/Ubuntu)".to_string(),
            Platform::Windows => "winget install Python.Python.3.12".to_string(),
            Platform::Unknown => "Install Python 3 for your platform".to_string(),
        }
    }
}

impl Default for DoctorFormatter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    fn sample_statuses() -> Vec<DependencyStatus> {
        vec![
            DependencyStatus::available("Toolchain", "0.35.3"),
            DependencyStatus::missing("Editor", "'kate' not found in PATH"),
            DependencyStatus::present("Sketch", Path::new("script3revolt.ino")),
            DependencyStatus::unknown("Generator", "Could not parse version"),
        ]
    }

    #[test]
    fn test_platform_names() {
        assert_eq!(Platform::MacOs.name(), "macOS");
        assert_eq!(Platform::Linux.name(), "Linux");
        assert_eq!(Platform::Windows.name(), "Windows");
        assert_eq!(Platform::Unknown.name(), "Unknown");
    }

    #[test]
    fn test_format_terminal_basic() {
        let formatter = DoctorFormatter::with_platform(Platform::Linux);
        let output = formatter.format_results(&sample_statuses());

        assert!(output.contains("Matrix Sync Environment Status"));
        assert!(output.contains("Toolchain"));
        assert!(output.contains("✓"));
        assert!(output.contains("✗"));
        assert!(output.contains("⚠"));
        assert!(output.contains("0.35.3"));
        assert!(output.contains("--editor"));
        assert!(output.contains("Summary: 2 passed, 1 failed, 1 unknown"));
    }

    #[test]
    fn test_format_terminal_all_passed() {
        let formatter = DoctorFormatter::with_platform(Platform::Linux);
        let statuses = vec![
            DependencyStatus::available("Toolchain", "0.35.3"),
            DependencyStatus::present("Sketch", Path::new("a.ino")),
        ];
        let output = formatter.format_results(&statuses);

        assert!(output.contains("Everything needed for a run is in place"));
        assert!(output.contains("2 passed"));
    }

    #[test]
    fn test_format_json() {
        let formatter = DoctorFormatter::with_format(OutputFormat::Json);
        let output = formatter.format_results(&sample_statuses());

        let json: serde_json::Value =
            serde_json::from_str(&output).expect("Output should be valid JSON");

        assert_eq!(json["passed"], 2);
        assert_eq!(json["failed"], 1);
        assert_eq!(json["unknown"], 1);
        assert_eq!(json["status"], "missing_dependencies");
        assert_eq!(json["dependencies"][2]["kind"], "file");
        assert!(json["dependencies"][1]["installation_hint"].is_string());
        assert!(json["dependencies"][0]["installation_hint"].is_null());
    }
}
