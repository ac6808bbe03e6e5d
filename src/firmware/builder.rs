//! Compiling and uploading sketches with `arduino-cli`.
//!
//! The toolchain is an external collaborator: the pipeline only needs it to
//! compile a sketch folder and flash it to the board, failing loudly on a
//! non-zero exit.

use crate::config::ToolchainConfig;
use crate::error::{PipelineError, PipelineResult};
use std::path::Path;
use std::process::{Command, Stdio};
use tracing::info;

/// Compile/upload operations the pipeline needs from a toolchain.
pub trait FirmwareToolchain {
    /// Compiles the sketch folder.
    fn compile(&self, sketch: &Path) -> PipelineResult<()>;

    /// Uploads a previously compiled sketch folder to the board.
    fn upload(&self, sketch: &Path) -> PipelineResult<()>;

    /// Compiles then uploads.
    fn compile_and_upload(&self, sketch: &Path) -> PipelineResult<()> {
        self.compile(sketch)?;
        self.upload(sketch)
    }
}

/// `arduino-cli` driven with a fixed board and port.
#[derive(Debug, Clone)]
pub struct ArduinoCli {
    cli: String,
    fqbn: String,
    port: String,
}

impl ArduinoCli {
    /// Creates a toolchain from configuration.
    pub fn new(config: &ToolchainConfig) -> Self {
        Self {
            cli: config.cli.clone(),
            fqbn: config.fqbn.clone(),
            port: config.port.clone(),
        }
    }

    /// Arguments for `compile`.
    fn compile_args(&self, sketch: &Path) -> Vec<String> {
        vec![
            "compile".to_string(),
            "--fqbn".to_string(),
            self.fqbn.clone(),
            sketch.display().to_string(),
        ]
    }

    /// Arguments for `upload`.
    fn upload_args(&self, sketch: &Path) -> Vec<String> {
        vec![
            "upload".to_string(),
            "-p".to_string(),
            self.port.clone(),
            "--fqbn".to_string(),
            self.fqbn.clone(),
            sketch.display().to_string(),
        ]
    }

    /// Runs the toolchain with inherited stdout so build output stays visible.
    fn run(&self, args: &[String]) -> PipelineResult<()> {
        info!("Running: {} {}", self.cli, args.join(" "));

        let output = Command::new(&self.cli)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::piped())
            .output()
            .map_err(|e| {
                PipelineError::collaborator(&self.cli, format!("failed to start: {e}"))
            })?;

        if output.status.success() {
            return Ok(());
        }

        let stderr = String::from_utf8_lossy(&output.stderr);
        let message = if stderr.trim().is_empty() {
            format!("exited with {}", output.status)
        } else {
            format!("exited with {}: {}", output.status, stderr.trim())
        };
        Err(PipelineError::collaborator(
            format!("{} {}", self.cli, args.first().map_or("", String::as_str)),
            message,
        ))
    }
}

impl FirmwareToolchain for ArduinoCli {
    fn compile(&self, sketch: &Path) -> PipelineResult<()> {
        self.run(&self.compile_args(sketch))
    }

    fn upload(&self, sketch: &Path) -> PipelineResult<()> {
        self.run(&self.upload_args(sketch))
    }
}
