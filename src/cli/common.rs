//! Shared CLI error type and exit codes.

use crate::error::PipelineError;
use std::fmt;

/// Process exit codes used by every subcommand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    /// Command completed
    Success = 0,
    /// Input or sketch failed validation
    Validation = 1,
    /// Reading or writing a file failed
    Io = 2,
    /// An external program failed
    Collaborator = 3,
}

impl ExitCode {
    /// Numeric code passed to the OS.
    #[must_use]
    pub const fn code(self) -> i32 {
        self as i32
    }
}

/// Error reported by a subcommand.
#[derive(Debug)]
pub struct CliError {
    /// Exit code the process ends with
    pub kind: ExitCode,
    /// Message printed on stderr
    pub message: String,
}

impl CliError {
    /// Invalid input, configuration or sketch content.
    pub fn validation(message: impl Into<String>) -> Self {
        Self {
            kind: ExitCode::Validation,
            message: message.into(),
        }
    }

    /// File system failure.
    pub fn io(message: impl Into<String>) -> Self {
        Self {
            kind: ExitCode::Io,
            message: message.into(),
        }
    }

    /// External program failure.
    pub fn collaborator(message: impl Into<String>) -> Self {
        Self {
            kind: ExitCode::Collaborator,
            message: message.into(),
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for CliError {}

impl From<PipelineError> for CliError {
    fn from(err: PipelineError) -> Self {
        let message = format!("{} failed: {}", err.stage(), err);
        match err {
            PipelineError::Io { .. } => Self::io(message),
            PipelineError::CollaboratorFailure { .. } => Self::collaborator(message),
            _ => Self::validation(message),
        }
    }
}

/// Result type for subcommands.
pub type CliResult<T> = Result<T, CliError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_pipeline_errors_map_to_exit_codes() {
        let err: CliError = PipelineError::MissingMatrix {
            name: "FN".to_string(),
        }
        .into();
        assert_eq!(err.kind, ExitCode::Validation);
        assert!(err.message.starts_with("validate failed"));

        let err: CliError =
            PipelineError::io("sketch.ino", io::Error::from(io::ErrorKind::NotFound)).into();
        assert_eq!(err.kind.code(), 2);

        let err: CliError = PipelineError::collaborator("arduino-cli", "exit 1").into();
        assert_eq!(err.kind.code(), 3);
    }
}
