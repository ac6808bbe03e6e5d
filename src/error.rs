//! Error taxonomy for the extract → infer → validate → patch pipeline.
//!
//! Every variant is fatal to a pipeline run. The target sketch is never
//! written when any of these is returned.

use std::path::PathBuf;
use thiserror::Error;

/// Which pin list a pin-related error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PinRole {
    /// Pins read by the scanner (`input pins:` in generator output)
    Input,
    /// Pins driven by the scanner (`output pins:` in generator output)
    Output,
}

impl std::fmt::Display for PinRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Input => write!(f, "input pins"),
            Self::Output => write!(f, "output pins"),
        }
    }
}

/// Failure raised by one of the pipeline stages or an external collaborator.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// A required named block was absent from the generator output
    #[error("matrix block '{name}' not found in generator output")]
    MissingMatrix {
        /// Block header, e.g. `FN`
        name: String,
    },

    /// A required pin list was absent or empty
    #[error("no {which} found in TEENSY PINS section")]
    MissingPins {
        /// The list that was absent or empty
        which: PinRole,
    },

    /// A pin list contained something other than a base-10 integer
    #[error("invalid pin '{token}' in {label} list")]
    InvalidPin {
        /// List the token came from
        label: PinRole,
        /// Offending token as written
        token: String,
    },

    /// Dimension inference produced a non-positive or empty result
    #[error("matrix '{name}' is malformed: {reason}")]
    MalformedMatrix {
        /// Block header
        name: String,
        /// What made the literal unusable
        reason: String,
    },

    /// A declaration the patcher must rewrite does not exist in the document
    #[error("anchor '{anchor}' not found in target document")]
    AnchorNotFound {
        /// Declaration label, e.g. `const rows_max`
        anchor: String,
    },

    /// A declaration the patcher must rewrite appears more than once
    #[error("anchor '{anchor}' matched {count} times in target document (expected exactly one)")]
    AmbiguousAnchor {
        /// Declaration label
        anchor: String,
        /// Number of matches found
        count: usize,
    },

    /// An anchor name forms no valid pattern, or its declaration lies inside
    /// another anchor's value
    #[error("anchor '{anchor}' is not usable: {reason}")]
    InvalidAnchor {
        /// Declaration label
        anchor: String,
        /// Why it cannot be used
        reason: String,
    },

    /// Strict validation found a shape that disagrees with the ONE matrix
    #[error("'{name}' has shape {found}, expected {expected}")]
    InconsistentShape {
        /// Matrix name or pin list
        name: String,
        /// Shape or count implied by ONE
        expected: String,
        /// Shape or count actually found
        found: String,
    },

    /// An external process exited non-zero or could not be started
    #[error("{tool} failed: {message}")]
    CollaboratorFailure {
        /// Command line of the failing program
        tool: String,
        /// Exit status and captured stderr
        message: String,
    },

    /// Reading or writing one of the pipeline's files failed
    #[error("I/O error for {}: {source}", path.display())]
    Io {
        /// File being read or written
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },
}

impl PipelineError {
    /// Creates an I/O error bound to a path.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Creates a collaborator failure.
    pub fn collaborator(tool: impl Into<String>, message: impl Into<String>) -> Self {
        Self::CollaboratorFailure {
            tool: tool.into(),
            message: message.into(),
        }
    }

    /// Name of the pipeline stage that raised the error.
    pub const fn stage(&self) -> &'static str {
        match self {
            Self::InvalidPin { .. } => "extract",
            Self::MalformedMatrix { .. } => "infer",
            Self::MissingMatrix { .. }
            | Self::MissingPins { .. }
            | Self::InconsistentShape { .. } => "validate",
            Self::AnchorNotFound { .. }
            | Self::AmbiguousAnchor { .. }
            | Self::InvalidAnchor { .. } => "patch",
            Self::CollaboratorFailure { .. } => "collaborator",
            Self::Io { .. } => "io",
        }
    }
}

/// Convenience alias for pipeline results.
pub type PipelineResult<T> = Result<T, PipelineError>;
