//! Consistency checks between extraction and patching.
//!
//! Missing blocks and missing pins stop the pipeline. Shape disagreements
//! between the ONE matrix, the keycode matrices and the pin lists are reported
//! as warnings, or promoted to errors in strict mode.

// Allow format! appended to String - more readable for building messages
#![allow(clippy::format_push_string)]

use crate::error::{PinRole, PipelineError, PipelineResult};
use crate::models::{DerivedDimensions, MatrixName, MatrixSet, PinAssignment};
use crate::parser::infer_dimensions;

/// Non-fatal findings from a successful validation.
#[derive(Debug, Clone, Default)]
pub struct ValidationReport {
    /// Shape and pin-count disagreements
    pub warnings: Vec<ValidationWarning>,
}

impl ValidationReport {
    /// Creates a new empty validation report.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            warnings: Vec::new(),
        }
    }

    /// Returns true if nothing was flagged.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty()
    }

    /// Adds a warning to the report.
    pub fn add_warning(&mut self, warning: ValidationWarning) {
        self.warnings.push(warning);
    }

    /// Formats the report as a user-friendly message.
    #[must_use]
    pub fn format_message(&self) -> String {
        let mut message = String::new();

        if !self.warnings.is_empty() {
            message.push_str(&format!("⚠️  {} warnings:\n", self.warnings.len()));
            for (idx, warning) in self.warnings.iter().enumerate() {
                message.push_str(&format!("  {}. {}\n", idx + 1, warning));
            }
        }

        message
    }
}

/// Types of validation warnings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WarningKind {
    /// A keycode matrix has a different shape from ONE
    ShapeMismatch,
    /// A keycode matrix's shape could not be read
    UnreadableShape,
    /// A pin list length differs from the matching dimension
    PinCountMismatch,
}

impl std::fmt::Display for WarningKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ShapeMismatch => write!(f, "Shape Mismatch"),
            Self::UnreadableShape => write!(f, "Unreadable Shape"),
            Self::PinCountMismatch => write!(f, "Pin Count Mismatch"),
        }
    }
}

/// Validation warning (non-blocking unless strict).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationWarning {
    /// What was inconsistent
    pub kind: WarningKind,
    /// Matrix name or pin list the warning is about
    pub subject: String,
    /// Shape or count implied by the ONE matrix
    pub expected: String,
    /// Shape or count actually found
    pub found: String,
}

impl ValidationWarning {
    fn into_error(self) -> PipelineError {
        PipelineError::InconsistentShape {
            name: self.subject,
            expected: self.expected,
            found: self.found,
        }
    }
}

impl std::fmt::Display for ValidationWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}: {} is {}, expected {}",
            self.kind, self.subject, self.found, self.expected
        )
    }
}

/// Validates extracted data before the sketch is touched.
pub struct ConsistencyValidator<'a> {
    matrices: &'a MatrixSet,
    pins: &'a PinAssignment,
    dimensions: Option<DerivedDimensions>,
    strict: bool,
}

impl<'a> ConsistencyValidator<'a> {
    /// Creates a validator over extracted matrices and pins.
    pub const fn new(matrices: &'a MatrixSet, pins: &'a PinAssignment) -> Self {
        Self {
            matrices,
            pins,
            dimensions: None,
            strict: false,
        }
    }

    /// Enables shape checks against the dimensions inferred from ONE.
    #[must_use]
    pub const fn with_dimensions(mut self, dimensions: DerivedDimensions) -> Self {
        self.dimensions = Some(dimensions);
        self
    }

    /// Promotes shape warnings to [`PipelineError::InconsistentShape`].
    #[must_use]
    pub const fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Runs all checks.
    ///
    /// Fails with `MissingMatrix` for the first absent block, then with
    /// `MissingPins` if either pin list is empty.
    pub fn validate(&self) -> PipelineResult<ValidationReport> {
        if let Some(name) = self.matrices.missing().first() {
            return Err(PipelineError::MissingMatrix {
                name: name.header().to_string(),
            });
        }

        if self.pins.input_pins.is_empty() {
            return Err(PipelineError::MissingPins {
                which: PinRole::Input,
            });
        }
        if self.pins.output_pins.is_empty() {
            return Err(PipelineError::MissingPins {
                which: PinRole::Output,
            });
        }

        let mut report = ValidationReport::new();
        if let Some(dimensions) = self.dimensions {
            self.check_matrix_shapes(dimensions, &mut report);
            self.check_pin_counts(dimensions, &mut report);
        }

        if self.strict {
            if let Some(warning) = report.warnings.first() {
                return Err(warning.clone().into_error());
            }
        }

        Ok(report)
    }

    fn check_matrix_shapes(&self, expected: DerivedDimensions, report: &mut ValidationReport) {
        for name in [MatrixName::Key, MatrixName::Modifier, MatrixName::Fn] {
            let Some(literal) = self.matrices.get(name) else {
                continue;
            };

            match infer_dimensions(name.header(), literal) {
                Ok(found) if found == expected => {}
                Ok(found) => report.add_warning(ValidationWarning {
                    kind: WarningKind::ShapeMismatch,
                    subject: name.header().to_string(),
                    expected: expected.to_string(),
                    found: found.to_string(),
                }),
                Err(_) => report.add_warning(ValidationWarning {
                    kind: WarningKind::UnreadableShape,
                    subject: name.header().to_string(),
                    expected: expected.to_string(),
                    found: "unreadable".to_string(),
                }),
            }
        }
    }

    fn check_pin_counts(&self, dimensions: DerivedDimensions, report: &mut ValidationReport) {
        let checks = [
            (PinRole::Output, self.pins.output_pins.len(), dimensions.rows),
            (PinRole::Input, self.pins.input_pins.len(), dimensions.cols),
        ];

        for (role, found, expected) in checks {
            if found != expected {
                report.add_warning(ValidationWarning {
                    kind: WarningKind::PinCountMismatch,
                    subject: role.to_string(),
                    expected: format!("{expected} pins"),
                    found: format!("{found} pins"),
                });
            }
        }
    }
}
