//! In-place rewriting of the firmware sketch.
//!
//! The patcher applies eight anchored substitutions to an in-memory copy of
//! the sketch: the two size constants, the three keycode matrices, the key
//! state matrix and the two pin arrays. Text outside the value spans is never
//! touched. Any anchor failure aborts the whole patch.

use crate::error::{PipelineError, PipelineResult};
use crate::firmware::anchors::{Anchor, AnchorKind, PatchTargets};
use crate::models::{DerivedDimensions, MatrixName, MatrixSet, PinAssignment};
use serde::Serialize;
use tracing::debug;

/// Outcome of one anchored substitution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnchorChange {
    /// Anchor description, e.g. `int normal[rows_max][cols_max]`
    pub anchor: String,
    /// Whether the value differed from what was already there
    pub changed: bool,
}

/// Patched sketch text plus a per-anchor summary.
#[derive(Debug, Clone)]
pub struct PatchOutcome {
    /// Full sketch text after all substitutions
    pub document: String,
    /// One entry per anchor, in application order
    pub changes: Vec<AnchorChange>,
}

impl PatchOutcome {
    /// Returns true if any anchor received a new value.
    #[must_use]
    pub fn is_changed(&self) -> bool {
        self.changes.iter().any(|change| change.changed)
    }
}

/// Rewrites sketch declarations from extracted generator data.
pub struct DocumentPatcher<'a> {
    targets: &'a PatchTargets,
}

impl<'a> DocumentPatcher<'a> {
    /// Creates a patcher for the given declaration names.
    pub const fn new(targets: &'a PatchTargets) -> Self {
        Self { targets }
    }

    /// Applies every substitution to `document` and returns the new text.
    ///
    /// All anchors are located in the original document before anything is
    /// replaced. Each must match exactly once there, and no value span may
    /// overlap another.
    pub fn patch(
        &self,
        document: &str,
        matrices: &MatrixSet,
        pins: &PinAssignment,
        dimensions: DerivedDimensions,
    ) -> PipelineResult<PatchOutcome> {
        let plan = self.plan(matrices, pins, dimensions)?;

        let mut located = Vec::with_capacity(plan.len());
        for (anchor, replacement) in plan {
            let span = anchor.locate(document)?;
            located.push((anchor, span, replacement));
        }

        let mut order: Vec<usize> = (0..located.len()).collect();
        order.sort_by_key(|&i| located[i].1.start);
        for pair in order.windows(2) {
            let (earlier, later) = (&located[pair[0]], &located[pair[1]]);
            if later.1.start < earlier.1.end {
                return Err(PipelineError::InvalidAnchor {
                    anchor: later.0.label(),
                    reason: format!("declared inside the value of '{}'", earlier.0.label()),
                });
            }
        }

        let changes: Vec<AnchorChange> = located
            .iter()
            .map(|(anchor, span, replacement)| {
                let changed = document[span.clone()] != *replacement;
                debug!(anchor = %anchor.label(), changed, "Substituting anchor");
                AnchorChange {
                    anchor: anchor.label(),
                    changed,
                }
            })
            .collect();

        // Back to front, so earlier spans keep their offsets
        let mut content = document.to_string();
        for &i in order.iter().rev() {
            let (_, span, replacement) = &located[i];
            if changes[i].changed {
                content.replace_range(span.clone(), replacement);
            }
        }

        Ok(PatchOutcome {
            document: content,
            changes,
        })
    }

    /// Pairs every anchor with the text that replaces its value.
    fn plan(
        &self,
        matrices: &MatrixSet,
        pins: &PinAssignment,
        dimensions: DerivedDimensions,
    ) -> PipelineResult<Vec<(Anchor, String)>> {
        let targets = self.targets;
        let literal = |name: MatrixName| {
            matrices
                .get(name)
                .map(str::to_string)
                .ok_or_else(|| PipelineError::MissingMatrix {
                    name: name.header().to_string(),
                })
        };
        let anchor = |kind, name: &str| Anchor::new(kind, name, targets);

        Ok(vec![
            (
                anchor(AnchorKind::SizeConstant, &targets.rows_constant),
                dimensions.rows.to_string(),
            ),
            (
                anchor(AnchorKind::SizeConstant, &targets.cols_constant),
                dimensions.cols.to_string(),
            ),
            (
                anchor(AnchorKind::KeyMatrix, &targets.normal_matrix),
                literal(MatrixName::Key)?,
            ),
            (
                anchor(AnchorKind::KeyMatrix, &targets.modifier_matrix),
                literal(MatrixName::Modifier)?,
            ),
            (
                anchor(AnchorKind::KeyMatrix, &targets.media_matrix),
                literal(MatrixName::Fn)?,
            ),
            (
                anchor(AnchorKind::StateMatrix, &targets.state_matrix),
                literal(MatrixName::One)?,
            ),
            (
                anchor(AnchorKind::PinArray, &targets.row_pins),
                PinAssignment::format_literal(&pins.output_pins),
            ),
            (
                anchor(AnchorKind::PinArray, &targets.col_pins),
                PinAssignment::format_literal(&pins.input_pins),
            ),
        ])
    }
}
