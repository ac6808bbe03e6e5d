//! Declarations in the firmware sketch that the patcher rewrites.
//!
//! Each [`Anchor`] knows how to find the value span of exactly one
//! declaration. Patterns tolerate whitespace between tokens but nothing else,
//! so commented-out copies of a declaration still count as matches.

use crate::error::{PipelineError, PipelineResult};
use crate::parser::braces::matching_close;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::ops::Range;

/// Names of the sketch declarations bound to extracted data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PatchTargets {
    /// Row count constant (`const byte rows_max = 6;`)
    pub rows_constant: String,
    /// Column count constant (`const byte cols_max = 17;`)
    pub cols_constant: String,
    /// Keycode matrix bound to KEY
    pub normal_matrix: String,
    /// Keycode matrix bound to MODIFIER
    pub modifier_matrix: String,
    /// Keycode matrix bound to FN
    pub media_matrix: String,
    /// Boolean key-state matrix bound to ONE
    pub state_matrix: String,
    /// Pin array bound to the output pins
    pub row_pins: String,
    /// Pin array bound to the input pins
    pub col_pins: String,
}

impl Default for PatchTargets {
    fn default() -> Self {
        Self {
            rows_constant: "rows_max".to_string(),
            cols_constant: "cols_max".to_string(),
            normal_matrix: "normal".to_string(),
            modifier_matrix: "modifier".to_string(),
            media_matrix: "media".to_string(),
            state_matrix: "old_key".to_string(),
            row_pins: "Row_IO".to_string(),
            col_pins: "Col_IO".to_string(),
        }
    }
}

/// Shape of a declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnchorKind {
    /// `const <type> <name> = <value>;`
    SizeConstant,
    /// `int <name>[rows][cols] = { ... };`
    KeyMatrix,
    /// `boolean <name>[rows][cols] = { ... };`
    StateMatrix,
    /// `int <name>[...] = {...}; // comment` on one line
    PinArray,
}

/// One declaration site in the sketch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Anchor {
    /// Declaration shape
    pub kind: AnchorKind,
    /// Declared identifier
    pub name: String,
    rows_constant: String,
    cols_constant: String,
}

impl Anchor {
    /// Creates an anchor. Matrix anchors use the targets' size constants as
    /// their bounds.
    pub fn new(kind: AnchorKind, name: impl Into<String>, targets: &PatchTargets) -> Self {
        Self {
            kind,
            name: name.into(),
            rows_constant: targets.rows_constant.clone(),
            cols_constant: targets.cols_constant.clone(),
        }
    }

    /// Human-readable description used in reports and errors.
    #[must_use]
    pub fn label(&self) -> String {
        match self.kind {
            AnchorKind::SizeConstant => format!("const {}", self.name),
            AnchorKind::KeyMatrix => format!(
                "int {}[{}][{}]",
                self.name, self.rows_constant, self.cols_constant
            ),
            AnchorKind::StateMatrix => format!(
                "boolean {}[{}][{}]",
                self.name, self.rows_constant, self.cols_constant
            ),
            AnchorKind::PinArray => format!("int {}[]", self.name),
        }
    }

    fn pattern(&self) -> PipelineResult<Regex> {
        let name = regex::escape(&self.name);
        let rows = regex::escape(&self.rows_constant);
        let cols = regex::escape(&self.cols_constant);

        let source = match self.kind {
            AnchorKind::SizeConstant => {
                format!(r"\bconst\s+\w+\s+{name}\s*=\s*(?P<value>[^;\n]*?)\s*;")
            }
            AnchorKind::KeyMatrix => {
                format!(r"\bint\s+{name}\s*\[\s*{rows}\s*\]\s*\[\s*{cols}\s*\]\s*=\s*\{{")
            }
            AnchorKind::StateMatrix => format!(
                r"\b(?:boolean|bool)\s+{name}\s*\[\s*{rows}\s*\]\s*\[\s*{cols}\s*\]\s*=\s*\{{"
            ),
            AnchorKind::PinArray => format!(
                r"\bint\s+{name}\s*\[[^\]\n]*\]\s*=\s*(?P<value>\{{[^}}\n]*\}})[ \t]*;[ \t]*//"
            ),
        };

        Regex::new(&source).map_err(|e| PipelineError::InvalidAnchor {
            anchor: self.label(),
            reason: e.to_string(),
        })
    }

    /// Finds the byte range of this declaration's value.
    ///
    /// For matrices the range covers the whole brace-delimited body. Fails
    /// unless the declaration occurs exactly once.
    pub fn locate(&self, document: &str) -> PipelineResult<Range<usize>> {
        let regex = self.pattern()?;

        let spans: Vec<Range<usize>> = match self.kind {
            AnchorKind::SizeConstant | AnchorKind::PinArray => regex
                .captures_iter(document)
                .filter_map(|caps| caps.name("value"))
                .map(|m| m.range())
                .collect(),
            AnchorKind::KeyMatrix | AnchorKind::StateMatrix => regex
                .find_iter(document)
                .filter_map(|m| matrix_body(document, m.end() - 1))
                .collect(),
        };

        match spans.as_slice() {
            [] => Err(PipelineError::AnchorNotFound {
                anchor: self.label(),
            }),
            [span] => Ok(span.clone()),
            _ => Err(PipelineError::AmbiguousAnchor {
                anchor: self.label(),
                count: spans.len(),
            }),
        }
    }
}

/// Body of a matrix initializer opening at `open`, which must be closed and
/// followed by `;`.
fn matrix_body(document: &str, open: usize) -> Option<Range<usize>> {
    let close = matching_close(document, open)?;
    document[close..]
        .trim_start()
        .starts_with(';')
        .then_some(open..close)
}
