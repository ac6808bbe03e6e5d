//! Block extraction from matrix generator output.
//!
//! The generator prints dash-fenced sections, each followed by a C initializer
//! literal, plus a `TEENSY PINS` section with two bracketed pin lists:
//!
//! ```text
//! -----ONE-----
//! {
//! {0,0,0},
//! {0,0,0}
//! }
//! -----KEY-----
//! { ... }
//! TEENSY PINS
//! input pins: [14, 15, 16]
//! output pins: [2, 3]
//! ```

use crate::error::{PinRole, PipelineError, PipelineResult};
use crate::models::{MatrixSet, PinAssignment};
use crate::parser::braces::matching_close;
use regex::Regex;
use std::sync::LazyLock;
use tracing::debug;

/// `-----NAME-----` with five or more dashes on each side.
static HEADER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"-{5,}\s*(\w+)\s*-{5,}").expect("header pattern is valid"));

static INPUT_PINS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)TEENSY PINS.*?input pins:\s*\[([^\]]*)\]").expect("input pin pattern is valid")
});

static OUTPUT_PINS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)TEENSY PINS.*?output pins:\s*\[([^\]]*)\]")
        .expect("output pin pattern is valid")
});

/// Everything the extractor pulls out of one generator run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Extraction {
    /// Captured matrix literals
    pub matrices: MatrixSet,
    /// Pin lists from the TEENSY PINS section (empty when absent)
    pub pins: PinAssignment,
}

/// Extracts matrix blocks and pin lists from generator output.
///
/// Missing blocks and missing pin lists are not errors here; the validator
/// decides whether the result is usable. A pin token that is not a base-10
/// integer fails with [`PipelineError::InvalidPin`].
pub fn extract(output: &str) -> PipelineResult<Extraction> {
    let matrices = extract_matrices(output);
    let pins = extract_pins(output)?;

    debug!(
        blocks = matrices.len(),
        input_pins = pins.input_pins.len(),
        output_pins = pins.output_pins.len(),
        "Extracted generator output"
    );

    Ok(Extraction { matrices, pins })
}

/// Captures every `-----NAME-----` header followed by a balanced `{...}` literal.
///
/// The literal must start on a later line than the header. A header whose
/// literal never closes is skipped. Later duplicates replace earlier ones.
pub fn extract_matrices(output: &str) -> MatrixSet {
    let mut matrices = MatrixSet::new();
    let mut cursor = 0;

    while let Some(caps) = HEADER.captures_at(output, cursor) {
        let Some(header) = caps.get(0) else { break };
        let name = caps.get(1).map_or("", |m| m.as_str().trim());

        match literal_after(output, header.end()) {
            Some((start, end)) => {
                debug!(block = name, bytes = end - start, "Captured matrix block");
                matrices.insert(name, &output[start..end]);
                cursor = end;
            }
            None => {
                debug!(block = name, "Header without a balanced literal, skipping");
                cursor = header.end();
            }
        }
    }

    matrices
}

/// Locates the literal that follows a header ending at `from`.
///
/// Only whitespace may separate the two, and it must include a line break.
fn literal_after(output: &str, from: usize) -> Option<(usize, usize)> {
    let rest = &output[from..];
    let gap = rest.len() - rest.trim_start().len();
    if !rest[..gap].contains('\n') {
        return None;
    }

    let start = from + gap;
    let end = matching_close(output, start)?;
    Some((start, end))
}

/// Reads the input and output pin lists from the TEENSY PINS section.
pub fn extract_pins(output: &str) -> PipelineResult<PinAssignment> {
    let input_pins = pin_list(&INPUT_PINS, output, PinRole::Input)?;
    let output_pins = pin_list(&OUTPUT_PINS, output, PinRole::Output)?;
    Ok(PinAssignment::new(input_pins, output_pins))
}

fn pin_list(pattern: &Regex, output: &str, role: PinRole) -> PipelineResult<Vec<u32>> {
    let Some(body) = pattern.captures(output).and_then(|caps| caps.get(1)) else {
        return Ok(Vec::new());
    };

    parse_pin_list(body.as_str(), role)
}

/// Parses the inside of a `[...]` pin list.
///
/// A blank list yields no pins; every other token must be a base-10 integer.
fn parse_pin_list(body: &str, role: PinRole) -> PipelineResult<Vec<u32>> {
    if body.trim().is_empty() {
        return Ok(Vec::new());
    }

    body.split(',')
        .map(|token| {
            let token = token.trim();
            token.parse::<u32>().map_err(|_| PipelineError::InvalidPin {
                label: role,
                token: token.to_string(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MatrixName;

    const SAMPLE: &str = "\
Which layout? 1
-----ONE-----
{
{0,0,0},
{0,0,0}
}

-----KEY-----
{
{KEY_ESC, KEY_1, KEY_2},
{KEY_TAB, KEY_Q, KEY_W}
}
-----MODIFIER-----
{
{0, MODIFIERKEY_SHIFT, 0},
{0, 0, MODIFIERKEY_CTRL}
}
------ FN ------
{
{KEY_MEDIA_MUTE, 0, 0},
{0, 0, 0}
}
TEENSY PINS
input pins: [14, 15, 16]
output pins: [2,3]
";

    #[test]
    fn test_extracts_all_blocks_verbatim() {
        let extraction = extract(SAMPLE).unwrap();
        let matrices = &extraction.matrices;

        assert_eq!(matrices.len(), 4);
        assert_eq!(
            matrices.get(MatrixName::One),
            Some("{\n{0,0,0},\n{0,0,0}\n}")
        );
        assert_eq!(
            matrices.get(MatrixName::Key),
            Some("{\n{KEY_ESC, KEY_1, KEY_2},\n{KEY_TAB, KEY_Q, KEY_W}\n}")
        );
        assert!(matrices.get(MatrixName::Fn).unwrap().contains("KEY_MEDIA_MUTE"));
    }

    #[test]
    fn test_extracts_pins_in_declared_order() {
        let extraction = extract(SAMPLE).unwrap();
        assert_eq!(extraction.pins.input_pins, vec![14, 15, 16]);
        assert_eq!(extraction.pins.output_pins, vec![2, 3]);
    }

    #[test]
    fn test_scenario_from_minimal_output() {
        let output = "-----ONE-----\n{\n{1,2},\n{3,4}\n}\nTEENSY PINS\ninput pins: [2,3]\noutput pins: [4,5]\n";
        let extraction = extract(output).unwrap();
        assert_eq!(
            extraction.matrices.get(MatrixName::One),
            Some("{\n{1,2},\n{3,4}\n}")
        );
        assert_eq!(extraction.pins, PinAssignment::new(vec![2, 3], vec![4, 5]));
    }

    #[test]
    fn test_deep_nesting_is_captured_whole() {
        let output = "-----KEY-----\n{\n{{1},{2}},\n{{3},{4}}\n}\n";
        let matrices = extract_matrices(output);
        assert_eq!(
            matrices.get(MatrixName::Key),
            Some("{\n{{1},{2}},\n{{3},{4}}\n}")
        );
    }

    #[test]
    fn test_duplicate_header_last_wins() {
        let output = "-----FN-----\n{\n{1}\n}\n-----FN-----\n{\n{2}\n}\n";
        let matrices = extract_matrices(output);
        assert_eq!(matrices.get(MatrixName::Fn), Some("{\n{2}\n}"));
    }

    #[test]
    fn test_unclosed_literal_is_skipped() {
        let output = "-----ONE-----\n{\n{1,2},\n-----KEY-----\n{\n{3}\n}\n";
        let matrices = extract_matrices(output);
        // The ONE literal swallows the KEY header and never closes.
        assert!(matrices.get(MatrixName::One).is_none());
        assert_eq!(matrices.get(MatrixName::Key), Some("{\n{3}\n}"));
    }

    #[test]
    fn test_literal_on_header_line_is_ignored() {
        let matrices = extract_matrices("-----ONE----- {1,2}\n");
        assert!(matrices.is_empty());
    }

    #[test]
    fn test_short_fence_is_not_a_header() {
        let matrices = extract_matrices("----ONE----\n{\n{1}\n}\n");
        assert!(matrices.is_empty());
    }

    #[test]
    fn test_missing_pin_section_gives_empty_lists() {
        let pins = extract_pins("input pins: [1,2]\noutput pins: [3]\n").unwrap();
        assert!(pins.input_pins.is_empty());
        assert!(pins.output_pins.is_empty());
    }

    #[test]
    fn test_only_pins_after_section_label_count() {
        let output = "input pins: [99]\nTEENSY PINS\noutput pins: [7, 8]\ninput pins: [1]\n";
        let pins = extract_pins(output).unwrap();
        assert_eq!(pins.input_pins, vec![1]);
        assert_eq!(pins.output_pins, vec![7, 8]);
    }

    #[test]
    fn test_empty_brackets_give_empty_list() {
        let pins = extract_pins("TEENSY PINS\ninput pins: []\noutput pins: [ ]\n").unwrap();
        assert!(pins.input_pins.is_empty());
        assert!(pins.output_pins.is_empty());
    }

    #[test]
    fn test_invalid_pin_token() {
        let err = extract_pins("TEENSY PINS\ninput pins: [1, x2]\noutput pins: [3]\n").unwrap_err();
        match err {
            PipelineError::InvalidPin { label, token } => {
                assert_eq!(label, PinRole::Input);
                assert_eq!(token, "x2");
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
