//! Matrix dimension inference from literal text.
//!
//! The generator prints one row per line between an opening and a closing
//! brace line, so the shape can be read off the text without parsing cells.

use crate::error::{PipelineError, PipelineResult};
use crate::models::DerivedDimensions;

/// Infers `rows x cols` from a matrix literal.
///
/// `rows` is the line count minus the two brace lines. `cols` is the number of
/// comma-separated cells on the first inner row once braces are removed.
/// `name` is only used in the error.
pub fn infer_dimensions(name: &str, literal: &str) -> PipelineResult<DerivedDimensions> {
    let lines: Vec<&str> = literal.trim().lines().collect();

    let rows = lines.len().saturating_sub(2);
    if rows == 0 {
        return Err(malformed(
            name,
            format!("expected at least one row line, found {} line(s)", lines.len()),
        ));
    }

    let first_row = lines.get(1).copied().unwrap_or_default();
    let cols = count_cells(first_row);
    if cols == 0 {
        return Err(malformed(
            name,
            format!("first row '{}' has no cells", first_row.trim()),
        ));
    }

    Ok(DerivedDimensions::new(rows, cols))
}

/// Counts the cells on one row line, e.g. `{1,2},` has two.
fn count_cells(row: &str) -> usize {
    row.replace(['{', '}'], "")
        .split(',')
        .filter(|cell| !cell.trim().is_empty())
        .count()
}

fn malformed(name: &str, reason: String) -> PipelineError {
    PipelineError::MalformedMatrix {
        name: name.to_string(),
        reason,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn literal(rows: usize, cols: usize) -> String {
        let row = format!("{{{}}}", vec!["0"; cols].join(","));
        let body = vec![row; rows].join(",\n");
        format!("{{\n{body}\n}}")
    }

    #[test]
    fn test_scenario_two_by_two_literal() {
        let dims = infer_dimensions("ONE", "{\n{1,2},\n{3,4}\n}").unwrap();
        // Four lines, two of them the outer braces.
        assert_eq!(dims, DerivedDimensions::new(2, 2));
    }

    #[test]
    fn test_single_row_literal() {
        let dims = infer_dimensions("ONE", "{\n{1,2}\n}").unwrap();
        assert_eq!(dims, DerivedDimensions::new(1, 2));
    }

    #[test]
    fn test_shapes_across_sizes() {
        for rows in 1..=6 {
            for cols in 1..=18 {
                let dims = infer_dimensions("ONE", &literal(rows, cols)).unwrap();
                assert_eq!(dims, DerivedDimensions::new(rows, cols), "{rows}x{cols}");
            }
        }
    }

    #[test]
    fn test_spaces_and_symbolic_cells() {
        let text = "{\n  { KEY_A, KEY_B, KEY_C },\n  { KEY_D, KEY_E, KEY_F }\n}";
        assert_eq!(
            infer_dimensions("KEY", text).unwrap(),
            DerivedDimensions::new(2, 3)
        );
    }

    #[test]
    fn test_too_few_lines_is_malformed() {
        let err = infer_dimensions("ONE", "{{1,2}}").unwrap_err();
        assert!(matches!(err, PipelineError::MalformedMatrix { ref name, .. } if name == "ONE"));

        let err = infer_dimensions("ONE", "{\n}").unwrap_err();
        assert!(matches!(err, PipelineError::MalformedMatrix { .. }));
    }

    #[test]
    fn test_empty_first_row_is_malformed() {
        let err = infer_dimensions("ONE", "{\n{},\n{1}\n}").unwrap_err();
        assert!(err.to_string().contains("no cells"));
    }
}
