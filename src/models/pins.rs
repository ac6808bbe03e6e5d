//! Teensy pin assignments and sketch dimensions.

use serde::{Deserialize, Serialize};

/// Input and output pin numbers in the order the generator listed them.
///
/// Output pins drive the rows (`Row_IO`), input pins sense the columns
/// (`Col_IO`). Order maps positionally onto the sketch arrays.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PinAssignment {
    /// Pins read by the matrix scanner
    pub input_pins: Vec<u32>,
    /// Pins driven by the matrix scanner
    pub output_pins: Vec<u32>,
}

impl PinAssignment {
    /// Creates a pin assignment from explicit lists.
    #[must_use]
    pub fn new(input_pins: Vec<u32>, output_pins: Vec<u32>) -> Self {
        Self {
            input_pins,
            output_pins,
        }
    }

    /// Formats a pin list as a C initializer body, e.g. `{4,5}`.
    #[must_use]
    pub fn format_literal(pins: &[u32]) -> String {
        let joined = pins
            .iter()
            .map(u32::to_string)
            .collect::<Vec<_>>()
            .join(",");
        format!("{{{joined}}}")
    }
}

/// Row and column counts derived from the ONE matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DerivedDimensions {
    /// Number of matrix rows (`rows_max`)
    pub rows: usize,
    /// Number of matrix columns (`cols_max`)
    pub cols: usize,
}

impl DerivedDimensions {
    /// Creates a new dimension pair.
    #[must_use]
    pub const fn new(rows: usize, cols: usize) -> Self {
        Self { rows, cols }
    }
}

impl std::fmt::Display for DerivedDimensions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.rows, self.cols)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_literal() {
        assert_eq!(PinAssignment::format_literal(&[4, 5]), "{4,5}");
        assert_eq!(PinAssignment::format_literal(&[13]), "{13}");
        assert_eq!(PinAssignment::format_literal(&[]), "{}");
    }

    #[test]
    fn test_dimensions_display() {
        assert_eq!(DerivedDimensions::new(6, 17).to_string(), "6x17");
    }
}
