//! Parsing of matrix generator output.
//!
//! This module pulls named matrix literals and Teensy pin lists out of the
//! generator's free-form text and derives the sketch dimensions from them.

pub mod braces;
pub mod dimensions;
pub mod extractor;

// Re-export commonly used functions
pub use dimensions::infer_dimensions;
pub use extractor::{extract, Extraction};
