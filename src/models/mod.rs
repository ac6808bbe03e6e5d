//! Data models shared by the extraction and patch stages.
//!
//! These types carry data between stages and hold no behaviour beyond
//! lookups and formatting.

pub mod matrix;
pub mod pins;

// Re-export all model types
pub use matrix::{MatrixName, MatrixSet};
pub use pins::{DerivedDimensions, PinAssignment};
