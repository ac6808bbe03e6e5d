//! Firmware sketch validation, patching and flashing.
//!
//! This module checks extracted generator data for consistency, rewrites the
//! sketch declarations in place, and drives `arduino-cli` to compile and
//! upload the result.

pub mod anchors;
pub mod builder;
pub mod patcher;
pub mod validator;

// Re-export firmware types
pub use anchors::{Anchor, AnchorKind, PatchTargets};
pub use builder::{ArduinoCli, FirmwareToolchain};
pub use patcher::{AnchorChange, DocumentPatcher, PatchOutcome};
pub use validator::{ConsistencyValidator, ValidationReport, ValidationWarning, WarningKind};
