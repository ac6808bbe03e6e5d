//! Dependency checking and environment validation.
//!
//! Reports whether the toolchain, generator and editor are installed and
//! whether the configured sketch, generator script and key list exist.

pub mod checker;
pub mod formatter;

pub use checker::{DependencyChecker, DependencyKind, DependencyStatus, ToolStatus};
pub use formatter::{DoctorFormatter, OutputFormat, Platform};
