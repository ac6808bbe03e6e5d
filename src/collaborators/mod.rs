//! External programs the pipeline hands work to.
//!
//! The generator produces the text the extractor reads; the editor lets the
//! operator review the key list first. Both are traits so the pipeline can be
//! driven without real processes.

pub mod editor;
pub mod generator;

pub use editor::{Editor, ExternalEditor};
pub use generator::{MatrixGenerator, SavedOutput, ScriptedGenerator};
