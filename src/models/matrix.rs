//! Named matrix blocks captured from generator output.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The fixed vocabulary of matrix blocks the firmware sketch consumes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum MatrixName {
    /// Key-state matrix (all zeros), also the source of the sketch dimensions
    One,
    /// Normal keycodes
    Key,
    /// Modifier layer keycodes
    Modifier,
    /// Function/media layer keycodes
    Fn,
}

impl MatrixName {
    /// Every required block, in the order they are checked.
    pub const ALL: [Self; 4] = [Self::One, Self::Key, Self::Modifier, Self::Fn];

    /// Header token used by the generator (e.g. `-----KEY-----`).
    #[must_use]
    pub const fn header(self) -> &'static str {
        match self {
            Self::One => "ONE",
            Self::Key => "KEY",
            Self::Modifier => "MODIFIER",
            Self::Fn => "FN",
        }
    }
}

impl std::fmt::Display for MatrixName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.header())
    }
}

impl std::str::FromStr for MatrixName {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|name| name.header() == s)
            .ok_or_else(|| format!("Unknown matrix block '{s}'"))
    }
}

/// Matrix literals keyed by header token.
///
/// Literals are kept as raw text, brace to brace, with their original line
/// structure. Headers outside the fixed vocabulary are retained so they can be
/// listed, but nothing downstream consumes them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MatrixSet {
    blocks: BTreeMap<String, String>,
}

impl MatrixSet {
    /// Creates an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a literal under `header`, replacing any earlier block with the same header.
    pub fn insert(&mut self, header: impl Into<String>, literal: impl Into<String>) {
        self.blocks.insert(header.into(), literal.into());
    }

    /// Literal for one of the required blocks.
    #[must_use]
    pub fn get(&self, name: MatrixName) -> Option<&str> {
        self.get_raw(name.header())
    }

    /// Literal for an arbitrary header token.
    #[must_use]
    pub fn get_raw(&self, header: &str) -> Option<&str> {
        self.blocks.get(header).map(String::as_str)
    }

    /// Whether a required block is present.
    #[must_use]
    pub fn contains(&self, name: MatrixName) -> bool {
        self.blocks.contains_key(name.header())
    }

    /// Required blocks that are absent, in check order.
    #[must_use]
    pub fn missing(&self) -> Vec<MatrixName> {
        MatrixName::ALL
            .into_iter()
            .filter(|name| !self.contains(*name))
            .collect()
    }

    /// Iterates `(header, literal)` pairs in header order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.blocks.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Number of captured blocks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    /// Returns true if nothing was captured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }
}
