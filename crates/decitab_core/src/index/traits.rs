//! Payload bound and key path diagnostics.

use std::fmt;
use std::hash::Hash;

/// A value stored at the leaves of a lookup table.
///
/// Payloads must be:
/// - Comparable and hashable (leaves deduplicate by equality)
/// - Debug-printable (conflicts name both payloads)
/// - Shareable across threads (published tables are read concurrently)
pub trait Payload: Clone + Eq + Hash + fmt::Debug + Send + Sync + 'static {}

impl<T> Payload for T where T: Clone + Eq + Hash + fmt::Debug + Send + Sync + 'static {}

/// Key path from the root to the position being merged.
///
/// Only used to label build errors. When created with column names each
/// segment is rendered as `column=key`.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct KeyPath {
    columns: Vec<String>,
    segments: Vec<String>,
}

impl KeyPath {
    /// Creates an empty (root) path without column labels.
    pub fn root() -> Self {
        Self::default()
    }

    /// Creates an empty path that labels segments with column names.
    pub fn for_columns(columns: Vec<String>) -> Self {
        Self {
            columns,
            segments: Vec::new(),
        }
    }

    /// Appends a segment.
    pub fn push(&mut self, segment: impl fmt::Display) {
        let rendered = match self.columns.get(self.segments.len()) {
            Some(name) => format!("{name}={segment}"),
            None => segment.to_string(),
        };
        self.segments.push(rendered);
    }

    /// Removes the last segment.
    pub fn pop(&mut self) {
        self.segments.pop();
    }

    /// Depth of the path.
    pub fn depth(&self) -> usize {
        self.segments.len()
    }
}

impl fmt::Display for KeyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.segments.is_empty() {
            return f.write_str("<root>");
        }
        f.write_str(&self.segments.join(" / "))
    }
}
