//! Structural statistics for built lookup tables.

use crate::index::{Payload, SearchStructure};
use serde::Serialize;
use std::fmt;

/// Counts of nodes and leaves in a lookup table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TableStats {
    /// Rows the table was built from.
    pub rows: usize,
    /// Discrete-key nodes.
    pub exact_nodes: usize,
    /// Interval nodes.
    pub range_nodes: usize,
    /// Intervals across all range nodes.
    pub intervals: usize,
    /// Exact nodes with a catch-all child.
    pub default_branches: usize,
    /// Single-payload leaves.
    pub unique_leaves: usize,
    /// Payload-set leaves.
    pub multi_leaves: usize,
    /// Distinct payloads in the table.
    pub payloads: usize,
    /// Levels from the root to the deepest leaf.
    pub max_depth: usize,
}

impl TableStats {
    pub(crate) fn collect<P: Payload>(root: Option<&SearchStructure<P>>, rows: usize) -> Self {
        let mut stats = Self {
            rows,
            ..Self::default()
        };
        if let Some(root) = root {
            stats.visit(root, 0);
            stats.payloads = root.values().len();
        }
        stats
    }

    fn visit<P: Payload>(&mut self, node: &SearchStructure<P>, depth: usize) {
        self.max_depth = self.max_depth.max(depth);
        match node {
            SearchStructure::Exact(exact) => {
                self.exact_nodes += 1;
                if exact.default_child().is_some() {
                    self.default_branches += 1;
                }
                for child in exact.children() {
                    self.visit(child, depth + 1);
                }
            }
            SearchStructure::Range(range) => {
                self.range_nodes += 1;
                self.intervals += range.len();
                for entry in range.entries() {
                    self.visit(entry.child(), depth + 1);
                }
            }
            SearchStructure::Unique(_) => self.unique_leaves += 1,
            SearchStructure::Multi(_) => self.multi_leaves += 1,
        }
    }
}

impl fmt::Display for TableStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Rows:              {}", self.rows)?;
        writeln!(f, "Exact nodes:       {}", self.exact_nodes)?;
        writeln!(f, "Range nodes:       {}", self.range_nodes)?;
        writeln!(f, "Intervals:         {}", self.intervals)?;
        writeln!(f, "Default branches:  {}", self.default_branches)?;
        writeln!(f, "Unique leaves:     {}", self.unique_leaves)?;
        writeln!(f, "Multi leaves:      {}", self.multi_leaves)?;
        writeln!(f, "Distinct payloads: {}", self.payloads)?;
        write!(f, "Depth:             {}", self.max_depth)
    }
}
