//! Index build configuration.

use serde::{Deserialize, Serialize};

/// Configuration for building lookup tables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexConfig {
    /// Whether row keys and query keys must match the declared column types.
    pub check_key_types: bool,

    /// Emit a warning when a build consumes more rows than this.
    pub large_table_warning: usize,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            check_key_types: true,
            large_table_warning: 100_000,
        }
    }
}

impl IndexConfig {
    /// Creates a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets whether key types are checked.
    #[must_use]
    pub const fn check_key_types(mut self, value: bool) -> Self {
        self.check_key_types = value;
        self
    }

    /// Sets the row count above which a build logs a warning.
    #[must_use]
    pub const fn large_table_warning(mut self, rows: usize) -> Self {
        self.large_table_warning = rows;
        self
    }
}
