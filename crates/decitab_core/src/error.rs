//! Error types for decitab core.

use thiserror::Error;

/// Result type for index operations.
pub type IndexResult<T> = Result<T, IndexError>;

/// Errors raised while building or querying a lookup table.
///
/// Build-time variants carry an optional row position. The position is
/// filled in by [`IndexBuilder`](crate::IndexBuilder) once the error
/// surfaces at the row being inserted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IndexError {
    /// Two rows resolve to the same full key path under a unique policy.
    #[error(
        "unique key violation at {path}: {existing} (row {}) conflicts with {incoming} (row {})",
        fmt_row(.existing_row),
        fmt_row(.incoming_row)
    )]
    UniqueKeyViolation {
        /// Key path of the conflicting leaf.
        path: String,
        /// Debug rendering of the payload already stored.
        existing: String,
        /// Debug rendering of the payload being inserted.
        incoming: String,
        /// Row that produced the stored payload.
        existing_row: Option<usize>,
        /// Row that produced the incoming payload.
        incoming_row: Option<usize>,
    },

    /// An interval partially overlaps another interval at the same position.
    #[error("overlapping range at {path} (row {}): {incoming} overlaps {existing}", fmt_row(.row))]
    OverlappingRange {
        /// Key path of the range node.
        path: String,
        /// Interval already present.
        existing: String,
        /// Interval being inserted.
        incoming: String,
        /// Row being inserted.
        row: Option<usize>,
    },

    /// A position resolves to structures of different kinds.
    #[error("inconsistent structure at {path} (row {}): cannot merge {incoming} into {existing}", fmt_row(.row))]
    InconsistentLeafKind {
        /// Key path of the mismatch.
        path: String,
        /// Kind of the structure already present.
        existing: &'static str,
        /// Kind of the structure being merged in.
        incoming: &'static str,
        /// Row being inserted.
        row: Option<usize>,
    },

    /// A row supplies no payload where one is required.
    #[error("invalid result (row {}): {message}", fmt_row(.row))]
    InvalidResult {
        /// Description of the problem.
        message: String,
        /// Row being inserted.
        row: Option<usize>,
    },

    /// A row key does not fit its column.
    #[error("invalid key in column {column} (row {}): {message}", fmt_row(.row))]
    InvalidKey {
        /// Zero-based column position.
        column: usize,
        /// Description of the problem.
        message: String,
        /// Row being inserted.
        row: Option<usize>,
    },

    /// The table schema itself is malformed.
    #[error("invalid schema: {message}")]
    InvalidSchema {
        /// Description of the problem.
        message: String,
    },

    /// More than one payload matched where exactly one was requested.
    #[error("ambiguous result: {count} payloads match")]
    AmbiguousResult {
        /// Number of distinct matching payloads.
        count: usize,
    },

    /// No payload matched.
    #[error("no matching payload")]
    NotFound,

    /// A query tuple does not fit the schema.
    #[error("invalid query: {message}")]
    InvalidQuery {
        /// Description of the problem.
        message: String,
    },
}

fn fmt_row(row: &Option<usize>) -> String {
    match row {
        Some(row) => row.to_string(),
        None => "?".to_string(),
    }
}

impl IndexError {
    /// Creates an overlapping range error.
    pub fn overlapping_range(
        path: impl Into<String>,
        existing: impl Into<String>,
        incoming: impl Into<String>,
    ) -> Self {
        Self::OverlappingRange {
            path: path.into(),
            existing: existing.into(),
            incoming: incoming.into(),
            row: None,
        }
    }

    /// Creates an inconsistent kind error.
    pub fn inconsistent_kind(
        path: impl Into<String>,
        existing: &'static str,
        incoming: &'static str,
    ) -> Self {
        Self::InconsistentLeafKind {
            path: path.into(),
            existing,
            incoming,
            row: None,
        }
    }

    /// Creates an invalid result error.
    pub fn invalid_result(message: impl Into<String>) -> Self {
        Self::InvalidResult {
            message: message.into(),
            row: None,
        }
    }

    /// Creates an invalid key error for a column.
    pub fn invalid_key(column: usize, message: impl Into<String>) -> Self {
        Self::InvalidKey {
            column,
            message: message.into(),
            row: None,
        }
    }

    /// Creates an invalid schema error.
    pub fn invalid_schema(message: impl Into<String>) -> Self {
        Self::InvalidSchema {
            message: message.into(),
        }
    }

    /// Creates an invalid query error.
    pub fn invalid_query(message: impl Into<String>) -> Self {
        Self::InvalidQuery {
            message: message.into(),
        }
    }

    /// Attaches a row position to a build error that does not have one yet.
    ///
    /// For unique key violations the position is the incoming row.
    #[must_use]
    pub fn at_row(mut self, position: usize) -> Self {
        match &mut self {
            Self::UniqueKeyViolation { incoming_row, .. } => {
                incoming_row.get_or_insert(position);
            }
            Self::OverlappingRange { row, .. }
            | Self::InconsistentLeafKind { row, .. }
            | Self::InvalidResult { row, .. }
            | Self::InvalidKey { row, .. } => {
                row.get_or_insert(position);
            }
            _ => {}
        }
        self
    }

    /// Returns true for errors that abort a build.
    pub fn is_build_error(&self) -> bool {
        matches!(
            self,
            Self::UniqueKeyViolation { .. }
                | Self::OverlappingRange { .. }
                | Self::InconsistentLeafKind { .. }
                | Self::InvalidResult { .. }
                | Self::InvalidKey { .. }
                | Self::InvalidSchema { .. }
        )
    }

    /// Returns true for per-call query errors.
    pub fn is_query_error(&self) -> bool {
        matches!(
            self,
            Self::AmbiguousResult { .. } | Self::NotFound | Self::InvalidQuery { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn at_row_fills_missing_position_only() {
        let err = IndexError::invalid_key(1, "bad").at_row(4).at_row(9);
        assert_eq!(
            err,
            IndexError::InvalidKey {
                column: 1,
                message: "bad".into(),
                row: Some(4),
            }
        );
    }

    #[test]
    fn unique_violation_display_names_both_rows() {
        let err = IndexError::UniqueKeyViolation {
            path: "region=A".into(),
            existing: "\"P1\"".into(),
            incoming: "\"P2\"".into(),
            existing_row: Some(0),
            incoming_row: None,
        }
        .at_row(3);

        let msg = err.to_string();
        assert!(msg.contains("row 0"));
        assert!(msg.contains("row 3"));
        assert!(msg.contains("region=A"));
    }

    #[test]
    fn classification() {
        assert!(IndexError::NotFound.is_query_error());
        assert!(!IndexError::NotFound.is_build_error());
        assert!(IndexError::invalid_schema("x").is_build_error());
        assert!(IndexError::AmbiguousResult { count: 2 }.is_query_error());
    }
}
