//! Table schema: column descriptors, result policy and rows.

use crate::error::{IndexError, IndexResult};
use crate::types::{ColumnKey, Interval, KeyType, KeyValue};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// How far a range column's intervals may extend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RangeKind {
    /// Both bounds are required.
    Bounded,
    /// Either bound may be absent.
    OpenEnded,
}

/// Matching strategy of a key column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Matching {
    /// Discrete value, matched by equality.
    Exact,
    /// Interval, matched by containment.
    Range(RangeKind),
}

/// Descriptor of one key column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnSpec {
    /// Column name, used in diagnostics.
    pub name: String,
    /// Declared key type.
    #[serde(default, rename = "type")]
    pub key_type: KeyType,
    /// Matching strategy.
    #[serde(rename = "match")]
    pub matching: Matching,
}

impl ColumnSpec {
    /// Creates an exact-match column.
    pub fn exact(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            key_type: KeyType::Any,
            matching: Matching::Exact,
        }
    }

    /// Creates a range column requiring both bounds.
    pub fn range(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            key_type: KeyType::Any,
            matching: Matching::Range(RangeKind::Bounded),
        }
    }

    /// Creates a range column allowing open bounds.
    pub fn open_range(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            key_type: KeyType::Any,
            matching: Matching::Range(RangeKind::OpenEnded),
        }
    }

    /// Sets the declared key type.
    #[must_use]
    pub fn with_type(mut self, key_type: KeyType) -> Self {
        self.key_type = key_type;
        self
    }
}

/// What a fully specified key path resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResultPolicy {
    /// Exactly one payload; duplicate key paths fail the build.
    #[default]
    Unique,
    /// Any number of payloads; duplicate key paths accumulate.
    Multi,
}

/// Ordered column descriptors plus the table's result policy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableSchema {
    /// Key columns in lookup order.
    pub columns: Vec<ColumnSpec>,
    /// Result policy for the last column.
    #[serde(default)]
    pub policy: ResultPolicy,
}

impl TableSchema {
    /// Creates a schema after checking that column names are distinct.
    pub fn new(columns: Vec<ColumnSpec>, policy: ResultPolicy) -> IndexResult<Self> {
        let schema = Self { columns, policy };
        schema.validate()?;
        Ok(schema)
    }

    /// Checks the schema itself.
    pub fn validate(&self) -> IndexResult<()> {
        let mut seen = HashSet::new();
        for column in &self.columns {
            if column.name.is_empty() {
                return Err(IndexError::invalid_schema("column name must not be empty"));
            }
            if !seen.insert(column.name.as_str()) {
                return Err(IndexError::invalid_schema(format!(
                    "duplicate column name: {}",
                    column.name
                )));
            }
        }
        Ok(())
    }

    /// Number of key columns.
    #[must_use]
    pub fn arity(&self) -> usize {
        self.columns.len()
    }

    /// Checks a row's keys against the column descriptors.
    ///
    /// With `check_types` unset, key values are not compared against the
    /// declared column types.
    pub fn validate_row(&self, keys: &[ColumnKey], check_types: bool) -> IndexResult<()> {
        if keys.len() != self.columns.len() {
            return Err(IndexError::invalid_key(
                keys.len().min(self.columns.len()),
                format!(
                    "row has {} keys, schema has {} columns",
                    keys.len(),
                    self.columns.len()
                ),
            ));
        }

        for (position, (column, key)) in self.columns.iter().zip(keys).enumerate() {
            match (column.matching, key) {
                (Matching::Exact, ColumnKey::Exact(value)) => {
                    check_type(position, column, value, check_types)?;
                }
                (Matching::Exact, ColumnKey::Any) => {}
                (Matching::Exact, ColumnKey::Range(interval)) => {
                    return Err(IndexError::invalid_key(
                        position,
                        format!("column {} matches exactly, got range {interval}", column.name),
                    ));
                }
                (Matching::Range(kind), ColumnKey::Range(interval)) => {
                    check_interval(position, column, kind, interval, check_types)?;
                }
                (Matching::Range(RangeKind::OpenEnded), ColumnKey::Any) => {}
                (Matching::Range(RangeKind::Bounded), ColumnKey::Any) => {
                    return Err(IndexError::invalid_key(
                        position,
                        format!("column {} requires bounded ranges, got *", column.name),
                    ));
                }
                (Matching::Range(_), ColumnKey::Exact(value)) => {
                    return Err(IndexError::invalid_key(
                        position,
                        format!("column {} matches ranges, got value {value}", column.name),
                    ));
                }
            }
        }
        Ok(())
    }

    /// Checks a query tuple against the column descriptors.
    pub fn validate_query(&self, keys: &[KeyValue], check_types: bool) -> IndexResult<()> {
        if keys.len() != self.columns.len() {
            return Err(IndexError::invalid_query(format!(
                "query has {} keys, schema has {} columns",
                keys.len(),
                self.columns.len()
            )));
        }
        if check_types {
            for (column, key) in self.columns.iter().zip(keys) {
                if !column.key_type.accepts(key) {
                    return Err(IndexError::invalid_query(format!(
                        "column {} expects {}, got {key}",
                        column.name, column.key_type
                    )));
                }
            }
        }
        Ok(())
    }
}

fn check_type(
    position: usize,
    column: &ColumnSpec,
    value: &KeyValue,
    check_types: bool,
) -> IndexResult<()> {
    if check_types && !column.key_type.accepts(value) {
        return Err(IndexError::invalid_key(
            position,
            format!(
                "column {} expects {}, got {value}",
                column.name, column.key_type
            ),
        ));
    }
    Ok(())
}

fn check_interval(
    position: usize,
    column: &ColumnSpec,
    kind: RangeKind,
    interval: &Interval,
    check_types: bool,
) -> IndexResult<()> {
    if interval.is_empty() {
        return Err(IndexError::invalid_key(
            position,
            format!("column {}: empty interval {interval}", column.name),
        ));
    }
    if kind == RangeKind::Bounded && !interval.is_bounded() {
        return Err(IndexError::invalid_key(
            position,
            format!(
                "column {} requires bounded ranges, got {interval}",
                column.name
            ),
        ));
    }
    for bound in [interval.lower(), interval.upper()].into_iter().flatten() {
        check_type(position, column, bound, check_types)?;
    }
    Ok(())
}

/// One source table entry: a key per column plus its payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Row<P> {
    /// Keys in column order.
    pub keys: Vec<ColumnKey>,
    /// Payload, absent when the source entry has none.
    #[serde(default)]
    pub payload: Option<P>,
}

impl<P> Row<P> {
    /// Creates a row with a payload.
    pub fn new(keys: Vec<ColumnKey>, payload: P) -> Self {
        Self {
            keys,
            payload: Some(payload),
        }
    }

    /// Creates a row without a payload.
    pub fn without_payload(keys: Vec<ColumnKey>) -> Self {
        Self {
            keys,
            payload: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn schema() -> TableSchema {
        TableSchema::new(
            vec![
                ColumnSpec::exact("region").with_type(KeyType::Text),
                ColumnSpec::range("amount").with_type(KeyType::Integer),
            ],
            ResultPolicy::Unique,
        )
        .unwrap()
    }

    #[test]
    fn duplicate_column_names_rejected() {
        let result = TableSchema::new(
            vec![ColumnSpec::exact("a"), ColumnSpec::range("a")],
            ResultPolicy::Multi,
        );
        assert!(matches!(result, Err(IndexError::InvalidSchema { .. })));
    }

    #[test]
    fn valid_row_accepted() {
        let keys = vec![ColumnKey::exact("A"), ColumnKey::range(0, 10).unwrap()];
        schema().validate_row(&keys, true).unwrap();
    }

    #[test]
    fn arity_mismatch_rejected() {
        let keys = vec![ColumnKey::exact("A")];
        let err = schema().validate_row(&keys, true).unwrap_err();
        assert!(matches!(err, IndexError::InvalidKey { .. }));
    }

    #[test]
    fn matching_mismatch_rejected() {
        let keys = vec![ColumnKey::range(0, 1).unwrap(), ColumnKey::range(0, 10).unwrap()];
        let err = schema().validate_row(&keys, true).unwrap_err();
        assert!(matches!(err, IndexError::InvalidKey { column: 0, .. }));

        let keys = vec![ColumnKey::exact("A"), ColumnKey::exact(5)];
        let err = schema().validate_row(&keys, true).unwrap_err();
        assert!(matches!(err, IndexError::InvalidKey { column: 1, .. }));
    }

    #[test]
    fn open_interval_needs_open_ended_column() {
        let keys = vec![ColumnKey::exact("A"), ColumnKey::Range(Interval::at_least(10))];
        assert!(schema().validate_row(&keys, true).is_err());

        let open = TableSchema::new(
            vec![ColumnSpec::exact("region"), ColumnSpec::open_range("amount")],
            ResultPolicy::Unique,
        )
        .unwrap();
        open.validate_row(&keys, true).unwrap();
        open.validate_row(&[ColumnKey::Any, ColumnKey::Any], true)
            .unwrap();
    }

    #[test]
    fn type_check_can_be_disabled() {
        let keys = vec![ColumnKey::exact(1), ColumnKey::range(0, 10).unwrap()];
        assert!(schema().validate_row(&keys, true).is_err());
        schema().validate_row(&keys, false).unwrap();
    }

    #[test]
    fn query_validation() {
        let schema = schema();
        schema
            .validate_query(&[KeyValue::from("A"), KeyValue::from(5)], true)
            .unwrap();
        assert!(matches!(
            schema.validate_query(&[KeyValue::from("A")], true),
            Err(IndexError::InvalidQuery { .. })
        ));
        assert!(matches!(
            schema.validate_query(&[KeyValue::from(1), KeyValue::from(5)], true),
            Err(IndexError::InvalidQuery { .. })
        ));
    }

    #[test]
    fn schema_from_json() {
        let schema: TableSchema = serde_json::from_str(
            r#"{
                "columns": [
                    {"name": "region", "type": "text", "match": "exact"},
                    {"name": "amount", "type": "integer", "match": {"range": "open_ended"}}
                ],
                "policy": "multi"
            }"#,
        )
        .unwrap();
        assert_eq!(schema.policy, ResultPolicy::Multi);
        assert_eq!(
            schema.columns[1].matching,
            Matching::Range(RangeKind::OpenEnded)
        );
    }
}
