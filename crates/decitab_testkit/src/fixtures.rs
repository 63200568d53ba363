//! Test fixtures and table helpers.
//!
//! Provides the reference rate table used across tests, plus temporary
//! table files for exercising the CLI.

use decitab_core::{
    ColumnKey, ColumnSpec, IndexConfig, Interval, KeyType, LookupTable, ResultPolicy, Row,
    TableSchema,
};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Schema with an exact text `region` column and a bounded integer
/// `amount` range column.
pub fn rate_schema(policy: ResultPolicy) -> TableSchema {
    TableSchema::new(
        vec![
            ColumnSpec::exact("region").with_type(KeyType::Text),
            ColumnSpec::range("amount").with_type(KeyType::Integer),
        ],
        policy,
    )
    .expect("rate schema is valid")
}

/// A row for [`rate_schema`].
pub fn rate_row<P>(region: &str, amount: Interval, payload: P) -> Row<P> {
    Row::new(vec![ColumnKey::exact(region), ColumnKey::Range(amount)], payload)
}

/// Rows of the reference scenario:
///
/// | region | amount    | payload |
/// |--------|-----------|---------|
/// | A      | [0, 10)   | P1      |
/// | A      | [10, 20)  | P2      |
/// | B      | [0, 100)  | P3      |
pub fn scenario_rows() -> Vec<Row<String>> {
    vec![
        rate_row("A", bounded(0, 10), "P1".to_string()),
        rate_row("A", bounded(10, 20), "P2".to_string()),
        rate_row("B", bounded(0, 100), "P3".to_string()),
    ]
}

/// The reference scenario built under a unique policy.
pub fn scenario_table() -> LookupTable<String> {
    LookupTable::build(rate_schema(ResultPolicy::Unique), scenario_rows())
        .expect("scenario table builds")
}

/// Shorthand for a bounded integer interval.
pub fn bounded(from: i64, to: i64) -> Interval {
    Interval::bounded(from, to).expect("bounds are ordered")
}

#[derive(Serialize)]
struct TableFileContents<'a, P: Serialize> {
    #[serde(flatten)]
    schema: &'a TableSchema,
    config: &'a IndexConfig,
    rows: &'a [Row<P>],
}

/// A table definition written to a temporary JSON file.
pub struct TableFileFixture {
    path: PathBuf,
    /// The temporary directory (kept alive to prevent cleanup).
    _temp_dir: TempDir,
}

impl TableFileFixture {
    /// Writes `schema` and `rows` as a table file.
    pub fn write<P: Serialize>(schema: &TableSchema, rows: &[Row<P>]) -> Self {
        Self::write_with_config(schema, &IndexConfig::default(), rows)
    }

    /// Writes a table file with an explicit configuration.
    pub fn write_with_config<P: Serialize>(
        schema: &TableSchema,
        config: &IndexConfig,
        rows: &[Row<P>],
    ) -> Self {
        let contents = TableFileContents {
            schema,
            config,
            rows,
        };
        let json = serde_json::to_string_pretty(&contents).expect("Failed to encode table");
        Self::write_raw(&json)
    }

    /// Writes raw file contents, for malformed-input tests.
    pub fn write_raw(contents: &str) -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let path = temp_dir.path().join("table.json");
        std::fs::write(&path, contents).expect("Failed to write table file");
        Self {
            path,
            _temp_dir: temp_dir,
        }
    }

    /// Path of the table file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// The reference scenario as a table file.
pub fn scenario_file() -> TableFileFixture {
    TableFileFixture::write(&rate_schema(ResultPolicy::Unique), &scenario_rows())
}
