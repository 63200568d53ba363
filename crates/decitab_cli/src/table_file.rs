//! JSON table files and command-line key parsing.

use decitab_core::{
    ColumnSpec, IndexConfig, IndexError, KeyType, KeyValue, LookupTable, Row, TableSchema,
};
use serde::Deserialize;
use std::path::Path;
use thiserror::Error;
use tracing::debug;

/// Errors raised by CLI commands.
#[derive(Debug, Error)]
pub enum CliError {
    /// The table file could not be read.
    #[error("failed to read {path}: {source}")]
    Read {
        /// File path.
        path: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The table file is not a valid table definition.
    #[error("failed to parse {path}: {source}")]
    Parse {
        /// File path.
        path: String,
        /// Underlying JSON error.
        #[source]
        source: serde_json::Error,
    },

    /// Building or querying the table failed.
    #[error(transparent)]
    Index(#[from] IndexError),

    /// The number of `--key` values does not match the schema.
    #[error("expected {expected} keys, got {actual}")]
    KeyCount {
        /// Columns in the schema.
        expected: usize,
        /// Keys given.
        actual: usize,
    },

    /// A `--key` value does not parse as its column's type.
    #[error("invalid key {value:?} for column '{column}': expected {expected}")]
    InvalidKey {
        /// Column name.
        column: String,
        /// Raw value.
        value: String,
        /// Declared column type.
        expected: KeyType,
    },
}

/// A table definition: schema, optional build configuration and rows.
#[derive(Debug, Deserialize)]
pub struct TableFile {
    /// Columns and result policy.
    #[serde(flatten)]
    pub schema: TableSchema,
    /// Build configuration.
    #[serde(default)]
    pub config: IndexConfig,
    /// Source rows.
    pub rows: Vec<Row<String>>,
}

impl TableFile {
    /// Reads and parses a table file.
    pub fn load(path: &Path) -> Result<Self, CliError> {
        let shown = path.display().to_string();
        let contents = std::fs::read_to_string(path).map_err(|source| CliError::Read {
            path: shown.clone(),
            source,
        })?;
        let file: Self = serde_json::from_str(&contents).map_err(|source| CliError::Parse {
            path: shown.clone(),
            source,
        })?;
        debug!(path = %shown, rows = file.rows.len(), "Loaded table file");
        Ok(file)
    }

    /// Builds the lookup table.
    pub fn build(self) -> Result<LookupTable<String>, CliError> {
        Ok(LookupTable::build_with_config(
            self.schema,
            self.config,
            self.rows,
        )?)
    }
}

/// Parses raw `--key` values according to the schema's column types.
pub fn parse_keys(schema: &TableSchema, raw: &[String]) -> Result<Vec<KeyValue>, CliError> {
    if raw.len() != schema.arity() {
        return Err(CliError::KeyCount {
            expected: schema.arity(),
            actual: raw.len(),
        });
    }
    schema
        .columns
        .iter()
        .zip(raw)
        .map(|(column, value)| parse_key(column, value))
        .collect()
}

fn parse_key(column: &ColumnSpec, value: &str) -> Result<KeyValue, CliError> {
    let invalid = || CliError::InvalidKey {
        column: column.name.clone(),
        value: value.to_string(),
        expected: column.key_type,
    };
    match column.key_type {
        KeyType::Integer => value.parse::<i64>().map(KeyValue::from).map_err(|_| invalid()),
        KeyType::Bool => value.parse::<bool>().map(KeyValue::from).map_err(|_| invalid()),
        KeyType::Text => Ok(KeyValue::from(value)),
        KeyType::Any => Ok(value
            .parse::<i64>()
            .map(KeyValue::from)
            .or_else(|_| value.parse::<bool>().map(KeyValue::from))
            .unwrap_or_else(|_| KeyValue::from(value))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use decitab_core::ResultPolicy;
    use decitab_testkit::{scenario_file, TableFileFixture};

    fn keys(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| (*v).to_string()).collect()
    }

    #[test]
    fn loads_scenario_file() {
        let fixture = scenario_file();
        let file = TableFile::load(fixture.path()).unwrap();
        assert_eq!(file.schema.arity(), 2);
        assert_eq!(file.rows.len(), 3);

        let table = file.build().unwrap();
        let value = table
            .unique_value(&[KeyValue::from("A"), KeyValue::from(15)])
            .unwrap();
        assert_eq!(value, "P2");
    }

    #[test]
    fn missing_file_is_read_error() {
        let err = TableFile::load(Path::new("/nonexistent/table.json")).unwrap_err();
        assert!(matches!(err, CliError::Read { .. }));
        assert!(err.to_string().contains("/nonexistent/table.json"));
    }

    #[test]
    fn load_logs_path_at_debug_level() {
        let fixture = scenario_file();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_test_writer()
            .finish();

        let file = tracing::subscriber::with_default(subscriber, || {
            TableFile::load(fixture.path())
        })
        .unwrap();
        assert_eq!(file.rows.len(), 3);
    }

    #[test]
    fn malformed_file_is_parse_error() {
        let fixture = TableFileFixture::write_raw("{ \"columns\": [");
        let err = TableFile::load(fixture.path()).unwrap_err();
        assert!(matches!(err, CliError::Parse { .. }));
    }

    #[test]
    fn hand_written_file_with_catch_all() {
        let fixture = TableFileFixture::write_raw(
            r#"{
                "columns": [
                    { "name": "product", "type": "text", "match": "exact" },
                    { "name": "age", "type": "integer", "match": { "range": "open_ended" } }
                ],
                "policy": "unique",
                "rows": [
                    { "keys": ["life", { "to": 30 }], "payload": "young" },
                    { "keys": ["life", { "from": 30 }], "payload": "old" },
                    { "keys": [null, null], "payload": "other" }
                ]
            }"#,
        );
        let table = TableFile::load(fixture.path()).unwrap().build().unwrap();
        let rate = |product: &str, age: i64| {
            table
                .unique_value(&[KeyValue::from(product), KeyValue::from(age)])
                .cloned()
        };
        assert_eq!(rate("life", 29).unwrap(), "young");
        assert_eq!(rate("life", 30).unwrap(), "old");
        assert_eq!(rate("car", 5).unwrap(), "other");
    }

    #[test]
    fn parses_keys_by_column_type() {
        let schema = TableSchema::new(
            vec![
                ColumnSpec::exact("name").with_type(KeyType::Text),
                ColumnSpec::exact("member").with_type(KeyType::Bool),
                ColumnSpec::range("age").with_type(KeyType::Integer),
                ColumnSpec::exact("code"),
            ],
            ResultPolicy::Unique,
        )
        .unwrap();

        let parsed = parse_keys(&schema, &keys(&["42", "true", "42", "7"])).unwrap();
        assert_eq!(
            parsed,
            vec![
                KeyValue::from("42"),
                KeyValue::from(true),
                KeyValue::from(42),
                KeyValue::from(7),
            ]
        );

        let err = parse_keys(&schema, &keys(&["a", "yes", "1", "x"])).unwrap_err();
        assert!(matches!(err, CliError::InvalidKey { ref column, .. } if column == "member"));

        let err = parse_keys(&schema, &keys(&["a"])).unwrap_err();
        assert!(matches!(
            err,
            CliError::KeyCount {
                expected: 4,
                actual: 1
            }
        ));
    }
}
