//! Query command implementation.

use crate::table_file::{parse_keys, CliError, TableFile};
use decitab_core::IndexError;
use std::path::Path;

/// Runs the query command.
pub fn run(
    path: &Path,
    keys: &[String],
    all: bool,
    default: Option<&str>,
) -> Result<(), Box<dyn std::error::Error>> {
    for value in query(path, keys, all, default)? {
        println!("{value}");
    }
    Ok(())
}

/// Resolves `keys` against the table at `path`.
///
/// With `all`, returns every matching payload in sorted order; otherwise
/// the single matching payload, falling back to `default` when given.
pub fn query(
    path: &Path,
    keys: &[String],
    all: bool,
    default: Option<&str>,
) -> Result<Vec<String>, CliError> {
    let table = TableFile::load(path)?.build()?;
    let keys = parse_keys(table.schema(), keys)?;

    if all {
        let mut values: Vec<String> = table.values(&keys)?.into_iter().cloned().collect();
        if values.is_empty() {
            return Err(IndexError::NotFound.into());
        }
        values.sort();
        return Ok(values);
    }

    let value = match default {
        Some(default) => {
            let default = default.to_string();
            table.unique_value_or(&keys, &default)?.clone()
        }
        None => table.unique_value(&keys)?.clone(),
    };
    Ok(vec![value])
}
