//! Inspect command implementation.

use crate::table_file::{CliError, TableFile};
use decitab_core::{Matching, RangeKind, ResultPolicy, TableStats};
use serde::Serialize;
use std::path::Path;

/// Table inspection result.
#[derive(Debug, Serialize)]
pub struct InspectResult {
    /// Table file path.
    pub path: String,
    /// Result policy.
    pub policy: ResultPolicy,
    /// Column descriptions.
    pub columns: Vec<ColumnInfo>,
    /// Structural statistics.
    pub stats: TableStats,
}

/// Description of a single column.
#[derive(Debug, Serialize)]
pub struct ColumnInfo {
    /// Column name.
    pub name: String,
    /// Declared key type.
    pub key_type: String,
    /// Matching strategy.
    pub matching: String,
}

/// Runs the inspect command.
pub fn run(path: &Path, format: &str) -> Result<(), Box<dyn std::error::Error>> {
    let result = inspect(path)?;

    match format {
        "json" => {
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        _ => {
            print_text_output(&result);
        }
    }

    Ok(())
}

/// Builds the table at `path` and collects its description.
pub fn inspect(path: &Path) -> Result<InspectResult, CliError> {
    let table = TableFile::load(path)?.build()?;
    let schema = table.schema();

    let columns = schema
        .columns
        .iter()
        .map(|column| ColumnInfo {
            name: column.name.clone(),
            key_type: column.key_type.to_string(),
            matching: describe_matching(column.matching).to_string(),
        })
        .collect();

    Ok(InspectResult {
        path: path.display().to_string(),
        policy: schema.policy,
        columns,
        stats: table.stats(),
    })
}

fn describe_matching(matching: Matching) -> &'static str {
    match matching {
        Matching::Exact => "exact",
        Matching::Range(RangeKind::Bounded) => "range",
        Matching::Range(RangeKind::OpenEnded) => "open range",
    }
}

fn print_text_output(result: &InspectResult) {
    println!("decitab Table Inspection");
    println!("========================");
    println!();
    println!("Path:   {}", result.path);
    println!("Policy: {:?}", result.policy);
    println!();
    println!("Columns:");
    for (idx, column) in result.columns.iter().enumerate() {
        println!(
            "  [{}] {} ({}, {})",
            idx, column.name, column.key_type, column.matching
        );
    }
    println!();
    println!("{}", result.stats);
}
