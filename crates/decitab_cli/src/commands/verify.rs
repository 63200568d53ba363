//! Verify command implementation.

use crate::table_file::{CliError, TableFile};
use std::path::Path;
use tracing::debug;

/// Verification result.
#[derive(Debug)]
pub struct VerifyResult {
    /// Number of rows in the file.
    pub rows_checked: usize,
    /// The first violation, if any.
    pub error: Option<CliError>,
}

impl VerifyResult {
    fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

/// Runs the verify command.
pub fn run(path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    println!("Verifying table at {:?}", path);
    println!();

    let result = verify(path)?;
    println!("Rows checked: {}", result.rows_checked);

    println!();
    match &result.error {
        None => {
            println!("✓ Table verification passed");
            Ok(())
        }
        Some(err) => {
            println!("  {err}");
            println!("✗ Table verification failed");
            Err("Verification failed".into())
        }
    }
}

/// Builds the table at `path`, capturing the first build violation.
///
/// Read and parse failures are returned as errors; build failures are
/// reported in the result.
pub fn verify(path: &Path) -> Result<VerifyResult, CliError> {
    let file = TableFile::load(path)?;
    let rows_checked = file.rows.len();

    let error = match file.build() {
        Ok(table) => {
            debug!(stats = ?table.stats(), "Table verified");
            None
        }
        Err(err) => Some(err),
    };

    let result = VerifyResult {
        rows_checked,
        error,
    };
    debug!(ok = result.is_ok(), "Verification finished");
    Ok(result)
}
