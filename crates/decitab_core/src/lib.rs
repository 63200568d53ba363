//! # decitab Core
//!
//! Multi-key lookup index for decision and rate tables.
//!
//! This crate provides:
//! - Key model: discrete values, half-open intervals, catch-all keys
//! - Table schema: column descriptors and result policy
//! - Recursive search structures with exact and range levels
//! - Pairwise merging with build-time uniqueness and overlap checks
//! - An all-or-nothing builder and an atomically published table handle
//!
//! ## Example
//!
//! ```rust
//! use decitab_core::{ColumnKey, ColumnSpec, KeyValue, LookupTable, ResultPolicy, Row, TableSchema};
//!
//! let schema = TableSchema::new(
//!     vec![ColumnSpec::exact("region"), ColumnSpec::range("amount")],
//!     ResultPolicy::Unique,
//! )?;
//! let table = LookupTable::build(
//!     schema,
//!     vec![
//!         Row::new(vec![ColumnKey::exact("A"), ColumnKey::range(0, 10)?], "P1"),
//!         Row::new(vec![ColumnKey::exact("A"), ColumnKey::range(10, 20)?], "P2"),
//!     ],
//! )?;
//!
//! let key = [KeyValue::from("A"), KeyValue::from(10)];
//! assert_eq!(table.unique_value(&key)?, &"P2");
//! # Ok::<(), decitab_core::IndexError>(())
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod builder;
mod config;
mod error;
pub mod index;
mod schema;
mod stats;
mod table;
mod types;

pub use builder::IndexBuilder;
pub use config::IndexConfig;
pub use error::{IndexError, IndexResult};
pub use index::{
    ExactNode, KeyPath, Lookup, MultiResult, Payload, RangeEntry, RangeNode, SearchStructure,
    UniqueResult,
};
pub use schema::{ColumnSpec, Matching, RangeKind, ResultPolicy, Row, TableSchema};
pub use stats::TableStats;
pub use table::{LookupTable, PublishedTable};
pub use types::{ColumnKey, Interval, KeyType, KeyValue};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
