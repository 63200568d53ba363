//! Lookup table construction.
//!
//! Rows are consumed once, in order. Each row becomes a single-path chain
//! (one node per column, ending in a leaf) which is merged into the tree
//! built so far. Any error aborts the build: the builder is poisoned and
//! [`IndexBuilder::build`] returns the first error.

use crate::config::IndexConfig;
use crate::error::{IndexError, IndexResult};
use crate::index::{ExactNode, KeyPath, Payload, RangeNode, SearchStructure, UniqueResult};
use crate::schema::{Matching, ResultPolicy, Row, TableSchema};
use crate::table::LookupTable;
use crate::types::{ColumnKey, Interval};
use tracing::{debug, warn};

/// Builds a [`LookupTable`] from rows.
///
/// # Example
///
/// ```rust
/// use decitab_core::{
///     ColumnKey, ColumnSpec, IndexBuilder, KeyValue, ResultPolicy, Row, TableSchema,
/// };
///
/// let schema = TableSchema::new(
///     vec![ColumnSpec::exact("region"), ColumnSpec::range("amount")],
///     ResultPolicy::Unique,
/// )?;
///
/// let mut builder = IndexBuilder::new(schema)?;
/// builder.push(Row::new(
///     vec![ColumnKey::exact("A"), ColumnKey::range(0, 10)?],
///     "P1",
/// ))?;
/// let table = builder.build()?;
///
/// let key = [KeyValue::from("A"), KeyValue::from(5)];
/// assert_eq!(table.unique_value(&key)?, &"P1");
/// # Ok::<(), decitab_core::IndexError>(())
/// ```
#[derive(Debug)]
pub struct IndexBuilder<P: Payload> {
    schema: TableSchema,
    config: IndexConfig,
    root: Option<SearchStructure<P>>,
    rows: usize,
    poisoned: Option<IndexError>,
}

impl<P: Payload> IndexBuilder<P> {
    /// Creates a builder with the default configuration.
    pub fn new(schema: TableSchema) -> IndexResult<Self> {
        Self::with_config(schema, IndexConfig::default())
    }

    /// Creates a builder with an explicit configuration.
    pub fn with_config(schema: TableSchema, config: IndexConfig) -> IndexResult<Self> {
        schema.validate()?;
        debug!(
            columns = schema.arity(),
            policy = ?schema.policy,
            "starting lookup table build"
        );
        Ok(Self {
            schema,
            config,
            root: None,
            rows: 0,
            poisoned: None,
        })
    }

    /// The schema rows are checked against.
    pub fn schema(&self) -> &TableSchema {
        &self.schema
    }

    /// Number of rows accepted so far.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Inserts one row.
    ///
    /// On error the builder stays poisoned: later pushes and
    /// [`build`](Self::build) return the same error.
    pub fn push(&mut self, row: Row<P>) -> IndexResult<()> {
        if let Some(err) = &self.poisoned {
            return Err(err.clone());
        }

        let position = self.rows;
        match self.insert(row, position) {
            Ok(()) => {
                self.rows += 1;
                Ok(())
            }
            Err(err) => {
                let err = err.at_row(position);
                debug!("rejected row {}: {}", position, err);
                self.root = None;
                self.poisoned = Some(err.clone());
                Err(err)
            }
        }
    }

    /// Inserts every row, stopping at the first error.
    pub fn extend<I>(&mut self, rows: I) -> IndexResult<()>
    where
        I: IntoIterator<Item = Row<P>>,
    {
        for row in rows {
            self.push(row)?;
        }
        Ok(())
    }

    /// Finishes the build.
    pub fn build(self) -> IndexResult<LookupTable<P>> {
        if let Some(err) = self.poisoned {
            return Err(err);
        }
        if self.rows > self.config.large_table_warning {
            warn!(
                "built lookup table from {} rows (warning threshold {})",
                self.rows, self.config.large_table_warning
            );
        }

        let table = LookupTable::from_parts(self.schema, self.config, self.root, self.rows);
        let stats = table.stats();
        debug!(
            rows = stats.rows,
            exact_nodes = stats.exact_nodes,
            range_nodes = stats.range_nodes,
            leaves = stats.unique_leaves + stats.multi_leaves,
            "lookup table built"
        );
        Ok(table)
    }

    fn insert(&mut self, row: Row<P>, position: usize) -> IndexResult<()> {
        self.schema
            .validate_row(&row.keys, self.config.check_key_types)?;

        let chain = self.chain(row, position)?;
        let mut path = KeyPath::for_columns(
            self.schema.columns.iter().map(|c| c.name.clone()).collect(),
        );
        let root = match self.root.take() {
            Some(root) => root.merge_at(chain, &mut path)?,
            None => chain,
        };
        self.root = Some(root);
        Ok(())
    }

    /// Turns a validated row into a single-path structure.
    fn chain(&self, row: Row<P>, position: usize) -> IndexResult<SearchStructure<P>> {
        let mut node = match self.schema.policy {
            ResultPolicy::Unique => SearchStructure::Unique(
                UniqueResult::from_option(row.payload)?.with_row(position),
            ),
            ResultPolicy::Multi => SearchStructure::Multi(row.payload.into_iter().collect()),
        };

        // A fresh node has nothing to merge with, so inserts cannot fail.
        let mut scratch = KeyPath::root();
        let columns = self.schema.columns.iter().zip(row.keys).enumerate();
        for (column_idx, (column, key)) in columns.rev() {
            node = match (column.matching, key) {
                (Matching::Exact, ColumnKey::Exact(value)) => {
                    let mut exact = ExactNode::new();
                    exact.insert(value, node, &mut scratch)?;
                    SearchStructure::Exact(exact)
                }
                (Matching::Exact, ColumnKey::Any) => {
                    let mut exact = ExactNode::new();
                    exact.insert_default(node, &mut scratch)?;
                    SearchStructure::Exact(exact)
                }
                (Matching::Range(_), ColumnKey::Range(interval)) => {
                    let mut range = RangeNode::new();
                    range.insert(interval, node, &mut scratch)?;
                    SearchStructure::Range(range)
                }
                (Matching::Range(_), ColumnKey::Any) => {
                    let mut range = RangeNode::new();
                    range.insert(Interval::unbounded(), node, &mut scratch)?;
                    SearchStructure::Range(range)
                }
                (_, key) => {
                    return Err(IndexError::invalid_key(
                        column_idx,
                        format!("key {key} does not match column {}", column.name),
                    ))
                }
            };
        }
        Ok(node)
    }
}
