//! Built lookup tables and their publication.
//!
//! A [`LookupTable`] is immutable once built; every query is a pure read.
//! A [`PublishedTable`] holds the table readers currently see and swaps in a
//! replacement only after it has been built completely, so readers never
//! observe a partial or failed build.

use crate::builder::IndexBuilder;
use crate::config::IndexConfig;
use crate::error::IndexResult;
use crate::index::{Lookup, Payload, SearchStructure};
use crate::schema::{Row, TableSchema};
use crate::stats::TableStats;
use crate::types::KeyValue;
use parking_lot::RwLock;
use std::collections::HashSet;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{info, warn};

/// An immutable multi-key lookup table.
#[derive(Debug, Clone)]
pub struct LookupTable<P: Payload> {
    schema: TableSchema,
    config: IndexConfig,
    root: Option<SearchStructure<P>>,
    rows: usize,
}

impl<P: Payload> LookupTable<P> {
    /// Builds a table from rows with the default configuration.
    pub fn build<I>(schema: TableSchema, rows: I) -> IndexResult<Self>
    where
        I: IntoIterator<Item = Row<P>>,
    {
        Self::build_with_config(schema, IndexConfig::default(), rows)
    }

    /// Builds a table from rows.
    pub fn build_with_config<I>(schema: TableSchema, config: IndexConfig, rows: I) -> IndexResult<Self>
    where
        I: IntoIterator<Item = Row<P>>,
    {
        let mut builder = IndexBuilder::with_config(schema, config)?;
        builder.extend(rows)?;
        builder.build()
    }

    /// Creates a table with no rows.
    pub fn empty(schema: TableSchema) -> Self {
        Self::from_parts(schema, IndexConfig::default(), None, 0)
    }

    pub(crate) fn from_parts(
        schema: TableSchema,
        config: IndexConfig,
        root: Option<SearchStructure<P>>,
        rows: usize,
    ) -> Self {
        Self {
            schema,
            config,
            root,
            rows,
        }
    }

    /// The table schema.
    pub fn schema(&self) -> &TableSchema {
        &self.schema
    }

    /// The configuration the table was built with.
    pub fn config(&self) -> &IndexConfig {
        &self.config
    }

    /// Number of rows the table was built from.
    pub fn row_count(&self) -> usize {
        self.rows
    }

    /// Returns true if the table was built from no rows.
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Lookup positioned at the root, for prefix queries.
    pub fn root(&self) -> Lookup<'_, P> {
        Lookup::from(self.root.as_ref())
    }

    /// Descends through every column.
    ///
    /// Fails with [`IndexError::InvalidQuery`](crate::IndexError::InvalidQuery)
    /// if `keys` does not fit the schema.
    pub fn lookup(&self, keys: &[KeyValue]) -> IndexResult<Lookup<'_, P>> {
        self.schema
            .validate_query(keys, self.config.check_key_types)?;
        Ok(self.root().descend_all(keys))
    }

    /// Every payload matching `keys`.
    pub fn values(&self, keys: &[KeyValue]) -> IndexResult<HashSet<&P>> {
        Ok(self.lookup(keys)?.values())
    }

    /// The single payload matching `keys`.
    pub fn unique_value(&self, keys: &[KeyValue]) -> IndexResult<&P> {
        self.lookup(keys)?.unique_value()
    }

    /// The single payload matching `keys`, or `default` if none does.
    pub fn unique_value_or<'a>(&'a self, keys: &[KeyValue], default: &'a P) -> IndexResult<&'a P> {
        self.lookup(keys)?.unique_value_or(default)
    }

    /// Structural statistics.
    pub fn stats(&self) -> TableStats {
        TableStats::collect(self.root.as_ref(), self.rows)
    }
}

/// The currently published version of a lookup table.
///
/// Readers take a [`snapshot`](Self::snapshot) and query it without further
/// locking. Rebuilds happen off to the side and replace the snapshot only on
/// success; readers holding the previous snapshot are unaffected.
#[derive(Debug)]
pub struct PublishedTable<P: Payload> {
    current: RwLock<Arc<LookupTable<P>>>,
    generation: AtomicU64,
}

impl<P: Payload> PublishedTable<P> {
    /// Publishes an initial table.
    pub fn new(table: LookupTable<P>) -> Self {
        Self {
            current: RwLock::new(Arc::new(table)),
            generation: AtomicU64::new(1),
        }
    }

    /// The table readers currently see.
    pub fn snapshot(&self) -> Arc<LookupTable<P>> {
        Arc::clone(&*self.current.read())
    }

    /// Number of tables published so far, the initial one included.
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::Acquire)
    }

    /// Replaces the published table.
    ///
    /// Returns the new generation.
    pub fn publish(&self, table: LookupTable<P>) -> u64 {
        let table = Arc::new(table);
        let mut current = self.current.write();
        *current = table;
        let generation = self.generation.fetch_add(1, Ordering::AcqRel) + 1;
        drop(current);
        info!("published lookup table generation {}", generation);
        generation
    }

    /// Rebuilds from `rows` with the current schema and configuration.
    ///
    /// On failure the published table is left untouched.
    pub fn rebuild<I>(&self, rows: I) -> IndexResult<u64>
    where
        I: IntoIterator<Item = Row<P>>,
    {
        let (schema, config) = {
            let current = self.current.read();
            (current.schema().clone(), current.config().clone())
        };
        self.rebuild_with(schema, config, rows)
    }

    /// Rebuilds from `rows` with a new schema and configuration.
    pub fn rebuild_with<I>(&self, schema: TableSchema, config: IndexConfig, rows: I) -> IndexResult<u64>
    where
        I: IntoIterator<Item = Row<P>>,
    {
        match LookupTable::build_with_config(schema, config, rows) {
            Ok(table) => Ok(self.publish(table)),
            Err(err) => {
                warn!(
                    "rebuild rejected, keeping generation {}: {}",
                    self.generation(),
                    err
                );
                Err(err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::IndexError;
    use crate::schema::{ColumnSpec, ResultPolicy};
    use crate::types::{ColumnKey, KeyType};

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

    fn row(region: &str, from: i64, to: i64, payload: u32) -> Row<u32> {
        Row::new(
            vec![ColumnKey::exact(region), ColumnKey::range(from, to).unwrap()],
            payload,
        )
    }

    fn key(region: &str, amount: i64) -> [KeyValue; 2] {
        [KeyValue::from(region), KeyValue::from(amount)]
    }

    #[test]
    fn query_rejects_wrong_arity_and_type() {
        let table = LookupTable::build(schema(), vec![row("A", 0, 10, 1)]).unwrap();
        assert!(matches!(
            table.unique_value(&[KeyValue::from("A")]),
            Err(IndexError::InvalidQuery { .. })
        ));
        assert!(matches!(
            table.unique_value(&[KeyValue::from(1), KeyValue::from(1)]),
            Err(IndexError::InvalidQuery { .. })
        ));
    }

    #[test]
    fn prefix_query_through_root() {
        let table = LookupTable::build(
            schema(),
            vec![row("A", 0, 10, 1), row("A", 10, 20, 2), row("B", 0, 10, 3)],
        )
        .unwrap();

        let prefix = table.root().descend(&KeyValue::from("A"));
        assert_eq!(prefix.values().len(), 2);
        assert!(matches!(
            prefix.unique_value(),
            Err(IndexError::AmbiguousResult { count: 2 })
        ));
    }

    #[test]
    fn empty_table_finds_nothing() {
        let table = LookupTable::<u32>::empty(schema());
        assert!(table.is_empty());
        assert_eq!(table.unique_value(&key("A", 1)), Err(IndexError::NotFound));
        assert_eq!(table.unique_value_or(&key("A", 1), &0).unwrap(), &0);
    }

    #[test]
    fn rebuild_swaps_on_success_only() {
        let published = PublishedTable::new(
            LookupTable::build(schema(), vec![row("A", 0, 10, 1)]).unwrap(),
        );
        let before = published.snapshot();
        assert_eq!(published.generation(), 1);

        let generation = published.rebuild(vec![row("A", 0, 10, 2)]).unwrap();
        assert_eq!(generation, 2);
        assert_eq!(published.snapshot().unique_value(&key("A", 5)).unwrap(), &2);

        // Readers holding the old snapshot still see the old data.
        assert_eq!(before.unique_value(&key("A", 5)).unwrap(), &1);

        let err = published
            .rebuild(vec![row("A", 0, 10, 3), row("A", 0, 10, 4)])
            .unwrap_err();
        assert!(matches!(err, IndexError::UniqueKeyViolation { .. }));
        assert_eq!(published.generation(), 2);
        assert_eq!(published.snapshot().unique_value(&key("A", 5)).unwrap(), &2);
    }

    #[test]
    fn concurrent_readers_during_rebuild() {
        let published = Arc::new(PublishedTable::new(
            LookupTable::build(schema(), vec![row("A", 0, 10, 0)]).unwrap(),
        ));

        let readers: Vec<_> = (0..4)
            .map(|_| {
                let published = Arc::clone(&published);
                std::thread::spawn(move || {
                    for _ in 0..200 {
                        let table = published.snapshot();
                        let value = *table.unique_value(&key("A", 5)).unwrap();
                        assert!(value <= 20);
                    }
                })
            })
            .collect();

        for version in 1..=20 {
            published.rebuild(vec![row("A", 0, 10, version)]).unwrap();
        }
        for reader in readers {
            reader.join().unwrap();
        }
        assert_eq!(published.generation(), 21);
    }
}
