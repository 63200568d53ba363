//! Recursive search structures.
//!
//! A lookup table is a tree with one level per key column. Internal levels
//! are [`ExactNode`]s (discrete keys) or [`RangeNode`]s (disjoint
//! intervals); the last level ends in [`UniqueResult`] or [`MultiResult`]
//! leaves. All four are variants of [`SearchStructure`], and every variant
//! answers the same queries:
//!
//! - `descend(key)`: step one column down; a miss yields [`Lookup::empty`]
//! - `values()`: every payload reachable from here
//! - `unique_value()`: the single reachable payload, or an error
//! - `unique_value_or(default)`: like `unique_value`, with `default` on a miss
//!
//! Structures are merged pairwise by [`SearchStructure::merge`], which is how
//! rows that share a key prefix end up in one tree.

mod exact;
mod leaf;
mod merge;
mod range;
mod traits;

pub use exact::ExactNode;
pub use leaf::{MultiResult, UniqueResult};
pub use range::{RangeEntry, RangeNode};
pub use traits::{KeyPath, Payload};

use crate::error::{IndexError, IndexResult};
use crate::types::KeyValue;
use std::collections::HashSet;

/// A node or leaf of a lookup table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchStructure<P: Payload> {
    /// Discrete-key level.
    Exact(ExactNode<P>),
    /// Interval level.
    Range(RangeNode<P>),
    /// Single-payload leaf.
    Unique(UniqueResult<P>),
    /// Payload-set leaf.
    Multi(MultiResult<P>),
}

impl<P: Payload> SearchStructure<P> {
    /// An empty multi-result leaf.
    pub fn empty() -> Self {
        Self::Multi(MultiResult::new())
    }

    /// Short name of the variant, used in diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Exact(_) => "exact node",
            Self::Range(_) => "range node",
            Self::Unique(_) => "unique result",
            Self::Multi(_) => "multi result",
        }
    }

    /// Returns true for result leaves.
    pub fn is_leaf(&self) -> bool {
        matches!(self, Self::Unique(_) | Self::Multi(_))
    }

    /// Steps one column down.
    ///
    /// Leaves are already resolved and return themselves.
    pub fn descend(&self, key: &KeyValue) -> Lookup<'_, P> {
        match self {
            Self::Exact(node) => Lookup::from(node.get(key)),
            Self::Range(node) => Lookup::from(node.get(key)),
            Self::Unique(_) | Self::Multi(_) => Lookup::of(self),
        }
    }

    /// Every payload reachable from this structure.
    pub fn values(&self) -> HashSet<&P> {
        let mut out = HashSet::new();
        self.collect_values(&mut out);
        out
    }

    fn collect_values<'a>(&'a self, out: &mut HashSet<&'a P>) {
        match self {
            Self::Exact(node) => {
                for child in node.children() {
                    child.collect_values(out);
                }
            }
            Self::Range(node) => {
                for entry in node.entries() {
                    entry.child().collect_values(out);
                }
            }
            Self::Unique(leaf) => {
                out.insert(leaf.value());
            }
            Self::Multi(leaf) => out.extend(leaf.values()),
        }
    }

    /// The single payload reachable from this structure.
    ///
    /// Fails with [`IndexError::NotFound`] when nothing is reachable and
    /// [`IndexError::AmbiguousResult`] when more than one payload is.
    pub fn unique_value(&self) -> IndexResult<&P> {
        match self {
            Self::Unique(leaf) => Ok(leaf.value()),
            _ => single(self.values()),
        }
    }

    /// Like [`unique_value`](Self::unique_value) but returns `default`
    /// instead of failing with `NotFound`.
    pub fn unique_value_or<'a>(&'a self, default: &'a P) -> IndexResult<&'a P> {
        recover_not_found(self.unique_value(), default)
    }
}

fn single<P>(values: HashSet<&P>) -> IndexResult<&P> {
    let count = values.len();
    let mut iter = values.into_iter();
    match (iter.next(), count) {
        (Some(value), 1) => Ok(value),
        (None, _) => Err(IndexError::NotFound),
        (Some(_), count) => Err(IndexError::AmbiguousResult { count }),
    }
}

fn recover_not_found<'a, P>(result: IndexResult<&'a P>, default: &'a P) -> IndexResult<&'a P> {
    match result {
        Err(IndexError::NotFound) => Ok(default),
        other => other,
    }
}

/// Borrowed position in a lookup table.
///
/// A lookup either points at a structure or is empty, which behaves like a
/// leaf with no payloads. Descending from an empty lookup stays empty.
#[derive(Debug)]
pub struct Lookup<'a, P: Payload> {
    node: Option<&'a SearchStructure<P>>,
}

impl<P: Payload> Clone for Lookup<'_, P> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<P: Payload> Copy for Lookup<'_, P> {}

impl<'a, P: Payload> From<Option<&'a SearchStructure<P>>> for Lookup<'a, P> {
    fn from(node: Option<&'a SearchStructure<P>>) -> Self {
        Self { node }
    }
}

impl<'a, P: Payload> Lookup<'a, P> {
    /// The empty-result sentinel.
    pub fn empty() -> Self {
        Self { node: None }
    }

    /// A lookup positioned at `node`.
    pub fn of(node: &'a SearchStructure<P>) -> Self {
        Self { node: Some(node) }
    }

    /// The structure at this position, if any.
    pub fn node(&self) -> Option<&'a SearchStructure<P>> {
        self.node
    }

    /// Returns true if this lookup matched nothing.
    pub fn is_empty(&self) -> bool {
        self.node.is_none()
    }

    /// Steps one column down.
    #[must_use]
    pub fn descend(self, key: &KeyValue) -> Self {
        match self.node {
            Some(node) => node.descend(key),
            None => self,
        }
    }

    /// Steps down once per key.
    #[must_use]
    pub fn descend_all<'k>(self, keys: impl IntoIterator<Item = &'k KeyValue>) -> Self {
        keys.into_iter().fold(self, |lookup, key| lookup.descend(key))
    }

    /// Every payload reachable from this position.
    pub fn values(&self) -> HashSet<&'a P> {
        self.node.map(SearchStructure::values).unwrap_or_default()
    }

    /// The single payload reachable from this position.
    pub fn unique_value(&self) -> IndexResult<&'a P> {
        match self.node {
            Some(node) => node.unique_value(),
            None => Err(IndexError::NotFound),
        }
    }

    /// Like [`unique_value`](Self::unique_value) but returns `default` on a
    /// miss.
    pub fn unique_value_or(&self, default: &'a P) -> IndexResult<&'a P> {
        recover_not_found(self.unique_value(), default)
    }
}
