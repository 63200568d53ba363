//! Interval level.

use crate::error::{IndexError, IndexResult};
use crate::index::traits::{KeyPath, Payload};
use crate::index::SearchStructure;
use crate::types::{Interval, KeyValue};
use std::cmp::Ordering;

/// One interval of a [`RangeNode`] and the structure it leads to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RangeEntry<P: Payload> {
    interval: Interval,
    child: SearchStructure<P>,
}

impl<P: Payload> RangeEntry<P> {
    /// The interval.
    pub fn interval(&self) -> &Interval {
        &self.interval
    }

    /// The child structure.
    pub fn child(&self) -> &SearchStructure<P> {
        &self.child
    }
}

/// Maps disjoint half-open intervals to child structures.
///
/// Entries are kept sorted by lower bound. Because intervals never overlap,
/// that order is total and the interval containing a value is found by
/// binary search over the lower bounds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RangeNode<P: Payload> {
    entries: Vec<RangeEntry<P>>,
}

impl<P: Payload> Default for RangeNode<P> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<P: Payload> RangeNode<P> {
    /// Creates an empty node.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a child for `interval`.
    ///
    /// An identical interval merges the two children. Any other overlap with
    /// an existing interval fails with [`IndexError::OverlappingRange`]; an
    /// empty interval fails with [`IndexError::InvalidKey`].
    pub fn insert(
        &mut self,
        interval: Interval,
        child: SearchStructure<P>,
        path: &mut KeyPath,
    ) -> IndexResult<()> {
        if interval.is_empty() {
            return Err(IndexError::invalid_key(
                path.depth(),
                format!("empty interval {interval} at {path}"),
            ));
        }

        let idx = self
            .entries
            .partition_point(|e| e.interval.cmp_lower(&interval) == Ordering::Less);

        if let Some(entry) = self.entries.get_mut(idx) {
            if entry.interval == interval {
                path.push(&interval);
                let existing = std::mem::replace(&mut entry.child, SearchStructure::empty());
                entry.child = existing.merge_at(child, path)?;
                path.pop();
                return Ok(());
            }
            if entry.interval.overlaps(&interval) {
                return Err(overlap(path, &entry.interval, &interval));
            }
        }

        // Only the nearest lower neighbour can reach past our lower bound.
        if let Some(prev) = idx.checked_sub(1).map(|i| &self.entries[i]) {
            if prev.interval.overlaps(&interval) {
                return Err(overlap(path, &prev.interval, &interval));
            }
        }

        self.entries.insert(idx, RangeEntry { interval, child });
        debug_assert!(self.is_sorted_and_disjoint());
        Ok(())
    }

    /// Merges every interval of `other` into this node.
    pub(crate) fn absorb(&mut self, other: Self, path: &mut KeyPath) -> IndexResult<()> {
        for entry in other.entries {
            self.insert(entry.interval, entry.child, path)?;
        }
        Ok(())
    }

    /// Child of the interval containing `value`.
    pub fn get(&self, value: &KeyValue) -> Option<&SearchStructure<P>> {
        self.find(value).map(|entry| &entry.child)
    }

    /// Entry whose interval contains `value`.
    pub fn find(&self, value: &KeyValue) -> Option<&RangeEntry<P>> {
        let idx = self
            .entries
            .partition_point(|e| e.interval.starts_at_or_before(value));
        idx.checked_sub(1)
            .map(|i| &self.entries[i])
            .filter(|entry| entry.interval.ends_after(value))
    }

    /// Entries in ascending order.
    pub fn entries(&self) -> &[RangeEntry<P>] {
        &self.entries
    }

    /// Intervals in ascending order.
    pub fn intervals(&self) -> impl Iterator<Item = &Interval> {
        self.entries.iter().map(|e| &e.interval)
    }

    /// Number of intervals.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the node holds no interval.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Checks that entries are sorted by lower bound and pairwise disjoint.
    pub fn is_sorted_and_disjoint(&self) -> bool {
        self.entries.windows(2).all(|pair| {
            pair[0].interval.cmp_lower(&pair[1].interval) == Ordering::Less
                && !pair[0].interval.overlaps(&pair[1].interval)
        })
    }
}

fn overlap(path: &KeyPath, existing: &Interval, incoming: &Interval) -> IndexError {
    IndexError::overlapping_range(path.to_string(), existing.to_string(), incoming.to_string())
}
