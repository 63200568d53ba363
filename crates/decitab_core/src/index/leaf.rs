//! Terminal result leaves.

use crate::error::{IndexError, IndexResult};
use crate::index::traits::Payload;
use std::collections::HashSet;
use std::hash::{Hash, Hasher};

/// Leaf holding exactly one payload for a fully resolved key path.
///
/// Equality and hashing follow the payload only; the source row is kept
/// for diagnostics.
#[derive(Debug, Clone)]
pub struct UniqueResult<P> {
    value: P,
    row: Option<usize>,
}

impl<P: Payload> UniqueResult<P> {
    /// Creates a leaf from a payload.
    pub fn new(value: P) -> Self {
        Self { value, row: None }
    }

    /// Creates a leaf from an optional payload, rejecting `None`.
    pub fn from_option(value: Option<P>) -> IndexResult<Self> {
        value
            .map(Self::new)
            .ok_or_else(|| IndexError::invalid_result("unique result requires a payload"))
    }

    /// Records the row the payload came from.
    #[must_use]
    pub fn with_row(mut self, row: usize) -> Self {
        self.row = Some(row);
        self
    }

    /// The stored payload.
    pub fn value(&self) -> &P {
        &self.value
    }

    /// The source row, if recorded.
    pub fn row(&self) -> Option<usize> {
        self.row
    }

    /// Unwraps the payload.
    pub fn into_value(self) -> P {
        self.value
    }
}

impl<P: PartialEq> PartialEq for UniqueResult<P> {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl<P: Eq> Eq for UniqueResult<P> {}

impl<P: Hash> Hash for UniqueResult<P> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.value.hash(state);
    }
}

/// Leaf holding any number of payloads.
///
/// Inserting a payload that is already present is a no-op.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MultiResult<P: Payload> {
    values: HashSet<P>,
}

impl<P: Payload> Default for MultiResult<P> {
    fn default() -> Self {
        Self {
            values: HashSet::new(),
        }
    }
}

impl<P: Payload> MultiResult<P> {
    /// Creates an empty leaf.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a leaf holding one payload.
    pub fn single(value: P) -> Self {
        let mut leaf = Self::new();
        leaf.insert(value);
        leaf
    }

    /// Adds a payload. Returns false if it was already present.
    pub fn insert(&mut self, value: P) -> bool {
        self.values.insert(value)
    }

    /// Unions another leaf into this one.
    pub fn absorb(&mut self, other: Self) {
        self.values.extend(other.values);
    }

    /// The stored payloads.
    pub fn values(&self) -> &HashSet<P> {
        &self.values
    }

    /// Number of distinct payloads.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns true if no payload is stored.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<P: Payload> FromIterator<P> for MultiResult<P> {
    fn from_iter<I: IntoIterator<Item = P>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unique_requires_payload() {
        let err = UniqueResult::<String>::from_option(None).unwrap_err();
        assert!(matches!(err, IndexError::InvalidResult { .. }));
        let leaf = UniqueResult::from_option(Some("P1".to_string())).unwrap();
        assert_eq!(leaf.value(), "P1");
    }

    #[test]
    fn unique_equality_ignores_row() {
        let a = UniqueResult::new(7u32).with_row(1);
        let b = UniqueResult::new(7u32).with_row(2);
        assert_eq!(a, b);
        assert_eq!(a.row(), Some(1));

        let set: HashSet<_> = [a, b].into_iter().collect();
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn multi_set_semantics() {
        let mut leaf = MultiResult::new();
        assert!(leaf.insert("P1"));
        assert!(!leaf.insert("P1"));
        assert!(leaf.insert("P2"));
        assert_eq!(leaf.len(), 2);

        let mut other = MultiResult::single("P3");
        other.insert("P1");
        leaf.absorb(other);
        assert_eq!(leaf.len(), 3);
    }
}
