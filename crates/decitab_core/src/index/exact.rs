//! Discrete-key level.

use crate::error::IndexResult;
use crate::index::traits::{KeyPath, Payload};
use crate::index::SearchStructure;
use crate::types::KeyValue;
use std::collections::HashMap;

/// Maps discrete key values to child structures.
///
/// An optional default child answers keys with no exact match; exact
/// matches always take precedence over it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExactNode<P: Payload> {
    children: HashMap<KeyValue, SearchStructure<P>>,
    default: Option<Box<SearchStructure<P>>>,
}

impl<P: Payload> Default for ExactNode<P> {
    fn default() -> Self {
        Self {
            children: HashMap::new(),
            default: None,
        }
    }
}

impl<P: Payload> ExactNode<P> {
    /// Creates an empty node.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a child at `key`, merging with any child already there.
    pub fn insert(
        &mut self,
        key: KeyValue,
        child: SearchStructure<P>,
        path: &mut KeyPath,
    ) -> IndexResult<()> {
        path.push(&key);
        let merged = match self.children.remove(&key) {
            Some(existing) => existing.merge_at(child, path)?,
            None => child,
        };
        path.pop();
        self.children.insert(key, merged);
        Ok(())
    }

    /// Sets the default child, merging with an existing default.
    pub fn insert_default(
        &mut self,
        child: SearchStructure<P>,
        path: &mut KeyPath,
    ) -> IndexResult<()> {
        path.push("*");
        let merged = match self.default.take() {
            Some(existing) => existing.merge_at(child, path)?,
            None => child,
        };
        path.pop();
        self.default = Some(Box::new(merged));
        Ok(())
    }

    /// Merges every child of `other` into this node.
    pub(crate) fn absorb(&mut self, other: Self, path: &mut KeyPath) -> IndexResult<()> {
        for (key, child) in other.children {
            self.insert(key, child, path)?;
        }
        if let Some(default) = other.default {
            self.insert_default(*default, path)?;
        }
        Ok(())
    }

    /// Child for `key`, falling back to the default child.
    pub fn get(&self, key: &KeyValue) -> Option<&SearchStructure<P>> {
        self.children.get(key).or(self.default.as_deref())
    }

    /// Child for exactly `key`, ignoring the default.
    pub fn get_exact(&self, key: &KeyValue) -> Option<&SearchStructure<P>> {
        self.children.get(key)
    }

    /// The default child.
    pub fn default_child(&self) -> Option<&SearchStructure<P>> {
        self.default.as_deref()
    }

    /// Keys with an exact child.
    pub fn keys(&self) -> impl Iterator<Item = &KeyValue> {
        self.children.keys()
    }

    /// Every child, the default included.
    pub fn children(&self) -> impl Iterator<Item = &SearchStructure<P>> {
        self.children.values().chain(self.default.as_deref())
    }

    /// Number of exact keys.
    pub fn len(&self) -> usize {
        self.children.len()
    }

    /// Returns true if the node has no child at all.
    pub fn is_empty(&self) -> bool {
        self.children.is_empty() && self.default.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::IndexError;
    use crate::index::{MultiResult, UniqueResult};

    fn unique(value: u32) -> SearchStructure<u32> {
        SearchStructure::Unique(UniqueResult::new(value))
    }

    fn multi(values: &[u32]) -> SearchStructure<u32> {
        SearchStructure::Multi(values.iter().copied().collect::<MultiResult<_>>())
    }

    #[test]
    fn insert_and_get() {
        let mut node = ExactNode::new();
        let mut path = KeyPath::root();
        node.insert(KeyValue::from("A"), unique(1), &mut path).unwrap();
        node.insert(KeyValue::from("B"), unique(2), &mut path).unwrap();

        assert_eq!(node.len(), 2);
        assert_eq!(
            node.get(&KeyValue::from("A")).unwrap().unique_value().unwrap(),
            &1
        );
        assert!(node.get(&KeyValue::from("C")).is_none());
        assert_eq!(path.depth(), 0);
    }

    #[test]
    fn default_child_used_on_miss() {
        let mut node = ExactNode::new();
        let mut path = KeyPath::root();
        node.insert(KeyValue::from("A"), unique(1), &mut path).unwrap();
        node.insert_default(unique(99), &mut path).unwrap();

        assert_eq!(
            node.get(&KeyValue::from("A")).unwrap().unique_value().unwrap(),
            &1
        );
        assert_eq!(
            node.get(&KeyValue::from("Z")).unwrap().unique_value().unwrap(),
            &99
        );
        assert!(node.get_exact(&KeyValue::from("Z")).is_none());
        assert_eq!(node.children().count(), 2);
    }

    #[test]
    fn existing_key_merges() {
        let mut node = ExactNode::new();
        let mut path = KeyPath::root();
        node.insert(KeyValue::from("A"), multi(&[1]), &mut path).unwrap();
        node.insert(KeyValue::from("A"), multi(&[2, 1]), &mut path).unwrap();

        let child = node.get(&KeyValue::from("A")).unwrap();
        assert_eq!(child.values().len(), 2);
    }

    #[test]
    fn duplicate_unique_key_reports_path() {
        let mut node = ExactNode::new();
        let mut path = KeyPath::for_columns(vec!["region".into()]);
        node.insert(KeyValue::from("A"), unique(1), &mut path).unwrap();
        let err = node
            .insert(KeyValue::from("A"), unique(2), &mut path)
            .unwrap_err();

        match err {
            IndexError::UniqueKeyViolation {
                path,
                existing,
                incoming,
                ..
            } => {
                assert_eq!(path, "region=\"A\"");
                assert_eq!(existing, "1");
                assert_eq!(incoming, "2");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn duplicate_default_rejected_under_unique() {
        let mut node = ExactNode::new();
        let mut path = KeyPath::root();
        node.insert_default(unique(1), &mut path).unwrap();
        assert!(node.insert_default(unique(2), &mut path).is_err());
    }
}
