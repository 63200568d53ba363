//! Pairwise merging of search structures.
//!
//! Merging is how two structures produced for the same key path become one:
//!
//! | existing \ incoming | Exact        | Range        | Unique    | Multi     |
//! |---------------------|--------------|--------------|-----------|-----------|
//! | Exact               | per key      | kind error   | kind error| kind error|
//! | Range               | kind error   | per interval | kind error| kind error|
//! | Unique              | kind error   | kind error   | violation | kind error|
//! | Multi               | kind error   | kind error   | kind error| union     |
//!
//! Both operands are consumed, so a failed merge leaves nothing behind that
//! could be queried.

use crate::error::{IndexError, IndexResult};
use crate::index::traits::{KeyPath, Payload};
use crate::index::SearchStructure;

impl<P: Payload> SearchStructure<P> {
    /// Merges `other` into `self`.
    ///
    /// # Errors
    ///
    /// - [`IndexError::UniqueKeyViolation`] when two unique leaves meet
    /// - [`IndexError::OverlappingRange`] when intervals partially overlap
    /// - [`IndexError::InconsistentLeafKind`] when the variants differ
    pub fn merge(self, other: Self) -> IndexResult<Self> {
        self.merge_at(other, &mut KeyPath::root())
    }

    /// Merges `other` into `self`, labelling errors with `path`.
    pub fn merge_at(self, other: Self, path: &mut KeyPath) -> IndexResult<Self> {
        match (self, other) {
            (Self::Exact(mut existing), Self::Exact(incoming)) => {
                existing.absorb(incoming, path)?;
                Ok(Self::Exact(existing))
            }
            (Self::Range(mut existing), Self::Range(incoming)) => {
                existing.absorb(incoming, path)?;
                Ok(Self::Range(existing))
            }
            (Self::Multi(mut existing), Self::Multi(incoming)) => {
                existing.absorb(incoming);
                Ok(Self::Multi(existing))
            }
            (Self::Unique(existing), Self::Unique(incoming)) => {
                Err(IndexError::UniqueKeyViolation {
                    path: path.to_string(),
                    existing: format!("{:?}", existing.value()),
                    incoming: format!("{:?}", incoming.value()),
                    existing_row: existing.row(),
                    incoming_row: incoming.row(),
                })
            }
            (existing, incoming) => Err(IndexError::inconsistent_kind(
                path.to_string(),
                existing.kind(),
                incoming.kind(),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::error::IndexError;
    use crate::index::{ExactNode, KeyPath, MultiResult, RangeNode, SearchStructure, UniqueResult};
    use crate::types::{Interval, KeyValue};

    type Tree = SearchStructure<String>;

    fn unique(value: &str, row: usize) -> Tree {
        SearchStructure::Unique(UniqueResult::new(value.to_string()).with_row(row))
    }

    fn multi(values: &[&str]) -> Tree {
        SearchStructure::Multi(values.iter().map(|v| v.to_string()).collect::<MultiResult<_>>())
    }

    fn exact(key: &str, child: Tree) -> Tree {
        let mut node = ExactNode::new();
        node.insert(KeyValue::from(key), child, &mut KeyPath::root())
            .unwrap();
        SearchStructure::Exact(node)
    }

    fn range(from: i64, to: i64, child: Tree) -> Tree {
        let mut node = RangeNode::new();
        node.insert(
            Interval::bounded(from, to).unwrap(),
            child,
            &mut KeyPath::root(),
        )
        .unwrap();
        SearchStructure::Range(node)
    }

    #[test]
    fn unique_leaves_always_conflict() {
        let err = unique("P1", 0).merge(unique("P1", 1)).unwrap_err();
        assert_eq!(
            err,
            IndexError::UniqueKeyViolation {
                path: "<root>".into(),
                existing: "\"P1\"".into(),
                incoming: "\"P1\"".into(),
                existing_row: Some(0),
                incoming_row: Some(1),
            }
        );
    }

    #[test]
    fn multi_leaves_union() {
        let merged = multi(&["P1", "P2"]).merge(multi(&["P2", "P3"])).unwrap();
        assert_eq!(merged.values().len(), 3);
    }

    #[test]
    fn mixed_leaves_inconsistent() {
        let err = unique("P1", 0).merge(multi(&["P2"])).unwrap_err();
        assert!(matches!(
            err,
            IndexError::InconsistentLeafKind {
                existing: "unique result",
                incoming: "multi result",
                ..
            }
        ));
    }

    #[test]
    fn mixed_nodes_inconsistent() {
        let err = exact("A", multi(&["P1"]))
            .merge(range(0, 10, multi(&["P2"])))
            .unwrap_err();
        assert!(matches!(err, IndexError::InconsistentLeafKind { .. }));
    }

    #[test]
    fn nested_merge_shares_prefix() {
        let a = exact("A", range(0, 10, unique("P1", 0)));
        let b = exact("A", range(10, 20, unique("P2", 1)));
        let c = exact("B", range(0, 100, unique("P3", 2)));

        let tree = a.merge(b).unwrap().merge(c).unwrap();
        let p1 = tree
            .descend(&KeyValue::from("A"))
            .descend(&KeyValue::from(5))
            .unique_value()
            .unwrap()
            .clone();
        let p2 = tree
            .descend(&KeyValue::from("A"))
            .descend(&KeyValue::from(15))
            .unique_value()
            .unwrap()
            .clone();
        assert_eq!(p1, "P1");
        assert_eq!(p2, "P2");
        assert_eq!(tree.values().len(), 3);
    }

    #[test]
    fn nested_violation_reports_full_path() {
        let a = exact("A", range(0, 10, unique("P1", 0)));
        let b = exact("A", range(0, 10, unique("P2", 1)));

        let err = a.merge(b).unwrap_err();
        match err {
            IndexError::UniqueKeyViolation { path, .. } => {
                assert_eq!(path, "\"A\" / [0, 10)");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn nested_overlap_reports_path() {
        let a = exact("A", range(0, 10, unique("P1", 0)));
        let b = exact("A", range(5, 15, unique("P2", 1)));

        let err = a.merge(b).unwrap_err();
        match err {
            IndexError::OverlappingRange {
                path,
                existing,
                incoming,
                ..
            } => {
                assert_eq!(path, "\"A\"");
                assert_eq!(existing, "[0, 10)");
                assert_eq!(incoming, "[5, 15)");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
