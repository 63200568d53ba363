//! Property-based test generators using proptest.
//!
//! Strategies here produce tables that are valid by construction: intervals
//! under one key prefix never overlap and key paths are distinct, so any
//! build failure points at the index rather than the input.

use crate::fixtures::{rate_schema, rate_row};
use decitab_core::{Interval, KeyValue, ResultPolicy, Row, TableSchema};
use proptest::prelude::*;
use std::collections::BTreeMap;

/// Strategy for generating region codes.
pub fn region_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[A-H]").expect("Invalid regex")
}

/// Strategy for generating sorted, pairwise disjoint bounded intervals.
///
/// Adjacent cut points form intervals; some are dropped to leave gaps.
pub fn disjoint_intervals_strategy(max: usize) -> impl Strategy<Value = Vec<Interval>> {
    (
        prop::collection::btree_set(-1_000i64..1_000, 2..max.max(2) + 1),
        prop::collection::vec(any::<bool>(), max),
    )
        .prop_map(|(cuts, keep)| {
            let cuts: Vec<i64> = cuts.into_iter().collect();
            cuts.windows(2)
                .zip(keep.into_iter().chain(std::iter::repeat(true)))
                .filter(|(_, keep)| *keep)
                .map(|(pair, _)| Interval::bounded(pair[0], pair[1]).expect("cut points are sorted"))
                .collect()
        })
}

/// Strategy for generating per-region interval sets.
pub fn region_intervals_strategy() -> impl Strategy<Value = BTreeMap<String, Vec<Interval>>> {
    prop::collection::btree_map(region_strategy(), disjoint_intervals_strategy(8), 1..6)
}

/// Converts per-region intervals into rate rows with distinct payloads.
pub fn rows_from_intervals(regions: &BTreeMap<String, Vec<Interval>>) -> Vec<Row<u32>> {
    let mut payload = 0u32;
    let mut rows = Vec::new();
    for (region, intervals) in regions {
        for interval in intervals {
            rows.push(rate_row(region, interval.clone(), payload));
            payload += 1;
        }
    }
    rows
}

/// Strategy for generating rows with distinct key paths.
pub fn unique_rows_strategy() -> impl Strategy<Value = (TableSchema, Vec<Row<u32>>)> {
    region_intervals_strategy()
        .prop_map(|regions| (rate_schema(ResultPolicy::Unique), rows_from_intervals(&regions)))
}

/// Strategy for generating probe values for range columns.
pub fn probe_strategy() -> impl Strategy<Value = KeyValue> {
    (-1_200i64..1_200).prop_map(KeyValue::from)
}

/// Configuration for property tests.
#[derive(Debug, Clone)]
pub struct PropTestConfig {
    /// Number of test cases to run.
    pub cases: u32,
    /// Maximum shrink iterations.
    pub max_shrink_iters: u32,
}

impl PropTestConfig {
    /// Few cases, for properties that build a table per case.
    #[must_use]
    pub fn quick() -> Self {
        Self {
            cases: 32,
            max_shrink_iters: 100,
        }
    }

    /// Many cases, for properties checked against a linear scan.
    #[must_use]
    pub fn thorough() -> Self {
        Self {
            cases: 512,
            max_shrink_iters: 2000,
        }
    }

    /// Converts to proptest config.
    #[must_use]
    pub fn to_proptest_config(&self) -> ProptestConfig {
        ProptestConfig {
            cases: self.cases,
            max_shrink_iters: self.max_shrink_iters,
            ..ProptestConfig::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    proptest! {
        #![proptest_config(PropTestConfig::quick().to_proptest_config())]

        #[test]
        fn intervals_are_sorted_and_disjoint(intervals in disjoint_intervals_strategy(10)) {
            for pair in intervals.windows(2) {
                prop_assert!(!pair[0].overlaps(&pair[1]));
                prop_assert!(pair[0].upper() <= pair[1].lower());
            }
        }

        #[test]
        fn rows_have_distinct_payloads((_, rows) in unique_rows_strategy()) {
            let payloads: HashSet<u32> = rows.iter().filter_map(|r| r.payload).collect();
            prop_assert_eq!(payloads.len(), rows.len());
        }
    }
}
