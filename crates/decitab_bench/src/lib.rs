//! Benchmark utilities.
//!
//! Generates synthetic rate tables: `regions` exact keys, each with `bands`
//! adjacent amount intervals of width [`BAND_WIDTH`].

#![deny(unsafe_code)]
#![warn(missing_docs)]

use decitab_core::{
    ColumnKey, ColumnSpec, Interval, KeyType, KeyValue, LookupTable, ResultPolicy, Row,
    TableSchema,
};
use rand::Rng;

/// Width of every generated amount interval.
pub const BAND_WIDTH: i64 = 10;

/// Schema with an exact text `region` column and a bounded integer
/// `amount` range column.
pub fn rate_schema() -> TableSchema {
    TableSchema::new(
        vec![
            ColumnSpec::exact("region").with_type(KeyType::Text),
            ColumnSpec::range("amount").with_type(KeyType::Integer),
        ],
        ResultPolicy::Unique,
    )
    .expect("rate schema is valid")
}

/// Generate `regions * bands` rows with distinct payloads.
pub fn generate_rows(regions: usize, bands: usize) -> Vec<Row<u64>> {
    let mut rows = Vec::with_capacity(regions * bands);
    for region in 0..regions {
        for band in 0..bands as i64 {
            let lower = band * BAND_WIDTH;
            let interval =
                Interval::bounded(lower, lower + BAND_WIDTH).expect("band bounds are ordered");
            rows.push(Row::new(
                vec![ColumnKey::exact(region_name(region)), ColumnKey::Range(interval)],
                rows.len() as u64,
            ));
        }
    }
    rows
}

/// Build a table from [`generate_rows`].
pub fn generate_table(regions: usize, bands: usize) -> LookupTable<u64> {
    LookupTable::build(rate_schema(), generate_rows(regions, bands))
        .expect("generated rows are disjoint")
}

/// Generate random query keys that hit the generated table.
pub fn random_queries(regions: usize, bands: usize, count: usize) -> Vec<[KeyValue; 2]> {
    let mut rng = rand::thread_rng();
    let upper = bands as i64 * BAND_WIDTH;
    (0..count)
        .map(|_| {
            [
                KeyValue::from(region_name(rng.gen_range(0..regions))),
                KeyValue::from(rng.gen_range(0..upper)),
            ]
        })
        .collect()
}

fn region_name(index: usize) -> String {
    format!("R{index:04}")
}
