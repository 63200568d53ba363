//! # decitab Testkit
//!
//! Test utilities for decitab.
//!
//! This crate provides:
//! - The reference rate table and row helpers
//! - Temporary table files for CLI tests
//! - Property-based test generators using proptest
//!
//! ## Usage
//!
//! ```rust,ignore
//! use decitab_testkit::*;
//!
//! #[test]
//! fn finds_rate() {
//!     let table = scenario_table();
//!     // ... queries
//! }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod fixtures;
pub mod generators;

pub use fixtures::*;
pub use generators::*;
