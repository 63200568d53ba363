//! Key values, intervals and per-column keys.

use crate::error::{IndexError, IndexResult};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// A discrete key value.
///
/// Values of different variants order by variant first (`Bool < Integer <
/// Text`). Columns declare a [`KeyType`] so mixed variants only meet in
/// columns typed `any`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum KeyValue {
    /// Boolean value.
    Bool(bool),
    /// Signed integer.
    Integer(i64),
    /// Text value.
    Text(String),
}

impl KeyValue {
    /// Returns the type of this value.
    #[must_use]
    pub const fn key_type(&self) -> KeyType {
        match self {
            Self::Bool(_) => KeyType::Bool,
            Self::Integer(_) => KeyType::Integer,
            Self::Text(_) => KeyType::Text,
        }
    }
}

impl fmt::Display for KeyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(v) => write!(f, "{v}"),
            Self::Integer(v) => write!(f, "{v}"),
            Self::Text(v) => write!(f, "{v:?}"),
        }
    }
}

impl From<bool> for KeyValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for KeyValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<i32> for KeyValue {
    fn from(value: i32) -> Self {
        Self::Integer(i64::from(value))
    }
}

impl From<&str> for KeyValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for KeyValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

/// Declared type of a key column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeyType {
    /// Boolean keys.
    Bool,
    /// Integer keys.
    Integer,
    /// Text keys.
    Text,
    /// Any key value.
    #[default]
    Any,
}

impl KeyType {
    /// Returns true if a value of this column type may hold `value`.
    #[must_use]
    pub fn accepts(self, value: &KeyValue) -> bool {
        self == Self::Any || self == value.key_type()
    }
}

impl fmt::Display for KeyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Bool => "bool",
            Self::Integer => "integer",
            Self::Text => "text",
            Self::Any => "any",
        };
        f.write_str(name)
    }
}

/// A half-open interval `[from, to)`.
///
/// An absent bound extends to infinity in its direction, so an interval
/// with neither bound covers every value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Interval {
    #[serde(default)]
    from: Option<KeyValue>,
    #[serde(default)]
    to: Option<KeyValue>,
}

impl Interval {
    /// Creates an interval, rejecting empty ones (`from >= to`).
    pub fn new(from: Option<KeyValue>, to: Option<KeyValue>) -> IndexResult<Self> {
        let interval = Self { from, to };
        interval.check()?;
        Ok(interval)
    }

    /// Creates the bounded interval `[from, to)`.
    pub fn bounded(from: impl Into<KeyValue>, to: impl Into<KeyValue>) -> IndexResult<Self> {
        Self::new(Some(from.into()), Some(to.into()))
    }

    /// Creates `[from, +inf)`.
    pub fn at_least(from: impl Into<KeyValue>) -> Self {
        Self {
            from: Some(from.into()),
            to: None,
        }
    }

    /// Creates `(-inf, to)`.
    pub fn below(to: impl Into<KeyValue>) -> Self {
        Self {
            from: None,
            to: Some(to.into()),
        }
    }

    /// Creates the interval covering every value.
    #[must_use]
    pub const fn unbounded() -> Self {
        Self { from: None, to: None }
    }

    /// Verifies the interval is non-empty.
    pub fn check(&self) -> IndexResult<()> {
        if self.is_empty() {
            return Err(IndexError::invalid_key(
                0,
                format!("empty interval {self}: lower bound must be below upper bound"),
            ));
        }
        Ok(())
    }

    /// Returns true if the interval contains no value.
    ///
    /// Only possible for deserialized intervals, which bypass
    /// [`Interval::new`].
    #[must_use]
    pub fn is_empty(&self) -> bool {
        matches!((&self.from, &self.to), (Some(from), Some(to)) if from >= to)
    }

    /// Inclusive lower bound, `None` when open below.
    #[must_use]
    pub fn lower(&self) -> Option<&KeyValue> {
        self.from.as_ref()
    }

    /// Exclusive upper bound, `None` when open above.
    #[must_use]
    pub fn upper(&self) -> Option<&KeyValue> {
        self.to.as_ref()
    }

    /// Returns true if both bounds are present.
    #[must_use]
    pub fn is_bounded(&self) -> bool {
        self.from.is_some() && self.to.is_some()
    }

    /// Returns true if the lower bound is at or below `value`.
    #[must_use]
    pub fn starts_at_or_before(&self, value: &KeyValue) -> bool {
        self.from.as_ref().map_or(true, |from| from <= value)
    }

    /// Returns true if `value` lies below the upper bound.
    #[must_use]
    pub fn ends_after(&self, value: &KeyValue) -> bool {
        self.to.as_ref().map_or(true, |to| value < to)
    }

    /// Returns true if `value` falls inside `[from, to)`.
    #[must_use]
    pub fn contains(&self, value: &KeyValue) -> bool {
        self.starts_at_or_before(value) && self.ends_after(value)
    }

    /// Returns true if the two intervals share at least one value.
    #[must_use]
    pub fn overlaps(&self, other: &Self) -> bool {
        self.starts_before_end_of(other) && other.starts_before_end_of(self)
    }

    fn starts_before_end_of(&self, other: &Self) -> bool {
        match (&self.from, &other.to) {
            (Some(from), Some(to)) => from < to,
            _ => true,
        }
    }

    /// Orders intervals by lower bound, an open lower bound first.
    #[must_use]
    pub fn cmp_lower(&self, other: &Self) -> Ordering {
        match (&self.from, &other.from) {
            (None, None) => Ordering::Equal,
            (None, Some(_)) => Ordering::Less,
            (Some(_), None) => Ordering::Greater,
            (Some(a), Some(b)) => a.cmp(b),
        }
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.from {
            Some(from) => write!(f, "[{from}, ")?,
            None => f.write_str("(-inf, ")?,
        }
        match &self.to {
            Some(to) => write!(f, "{to})"),
            None => f.write_str("+inf)"),
        }
    }
}

/// The key a row supplies for one column.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ColumnKey {
    /// A discrete value matched exactly.
    Exact(KeyValue),
    /// An interval matched by containment.
    Range(Interval),
    /// Catch-all key, matching anything not matched more specifically.
    Any,
}

impl ColumnKey {
    /// Creates an exact key.
    pub fn exact(value: impl Into<KeyValue>) -> Self {
        Self::Exact(value.into())
    }

    /// Creates a bounded range key `[from, to)`.
    pub fn range(from: impl Into<KeyValue>, to: impl Into<KeyValue>) -> IndexResult<Self> {
        Interval::bounded(from, to).map(Self::Range)
    }
}

impl fmt::Display for ColumnKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exact(value) => write!(f, "{value}"),
            Self::Range(interval) => write!(f, "{interval}"),
            Self::Any => f.write_str("*"),
        }
    }
}

impl From<Interval> for ColumnKey {
    fn from(interval: Interval) -> Self {
        Self::Range(interval)
    }
}

impl From<KeyValue> for ColumnKey {
    fn from(value: KeyValue) -> Self {
        Self::Exact(value)
    }
}
