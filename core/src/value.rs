//! Field values as seen by the pipeline.
//!
//! Every record exposes its fields as `FieldValue`s. The comparator picks
//! its strategy from the value types: numbers numerically, text ordinally,
//! timestamps as instants. Values of different kinds order by kind
//! (missing < bool < number < timestamp < text), so `compare` is total.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use std::{cmp::Ordering, fmt};

use crate::types::Category;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Missing,
    Bool(bool),
    Number(f64),
    Text(String),
    Timestamp(DateTime<Utc>),
}

impl FieldValue {
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    pub fn category<C: Category>(value: C) -> Self {
        Self::Text(value.as_str().to_string())
    }

    pub fn optional_text(value: Option<&str>) -> Self {
        value.map_or(Self::Missing, Self::text)
    }

    pub fn optional_number(value: Option<f64>) -> Self {
        value.map_or(Self::Missing, Self::Number)
    }

    pub fn optional_timestamp(value: Option<DateTime<Utc>>) -> Self {
        value.map_or(Self::Missing, Self::Timestamp)
    }

    /// Parse a date-like string as an instant. Accepts RFC 3339 and bare
    /// `YYYY-MM-DD` dates (midnight UTC). Anything else stays text.
    pub fn timestamp_from_str(raw: &str) -> Self {
        if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
            return Self::Timestamp(dt.with_timezone(&Utc));
        }
        if let Some(dt) = NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .ok()
            .and_then(|d| d.and_hms_opt(0, 0, 0))
        {
            return Self::Timestamp(dt.and_utc());
        }
        Self::Text(raw.to_string())
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Self::Missing)
    }

    /// Numeric reading used by reducers. Non-numeric values count as 0,
    /// booleans as 0/1.
    pub fn as_number(&self) -> f64 {
        match self {
            Self::Number(n) if n.is_finite() => *n,
            Self::Bool(b) => f64::from(u8::from(*b)),
            _ => 0.0,
        }
    }

    /// Case-insensitive substring match. Only text participates in search.
    /// `needle_lower` must already be lowercased.
    pub fn contains_ci(&self, needle_lower: &str) -> bool {
        match self {
            Self::Text(s) => s.to_lowercase().contains(needle_lower),
            _ => false,
        }
    }

    /// Categorical exact match against a dropdown value.
    pub fn equals_category(&self, expected: &str) -> bool {
        match self {
            Self::Text(s) => s == expected,
            Self::Bool(b) => expected == if *b { "true" } else { "false" },
            Self::Number(n) => expected.parse::<f64>().map(|e| e == *n).unwrap_or(false),
            Self::Timestamp(t) => FieldValue::timestamp_from_str(expected) == Self::Timestamp(*t),
            Self::Missing => false,
        }
    }

    /// Total order used by `sort_records`. Callers that want a missing value
    /// to read as zero substitute `zero()` before comparing.
    pub fn compare(&self, other: &FieldValue) -> Ordering {
        match (self, other) {
            (Self::Number(a), Self::Number(b)) => a.total_cmp(b),
            (Self::Text(a), Self::Text(b)) => a.cmp(b),
            (Self::Timestamp(a), Self::Timestamp(b)) => a.cmp(b),
            (Self::Bool(a), Self::Bool(b)) => a.cmp(b),
            (a, b) => a.rank().cmp(&b.rank()),
        }
    }

    /// The zero value of this value's type. `Missing` stays `Missing`.
    pub fn zero(&self) -> FieldValue {
        match self {
            Self::Missing => Self::Missing,
            Self::Bool(_) => Self::Bool(false),
            Self::Number(_) => Self::Number(0.0),
            Self::Text(_) => Self::Text(String::new()),
            Self::Timestamp(_) => Self::Timestamp(DateTime::<Utc>::UNIX_EPOCH),
        }
    }

    fn rank(&self) -> u8 {
        match self {
            Self::Missing => 0,
            Self::Bool(_) => 1,
            Self::Number(_) => 2,
            Self::Timestamp(_) => 3,
            Self::Text(_) => 4,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Missing => Ok(()),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
            Self::Timestamp(t) => write!(f, "{}", t.to_rfc3339()),
        }
    }
}
