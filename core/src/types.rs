//! Shared primitive types used across every console view.

use serde::{Deserialize, Serialize};

/// A stable, unique identifier for a record within one record set.
pub type RecordId = String;

/// Sentinel a dropdown filter sends for "no constraint on this field".
/// Reserved: no category may serialize to this value.
pub const FILTER_ALL: &str = "ALL";

/// A closed set of categorical values (statuses, risk levels, types).
///
/// `as_str` is the wire form used by filters and JSON fixtures.
pub trait Category: Copy + Sized + 'static {
    fn as_str(&self) -> &'static str;
    fn all() -> &'static [Self];

    fn parse(value: &str) -> Option<Self> {
        Self::all().iter().copied().find(|c| c.as_str() == value)
    }
}

/// Four-step severity scale shared by loans, compliance, fraud and support.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    Critical,
}

impl Category for RiskLevel {
    fn as_str(&self) -> &'static str {
        match self {
            Self::Low      => "LOW",
            Self::Medium   => "MEDIUM",
            Self::High     => "HIGH",
            Self::Critical => "CRITICAL",
        }
    }

    fn all() -> &'static [Self] {
        &[Self::Low, Self::Medium, Self::High, Self::Critical]
    }
}
