//! Record and field contracts.
//!
//! RULE: The pipeline never indexes records by raw strings.
//! Each view declares a closed field enum; strings from input controls are
//! parsed into that enum once, at the edge (see query.rs).

use chrono::{DateTime, Utc};
use std::fmt;

use crate::{error::ConsoleResult, value::FieldValue};

/// A field a record can be searched, filtered, sorted or reduced on.
pub trait RecordField: Clone + PartialEq + fmt::Debug {
    /// Dotted, camelCase path matching the record's JSON shape,
    /// e.g. `performance.recoveryRate`.
    fn path(&self) -> &str;

    fn parse(path: &str) -> Option<Self>;
}

/// An identity-bearing row in an admin list.
pub trait Record: Clone {
    type Field: RecordField + 'static;

    fn id(&self) -> &str;

    /// Read one field. Absent optional values come back as `FieldValue::Missing`.
    fn field(&self, field: &Self::Field) -> FieldValue;

    /// Fields the search box looks at when the query doesn't override them.
    fn search_fields() -> &'static [Self::Field];

    /// True when any of `fields` contains `needle_lower` (already lowercased).
    fn matches_search(&self, needle_lower: &str, fields: &[Self::Field]) -> bool {
        fields
            .iter()
            .any(|f| self.field(f).contains_ci(needle_lower))
    }
}

/// A record with a workflow status that user actions can change.
pub trait StatusRecord: Record {
    fn status_field() -> Self::Field;

    /// Return a copy moved to `status`, or an error for an unknown status
    /// or a transition out of a terminal state.
    fn with_status(&self, status: &str, at: DateTime<Utc>) -> ConsoleResult<Self>;
}
