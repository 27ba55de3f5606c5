//! The filter–sort pipeline every list view runs on each re-render.
//!
//! RULES:
//!   - Pure: no function here mutates its input or fails.
//!   - Filter preserves input order; sort is stable in both directions.
//!   - Callers filter first, then sort (see `apply_query`).

use crate::{
    query::{Query, SortDirection},
    record::Record,
    value::FieldValue,
};

/// Keep the records that satisfy the search term and every active filter.
pub fn filter_records<'a, R: Record>(records: &'a [R], query: &Query<R::Field>) -> Vec<&'a R> {
    let needle = query.search_term.to_lowercase();
    let search_fields = query
        .search_fields
        .as_deref()
        .unwrap_or_else(|| R::search_fields());

    records
        .iter()
        .filter(|record| needle.is_empty() || record.matches_search(&needle, search_fields))
        .filter(|record| {
            query
                .active_filters()
                .all(|(field, expected)| record.field(field).equals_category(expected))
        })
        .collect()
}

/// Order records by `key`. Equal keys keep their input order, including
/// when descending: the comparator is reversed, never the output.
///
/// Missing values read as the zero of the column's type, taken from the
/// first record that has a value. A key no record has leaves the order
/// unchanged.
pub fn sort_records<'a, R: Record>(
    records: Vec<&'a R>,
    key: &R::Field,
    direction: SortDirection,
) -> Vec<&'a R> {
    let mut keyed: Vec<(FieldValue, &'a R)> =
        records.into_iter().map(|r| (r.field(key), r)).collect();

    let zero = keyed
        .iter()
        .find(|(value, _)| !value.is_missing())
        .map(|(value, _)| value.zero());
    if let Some(zero) = zero {
        for (value, _) in keyed.iter_mut() {
            if value.is_missing() {
                *value = zero.clone();
            }
        }
    }

    keyed.sort_by(|(a, _), (b, _)| {
        let ord = a.compare(b);
        match direction {
            SortDirection::Ascending => ord,
            SortDirection::Descending => ord.reverse(),
        }
    });
    keyed.into_iter().map(|(_, r)| r).collect()
}

/// Filter, then sort when the query names a key.
pub fn apply_query<'a, R: Record>(records: &'a [R], query: &Query<R::Field>) -> Vec<&'a R> {
    let filtered = filter_records(records, query);
    log::debug!(
        "filter kept {}/{} records (search='{}')",
        filtered.len(),
        records.len(),
        query.search_term
    );
    match &query.sort {
        Some(sort) => sort_records(filtered, &sort.key, sort.direction),
        None => filtered,
    }
}
