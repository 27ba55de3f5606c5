//! Summary-card aggregates.
//!
//! Aggregates are computed over the full record set (optionally scoped to
//! one category, e.g. `status == ACTIVE`), never over the filtered view.
//!
//! Missing values count as 0 unless a spec is marked `present_only`, which
//! drops records with no value for the reduced field before reducing.
//!
//! Every reducer is zero-safe: an empty input or a zero denominator yields
//! 0, never NaN. Values are summed in a canonical order so the result
//! depends only on the multiset of values, not on record order.

use std::collections::BTreeMap;

use crate::record::{Record, RecordField};

/// Named aggregate values, ordered by name for stable output.
pub type Aggregates = BTreeMap<String, f64>;

#[derive(Debug, Clone, PartialEq)]
pub enum RateBase<F> {
    /// Divide by the sum of a field.
    Sum(F),
    /// Divide by the number of records in scope.
    Count,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Reducer<F> {
    Count,
    Sum(F),
    Average(F),
    /// `numerator * 100 / base`.
    Rate { numerator: F, base: RateBase<F> },
}

/// Equality pre-filter applied before a reducer runs.
#[derive(Debug, Clone, PartialEq)]
pub struct Scope<F> {
    pub field: F,
    pub equals: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AggregateSpec<F> {
    pub name: String,
    pub reducer: Reducer<F>,
    pub scope: Option<Scope<F>>,
    /// Skip records whose reduced field is missing.
    pub present_only: bool,
}

impl<F: RecordField> AggregateSpec<F> {
    pub fn count() -> Self {
        Self::from_reducer(Reducer::Count)
    }

    pub fn sum(field: F) -> Self {
        Self::from_reducer(Reducer::Sum(field))
    }

    pub fn average(field: F) -> Self {
        Self::from_reducer(Reducer::Average(field))
    }

    pub fn rate(numerator: F, denominator: F) -> Self {
        Self::from_reducer(Reducer::Rate {
            numerator,
            base: RateBase::Sum(denominator),
        })
    }

    pub fn rate_per_record(numerator: F) -> Self {
        Self::from_reducer(Reducer::Rate {
            numerator,
            base: RateBase::Count,
        })
    }

    fn from_reducer(reducer: Reducer<F>) -> Self {
        let name = match &reducer {
            Reducer::Count => "count".to_string(),
            Reducer::Sum(f) => format!("{}_sum", f.path()),
            Reducer::Average(f) => format!("{}_avg", f.path()),
            Reducer::Rate { numerator, base: RateBase::Sum(d) } => {
                format!("{}_{}_rate", numerator.path(), d.path())
            }
            Reducer::Rate { numerator, base: RateBase::Count } => {
                format!("{}_rate", numerator.path())
            }
        };
        Self { name, reducer, scope: None, present_only: false }
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Only reduce over records whose `field` equals `value`.
    pub fn scoped(mut self, field: F, value: impl Into<String>) -> Self {
        self.scope = Some(Scope { field, equals: value.into() });
        self
    }

    /// Reduce only over records that have a value for the reduced field,
    /// e.g. averaging ratings without counting unrated rows as 0.
    pub fn present_only(mut self) -> Self {
        self.present_only = true;
        self
    }

    fn reduced_field(&self) -> Option<&F> {
        match &self.reducer {
            Reducer::Count => None,
            Reducer::Sum(f) | Reducer::Average(f) => Some(f),
            Reducer::Rate { numerator, .. } => Some(numerator),
        }
    }
}

/// Evaluate each spec independently over `records`.
pub fn compute_aggregates<R: Record>(records: &[R], specs: &[AggregateSpec<R::Field>]) -> Aggregates {
    specs
        .iter()
        .map(|spec| (spec.name.clone(), evaluate(records, spec)))
        .collect()
}

/// Evaluate the specs once per distinct value of `group_by`.
/// Records with no value for the grouping field are skipped.
pub fn group_aggregates<R: Record>(
    records: &[R],
    group_by: &R::Field,
    specs: &[AggregateSpec<R::Field>],
) -> BTreeMap<String, Aggregates> {
    let mut groups: BTreeMap<String, Vec<R>> = BTreeMap::new();
    for record in records {
        let key = record.field(group_by);
        if key.is_missing() {
            continue;
        }
        groups.entry(key.to_string()).or_default().push(record.clone());
    }
    groups
        .into_iter()
        .map(|(key, members)| (key, compute_aggregates(&members, specs)))
        .collect()
}

fn evaluate<R: Record>(records: &[R], spec: &AggregateSpec<R::Field>) -> f64 {
    let scoped: Vec<&R> = records
        .iter()
        .filter(|r| match &spec.scope {
            Some(scope) => r.field(&scope.field).equals_category(&scope.equals),
            None => true,
        })
        .filter(|r| match spec.reduced_field() {
            Some(field) if spec.present_only => !r.field(field).is_missing(),
            _ => true,
        })
        .collect();

    match &spec.reducer {
        Reducer::Count => scoped.len() as f64,
        Reducer::Sum(field) => field_sum(&scoped, field),
        Reducer::Average(field) => ratio(field_sum(&scoped, field), scoped.len() as f64),
        Reducer::Rate { numerator, base } => {
            let denominator = match base {
                RateBase::Sum(field) => field_sum(&scoped, field),
                RateBase::Count => scoped.len() as f64,
            };
            ratio(field_sum(&scoped, numerator) * 100.0, denominator)
        }
    }
}

fn field_sum<R: Record>(records: &[&R], field: &R::Field) -> f64 {
    let mut values: Vec<f64> = records.iter().map(|r| r.field(field).as_number()).collect();
    values.sort_by(f64::total_cmp);
    values.into_iter().sum()
}

fn ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 {
        0.0
    } else {
        numerator / denominator
    }
}
