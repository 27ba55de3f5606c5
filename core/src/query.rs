//! Queries: the search/filter/sort state assembled from input controls.

use serde::{Deserialize, Serialize};
use std::{collections::BTreeMap, fmt, str::FromStr};

use crate::{
    error::{ConsoleError, ConsoleResult},
    record::RecordField,
    types::FILTER_ALL,
};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    #[serde(rename = "asc")]
    Ascending,
    #[serde(rename = "desc")]
    Descending,
}

impl FromStr for SortDirection {
    type Err = ConsoleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "asc" | "ascending" => Ok(Self::Ascending),
            "desc" | "descending" => Ok(Self::Descending),
            other => Err(anyhow::anyhow!("Unknown sort direction '{other}'").into()),
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Ascending => "asc",
            Self::Descending => "desc",
        })
    }
}

/// A dropdown selection: either no constraint, or an exact value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterValue {
    All,
    Equals(String),
}

impl FilterValue {
    /// `"ALL"` always means no constraint.
    pub fn parse(raw: &str) -> Self {
        if raw == FILTER_ALL {
            Self::All
        } else {
            Self::Equals(raw.to_string())
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FieldFilter<F> {
    pub field: F,
    pub value: FilterValue,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SortSpec<F> {
    pub key: F,
    pub direction: SortDirection,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Query<F> {
    pub search_term: String,
    /// Overrides the record type's designated search fields when set.
    pub search_fields: Option<Vec<F>>,
    pub filters: Vec<FieldFilter<F>>,
    pub sort: Option<SortSpec<F>>,
}

impl<F> Default for Query<F> {
    fn default() -> Self {
        Self {
            search_term: String::new(),
            search_fields: None,
            filters: Vec::new(),
            sort: None,
        }
    }
}

impl<F: RecordField> Query<F> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn search(mut self, term: impl Into<String>) -> Self {
        self.search_term = term.into();
        self
    }

    pub fn search_in(mut self, fields: Vec<F>) -> Self {
        self.search_fields = Some(fields);
        self
    }

    /// Set the filter for `field`, replacing any earlier one.
    pub fn filter(mut self, field: F, value: FilterValue) -> Self {
        self.set_filter(field, value);
        self
    }

    pub fn filter_eq(self, field: F, value: impl Into<String>) -> Self {
        let value = value.into();
        self.filter(field, FilterValue::parse(&value))
    }

    pub fn sort_by(mut self, key: F, direction: SortDirection) -> Self {
        self.sort = Some(SortSpec { key, direction });
        self
    }

    pub fn set_filter(&mut self, field: F, value: FilterValue) {
        match self.filters.iter_mut().find(|f| f.field == field) {
            Some(existing) => existing.value = value,
            None => self.filters.push(FieldFilter { field, value }),
        }
    }

    /// Filters that actually constrain something.
    pub fn active_filters(&self) -> impl Iterator<Item = (&F, &str)> {
        self.filters.iter().filter_map(|f| match &f.value {
            FilterValue::All => None,
            FilterValue::Equals(v) => Some((&f.field, v.as_str())),
        })
    }

    /// Build a typed query from control state. Unknown filter fields are
    /// rejected; an unknown sort key is dropped with a warning, which leaves
    /// rows in input order.
    pub fn from_params(view: &str, params: &QueryParams) -> ConsoleResult<Self> {
        let mut query = Query::new().search(params.search.clone());

        for (name, raw) in &params.filters {
            let field = F::parse(name).ok_or_else(|| ConsoleError::UnknownField {
                view: view.to_string(),
                field: name.clone(),
            })?;
            query.set_filter(field, FilterValue::parse(raw));
        }

        if let Some(sort) = params.sort.as_deref().filter(|s| !s.is_empty()) {
            let (key, direction) = match sort.split_once(':') {
                Some((key, dir)) => (key, dir.parse()?),
                None => (sort, SortDirection::Ascending),
            };
            match F::parse(key) {
                Some(key) => query.sort = Some(SortSpec { key, direction }),
                None => log::warn!("{view}: ignoring unknown sort key '{key}'"),
            }
        }

        Ok(query)
    }

    /// Inverse of `from_params`, used when echoing the current query.
    pub fn to_params(&self) -> QueryParams {
        QueryParams {
            search: self.search_term.clone(),
            filters: self
                .filters
                .iter()
                .map(|f| {
                    let raw = match &f.value {
                        FilterValue::All => FILTER_ALL.to_string(),
                        FilterValue::Equals(v) => v.clone(),
                    };
                    (f.field.path().to_string(), raw)
                })
                .collect(),
            sort: self
                .sort
                .as_ref()
                .map(|s| format!("{}:{}", s.key.path(), s.direction)),
        }
    }
}

/// Query state in the stringly form input controls produce.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QueryParams {
    #[serde(default)]
    pub search: String,
    #[serde(default)]
    pub filters: BTreeMap<String, String>,
    /// `field` or `field:asc|desc`.
    #[serde(default)]
    pub sort: Option<String>,
}
