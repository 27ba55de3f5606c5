//! lendops-core: the filter–sort–aggregate engine behind the lending
//! admin console, plus the typed views, repositories and record sources
//! that drive it.
//!
//! Every list page runs the same pipeline:
//!   1. `pipeline::filter_records`  search term + category filters
//!   2. `pipeline::sort_records`    stable, type-aware ordering
//!   3. `aggregate::compute_aggregates` summary cards over the full set

pub mod aggregate;
pub mod config;
pub mod console;
pub mod dynamic_record;
pub mod error;
pub mod event;
pub mod fixtures;
pub mod name_generator;
pub mod pipeline;
pub mod query;
pub mod record;
pub mod repository;
pub mod rng;
pub mod source;
pub mod types;
pub mod value;

pub mod agent_view;
pub mod compliance_view;
pub mod fraud_view;
pub mod kyc_view;
pub mod loan_view;
pub mod ticket_view;
