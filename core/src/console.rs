//! List views and the console registry.
//!
//! A `ListView` is the state behind one admin page: its record set, the
//! current query, summary-card specs and load state. Rendering always
//! filters then sorts for rows, and aggregates the full set for cards.
//!
//! RULES:
//!   - All record-set changes go through the repository (copy-on-write).
//!   - Every change is recorded in the view's event log. The log keeps the
//!     most recent `event_capacity` entries and drops older ones.
//!   - A failed fetch never blanks a view: it keeps the last-known set
//!     and surfaces a warning until a later fetch succeeds.

use chrono::Utc;
use serde::{de::DeserializeOwned, Serialize};
use std::{collections::BTreeMap, path::Path, time::Duration};

use crate::{
    agent_view, compliance_view,
    aggregate::{compute_aggregates, AggregateSpec, Aggregates},
    config::ConsoleConfig,
    error::{ConsoleError, ConsoleResult},
    event::{ConsoleEvent, EventLogEntry},
    fixtures, fraud_view, kyc_view, loan_view,
    pipeline::apply_query,
    query::{Query, QueryParams},
    record::{RecordField, StatusRecord},
    repository::{InMemoryRepository, RecordRepository},
    rng::{FixtureRng, RngBank, ViewSlot},
    source::{JsonFileSource, RecordSource, StaticSource},
    ticket_view,
};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum LoadState {
    Loading,
    Ready { source: String },
    /// Showing a fallback set because the last fetch failed.
    Degraded { warning: String },
}

/// Everything a page needs for one render.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewSnapshot<R> {
    pub view: String,
    pub state: LoadState,
    pub query: QueryParams,
    pub total_records: usize,
    pub rows: Vec<R>,
    pub summary: Aggregates,
}

/// Column headers plus stringified cells, for text rendering.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// Event log entries a view keeps unless configured otherwise.
pub const DEFAULT_EVENT_CAPACITY: usize = 1_000;

pub struct ListView<R: StatusRecord> {
    name: &'static str,
    repo: InMemoryRepository<R>,
    source: Box<dyn RecordSource<R>>,
    query: Query<R::Field>,
    summary: Vec<AggregateSpec<R::Field>>,
    columns: Vec<R::Field>,
    state: LoadState,
    events: Vec<EventLogEntry>,
    event_capacity: usize,
}

impl<R: StatusRecord> ListView<R> {
    /// Create the view and perform the initial fetch. If the source fails,
    /// `fallback` is shown instead and the view starts degraded.
    pub fn mount(
        name: &'static str,
        source: Box<dyn RecordSource<R>>,
        fallback: Vec<R>,
        columns: Vec<R::Field>,
        summary: Vec<AggregateSpec<R::Field>>,
    ) -> ConsoleResult<Self> {
        let mut view = Self {
            name,
            repo: InMemoryRepository::with_records(fallback)?,
            source,
            query: Query::default(),
            summary,
            columns,
            state: LoadState::Loading,
            events: Vec::new(),
            event_capacity: DEFAULT_EVENT_CAPACITY,
        };
        view.refresh()?;
        Ok(view)
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Keep at most `capacity` event log entries, oldest dropped first.
    pub fn with_event_capacity(mut self, capacity: usize) -> Self {
        self.event_capacity = capacity;
        self.trim_events();
        self
    }

    pub fn query(&self) -> &Query<R::Field> {
        &self.query
    }

    pub fn set_query(&mut self, query: Query<R::Field>) {
        self.query = query;
    }

    pub fn state(&self) -> &LoadState {
        &self.state
    }

    pub fn repository(&self) -> &InMemoryRepository<R> {
        &self.repo
    }

    pub fn events(&self) -> &[EventLogEntry] {
        &self.events
    }

    pub fn render(&self) -> ViewSnapshot<R> {
        let records = self.repo.records();
        ViewSnapshot {
            view: self.name.to_string(),
            state: self.state.clone(),
            query: self.query.to_params(),
            total_records: records.len(),
            rows: apply_query(records, &self.query).into_iter().cloned().collect(),
            summary: compute_aggregates(records, &self.summary),
        }
    }

    pub fn table(&self) -> Table {
        let headers = self.columns.iter().map(|c| c.path().to_string()).collect();
        let rows = apply_query(self.repo.records(), &self.query)
            .into_iter()
            .map(|r| self.columns.iter().map(|c| r.field(c).to_string()).collect())
            .collect();
        Table { headers, rows }
    }

    /// Refetch from the source. On success the whole set is replaced and
    /// any local edits are discarded. On failure the current set stays.
    pub fn refresh(&mut self) -> ConsoleResult<()> {
        self.state = LoadState::Loading;
        let source_name = self.source.name().to_string();

        let fetched = self
            .source
            .fetch()
            .and_then(|records| self.repo.replace_all(records));

        match fetched {
            Ok(()) => {
                log::info!("{}: loaded {} records from {source_name}", self.name, self.repo.len());
                self.record(ConsoleEvent::RecordsLoaded {
                    view: self.name.to_string(),
                    source: source_name.clone(),
                    count: self.repo.len(),
                });
                self.state = LoadState::Ready { source: source_name };
            }
            Err(e) => {
                let warning = format!(
                    "{source_name} unavailable ({e}); showing {} last-known records",
                    self.repo.len()
                );
                log::warn!("{}: {warning}", self.name);
                self.record(ConsoleEvent::RefreshFailed {
                    view: self.name.to_string(),
                    source: source_name,
                    reason: e.to_string(),
                    fallback_count: self.repo.len(),
                });
                self.state = LoadState::Degraded { warning };
            }
        }
        Ok(())
    }

    pub fn set_status(&mut self, id: &str, status: &str) -> ConsoleResult<R> {
        let now = Utc::now();
        let (before, after) = self.repo.mutate(id, |r| r.with_status(status, now))?;
        let status_field = R::status_field();
        self.record(ConsoleEvent::StatusChanged {
            view: self.name.to_string(),
            record_id: id.to_string(),
            from: before.field(&status_field).to_string(),
            to: after.field(&status_field).to_string(),
        });
        Ok(after)
    }

    /// Move every record in `ids` to `status`, or none of them.
    pub fn bulk_set_status(&mut self, ids: &[String], status: &str) -> ConsoleResult<usize> {
        let now = Utc::now();
        let changes = self.repo.mutate_many(ids, |r| r.with_status(status, now))?;
        self.record(ConsoleEvent::BulkStatusChanged {
            view: self.name.to_string(),
            record_ids: ids.to_vec(),
            to: status.to_string(),
        });
        Ok(changes.len())
    }

    pub fn delete(&mut self, id: &str) -> ConsoleResult<R> {
        let removed = self.repo.remove(id)?;
        self.record(ConsoleEvent::RecordDeleted {
            view: self.name.to_string(),
            record_id: id.to_string(),
        });
        Ok(removed)
    }

    fn record(&mut self, event: ConsoleEvent) {
        log::debug!("{}: {}", self.name, event.event_type());
        self.events.push(EventLogEntry::new(event));
        self.trim_events();
    }

    fn trim_events(&mut self) {
        let excess = self.events.len().saturating_sub(self.event_capacity);
        if excess > 0 {
            self.events.drain(..excess);
        }
    }
}

// ── Object-safe facade ──────────────────────────────────────────────────────

/// String-driven access to any list view, for the runner and IPC.
pub trait ConsoleView {
    fn name(&self) -> &'static str;
    fn apply_params(&mut self, params: &QueryParams) -> ConsoleResult<()>;
    fn snapshot_json(&self) -> ConsoleResult<serde_json::Value>;
    fn table(&self) -> Table;
    fn summary(&self) -> Aggregates;
    fn state(&self) -> &LoadState;
    fn set_status(&mut self, id: &str, status: &str) -> ConsoleResult<()>;
    fn bulk_set_status(&mut self, ids: &[String], status: &str) -> ConsoleResult<usize>;
    fn delete(&mut self, id: &str) -> ConsoleResult<()>;
    fn refresh(&mut self) -> ConsoleResult<()>;
    fn events(&self) -> &[EventLogEntry];
}

impl<R> ConsoleView for ListView<R>
where
    R: StatusRecord + Serialize,
{
    fn name(&self) -> &'static str {
        self.name
    }

    fn apply_params(&mut self, params: &QueryParams) -> ConsoleResult<()> {
        self.query = Query::from_params(self.name, params)?;
        Ok(())
    }

    fn snapshot_json(&self) -> ConsoleResult<serde_json::Value> {
        Ok(serde_json::to_value(self.render())?)
    }

    fn table(&self) -> Table {
        ListView::table(self)
    }

    fn summary(&self) -> Aggregates {
        compute_aggregates(self.repo.records(), &self.summary)
    }

    fn state(&self) -> &LoadState {
        &self.state
    }

    fn set_status(&mut self, id: &str, status: &str) -> ConsoleResult<()> {
        ListView::set_status(self, id, status).map(|_| ())
    }

    fn bulk_set_status(&mut self, ids: &[String], status: &str) -> ConsoleResult<usize> {
        ListView::bulk_set_status(self, ids, status)
    }

    fn delete(&mut self, id: &str) -> ConsoleResult<()> {
        ListView::delete(self, id).map(|_| ())
    }

    fn refresh(&mut self) -> ConsoleResult<()> {
        ListView::refresh(self)
    }

    fn events(&self) -> &[EventLogEntry] {
        &self.events
    }
}

// ── Registry ─────────────────────────────────────────────────────────────────

pub struct Console {
    views: BTreeMap<&'static str, Box<dyn ConsoleView>>,
}

impl Console {
    /// Build every view. Each view reads `<data_dir>/<view>.json` when a data
    /// directory is configured, falling back to seeded fixtures; otherwise it
    /// serves the fixtures directly after the configured latency.
    pub fn build(config: &ConsoleConfig, seed: u64) -> ConsoleResult<Self> {
        let bank = RngBank::new(seed);
        let mut console = Self { views: BTreeMap::new() };

        console.add(build_view(
            config,
            &bank,
            ViewSlot::Loans,
            loan_view::VIEW_NAME,
            fixtures::loans,
            loan_view::columns(),
            loan_view::summary_cards(),
            loan_view::default_query(),
        )?);
        console.add(build_view(
            config,
            &bank,
            ViewSlot::Agents,
            agent_view::VIEW_NAME,
            fixtures::agents,
            agent_view::columns(),
            agent_view::summary_cards(),
            agent_view::default_query(),
        )?);
        console.add(build_view(
            config,
            &bank,
            ViewSlot::Compliance,
            compliance_view::VIEW_NAME,
            fixtures::compliance_requirements,
            compliance_view::columns(),
            compliance_view::summary_cards(),
            compliance_view::default_query(),
        )?);
        console.add(build_view(
            config,
            &bank,
            ViewSlot::Fraud,
            fraud_view::VIEW_NAME,
            fixtures::fraud_alerts,
            fraud_view::columns(),
            fraud_view::summary_cards(),
            fraud_view::default_query(),
        )?);
        console.add(build_view(
            config,
            &bank,
            ViewSlot::Kyc,
            kyc_view::VIEW_NAME,
            fixtures::kyc_documents,
            kyc_view::columns(),
            kyc_view::summary_cards(),
            kyc_view::default_query(),
        )?);
        console.add(build_view(
            config,
            &bank,
            ViewSlot::Tickets,
            ticket_view::VIEW_NAME,
            fixtures::support_tickets,
            ticket_view::columns(),
            ticket_view::summary_cards(),
            ticket_view::default_query(),
        )?);

        Ok(console)
    }

    pub fn add(&mut self, view: Box<dyn ConsoleView>) {
        self.views.insert(view.name(), view);
    }

    pub fn view_names(&self) -> Vec<&'static str> {
        self.views.keys().copied().collect()
    }

    pub fn view(&self, name: &str) -> ConsoleResult<&dyn ConsoleView> {
        self.views
            .get(name)
            .map(|v| v.as_ref())
            .ok_or_else(|| ConsoleError::UnknownView { name: name.to_string() })
    }

    pub fn view_mut(&mut self, name: &str) -> ConsoleResult<&mut dyn ConsoleView> {
        match self.views.get_mut(name) {
            Some(v) => Ok(v.as_mut()),
            None => Err(ConsoleError::UnknownView { name: name.to_string() }),
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn build_view<R>(
    config: &ConsoleConfig,
    bank: &RngBank,
    slot: ViewSlot,
    name: &'static str,
    generate: fn(&mut FixtureRng, usize) -> Vec<R>,
    columns: Vec<R::Field>,
    summary: Vec<AggregateSpec<R::Field>>,
    default_query: Query<R::Field>,
) -> ConsoleResult<Box<dyn ConsoleView>>
where
    R: StatusRecord + Serialize + DeserializeOwned + 'static,
{
    let mut rng = bank.for_view(slot);
    let seeded = generate(&mut rng, config.records_per_view);
    log::debug!("{}: generated {} fixture records", rng.name, seeded.len());

    let source: Box<dyn RecordSource<R>> = match config.data_file(name) {
        Some(path) if Path::new(&path).exists() => Box::new(JsonFileSource::new(path)),
        _ => Box::new(
            StaticSource::new(format!("fixtures:{name}"), seeded.clone())
                .with_latency(Duration::from_millis(config.simulated_latency_ms)),
        ),
    };

    let mut view = ListView::mount(name, source, seeded, columns, summary)?
        .with_event_capacity(config.max_events_per_view);
    let query = match config.view_params(name) {
        Some(params) => Query::from_params(name, params)?,
        None => default_query,
    };
    view.set_query(query);
    Ok(Box::new(view))
}
