use std::{collections::BTreeMap, fs, path::PathBuf};

use lendops_core::{
    config::ConsoleConfig,
    console::{Console, ConsoleView, ListView, LoadState},
    error::{ConsoleError, ConsoleResult},
    event::ConsoleEvent,
    fixtures,
    kyc_view::{self, KycDocument, VerificationStatus},
    loan_view::{self, CollectionStatus, OverdueLoan},
    query::QueryParams,
    record::Record,
    rng::{RngBank, ViewSlot},
    types::Category,
    source::{FailingSource, RecordSource, StaticSource},
    ticket_view::{self, TicketStatus},
};

// ── Helpers ──────────────────────────────────────────────────────────────────

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn loans(seed: u64, n: usize) -> Vec<OverdueLoan> {
    fixtures::loans(&mut RngBank::new(seed).for_view(ViewSlot::Loans), n)
}

fn loan_view_from(source: Box<dyn RecordSource<OverdueLoan>>, fallback: Vec<OverdueLoan>) -> ListView<OverdueLoan> {
    ListView::mount(
        loan_view::VIEW_NAME,
        source,
        fallback,
        loan_view::columns(),
        loan_view::summary_cards(),
    )
    .unwrap()
}

fn scratch_dir(test: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("lendops-{test}-{}", std::process::id()));
    fs::create_dir_all(&dir).unwrap();
    dir
}

/// Serves its first set once, then fails every later fetch.
struct FlakySource {
    first: Option<Vec<OverdueLoan>>,
}

impl RecordSource<OverdueLoan> for FlakySource {
    fn name(&self) -> &str {
        "flaky"
    }

    fn fetch(&mut self) -> ConsoleResult<Vec<OverdueLoan>> {
        self.first.take().ok_or_else(|| ConsoleError::SourceUnavailable {
            source_name: "flaky".into(),
            reason: "connection reset".into(),
        })
    }
}

// ── Loading ──────────────────────────────────────────────────────────────────

#[test]
fn failed_initial_fetch_shows_fallback_with_warning() {
    init_logging();
    let view = loan_view_from(Box::new(FailingSource::new("loans-api", "timeout")), loans(1, 8));

    match view.state() {
        LoadState::Degraded { warning } => {
            assert!(warning.contains("loans-api"), "warning: {warning}");
            assert!(warning.contains("8 last-known"), "warning: {warning}");
        }
        other => panic!("expected degraded state, got {other:?}"),
    }
    assert_eq!(view.render().rows.len(), 8);
    assert!(matches!(
        view.events()[0].event,
        ConsoleEvent::RefreshFailed { fallback_count: 8, .. }
    ));
}

#[test]
fn successful_fetch_replaces_fallback() {
    let fetched = loans(2, 5);
    let view = loan_view_from(Box::new(StaticSource::new("fixtures:loans", fetched.clone())), loans(3, 12));

    assert_eq!(view.state(), &LoadState::Ready { source: "fixtures:loans".into() });
    assert_eq!(view.repository().records(), fetched.as_slice());
    assert!(matches!(
        view.events()[0].event,
        ConsoleEvent::RecordsLoaded { count: 5, .. }
    ));
}

#[test]
fn failed_refresh_keeps_last_known_set() {
    init_logging();
    let first = loans(4, 6);
    let mut view = loan_view_from(Box::new(FlakySource { first: Some(first.clone()) }), Vec::new());
    assert!(matches!(view.state(), LoadState::Ready { .. }));

    view.refresh().unwrap();
    assert!(matches!(view.state(), LoadState::Degraded { .. }));
    assert_eq!(view.repository().records(), first.as_slice());
    assert_eq!(view.render().summary["overdueLoans"], 6.0);
}

#[test]
fn refresh_discards_local_edits() {
    let set = loans(5, 10);
    let mut view = loan_view_from(Box::new(StaticSource::new("fixtures:loans", set.clone())), Vec::new());
    view.delete("1").unwrap();
    assert_eq!(view.repository().len(), 9);

    view.refresh().unwrap();
    assert_eq!(view.repository().records(), set.as_slice());
}

// ── Mutations ────────────────────────────────────────────────────────────────

#[test]
fn status_change_is_logged() {
    let set = loans(6, 20);
    let open = set.iter().find(|l| !l.status.is_terminal()).unwrap();
    let (open, from) = (open.id.clone(), open.status.as_str());
    let mut view = loan_view_from(Box::new(StaticSource::new("fixtures:loans", set)), Vec::new());

    let updated = view.set_status(&open, "PROMISE_TO_PAY").unwrap();
    assert_eq!(updated.status, CollectionStatus::PromiseToPay);
    assert!(updated.last_contact_date.is_some());

    let last = &view.events().last().unwrap().event;
    assert_eq!(
        last,
        &ConsoleEvent::StatusChanged {
            view: "loans".into(),
            record_id: open,
            from: from.into(),
            to: "PROMISE_TO_PAY".into(),
        }
    );
}

#[test]
fn unknown_status_is_rejected() {
    let mut view = loan_view_from(Box::new(StaticSource::new("fixtures:loans", loans(7, 3))), Vec::new());
    let events_before = view.events().len();
    let err = view.set_status("1", "ESCALATED").unwrap_err();
    assert!(matches!(err, ConsoleError::InvalidStatus { .. }));
    assert_eq!(view.events().len(), events_before);
}

#[test]
fn closed_loans_cannot_reopen() {
    let set = loans(8, 30);
    let closed = set.iter().find(|l| l.status.is_terminal()).unwrap().id.clone();
    let mut view = loan_view_from(Box::new(StaticSource::new("fixtures:loans", set)), Vec::new());

    let err = view.set_status(&closed, "IN_PROGRESS").unwrap_err();
    assert!(matches!(err, ConsoleError::InvalidTransition { .. }));
}

#[test]
fn kyc_decisions_are_final() {
    let docs = fixtures::kyc_documents(&mut RngBank::new(9).for_view(ViewSlot::Kyc), 30);
    let pending = docs.iter().find(|d| d.status == VerificationStatus::Pending).unwrap().id.clone();
    let mut view: ListView<KycDocument> = ListView::mount(
        kyc_view::VIEW_NAME,
        Box::new(StaticSource::new("fixtures:kyc", docs)),
        Vec::new(),
        kyc_view::columns(),
        kyc_view::summary_cards(),
    )
    .unwrap();

    let verified = view.set_status(&pending, "VERIFIED").unwrap();
    assert!(verified.verified_at.is_some());
    assert!(view.set_status(&pending, "REJECTED").is_err());
}

#[test]
fn bulk_status_change_logs_one_event() {
    let set = loans(10, 40);
    let ids: Vec<String> = set
        .iter()
        .filter(|l| !l.status.is_terminal())
        .take(4)
        .map(|l| l.id.clone())
        .collect();
    let mut view = loan_view_from(Box::new(StaticSource::new("fixtures:loans", set)), Vec::new());
    let events_before = view.events().len();

    assert_eq!(view.bulk_set_status(&ids, "IN_PROGRESS").unwrap(), 4);
    assert_eq!(view.events().len(), events_before + 1);
    assert!(matches!(
        &view.events().last().unwrap().event,
        ConsoleEvent::BulkStatusChanged { record_ids, .. } if record_ids == &ids
    ));
}

#[test]
fn bulk_status_change_with_repeated_ids_changes_nothing() {
    let set = loans(10, 40);
    let open = set.iter().find(|l| !l.status.is_terminal()).unwrap().id.clone();
    let mut view = loan_view_from(Box::new(StaticSource::new("fixtures:loans", set.clone())), Vec::new());
    let events_before = view.events().len();

    let err = view
        .bulk_set_status(&[open.clone(), open], "IN_PROGRESS")
        .unwrap_err();
    assert!(matches!(err, ConsoleError::DuplicateRecordId { .. }));
    assert_eq!(view.events().len(), events_before);
    assert_eq!(view.repository().records(), set.as_slice());
}

#[test]
fn event_log_keeps_only_the_newest_entries() {
    let mut view = loan_view_from(Box::new(StaticSource::new("fixtures:loans", loans(12, 10))), Vec::new())
        .with_event_capacity(3);
    for id in ["1", "2", "3", "4", "5"] {
        view.delete(id).unwrap();
    }

    let kept: Vec<&str> = view
        .events()
        .iter()
        .map(|e| match &e.event {
            ConsoleEvent::RecordDeleted { record_id, .. } => record_id.as_str(),
            other => panic!("unexpected event {other:?}"),
        })
        .collect();
    assert_eq!(kept, vec!["3", "4", "5"]);
}

#[test]
fn configured_event_capacity_reaches_every_view() {
    let config = ConsoleConfig { max_events_per_view: 2, ..ConsoleConfig::default() };
    let mut console = Console::build(&config, 5).unwrap();
    let tickets = console.view_mut("tickets").unwrap();
    for _ in 0..4 {
        tickets.refresh().unwrap();
    }
    assert_eq!(tickets.events().len(), 2);
}

#[test]
fn delete_removes_row_and_updates_cards() {
    let mut view = loan_view_from(Box::new(StaticSource::new("fixtures:loans", loans(11, 10))), Vec::new());
    let removed = view.delete("4").unwrap();
    assert_eq!(removed.id(), "4");

    let snap = view.render();
    assert_eq!(snap.total_records, 9);
    assert!(snap.rows.iter().all(|r| r.id != "4"));
    assert_eq!(snap.summary["overdueLoans"], 9.0);
    assert!(matches!(
        view.events().last().unwrap().event,
        ConsoleEvent::RecordDeleted { .. }
    ));
}

// ── Registry ─────────────────────────────────────────────────────────────────

#[test]
fn console_builds_every_view() {
    let console = Console::build(&ConsoleConfig::default(), 42).unwrap();
    assert_eq!(
        console.view_names(),
        vec!["agents", "compliance", "fraud", "kyc", "loans", "tickets"]
    );
    for name in console.view_names() {
        let view = console.view(name).unwrap();
        assert!(matches!(view.state(), LoadState::Ready { .. }), "{name} not ready");
        assert_eq!(view.table().rows.len(), 25, "{name} row count");
    }
}

#[test]
fn unknown_view_is_an_error() {
    let mut console = Console::build(&ConsoleConfig::default(), 1).unwrap();
    assert!(matches!(
        console.view_mut("payroll").err(),
        Some(ConsoleError::UnknownView { .. })
    ));
}

#[test]
fn default_loan_query_puts_worst_cases_first() {
    let console = Console::build(&ConsoleConfig::default(), 3).unwrap();
    let snap = console.view("loans").unwrap().snapshot_json().unwrap();
    let days: Vec<u64> = snap["rows"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["daysOverdue"].as_u64().unwrap())
        .collect();
    assert!(days.windows(2).all(|w| w[0] >= w[1]));
    assert_eq!(snap["query"]["sort"], "daysOverdue:desc");
}

#[test]
fn configured_view_params_override_the_default_query() {
    let mut views = BTreeMap::new();
    views.insert(
        "tickets".to_string(),
        QueryParams {
            filters: [("status".to_string(), "OPEN".to_string())].into_iter().collect(),
            ..QueryParams::default()
        },
    );
    let config = ConsoleConfig { records_per_view: 60, views, ..ConsoleConfig::default() };
    let console = Console::build(&config, 12).unwrap();
    let snap = console.view(ticket_view::VIEW_NAME).unwrap().snapshot_json().unwrap();

    let rows = snap["rows"].as_array().unwrap();
    assert!(!rows.is_empty());
    assert!(rows.iter().all(|r| r["status"] == TicketStatus::Open.as_str()));
    assert_eq!(snap["totalRecords"], 60);
}

#[test]
fn params_with_unknown_field_are_rejected() {
    let mut console = Console::build(&ConsoleConfig::default(), 1).unwrap();
    let view = console.view_mut("fraud").unwrap();
    let params = QueryParams {
        filters: [("colour".to_string(), "RED".to_string())].into_iter().collect(),
        ..QueryParams::default()
    };
    assert!(matches!(
        view.apply_params(&params),
        Err(ConsoleError::UnknownField { .. })
    ));
}

#[test]
fn data_dir_files_feed_their_views() {
    init_logging();
    let dir = scratch_dir("data-dir");
    let on_disk = loans(21, 4);
    fs::write(dir.join("loans.json"), serde_json::to_string(&on_disk).unwrap()).unwrap();
    fs::write(dir.join("agents.json"), "{ not json").unwrap();

    let config = ConsoleConfig {
        data_dir: Some(dir.display().to_string()),
        ..ConsoleConfig::default()
    };
    let console = Console::build(&config, 21).unwrap();

    let loans_view = console.view("loans").unwrap();
    assert!(matches!(loans_view.state(), LoadState::Ready { source } if source.starts_with("file:")));
    assert_eq!(loans_view.summary()["overdueLoans"], 4.0);

    // A malformed file degrades to the generated fixtures.
    let agents_view = console.view("agents").unwrap();
    assert!(matches!(agents_view.state(), LoadState::Degraded { .. }));
    assert_eq!(agents_view.table().rows.len(), 25);

    // No file at all: plain fixtures.
    assert!(matches!(
        console.view("kyc").unwrap().state(),
        LoadState::Ready { source } if source == "fixtures:kyc"
    ));

    fs::remove_dir_all(&dir).ok();
}

// ── IPC surface ──────────────────────────────────────────────────────────────

#[test]
fn snapshot_json_uses_wire_names() {
    let console = Console::build(&ConsoleConfig::default(), 8).unwrap();
    let snap = console.view("agents").unwrap().snapshot_json().unwrap();
    assert_eq!(snap["view"], "agents");
    assert_eq!(snap["state"]["state"], "ready");
    let first = &snap["rows"][0];
    assert!(first["performance"]["recoveryRate"].is_number());
    assert!(snap["summary"]["activeAgents"].is_number());
}
