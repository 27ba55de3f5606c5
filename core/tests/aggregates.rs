use lendops_core::{
    aggregate::{compute_aggregates, group_aggregates, AggregateSpec},
    dynamic_record::{DynamicRecord, FieldPath},
    loan_view::{self, LoanField},
    query::Query,
    rng::{RngBank, ViewSlot},
    fixtures,
};
use serde_json::json;

// ── Helpers ──────────────────────────────────────────────────────────────────

fn agents() -> Vec<DynamicRecord> {
    [
        json!({ "id": "1", "status": "ACTIVE",   "performance": { "recoveryRate": 92.5, "collected": 900.0, "target": 1000.0 } }),
        json!({ "id": "2", "status": "ACTIVE",   "performance": { "recoveryRate": 78.0, "collected": 300.0, "target": 1000.0 } }),
        json!({ "id": "3", "status": "INACTIVE", "performance": { "recoveryRate": 10.0, "collected": 0.0,   "target": 500.0 } }),
    ]
    .into_iter()
    .map(|v| DynamicRecord::from_json(v).unwrap())
    .collect()
}

fn path(p: &str) -> FieldPath {
    FieldPath::new(p)
}

// ── Tests ────────────────────────────────────────────────────────────────────

/// Summary cards for the agent page only consider ACTIVE agents.
#[test]
fn active_agent_average_recovery_rate() {
    let specs = [AggregateSpec::average(path("performance.recoveryRate"))
        .scoped(path("status"), "ACTIVE")
        .named("avgRecoveryRate")];
    let out = compute_aggregates(&agents(), &specs);
    assert_eq!(out["avgRecoveryRate"], 85.25);
}

#[test]
fn average_of_empty_set_is_zero() {
    let empty: Vec<DynamicRecord> = Vec::new();
    let out = compute_aggregates(&empty, &[AggregateSpec::average(path("x"))]);
    assert_eq!(out.len(), 1);
    assert_eq!(out["x_avg"], 0.0);
}

#[test]
fn every_reducer_is_zero_safe() {
    let empty: Vec<DynamicRecord> = Vec::new();
    let specs = [
        AggregateSpec::count(),
        AggregateSpec::sum(path("amount")),
        AggregateSpec::average(path("amount")),
        AggregateSpec::rate(path("paid"), path("due")),
        AggregateSpec::rate_per_record(path("flagged")),
    ];
    let out = compute_aggregates(&empty, &specs);
    assert_eq!(out.len(), 5);
    assert!(out.values().all(|v| *v == 0.0), "got {out:?}");

    // A scope that matches nothing behaves like an empty set.
    let scoped = [AggregateSpec::average(path("performance.recoveryRate")).scoped(path("status"), "ON_LEAVE")];
    let out = compute_aggregates(&agents(), &scoped);
    assert_eq!(out["performance.recoveryRate_avg"], 0.0);
}

#[test]
fn default_names_follow_field_paths() {
    let specs = [
        AggregateSpec::count(),
        AggregateSpec::sum(path("performance.collected")),
        AggregateSpec::rate(path("performance.collected"), path("performance.target")),
    ];
    let out = compute_aggregates(&agents(), &specs);
    assert_eq!(out["count"], 3.0);
    assert_eq!(out["performance.collected_sum"], 1200.0);
    assert_eq!(out["performance.collected_performance.target_rate"], 48.0);
}

#[test]
fn rate_is_a_percentage_of_scoped_sums() {
    let specs = [AggregateSpec::rate(path("performance.collected"), path("performance.target"))
        .scoped(path("status"), "ACTIVE")
        .named("targetAchievement")];
    let out = compute_aggregates(&agents(), &specs);
    assert_eq!(out["targetAchievement"], 60.0);
}

#[test]
fn rate_per_record_counts_flags() {
    let set: Vec<DynamicRecord> = [
        json!({ "id": "1", "breached": true }),
        json!({ "id": "2", "breached": false }),
        json!({ "id": "3", "breached": true }),
        json!({ "id": "4" }),
    ]
    .into_iter()
    .map(|v| DynamicRecord::from_json(v).unwrap())
    .collect();
    let out = compute_aggregates(&set, &[AggregateSpec::rate_per_record(path("breached"))]);
    assert_eq!(out["breached_rate"], 50.0);
}

#[test]
fn present_only_skips_missing_values() {
    let set: Vec<DynamicRecord> = [
        json!({ "id": "1", "rating": 4.0 }),
        json!({ "id": "2" }),
        json!({ "id": "3", "rating": 2.0 }),
        json!({ "id": "4", "rating": null }),
    ]
    .into_iter()
    .map(|v| DynamicRecord::from_json(v).unwrap())
    .collect();
    let specs = [
        AggregateSpec::average(path("rating")).named("withGaps"),
        AggregateSpec::average(path("rating")).present_only().named("rated"),
        AggregateSpec::count().present_only().named("count"),
    ];
    let out = compute_aggregates(&set, &specs);
    assert_eq!(out["withGaps"], 1.5);
    assert_eq!(out["rated"], 3.0);
    // Count has no reduced field, so nothing is skipped.
    assert_eq!(out["count"], 4.0);
}

/// Aggregates depend only on the multiset of values, not record order.
#[test]
fn aggregates_are_order_independent() {
    let bank = RngBank::new(2024);
    let loans = fixtures::loans(&mut bank.for_view(ViewSlot::Loans), 300);
    let specs = loan_view::summary_cards();
    let baseline = compute_aggregates(&loans, &specs);

    let mut shuffler = bank.for_view(ViewSlot::Agents);
    for _ in 0..10 {
        let mut permuted = loans.clone();
        shuffler.shuffle(&mut permuted);
        assert_eq!(compute_aggregates(&permuted, &specs), baseline);
    }
}

/// Cards summarise the whole book, whatever the table is showing.
#[test]
fn aggregates_ignore_the_current_query() {
    let bank = RngBank::new(5);
    let loans = fixtures::loans(&mut bank.for_view(ViewSlot::Loans), 50);
    let query = Query::new().filter_eq(LoanField::RiskCategory, "LOW");
    let visible = lendops_core::pipeline::filter_records(&loans, &query);
    assert!(visible.len() < loans.len());

    let out = compute_aggregates(&loans, &loan_view::summary_cards());
    assert_eq!(out["overdueLoans"], loans.len() as f64);
}

#[test]
fn branch_breakdown_partitions_the_book() {
    let bank = RngBank::new(77);
    let loans = fixtures::loans(&mut bank.for_view(ViewSlot::Loans), 120);
    let breakdown = loan_view::branch_breakdown(&loans);

    let total: f64 = breakdown.values().map(|a| a["loans"]).sum();
    assert_eq!(total, 120.0);

    for (branch, agg) in &breakdown {
        let members: Vec<_> = loans.iter().filter(|l| &l.branch == branch).collect();
        assert_eq!(agg["loans"], members.len() as f64);
        let max_days = members.iter().map(|l| l.days_overdue).max().unwrap_or(0);
        assert!(agg["avgDaysOverdue"] <= f64::from(max_days));
    }
}

#[test]
fn group_aggregates_skip_records_without_group() {
    let set: Vec<DynamicRecord> = [
        json!({ "id": "1", "branch": "Pune",   "amount": 10.0 }),
        json!({ "id": "2", "branch": "Pune",   "amount": 30.0 }),
        json!({ "id": "3", "branch": "Mumbai", "amount": 5.0 }),
        json!({ "id": "4", "amount": 99.0 }),
    ]
    .into_iter()
    .map(|v| DynamicRecord::from_json(v).unwrap())
    .collect();
    let groups = group_aggregates(&set, &path("branch"), &[AggregateSpec::sum(path("amount"))]);
    assert_eq!(groups.len(), 2);
    assert_eq!(groups["Pune"]["amount_sum"], 40.0);
    assert_eq!(groups["Mumbai"]["amount_sum"], 5.0);
}
