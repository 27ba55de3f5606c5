//! Seeded fixture data for every view.
//!
//! The console ships without a backend; these generators stand in for the
//! record literals each admin page mounts with. All timestamps are offsets
//! from a fixed anchor date so the same seed always yields the same rows.

use chrono::{DateTime, Duration, Utc};

use crate::{
    agent_view::{AgentPerformance, AgentStatus, CollectionAgent},
    compliance_view::{ComplianceCategory, ComplianceRequirement, ComplianceStatus},
    fraud_view::{AlertStatus, AlertType, FraudAlert},
    kyc_view::{DocumentType, KycDocument, VerificationStatus},
    loan_view::{CollectionStatus, LoanProduct, OverdueLoan},
    name_generator::NameGenerator,
    rng::FixtureRng,
    ticket_view::{SupportTicket, TicketCategory, TicketStatus},
    types::{Category, RiskLevel},
};

const STAFF_DOMAIN: &str = "lendops.in";

/// 2025-06-30T00:00:00Z. "Now" for every generated record.
pub fn anchor() -> DateTime<Utc> {
    DateTime::<Utc>::UNIX_EPOCH + Duration::days(20_269)
}

fn days_before_anchor(rng: &mut FixtureRng, max_days: u64) -> DateTime<Utc> {
    let days = rng.next_u64_below(max_days.max(1)) as i64;
    let hours = rng.next_u64_below(24) as i64;
    anchor() - Duration::days(days) - Duration::hours(hours)
}

fn risk_for_days_overdue(days: u32) -> RiskLevel {
    match days {
        0..=14 => RiskLevel::Low,
        15..=44 => RiskLevel::Medium,
        45..=89 => RiskLevel::High,
        _ => RiskLevel::Critical,
    }
}

pub fn loans(rng: &mut FixtureRng, count: usize) -> Vec<OverdueLoan> {
    (0..count)
        .map(|i| {
            let principal = rng.amount_between(50_000.0, 1_500_000.0);
            let days_overdue = 1 + rng.next_u64_below(180) as u32;
            let status = *rng.pick(CollectionStatus::all());
            let outstanding = if status == CollectionStatus::Resolved {
                0.0
            } else {
                (principal * rng.amount_between(0.2, 0.95) * 100.0).round() / 100.0
            };
            OverdueLoan {
                id: format!("{}", i + 1),
                loan_number: format!("LN2025{:05}", 10_001 + i),
                borrower_name: NameGenerator::full_name(rng),
                branch: NameGenerator::branch(rng).to_string(),
                product: *rng.pick(LoanProduct::all()),
                principal,
                outstanding_amount: outstanding,
                emi_amount: (principal / 24.0 * 100.0).round() / 100.0,
                days_overdue,
                risk_category: risk_for_days_overdue(days_overdue),
                status,
                assigned_agent: rng.chance(0.7).then(|| NameGenerator::full_name(rng)),
                last_contact_date: rng.chance(0.6).then(|| days_before_anchor(rng, 30)),
                disbursed_at: days_before_anchor(rng, 900),
            }
        })
        .collect()
}

pub fn agents(rng: &mut FixtureRng, count: usize) -> Vec<CollectionAgent> {
    (0..count)
        .map(|i| {
            let name = NameGenerator::full_name(rng);
            let status = if rng.chance(0.75) {
                AgentStatus::Active
            } else {
                *rng.pick(&[AgentStatus::Inactive, AgentStatus::OnLeave])
            };
            let cases_assigned = 20 + rng.next_u64_below(80) as u32;
            let cases_resolved = rng.next_u64_below(u64::from(cases_assigned) + 1) as u32;
            let target_amount = rng.amount_between(500_000.0, 2_500_000.0);
            CollectionAgent {
                id: format!("AG{:03}", i + 1),
                email: NameGenerator::email_for(&name, STAFF_DOMAIN),
                name,
                region: NameGenerator::region(rng).to_string(),
                status,
                performance: AgentPerformance {
                    recovery_rate: rng.amount_between(40.0, 98.0),
                    cases_assigned,
                    cases_resolved,
                    amount_collected: (target_amount * rng.amount_between(0.3, 1.2) * 100.0)
                        .round()
                        / 100.0,
                    target_amount,
                },
                joined_at: days_before_anchor(rng, 1_500),
            }
        })
        .collect()
}

pub fn compliance_requirements(rng: &mut FixtureRng, count: usize) -> Vec<ComplianceRequirement> {
    const TITLES: &[(&str, &str, ComplianceCategory)] = &[
        ("Periodic KYC re-verification", "RBI", ComplianceCategory::Kyc),
        ("Suspicious transaction reporting", "FIU-IND", ComplianceCategory::Aml),
        ("Fair practices code disclosure", "RBI", ComplianceCategory::FairPractices),
        ("Customer data localisation", "RBI", ComplianceCategory::DataPrivacy),
        ("Cyber incident reporting", "CERT-In", ComplianceCategory::DataPrivacy),
        ("Quarterly NPA return", "RBI", ComplianceCategory::Reporting),
        ("Beneficial ownership identification", "FIU-IND", ComplianceCategory::Aml),
        ("Recovery agent code of conduct", "RBI", ComplianceCategory::FairPractices),
        ("Annual return filing", "MCA", ComplianceCategory::Reporting),
    ];

    (0..count)
        .map(|i| {
            let (title, regulator, category) = TITLES[i % TITLES.len()];
            let status = *rng.pick(ComplianceStatus::all());
            let completion = if status == ComplianceStatus::Compliant {
                100.0
            } else {
                rng.amount_between(0.0, 95.0)
            };
            let due_in_days = rng.next_u64_below(120) as i64 - 30;
            ComplianceRequirement {
                id: format!("CR{:03}", i + 1),
                title: title.to_string(),
                regulator: regulator.to_string(),
                category,
                status,
                priority: *rng.pick(RiskLevel::all()),
                owner: NameGenerator::full_name(rng),
                due_date: anchor() + Duration::days(due_in_days),
                completion_percentage: completion,
                last_audit_date: rng.chance(0.5).then(|| days_before_anchor(rng, 365)),
            }
        })
        .collect()
}

pub fn fraud_alerts(rng: &mut FixtureRng, count: usize) -> Vec<FraudAlert> {
    (0..count)
        .map(|i| {
            let risk_score = rng.amount_between(10.0, 99.0);
            let severity = match risk_score {
                s if s >= 85.0 => RiskLevel::Critical,
                s if s >= 65.0 => RiskLevel::High,
                s if s >= 40.0 => RiskLevel::Medium,
                _ => RiskLevel::Low,
            };
            FraudAlert {
                id: format!("FA{:04}", i + 1),
                application_id: format!("APP-{}", 700_000 + rng.next_u64_below(100_000)),
                customer_name: NameGenerator::full_name(rng),
                alert_type: *rng.pick(AlertType::all()),
                severity,
                status: *rng.pick(AlertStatus::all()),
                risk_score,
                amount_at_risk: rng.amount_between(10_000.0, 2_000_000.0),
                detected_at: days_before_anchor(rng, 60),
                assigned_to: rng.chance(0.6).then(|| NameGenerator::full_name(rng)),
            }
        })
        .collect()
}

pub fn kyc_documents(rng: &mut FixtureRng, count: usize) -> Vec<KycDocument> {
    (0..count)
        .map(|i| {
            let status = *rng.pick(VerificationStatus::all());
            let submitted_at = days_before_anchor(rng, 45);
            let decided = status != VerificationStatus::Pending;
            KycDocument {
                id: format!("KYC{:04}", i + 1),
                customer_id: format!("CUST{:06}", 100_000 + rng.next_u64_below(900_000)),
                customer_name: NameGenerator::full_name(rng),
                document_type: *rng.pick(DocumentType::all()),
                status,
                submitted_at,
                verified_at: decided.then(|| submitted_at + Duration::hours(2 + rng.next_u64_below(70) as i64)),
                verified_by: decided.then(|| NameGenerator::full_name(rng)),
                confidence_score: rng.amount_between(55.0, 99.9),
            }
        })
        .collect()
}

pub fn support_tickets(rng: &mut FixtureRng, count: usize) -> Vec<SupportTicket> {
    const SUBJECTS: &[(&str, TicketCategory)] = &[
        ("EMI debited twice this month", TicketCategory::PaymentIssue),
        ("Request for loan foreclosure statement", TicketCategory::LoanQuery),
        ("Unable to upload PAN card", TicketCategory::Document),
        ("App crashes on repayment screen", TicketCategory::Technical),
        ("Recovery agent called after hours", TicketCategory::Complaint),
        ("Interest rate change clarification", TicketCategory::LoanQuery),
        ("NACH mandate failed", TicketCategory::PaymentIssue),
    ];

    (0..count)
        .map(|i| {
            let (subject, category) = SUBJECTS[i % SUBJECTS.len()];
            let status = *rng.pick(TicketStatus::all());
            let created_at = days_before_anchor(rng, 30);
            let response_time_hours = rng.amount_between(0.5, 72.0);
            let closed = matches!(status, TicketStatus::Resolved | TicketStatus::Closed);
            SupportTicket {
                id: format!("TK{:05}", i + 1),
                subject: subject.to_string(),
                customer_name: NameGenerator::full_name(rng),
                category,
                priority: *rng.pick(RiskLevel::all()),
                status,
                assigned_agent: rng.chance(0.8).then(|| NameGenerator::full_name(rng)),
                created_at,
                updated_at: created_at + Duration::hours(rng.next_u64_below(96) as i64),
                response_time_hours,
                satisfaction_score: closed.then(|| rng.amount_between(1.0, 5.0)),
                sla_breached: response_time_hours > 48.0,
            }
        })
        .collect()
}
