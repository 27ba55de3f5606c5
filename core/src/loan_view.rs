//! Overdue-loan collections view.
//!
//! Rows are loans past their EMI due date. Summary cards cover the whole
//! overdue book; `branch_breakdown` feeds the per-branch table.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::{
    aggregate::{group_aggregates, AggregateSpec, Aggregates},
    error::{ConsoleError, ConsoleResult},
    query::{Query, SortDirection},
    record::{Record, RecordField, StatusRecord},
    types::{Category, RecordId, RiskLevel},
    value::FieldValue,
};

pub const VIEW_NAME: &str = "loans";

// ── Categories ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LoanProduct {
    Personal,
    Business,
    Gold,
    Vehicle,
    Home,
}

impl Category for LoanProduct {
    fn as_str(&self) -> &'static str {
        match self {
            Self::Personal => "PERSONAL",
            Self::Business => "BUSINESS",
            Self::Gold     => "GOLD",
            Self::Vehicle  => "VEHICLE",
            Self::Home     => "HOME",
        }
    }

    fn all() -> &'static [Self] {
        &[Self::Personal, Self::Business, Self::Gold, Self::Vehicle, Self::Home]
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CollectionStatus {
    Pending,
    InProgress,
    PromiseToPay,
    Resolved,
    WrittenOff,
}

impl CollectionStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Resolved | Self::WrittenOff)
    }
}

impl Category for CollectionStatus {
    fn as_str(&self) -> &'static str {
        match self {
            Self::Pending      => "PENDING",
            Self::InProgress   => "IN_PROGRESS",
            Self::PromiseToPay => "PROMISE_TO_PAY",
            Self::Resolved     => "RESOLVED",
            Self::WrittenOff   => "WRITTEN_OFF",
        }
    }

    fn all() -> &'static [Self] {
        &[
            Self::Pending,
            Self::InProgress,
            Self::PromiseToPay,
            Self::Resolved,
            Self::WrittenOff,
        ]
    }
}

// ── Record ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OverdueLoan {
    pub id: RecordId,
    pub loan_number: String,
    pub borrower_name: String,
    pub branch: String,
    pub product: LoanProduct,
    pub principal: f64,
    pub outstanding_amount: f64,
    pub emi_amount: f64,
    pub days_overdue: u32,
    pub risk_category: RiskLevel,
    pub status: CollectionStatus,
    #[serde(default)]
    pub assigned_agent: Option<String>,
    #[serde(default)]
    pub last_contact_date: Option<DateTime<Utc>>,
    pub disbursed_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LoanField {
    Id,
    LoanNumber,
    BorrowerName,
    Branch,
    Product,
    Principal,
    OutstandingAmount,
    EmiAmount,
    DaysOverdue,
    RiskCategory,
    Status,
    AssignedAgent,
    LastContactDate,
    DisbursedAt,
}

impl LoanField {
    pub const ALL: &'static [LoanField] = &[
        Self::Id,
        Self::LoanNumber,
        Self::BorrowerName,
        Self::Branch,
        Self::Product,
        Self::Principal,
        Self::OutstandingAmount,
        Self::EmiAmount,
        Self::DaysOverdue,
        Self::RiskCategory,
        Self::Status,
        Self::AssignedAgent,
        Self::LastContactDate,
        Self::DisbursedAt,
    ];
}

impl RecordField for LoanField {
    fn path(&self) -> &str {
        match self {
            Self::Id                => "id",
            Self::LoanNumber        => "loanNumber",
            Self::BorrowerName      => "borrowerName",
            Self::Branch            => "branch",
            Self::Product           => "product",
            Self::Principal         => "principal",
            Self::OutstandingAmount => "outstandingAmount",
            Self::EmiAmount         => "emiAmount",
            Self::DaysOverdue       => "daysOverdue",
            Self::RiskCategory      => "riskCategory",
            Self::Status            => "status",
            Self::AssignedAgent     => "assignedAgent",
            Self::LastContactDate   => "lastContactDate",
            Self::DisbursedAt       => "disbursedAt",
        }
    }

    fn parse(path: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|f| f.path() == path)
    }
}

impl Record for OverdueLoan {
    type Field = LoanField;

    fn id(&self) -> &str {
        &self.id
    }

    fn field(&self, field: &LoanField) -> FieldValue {
        match field {
            LoanField::Id                => FieldValue::text(self.id.as_str()),
            LoanField::LoanNumber        => FieldValue::text(self.loan_number.as_str()),
            LoanField::BorrowerName      => FieldValue::text(self.borrower_name.as_str()),
            LoanField::Branch            => FieldValue::text(self.branch.as_str()),
            LoanField::Product           => FieldValue::category(self.product),
            LoanField::Principal         => FieldValue::Number(self.principal),
            LoanField::OutstandingAmount => FieldValue::Number(self.outstanding_amount),
            LoanField::EmiAmount         => FieldValue::Number(self.emi_amount),
            LoanField::DaysOverdue       => FieldValue::Number(f64::from(self.days_overdue)),
            LoanField::RiskCategory      => FieldValue::category(self.risk_category),
            LoanField::Status            => FieldValue::category(self.status),
            LoanField::AssignedAgent     => FieldValue::optional_text(self.assigned_agent.as_deref()),
            LoanField::LastContactDate   => FieldValue::optional_timestamp(self.last_contact_date),
            LoanField::DisbursedAt       => FieldValue::Timestamp(self.disbursed_at),
        }
    }

    fn search_fields() -> &'static [LoanField] {
        &[LoanField::BorrowerName, LoanField::LoanNumber, LoanField::AssignedAgent]
    }
}

impl StatusRecord for OverdueLoan {
    fn status_field() -> LoanField {
        LoanField::Status
    }

    fn with_status(&self, status: &str, at: DateTime<Utc>) -> ConsoleResult<Self> {
        let next = CollectionStatus::parse(status).ok_or_else(|| ConsoleError::InvalidStatus {
            view: VIEW_NAME.into(),
            status: status.into(),
        })?;
        if self.status.is_terminal() && next != self.status {
            return Err(ConsoleError::InvalidTransition {
                view: VIEW_NAME.into(),
                id: self.id.clone(),
                from: self.status.as_str().into(),
                to: next.as_str().into(),
            });
        }
        let mut updated = self.clone();
        updated.status = next;
        // Any agent action on the case counts as contact.
        if matches!(next, CollectionStatus::InProgress | CollectionStatus::PromiseToPay) {
            updated.last_contact_date = Some(at);
        }
        if next == CollectionStatus::Resolved {
            updated.outstanding_amount = 0.0;
        }
        Ok(updated)
    }
}

// ── View wiring ──────────────────────────────────────────────────────────────

pub fn columns() -> Vec<LoanField> {
    vec![
        LoanField::LoanNumber,
        LoanField::BorrowerName,
        LoanField::Branch,
        LoanField::OutstandingAmount,
        LoanField::DaysOverdue,
        LoanField::RiskCategory,
        LoanField::Status,
    ]
}

/// Worst cases first.
pub fn default_query() -> Query<LoanField> {
    Query::new().sort_by(LoanField::DaysOverdue, SortDirection::Descending)
}

pub fn summary_cards() -> Vec<AggregateSpec<LoanField>> {
    vec![
        AggregateSpec::count().named("overdueLoans"),
        AggregateSpec::sum(LoanField::OutstandingAmount).named("totalOutstanding"),
        AggregateSpec::average(LoanField::DaysOverdue).named("avgDaysOverdue"),
        AggregateSpec::count()
            .scoped(LoanField::RiskCategory, RiskLevel::Critical.as_str())
            .named("criticalCases"),
    ]
}

/// Per-branch count, outstanding total and average days overdue.
pub fn branch_breakdown(loans: &[OverdueLoan]) -> BTreeMap<String, Aggregates> {
    let specs = [
        AggregateSpec::count().named("loans"),
        AggregateSpec::sum(LoanField::OutstandingAmount).named("outstanding"),
        AggregateSpec::average(LoanField::DaysOverdue).named("avgDaysOverdue"),
    ];
    group_aggregates(loans, &LoanField::Branch, &specs)
}
