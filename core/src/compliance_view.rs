//! Regulatory compliance requirements tracker.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    aggregate::AggregateSpec,
    error::{ConsoleError, ConsoleResult},
    query::{Query, SortDirection},
    record::{Record, RecordField, StatusRecord},
    types::{Category, RecordId, RiskLevel},
    value::FieldValue,
};

pub const VIEW_NAME: &str = "compliance";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ComplianceCategory {
    Kyc,
    Aml,
    FairPractices,
    DataPrivacy,
    Reporting,
}

impl Category for ComplianceCategory {
    fn as_str(&self) -> &'static str {
        match self {
            Self::Kyc           => "KYC",
            Self::Aml           => "AML",
            Self::FairPractices => "FAIR_PRACTICES",
            Self::DataPrivacy   => "DATA_PRIVACY",
            Self::Reporting     => "REPORTING",
        }
    }

    fn all() -> &'static [Self] {
        &[
            Self::Kyc,
            Self::Aml,
            Self::FairPractices,
            Self::DataPrivacy,
            Self::Reporting,
        ]
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ComplianceStatus {
    Compliant,
    NonCompliant,
    InProgress,
    PendingReview,
}

impl Category for ComplianceStatus {
    fn as_str(&self) -> &'static str {
        match self {
            Self::Compliant     => "COMPLIANT",
            Self::NonCompliant  => "NON_COMPLIANT",
            Self::InProgress    => "IN_PROGRESS",
            Self::PendingReview => "PENDING_REVIEW",
        }
    }

    fn all() -> &'static [Self] {
        &[
            Self::Compliant,
            Self::NonCompliant,
            Self::InProgress,
            Self::PendingReview,
        ]
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ComplianceRequirement {
    pub id: RecordId,
    pub title: String,
    pub regulator: String,
    pub category: ComplianceCategory,
    pub status: ComplianceStatus,
    pub priority: RiskLevel,
    pub owner: String,
    pub due_date: DateTime<Utc>,
    /// 0–100.
    pub completion_percentage: f64,
    #[serde(default)]
    pub last_audit_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComplianceField {
    Id,
    Title,
    Regulator,
    Category,
    Status,
    Priority,
    Owner,
    DueDate,
    CompletionPercentage,
    LastAuditDate,
}

impl ComplianceField {
    pub const ALL: &'static [ComplianceField] = &[
        Self::Id,
        Self::Title,
        Self::Regulator,
        Self::Category,
        Self::Status,
        Self::Priority,
        Self::Owner,
        Self::DueDate,
        Self::CompletionPercentage,
        Self::LastAuditDate,
    ];
}

impl RecordField for ComplianceField {
    fn path(&self) -> &str {
        match self {
            Self::Id                   => "id",
            Self::Title                => "title",
            Self::Regulator            => "regulator",
            Self::Category             => "category",
            Self::Status               => "status",
            Self::Priority             => "priority",
            Self::Owner                => "owner",
            Self::DueDate              => "dueDate",
            Self::CompletionPercentage => "completionPercentage",
            Self::LastAuditDate        => "lastAuditDate",
        }
    }

    fn parse(path: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|f| f.path() == path)
    }
}

impl Record for ComplianceRequirement {
    type Field = ComplianceField;

    fn id(&self) -> &str {
        &self.id
    }

    fn field(&self, field: &ComplianceField) -> FieldValue {
        match field {
            ComplianceField::Id                   => FieldValue::text(self.id.as_str()),
            ComplianceField::Title                => FieldValue::text(self.title.as_str()),
            ComplianceField::Regulator            => FieldValue::text(self.regulator.as_str()),
            ComplianceField::Category             => FieldValue::category(self.category),
            ComplianceField::Status               => FieldValue::category(self.status),
            ComplianceField::Priority             => FieldValue::category(self.priority),
            ComplianceField::Owner                => FieldValue::text(self.owner.as_str()),
            ComplianceField::DueDate              => FieldValue::Timestamp(self.due_date),
            ComplianceField::CompletionPercentage => FieldValue::Number(self.completion_percentage),
            ComplianceField::LastAuditDate        => FieldValue::optional_timestamp(self.last_audit_date),
        }
    }

    fn search_fields() -> &'static [ComplianceField] {
        &[ComplianceField::Title, ComplianceField::Regulator, ComplianceField::Owner]
    }
}

impl StatusRecord for ComplianceRequirement {
    fn status_field() -> ComplianceField {
        ComplianceField::Status
    }

    /// Marking a requirement compliant completes it and stamps the audit date.
    fn with_status(&self, status: &str, at: DateTime<Utc>) -> ConsoleResult<Self> {
        let next = ComplianceStatus::parse(status).ok_or_else(|| ConsoleError::InvalidStatus {
            view: VIEW_NAME.into(),
            status: status.into(),
        })?;
        let mut updated = self.clone();
        updated.status = next;
        if next == ComplianceStatus::Compliant {
            updated.completion_percentage = 100.0;
            updated.last_audit_date = Some(at);
        }
        Ok(updated)
    }
}

pub fn columns() -> Vec<ComplianceField> {
    vec![
        ComplianceField::Title,
        ComplianceField::Regulator,
        ComplianceField::Category,
        ComplianceField::Priority,
        ComplianceField::Status,
        ComplianceField::DueDate,
        ComplianceField::CompletionPercentage,
    ]
}

/// Nearest deadline first.
pub fn default_query() -> Query<ComplianceField> {
    Query::new().sort_by(ComplianceField::DueDate, SortDirection::Ascending)
}

pub fn summary_cards() -> Vec<AggregateSpec<ComplianceField>> {
    vec![
        AggregateSpec::count().named("totalRequirements"),
        AggregateSpec::count()
            .scoped(ComplianceField::Status, ComplianceStatus::Compliant.as_str())
            .named("compliant"),
        AggregateSpec::count()
            .scoped(ComplianceField::Status, ComplianceStatus::NonCompliant.as_str())
            .named("nonCompliant"),
        AggregateSpec::average(ComplianceField::CompletionPercentage).named("avgCompletion"),
    ]
}
