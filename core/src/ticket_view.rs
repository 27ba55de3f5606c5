//! Support-agent ticket queue.

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

pub const VIEW_NAME: &str = "tickets";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TicketCategory {
    LoanQuery,
    PaymentIssue,
    Document,
    Technical,
    Complaint,
}

impl Category for TicketCategory {
    fn as_str(&self) -> &'static str {
        match self {
            Self::LoanQuery    => "LOAN_QUERY",
            Self::PaymentIssue => "PAYMENT_ISSUE",
            Self::Document     => "DOCUMENT",
            Self::Technical    => "TECHNICAL",
            Self::Complaint    => "COMPLAINT",
        }
    }

    fn all() -> &'static [Self] {
        &[
            Self::LoanQuery,
            Self::PaymentIssue,
            Self::Document,
            Self::Technical,
            Self::Complaint,
        ]
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TicketStatus {
    Open,
    InProgress,
    WaitingOnCustomer,
    Resolved,
    Closed,
}

impl Category for TicketStatus {
    fn as_str(&self) -> &'static str {
        match self {
            Self::Open              => "OPEN",
            Self::InProgress        => "IN_PROGRESS",
            Self::WaitingOnCustomer => "WAITING_ON_CUSTOMER",
            Self::Resolved          => "RESOLVED",
            Self::Closed            => "CLOSED",
        }
    }

    fn all() -> &'static [Self] {
        &[
            Self::Open,
            Self::InProgress,
            Self::WaitingOnCustomer,
            Self::Resolved,
            Self::Closed,
        ]
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SupportTicket {
    pub id: RecordId,
    pub subject: String,
    pub customer_name: String,
    pub category: TicketCategory,
    pub priority: RiskLevel,
    pub status: TicketStatus,
    #[serde(default)]
    pub assigned_agent: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub response_time_hours: f64,
    #[serde(default)]
    pub satisfaction_score: Option<f64>,
    #[serde(default)]
    pub sla_breached: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TicketField {
    Id,
    Subject,
    CustomerName,
    Category,
    Priority,
    Status,
    AssignedAgent,
    CreatedAt,
    UpdatedAt,
    ResponseTimeHours,
    SatisfactionScore,
    SlaBreached,
}

impl TicketField {
    pub const ALL: &'static [TicketField] = &[
        Self::Id,
        Self::Subject,
        Self::CustomerName,
        Self::Category,
        Self::Priority,
        Self::Status,
        Self::AssignedAgent,
        Self::CreatedAt,
        Self::UpdatedAt,
        Self::ResponseTimeHours,
        Self::SatisfactionScore,
        Self::SlaBreached,
    ];
}

impl RecordField for TicketField {
    fn path(&self) -> &str {
        match self {
            Self::Id                => "id",
            Self::Subject           => "subject",
            Self::CustomerName      => "customerName",
            Self::Category          => "category",
            Self::Priority          => "priority",
            Self::Status            => "status",
            Self::AssignedAgent     => "assignedAgent",
            Self::CreatedAt         => "createdAt",
            Self::UpdatedAt         => "updatedAt",
            Self::ResponseTimeHours => "responseTimeHours",
            Self::SatisfactionScore => "satisfactionScore",
            Self::SlaBreached       => "slaBreached",
        }
    }

    fn parse(path: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|f| f.path() == path)
    }
}

impl Record for SupportTicket {
    type Field = TicketField;

    fn id(&self) -> &str {
        &self.id
    }

    fn field(&self, field: &TicketField) -> FieldValue {
        match field {
            TicketField::Id                => FieldValue::text(self.id.as_str()),
            TicketField::Subject           => FieldValue::text(self.subject.as_str()),
            TicketField::CustomerName      => FieldValue::text(self.customer_name.as_str()),
            TicketField::Category          => FieldValue::category(self.category),
            TicketField::Priority          => FieldValue::category(self.priority),
            TicketField::Status            => FieldValue::category(self.status),
            TicketField::AssignedAgent     => FieldValue::optional_text(self.assigned_agent.as_deref()),
            TicketField::CreatedAt         => FieldValue::Timestamp(self.created_at),
            TicketField::UpdatedAt         => FieldValue::Timestamp(self.updated_at),
            TicketField::ResponseTimeHours => FieldValue::Number(self.response_time_hours),
            TicketField::SatisfactionScore => FieldValue::optional_number(self.satisfaction_score),
            TicketField::SlaBreached       => FieldValue::Bool(self.sla_breached),
        }
    }

    fn search_fields() -> &'static [TicketField] {
        &[TicketField::Subject, TicketField::CustomerName, TicketField::AssignedAgent]
    }
}

impl StatusRecord for SupportTicket {
    fn status_field() -> TicketField {
        TicketField::Status
    }

    /// Closed is terminal; resolved tickets may still be reopened.
    fn with_status(&self, status: &str, at: DateTime<Utc>) -> ConsoleResult<Self> {
        let next = TicketStatus::parse(status).ok_or_else(|| ConsoleError::InvalidStatus {
            view: VIEW_NAME.into(),
            status: status.into(),
        })?;
        if self.status == TicketStatus::Closed && next != self.status {
            return Err(ConsoleError::InvalidTransition {
                view: VIEW_NAME.into(),
                id: self.id.clone(),
                from: self.status.as_str().into(),
                to: next.as_str().into(),
            });
        }
        Ok(Self {
            status: next,
            updated_at: at,
            ..self.clone()
        })
    }
}

pub fn columns() -> Vec<TicketField> {
    vec![
        TicketField::Subject,
        TicketField::CustomerName,
        TicketField::Category,
        TicketField::Priority,
        TicketField::Status,
        TicketField::AssignedAgent,
        TicketField::CreatedAt,
    ]
}

pub fn default_query() -> Query<TicketField> {
    Query::new().sort_by(TicketField::CreatedAt, SortDirection::Descending)
}

pub fn summary_cards() -> Vec<AggregateSpec<TicketField>> {
    vec![
        AggregateSpec::count()
            .scoped(TicketField::Status, TicketStatus::Open.as_str())
            .named("openTickets"),
        AggregateSpec::average(TicketField::ResponseTimeHours).named("avgResponseHours"),
        AggregateSpec::average(TicketField::SatisfactionScore)
            .scoped(TicketField::Status, TicketStatus::Resolved.as_str())
            .present_only()
            .named("avgSatisfaction"),
        AggregateSpec::count()
            .scoped(TicketField::Status, TicketStatus::Resolved.as_str())
            .named("resolved"),
        AggregateSpec::rate_per_record(TicketField::SlaBreached).named("slaBreachRate"),
    ]
}
