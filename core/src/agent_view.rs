//! Collection-agent performance view.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    aggregate::AggregateSpec,
    error::{ConsoleError, ConsoleResult},
    query::{Query, SortDirection},
    record::{Record, RecordField, StatusRecord},
    types::{Category, RecordId},
    value::FieldValue,
};

pub const VIEW_NAME: &str = "agents";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AgentStatus {
    Active,
    Inactive,
    OnLeave,
}

impl Category for AgentStatus {
    fn as_str(&self) -> &'static str {
        match self {
            Self::Active   => "ACTIVE",
            Self::Inactive => "INACTIVE",
            Self::OnLeave  => "ON_LEAVE",
        }
    }

    fn all() -> &'static [Self] {
        &[Self::Active, Self::Inactive, Self::OnLeave]
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct AgentPerformance {
    /// Percentage of assigned overdue amount recovered.
    pub recovery_rate: f64,
    pub cases_assigned: u32,
    pub cases_resolved: u32,
    pub amount_collected: f64,
    pub target_amount: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CollectionAgent {
    pub id: RecordId,
    pub name: String,
    pub email: String,
    pub region: String,
    pub status: AgentStatus,
    #[serde(default)]
    pub performance: AgentPerformance,
    pub joined_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AgentField {
    Id,
    Name,
    Email,
    Region,
    Status,
    RecoveryRate,
    CasesAssigned,
    CasesResolved,
    AmountCollected,
    TargetAmount,
    JoinedAt,
}

impl AgentField {
    pub const ALL: &'static [AgentField] = &[
        Self::Id,
        Self::Name,
        Self::Email,
        Self::Region,
        Self::Status,
        Self::RecoveryRate,
        Self::CasesAssigned,
        Self::CasesResolved,
        Self::AmountCollected,
        Self::TargetAmount,
        Self::JoinedAt,
    ];
}

impl RecordField for AgentField {
    fn path(&self) -> &str {
        match self {
            Self::Id              => "id",
            Self::Name            => "name",
            Self::Email           => "email",
            Self::Region          => "region",
            Self::Status          => "status",
            Self::RecoveryRate    => "performance.recoveryRate",
            Self::CasesAssigned   => "performance.casesAssigned",
            Self::CasesResolved   => "performance.casesResolved",
            Self::AmountCollected => "performance.amountCollected",
            Self::TargetAmount    => "performance.targetAmount",
            Self::JoinedAt        => "joinedAt",
        }
    }

    fn parse(path: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|f| f.path() == path)
    }
}

impl Record for CollectionAgent {
    type Field = AgentField;

    fn id(&self) -> &str {
        &self.id
    }

    fn field(&self, field: &AgentField) -> FieldValue {
        let perf = &self.performance;
        match field {
            AgentField::Id              => FieldValue::text(self.id.as_str()),
            AgentField::Name            => FieldValue::text(self.name.as_str()),
            AgentField::Email           => FieldValue::text(self.email.as_str()),
            AgentField::Region          => FieldValue::text(self.region.as_str()),
            AgentField::Status          => FieldValue::category(self.status),
            AgentField::RecoveryRate    => FieldValue::Number(perf.recovery_rate),
            AgentField::CasesAssigned   => FieldValue::Number(f64::from(perf.cases_assigned)),
            AgentField::CasesResolved   => FieldValue::Number(f64::from(perf.cases_resolved)),
            AgentField::AmountCollected => FieldValue::Number(perf.amount_collected),
            AgentField::TargetAmount    => FieldValue::Number(perf.target_amount),
            AgentField::JoinedAt        => FieldValue::Timestamp(self.joined_at),
        }
    }

    fn search_fields() -> &'static [AgentField] {
        &[AgentField::Name, AgentField::Email, AgentField::Region]
    }
}

impl StatusRecord for CollectionAgent {
    fn status_field() -> AgentField {
        AgentField::Status
    }

    /// Agents move freely between statuses; none is terminal.
    fn with_status(&self, status: &str, _at: DateTime<Utc>) -> ConsoleResult<Self> {
        let next = AgentStatus::parse(status).ok_or_else(|| ConsoleError::InvalidStatus {
            view: VIEW_NAME.into(),
            status: status.into(),
        })?;
        Ok(Self { status: next, ..self.clone() })
    }
}

pub fn columns() -> Vec<AgentField> {
    vec![
        AgentField::Name,
        AgentField::Region,
        AgentField::Status,
        AgentField::RecoveryRate,
        AgentField::CasesResolved,
        AgentField::AmountCollected,
    ]
}

pub fn default_query() -> Query<AgentField> {
    Query::new().sort_by(AgentField::RecoveryRate, SortDirection::Descending)
}

/// Performance cards only count agents currently on the floor.
pub fn summary_cards() -> Vec<AggregateSpec<AgentField>> {
    let active = AgentStatus::Active.as_str();
    vec![
        AggregateSpec::count()
            .scoped(AgentField::Status, active)
            .named("activeAgents"),
        AggregateSpec::average(AgentField::RecoveryRate)
            .scoped(AgentField::Status, active)
            .named("avgRecoveryRate"),
        AggregateSpec::sum(AgentField::AmountCollected)
            .scoped(AgentField::Status, active)
            .named("totalCollected"),
        AggregateSpec::rate(AgentField::AmountCollected, AgentField::TargetAmount)
            .scoped(AgentField::Status, active)
            .named("targetAchievement"),
    ]
}
