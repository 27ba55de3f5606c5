//! Fraud detection alert queue.

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

pub const VIEW_NAME: &str = "fraud";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AlertType {
    IdentityTheft,
    DocumentForgery,
    VelocityAnomaly,
    SyntheticIdentity,
    AccountTakeover,
}

impl Category for AlertType {
    fn as_str(&self) -> &'static str {
        match self {
            Self::IdentityTheft     => "IDENTITY_THEFT",
            Self::DocumentForgery   => "DOCUMENT_FORGERY",
            Self::VelocityAnomaly   => "VELOCITY_ANOMALY",
            Self::SyntheticIdentity => "SYNTHETIC_IDENTITY",
            Self::AccountTakeover   => "ACCOUNT_TAKEOVER",
        }
    }

    fn all() -> &'static [Self] {
        &[
            Self::IdentityTheft,
            Self::DocumentForgery,
            Self::VelocityAnomaly,
            Self::SyntheticIdentity,
            Self::AccountTakeover,
        ]
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AlertStatus {
    Open,
    Investigating,
    Confirmed,
    FalsePositive,
    Resolved,
}

impl AlertStatus {
    /// Closed alerts cannot be reopened from the console.
    pub fn is_closed(&self) -> bool {
        matches!(self, Self::FalsePositive | Self::Resolved)
    }
}

impl Category for AlertStatus {
    fn as_str(&self) -> &'static str {
        match self {
            Self::Open          => "OPEN",
            Self::Investigating => "INVESTIGATING",
            Self::Confirmed     => "CONFIRMED",
            Self::FalsePositive => "FALSE_POSITIVE",
            Self::Resolved      => "RESOLVED",
        }
    }

    fn all() -> &'static [Self] {
        &[
            Self::Open,
            Self::Investigating,
            Self::Confirmed,
            Self::FalsePositive,
            Self::Resolved,
        ]
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FraudAlert {
    pub id: RecordId,
    pub application_id: String,
    pub customer_name: String,
    pub alert_type: AlertType,
    pub severity: RiskLevel,
    pub status: AlertStatus,
    /// Model score, 0–100.
    pub risk_score: f64,
    pub amount_at_risk: f64,
    pub detected_at: DateTime<Utc>,
    #[serde(default)]
    pub assigned_to: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FraudField {
    Id,
    ApplicationId,
    CustomerName,
    AlertType,
    Severity,
    Status,
    RiskScore,
    AmountAtRisk,
    DetectedAt,
    AssignedTo,
}

impl FraudField {
    pub const ALL: &'static [FraudField] = &[
        Self::Id,
        Self::ApplicationId,
        Self::CustomerName,
        Self::AlertType,
        Self::Severity,
        Self::Status,
        Self::RiskScore,
        Self::AmountAtRisk,
        Self::DetectedAt,
        Self::AssignedTo,
    ];
}

impl RecordField for FraudField {
    fn path(&self) -> &str {
        match self {
            Self::Id            => "id",
            Self::ApplicationId => "applicationId",
            Self::CustomerName  => "customerName",
            Self::AlertType     => "alertType",
            Self::Severity      => "severity",
            Self::Status        => "status",
            Self::RiskScore     => "riskScore",
            Self::AmountAtRisk  => "amountAtRisk",
            Self::DetectedAt    => "detectedAt",
            Self::AssignedTo    => "assignedTo",
        }
    }

    fn parse(path: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|f| f.path() == path)
    }
}

impl Record for FraudAlert {
    type Field = FraudField;

    fn id(&self) -> &str {
        &self.id
    }

    fn field(&self, field: &FraudField) -> FieldValue {
        match field {
            FraudField::Id            => FieldValue::text(self.id.as_str()),
            FraudField::ApplicationId => FieldValue::text(self.application_id.as_str()),
            FraudField::CustomerName  => FieldValue::text(self.customer_name.as_str()),
            FraudField::AlertType     => FieldValue::category(self.alert_type),
            FraudField::Severity      => FieldValue::category(self.severity),
            FraudField::Status        => FieldValue::category(self.status),
            FraudField::RiskScore     => FieldValue::Number(self.risk_score),
            FraudField::AmountAtRisk  => FieldValue::Number(self.amount_at_risk),
            FraudField::DetectedAt    => FieldValue::Timestamp(self.detected_at),
            FraudField::AssignedTo    => FieldValue::optional_text(self.assigned_to.as_deref()),
        }
    }

    fn search_fields() -> &'static [FraudField] {
        &[FraudField::CustomerName, FraudField::ApplicationId, FraudField::AssignedTo]
    }
}

impl StatusRecord for FraudAlert {
    fn status_field() -> FraudField {
        FraudField::Status
    }

    fn with_status(&self, status: &str, _at: DateTime<Utc>) -> ConsoleResult<Self> {
        let next = AlertStatus::parse(status).ok_or_else(|| ConsoleError::InvalidStatus {
            view: VIEW_NAME.into(),
            status: status.into(),
        })?;
        if self.status.is_closed() && next != self.status {
            return Err(ConsoleError::InvalidTransition {
                view: VIEW_NAME.into(),
                id: self.id.clone(),
                from: self.status.as_str().into(),
                to: next.as_str().into(),
            });
        }
        let mut updated = self.clone();
        updated.status = next;
        // A false positive releases the exposure it was holding.
        if next == AlertStatus::FalsePositive {
            updated.amount_at_risk = 0.0;
        }
        Ok(updated)
    }
}

pub fn columns() -> Vec<FraudField> {
    vec![
        FraudField::ApplicationId,
        FraudField::CustomerName,
        FraudField::AlertType,
        FraudField::Severity,
        FraudField::RiskScore,
        FraudField::Status,
        FraudField::DetectedAt,
    ]
}

pub fn default_query() -> Query<FraudField> {
    Query::new().sort_by(FraudField::RiskScore, SortDirection::Descending)
}

pub fn summary_cards() -> Vec<AggregateSpec<FraudField>> {
    vec![
        AggregateSpec::count()
            .scoped(FraudField::Status, AlertStatus::Open.as_str())
            .named("openAlerts"),
        AggregateSpec::count()
            .scoped(FraudField::Severity, RiskLevel::Critical.as_str())
            .named("criticalAlerts"),
        AggregateSpec::sum(FraudField::AmountAtRisk).named("amountAtRisk"),
        AggregateSpec::average(FraudField::RiskScore).named("avgRiskScore"),
    ]
}
