//! KYC document verification queue.

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

pub const VIEW_NAME: &str = "kyc";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DocumentType {
    Aadhaar,
    Pan,
    Passport,
    VoterId,
    DrivingLicense,
    BankStatement,
}

impl Category for DocumentType {
    fn as_str(&self) -> &'static str {
        match self {
            Self::Aadhaar        => "AADHAAR",
            Self::Pan            => "PAN",
            Self::Passport       => "PASSPORT",
            Self::VoterId        => "VOTER_ID",
            Self::DrivingLicense => "DRIVING_LICENSE",
            Self::BankStatement  => "BANK_STATEMENT",
        }
    }

    fn all() -> &'static [Self] {
        &[
            Self::Aadhaar,
            Self::Pan,
            Self::Passport,
            Self::VoterId,
            Self::DrivingLicense,
            Self::BankStatement,
        ]
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VerificationStatus {
    Pending,
    Verified,
    Rejected,
    Expired,
}

impl Category for VerificationStatus {
    fn as_str(&self) -> &'static str {
        match self {
            Self::Pending  => "PENDING",
            Self::Verified => "VERIFIED",
            Self::Rejected => "REJECTED",
            Self::Expired  => "EXPIRED",
        }
    }

    fn all() -> &'static [Self] {
        &[Self::Pending, Self::Verified, Self::Rejected, Self::Expired]
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct KycDocument {
    pub id: RecordId,
    pub customer_id: String,
    pub customer_name: String,
    pub document_type: DocumentType,
    pub status: VerificationStatus,
    pub submitted_at: DateTime<Utc>,
    #[serde(default)]
    pub verified_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub verified_by: Option<String>,
    /// OCR/match confidence, 0–100.
    pub confidence_score: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KycField {
    Id,
    CustomerId,
    CustomerName,
    DocumentType,
    Status,
    SubmittedAt,
    VerifiedAt,
    VerifiedBy,
    ConfidenceScore,
}

impl KycField {
    pub const ALL: &'static [KycField] = &[
        Self::Id,
        Self::CustomerId,
        Self::CustomerName,
        Self::DocumentType,
        Self::Status,
        Self::SubmittedAt,
        Self::VerifiedAt,
        Self::VerifiedBy,
        Self::ConfidenceScore,
    ];
}

impl RecordField for KycField {
    fn path(&self) -> &str {
        match self {
            Self::Id              => "id",
            Self::CustomerId      => "customerId",
            Self::CustomerName    => "customerName",
            Self::DocumentType    => "documentType",
            Self::Status          => "status",
            Self::SubmittedAt     => "submittedAt",
            Self::VerifiedAt      => "verifiedAt",
            Self::VerifiedBy      => "verifiedBy",
            Self::ConfidenceScore => "confidenceScore",
        }
    }

    fn parse(path: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|f| f.path() == path)
    }
}

impl Record for KycDocument {
    type Field = KycField;

    fn id(&self) -> &str {
        &self.id
    }

    fn field(&self, field: &KycField) -> FieldValue {
        match field {
            KycField::Id              => FieldValue::text(self.id.as_str()),
            KycField::CustomerId      => FieldValue::text(self.customer_id.as_str()),
            KycField::CustomerName    => FieldValue::text(self.customer_name.as_str()),
            KycField::DocumentType    => FieldValue::category(self.document_type),
            KycField::Status          => FieldValue::category(self.status),
            KycField::SubmittedAt     => FieldValue::Timestamp(self.submitted_at),
            KycField::VerifiedAt      => FieldValue::optional_timestamp(self.verified_at),
            KycField::VerifiedBy      => FieldValue::optional_text(self.verified_by.as_deref()),
            KycField::ConfidenceScore => FieldValue::Number(self.confidence_score),
        }
    }

    fn search_fields() -> &'static [KycField] {
        &[KycField::CustomerName, KycField::CustomerId]
    }
}

impl StatusRecord for KycDocument {
    fn status_field() -> KycField {
        KycField::Status
    }

    /// Only pending documents can be decided; a decision stamps `verified_at`.
    fn with_status(&self, status: &str, at: DateTime<Utc>) -> ConsoleResult<Self> {
        let next = VerificationStatus::parse(status).ok_or_else(|| ConsoleError::InvalidStatus {
            view: VIEW_NAME.into(),
            status: status.into(),
        })?;
        if self.status != VerificationStatus::Pending && next != self.status {
            return Err(ConsoleError::InvalidTransition {
                view: VIEW_NAME.into(),
                id: self.id.clone(),
                from: self.status.as_str().into(),
                to: next.as_str().into(),
            });
        }
        let mut updated = self.clone();
        updated.status = next;
        if next != VerificationStatus::Pending && self.status == VerificationStatus::Pending {
            updated.verified_at = Some(at);
        }
        Ok(updated)
    }
}

pub fn columns() -> Vec<KycField> {
    vec![
        KycField::CustomerName,
        KycField::DocumentType,
        KycField::Status,
        KycField::ConfidenceScore,
        KycField::SubmittedAt,
    ]
}

/// Newest submissions first.
pub fn default_query() -> Query<KycField> {
    Query::new().sort_by(KycField::SubmittedAt, SortDirection::Descending)
}

pub fn summary_cards() -> Vec<AggregateSpec<KycField>> {
    vec![
        AggregateSpec::count()
            .scoped(KycField::Status, VerificationStatus::Pending.as_str())
            .named("pendingReview"),
        AggregateSpec::count()
            .scoped(KycField::Status, VerificationStatus::Verified.as_str())
            .named("verified"),
        AggregateSpec::count()
            .scoped(KycField::Status, VerificationStatus::Rejected.as_str())
            .named("rejected"),
        AggregateSpec::average(KycField::ConfidenceScore).named("avgConfidence"),
    ]
}
