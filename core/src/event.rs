//! Console event log. Every change a view makes to its record set lands here.
//!
//! Variants are appended, never removed or reordered.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::types::RecordId;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ConsoleEvent {
    // ── Loading ────────────────────────────────────
    RecordsLoaded {
        view: String,
        source: String,
        count: usize,
    },
    RefreshFailed {
        view: String,
        source: String,
        reason: String,
        fallback_count: usize,
    },

    // ── User actions ───────────────────────────────
    StatusChanged {
        view: String,
        record_id: RecordId,
        from: String,
        to: String,
    },
    BulkStatusChanged {
        view: String,
        record_ids: Vec<RecordId>,
        to: String,
    },
    RecordDeleted {
        view: String,
        record_id: RecordId,
    },
}

impl ConsoleEvent {
    /// Stable name for log lines and filtering.
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::RecordsLoaded { .. }     => "records_loaded",
            Self::RefreshFailed { .. }     => "refresh_failed",
            Self::StatusChanged { .. }     => "status_changed",
            Self::BulkStatusChanged { .. } => "bulk_status_changed",
            Self::RecordDeleted { .. }     => "record_deleted",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EventLogEntry {
    pub event_id: Uuid,
    pub at: DateTime<Utc>,
    pub event: ConsoleEvent,
}

impl EventLogEntry {
    pub fn new(event: ConsoleEvent) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            at: Utc::now(),
            event,
        }
    }
}
