//! Attendance event log types.
//!
//! Every mark appends one `AttendanceEvent`. The log is append-only; the
//! single most recent entry per user may be reversed by undo, which deletes
//! the row and rolls the subject counters back.

use crate::user::UserId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Whether the user was in the room.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Present,
    Absent,
}

impl Outcome {
    /// The labels offered as suggested replies in the mark dialog.
    pub const CHOICES: [&'static str; 2] = ["Present", "Absent"];

    /// Parse a keyboard choice (case-insensitive).
    pub fn from_choice(text: &str) -> Option<Self> {
        match text.trim().to_lowercase().as_str() {
            "present" => Some(Self::Present),
            "absent" => Some(Self::Absent),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Present => "present",
            Self::Absent => "absent",
        }
    }

    pub fn is_present(&self) -> bool {
        matches!(self, Self::Present)
    }
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One entry in the append-only attendance log.
///
/// References its subject weakly via `(owner_id, subject_name)`; there is no
/// object link.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttendanceEvent {
    /// Unique event ID.
    pub id: String,

    pub owner_id: UserId,

    pub subject_name: String,

    pub outcome: Outcome,

    pub timestamp: DateTime<Utc>,
}

impl AttendanceEvent {
    /// Create an event stamped with the current time.
    pub fn now(owner_id: UserId, subject_name: impl Into<String>, outcome: Outcome) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            owner_id,
            subject_name: subject_name.into(),
            outcome,
            timestamp: Utc::now(),
        }
    }
}
