//! RecordStore trait — persistent per-user subject records and the
//! attendance event log.
//!
//! The store is the single write boundary for attendance data. Every write
//! that touches the counters enforces `attended <= conducted <= total_classes`
//! uniformly, and multi-statement commits (counter change + event append,
//! undo) run inside one transaction.

use crate::error::StoreError;
use crate::event::{AttendanceEvent, Outcome};
use crate::subject::Subject;
use crate::user::{User, UserId};
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// The core RecordStore trait.
///
/// Implementations: SQLite (production), in-memory (for testing).
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// The backend name (e.g., "sqlite", "in_memory").
    fn name(&self) -> &str;

    /// Register a user, or refresh the display name if already known.
    async fn upsert_user(&self, user: &User) -> std::result::Result<(), StoreError>;

    /// All subjects registered by a user, in creation order.
    async fn subjects(&self, owner: &UserId) -> std::result::Result<Vec<Subject>, StoreError>;

    /// Look up one subject by name.
    async fn subject(
        &self,
        owner: &UserId,
        name: &str,
    ) -> std::result::Result<Option<Subject>, StoreError>;

    /// Insert a new subject. Fails with [`StoreError::DuplicateSubject`] when
    /// the user already has a subject with the same name.
    async fn insert_subject(&self, subject: &Subject) -> std::result::Result<(), StoreError>;

    /// Insert a subject unless the name is already taken. Returns whether a
    /// row was inserted. Used by the preset loader, which skips duplicates
    /// instead of failing the whole batch.
    async fn insert_subject_if_absent(
        &self,
        subject: &Subject,
    ) -> std::result::Result<bool, StoreError>;

    /// Record one class session: `conducted += 1`, `attended += 1` iff
    /// present, and append an [`AttendanceEvent`] — all in one transaction.
    /// Returns the updated subject.
    async fn apply_mark(
        &self,
        owner: &UserId,
        subject_name: &str,
        outcome: Outcome,
        at: DateTime<Utc>,
    ) -> std::result::Result<Subject, StoreError>;

    /// Overwrite both counters (retroactive correction). Returns the updated
    /// subject.
    async fn set_counters(
        &self,
        owner: &UserId,
        subject_name: &str,
        conducted: u32,
        attended: u32,
    ) -> std::result::Result<Subject, StoreError>;

    /// Reverse the user's most recent mark: roll the counter delta back and
    /// delete the log row, in one transaction. Returns the reversed event,
    /// or `None` when the log is empty.
    async fn undo_last_mark(
        &self,
        owner: &UserId,
    ) -> std::result::Result<Option<AttendanceEvent>, StoreError>;

    /// Number of subjects a user has registered.
    async fn count_subjects(&self, owner: &UserId) -> std::result::Result<usize, StoreError>;

    /// Number of registered users.
    async fn count_users(&self) -> std::result::Result<usize, StoreError>;

    /// Health check — is the store reachable?
    async fn health_check(&self) -> std::result::Result<bool, StoreError> {
        Ok(true)
    }
}
