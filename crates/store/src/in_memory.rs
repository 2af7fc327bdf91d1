//! In-memory backend — useful for testing and ephemeral sessions.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rollcall_core::{
    AttendanceEvent, Outcome, RecordStore, StoreError, Subject, User, UserId,
};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::check_counters;

#[derive(Default)]
struct Inner {
    users: HashMap<String, User>,
    subjects: Vec<Subject>,
    events: Vec<AttendanceEvent>,
}

/// A store that keeps everything in a RwLock-guarded Vec. Nothing survives
/// a restart; every write still goes through the same counter checks as the
/// SQLite backend.
pub struct InMemoryStore {
    inner: Arc<RwLock<Inner>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(Inner::default())),
        }
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RecordStore for InMemoryStore {
    fn name(&self) -> &str {
        "in_memory"
    }

    async fn upsert_user(&self, user: &User) -> Result<(), StoreError> {
        let mut inner = self.inner.write().await;
        inner.users.insert(user.id.as_str().to_string(), user.clone());
        Ok(())
    }

    async fn subjects(&self, owner: &UserId) -> Result<Vec<Subject>, StoreError> {
        let inner = self.inner.read().await;
        let mut subjects: Vec<Subject> = inner
            .subjects
            .iter()
            .filter(|s| s.owner_id == *owner)
            .cloned()
            .collect();
        subjects.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(subjects)
    }

    async fn subject(&self, owner: &UserId, name: &str) -> Result<Option<Subject>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner
            .subjects
            .iter()
            .find(|s| s.owner_id == *owner && s.name == name)
            .cloned())
    }

    async fn insert_subject(&self, subject: &Subject) -> Result<(), StoreError> {
        let mut inner = self.inner.write().await;
        if inner
            .subjects
            .iter()
            .any(|s| s.owner_id == subject.owner_id && s.name == subject.name)
        {
            return Err(StoreError::DuplicateSubject {
                name: subject.name.clone(),
            });
        }
        check_counters(
            &subject.name,
            subject.attended,
            subject.conducted,
            subject.total_classes,
        )?;
        inner.subjects.push(subject.clone());
        Ok(())
    }

    async fn insert_subject_if_absent(&self, subject: &Subject) -> Result<bool, StoreError> {
        match self.insert_subject(subject).await {
            Ok(()) => Ok(true),
            Err(StoreError::DuplicateSubject { .. }) => Ok(false),
            Err(e) => Err(e),
        }
    }

    async fn apply_mark(
        &self,
        owner: &UserId,
        subject_name: &str,
        outcome: Outcome,
        at: DateTime<Utc>,
    ) -> Result<Subject, StoreError> {
        let mut inner = self.inner.write().await;
        let subject = inner
            .subjects
            .iter_mut()
            .find(|s| s.owner_id == *owner && s.name == subject_name)
            .ok_or_else(|| StoreError::SubjectNotFound {
                owner: owner.as_str().to_string(),
                name: subject_name.to_string(),
            })?;

        let conducted = subject.conducted + 1;
        let attended = if outcome.is_present() {
            subject.attended + 1
        } else {
            subject.attended
        };
        check_counters(subject_name, attended, conducted, subject.total_classes)?;

        subject.conducted = conducted;
        subject.attended = attended;
        let updated = subject.clone();

        let mut event = AttendanceEvent::now(owner.clone(), subject_name.to_string(), outcome);
        event.timestamp = at;
        inner.events.push(event);

        Ok(updated)
    }

    async fn set_counters(
        &self,
        owner: &UserId,
        subject_name: &str,
        conducted: u32,
        attended: u32,
    ) -> Result<Subject, StoreError> {
        let mut inner = self.inner.write().await;
        let subject = inner
            .subjects
            .iter_mut()
            .find(|s| s.owner_id == *owner && s.name == subject_name)
            .ok_or_else(|| StoreError::SubjectNotFound {
                owner: owner.as_str().to_string(),
                name: subject_name.to_string(),
            })?;

        check_counters(subject_name, attended, conducted, subject.total_classes)?;
        subject.conducted = conducted;
        subject.attended = attended;
        Ok(subject.clone())
    }

    async fn undo_last_mark(&self, owner: &UserId) -> Result<Option<AttendanceEvent>, StoreError> {
        let mut inner = self.inner.write().await;
        // Events are appended in order, so the last matching index is the
        // most recent mark for this user.
        let Some(pos) = inner
            .events
            .iter()
            .rposition(|e| e.owner_id == *owner)
        else {
            return Ok(None);
        };
        let event = inner.events[pos].clone();

        let subject = inner
            .subjects
            .iter_mut()
            .find(|s| s.owner_id == *owner && s.name == event.subject_name)
            .ok_or_else(|| StoreError::SubjectNotFound {
                owner: owner.as_str().to_string(),
                name: event.subject_name.clone(),
            })?;

        subject.conducted =
            subject
                .conducted
                .checked_sub(1)
                .ok_or_else(|| StoreError::Consistency {
                    message: format!(
                        "cannot undo mark for '{}': conducted already zero",
                        event.subject_name
                    ),
                })?;
        if event.outcome.is_present() {
            subject.attended =
                subject
                    .attended
                    .checked_sub(1)
                    .ok_or_else(|| StoreError::Consistency {
                        message: format!(
                            "cannot undo mark for '{}': attended already zero",
                            event.subject_name
                        ),
                    })?;
        }

        inner.events.remove(pos);
        Ok(Some(event))
    }

    async fn count_subjects(&self, owner: &UserId) -> Result<usize, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner.subjects.iter().filter(|s| s.owner_id == *owner).count())
    }

    async fn count_users(&self) -> Result<usize, StoreError> {
        Ok(self.inner.read().await.users.len())
    }
}
