//! SQLite record store.
//!
//! Uses a single SQLite database file with three tables:
//! - `users` — registered users
//! - `subjects` — per-user subject rows with attendance counters
//! - `attendance_events` — the append-only mark log
//!
//! A unique index on `(owner_id, name)` backs duplicate-subject rejection,
//! and the event table carries an autoincrement rowid so "most recent mark"
//! is unambiguous even when two marks share a timestamp.

use crate::check_counters;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rollcall_core::error::StoreError;
use rollcall_core::event::{AttendanceEvent, Outcome};
use rollcall_core::store::RecordStore;
use rollcall_core::subject::{ClassType, Subject};
use rollcall_core::user::{User, UserId};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::{Row, SqlitePool};
use std::str::FromStr;
use tracing::{debug, info};

/// A production SQLite record store.
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Create a new SQLite store from a file path.
    ///
    /// The database and all tables/indexes are created automatically.
    /// Pass `":memory:"` for an in-process ephemeral database (useful for tests).
    pub async fn new(path: &str) -> Result<Self, StoreError> {
        let options = SqliteConnectOptions::from_str(path)
            .map_err(|e| StoreError::Storage(format!("Invalid SQLite path: {e}")))?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .pragma("foreign_keys", "ON");

        // An in-memory database exists per connection; the pool must not
        // open a second one or the schema vanishes between queries.
        let max_connections = if path.contains(":memory:") { 1 } else { 4 };

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect_with(options)
            .await
            .map_err(|e| StoreError::Storage(format!("Failed to open SQLite: {e}")))?;

        let store = Self { pool };
        store.run_migrations().await?;
        info!("SQLite record store initialized at {path}");
        Ok(store)
    }

    /// Create from an existing pool (useful for testing).
    pub async fn from_pool(pool: SqlitePool) -> Result<Self, StoreError> {
        let store = Self { pool };
        store.run_migrations().await?;
        Ok(store)
    }

    /// Run schema migrations — creates tables and indexes.
    async fn run_migrations(&self) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS users (
                id           TEXT PRIMARY KEY,
                display_name TEXT NOT NULL,
                created_at   TEXT NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(|e| StoreError::MigrationFailed(format!("users table: {e}")))?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS subjects (
                iid              INTEGER PRIMARY KEY AUTOINCREMENT,
                owner_id         TEXT NOT NULL,
                name             TEXT NOT NULL,
                subject_group    TEXT NOT NULL,
                class_type       TEXT NOT NULL,
                classes_per_week INTEGER NOT NULL,
                total_weeks      INTEGER NOT NULL,
                total_classes    INTEGER NOT NULL,
                required_classes INTEGER NOT NULL,
                attended         INTEGER NOT NULL DEFAULT 0,
                conducted        INTEGER NOT NULL DEFAULT 0,
                lab_hours        INTEGER NOT NULL DEFAULT 0
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(|e| StoreError::MigrationFailed(format!("subjects table: {e}")))?;

        sqlx::query(
            "CREATE UNIQUE INDEX IF NOT EXISTS idx_subjects_owner_name
             ON subjects(owner_id, name)",
        )
        .execute(&self.pool)
        .await
        .map_err(|e| StoreError::MigrationFailed(format!("owner/name index: {e}")))?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS attendance_events (
                iid          INTEGER PRIMARY KEY AUTOINCREMENT,
                id           TEXT UNIQUE NOT NULL,
                owner_id     TEXT NOT NULL,
                subject_name TEXT NOT NULL,
                outcome      TEXT NOT NULL CHECK(outcome IN ('present', 'absent')),
                timestamp    TEXT NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(|e| StoreError::MigrationFailed(format!("attendance_events table: {e}")))?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_events_owner_recency
             ON attendance_events(owner_id, iid DESC)",
        )
        .execute(&self.pool)
        .await
        .map_err(|e| StoreError::MigrationFailed(format!("event recency index: {e}")))?;

        debug!("SQLite migrations complete");
        Ok(())
    }

    /// Parse a `Subject` from a SQLite row.
    fn row_to_subject(row: &sqlx::sqlite::SqliteRow) -> Result<Subject, StoreError> {
        let owner_id: String = row
            .try_get("owner_id")
            .map_err(|e| StoreError::QueryFailed(format!("owner_id column: {e}")))?;
        let name: String = row
            .try_get("name")
            .map_err(|e| StoreError::QueryFailed(format!("name column: {e}")))?;
        let group: String = row
            .try_get("subject_group")
            .map_err(|e| StoreError::QueryFailed(format!("subject_group column: {e}")))?;
        let class_type_str: String = row
            .try_get("class_type")
            .map_err(|e| StoreError::QueryFailed(format!("class_type column: {e}")))?;
        let class_type = ClassType::from_choice(&class_type_str).ok_or_else(|| {
            StoreError::QueryFailed(format!("unknown class_type '{class_type_str}'"))
        })?;

        let classes_per_week: i64 = row
            .try_get("classes_per_week")
            .map_err(|e| StoreError::QueryFailed(format!("classes_per_week column: {e}")))?;
        let total_weeks: i64 = row
            .try_get("total_weeks")
            .map_err(|e| StoreError::QueryFailed(format!("total_weeks column: {e}")))?;
        let total_classes: i64 = row
            .try_get("total_classes")
            .map_err(|e| StoreError::QueryFailed(format!("total_classes column: {e}")))?;
        let required_classes: i64 = row
            .try_get("required_classes")
            .map_err(|e| StoreError::QueryFailed(format!("required_classes column: {e}")))?;
        let attended: i64 = row
            .try_get("attended")
            .map_err(|e| StoreError::QueryFailed(format!("attended column: {e}")))?;
        let conducted: i64 = row
            .try_get("conducted")
            .map_err(|e| StoreError::QueryFailed(format!("conducted column: {e}")))?;
        let lab_hours: i64 = row
            .try_get("lab_hours")
            .map_err(|e| StoreError::QueryFailed(format!("lab_hours column: {e}")))?;

        Ok(Subject {
            owner_id: UserId::new(owner_id),
            name,
            group,
            class_type,
            classes_per_week: classes_per_week as u32,
            total_weeks: total_weeks as u32,
            total_classes: total_classes as u32,
            required_classes: required_classes as u32,
            attended: attended as u32,
            conducted: conducted as u32,
            lab_hours: lab_hours as u32,
        })
    }

    fn outcome_from_str(s: &str) -> Result<Outcome, StoreError> {
        Outcome::from_choice(s)
            .ok_or_else(|| StoreError::QueryFailed(format!("unknown outcome '{s}'")))
    }
}

#[async_trait]
impl RecordStore for SqliteStore {
    fn name(&self) -> &str {
        "sqlite"
    }

    async fn upsert_user(&self, user: &User) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO users (id, display_name, created_at)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(id) DO UPDATE SET display_name = excluded.display_name
            "#,
        )
        .bind(user.id.as_str())
        .bind(&user.display_name)
        .bind(user.created_at.to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(|e| StoreError::Storage(format!("user upsert failed: {e}")))?;

        debug!(user = %user.id, "Upserted user");
        Ok(())
    }

    async fn subjects(&self, owner: &UserId) -> Result<Vec<Subject>, StoreError> {
        let rows = sqlx::query("SELECT * FROM subjects WHERE owner_id = ?1 ORDER BY iid")
            .bind(owner.as_str())
            .fetch_all(&self.pool)
            .await
            .map_err(|e| StoreError::QueryFailed(format!("subjects query: {e}")))?;

        rows.iter().map(Self::row_to_subject).collect()
    }

    async fn subject(&self, owner: &UserId, name: &str) -> Result<Option<Subject>, StoreError> {
        let row = sqlx::query("SELECT * FROM subjects WHERE owner_id = ?1 AND name = ?2")
            .bind(owner.as_str())
            .bind(name)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| StoreError::QueryFailed(format!("subject query: {e}")))?;

        match row {
            Some(ref r) => Ok(Some(Self::row_to_subject(r)?)),
            None => Ok(None),
        }
    }

    async fn insert_subject(&self, subject: &Subject) -> Result<(), StoreError> {
        check_counters(
            &subject.name,
            subject.attended,
            subject.conducted,
            subject.total_classes,
        )?;

        let result = sqlx::query(
            r#"
            INSERT INTO subjects
                (owner_id, name, subject_group, class_type, classes_per_week,
                 total_weeks, total_classes, required_classes, attended,
                 conducted, lab_hours)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
            "#,
        )
        .bind(subject.owner_id.as_str())
        .bind(&subject.name)
        .bind(&subject.group)
        .bind(subject.class_type.as_str())
        .bind(i64::from(subject.classes_per_week))
        .bind(i64::from(subject.total_weeks))
        .bind(i64::from(subject.total_classes))
        .bind(i64::from(subject.required_classes))
        .bind(i64::from(subject.attended))
        .bind(i64::from(subject.conducted))
        .bind(i64::from(subject.lab_hours))
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => {
                debug!(owner = %subject.owner_id, name = %subject.name, "Inserted subject");
                Ok(())
            }
            Err(e) => {
                if e.as_database_error()
                    .is_some_and(|db| db.is_unique_violation())
                {
                    Err(StoreError::DuplicateSubject {
                        name: subject.name.clone(),
                    })
                } else {
                    Err(StoreError::Storage(format!("subject insert failed: {e}")))
                }
            }
        }
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
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| StoreError::Storage(format!("begin mark tx: {e}")))?;

        let row = sqlx::query("SELECT * FROM subjects WHERE owner_id = ?1 AND name = ?2")
            .bind(owner.as_str())
            .bind(subject_name)
            .fetch_optional(&mut *tx)
            .await
            .map_err(|e| StoreError::QueryFailed(format!("mark subject lookup: {e}")))?;

        let Some(ref row) = row else {
            return Err(StoreError::SubjectNotFound {
                owner: owner.to_string(),
                name: subject_name.to_string(),
            });
        };
        let mut subject = Self::row_to_subject(row)?;

        subject.conducted += 1;
        if outcome.is_present() {
            subject.attended += 1;
        }
        check_counters(
            &subject.name,
            subject.attended,
            subject.conducted,
            subject.total_classes,
        )?;

        sqlx::query(
            "UPDATE subjects SET attended = ?1, conducted = ?2
             WHERE owner_id = ?3 AND name = ?4",
        )
        .bind(i64::from(subject.attended))
        .bind(i64::from(subject.conducted))
        .bind(owner.as_str())
        .bind(subject_name)
        .execute(&mut *tx)
        .await
        .map_err(|e| StoreError::Storage(format!("mark counter update: {e}")))?;

        let event = AttendanceEvent {
            id: uuid::Uuid::new_v4().to_string(),
            owner_id: owner.clone(),
            subject_name: subject_name.to_string(),
            outcome,
            timestamp: at,
        };
        sqlx::query(
            "INSERT INTO attendance_events (id, owner_id, subject_name, outcome, timestamp)
             VALUES (?1, ?2, ?3, ?4, ?5)",
        )
        .bind(&event.id)
        .bind(owner.as_str())
        .bind(subject_name)
        .bind(outcome.as_str())
        .bind(event.timestamp.to_rfc3339())
        .execute(&mut *tx)
        .await
        .map_err(|e| StoreError::Storage(format!("event append: {e}")))?;

        tx.commit()
            .await
            .map_err(|e| StoreError::Storage(format!("commit mark tx: {e}")))?;

        debug!(owner = %owner, subject = %subject_name, outcome = %outcome, "Applied mark");
        Ok(subject)
    }

    async fn set_counters(
        &self,
        owner: &UserId,
        subject_name: &str,
        conducted: u32,
        attended: u32,
    ) -> Result<Subject, StoreError> {
        let mut subject = self
            .subject(owner, subject_name)
            .await?
            .ok_or_else(|| StoreError::SubjectNotFound {
                owner: owner.to_string(),
                name: subject_name.to_string(),
            })?;

        check_counters(subject_name, attended, conducted, subject.total_classes)?;

        sqlx::query(
            "UPDATE subjects SET attended = ?1, conducted = ?2
             WHERE owner_id = ?3 AND name = ?4",
        )
        .bind(i64::from(attended))
        .bind(i64::from(conducted))
        .bind(owner.as_str())
        .bind(subject_name)
        .execute(&self.pool)
        .await
        .map_err(|e| StoreError::Storage(format!("counter overwrite: {e}")))?;

        subject.attended = attended;
        subject.conducted = conducted;
        debug!(owner = %owner, subject = %subject_name, attended, conducted, "Set counters");
        Ok(subject)
    }

    async fn undo_last_mark(&self, owner: &UserId) -> Result<Option<AttendanceEvent>, StoreError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| StoreError::Storage(format!("begin undo tx: {e}")))?;

        let row = sqlx::query(
            "SELECT iid, id, owner_id, subject_name, outcome, timestamp
             FROM attendance_events WHERE owner_id = ?1
             ORDER BY iid DESC LIMIT 1",
        )
        .bind(owner.as_str())
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| StoreError::QueryFailed(format!("latest event query: {e}")))?;

        let Some(row) = row else {
            return Ok(None);
        };

        let iid: i64 = row
            .try_get("iid")
            .map_err(|e| StoreError::QueryFailed(format!("iid column: {e}")))?;
        let id: String = row
            .try_get("id")
            .map_err(|e| StoreError::QueryFailed(format!("id column: {e}")))?;
        let subject_name: String = row
            .try_get("subject_name")
            .map_err(|e| StoreError::QueryFailed(format!("subject_name column: {e}")))?;
        let outcome_str: String = row
            .try_get("outcome")
            .map_err(|e| StoreError::QueryFailed(format!("outcome column: {e}")))?;
        let outcome = Self::outcome_from_str(&outcome_str)?;
        let timestamp_str: String = row
            .try_get("timestamp")
            .map_err(|e| StoreError::QueryFailed(format!("timestamp column: {e}")))?;
        let timestamp = chrono::DateTime::parse_from_rfc3339(&timestamp_str)
            .map(|dt| dt.with_timezone(&Utc))
            .unwrap_or_else(|_| Utc::now());

        let subject_row = sqlx::query("SELECT * FROM subjects WHERE owner_id = ?1 AND name = ?2")
            .bind(owner.as_str())
            .bind(&subject_name)
            .fetch_optional(&mut *tx)
            .await
            .map_err(|e| StoreError::QueryFailed(format!("undo subject lookup: {e}")))?;

        let Some(ref subject_row) = subject_row else {
            return Err(StoreError::SubjectNotFound {
                owner: owner.to_string(),
                name: subject_name,
            });
        };
        let subject = Self::row_to_subject(subject_row)?;

        let attended_delta: u32 = if outcome.is_present() { 1 } else { 0 };
        let (Some(new_conducted), Some(new_attended)) = (
            subject.conducted.checked_sub(1),
            subject.attended.checked_sub(attended_delta),
        ) else {
            return Err(StoreError::Consistency {
                message: format!(
                    "counters for '{}' are behind the event log, cannot undo",
                    subject.name
                ),
            });
        };

        sqlx::query(
            "UPDATE subjects SET attended = ?1, conducted = ?2
             WHERE owner_id = ?3 AND name = ?4",
        )
        .bind(i64::from(new_attended))
        .bind(i64::from(new_conducted))
        .bind(owner.as_str())
        .bind(&subject.name)
        .execute(&mut *tx)
        .await
        .map_err(|e| StoreError::Storage(format!("undo counter rollback: {e}")))?;

        sqlx::query("DELETE FROM attendance_events WHERE iid = ?1")
            .bind(iid)
            .execute(&mut *tx)
            .await
            .map_err(|e| StoreError::Storage(format!("undo event delete: {e}")))?;

        tx.commit()
            .await
            .map_err(|e| StoreError::Storage(format!("commit undo tx: {e}")))?;

        debug!(owner = %owner, subject = %subject.name, "Undid last mark");
        Ok(Some(AttendanceEvent {
            id,
            owner_id: owner.clone(),
            subject_name: subject.name,
            outcome,
            timestamp,
        }))
    }

    async fn count_subjects(&self, owner: &UserId) -> Result<usize, StoreError> {
        let row = sqlx::query("SELECT COUNT(*) as cnt FROM subjects WHERE owner_id = ?1")
            .bind(owner.as_str())
            .fetch_one(&self.pool)
            .await
            .map_err(|e| StoreError::QueryFailed(format!("subject count: {e}")))?;

        let cnt: i64 = row
            .try_get("cnt")
            .map_err(|e| StoreError::QueryFailed(format!("cnt column: {e}")))?;
        Ok(cnt as usize)
    }

    async fn count_users(&self) -> Result<usize, StoreError> {
        let row = sqlx::query("SELECT COUNT(*) as cnt FROM users")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| StoreError::QueryFailed(format!("user count: {e}")))?;

        let cnt: i64 = row
            .try_get("cnt")
            .map_err(|e| StoreError::QueryFailed(format!("cnt column: {e}")))?;
        Ok(cnt as usize)
    }

    async fn health_check(&self) -> Result<bool, StoreError> {
        sqlx::query("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| StoreError::Storage(format!("health probe: {e}")))?;
        Ok(true)
    }
}
