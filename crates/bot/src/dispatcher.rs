//! Message handling: commands in, replies out.
//!
//! One inbound message produces at most one reply. Slash-commands either
//! answer immediately (reports, undo) or open a dialog; free text feeds the
//! active dialog and is ignored when there is none. Store failures never
//! escape: they are logged and answered with a generic notice.

use std::sync::Arc;

use chrono::Utc;
use rollcall_core::{
    ChannelMessage, RecordStore, Reply, StoreError, Subject, User, UserId,
};
use rollcall_dialog::{
    AddSubjectFlow, DialogState, FlowOutput, LeavePlannerFlow, MarkFlow, PresetLoadFlow,
    SessionStore, SetAttendanceFlow, StepOutcome,
};
use rollcall_engine::{self as engine, HealthPolicy};
use tracing::{debug, warn};

use crate::command::Command;
use crate::{curriculum, report};

const WELCOME: &str = "👋 Welcome to Rollcall\n\n\
    Use /addsubject to add your subjects.\n\
    Then use /mark to record attendance.\n\
    Check /status anytime.";

const HELP: &str = "📖 Commands\n\n\
    /addsubject — register a subject\n\
    /mark — record a class\n\
    /undo — reverse the last mark\n\
    /status — attendance report\n\
    /canimiss — safe-absence budget\n\
    /leaveplanner — project time off\n\
    /setattendance — correct counters\n\
    /preset_cyber — load a canned curriculum\n\
    /cancel — abort the current dialog";

const NO_SUBJECTS: &str = "No subjects found. Add with /addsubject";

pub struct Dispatcher {
    store: Arc<dyn RecordStore>,
    sessions: SessionStore,
    policy: HealthPolicy,
}

impl Dispatcher {
    pub fn new(store: Arc<dyn RecordStore>, policy: HealthPolicy) -> Self {
        Self {
            store,
            sessions: SessionStore::new(),
            policy,
        }
    }

    /// Handle one inbound message. `None` means deliberately no reply
    /// (free text while no dialog is active).
    pub async fn handle(&self, msg: &ChannelMessage) -> Option<Reply> {
        let user = UserId::new(msg.sender_id.clone());
        match Command::parse(&msg.content) {
            Some(command) => Some(self.handle_command(&user, msg, command).await),
            None => self.handle_text(&user, &msg.content).await,
        }
    }

    async fn handle_command(&self, user: &UserId, msg: &ChannelMessage, command: Command) -> Reply {
        debug!(user = %user, ?command, "handling command");

        // Any recognized command takes over from a dialog in progress; an
        // unknown one leaves it untouched.
        let had_dialog = match command {
            Command::Unknown(_) => false,
            _ => self.sessions.clear(user).await,
        };

        match command {
            Command::Start => self.start(user, msg).await,
            Command::AddSubject => {
                let (flow, prompt) = AddSubjectFlow::start();
                self.sessions
                    .begin(user.clone(), DialogState::AddSubject(flow))
                    .await;
                prompt
            }
            Command::Mark => match self.subject_names(user).await {
                Ok(names) if names.is_empty() => Reply::text(NO_SUBJECTS),
                Ok(names) => {
                    let (flow, prompt) = MarkFlow::start(names);
                    self.sessions.begin(user.clone(), DialogState::Mark(flow)).await;
                    prompt
                }
                Err(e) => self.failure(user, "list subjects", e),
            },
            Command::SetAttendance => match self.subject_names(user).await {
                Ok(names) if names.is_empty() => Reply::text(NO_SUBJECTS),
                Ok(names) => {
                    let (flow, prompt) = SetAttendanceFlow::start(names);
                    self.sessions
                        .begin(user.clone(), DialogState::SetAttendance(flow))
                        .await;
                    prompt
                }
                Err(e) => self.failure(user, "list subjects", e),
            },
            Command::LeavePlanner => {
                let (flow, prompt) = LeavePlannerFlow::start();
                self.sessions
                    .begin(user.clone(), DialogState::LeavePlanner(flow))
                    .await;
                prompt
            }
            Command::PresetCyber => {
                let (flow, prompt) = PresetLoadFlow::start(curriculum::batch_labels());
                self.sessions
                    .begin(user.clone(), DialogState::PresetLoad(flow))
                    .await;
                prompt
            }
            Command::Undo => self.undo(user).await,
            Command::Status => self.status(user).await,
            Command::CanIMiss => self.can_i_miss(user).await,
            Command::Cancel => {
                if had_dialog {
                    Reply::text("Cancelled. Nothing was saved.")
                } else {
                    Reply::text("Nothing to cancel.")
                }
            }
            Command::Help => Reply::text(HELP),
            Command::Unknown(name) => Reply::text(format!("Unknown command /{name}. Try /help")),
        }
    }

    async fn handle_text(&self, user: &UserId, text: &str) -> Option<Reply> {
        match self.sessions.advance(user, text).await? {
            StepOutcome::Next(reply) | StepOutcome::Retry(reply) => Some(reply),
            StepOutcome::Done(output) => Some(self.commit(user, output).await),
        }
    }

    async fn commit(&self, user: &UserId, output: FlowOutput) -> Reply {
        match output {
            FlowOutput::AddSubject {
                name,
                class_type,
                classes_per_week,
                total_weeks,
            } => {
                let required = engine::required_classes(classes_per_week, total_weeks);
                let subject = Subject::fresh(
                    user.clone(),
                    name.clone(),
                    name.clone(),
                    class_type,
                    classes_per_week,
                    total_weeks,
                    required,
                );
                match self.store.insert_subject(&subject).await {
                    Ok(()) => Reply::text(format!(
                        "✅ {name} added! {} classes planned, attend at least {} to stay above 80%.",
                        subject.total_classes, subject.required_classes
                    )),
                    Err(StoreError::DuplicateSubject { name }) => Reply::text(format!(
                        "You already track {name}. Use /setattendance to correct its counters."
                    )),
                    Err(e) => self.failure(user, "add subject", e),
                }
            }
            FlowOutput::Mark {
                subject_name,
                outcome,
            } => match self
                .store
                .apply_mark(user, &subject_name, outcome, Utc::now())
                .await
            {
                Ok(updated) => {
                    let percent = engine::attendance_percent(updated.attended, updated.conducted);
                    Reply::text(format!(
                        "✅ Marked {outcome} for {subject_name} ({}/{} → {percent:.1}%)",
                        updated.attended, updated.conducted
                    ))
                }
                Err(StoreError::Consistency { message }) => {
                    Reply::text(format!("⚠️ Can't record that: {message}"))
                }
                Err(e) => self.failure(user, "mark attendance", e),
            },
            FlowOutput::SetAttendance {
                subject_name,
                conducted,
                attended,
            } => match self
                .store
                .set_counters(user, &subject_name, conducted, attended)
                .await
            {
                Ok(updated) => {
                    let percent = engine::attendance_percent(updated.attended, updated.conducted);
                    Reply::text(format!(
                        "📌 {subject_name} set to {attended}/{conducted} → {percent:.1}%"
                    ))
                }
                Err(StoreError::Consistency { message }) => {
                    Reply::text(format!("⚠️ Can't record that: {message}"))
                }
                Err(e) => self.failure(user, "set attendance", e),
            },
            FlowOutput::LeavePlan { absent_days } => match self.store.subjects(user).await {
                Ok(subjects) if subjects.is_empty() => Reply::text(NO_SUBJECTS),
                Ok(subjects) => Reply::text(report::leave_plan(&subjects, absent_days)),
                Err(e) => self.failure(user, "plan leave", e),
            },
            FlowOutput::PresetLoad { batch } => self.load_preset(user, &batch).await,
        }
    }

    async fn start(&self, user: &UserId, msg: &ChannelMessage) -> Reply {
        let display = msg
            .sender_name
            .clone()
            .unwrap_or_else(|| msg.sender_id.clone());
        let row = User::new(msg.sender_id.clone(), display);
        match self.store.upsert_user(&row).await {
            Ok(()) => Reply::text(WELCOME),
            Err(e) => self.failure(user, "register user", e),
        }
    }

    async fn undo(&self, user: &UserId) -> Reply {
        match self.store.undo_last_mark(user).await {
            Ok(Some(event)) => Reply::text(format!(
                "↩️ Undid {} for {}.",
                event.outcome, event.subject_name
            )),
            Ok(None) => Reply::text("Nothing to undo."),
            Err(e) => self.failure(user, "undo", e),
        }
    }

    async fn status(&self, user: &UserId) -> Reply {
        match self.store.subjects(user).await {
            Ok(subjects) if subjects.is_empty() => Reply::text(NO_SUBJECTS),
            Ok(subjects) => Reply::text(report::status(&subjects, &self.policy)),
            Err(e) => self.failure(user, "status", e),
        }
    }

    async fn can_i_miss(&self, user: &UserId) -> Reply {
        match self.store.subjects(user).await {
            Ok(subjects) if subjects.is_empty() => Reply::text(NO_SUBJECTS),
            Ok(subjects) => Reply::text(report::can_i_miss(&subjects)),
            Err(e) => self.failure(user, "safe absences", e),
        }
    }

    async fn load_preset(&self, user: &UserId, batch_label: &str) -> Reply {
        // The flow validated against the same table, so this only misses if
        // the curriculum changes mid-dialog.
        let Some(batch) = curriculum::find(batch_label) else {
            return Reply::text("I don't have a curriculum for that batch.");
        };

        let mut inserted = 0u32;
        let mut skipped = 0u32;
        for preset in batch.subjects {
            let required =
                engine::required_classes(preset.classes_per_week, curriculum::PRESET_WEEKS);
            let subject = Subject::fresh(
                user.clone(),
                preset.name,
                preset.group,
                preset.class_type,
                preset.classes_per_week,
                curriculum::PRESET_WEEKS,
                required,
            );
            match self.store.insert_subject_if_absent(&subject).await {
                Ok(true) => inserted += 1,
                Ok(false) => skipped += 1,
                Err(e) => return self.failure(user, "load preset", e),
            }
        }
        Reply::text(format!(
            "📦 {batch_label} loaded: {inserted} subjects added, {skipped} already there."
        ))
    }

    async fn subject_names(&self, user: &UserId) -> Result<Vec<String>, StoreError> {
        Ok(self
            .store
            .subjects(user)
            .await?
            .into_iter()
            .map(|s| s.name)
            .collect())
    }

    fn failure(&self, user: &UserId, action: &str, err: StoreError) -> Reply {
        warn!(user = %user, action, error = %err, "store operation failed");
        Reply::text("⚠️ Something went wrong on my side. Please try again.")
    }
}
