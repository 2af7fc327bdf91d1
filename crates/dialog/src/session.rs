//! Per-user dialog sessions.
//!
//! One active flow per user, held behind a single mutex. Starting a new flow
//! replaces whatever was in progress; finishing or cancelling clears it.

use std::collections::HashMap;

use rollcall_core::UserId;
use tokio::sync::Mutex;
use tracing::debug;

use crate::{DialogState, StepOutcome};

#[derive(Default)]
pub struct SessionStore {
    sessions: Mutex<HashMap<UserId, DialogState>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Begin (or replace) the user's active flow.
    pub async fn begin(&self, user: UserId, state: DialogState) {
        let flow = state.flow_name();
        if let Some(old) = self.sessions.lock().await.insert(user.clone(), state) {
            debug!(user = %user, old = old.flow_name(), new = flow, "replaced active dialog");
        } else {
            debug!(user = %user, flow, "started dialog");
        }
    }

    /// Feed one message into the user's active flow.
    ///
    /// Returns `None` when no flow is active (free text outside a dialog is
    /// not this subsystem's business). A finished flow is cleared before the
    /// outcome is returned.
    pub async fn advance(&self, user: &UserId, input: &str) -> Option<StepOutcome> {
        let mut sessions = self.sessions.lock().await;
        let state = sessions.get_mut(user)?;
        let outcome = state.advance(input);
        if matches!(outcome, StepOutcome::Done(_)) {
            sessions.remove(user);
        }
        Some(outcome)
    }

    /// Drop the user's active flow. Returns whether there was one.
    pub async fn clear(&self, user: &UserId) -> bool {
        self.sessions.lock().await.remove(user).is_some()
    }

    pub async fn is_active(&self, user: &UserId) -> bool {
        self.sessions.lock().await.contains_key(user)
    }
}
