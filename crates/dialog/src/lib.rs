//! Multi-step conversation flows.
//!
//! Each flow is a linear sequence of steps. An inbound free-text message is
//! validated against the current step: on failure the user is re-prompted and
//! the step is kept; on success the flow advances. The terminal step yields a
//! typed [`FlowOutput`] that the dispatcher commits against the engine and
//! store.
//!
//! Flows never touch the store themselves. They validate shape (is this a
//! number, is this one of the offered choices), not business state; whether a
//! subject name is a duplicate is the store's call at commit time.

pub mod add_subject;
pub mod leave_planner;
pub mod mark;
pub mod preset;
pub mod session;
pub mod set_attendance;

pub use add_subject::AddSubjectFlow;
pub use leave_planner::LeavePlannerFlow;
pub use mark::MarkFlow;
pub use preset::PresetLoadFlow;
pub use session::SessionStore;
pub use set_attendance::SetAttendanceFlow;

use rollcall_core::{ClassType, Outcome, Reply};

/// What a completed flow hands back to the dispatcher for committing.
#[derive(Debug, Clone, PartialEq)]
pub enum FlowOutput {
    AddSubject {
        name: String,
        class_type: ClassType,
        classes_per_week: u32,
        total_weeks: u32,
    },
    Mark {
        subject_name: String,
        outcome: Outcome,
    },
    SetAttendance {
        subject_name: String,
        conducted: u32,
        attended: u32,
    },
    LeavePlan {
        absent_days: u32,
    },
    PresetLoad {
        batch: String,
    },
}

/// Result of feeding one message into an active flow.
#[derive(Debug, Clone)]
pub enum StepOutcome {
    /// Input accepted; here is the prompt for the next step.
    Next(Reply),
    /// Input rejected; same step, try again.
    Retry(Reply),
    /// Flow finished; the dispatcher commits the output.
    Done(FlowOutput),
}

/// The active flow for one user.
#[derive(Debug, Clone)]
pub enum DialogState {
    AddSubject(AddSubjectFlow),
    Mark(MarkFlow),
    SetAttendance(SetAttendanceFlow),
    LeavePlanner(LeavePlannerFlow),
    PresetLoad(PresetLoadFlow),
}

impl DialogState {
    pub fn flow_name(&self) -> &'static str {
        match self {
            Self::AddSubject(_) => "add_subject",
            Self::Mark(_) => "mark",
            Self::SetAttendance(_) => "set_attendance",
            Self::LeavePlanner(_) => "leave_planner",
            Self::PresetLoad(_) => "preset_load",
        }
    }

    pub fn advance(&mut self, input: &str) -> StepOutcome {
        match self {
            Self::AddSubject(flow) => flow.advance(input),
            Self::Mark(flow) => flow.advance(input),
            Self::SetAttendance(flow) => flow.advance(input),
            Self::LeavePlanner(flow) => flow.advance(input),
            Self::PresetLoad(flow) => flow.advance(input),
        }
    }
}

/// Parse a strictly positive integer.
pub(crate) fn parse_positive(input: &str) -> Option<u32> {
    match input.trim().parse::<u32>() {
        Ok(n) if n > 0 => Some(n),
        _ => None,
    }
}

/// Parse a non-negative integer.
pub(crate) fn parse_count(input: &str) -> Option<u32> {
    input.trim().parse::<u32>().ok()
}

/// Match the input against a list of offered choices, case-insensitively,
/// returning the canonical spelling.
pub(crate) fn resolve_choice<'a>(options: &'a [String], input: &str) -> Option<&'a str> {
    let wanted = input.trim();
    options
        .iter()
        .find(|o| o.eq_ignore_ascii_case(wanted))
        .map(String::as_str)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positive_rejects_zero_and_garbage() {
        assert_eq!(parse_positive("3"), Some(3));
        assert_eq!(parse_positive(" 12 "), Some(12));
        assert_eq!(parse_positive("0"), None);
        assert_eq!(parse_positive("-2"), None);
        assert_eq!(parse_positive("three"), None);
    }

    #[test]
    fn count_accepts_zero() {
        assert_eq!(parse_count("0"), Some(0));
        assert_eq!(parse_count("10"), Some(10));
        assert_eq!(parse_count("ten"), None);
    }

    #[test]
    fn choice_resolution_is_case_insensitive() {
        let options = vec!["Algorithms".to_string(), "Networks Lab".to_string()];
        assert_eq!(resolve_choice(&options, "algorithms"), Some("Algorithms"));
        assert_eq!(resolve_choice(&options, " networks lab "), Some("Networks Lab"));
        assert_eq!(resolve_choice(&options, "Compilers"), None);
    }
}
