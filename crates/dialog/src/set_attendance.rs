//! Set-attendance dialog: overwrite a subject's counters wholesale.
//!
//! Used when the user has been tracking attendance elsewhere and wants to
//! bring Rollcall up to date in one go.

use rollcall_core::{Reply, ReplyKeyboard};

use crate::{parse_count, resolve_choice, FlowOutput, StepOutcome};

#[derive(Debug, Clone)]
enum Step {
    Subject,
    Conducted {
        subject: String,
    },
    Attended {
        subject: String,
        conducted: u32,
    },
}

#[derive(Debug, Clone)]
pub struct SetAttendanceFlow {
    subjects: Vec<String>,
    step: Step,
}

impl SetAttendanceFlow {
    pub fn start(subjects: Vec<String>) -> (Self, Reply) {
        let prompt = Reply::with_keyboard(
            "Which subject should I update?",
            ReplyKeyboard::one_per_row(subjects.iter().cloned()),
        );
        (
            Self {
                subjects,
                step: Step::Subject,
            },
            prompt,
        )
    }

    pub fn advance(&mut self, input: &str) -> StepOutcome {
        match self.step.clone() {
            Step::Subject => {
                let Some(subject) = resolve_choice(&self.subjects, input) else {
                    return StepOutcome::Retry(Reply::with_keyboard(
                        "I don't know that subject. Pick one from the list.",
                        ReplyKeyboard::one_per_row(self.subjects.iter().cloned()),
                    ));
                };
                let subject = subject.to_string();
                let prompt = Reply::text(format!(
                    "How many classes of {subject} have been conducted so far?"
                ));
                self.step = Step::Conducted { subject };
                StepOutcome::Next(prompt)
            }
            Step::Conducted { subject } => {
                let Some(conducted) = parse_count(input) else {
                    return StepOutcome::Retry(Reply::text(
                        "That needs to be a whole number (0 is fine). How many conducted?",
                    ));
                };
                self.step = Step::Attended { subject, conducted };
                StepOutcome::Next(Reply::text("And how many of those did you attend?"))
            }
            Step::Attended { subject, conducted } => {
                let Some(attended) = parse_count(input) else {
                    return StepOutcome::Retry(Reply::text(
                        "That needs to be a whole number (0 is fine). How many attended?",
                    ));
                };
                if attended > conducted {
                    return StepOutcome::Retry(Reply::text(format!(
                        "You can't have attended more than were held ({conducted}). How many attended?"
                    )));
                }
                StepOutcome::Done(FlowOutput::SetAttendance {
                    subject_name: subject,
                    conducted,
                    attended,
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn subjects() -> Vec<String> {
        vec!["Algorithms".to_string()]
    }

    #[test]
    fn happy_path() {
        let (mut flow, _) = SetAttendanceFlow::start(subjects());
        assert!(matches!(flow.advance("Algorithms"), StepOutcome::Next(_)));
        assert!(matches!(flow.advance("10"), StepOutcome::Next(_)));

        let StepOutcome::Done(output) = flow.advance("8") else {
            panic!("attended should finish the flow");
        };
        assert_eq!(
            output,
            FlowOutput::SetAttendance {
                subject_name: "Algorithms".into(),
                conducted: 10,
                attended: 8,
            }
        );
    }

    #[test]
    fn attended_above_conducted_reprompts_same_step() {
        let (mut flow, _) = SetAttendanceFlow::start(subjects());
        flow.advance("Algorithms");
        flow.advance("10");

        let StepOutcome::Retry(prompt) = flow.advance("11") else {
            panic!("over-attending should retry");
        };
        assert!(prompt.text.contains("10"));
        // Still on the attended step; a valid value finishes.
        assert!(matches!(flow.advance("10"), StepOutcome::Done(_)));
    }

    #[test]
    fn zero_counts_are_valid() {
        let (mut flow, _) = SetAttendanceFlow::start(subjects());
        flow.advance("Algorithms");
        assert!(matches!(flow.advance("0"), StepOutcome::Next(_)));
        let StepOutcome::Done(FlowOutput::SetAttendance {
            conducted, attended, ..
        }) = flow.advance("0")
        else {
            panic!("expected set-attendance output");
        };
        assert_eq!((conducted, attended), (0, 0));
    }

    #[test]
    fn non_numeric_conducted_retries() {
        let (mut flow, _) = SetAttendanceFlow::start(subjects());
        flow.advance("Algorithms");
        assert!(matches!(flow.advance("lots"), StepOutcome::Retry(_)));
    }
}
