//! Mark-attendance dialog: pick a subject, then Present or Absent.

use rollcall_core::{Outcome, Reply, ReplyKeyboard};

use crate::{resolve_choice, FlowOutput, StepOutcome};

#[derive(Debug, Clone)]
enum Step {
    Subject,
    Outcome { subject: String },
}

/// Records one session for one subject. The caller supplies the user's
/// registered subject names; anything outside that list is rejected.
#[derive(Debug, Clone)]
pub struct MarkFlow {
    subjects: Vec<String>,
    step: Step,
}

fn outcome_prompt(subject: &str) -> Reply {
    Reply::with_keyboard(
        format!("Were you present for {subject}?"),
        ReplyKeyboard::single_row(Outcome::CHOICES),
    )
}

impl MarkFlow {
    /// `subjects` must be non-empty; the dispatcher aborts with a notice
    /// before starting the flow when the user has nothing registered.
    pub fn start(subjects: Vec<String>) -> (Self, Reply) {
        let prompt = Reply::with_keyboard(
            "Which subject are we marking?",
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
                let prompt = outcome_prompt(&subject);
                self.step = Step::Outcome { subject };
                StepOutcome::Next(prompt)
            }
            Step::Outcome { subject } => {
                let Some(outcome) = Outcome::from_choice(input) else {
                    return StepOutcome::Retry(outcome_prompt(&subject));
                };
                StepOutcome::Done(FlowOutput::Mark {
                    subject_name: subject,
                    outcome,
                })
            }
        }
    }
}
