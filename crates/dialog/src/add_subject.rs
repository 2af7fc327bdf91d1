//! Add-subject dialog: name, class type, weekly load, semester length.

use rollcall_core::{ClassType, Reply, ReplyKeyboard};

use crate::{parse_positive, FlowOutput, StepOutcome};

#[derive(Debug, Clone)]
enum Step {
    Name,
    ClassType {
        name: String,
    },
    ClassesPerWeek {
        name: String,
        class_type: ClassType,
    },
    TotalWeeks {
        name: String,
        class_type: ClassType,
        classes_per_week: u32,
    },
}

/// Registers one new subject. The collected fields ride along in the step so
/// a half-finished flow carries everything it has learned so far.
#[derive(Debug, Clone)]
pub struct AddSubjectFlow {
    step: Step,
}

fn class_type_prompt(text: &str) -> Reply {
    Reply::with_keyboard(text, ReplyKeyboard::single_row(ClassType::CHOICES))
}

impl AddSubjectFlow {
    pub fn start() -> (Self, Reply) {
        (
            Self { step: Step::Name },
            Reply::text("📚 What should the new subject be called?"),
        )
    }

    pub fn advance(&mut self, input: &str) -> StepOutcome {
        match self.step.clone() {
            Step::Name => {
                let name = input.trim();
                if name.is_empty() {
                    return StepOutcome::Retry(Reply::text(
                        "A subject needs a name. What should it be called?",
                    ));
                }
                self.step = Step::ClassType {
                    name: name.to_string(),
                };
                StepOutcome::Next(class_type_prompt(
                    "Is this a theory class, a tutorial, or a lab?",
                ))
            }
            Step::ClassType { name } => {
                let Some(class_type) = ClassType::from_choice(input) else {
                    return StepOutcome::Retry(class_type_prompt(
                        "Please pick one of the offered class types.",
                    ));
                };
                self.step = Step::ClassesPerWeek { name, class_type };
                StepOutcome::Next(Reply::text("How many classes per week? (e.g. 3)"))
            }
            Step::ClassesPerWeek { name, class_type } => {
                let Some(classes_per_week) = parse_positive(input) else {
                    return StepOutcome::Retry(Reply::text(
                        "That needs to be a whole number above zero. How many classes per week?",
                    ));
                };
                self.step = Step::TotalWeeks {
                    name,
                    class_type,
                    classes_per_week,
                };
                StepOutcome::Next(Reply::text("And how many weeks does the term run? (e.g. 15)"))
            }
            Step::TotalWeeks {
                name,
                class_type,
                classes_per_week,
            } => {
                let Some(total_weeks) = parse_positive(input) else {
                    return StepOutcome::Retry(Reply::text(
                        "That needs to be a whole number above zero. How many weeks?",
                    ));
                };
                StepOutcome::Done(FlowOutput::AddSubject {
                    name,
                    class_type,
                    classes_per_week,
                    total_weeks,
                })
            }
        }
    }
}
