//! Preset-load dialog: pick a curriculum batch.
//!
//! The flow only resolves the batch name; the dispatcher owns the curriculum
//! tables and performs the bulk insert.

use rollcall_core::{Reply, ReplyKeyboard};

use crate::{resolve_choice, FlowOutput, StepOutcome};

#[derive(Debug, Clone)]
pub struct PresetLoadFlow {
    batches: Vec<String>,
}

impl PresetLoadFlow {
    pub fn start(batches: Vec<String>) -> (Self, Reply) {
        let prompt = Reply::with_keyboard(
            "Which batch's curriculum should I load?",
            ReplyKeyboard::one_per_row(batches.iter().cloned()),
        );
        (Self { batches }, prompt)
    }

    pub fn advance(&mut self, input: &str) -> StepOutcome {
        let Some(batch) = resolve_choice(&self.batches, input) else {
            return StepOutcome::Retry(Reply::with_keyboard(
                "I don't have a curriculum for that. Pick one from the list.",
                ReplyKeyboard::one_per_row(self.batches.iter().cloned()),
            ));
        };
        StepOutcome::Done(FlowOutput::PresetLoad {
            batch: batch.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn batches() -> Vec<String> {
        vec!["Semester 3".to_string(), "Semester 4".to_string()]
    }

    #[test]
    fn known_batch_finishes() {
        let (mut flow, prompt) = PresetLoadFlow::start(batches());
        assert_eq!(prompt.keyboard.unwrap().rows.len(), 2);

        let StepOutcome::Done(output) = flow.advance("semester 4") else {
            panic!("known batch should finish");
        };
        assert_eq!(
            output,
            FlowOutput::PresetLoad {
                batch: "Semester 4".into(),
            }
        );
    }

    #[test]
    fn unknown_batch_retries() {
        let (mut flow, _) = PresetLoadFlow::start(batches());
        assert!(matches!(flow.advance("Semester 9"), StepOutcome::Retry(_)));
        assert!(matches!(flow.advance("Semester 3"), StepOutcome::Done(_)));
    }
}
