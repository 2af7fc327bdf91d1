//! Leave-planner dialog: one question, no commit.
//!
//! The output only carries the day count; the dispatcher renders the
//! per-subject impact report from live store data.

use rollcall_core::Reply;

use crate::{parse_positive, FlowOutput, StepOutcome};

#[derive(Debug, Clone)]
pub struct LeavePlannerFlow;

impl LeavePlannerFlow {
    pub fn start() -> (Self, Reply) {
        (
            Self,
            Reply::text("🏖️ How many instructional days will you be away?"),
        )
    }

    pub fn advance(&mut self, input: &str) -> StepOutcome {
        let Some(absent_days) = parse_positive(input) else {
            return StepOutcome::Retry(Reply::text(
                "That needs to be a whole number above zero. How many days?",
            ));
        };
        StepOutcome::Done(FlowOutput::LeavePlan { absent_days })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_day_count_finishes() {
        let (mut flow, prompt) = LeavePlannerFlow::start();
        assert!(prompt.text.contains("days"));

        let StepOutcome::Done(output) = flow.advance("3") else {
            panic!("valid count should finish");
        };
        assert_eq!(output, FlowOutput::LeavePlan { absent_days: 3 });
    }

    #[test]
    fn zero_and_garbage_retry() {
        let (mut flow, _) = LeavePlannerFlow::start();
        assert!(matches!(flow.advance("0"), StepOutcome::Retry(_)));
        assert!(matches!(flow.advance("a week"), StepOutcome::Retry(_)));
        assert!(matches!(flow.advance("5"), StepOutcome::Done(_)));
    }
}
