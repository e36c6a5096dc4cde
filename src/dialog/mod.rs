pub mod collector;
pub mod evaluator;
pub mod transcript;

pub use collector::{
    AnswerSource, DialogCollector, DialogOutcome, DialogState, DoneReason, PendingQuestion, Reply,
};
pub use evaluator::{SufficiencyEvaluator, SufficiencyVerdict};
pub use transcript::{DialogTurn, Transcript};
