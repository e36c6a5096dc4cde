//! The bounded follow-up dialog.
//!
//! ```text
//! Idle -> Asking -> WaitingForAnswer -> Evaluating -> Asking | Done
//!                        |
//!                        +-- skip --> Done
//! ```
//!
//! The round counter increments on every answer before anything else
//! happens. Once it reaches `max_rounds - 1` the dialog ends without
//! consulting the evaluator, so the number of questions shown is bounded no
//! matter what the service keeps saying.

use super::evaluator::{SufficiencyEvaluator, SufficiencyVerdict};
use super::transcript::{DialogTurn, Transcript};

/// Why the dialog stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DoneReason {
    Sufficient,
    CapReached,
    Skipped,
}

/// A question the person has been or is about to be shown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingQuestion {
    pub question: String,
    pub rationale: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DialogState {
    Idle,
    Asking(PendingQuestion),
    WaitingForAnswer(PendingQuestion),
    Evaluating,
    Done(DoneReason),
}

/// What the person did with a question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    Answer(String),
    Skip,
}

/// Front-end that shows a question and collects the reply.
pub trait AnswerSource {
    fn reply(&mut self, question: &str, rationale: Option<&str>) -> Reply;
}

/// Final result of a dialog run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DialogOutcome {
    pub transcript: Transcript,
    pub reason: DoneReason,
    pub rounds: u32,
}

pub struct DialogCollector<'e> {
    evaluator: &'e SufficiencyEvaluator,
    background: String,
    cap: u32,
    rounds: u32,
    state: DialogState,
    transcript: Transcript,
}

impl<'e> DialogCollector<'e> {
    pub fn new(
        evaluator: &'e SufficiencyEvaluator,
        background: impl Into<String>,
        max_rounds: u32,
    ) -> Self {
        Self {
            evaluator,
            background: background.into(),
            cap: max_rounds.saturating_sub(1),
            rounds: 0,
            state: DialogState::Idle,
            transcript: Transcript::new(),
        }
    }

    pub fn state(&self) -> &DialogState {
        &self.state
    }

    pub fn rounds(&self) -> u32 {
        self.rounds
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    /// Seed the dialog with the initial verdict. `Idle -> Asking | Done`.
    pub fn begin(&mut self, initial: SufficiencyVerdict) -> &DialogState {
        if self.state != DialogState::Idle {
            tracing::warn!(state = ?self.state, "dialog already started");
            return &self.state;
        }
        self.state = if self.rounds >= self.cap {
            DialogState::Done(DoneReason::CapReached)
        } else {
            Self::next_from(initial)
        };
        &self.state
    }

    /// Show the pending question. `Asking -> WaitingForAnswer`.
    pub fn present(&mut self) -> Option<&PendingQuestion> {
        let DialogState::Asking(pending) = &self.state else {
            return None;
        };
        self.state = DialogState::WaitingForAnswer(pending.clone());
        match &self.state {
            DialogState::WaitingForAnswer(pending) => Some(pending),
            _ => None,
        }
    }

    /// Record an answer and re-evaluate.
    /// `WaitingForAnswer -> Evaluating -> Asking | Done`.
    pub async fn answer(&mut self, answer: impl Into<String>) -> &DialogState {
        if !matches!(self.state, DialogState::WaitingForAnswer(_)) {
            tracing::warn!("answer received while no question was pending");
            return &self.state;
        }
        let DialogState::WaitingForAnswer(pending) =
            std::mem::replace(&mut self.state, DialogState::Evaluating)
        else {
            return &self.state;
        };

        let answer = answer.into();
        self.rounds += 1;
        self.transcript.push(DialogTurn {
            question: pending.question.clone(),
            rationale: pending.rationale,
            answer: answer.clone(),
        });

        if self.rounds >= self.cap {
            tracing::info!(rounds = self.rounds, "follow-up round cap reached");
            self.state = DialogState::Done(DoneReason::CapReached);
            return &self.state;
        }

        let verdict = self
            .evaluator
            .evaluate_followup(&self.background, &pending.question, &answer)
            .await;
        self.state = Self::next_from(verdict);
        &self.state
    }

    /// End the dialog without recording anything. `WaitingForAnswer -> Done`.
    pub fn skip(&mut self) -> &DialogState {
        if matches!(self.state, DialogState::WaitingForAnswer(_)) {
            tracing::info!(rounds = self.rounds, "follow-up dialog skipped");
            self.state = DialogState::Done(DoneReason::Skipped);
        }
        &self.state
    }

    /// Drive the dialog to completion against `source`.
    pub async fn run(
        mut self,
        initial: SufficiencyVerdict,
        source: &mut dyn AnswerSource,
    ) -> DialogOutcome {
        self.begin(initial);

        loop {
            if let DialogState::Done(reason) = self.state {
                return DialogOutcome {
                    transcript: self.transcript,
                    reason,
                    rounds: self.rounds,
                };
            }

            let Some(pending) = self.present().cloned() else {
                // Only reachable through misuse of the step API; end cleanly.
                self.state = DialogState::Done(DoneReason::Skipped);
                continue;
            };

            match source.reply(&pending.question, pending.rationale.as_deref()) {
                Reply::Answer(answer) => {
                    self.answer(answer).await;
                }
                Reply::Skip => {
                    self.skip();
                }
            }
        }
    }

    fn next_from(verdict: SufficiencyVerdict) -> DialogState {
        match verdict {
            SufficiencyVerdict {
                sufficient: false,
                question: Some(question),
                reason,
            } => DialogState::Asking(PendingQuestion {
                question,
                rationale: reason,
            }),
            _ => DialogState::Done(DoneReason::Sufficient),
        }
    }
}
