#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

use aiself::Orchestrator;
use aiself::dialog::{AnswerSource, Reply};
use aiself::handoff::{HandoffStore, MemoryStore, WaitPolicy};
use aiself::intake::IntakeDraft;
use aiself::llm::{ScriptedReply, ScriptedTransport};

pub const MAX_ROUNDS: u32 = 5;

pub const LONG_BACKGROUND: &str = "I have spent six years as a structural engineer in Chengdu. \
My parents live twenty minutes away and my closest friends are here. A firm in Shanghai \
has offered me a lead role on a bridge project with twice the pay, but I would have to \
move within two months. I value being near family, but I also worry I am plateauing.";

pub fn draft(background: &str) -> IntakeDraft {
    IntakeDraft {
        name: "Li".into(),
        gender: "male".into(),
        birth: "1993".into(),
        option_a: "stay".into(),
        option_b: "move".into(),
        background: background.into(),
    }
}

pub fn insufficient(question: &str) -> ScriptedReply {
    ScriptedReply::Text(format!(
        r#"{{"sufficient": false, "reason": "I'd like to know more.", "questions": ["{question}"]}}"#
    ))
}

pub fn followup_insufficient(question: &str) -> ScriptedReply {
    ScriptedReply::Text(format!(
        r#"{{"sufficient": false, "question": "{question}"}}"#
    ))
}

pub fn sufficient() -> ScriptedReply {
    ScriptedReply::Text(r#"{"sufficient": true, "reason": "That is plenty."}"#.into())
}

/// A letters response with the quirks real output has: a fence, prose and
/// placeholders.
pub fn letters_reply() -> ScriptedReply {
    ScriptedReply::Text(
        "Here are the two letters:\n```json\n{\"letterA\": \"Dear [NAME],\\nStaying gave me roots.\\n\\nFrom\\nYou\", \
\"letterB\": \"Dear [NAME],\\nMoving taught me to begin again.\\n\\nFrom\\nYou\"}\n```"
            .into(),
    )
}

pub fn memory_store() -> HandoffStore {
    HandoffStore::new(Arc::new(MemoryStore::new()))
}

pub fn fast_policy() -> WaitPolicy {
    WaitPolicy {
        poll_interval: Duration::from_millis(10),
        deadline: Duration::from_secs(5),
    }
}

pub fn orchestrator(transport: &Arc<ScriptedTransport>, store: &HandoffStore) -> Orchestrator {
    Orchestrator::new(transport.clone(), store.clone(), MAX_ROUNDS, fast_policy())
}

/// Answers from a script; records every question it was shown.
#[derive(Default)]
pub struct CannedAnswers {
    replies: VecDeque<Reply>,
    pub asked: Vec<String>,
    pub rationales: Vec<Option<String>>,
}

impl CannedAnswers {
    pub fn answering(count: usize) -> Self {
        Self {
            replies: (1..=count).map(|i| Reply::Answer(format!("answer {i}"))).collect(),
            ..Self::default()
        }
    }

    pub fn skipping() -> Self {
        Self {
            replies: VecDeque::from([Reply::Skip]),
            ..Self::default()
        }
    }
}

impl AnswerSource for CannedAnswers {
    fn reply(&mut self, question: &str, rationale: Option<&str>) -> Reply {
        self.asked.push(question.to_string());
        self.rationales.push(rationale.map(str::to_string));
        self.replies.pop_front().unwrap_or(Reply::Skip)
    }
}
