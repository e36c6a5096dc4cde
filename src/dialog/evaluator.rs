//! Sufficiency evaluation delegated to the generative-text service.
//!
//! Every failure here resolves to "sufficient, no question": a broken
//! classification must never block the person's flow.

use crate::llm::{ChatMessage, ChatTransport};
use crate::prompts;
use crate::sanitize::{self, FieldSpec};
use anyhow::anyhow;
use serde_json::{Map, Value};
use std::sync::Arc;

const VERDICT_FIELDS: [FieldSpec; 1] = [FieldSpec::boolean("sufficient")];

/// The evaluator's judgment. `question` is always present when
/// `sufficient` is false.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SufficiencyVerdict {
    pub sufficient: bool,
    pub question: Option<String>,
    pub reason: Option<String>,
}

impl SufficiencyVerdict {
    /// Proceed without further questions.
    pub fn proceed() -> Self {
        Self {
            sufficient: true,
            question: None,
            reason: None,
        }
    }

    pub fn ask(question: impl Into<String>, reason: Option<String>) -> Self {
        Self {
            sufficient: false,
            question: Some(question.into()),
            reason,
        }
    }

    /// Normalize a recovered record into a verdict.
    ///
    /// Accepts both `questions: [..]` (first non-empty wins) and
    /// `question: ".."`. An insufficient verdict without any question is
    /// turned into "sufficient" so the dialog cannot loop on nothing.
    pub fn from_record(record: &Map<String, Value>) -> crate::Result<Self> {
        let sufficient = record
            .get("sufficient")
            .and_then(Value::as_bool)
            .ok_or_else(|| anyhow!("`sufficient` is missing or not a boolean"))?;

        let reason = non_empty(record.get("reason").and_then(Value::as_str));
        if sufficient {
            return Ok(Self {
                reason,
                ..Self::proceed()
            });
        }

        let from_list = record
            .get("questions")
            .and_then(Value::as_array)
            .and_then(|qs| qs.iter().find_map(|q| non_empty(q.as_str())));
        let question = from_list.or_else(|| non_empty(record.get("question").and_then(Value::as_str)));

        match question {
            Some(question) => Ok(Self::ask(question, reason)),
            None => {
                tracing::warn!("service reported insufficient background without a question");
                Ok(Self {
                    reason,
                    ..Self::proceed()
                })
            }
        }
    }
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

pub struct SufficiencyEvaluator {
    transport: Arc<dyn ChatTransport>,
}

impl SufficiencyEvaluator {
    pub fn new(transport: Arc<dyn ChatTransport>) -> Self {
        Self { transport }
    }

    /// Judge the initial background.
    pub async fn evaluate(&self, background: &str) -> SufficiencyVerdict {
        self.judge("initial", prompts::evaluate_messages(background))
            .await
    }

    /// Judge whether the latest answer closed the gap.
    pub async fn evaluate_followup(
        &self,
        background: &str,
        question: &str,
        answer: &str,
    ) -> SufficiencyVerdict {
        self.judge(
            "followup",
            prompts::followup_messages(background, question, answer),
        )
        .await
    }

    async fn judge(&self, contract: &'static str, messages: Vec<ChatMessage>) -> SufficiencyVerdict {
        match self.try_judge(&messages).await {
            Ok(verdict) => {
                tracing::debug!(
                    contract,
                    sufficient = verdict.sufficient,
                    "sufficiency verdict received"
                );
                verdict
            }
            Err(e) => {
                tracing::warn!(contract, "sufficiency check failed, proceeding without questions: {e}");
                SufficiencyVerdict::proceed()
            }
        }
    }

    async fn try_judge(&self, messages: &[ChatMessage]) -> crate::Result<SufficiencyVerdict> {
        let raw = self.transport.send(messages).await?;
        let recovered = sanitize::sanitize(&raw, &VERDICT_FIELDS)?;
        SufficiencyVerdict::from_record(&recovered.record)
    }
}
