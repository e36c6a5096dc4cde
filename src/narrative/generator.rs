use crate::dialog::Transcript;
use crate::error::GenerationError;
use crate::intake::IntakeForm;
use crate::llm::ChatTransport;
use crate::prompts::{self, NAME_PLACEHOLDER};
use crate::sanitize::{self, FieldSpec};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::sync::Arc;

const LETTER_FIELDS: [FieldSpec; 2] = [FieldSpec::text("letterA"), FieldSpec::text("letterB")];

/// The two letters, positionally paired with option A and option B.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LetterPair {
    pub letter_a: String,
    pub letter_b: String,
}

impl LetterPair {
    /// Both letters carry text.
    pub fn is_complete(&self) -> bool {
        !self.letter_a.trim().is_empty() && !self.letter_b.trim().is_empty()
    }
}

pub struct NarrativeGenerator {
    transport: Arc<dyn ChatTransport>,
}

impl NarrativeGenerator {
    pub fn new(transport: Arc<dyn ChatTransport>) -> Self {
        Self { transport }
    }

    /// Request both letters in one call. Fails unless both come back.
    pub async fn generate(
        &self,
        form: &IntakeForm,
        transcript: &Transcript,
    ) -> crate::Result<LetterPair> {
        let messages = prompts::generation_messages(
            form,
            &transcript.render(),
            prompts::sign_off_year(),
        );
        tracing::info!(
            transport = self.transport.name(),
            turns = transcript.len(),
            "requesting letters from the service"
        );

        let raw = self.transport.send(&messages).await?;
        tracing::debug!(raw_len = raw.len(), "letters response received");

        let recovered =
            sanitize::sanitize(&raw, &LETTER_FIELDS).map_err(GenerationError::Unparsable)?;

        let letter_a = finish_letter(&recovered.record, "letterA", 'A', form.name())?;
        let letter_b = finish_letter(&recovered.record, "letterB", 'B', form.name())?;
        Ok(LetterPair { letter_a, letter_b })
    }
}

fn finish_letter(
    record: &Map<String, Value>,
    field: &str,
    branch: char,
    name: &str,
) -> Result<String, GenerationError> {
    let text = record
        .get(field)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .ok_or(GenerationError::MissingLetter { branch })?;
    Ok(text.replace(NAME_PLACEHOLDER, name).trim().to_string())
}
