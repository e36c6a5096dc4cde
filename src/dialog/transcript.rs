use serde::{Deserialize, Serialize};
use std::fmt;

/// One answered follow-up question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DialogTurn {
    pub question: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rationale: Option<String>,
    pub answer: String,
}

/// Append-only record of the follow-up dialog.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Transcript {
    turns: Vec<DialogTurn>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, turn: DialogTurn) {
        self.turns.push(turn);
    }

    pub fn turns(&self) -> &[DialogTurn] {
        &self.turns
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// Fold the turns into the interleaved question/answer text handed to
    /// letter generation.
    pub fn render(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Transcript {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, turn) in self.turns.iter().enumerate() {
            if idx > 0 {
                writeln!(f)?;
            }
            write!(f, "Q: {}\nA: {}", turn.question, turn.answer)?;
        }
        Ok(())
    }
}
