use serde::{Deserialize, Serialize};

/// One entry of a chat-style request.
///
/// Closed over the two roles this crate ever sends. Serializes to the wire
/// shape `{"role": "system" | "user", "content": "..."}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "role", content = "content", rename_all = "snake_case")]
pub enum ChatMessage {
    /// Encodes the task contract.
    System(String),
    /// Encodes the submitted data.
    User(String),
}

impl ChatMessage {
    pub fn system(text: impl Into<String>) -> Self {
        Self::System(text.into())
    }

    pub fn user(text: impl Into<String>) -> Self {
        Self::User(text.into())
    }

    pub fn content(&self) -> &str {
        match self {
            Self::System(text) | Self::User(text) => text,
        }
    }

    pub fn is_system(&self) -> bool {
        matches!(self, Self::System(_))
    }
}
