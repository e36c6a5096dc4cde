use thiserror::Error;

// ─── Top-level error hierarchy ───────────────────────────────────────────────

/// Structured error hierarchy for `aiself`.
///
/// Each subsystem defines its own error variant. Library callers match on
/// these to decide what the person sees; the binary edge uses `anyhow` for
/// ad-hoc context chains.
#[derive(Debug, Error)]
pub enum AiselfError {
    // ── Config ───────────────────────────────────────────────────────────
    #[error("config: {0}")]
    Config(#[from] ConfigError),

    // ── Generative-text service ─────────────────────────────────────────
    #[error("llm: {0}")]
    Llm(#[from] LlmError),

    // ── Response repair ─────────────────────────────────────────────────
    #[error("sanitize: {0}")]
    Sanitize(#[from] SanitizeError),

    // ── Letter generation ───────────────────────────────────────────────
    #[error("generation: {0}")]
    Generation(#[from] GenerationError),

    // ── Intake form ─────────────────────────────────────────────────────
    #[error("intake: {0}")]
    Intake(#[from] IntakeError),

    // ── Result handoff ──────────────────────────────────────────────────
    #[error("handoff: {0}")]
    Handoff(#[from] HandoffError),

    // ── Generic fallthrough (wraps anyhow for interop) ──────────────────
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl AiselfError {
    /// Whether the failure was the transport's own deadline firing.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Llm(LlmError::Timeout { .. }))
    }

    /// Short text suitable for showing to the person at the terminal.
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::Llm(LlmError::Timeout { .. }) => {
                "The request timed out. Please try again in a moment."
            }
            Self::Intake(_) => "Some required details are missing. Please fill them in.",
            Self::Handoff(HandoffError::DeadlineElapsed { .. } | HandoffError::Abandoned) => {
                "Your letters could not be delivered. Please start over."
            }
            _ => "Something went wrong while writing your letters. Please try again.",
        }
    }
}

// ─── Config errors ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("service credential not configured (set {var})")]
    MissingCredential { var: &'static str },

    #[error("failed to load config: {0}")]
    Load(String),

    #[error("validation failed: {0}")]
    Validation(String),

    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}

// ─── Generative-text service errors ─────────────────────────────────────────

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("service responded with status {status}: {body}")]
    Transport { status: u16, body: String },

    #[error("request failed before a response arrived: {0}")]
    Network(String),

    #[error("request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    #[error("response body could not be decoded: {0}")]
    Decode(String),

    #[error("response contained no message content")]
    EmptyResponse,
}

// ─── Response repair errors ─────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum SanitizeError {
    #[error("no repair tier produced a valid record (output began with {preview:?})")]
    Unparsable { preview: String },
}

// ─── Letter generation errors ───────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("letters could not be recovered from the response: {0}")]
    Unparsable(#[source] SanitizeError),

    #[error("letter for branch {branch} is missing or empty")]
    MissingLetter { branch: char },
}

// ─── Intake errors ──────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum IntakeError {
    #[error("required field `{0}` is empty")]
    MissingField(&'static str),

    #[error("birth year or date {0:?} is not valid")]
    InvalidBirth(String),

    #[error("gender {0:?} is not one of male, female")]
    InvalidGender(String),
}

// ─── Handoff errors ─────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum HandoffError {
    #[error("letters were not ready after {waited_ms}ms")]
    DeadlineElapsed { waited_ms: u128 },

    #[error("the writer went away without publishing letters")]
    Abandoned,

    #[error("store: {0}")]
    Store(String),

    #[error("codec: {0}")]
    Codec(#[from] serde_json::Error),
}

// ─── Convenience re-exports ─────────────────────────────────────────────────

/// Shorthand result type for the crate.
pub type Result<T> = std::result::Result<T, AiselfError>;
