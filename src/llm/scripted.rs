use super::traits::{ChatTransport, SendFuture};
use super::types::ChatMessage;
use crate::error::{AiselfError, LlmError};
use std::collections::VecDeque;
use std::sync::Mutex;

/// One canned outcome for [`ScriptedTransport`].
#[derive(Debug, Clone)]
pub enum ScriptedReply {
    Text(String),
    Status(u16),
    Timeout,
}

impl ScriptedReply {
    fn into_result(self) -> crate::Result<String> {
        match self {
            Self::Text(text) => Ok(text),
            Self::Status(status) => Err(LlmError::Transport {
                status,
                body: "scripted failure".into(),
            }
            .into()),
            Self::Timeout => Err(LlmError::Timeout { timeout_secs: 55 }.into()),
        }
    }
}

/// In-process transport that replays queued replies in order and records
/// every request it receives. Test support for the evaluator, generator and
/// session scenarios.
#[derive(Debug, Default)]
pub struct ScriptedTransport {
    replies: Mutex<VecDeque<ScriptedReply>>,
    requests: Mutex<Vec<Vec<ChatMessage>>>,
}

impl ScriptedTransport {
    pub fn new<I, S>(texts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::with_replies(texts.into_iter().map(|t| ScriptedReply::Text(t.into())))
    }

    pub fn with_replies(replies: impl IntoIterator<Item = ScriptedReply>) -> Self {
        Self {
            replies: Mutex::new(replies.into_iter().collect()),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Every request received so far, oldest first.
    pub fn requests(&self) -> Vec<Vec<ChatMessage>> {
        self.requests
            .lock()
            .map(|requests| requests.clone())
            .unwrap_or_default()
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().map(|r| r.len()).unwrap_or_default()
    }

    fn next_reply(&self, messages: &[ChatMessage]) -> crate::Result<String> {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(messages.to_vec());
        }
        let reply = self
            .replies
            .lock()
            .ok()
            .and_then(|mut replies| replies.pop_front());
        match reply {
            Some(reply) => reply.into_result(),
            None => Err(AiselfError::Llm(LlmError::Network(
                "scripted transport has no replies left".into(),
            ))),
        }
    }
}

impl ChatTransport for ScriptedTransport {
    fn name(&self) -> &str {
        "scripted"
    }

    fn send<'a>(&'a self, messages: &'a [ChatMessage]) -> SendFuture<'a> {
        let result = self.next_reply(messages);
        Box::pin(async move { result })
    }
}
