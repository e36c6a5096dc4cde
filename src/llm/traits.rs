use super::types::ChatMessage;
use crate::error::Result;
use std::future::Future;
use std::pin::Pin;

/// Boxed future returned by [`ChatTransport::send`].
pub type SendFuture<'a> = Pin<Box<dyn Future<Output = Result<String>> + Send + 'a>>;

/// Issues one chat-style request and yields the raw text of the reply.
///
/// Implementations perform exactly one request per call and never retry;
/// retry policy belongs to callers.
pub trait ChatTransport: Send + Sync {
    /// Transport identifier used in logs.
    fn name(&self) -> &str;

    fn send<'a>(&'a self, messages: &'a [ChatMessage]) -> SendFuture<'a>;
}
