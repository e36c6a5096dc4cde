pub mod client;
pub mod http_client;
pub mod scripted;
pub mod scrub;
pub mod traits;
pub mod types;

pub use client::ChatCompletionsClient;
pub use http_client::build_service_client;
pub use scripted::{ScriptedReply, ScriptedTransport};
pub use scrub::{sanitize_error_body, scrub_secret_patterns};
pub use traits::{ChatTransport, SendFuture};
pub use types::ChatMessage;
