//! Single-writer / single-reader handoff of the finished letters.
//!
//! The writer publishes the options early, then completes with the letters
//! at most once. The reader polls the store on a fixed interval and also
//! wakes on the writer's ready signal. A writer that goes away without
//! completing is observed as [`HandoffError::Abandoned`]. A detached reader
//! has no writer to observe and can only end in letters or the deadline.

use super::store::{HandoffStore, Options};
use crate::config::HandoffConfig;
use crate::error::HandoffError;
use crate::narrative::LetterPair;
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::Instant;

/// How a reader waits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitPolicy {
    pub poll_interval: Duration,
    pub deadline: Duration,
}

impl From<&HandoffConfig> for WaitPolicy {
    fn from(config: &HandoffConfig) -> Self {
        Self {
            poll_interval: config.poll_interval(),
            deadline: config.deadline(),
        }
    }
}

/// Create a connected writer/reader pair over `store`.
pub fn slot(
    store: HandoffStore,
    options: Options,
    policy: WaitPolicy,
) -> (HandoffWriter, HandoffReader) {
    let (ready_tx, ready_rx) = watch::channel(false);
    let writer = HandoffWriter {
        store: store.clone(),
        options,
        ready: ready_tx,
        completed: false,
    };
    let reader = HandoffReader {
        store,
        policy,
        ready: Some(ready_rx),
    };
    (writer, reader)
}

pub struct HandoffWriter {
    store: HandoffStore,
    options: Options,
    ready: watch::Sender<bool>,
    completed: bool,
}

impl HandoffWriter {
    /// Publish the options half so the display surface can proceed.
    pub fn publish_options(&self) -> Result<(), HandoffError> {
        self.store.write_options(&self.options)?;
        tracing::debug!("options published");
        Ok(())
    }

    /// Publish the letters and signal the reader. Consumes the writer.
    pub fn complete(mut self, letters: &LetterPair) -> Result<(), HandoffError> {
        self.store.write_letters(letters)?;
        self.completed = true;
        self.ready.send_replace(true);
        tracing::info!("letters published");
        Ok(())
    }
}

impl Drop for HandoffWriter {
    fn drop(&mut self) {
        if !self.completed {
            tracing::warn!("handoff writer dropped without publishing letters");
        }
    }
}

pub struct HandoffReader {
    store: HandoffStore,
    policy: WaitPolicy,
    ready: Option<watch::Receiver<bool>>,
}

impl HandoffReader {
    /// A polling-only reader with no writer attached.
    pub fn detached(store: HandoffStore, policy: WaitPolicy) -> Self {
        Self {
            store,
            policy,
            ready: None,
        }
    }

    pub fn policy(&self) -> WaitPolicy {
        self.policy
    }

    /// Wait for complete letters, the writer to go away, or the deadline.
    pub async fn wait(&mut self) -> Result<LetterPair, HandoffError> {
        let deadline = Instant::now() + self.policy.deadline;
        let waited_ms = self.policy.deadline.as_millis();
        let elapsed = || HandoffError::DeadlineElapsed { waited_ms };

        loop {
            if let Some(letters) = self.store.read_letters()? {
                return Ok(letters);
            }
            if Instant::now() >= deadline {
                return Err(elapsed());
            }

            let poll = tokio::time::sleep(self.policy.poll_interval);
            match self.ready.as_mut() {
                Some(ready) => {
                    tokio::select! {
                        () = poll => {}
                        changed = ready.changed() => {
                            if changed.is_err() {
                                // Writer is gone; whatever it left is final.
                                return self.store.read_letters()?.ok_or(HandoffError::Abandoned);
                            }
                        }
                        () = tokio::time::sleep_until(deadline) => return Err(elapsed()),
                    }
                }
                None => {
                    tokio::select! {
                        () = poll => {}
                        () = tokio::time::sleep_until(deadline) => return Err(elapsed()),
                    }
                }
            }
        }
    }
}
