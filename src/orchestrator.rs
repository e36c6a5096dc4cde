//! End-to-end flow: validate, evaluate, follow up, generate, publish.

use crate::config::{API_KEY_ENV, Config};
use crate::dialog::{AnswerSource, DialogCollector, DialogOutcome, SufficiencyEvaluator};
use crate::error::{AiselfError, ConfigError};
use crate::handoff::{FileStore, HandoffReader, HandoffStore, Options, WaitPolicy, slot};
use crate::intake::{IntakeDraft, IntakeForm};
use crate::llm::{ChatCompletionsClient, ChatTransport};
use crate::narrative::{LetterPair, NarrativeGenerator};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::Instrument;
use uuid::Uuid;

/// Result of a session that waited for its letters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionReport {
    pub dialog: DialogOutcome,
    pub letters: LetterPair,
}

/// A session whose letters are still being written in the background.
pub struct OptimisticHandoff {
    pub dialog: DialogOutcome,
    pub reader: HandoffReader,
    pub task: JoinHandle<()>,
}

pub struct Orchestrator {
    evaluator: SufficiencyEvaluator,
    generator: Arc<NarrativeGenerator>,
    store: HandoffStore,
    max_rounds: u32,
    policy: WaitPolicy,
}

impl Orchestrator {
    pub fn new(
        transport: Arc<dyn ChatTransport>,
        store: HandoffStore,
        max_rounds: u32,
        policy: WaitPolicy,
    ) -> Self {
        Self {
            evaluator: SufficiencyEvaluator::new(transport.clone()),
            generator: Arc::new(NarrativeGenerator::new(transport)),
            store,
            max_rounds,
            policy,
        }
    }

    /// Wire the service client and the file-backed store from config.
    ///
    /// A missing credential is fatal here, before anything touches the
    /// network.
    pub fn from_config(config: &Config) -> crate::Result<Self> {
        if config.provider.api_key.is_none() {
            return Err(ConfigError::MissingCredential { var: API_KEY_ENV }.into());
        }
        let transport: Arc<dyn ChatTransport> =
            Arc::new(ChatCompletionsClient::new(&config.provider));
        let store = HandoffStore::new(Arc::new(FileStore::new(config.handoff.resolved_dir())));
        Ok(Self::new(
            transport,
            store,
            config.dialog.max_rounds,
            WaitPolicy::from(&config.handoff),
        ))
    }

    pub fn store(&self) -> &HandoffStore {
        &self.store
    }

    /// Run the whole flow and publish the letters before returning.
    pub async fn run(
        &self,
        draft: IntakeDraft,
        source: &mut dyn AnswerSource,
    ) -> crate::Result<SessionReport> {
        let span = tracing::info_span!("session", id = %Uuid::new_v4());
        async {
            let (form, dialog) = self.prepare(draft, source).await?;
            let (writer, _reader) = slot(self.store.clone(), options_for(&form), self.policy);
            writer.publish_options()?;

            let letters = self.generator.generate(&form, &dialog.transcript).await?;
            writer.complete(&letters)?;
            Ok::<_, AiselfError>(SessionReport { dialog, letters })
        }
        .instrument(span)
        .await
    }

    /// Publish the options, start generation in the background and hand back
    /// a reader right away. A failed generation publishes nothing.
    pub async fn run_optimistic(
        &self,
        draft: IntakeDraft,
        source: &mut dyn AnswerSource,
    ) -> crate::Result<OptimisticHandoff> {
        let span = tracing::info_span!("session", id = %Uuid::new_v4());
        async {
            let (form, dialog) = self.prepare(draft, source).await?;
            let (writer, reader) = slot(self.store.clone(), options_for(&form), self.policy);
            writer.publish_options()?;

            let generator = Arc::clone(&self.generator);
            let transcript = dialog.transcript.clone();
            let task = tokio::spawn(
                async move {
                    match generator.generate(&form, &transcript).await {
                        Ok(letters) => {
                            if let Err(e) = writer.complete(&letters) {
                                tracing::error!("failed to publish letters: {e}");
                            }
                        }
                        Err(e) => {
                            tracing::error!("background letter generation failed: {e}");
                        }
                    }
                }
                .in_current_span(),
            );

            Ok::<_, AiselfError>(OptimisticHandoff {
                dialog,
                reader,
                task,
            })
        }
        .instrument(span)
        .await
    }

    /// Validate, clear stale state, then evaluate and follow up.
    async fn prepare(
        &self,
        draft: IntakeDraft,
        source: &mut dyn AnswerSource,
    ) -> crate::Result<(IntakeForm, DialogOutcome)> {
        let form = IntakeForm::try_from(draft)?;
        self.store.clear()?;
        tracing::info!("session started");

        let dialog = self.collect(&form, source).await;
        Ok((form, dialog))
    }

    /// Initial evaluation followed by the bounded dialog.
    pub async fn collect(&self, form: &IntakeForm, source: &mut dyn AnswerSource) -> DialogOutcome {
        let initial = self.evaluator.evaluate(form.background()).await;
        let outcome = DialogCollector::new(&self.evaluator, form.background(), self.max_rounds)
            .run(initial, source)
            .await;
        tracing::info!(
            reason = ?outcome.reason,
            rounds = outcome.rounds,
            "follow-up dialog finished"
        );
        outcome
    }
}

fn options_for(form: &IntakeForm) -> Options {
    Options {
        option_a: form.option_a().to_string(),
        option_b: form.option_b().to_string(),
    }
}
