use std::sync::Arc;
use std::time::Duration;

use aiself::Orchestrator;
use aiself::error::HandoffError;
use aiself::handoff::{FileStore, HandoffReader, HandoffStore, WaitPolicy};
use aiself::llm::{ScriptedReply, ScriptedTransport};
use tempfile::TempDir;

use crate::support::{
    CannedAnswers, LONG_BACKGROUND, MAX_ROUNDS, draft, fast_policy, letters_reply, memory_store,
    orchestrator, sufficient,
};

#[tokio::test]
async fn reader_receives_letters_written_in_the_background() {
    let transport = Arc::new(ScriptedTransport::with_replies([
        sufficient(),
        letters_reply(),
    ]));
    let store = memory_store();
    let mut answers = CannedAnswers::default();

    let mut handoff = orchestrator(&transport, &store)
        .run_optimistic(draft(LONG_BACKGROUND), &mut answers)
        .await
        .unwrap();

    // Options are visible before the letters exist.
    assert!(store.read_options().unwrap().is_some());

    let letters = handoff.reader.wait().await.unwrap();
    handoff.task.await.unwrap();
    assert!(letters.letter_a.starts_with("Dear Li,"));
    assert_eq!(store.read_letters().unwrap(), Some(letters));
}

#[tokio::test]
async fn failed_generation_abandons_the_attached_reader() {
    let transport = Arc::new(ScriptedTransport::with_replies([
        sufficient(),
        ScriptedReply::Timeout,
    ]));
    let store = memory_store();
    let mut answers = CannedAnswers::default();

    let mut handoff = orchestrator(&transport, &store)
        .run_optimistic(draft(LONG_BACKGROUND), &mut answers)
        .await
        .unwrap();

    let err = handoff.reader.wait().await.unwrap_err();
    assert!(matches!(err, HandoffError::Abandoned));
    handoff.task.await.unwrap();

    let persisted = store.read().unwrap();
    assert!(persisted.options.is_some());
    assert!(persisted.letters.is_none());
}

#[tokio::test]
async fn detached_display_surface_reads_from_the_file_store() {
    let tmp = TempDir::new().unwrap();
    let store = HandoffStore::new(Arc::new(FileStore::new(tmp.path().join("handoff"))));
    let transport = Arc::new(ScriptedTransport::with_replies([
        sufficient(),
        letters_reply(),
    ]));
    let mut answers = CannedAnswers::default();

    let handoff = Orchestrator::new(transport, store.clone(), MAX_ROUNDS, fast_policy())
        .run_optimistic(draft(LONG_BACKGROUND), &mut answers)
        .await
        .unwrap();
    drop(handoff.reader);

    let mut display = HandoffReader::detached(store, fast_policy());
    let letters = display.wait().await.unwrap();
    assert!(letters.letter_b.contains("Moving"));
    handoff.task.await.unwrap();
}

#[tokio::test]
async fn detached_display_surface_gives_up_after_the_deadline() {
    let transport = Arc::new(ScriptedTransport::with_replies([
        sufficient(),
        ScriptedReply::Status(500),
    ]));
    let store = memory_store();
    let mut answers = CannedAnswers::default();

    let handoff = orchestrator(&transport, &store)
        .run_optimistic(draft(LONG_BACKGROUND), &mut answers)
        .await
        .unwrap();
    handoff.task.await.unwrap();

    let mut display = HandoffReader::detached(
        store,
        WaitPolicy {
            poll_interval: Duration::from_millis(10),
            deadline: Duration::from_millis(80),
        },
    );
    let err = display.wait().await.unwrap_err();
    assert!(matches!(err, HandoffError::DeadlineElapsed { waited_ms: 80 }));
}
