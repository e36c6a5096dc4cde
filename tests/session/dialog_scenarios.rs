use std::sync::Arc;

use aiself::AiselfError;
use aiself::dialog::DoneReason;
use aiself::error::{GenerationError, IntakeError};
use aiself::llm::{ChatMessage, ScriptedReply, ScriptedTransport};
use aiself::narrative::LetterPair;

use crate::support::{
    CannedAnswers, LONG_BACKGROUND, draft, followup_insufficient, insufficient, letters_reply,
    memory_store, orchestrator, sufficient,
};

fn generation_user_message(requests: &[Vec<ChatMessage>]) -> String {
    let last = requests.last().expect("at least one request");
    last[1].content().to_string()
}

#[tokio::test]
async fn sufficient_background_goes_straight_to_generation() {
    let transport = Arc::new(ScriptedTransport::with_replies([
        sufficient(),
        letters_reply(),
    ]));
    let store = memory_store();
    let mut answers = CannedAnswers::default();

    let report = orchestrator(&transport, &store)
        .run(draft(LONG_BACKGROUND), &mut answers)
        .await
        .unwrap();

    assert_eq!(transport.call_count(), 2, "one evaluation and one generation");
    assert!(answers.asked.is_empty());
    assert_eq!(report.dialog.reason, DoneReason::Sufficient);
    for letter in [&report.letters.letter_a, &report.letters.letter_b] {
        assert!(letter.starts_with("Dear Li,"));
        assert!(!letter.contains("[NAME]"));
    }
    assert!(report.letters.letter_a.contains("Staying"));
    assert!(report.letters.letter_b.contains("Moving"));

    let persisted = store.read().unwrap();
    assert_eq!(persisted.letters, Some(report.letters));
    let options = persisted.options.unwrap();
    assert_eq!((options.option_a.as_str(), options.option_b.as_str()), ("stay", "move"));
}

#[tokio::test]
async fn three_insufficient_verdicts_then_sufficient_records_three_turns() {
    let transport = Arc::new(ScriptedTransport::with_replies([
        insufficient("Why is this choice coming up now?"),
        followup_insufficient("What does your family think?"),
        followup_insufficient("What would you miss most?"),
        sufficient(),
        letters_reply(),
    ]));
    let store = memory_store();
    let mut answers = CannedAnswers::answering(10);

    let report = orchestrator(&transport, &store)
        .run(draft("I might move."), &mut answers)
        .await
        .unwrap();

    assert_eq!(report.dialog.reason, DoneReason::Sufficient);
    assert_eq!(report.dialog.transcript.len(), 3);
    assert_eq!(answers.asked.len(), 3);
    assert_eq!(
        answers.rationales[0].as_deref(),
        Some("I'd like to know more.")
    );
    assert_eq!(transport.call_count(), 5);

    let user = generation_user_message(&transport.requests());
    assert!(user.contains("Supplementary information:"));
    assert!(user.contains("Q: Why is this choice coming up now?\nA: answer 1"));
    assert!(user.contains("Q: What would you miss most?\nA: answer 3"));
}

#[tokio::test]
async fn endless_insufficiency_stops_at_the_round_cap() {
    let transport = Arc::new(ScriptedTransport::with_replies([
        insufficient("Q1"),
        followup_insufficient("Q2"),
        followup_insufficient("Q3"),
        followup_insufficient("Q4"),
        letters_reply(),
        // Would be consumed as a fifth question if the cap were not enforced
        // before consulting the evaluator.
        followup_insufficient("Q5"),
    ]));
    let store = memory_store();
    let mut answers = CannedAnswers::answering(10);

    let report = orchestrator(&transport, &store)
        .run(draft("I might move."), &mut answers)
        .await
        .unwrap();

    assert_eq!(report.dialog.reason, DoneReason::CapReached);
    assert_eq!(report.dialog.rounds, 4);
    assert_eq!(report.dialog.transcript.len(), 4);
    assert_eq!(answers.asked, ["Q1", "Q2", "Q3", "Q4"]);
    // Initial check, three follow-ups, one generation.
    assert_eq!(transport.call_count(), 5);
    assert!(report.letters.letter_a.starts_with("Dear Li,"));
}

#[tokio::test]
async fn skip_at_first_question_generates_with_empty_transcript() {
    let transport = Arc::new(ScriptedTransport::with_replies([
        insufficient("Q1"),
        letters_reply(),
    ]));
    let store = memory_store();
    let mut answers = CannedAnswers::skipping();

    let report = orchestrator(&transport, &store)
        .run(draft("I might move."), &mut answers)
        .await
        .unwrap();

    assert_eq!(report.dialog.reason, DoneReason::Skipped);
    assert!(report.dialog.transcript.is_empty());
    assert_eq!(transport.call_count(), 2);
    let user = generation_user_message(&transport.requests());
    assert!(!user.contains("Supplementary information"));
    assert!(user.contains("- Option A: stay"));
}

#[tokio::test]
async fn broken_evaluator_never_blocks_the_flow() {
    let transport = Arc::new(ScriptedTransport::with_replies([
        ScriptedReply::Status(503),
        letters_reply(),
    ]));
    let store = memory_store();
    let mut answers = CannedAnswers::answering(3);

    let report = orchestrator(&transport, &store)
        .run(draft("I might move."), &mut answers)
        .await
        .unwrap();

    assert_eq!(report.dialog.reason, DoneReason::Sufficient);
    assert!(answers.asked.is_empty());
    assert!(report.letters.letter_b.contains("Moving"));
}

#[tokio::test]
async fn generation_failure_is_loud_and_publishes_no_letters() {
    let transport = Arc::new(ScriptedTransport::new([
        r#"{"sufficient": true}"#,
        r#"{"letterA": "Dear [NAME], only one path."}"#,
    ]));
    let store = memory_store();
    store
        .write_letters(&LetterPair {
            letter_a: "stale A".into(),
            letter_b: "stale B".into(),
        })
        .unwrap();
    let mut answers = CannedAnswers::default();

    let err = orchestrator(&transport, &store)
        .run(draft(LONG_BACKGROUND), &mut answers)
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        AiselfError::Generation(GenerationError::MissingLetter { branch: 'B' })
    ));
    let persisted = store.read().unwrap();
    assert!(persisted.letters.is_none(), "stale letters must be cleared");
    assert!(persisted.options.is_some());
}

#[tokio::test]
async fn incomplete_form_is_rejected_before_any_request() {
    let transport = Arc::new(ScriptedTransport::new(Vec::<String>::new()));
    let store = memory_store();
    let mut answers = CannedAnswers::default();

    let err = orchestrator(&transport, &store)
        .run(draft("   "), &mut answers)
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        AiselfError::Intake(IntakeError::MissingField("background"))
    ));
    assert_eq!(transport.call_count(), 0);
}
