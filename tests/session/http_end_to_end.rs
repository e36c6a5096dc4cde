use aiself::dialog::DoneReason;
use aiself::error::ConfigError;
use aiself::{AiselfError, Config, Orchestrator};
use serde_json::json;
use tempfile::TempDir;
use wiremock::matchers::{body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::support::{CannedAnswers, LONG_BACKGROUND, draft};

fn completion(content: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "choices": [
            {"message": {"role": "assistant", "content": content}, "finish_reason": "stop"}
        ]
    }))
}

fn config_for(server: &MockServer, handoff_dir: &TempDir, key: Option<&str>) -> Config {
    let mut config = Config::default();
    config.provider.base_url = server.uri();
    config.provider.api_key = key.map(str::to_string);
    config.handoff.dir = handoff_dir.path().display().to_string();
    config
}

#[tokio::test]
async fn full_session_over_http_with_file_handoff() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(header("Authorization", "Bearer test-key"))
        .and(body_string_contains("judges whether"))
        .respond_with(completion(r#"{"sufficient": true, "reason": "plenty"}"#))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(header("Authorization", "Bearer test-key"))
        .and(body_string_contains("life paths"))
        .respond_with(completion(
            "```json\n{\"letterA\": \"Dear [NAME],\nI stayed.\", \"letterB\": \"Dear [NAME],\nI left.\"}\n```",
        ))
        .expect(1)
        .mount(&server)
        .await;

    let tmp = TempDir::new().unwrap();
    let config = config_for(&server, &tmp, Some("test-key"));
    let orchestrator = Orchestrator::from_config(&config).unwrap();
    let mut answers = CannedAnswers::default();

    let report = orchestrator
        .run(draft(LONG_BACKGROUND), &mut answers)
        .await
        .unwrap();

    assert_eq!(report.dialog.reason, DoneReason::Sufficient);
    assert_eq!(report.letters.letter_a, "Dear Li,\nI stayed.");
    assert_eq!(report.letters.letter_b, "Dear Li,\nI left.");
    assert!(tmp.path().join("letters.json").exists());
    assert!(tmp.path().join("options.json").exists());
}

#[tokio::test]
async fn missing_credential_is_fatal_before_any_request() {
    let server = MockServer::start().await;
    let tmp = TempDir::new().unwrap();
    let config = config_for(&server, &tmp, None);

    let err = Orchestrator::from_config(&config).err().unwrap();
    assert!(matches!(
        err,
        AiselfError::Config(ConfigError::MissingCredential { .. })
    ));
    assert!(
        server
            .received_requests()
            .await
            .unwrap_or_default()
            .is_empty()
    );
}
