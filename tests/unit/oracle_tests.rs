use std::sync::Arc;

use blackout::config::OracleConfig;
use blackout::error::OracleError;
use blackout::oracle::{GeminiOracle, PhraseOracle, StaticOracle};
use blackout::{RedactionInput, RedactionIntensity, RedactionMode, RedactionRequest};
use mockito::{mock, Matcher};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::fixtures::{StubRenderer, TestFixtures};

/// Each test uses its own model name so mocks on the shared server never overlap
fn oracle_for(model: &str) -> GeminiOracle {
    let config = OracleConfig {
        endpoint: mockito::server_url(),
        model: model.to_string(),
        api_key: Some("test-key".to_string()),
        timeout_secs: 5,
    };
    GeminiOracle::new(&config).unwrap()
}

fn path_for(model: &str) -> Matcher {
    Matcher::Regex(format!(r"^/v1beta/models/{}:generateContent", model))
}

fn candidate_body(answer: &str) -> String {
    serde_json::json!({
        "candidates": [{ "content": { "parts": [{ "text": answer }] } }]
    })
    .to_string()
}

#[tokio::test]
async fn test_gemini_returns_phrases() {
    let m = mock("POST", path_for("model-ok"))
        .match_body(Matcher::Regex("responseSchema".into()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(candidate_body(r#"["Jane", "555-0100", "  "]"#))
        .expect(1)
        .create();

    let phrases = oracle_for("model-ok").detect("Call Jane at 555-0100").await;
    assert_eq!(phrases, vec!["Jane".to_string(), "555-0100".to_string()]);
    m.assert();
}

#[tokio::test]
async fn test_gemini_server_error_yields_nothing() {
    let _m = mock("POST", path_for("model-500"))
        .with_status(500)
        .with_body("internal")
        .create();

    let oracle = oracle_for("model-500");
    assert!(matches!(
        oracle.try_detect("Jane Doe").await,
        Err(OracleError::Status { status: 500, .. })
    ));
    assert!(oracle.detect("Jane Doe").await.is_empty());
}

#[tokio::test]
async fn test_gemini_malformed_answer_yields_nothing() {
    let _m = mock("POST", path_for("model-garbled"))
        .with_status(200)
        .with_body(candidate_body("Sure! Here are the names: Jane"))
        .create();

    let oracle = oracle_for("model-garbled");
    assert!(matches!(
        oracle.try_detect("Jane Doe").await,
        Err(OracleError::MalformedResponse(_))
    ));
    assert!(oracle.detect("Jane Doe").await.is_empty());
}

#[tokio::test]
async fn test_gemini_without_candidates_yields_nothing() {
    let _m = mock("POST", path_for("model-empty"))
        .with_status(200)
        .with_body("{}")
        .create();

    let oracle = oracle_for("model-empty");
    assert!(matches!(
        oracle.try_detect("Jane Doe").await,
        Err(OracleError::EmptyResponse)
    ));
}

#[tokio::test]
async fn test_ai_mode_redacts_oracle_phrases_end_to_end() {
    let _m = mock("POST", path_for("model-flow"))
        .with_status(200)
        .with_body(candidate_body(r#"["jane", "doe", "555-0100"]"#))
        .create();

    let redactor = TestFixtures::redactor(
        StubRenderer::new(vec![]),
        Arc::new(oracle_for("model-flow")),
    );
    let request = RedactionRequest {
        input: RedactionInput::Text("Call Jane Doe at 555-0100.".into()),
        intensity: RedactionIntensity::new(50).unwrap(),
        mode: RedactionMode::AiSensitive,
    };
    let result = redactor
        .generate(&request, &mut StdRng::seed_from_u64(0), &mut |_| {})
        .await
        .unwrap();

    assert_eq!(result.stats.phrases_detected, 3);
    assert_eq!(result.redacted_text.as_deref(), Some("Call ████ ███ at █████████"));
    assert_eq!(result.pages[0].surface.text_runs(), vec!["Call ", "at "]);
}

#[tokio::test]
async fn test_ai_mode_with_failed_oracle_draws_everything() {
    let _m = mock("POST", path_for("model-down"))
        .with_status(503)
        .create();

    let redactor = TestFixtures::redactor(
        StubRenderer::new(vec![]),
        Arc::new(oracle_for("model-down")),
    );
    let request = RedactionRequest {
        input: RedactionInput::Text("Call Jane Doe".into()),
        intensity: RedactionIntensity::new(80).unwrap(),
        mode: RedactionMode::AiSensitive,
    };
    let result = redactor
        .generate(&request, &mut StdRng::seed_from_u64(0), &mut |_| {})
        .await
        .unwrap();

    assert_eq!(result.stats.tokens_redacted, 0);
    assert_eq!(result.redacted_text.as_deref(), Some("Call Jane Doe"));
}

#[test]
fn test_static_oracle_blocking() {
    let oracle = StaticOracle::new(["secret"]);
    assert_eq!(tokio_test::block_on(oracle.detect("a secret")), vec!["secret"]);
    assert!(tokio_test::block_on(oracle.detect("   ")).is_empty());
}
