//! Integration tests for the Gemini provider over real HTTP.
//!
//! A fake Gemini server runs on an ephemeral port; the provider and the
//! content client talk to it with `reqwest`.

#[path = "fake_gemini.rs"]
mod fake_gemini;

use std::sync::Arc;

use educa_genai::{
    ContentClient, ContentProvider, GeminiProvider, GenerateContentRequest, GenerationError,
    ModelSet, Socialization, REPORT_FALLBACK,
};
use fake_gemini::{FakeGemini, PNG_PAYLOAD, TEST_KEY};

fn client_for(fake: &FakeGemini, key: &str) -> ContentClient {
    let provider = GeminiProvider::new(&fake.base_url, key);
    ContentClient::new(Arc::new(provider), ModelSet::default())
}

#[tokio::test]
async fn test_provider_sends_key_and_targets_model_endpoint() {
    let fake = fake_gemini::spawn().await;
    let provider = GeminiProvider::new(format!("{}/", fake.base_url), TEST_KEY);

    let response = provider
        .generate("gemini-2.5-flash", &GenerateContentRequest::from_prompt("Olá"))
        .await
        .expect("generate failed");
    assert_eq!(response.text(), "Resposta para: Olá");

    let received = fake.received();
    assert_eq!(received.len(), 1);
    assert_eq!(received[0].call, "gemini-2.5-flash:generateContent");
    assert_eq!(received[0].body.prompt_text(), "Olá");
}

#[tokio::test]
async fn test_error_envelope_message_is_surfaced() {
    let fake = fake_gemini::spawn().await;
    let client = client_for(&fake, TEST_KEY);

    let err = client.request_story("ERRO").await.expect_err("should fail");
    match err {
        GenerationError::Api { status, message } => {
            assert_eq!(status, 400);
            assert_eq!(message, "Request contains an invalid argument.");
        }
        other => unreachable!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_wrong_key_is_auth_failure() {
    let fake = fake_gemini::spawn().await;
    let client = client_for(&fake, "wrong-key");

    let err = client
        .request_activity_ideas("cores", false)
        .await
        .expect_err("should fail");
    assert!(err.is_auth_failure());
    assert!(err.to_string().contains("API key not valid"));
}

#[tokio::test]
async fn test_lesson_plan_decodes_structured_json() {
    let fake = fake_gemini::spawn().await;
    let client = client_for(&fake, TEST_KEY);

    let plan = client
        .request_lesson_plan("Animais da Fazenda", "3 a 4 anos", "4 horas")
        .await
        .expect("lesson plan failed");

    assert_eq!(plan.theme.as_deref(), Some("Animais da Fazenda"));
    assert_eq!(
        plan.steps.expect("steps"),
        vec!["Roda de conversa", "Música", "Desenho"]
    );
    assert_eq!(
        plan.bncc_codes.expect("codes"),
        vec!["EI03ET02", "EI03EF01"]
    );

    let received = fake.received();
    let config = received[0]
        .body
        .generation_config
        .as_ref()
        .expect("generation config");
    assert_eq!(config.response_mime_type.as_deref(), Some("application/json"));
    assert!(config.response_schema.is_some());
}

#[tokio::test]
async fn test_visual_resource_returns_data_uri_from_image_model() {
    let fake = fake_gemini::spawn().await;
    let client = client_for(&fake, TEST_KEY);

    let image = client
        .request_visual_resource("borboleta")
        .await
        .expect("image failed")
        .expect("image present");

    assert_eq!(
        image.to_string(),
        format!("data:image/png;base64,{PNG_PAYLOAD}")
    );
    assert_eq!(&image.decode_bytes().expect("base64")[1..4], b"PNG");
    assert_eq!(
        fake.received()[0].call,
        "gemini-2.5-flash-image:generateContent"
    );
}

#[tokio::test]
async fn test_empty_candidates_fall_back() {
    let fake = fake_gemini::spawn().await;
    let client = client_for(&fake, TEST_KEY);

    let report = client
        .request_student_report("VAZIO", "Curiosa", "", Socialization::LeadsPlay)
        .await
        .expect("report failed");
    assert_eq!(report, REPORT_FALLBACK);

    let story = client.request_story("VAZIO").await.expect("story failed");
    assert!(story.is_empty());

    let image = client
        .request_visual_resource("VAZIO")
        .await
        .expect("image failed");
    assert!(image.is_none());
}

#[tokio::test]
async fn test_report_prompt_carries_every_input() {
    let fake = fake_gemini::spawn().await;
    let client = client_for(&fake, TEST_KEY);

    client
        .request_student_report(
            "Joãozinho",
            "Reconhece as cores",
            "Resistência ao sono",
            Socialization::StillAdapting,
        )
        .await
        .expect("report failed");

    let prompt = fake.received()[0].body.prompt_text();
    assert!(prompt.contains("Joãozinho"));
    assert!(prompt.contains("Reconhece as cores"));
    assert!(prompt.contains("Resistência ao sono"));
    assert!(prompt.contains("Ainda em adaptação"));
}

#[tokio::test]
async fn test_unreachable_server_is_transport_error() {
    let provider = GeminiProvider::new("http://127.0.0.1:9", TEST_KEY);
    let client = ContentClient::new(Arc::new(provider), ModelSet::default());

    let err = client.request_story("sapo").await.expect_err("should fail");
    assert!(matches!(err, GenerationError::Transport(_)));
}
