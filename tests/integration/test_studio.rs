//! End-to-end tests for the studio HTTP API.
//!
//! The studio router runs on one ephemeral port and talks to a fake Gemini
//! server on another, so every request crosses real sockets.

#[path = "fake_gemini.rs"]
mod fake_gemini;

use std::net::TcpListener;
use std::sync::Arc;
use std::time::Duration;

use educa_genai::{ContentClient, GeminiProvider, ImageDataUri, ModelSet};
use educa_render::{mold_file_name, write_image};
use educa_studio::{create_router, AppState, Config};
use fake_gemini::{FakeGemini, PNG_PAYLOAD, TEST_KEY};
use serde_json::{json, Value};

struct Harness {
    fake: FakeGemini,
    base: String,
    http: reqwest::Client,
    _handle: tokio::task::JoinHandle<()>,
}

fn find_available_port() -> u16 {
    TcpListener::bind("127.0.0.1:0")
        .expect("Failed to bind to port")
        .local_addr()
        .expect("Failed to get local addr")
        .port()
}

async fn spawn_studio() -> Harness {
    let fake = fake_gemini::spawn().await;

    let mut config = Config::default();
    config.provider.base_url.clone_from(&fake.base_url);
    config.validate().expect("config should be valid");

    let provider = GeminiProvider::new(&config.provider.base_url, TEST_KEY);
    let client = ContentClient::new(Arc::new(provider), ModelSet::from(&config.provider));
    let router = create_router(AppState::new(config, client));

    let port = find_available_port();
    let addr = format!("127.0.0.1:{port}");
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("Failed to bind");
    let handle = tokio::spawn(async move {
        axum::serve(listener, router).await.expect("Server failed");
    });

    // Give the server a moment to start
    tokio::time::sleep(Duration::from_millis(50)).await;

    Harness {
        fake,
        base: format!("http://{addr}/api"),
        http: reqwest::Client::new(),
        _handle: handle,
    }
}

impl Harness {
    async fn put(&self, path: &str, body: Value) -> (u16, Value) {
        let response = self
            .http
            .put(format!("{}{path}", self.base))
            .json(&body)
            .send()
            .await
            .expect("request failed");
        let status = response.status().as_u16();
        (status, response.json().await.expect("json body"))
    }

    async fn post(&self, path: &str) -> (u16, Value) {
        let response = self
            .http
            .post(format!("{}{path}", self.base))
            .send()
            .await
            .expect("request failed");
        let status = response.status().as_u16();
        (status, response.json().await.expect("json body"))
    }

    async fn post_json(&self, path: &str, body: Value) -> (u16, Value) {
        let response = self
            .http
            .post(format!("{}{path}", self.base))
            .json(&body)
            .send()
            .await
            .expect("request failed");
        let status = response.status().as_u16();
        (status, response.json().await.expect("json body"))
    }

    async fn get_text(&self, path: &str) -> (u16, String) {
        let response = self
            .http
            .get(format!("{}{path}", self.base))
            .send()
            .await
            .expect("request failed");
        let status = response.status().as_u16();
        (status, response.text().await.expect("text body"))
    }
}

#[tokio::test]
async fn test_lesson_plan_end_to_end() {
    let h = spawn_studio().await;

    let (status, _) = h
        .post_json("/navigate", json!({ "view": "LESSON_PLANS" }))
        .await;
    assert_eq!(status, 200);

    let (status, body) = h
        .put("/forms/lesson-plan", json!({ "theme": "Animais da Fazenda" }))
        .await;
    assert_eq!(status, 200);
    assert_eq!(body["canSubmit"], true);

    let (status, body) = h.post("/forms/lesson-plan/submit").await;
    assert_eq!(status, 200);
    assert_eq!(body["status"]["state"], "SUCCEEDED");
    assert_eq!(body["result"]["steps"][2], "Desenho");

    let (status, markdown) = h.get_text("/forms/lesson-plan/rendered").await;
    assert_eq!(status, 200);
    assert!(markdown.starts_with("# Animais da Fazenda"));
    assert!(markdown.contains("- `EI03ET02`"));
    assert!(markdown.contains("1. Roda de conversa\n2. Música\n3. Desenho"));
    assert!(markdown.contains("*Gerado pelo EducaKids em"));

    let prompt = h.fake.received()[0].body.prompt_text();
    assert!(prompt.contains("Animais da Fazenda"));
    assert!(prompt.contains("3 a 4 anos"));
    assert!(prompt.contains("4 horas"));
}

#[tokio::test]
async fn test_provider_error_fails_only_that_form() {
    let h = spawn_studio().await;

    h.put("/forms/story", json!({ "topic": "sapo" })).await;
    let (status, _) = h.post("/forms/story/submit").await;
    assert_eq!(status, 200);

    h.put("/forms/activities", json!({ "topic": "ERRO" })).await;
    let (status, body) = h.post("/forms/activities/submit").await;
    assert_eq!(status, 502);
    assert_eq!(body["view"], "ACTIVITIES");
    assert!(body["error"]
        .as_str()
        .expect("error message")
        .contains("invalid argument"));

    let (_, story) = h.put("/forms/story", json!({ "topic": "sapo" })).await;
    assert_eq!(story["status"]["state"], "SUCCEEDED");
    assert!(story["result"]
        .as_str()
        .expect("story text")
        .contains("sapo"));

    let (_, activities) = h.post("/forms/activities/dismiss").await;
    assert_eq!(activities["status"]["state"], "IDLE");
    assert_eq!(activities["input"]["topic"], "ERRO");
}

#[tokio::test]
async fn test_mold_image_can_be_saved() {
    let h = spawn_studio().await;

    h.put("/forms/molds", json!({ "description": "borboleta azul" }))
        .await;
    let (status, body) = h.post("/forms/molds/submit").await;
    assert_eq!(status, 200);

    let uri = body["result"].as_str().expect("data uri");
    assert_eq!(uri, format!("data:image/png;base64,{PNG_PAYLOAD}"));

    let image: ImageDataUri = uri.parse().expect("valid data uri");
    let dir = std::env::temp_dir().join(format!("educa-it-mold-{}", std::process::id()));
    std::fs::create_dir_all(&dir).expect("create dir");
    let path = dir.join(mold_file_name("borboleta azul"));
    write_image(&image, &path).expect("write image");

    assert!(path.ends_with("molde-borboleta-azul.png"));
    assert_eq!(std::fs::read(&path).expect("read image")[1..4], *b"PNG");
    std::fs::remove_dir_all(&dir).expect("cleanup");
}

#[tokio::test]
async fn test_report_edit_after_generation() {
    let h = spawn_studio().await;

    h.put(
        "/forms/report",
        json!({
            "studentName": "Joãozinho",
            "highlights": "Reconhece as cores",
            "socialization": "Lidera as brincadeiras"
        }),
    )
    .await;
    let (status, body) = h.post("/forms/report/submit").await;
    assert_eq!(status, 200);
    assert!(body["result"]
        .as_str()
        .expect("report")
        .contains("Lidera as brincadeiras"));

    let (status, body) = h
        .put(
            "/forms/report/result",
            json!({ "text": "Joãozinho lidera as brincadeiras com alegria." }),
        )
        .await;
    assert_eq!(status, 200);
    assert_eq!(
        body["result"],
        "Joãozinho lidera as brincadeiras com alegria."
    );

    let (_, markdown) = h.get_text("/forms/report/rendered").await;
    assert!(markdown.starts_with("# Relatório Descritivo: Joãozinho"));
    assert!(markdown.contains("com alegria."));
}

#[tokio::test]
async fn test_library_is_static() {
    let h = spawn_studio().await;

    let response = h
        .http
        .get(format!("{}/library", h.base))
        .send()
        .await
        .expect("request failed");
    let body: Value = response.json().await.expect("json body");
    let titles: Vec<_> = body["books"]
        .as_array()
        .expect("books")
        .iter()
        .map(|b| b["title"].as_str().expect("title").to_string())
        .collect();
    assert_eq!(
        titles,
        vec![
            "O Pequeno Príncipe",
            "Menina Bonita do Laço de Fita",
            "A Lagarta Comilona",
            "Elmer, o Elefante Xadrez",
        ]
    );
    assert!(h.fake.received().is_empty());
}
