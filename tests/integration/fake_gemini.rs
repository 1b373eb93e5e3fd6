//! A stand-in for the Gemini REST API, served on an ephemeral port.
//!
//! Answers by looking at the model and the prompt:
//!
//! - a wrong `x-goog-api-key` gets a 403 error envelope
//! - a prompt containing `ERRO` gets a 400 error envelope
//! - an image model gets one inline PNG part
//! - a request with a response schema gets a lesson plan JSON document
//! - a prompt containing `VAZIO` gets an empty candidate list
//! - anything else gets one text part echoing the prompt

#![allow(dead_code)]

use std::net::TcpListener;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use educa_genai::GenerateContentRequest;
use serde_json::{json, Value};

/// Key the fake server accepts.
pub const TEST_KEY: &str = "test-key";

/// Base64 of the PNG signature, enough to look like an image.
pub const PNG_PAYLOAD: &str = "iVBORw0KGgo=";

/// Lesson plan returned for schema requests.
pub fn lesson_plan_body() -> Value {
    json!({
        "theme": "Animais da Fazenda",
        "ageGroup": "3 a 4 anos",
        "bnccCodes": ["EI03ET02", "EI03EF01"],
        "objectives": ["Reconhecer animais", "Imitar sons"],
        "resources": ["Fantoches", "Figuras"],
        "steps": ["Roda de conversa", "Música", "Desenho"],
        "evaluation": "Observação durante as atividades"
    })
}

/// One call received by the fake server.
#[derive(Debug, Clone)]
pub struct Received {
    /// The `{model}:generateContent` path segment.
    pub call: String,
    /// The request body.
    pub body: GenerateContentRequest,
}

#[derive(Clone, Default)]
struct FakeState {
    received: Arc<Mutex<Vec<Received>>>,
}

/// Handle to a running fake server.
pub struct FakeGemini {
    /// Base URL, e.g. `http://127.0.0.1:40123`.
    pub base_url: String,
    received: Arc<Mutex<Vec<Received>>>,
    _handle: tokio::task::JoinHandle<()>,
}

impl FakeGemini {
    /// Calls received so far.
    pub fn received(&self) -> Vec<Received> {
        self.received.lock().expect("lock poisoned").clone()
    }
}

fn find_available_port() -> u16 {
    TcpListener::bind("127.0.0.1:0")
        .expect("Failed to bind to port")
        .local_addr()
        .expect("Failed to get local addr")
        .port()
}

/// Starts the fake server.
pub async fn spawn() -> FakeGemini {
    let state = FakeState::default();
    let received = Arc::clone(&state.received);

    let router = Router::new()
        .route("/v1beta/models/:call", post(handle_generate))
        .with_state(state);

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

    FakeGemini {
        base_url: format!("http://{addr}"),
        received,
        _handle: handle,
    }
}

fn error_envelope(status: StatusCode, message: &str) -> Response {
    let body = json!({
        "error": {
            "code": status.as_u16(),
            "message": message,
            "status": "INVALID_ARGUMENT"
        }
    });
    (status, Json(body)).into_response()
}

fn text_response(text: &str) -> Response {
    Json(json!({
        "candidates": [{
            "content": { "role": "model", "parts": [{ "text": text }] },
            "finishReason": "STOP"
        }]
    }))
    .into_response()
}

async fn handle_generate(
    State(state): State<FakeState>,
    Path(call): Path<String>,
    headers: HeaderMap,
    Json(body): Json<GenerateContentRequest>,
) -> Response {
    state
        .received
        .lock()
        .expect("lock poisoned")
        .push(Received {
            call: call.clone(),
            body: body.clone(),
        });

    let key = headers
        .get("x-goog-api-key")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    if key != TEST_KEY {
        return error_envelope(StatusCode::FORBIDDEN, "API key not valid. Please pass a valid API key.");
    }

    let Some(model) = call.strip_suffix(":generateContent") else {
        return error_envelope(StatusCode::NOT_FOUND, "unknown method");
    };

    let prompt = body.prompt_text();
    if prompt.contains("ERRO") {
        return error_envelope(StatusCode::BAD_REQUEST, "Request contains an invalid argument.");
    }
    if prompt.contains("VAZIO") {
        return Json(json!({ "candidates": [] })).into_response();
    }

    if model.contains("image") {
        return Json(json!({
            "candidates": [{
                "content": {
                    "role": "model",
                    "parts": [
                        { "text": "Aqui está o seu molde." },
                        { "inlineData": { "mimeType": "image/png", "data": PNG_PAYLOAD } }
                    ]
                }
            }]
        }))
        .into_response();
    }

    let wants_json = body
        .generation_config
        .as_ref()
        .is_some_and(|c| c.response_schema.is_some());
    if wants_json {
        return text_response(&lesson_plan_body().to_string());
    }

    text_response(&format!("Resposta para: {prompt}"))
}
