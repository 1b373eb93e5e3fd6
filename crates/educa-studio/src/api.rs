//! HTTP API for the EducaKids studio.
//!
//! A browser front-end drives the studio through these endpoints. The
//! server holds one [`Studio`]: the navigation shell plus one form session
//! per generator view.
//!
//! # Endpoints
//!
//! - `GET /api/shell` - Current view, menu and dashboard cards
//! - `POST /api/navigate` - Switch views
//! - `GET /api/library` - Book collection and selected tab
//! - `POST /api/library/tab` - Select a library tab
//! - `GET /api/library/books/:id` - One book
//! - `GET /api/forms/:form` - Form snapshot
//! - `PUT /api/forms/:form` - Replace the form input
//! - `POST /api/forms/:form/submit` - Generate content
//! - `POST /api/forms/:form/dismiss` - Acknowledge a failure
//! - `POST /api/forms/:form/reset` - Drop the result
//! - `GET /api/forms/:form/rendered` - Result as Markdown
//! - `PUT /api/forms/report/result` - Edit the generated report
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use educa_genai::{ContentClient, GeminiProvider, ModelSet};
//! use educa_studio::{create_router, AppState, Config};
//!
//! # async fn example() {
//! let config = Config::default();
//! let provider = GeminiProvider::from_settings(&config.provider).unwrap();
//! let client = ContentClient::new(Arc::new(provider), ModelSet::from(&config.provider));
//! let router = create_router(AppState::new(config, client));
//! let listener = tokio::net::TcpListener::bind("127.0.0.1:3000").await.unwrap();
//! axum::serve(listener, router).await.unwrap();
//! # }
//! ```

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use educa_genai::{ContentClient, GenerationError};
use educa_render::MarkdownGenerator;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::{info, warn};

use crate::catalog::{self, Book};
use crate::error::{generation_suggestion, FormError};
use crate::form::{FormSession, FormSpec, Settled, SubmitTicket};
use crate::shell::{menu, DashboardCard, LibraryTab, MenuItem, Shell, ViewKind};
use crate::shell::{DASHBOARD_CARDS, DASHBOARD_GREETING};
use crate::views::{FormId, Studio};
use crate::Config;

// ============================================================================
// Request/Response Types
// ============================================================================

/// Response body for `GET /api/shell`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShellResponse {
    /// Navigation position.
    pub shell: Shell,
    /// Menu entries in display order.
    pub menu: Vec<MenuItem>,
    /// Dashboard greeting.
    pub greeting: &'static str,
    /// Dashboard shortcut cards.
    pub cards: &'static [DashboardCard],
}

/// Request body for `POST /api/navigate`.
#[derive(Debug, Clone, Deserialize)]
pub struct NavigateRequest {
    /// View to open.
    pub view: ViewKind,
}

/// Response body for `POST /api/navigate`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NavigateResponse {
    /// View shown before the switch.
    pub previous: ViewKind,
    /// Navigation position after the switch.
    pub shell: Shell,
}

/// Request body for `POST /api/library/tab`.
#[derive(Debug, Clone, Deserialize)]
pub struct LibraryTabRequest {
    /// Tab to select.
    pub tab: LibraryTab,
}

/// Response body for `GET /api/library`.
#[derive(Debug, Clone, Serialize)]
pub struct LibraryResponse {
    /// Selected tab.
    pub tab: LibraryTab,
    /// The book collection.
    pub books: &'static [Book],
}

/// Request body for `PUT /api/forms/report/result`.
#[derive(Debug, Clone, Deserialize)]
pub struct EditResultRequest {
    /// Replacement report text.
    pub text: String,
}

/// Error response body returned on failure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Description of the error.
    pub error: String,
    /// View the failure belongs to, when it came from a form.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub view: Option<ViewKind>,
}

// ============================================================================
// Application State
// ============================================================================

/// Shared application state for the HTTP server.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Studio configuration.
    pub config: Config,
    /// Client used for every generation.
    pub client: ContentClient,
    /// Shell and form sessions.
    pub studio: Arc<Mutex<Studio>>,
}

impl AppState {
    /// Creates a new `AppState` with a fresh studio.
    #[must_use]
    pub fn new(config: Config, client: ContentClient) -> Self {
        Self::with_studio(config, client, Studio::new())
    }

    /// Creates a new `AppState` around an existing studio.
    #[must_use]
    pub fn with_studio(config: Config, client: ContentClient, studio: Studio) -> Self {
        Self {
            config,
            client,
            studio: Arc::new(Mutex::new(studio)),
        }
    }
}

// ============================================================================
// API Error Type
// ============================================================================

/// Internal error type for API handlers.
#[derive(Debug)]
enum ApiError {
    /// The request body does not fit the form.
    BadInput(String),
    /// A required field is blank.
    Validation(String),
    /// The form is busy, or the result is no longer wanted.
    Conflict(String),
    /// Nothing to act on.
    NotFound(String),
    /// The provider failed; the form is now `Failed`.
    Generation { message: String, view: ViewKind },
}

impl From<FormError> for ApiError {
    fn from(err: FormError) -> Self {
        match err {
            FormError::MissingField { .. } => Self::Validation(err.to_string()),
            FormError::AlreadySubmitting => Self::Conflict(err.to_string()),
            FormError::NoResult => Self::NotFound(err.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error, view) = match self {
            Self::BadInput(msg) => (StatusCode::BAD_REQUEST, msg, None),
            Self::Validation(msg) => (StatusCode::UNPROCESSABLE_ENTITY, msg, None),
            Self::Conflict(msg) => (StatusCode::CONFLICT, msg, None),
            Self::NotFound(msg) => (StatusCode::NOT_FOUND, msg, None),
            Self::Generation { message, view } => (StatusCode::BAD_GATEWAY, message, Some(view)),
        };

        let body = Json(ErrorResponse { error, view });
        (status, body).into_response()
    }
}

// ============================================================================
// Router Setup
// ============================================================================

/// Creates the HTTP router with all API endpoints.
///
/// The router carries CORS middleware for browser front-ends and tracing
/// middleware for request logging.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_routes = Router::new()
        .route("/shell", get(handle_shell))
        .route("/navigate", post(handle_navigate))
        .route("/library", get(handle_library))
        .route("/library/tab", post(handle_library_tab))
        .route("/library/books/:id", get(handle_book))
        .route("/forms/:form", get(handle_get_form).put(handle_put_form))
        .route("/forms/:form/submit", post(handle_submit))
        .route("/forms/:form/dismiss", post(handle_dismiss))
        .route("/forms/:form/reset", post(handle_reset))
        .route("/forms/:form/rendered", get(handle_rendered))
        .route("/forms/:form/result", put(handle_edit_result));

    Router::new()
        .nest("/api", api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(Arc::new(state))
}

// ============================================================================
// Form dispatch
// ============================================================================

type Access<F> = fn(&mut Studio) -> &mut FormSession<F>;

fn lesson_plan(s: &mut Studio) -> &mut FormSession<crate::views::LessonPlanForm> {
    &mut s.lesson_plan
}

fn report(s: &mut Studio) -> &mut FormSession<crate::views::ReportForm> {
    &mut s.report
}

fn activities(s: &mut Studio) -> &mut FormSession<crate::views::ActivityForm> {
    &mut s.activities
}

fn inclusive(s: &mut Studio) -> &mut FormSession<crate::views::ActivityForm> {
    &mut s.inclusive
}

fn molds(s: &mut Studio) -> &mut FormSession<crate::views::MoldForm> {
    &mut s.molds
}

fn story(s: &mut Studio) -> &mut FormSession<crate::views::StoryForm> {
    &mut s.story
}

/// Runs a generic form operation against the session `form` names.
macro_rules! dispatch {
    ($form:expr, $op:ident($($arg:expr),*)) => {
        match $form {
            FormId::LessonPlan => $op($($arg,)* $form, lesson_plan as Access<_>).await,
            FormId::Report => $op($($arg,)* $form, report as Access<_>).await,
            FormId::Activities => $op($($arg,)* $form, activities as Access<_>).await,
            FormId::Inclusive => $op($($arg,)* $form, inclusive as Access<_>).await,
            FormId::Molds => $op($($arg,)* $form, molds as Access<_>).await,
            FormId::Story => $op($($arg,)* $form, story as Access<_>).await,
        }
    };
}

async fn snapshot_form<F: FormSpec>(state: &AppState, _form: FormId, access: Access<F>) -> Response {
    let mut studio = state.studio.lock().await;
    Json(access(&mut studio).snapshot()).into_response()
}

async fn update_form<F: FormSpec + serde::de::DeserializeOwned>(
    state: &AppState,
    body: serde_json::Value,
    form: FormId,
    access: Access<F>,
) -> Result<Response, ApiError> {
    let input: F = serde_json::from_value(body)
        .map_err(|e| ApiError::BadInput(format!("invalid input for form '{form}': {e}")))?;

    let mut studio = state.studio.lock().await;
    let session = access(&mut studio);
    session.update(input);
    Ok(Json(session.snapshot()).into_response())
}

async fn submit_form<F: FormSpec>(
    state: &AppState,
    form: FormId,
    access: Access<F>,
) -> Result<Response, ApiError> {
    let (ticket, task) = {
        let mut studio = state.studio.lock().await;
        let session = access(&mut studio);
        let ticket = session.begin_submit()?;
        (ticket, session.input().to_task())
    };
    info!(form = %form, ticket = ticket.id(), "Generation requested");

    let mut in_flight = InFlight {
        studio: Arc::clone(&state.studio),
        access,
        ticket,
        form,
        armed: true,
    };
    // The lock is released while the provider works.
    let outcome = state.client.run(&task).await;

    let mut studio = state.studio.lock().await;
    in_flight.armed = false;
    let session = access(&mut studio);
    match outcome {
        Ok(output) => match session.settle(ticket, Ok(output)) {
            Settled::Succeeded => Ok(Json(session.snapshot()).into_response()),
            Settled::Failed | Settled::Stale => Err(stale(form)),
        },
        Err(err) => {
            let message = failure_message(&err);
            match session.settle(ticket, Err(err)) {
                Settled::Stale => Err(stale(form)),
                Settled::Succeeded | Settled::Failed => {
                    warn!(form = %form, error = %message, "Generation failed");
                    Err(ApiError::Generation {
                        message,
                        view: form.view(),
                    })
                }
            }
        }
    }
}

/// Returns the form to `Idle` if the submit handler is dropped before its
/// ticket settles, as happens when the client disconnects mid-request.
struct InFlight<F: FormSpec> {
    studio: Arc<Mutex<Studio>>,
    access: Access<F>,
    ticket: SubmitTicket,
    form: FormId,
    armed: bool,
}

impl<F: FormSpec> Drop for InFlight<F> {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        let (access, ticket, form) = (self.access, self.ticket, self.form);
        if let Ok(mut studio) = self.studio.try_lock() {
            if access(&mut studio).abandon(ticket) {
                info!(form = %form, ticket = ticket.id(), "Request dropped; form is idle again");
            }
            return;
        }

        let studio = Arc::clone(&self.studio);
        match tokio::runtime::Handle::try_current() {
            Ok(runtime) => {
                runtime.spawn(async move {
                    let mut studio = studio.lock().await;
                    if access(&mut studio).abandon(ticket) {
                        info!(form = %form, ticket = ticket.id(), "Request dropped; form is idle again");
                    }
                });
            }
            Err(_) => warn!(form = %form, ticket = ticket.id(), "Request dropped outside the runtime"),
        }
    }
}

fn failure_message(err: &GenerationError) -> String {
    format!("{err}\n\nSuggestion: {}", generation_suggestion(err))
}

fn stale(form: FormId) -> ApiError {
    ApiError::Conflict(format!(
        "form '{form}' was reset while the request was in flight; the result was discarded"
    ))
}

async fn dismiss_form<F: FormSpec>(state: &AppState, _form: FormId, access: Access<F>) -> Response {
    let mut studio = state.studio.lock().await;
    let session = access(&mut studio);
    session.dismiss();
    Json(session.snapshot()).into_response()
}

async fn reset_form<F: FormSpec>(state: &AppState, form: FormId, access: Access<F>) -> Response {
    let mut studio = state.studio.lock().await;
    let session = access(&mut studio);
    session.reset();
    info!(form = %form, "Form reset");
    Json(session.snapshot()).into_response()
}

async fn render_form<F: FormSpec>(
    state: &AppState,
    form: FormId,
    access: Access<F>,
) -> Result<Response, ApiError> {
    let mut studio = state.studio.lock().await;
    let session = access(&mut studio);
    let artifact = session
        .artifact()
        .ok_or_else(|| ApiError::NotFound(format!("form '{form}': {}", FormError::NoResult)))?;

    let mut generator = MarkdownGenerator::new(&artifact);
    if let Some(at) = session.completed_at() {
        generator = generator.with_timestamp(at);
    }
    let markdown = generator.generate();
    Ok((
        [(header::CONTENT_TYPE, "text/markdown; charset=utf-8")],
        markdown,
    )
        .into_response())
}

// ============================================================================
// Handlers
// ============================================================================

fn shell_response(shell: Shell) -> ShellResponse {
    ShellResponse {
        shell,
        menu: menu(),
        greeting: DASHBOARD_GREETING,
        cards: &DASHBOARD_CARDS,
    }
}

/// Handler for `GET /api/shell`.
async fn handle_shell(State(state): State<Arc<AppState>>) -> Json<ShellResponse> {
    let studio = state.studio.lock().await;
    Json(shell_response(studio.shell))
}

/// Handler for `POST /api/navigate`.
///
/// Only the shell changes; every form keeps its state.
async fn handle_navigate(
    State(state): State<Arc<AppState>>,
    Json(request): Json<NavigateRequest>,
) -> Json<NavigateResponse> {
    let mut studio = state.studio.lock().await;
    let previous = studio.shell.navigate(request.view);
    info!(from = %previous, to = %request.view, "Navigated");
    Json(NavigateResponse {
        previous,
        shell: studio.shell,
    })
}

/// Handler for `GET /api/library`.
async fn handle_library(State(state): State<Arc<AppState>>) -> Json<LibraryResponse> {
    let studio = state.studio.lock().await;
    Json(LibraryResponse {
        tab: studio.shell.library_tab,
        books: catalog::books(),
    })
}

/// Handler for `POST /api/library/tab`.
async fn handle_library_tab(
    State(state): State<Arc<AppState>>,
    Json(request): Json<LibraryTabRequest>,
) -> Json<Shell> {
    let mut studio = state.studio.lock().await;
    studio.shell.select_library_tab(request.tab);
    Json(studio.shell)
}

/// Handler for `GET /api/library/books/:id`.
async fn handle_book(Path(id): Path<String>) -> Result<Json<&'static Book>, ApiError> {
    catalog::find(&id)
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("no book with id '{id}'")))
}

/// Handler for `GET /api/forms/:form`.
async fn handle_get_form(
    State(state): State<Arc<AppState>>,
    Path(form): Path<FormId>,
) -> Response {
    dispatch!(form, snapshot_form(&state))
}

/// Handler for `PUT /api/forms/:form`.
///
/// Replaces the input. A failed form goes back to idle.
async fn handle_put_form(
    State(state): State<Arc<AppState>>,
    Path(form): Path<FormId>,
    Json(body): Json<serde_json::Value>,
) -> Result<Response, ApiError> {
    dispatch!(form, update_form(&state, body))
}

/// Handler for `POST /api/forms/:form/submit`.
///
/// Blocks until the provider answers and returns the settled snapshot.
async fn handle_submit(
    State(state): State<Arc<AppState>>,
    Path(form): Path<FormId>,
) -> Result<Response, ApiError> {
    dispatch!(form, submit_form(&state))
}

/// Handler for `POST /api/forms/:form/dismiss`.
async fn handle_dismiss(
    State(state): State<Arc<AppState>>,
    Path(form): Path<FormId>,
) -> Response {
    dispatch!(form, dismiss_form(&state))
}

/// Handler for `POST /api/forms/:form/reset`.
async fn handle_reset(State(state): State<Arc<AppState>>, Path(form): Path<FormId>) -> Response {
    dispatch!(form, reset_form(&state))
}

/// Handler for `GET /api/forms/:form/rendered`.
async fn handle_rendered(
    State(state): State<Arc<AppState>>,
    Path(form): Path<FormId>,
) -> Result<Response, ApiError> {
    dispatch!(form, render_form(&state))
}

/// Handler for `PUT /api/forms/:form/result`.
///
/// Only the report result is editable.
async fn handle_edit_result(
    State(state): State<Arc<AppState>>,
    Path(form): Path<FormId>,
    Json(request): Json<EditResultRequest>,
) -> Result<Response, ApiError> {
    if form != FormId::Report {
        return Err(ApiError::BadInput(format!(
            "the result of form '{form}' cannot be edited"
        )));
    }

    let mut studio = state.studio.lock().await;
    studio.report.edit_result(request.text)?;
    info!("Report text edited");
    Ok(Json(studio.report.snapshot()).into_response())
}

// ============================================================================
// Tests
// ============================================================================
