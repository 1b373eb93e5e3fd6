//! The provider seam and its Gemini REST implementation.

use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::error::{GenerationError, Result};
use crate::wire::{GenerateContentRequest, GenerateContentResponse};

/// Variable consulted when the configured one is unset.
pub const FALLBACK_API_KEY_ENV: &str = "GEMINI_API_KEY";

/// Header carrying the API key.
const API_KEY_HEADER: &str = "x-goog-api-key";

fn default_base_url() -> String {
    "https://generativelanguage.googleapis.com".to_string()
}

fn default_text_model() -> String {
    "gemini-2.5-flash".to_string()
}

fn default_image_model() -> String {
    "gemini-2.5-flash-image".to_string()
}

fn default_api_key_env() -> String {
    "API_KEY".to_string()
}

/// Anything that can answer a `generateContent` call.
///
/// Object-safe so a client can hold `Arc<dyn ContentProvider>` and tests can
/// swap in a scripted implementation.
#[async_trait]
pub trait ContentProvider: Send + Sync {
    /// Short name for logs.
    fn name(&self) -> &str;

    /// Submits `request` to `model` and returns the raw response.
    async fn generate(
        &self,
        model: &str,
        request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse>;
}

// ============================================================================
// Settings
// ============================================================================

/// Where the provider lives and which models to use.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderSettings {
    /// API root, without the `/v1beta` suffix.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Model for text and JSON tasks.
    #[serde(default = "default_text_model")]
    pub text_model: String,

    /// Model for image tasks.
    #[serde(default = "default_image_model")]
    pub image_model: String,

    /// Environment variable holding the API key.
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
}

impl Default for ProviderSettings {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            text_model: default_text_model(),
            image_model: default_image_model(),
            api_key_env: default_api_key_env(),
        }
    }
}

impl ProviderSettings {
    /// Reads the API key from the process environment.
    ///
    /// # Errors
    ///
    /// Returns `GenerationError::MissingCredential` when neither the
    /// configured variable nor `GEMINI_API_KEY` is set to a non-blank value.
    pub fn resolve_api_key(&self) -> Result<String> {
        self.resolve_api_key_with(|name| std::env::var(name).ok())
    }

    /// Resolves the API key through `lookup`, trying the configured variable
    /// first and then [`FALLBACK_API_KEY_ENV`].
    ///
    /// # Errors
    ///
    /// Returns `GenerationError::MissingCredential` when no variable yields a
    /// non-blank value.
    pub fn resolve_api_key_with<F>(&self, lookup: F) -> Result<String>
    where
        F: Fn(&str) -> Option<String>,
    {
        [self.api_key_env.as_str(), FALLBACK_API_KEY_ENV]
            .into_iter()
            .filter_map(|name| lookup(name))
            .map(|value| value.trim().to_string())
            .find(|value| !value.is_empty())
            .ok_or_else(|| GenerationError::missing_credential(&self.api_key_env))
    }
}

// ============================================================================
// Gemini
// ============================================================================

/// Error envelope returned by the Gemini API on non-2xx statuses.
#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: String,
}

/// Maps a non-success response to `GenerationError::Api`.
///
/// The message is the provider's `error.message` when the body carries one,
/// the raw body otherwise.
async fn check_response(resp: reqwest::Response) -> Result<reqwest::Response> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let body = resp.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorEnvelope>(&body)
        .ok()
        .map(|envelope| envelope.error.message)
        .filter(|m| !m.is_empty())
        .unwrap_or(body);
    Err(GenerationError::api(status.as_u16(), message))
}

/// Calls the Gemini `generateContent` REST method.
#[derive(Clone)]
pub struct GeminiProvider {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl fmt::Debug for GeminiProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeminiProvider")
            .field("base_url", &self.base_url)
            .field("api_key", &"<redacted>")
            .finish_non_exhaustive()
    }
}

impl GeminiProvider {
    /// Creates a provider for `base_url` authenticating with `api_key`.
    #[must_use]
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        }
    }

    /// Creates a provider from settings, reading the key from the environment.
    ///
    /// # Errors
    ///
    /// Returns `GenerationError::MissingCredential` when no key is set.
    pub fn from_settings(settings: &ProviderSettings) -> Result<Self> {
        let api_key = settings.resolve_api_key()?;
        Ok(Self::new(&settings.base_url, api_key))
    }

    /// Full URL of the `generateContent` method for `model`.
    #[must_use]
    pub fn endpoint(&self, model: &str) -> String {
        format!("{}/v1beta/models/{model}:generateContent", self.base_url)
    }
}

#[async_trait]
impl ContentProvider for GeminiProvider {
    fn name(&self) -> &str {
        "gemini"
    }

    #[instrument(skip(self, request), fields(provider = "gemini"))]
    async fn generate(
        &self,
        model: &str,
        request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse> {
        let url = self.endpoint(model);
        debug!(%url, "Sending generateContent request");

        let resp = self
            .http
            .post(&url)
            .header(API_KEY_HEADER, &self.api_key)
            .json(request)
            .send()
            .await?;
        let resp = check_response(resp).await?;

        let body = resp.text().await?;
        serde_json::from_str(&body)
            .map_err(|e| GenerationError::malformed("generateContent response", e.to_string()))
    }
}
