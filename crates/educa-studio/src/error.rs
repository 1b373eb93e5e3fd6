//! Error types for the EducaKids studio.
//!
//! Errors carry an actionable suggestion where the user can do something
//! about them.

use std::path::PathBuf;

use educa_genai::GenerationError;

/// A specialized `Result` type for studio operations.
pub type Result<T> = std::result::Result<T, StudioError>;

/// Local validation failures of a form.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormError {
    /// A required field is blank.
    #[error("required field '{field}' is empty")]
    MissingField {
        /// Wire name of the field.
        field: &'static str,
    },

    /// The form already has a request in flight.
    #[error("a request for this form is already in progress")]
    AlreadySubmitting,

    /// There is no generated result to act on yet.
    #[error("nothing has been generated for this form yet")]
    NoResult,
}

/// Errors that can occur while running the studio.
#[derive(Debug, thiserror::Error)]
pub enum StudioError {
    // ========================================================================
    // Configuration Errors
    // ========================================================================
    /// Invalid JSON syntax in the configuration file.
    #[error("Invalid JSON in config file '{path}': {message}\n\nSuggestion: Validate your educakids.json with a JSON linter")]
    ConfigParseError {
        /// Path to the configuration file.
        path: PathBuf,
        /// Description of the parse error.
        message: String,
    },

    /// Configuration validation failed.
    #[error("Invalid configuration: {message}\n\nSuggestion: {suggestion}")]
    ConfigValidationError {
        /// Description of the validation failure.
        message: String,
        /// Actionable suggestion for the user.
        suggestion: String,
    },

    // ========================================================================
    // Form Errors
    // ========================================================================
    /// A form rejected the submission locally.
    #[error(transparent)]
    Form(#[from] FormError),

    // ========================================================================
    // Generation Errors
    // ========================================================================
    /// The content service failed.
    #[error("Content generation failed: {source}\n\nSuggestion: {suggestion}")]
    Generation {
        /// Underlying client error.
        #[source]
        source: GenerationError,
        /// Actionable suggestion for the user.
        suggestion: String,
    },

    /// A result arrived for a submission that is no longer current.
    #[error("Discarded a stale result: the form was reset while the request was in flight")]
    StaleResult,
}

impl StudioError {
    /// Creates a new `ConfigParseError` with the given path and message.
    #[must_use]
    pub fn config_parse(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::ConfigParseError {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Creates a new `ConfigValidationError` with the given message and suggestion.
    #[must_use]
    pub fn config_validation(message: impl Into<String>, suggestion: impl Into<String>) -> Self {
        Self::ConfigValidationError {
            message: message.into(),
            suggestion: suggestion.into(),
        }
    }

    /// Wraps a client error with a suggestion chosen from its kind.
    #[must_use]
    pub fn generation(source: GenerationError) -> Self {
        let suggestion = generation_suggestion(&source).to_string();
        Self::Generation { source, suggestion }
    }
}

impl From<GenerationError> for StudioError {
    fn from(source: GenerationError) -> Self {
        Self::generation(source)
    }
}

/// Picks a suggestion for a client error.
#[must_use]
pub fn generation_suggestion(error: &GenerationError) -> &'static str {
    match error {
        GenerationError::MissingCredential { .. } => {
            "Export your Gemini key in API_KEY (or GEMINI_API_KEY) before starting"
        }
        GenerationError::Api {
            status: 401 | 403, ..
        } => "Check that your API key is valid and has access to the configured models",
        GenerationError::Api { status: 429, .. } => {
            "Wait a moment and try again; the provider is rate limiting requests"
        }
        GenerationError::Api { status: 404, .. } => {
            "Check the textModel and imageModel names in educakids.json"
        }
        GenerationError::Api { .. } => "Try again later; the provider may be having issues",
        GenerationError::Transport(_) => "Check your network connection",
        GenerationError::EmptyResponse { .. } | GenerationError::MalformedPayload { .. } => {
            "Try again, or rephrase the request"
        }
    }
}
