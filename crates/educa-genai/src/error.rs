//! Error types for the generative-content client.

/// A specialized `Result` type for content generation.
pub type Result<T> = std::result::Result<T, GenerationError>;

/// Hard failures raised while calling the provider or decoding its answer.
///
/// Soft failures (a successful call that produced no usable content) are not
/// errors: each task decides its own fallback value.
#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    /// The HTTP request never produced a response (DNS, TLS, connection reset).
    #[error("provider request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The provider answered with a non-success status.
    #[error("provider returned HTTP {status}: {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Provider error message, or the raw body when it has none.
        message: String,
    },

    /// The provider answered but a task that requires text got none.
    #[error("provider returned no text for {task}")]
    EmptyResponse {
        /// Task that required the text.
        task: &'static str,
    },

    /// The provider answered with something that does not decode.
    #[error("malformed {what}: {message}")]
    MalformedPayload {
        /// What was being decoded.
        what: &'static str,
        /// Decoder message.
        message: String,
    },

    /// No API credential was found in the environment.
    #[error("API credential missing: set the {env_var} environment variable")]
    MissingCredential {
        /// The variable that was looked up first.
        env_var: String,
    },
}

impl GenerationError {
    /// Creates a new `Api` error.
    #[must_use]
    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
        }
    }

    /// Creates a new `MalformedPayload` error.
    #[must_use]
    pub fn malformed(what: &'static str, message: impl Into<String>) -> Self {
        Self::MalformedPayload {
            what,
            message: message.into(),
        }
    }

    /// Creates a new `MissingCredential` error.
    #[must_use]
    pub fn missing_credential(env_var: impl Into<String>) -> Self {
        Self::MissingCredential {
            env_var: env_var.into(),
        }
    }

    /// Returns `true` if the provider itself rejected the credential.
    #[must_use]
    pub const fn is_auth_failure(&self) -> bool {
        matches!(
            self,
            Self::Api {
                status: 401 | 403,
                ..
            } | Self::MissingCredential { .. }
        )
    }
}
