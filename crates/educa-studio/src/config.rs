//! Configuration for the EducaKids studio.
//!
//! Settings live in an optional `educakids.json`. Every field has a default,
//! so a missing file or a partial one is fine.

use std::path::Path;

use educa_genai::ProviderSettings;
use serde::{Deserialize, Serialize};

use crate::error::{Result, StudioError};

/// The default config file name.
const CONFIG_FILE_NAME: &str = "educakids.json";

/// Default bind host.
fn default_host() -> String {
    "127.0.0.1".to_string()
}

/// Default bind port.
const fn default_port() -> u16 {
    3000
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Generative-AI provider settings.
    #[serde(default)]
    pub provider: ProviderSettings,

    /// HTTP API server settings.
    #[serde(default)]
    pub server: ServerConfig,
}

/// Where the HTTP API listens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerConfig {
    /// Interface to bind.
    #[serde(default = "default_host")]
    pub host: String,

    /// TCP port to bind.
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl ServerConfig {
    /// `host:port` string suitable for binding.
    #[must_use]
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Config {
    /// Loads configuration from the current working directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but is invalid.
    pub fn load() -> Result<Self> {
        let current_dir = std::env::current_dir().map_err(|e| {
            StudioError::config_parse(
                "<current directory>",
                format!("cannot determine current directory: {e}"),
            )
        })?;
        Self::load_from_dir(&current_dir)
    }

    /// Loads `educakids.json` from a specific directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but is invalid.
    pub fn load_from_dir(dir: &Path) -> Result<Self> {
        Self::load_from_file(&dir.join(CONFIG_FILE_NAME))
    }

    /// Loads configuration from a specific file path.
    ///
    /// A missing file yields the defaults.
    ///
    /// # Errors
    ///
    /// Returns `StudioError::ConfigParseError` if the file cannot be read or
    /// is not valid JSON, and `StudioError::ConfigValidationError` if a value
    /// is out of range.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let contents = match std::fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let config = Self::default();
                config.validate()?;
                return Ok(config);
            }
            Err(e) => {
                return Err(StudioError::config_parse(
                    path,
                    format!("failed to read file: {e}"),
                ));
            }
        };

        let config: Self = serde_json::from_str(&contents)
            .map_err(|e| StudioError::config_parse(path, e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration values.
    ///
    /// - `provider.baseUrl` must be an absolute URL
    /// - `provider.textModel` and `provider.imageModel` must not be blank
    /// - `provider.apiKeyEnv` must not be blank
    /// - `server.host` must not be blank and `server.port` must be non-zero
    ///
    /// # Errors
    ///
    /// Returns `StudioError::ConfigValidationError` on the first failed check.
    pub fn validate(&self) -> Result<()> {
        let provider = &self.provider;

        if let Err(e) = reqwest::Url::parse(&provider.base_url) {
            return Err(StudioError::config_validation(
                format!("provider.baseUrl '{}' is not a URL: {e}", provider.base_url),
                "Use an absolute URL such as https://generativelanguage.googleapis.com",
            ));
        }

        if provider.text_model.trim().is_empty() {
            return Err(StudioError::config_validation(
                "provider.textModel must not be empty",
                "Set provider.textModel, e.g. \"gemini-2.5-flash\"",
            ));
        }

        if provider.image_model.trim().is_empty() {
            return Err(StudioError::config_validation(
                "provider.imageModel must not be empty",
                "Set provider.imageModel, e.g. \"gemini-2.5-flash-image\"",
            ));
        }

        if provider.api_key_env.trim().is_empty() {
            return Err(StudioError::config_validation(
                "provider.apiKeyEnv must not be empty",
                "Name the environment variable that holds your key, e.g. \"API_KEY\"",
            ));
        }

        if self.server.host.trim().is_empty() {
            return Err(StudioError::config_validation(
                "server.host must not be empty",
                "Set server.host to an interface such as 127.0.0.1",
            ));
        }

        if self.server.port == 0 {
            return Err(StudioError::config_validation(
                "server.port must be greater than 0",
                "Set server.port to a free port such as 3000",
            ));
        }

        Ok(())
    }
}
