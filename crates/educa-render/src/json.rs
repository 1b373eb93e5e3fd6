//! JSON output for generated results.
//!
//! # Example
//!
//! ```rust
//! use educa_render::Artifact;
//! use educa_render::json::JsonGenerator;
//!
//! let artifact = Artifact::Story {
//!     topic: "sapo".to_string(),
//!     text: "Era uma vez um sapo.".to_string(),
//! };
//! let json = JsonGenerator::new(&artifact).generate_pretty().unwrap();
//! assert!(json.contains("\"kind\": \"STORY\""));
//! ```

use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::{Artifact, RenderError, Result};

/// Serializes an [`Artifact`] to JSON.
pub struct JsonGenerator<'a> {
    artifact: &'a Artifact,
}

impl<'a> JsonGenerator<'a> {
    /// Creates a new JSON generator for the given result.
    #[must_use]
    pub const fn new(artifact: &'a Artifact) -> Self {
        Self { artifact }
    }

    /// Generates compact single-line JSON.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::Serialization`] if serialization fails.
    pub fn generate(&self) -> Result<String> {
        serde_json::to_string(self.artifact).map_err(RenderError::from)
    }

    /// Generates pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::Serialization`] if serialization fails.
    pub fn generate_pretty(&self) -> Result<String> {
        serde_json::to_string_pretty(self.artifact).map_err(RenderError::from)
    }

    /// Writes the JSON to `path`, creating or overwriting it.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::Serialization`] if serialization fails.
    /// Returns [`RenderError::Io`] if the file cannot be written.
    pub fn write_to_file(&self, path: &Path, pretty: bool) -> Result<()> {
        let json = if pretty {
            self.generate_pretty()?
        } else {
            self.generate()?
        };

        let mut file = File::create(path)?;
        file.write_all(json.as_bytes())?;

        Ok(())
    }
}
