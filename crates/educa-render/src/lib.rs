//! EducaKids Rendering
//!
//! Turns generated results into something a teacher can read, print or save.
//!
//! # Types
//!
//! - [`Artifact`] - One generated result, tagged by the view that produced it
//! - [`CatalogRow`] - Anything listable in the library table
//!
//! # Generators
//!
//! - [`MarkdownGenerator`] - Human-readable Markdown
//! - [`json::JsonGenerator`] - Compact or pretty JSON
//!
//! # Example
//!
//! ```rust
//! use educa_render::{Artifact, MarkdownGenerator};
//!
//! let artifact = Artifact::Story {
//!     topic: "sapo".to_string(),
//!     text: "Era uma vez um sapo.".to_string(),
//! };
//! let markdown = MarkdownGenerator::new(&artifact).generate();
//! assert!(markdown.contains("Era uma vez um sapo."));
//! ```

pub mod files;
pub mod json;
mod markdown;

pub use files::{mold_file_name, write_image};
pub use markdown::{catalog_table, MarkdownGenerator};

use educa_genai::{ImageDataUri, LessonPlan};
use serde::{Deserialize, Serialize};
use thiserror::Error;

// ============================================================================
// Error Types
// ============================================================================

/// Errors that can occur while rendering or saving results.
#[derive(Debug, Error)]
pub enum RenderError {
    /// Failed to serialize a result to JSON.
    #[error("failed to serialize result: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Failed to write an output file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The image payload is not valid base64.
    #[error("invalid image payload: {0}")]
    InvalidImage(String),
}

/// Result type for rendering operations.
pub type Result<T> = std::result::Result<T, RenderError>;

// ============================================================================
// Artifact
// ============================================================================

/// A generated result together with the inputs needed to title it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Artifact {
    /// A decoded lesson plan.
    LessonPlan {
        /// The plan; absent fields are skipped when rendered.
        plan: LessonPlan,
    },

    /// A descriptive student report.
    StudentReport {
        /// Student the report is about.
        #[serde(rename = "studentName")]
        student_name: String,
        /// Report text, possibly edited by the teacher.
        text: String,
    },

    /// Activity ideas as HTML list markup.
    ActivityIdeas {
        /// Requested theme.
        topic: String,
        /// Whether the ideas were adapted for inclusion.
        inclusive: bool,
        /// Markup as returned by the provider.
        markup: String,
    },

    /// A short story.
    Story {
        /// What the story is about.
        topic: String,
        /// Story text.
        text: String,
    },

    /// An outline illustration.
    VisualResource {
        /// Object that was requested.
        description: String,
        /// The image, or `None` when the provider returned none.
        image: Option<ImageDataUri>,
    },
}

impl Artifact {
    /// Returns `true` when the provider produced nothing to show.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        match self {
            Self::LessonPlan { plan } => *plan == LessonPlan::default(),
            Self::StudentReport { text, .. }
            | Self::Story { text, .. }
            | Self::ActivityIdeas { markup: text, .. } => text.trim().is_empty(),
            Self::VisualResource { image, .. } => image.is_none(),
        }
    }
}

/// A row of the library catalog table.
pub trait CatalogRow {
    /// Book title.
    fn title(&self) -> &str;
    /// Book author.
    fn author(&self) -> &str;
    /// One-line summary.
    fn description(&self) -> &str;
}
