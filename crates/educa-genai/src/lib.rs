//! EducaKids Content Client
//!
//! Builds prompts, calls the generative-AI provider and decodes lesson plans,
//! reports, activity ideas, stories and outline images.

pub mod client;
pub mod error;
pub mod prompts;
pub mod provider;
pub mod tasks;
pub mod types;
pub mod wire;

#[cfg(any(test, feature = "test-util"))]
pub mod testing;

pub use client::{ContentClient, ModelSet};
pub use error::{GenerationError, Result};
pub use provider::{ContentProvider, GeminiProvider, ProviderSettings, FALLBACK_API_KEY_ENV};
pub use tasks::{
    ActivityQuery, GenerationTask, LessonPlanQuery, ModelRole, StoryQuery, StudentReportInput,
    VisualResourceQuery, REPORT_FALLBACK,
};
pub use types::{ImageDataUri, LessonPlan, Socialization};
pub use wire::{GenerateContentRequest, GenerateContentResponse};
