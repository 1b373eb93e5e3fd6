//! The five generation tasks.
//!
//! Every task follows the same shape: build a request from caller-supplied
//! fields, let [`crate::ContentClient::run`] submit it, then decode the
//! response. Only the builder and the decoder differ between tasks.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{GenerationError, Result};
use crate::prompts;
use crate::types::{ImageDataUri, LessonPlan, Socialization};
use crate::wire::{GenerateContentRequest, GenerateContentResponse};

/// Report text used when the provider answers with no text.
pub const REPORT_FALLBACK: &str = "Não foi possível gerar o relatório.";

/// Which configured model a task is submitted to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelRole {
    /// Text and structured (JSON) generation.
    Text,
    /// Image generation.
    Image,
}

/// One generation intent: a request builder paired with a decoder.
pub trait GenerationTask {
    /// Decoded result type.
    type Output;

    /// Short task name used in logs and errors.
    const NAME: &'static str;

    /// Model the request goes to.
    fn model_role(&self) -> ModelRole {
        ModelRole::Text
    }

    /// Builds the outbound request.
    fn build_request(&self) -> GenerateContentRequest;

    /// Decodes the provider's response.
    fn decode(&self, response: GenerateContentResponse) -> Result<Self::Output>;
}

// ============================================================================
// Lesson plan
// ============================================================================

/// Inputs for a lesson plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LessonPlanQuery {
    /// Lesson theme.
    pub theme: String,
    /// Target age group.
    pub age_group: String,
    /// Lesson duration.
    pub duration: String,
}

impl GenerationTask for LessonPlanQuery {
    type Output = LessonPlan;
    const NAME: &'static str = "lesson_plan";

    fn build_request(&self) -> GenerateContentRequest {
        GenerateContentRequest::from_prompt(prompts::lesson_plan(
            &self.theme,
            &self.age_group,
            &self.duration,
        ))
        .with_json_schema(prompts::lesson_plan_schema())
    }

    /// Parses the response text as JSON. No text and invalid JSON are both
    /// hard failures; missing fields are tolerated and logged.
    fn decode(&self, response: GenerateContentResponse) -> Result<LessonPlan> {
        let text = response.text();
        if text.trim().is_empty() {
            return Err(GenerationError::EmptyResponse { task: Self::NAME });
        }

        let plan: LessonPlan = serde_json::from_str(&text)
            .map_err(|e| GenerationError::malformed("lesson plan JSON", e.to_string()))?;

        let missing = plan.missing_fields();
        if !missing.is_empty() {
            warn!(?missing, "Lesson plan is missing fields; rendering partially");
        }
        Ok(plan)
    }
}

// ============================================================================
// Student report
// ============================================================================

/// Inputs for a descriptive student report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentReportInput {
    /// Student's name.
    pub student_name: String,
    /// Strengths and interests.
    pub highlights: String,
    /// Points to develop; may be empty.
    #[serde(default)]
    pub challenges: String,
    /// Socialization phrase.
    #[serde(default)]
    pub socialization: Socialization,
}

impl GenerationTask for StudentReportInput {
    type Output = String;
    const NAME: &'static str = "student_report";

    fn build_request(&self) -> GenerateContentRequest {
        GenerateContentRequest::from_prompt(prompts::student_report(
            &self.student_name,
            &self.highlights,
            &self.challenges,
            self.socialization,
        ))
    }

    fn decode(&self, response: GenerateContentResponse) -> Result<String> {
        let text = response.text();
        if text.is_empty() {
            return Ok(REPORT_FALLBACK.to_string());
        }
        Ok(text)
    }
}

// ============================================================================
// Activity ideas
// ============================================================================

/// Inputs for activity ideas.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityQuery {
    /// Activity theme.
    pub topic: String,
    /// Adapt the ideas for learners with special needs.
    #[serde(default)]
    pub inclusive: bool,
}

impl GenerationTask for ActivityQuery {
    type Output = String;
    const NAME: &'static str = "activity_ideas";

    fn build_request(&self) -> GenerateContentRequest {
        GenerateContentRequest::from_prompt(prompts::activity_ideas(&self.topic, self.inclusive))
    }

    /// Returns the markup as-is; empty text is an empty result.
    fn decode(&self, response: GenerateContentResponse) -> Result<String> {
        Ok(response.text())
    }
}

// ============================================================================
// Story
// ============================================================================

/// Inputs for a short story.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoryQuery {
    /// What the story is about.
    pub topic: String,
}

impl GenerationTask for StoryQuery {
    type Output = String;
    const NAME: &'static str = "story";

    fn build_request(&self) -> GenerateContentRequest {
        GenerateContentRequest::from_prompt(prompts::story(&self.topic))
    }

    fn decode(&self, response: GenerateContentResponse) -> Result<String> {
        Ok(response.text())
    }
}

// ============================================================================
// Visual resource
// ============================================================================

/// Inputs for an outline illustration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisualResourceQuery {
    /// Object to draw.
    pub description: String,
}

impl GenerationTask for VisualResourceQuery {
    type Output = Option<ImageDataUri>;
    const NAME: &'static str = "visual_resource";

    fn model_role(&self) -> ModelRole {
        ModelRole::Image
    }

    fn build_request(&self) -> GenerateContentRequest {
        GenerateContentRequest::from_prompt(prompts::visual_resource(&self.description))
    }

    /// Picks the first inline-data part; no image is `None`, not an error.
    fn decode(&self, response: GenerateContentResponse) -> Result<Option<ImageDataUri>> {
        Ok(response
            .first_inline_data()
            .map(|d| ImageDataUri::new(d.mime_type.clone(), d.data.clone())))
    }
}
