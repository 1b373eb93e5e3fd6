//! The content client: one generic path for all five tasks.

use std::sync::Arc;

use tracing::{info, instrument};

use crate::error::Result;
use crate::provider::{ContentProvider, ProviderSettings};
use crate::tasks::{
    ActivityQuery, GenerationTask, LessonPlanQuery, ModelRole, StoryQuery, StudentReportInput,
    VisualResourceQuery,
};
use crate::types::{ImageDataUri, LessonPlan, Socialization};

/// Model names used for each role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelSet {
    /// Model for text and JSON tasks.
    pub text: String,
    /// Model for image tasks.
    pub image: String,
}

impl ModelSet {
    /// Model name for `role`.
    #[must_use]
    pub fn for_role(&self, role: ModelRole) -> &str {
        match role {
            ModelRole::Text => &self.text,
            ModelRole::Image => &self.image,
        }
    }
}

impl From<&ProviderSettings> for ModelSet {
    fn from(settings: &ProviderSettings) -> Self {
        Self {
            text: settings.text_model.clone(),
            image: settings.image_model.clone(),
        }
    }
}

impl Default for ModelSet {
    fn default() -> Self {
        Self::from(&ProviderSettings::default())
    }
}

/// Stateless client over a [`ContentProvider`].
///
/// Cheap to clone; every call is independent and nothing is cached.
#[derive(Clone)]
pub struct ContentClient {
    provider: Arc<dyn ContentProvider>,
    models: ModelSet,
}

impl std::fmt::Debug for ContentClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContentClient")
            .field("provider", &self.provider.name())
            .field("models", &self.models)
            .finish()
    }
}

impl ContentClient {
    /// Creates a client sending requests through `provider`.
    #[must_use]
    pub fn new(provider: Arc<dyn ContentProvider>, models: ModelSet) -> Self {
        Self { provider, models }
    }

    /// Models this client targets.
    #[must_use]
    pub const fn models(&self) -> &ModelSet {
        &self.models
    }

    /// Builds, submits and decodes one task.
    ///
    /// # Errors
    ///
    /// Propagates provider failures and the task's own decode failures.
    #[instrument(skip(self, task), fields(task = T::NAME))]
    pub async fn run<T: GenerationTask + Sync>(&self, task: &T) -> Result<T::Output> {
        let model = self.models.for_role(task.model_role());
        let request = task.build_request();
        let response = self.provider.generate(model, &request).await?;
        let output = task.decode(response)?;
        info!(model, "Generation completed");
        Ok(output)
    }

    /// Generates a BNCC lesson plan.
    pub async fn request_lesson_plan(
        &self,
        theme: &str,
        age_group: &str,
        duration: &str,
    ) -> Result<LessonPlan> {
        self.run(&LessonPlanQuery {
            theme: theme.to_string(),
            age_group: age_group.to_string(),
            duration: duration.to_string(),
        })
        .await
    }

    /// Generates a descriptive student report.
    pub async fn request_student_report(
        &self,
        student_name: &str,
        highlights: &str,
        challenges: &str,
        socialization: Socialization,
    ) -> Result<String> {
        self.run(&StudentReportInput {
            student_name: student_name.to_string(),
            highlights: highlights.to_string(),
            challenges: challenges.to_string(),
            socialization,
        })
        .await
    }

    /// Generates three activity ideas as HTML list markup.
    pub async fn request_activity_ideas(&self, topic: &str, inclusive: bool) -> Result<String> {
        self.run(&ActivityQuery {
            topic: topic.to_string(),
            inclusive,
        })
        .await
    }

    /// Generates a short children's story.
    pub async fn request_story(&self, topic: &str) -> Result<String> {
        self.run(&StoryQuery {
            topic: topic.to_string(),
        })
        .await
    }

    /// Generates an outline illustration; `None` when no image came back.
    pub async fn request_visual_resource(&self, description: &str) -> Result<Option<ImageDataUri>> {
        self.run(&VisualResourceQuery {
            description: description.to_string(),
        })
        .await
    }
}
