//! The generator views and the studio that holds them.

use educa_genai::{
    ActivityQuery, ImageDataUri, LessonPlan, LessonPlanQuery, Socialization, StoryQuery,
    StudentReportInput, VisualResourceQuery,
};
use educa_render::Artifact;
use serde::{Deserialize, Serialize};

use crate::error::FormError;
use crate::form::{FieldHint, FormSession, FormSpec};
use crate::shell::{Shell, ViewKind};

// ============================================================================
// Lesson plan
// ============================================================================

/// Suggested age groups, the three BNCC early-childhood bands.
pub const AGE_GROUP_SUGGESTIONS: [&str; 3] = [
    "Bebês (0 a 1 ano e 6 meses)",
    "Crianças bem pequenas (1 ano e 7 meses a 3 anos e 11 meses)",
    "Crianças pequenas (4 anos a 5 anos e 11 meses)",
];

fn default_age_group() -> String {
    "3 a 4 anos".to_string()
}

fn default_duration() -> String {
    "4 horas".to_string()
}

/// Input of the lesson plan view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LessonPlanForm {
    /// Lesson theme.
    #[serde(default)]
    pub theme: String,
    /// Target age group, free text.
    #[serde(default = "default_age_group")]
    pub age_group: String,
    /// Lesson duration, free text.
    #[serde(default = "default_duration")]
    pub duration: String,
}

impl Default for LessonPlanForm {
    fn default() -> Self {
        Self {
            theme: String::new(),
            age_group: default_age_group(),
            duration: default_duration(),
        }
    }
}

impl FormSpec for LessonPlanForm {
    type Output = LessonPlan;
    type Task = LessonPlanQuery;

    fn required_fields(&self) -> Vec<(&'static str, &str)> {
        vec![("theme", &self.theme)]
    }

    fn hints(&self) -> Vec<FieldHint> {
        vec![
            FieldHint {
                field: "theme",
                label: "Tema da Aula",
                placeholder: "Ex: O Ciclo da Água, Animais da Fazenda, Cores...",
                required: true,
            },
            FieldHint {
                field: "ageGroup",
                label: "Faixa Etária",
                placeholder: "3 a 4 anos",
                required: false,
            },
            FieldHint {
                field: "duration",
                label: "Duração",
                placeholder: "Ex: 50 minutos, 1 tarde",
                required: false,
            },
        ]
    }

    fn to_task(&self) -> LessonPlanQuery {
        LessonPlanQuery {
            theme: self.theme.trim().to_string(),
            age_group: self.age_group.trim().to_string(),
            duration: self.duration.trim().to_string(),
        }
    }

    fn artifact(&self, output: &LessonPlan) -> Artifact {
        Artifact::LessonPlan {
            plan: output.clone(),
        }
    }
}

// ============================================================================
// Student report
// ============================================================================

/// Input of the report view.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportForm {
    /// Student's name.
    #[serde(default)]
    pub student_name: String,
    /// Strengths and progress.
    #[serde(default)]
    pub highlights: String,
    /// Points to develop.
    #[serde(default)]
    pub challenges: String,
    /// Socialization phrase.
    #[serde(default)]
    pub socialization: Socialization,
}

impl FormSpec for ReportForm {
    type Output = String;
    type Task = StudentReportInput;

    fn required_fields(&self) -> Vec<(&'static str, &str)> {
        vec![
            ("studentName", &self.student_name),
            ("highlights", &self.highlights),
        ]
    }

    fn hints(&self) -> Vec<FieldHint> {
        vec![
            FieldHint {
                field: "studentName",
                label: "Nome do Aluno",
                placeholder: "Ex: Joãozinho",
                required: true,
            },
            FieldHint {
                field: "highlights",
                label: "Pontos Fortes / Avanços",
                placeholder: "Ex: Reconhece as cores, gosta de música, coordenação motora fina melhorou...",
                required: true,
            },
            FieldHint {
                field: "challenges",
                label: "Pontos a Desenvolver",
                placeholder: "Ex: Dificuldade em dividir brinquedos, resistência ao sono...",
                required: false,
            },
            FieldHint {
                field: "socialization",
                label: "Socialização",
                placeholder: Socialization::InteractsWell.phrase(),
                required: false,
            },
        ]
    }

    fn to_task(&self) -> StudentReportInput {
        StudentReportInput {
            student_name: self.student_name.trim().to_string(),
            highlights: self.highlights.trim().to_string(),
            challenges: self.challenges.trim().to_string(),
            socialization: self.socialization,
        }
    }

    fn artifact(&self, output: &String) -> Artifact {
        Artifact::StudentReport {
            student_name: self.student_name.trim().to_string(),
            text: output.clone(),
        }
    }
}

impl FormSession<ReportForm> {
    /// Replaces the generated report text with the teacher's edit.
    ///
    /// # Errors
    ///
    /// Returns `FormError::NoResult` before the first report is generated
    /// and `FormError::AlreadySubmitting` while a new one is in flight.
    pub fn edit_result(&mut self, text: impl Into<String>) -> Result<(), FormError> {
        self.replace_result(text.into())
    }
}

// ============================================================================
// Activities
// ============================================================================

/// Which flavour of the activity view this is.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActivityMode {
    /// General classroom ideas.
    #[default]
    Activities,
    /// Ideas adapted for learners with special needs.
    Inclusive,
}

impl ActivityMode {
    /// View heading.
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::Activities => "Banco de Atividades",
            Self::Inclusive => "Educação Inclusiva",
        }
    }

    /// View description.
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::Activities => "Ideias criativas para dinâmicas de sala de aula, brincadeiras de roda e projetos artísticos.",
            Self::Inclusive => "Encontre adaptações e atividades sensoriais para incluir todos os alunos, independente de suas necessidades.",
        }
    }

    /// Topic placeholder.
    #[must_use]
    pub const fn placeholder(self) -> &'static str {
        match self {
            Self::Activities => "Ex: Brincadeira para dia da árvore, atividade de coordenação motora...",
            Self::Inclusive => "Ex: Atividade sensorial para aluno com autismo, adaptação para cadeirante...",
        }
    }

    /// View this mode is shown in.
    #[must_use]
    pub const fn view(self) -> ViewKind {
        match self {
            Self::Activities => ViewKind::Activities,
            Self::Inclusive => ViewKind::Inclusive,
        }
    }
}

/// Input of the activities and inclusive views.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityForm {
    /// Activity theme.
    #[serde(default)]
    pub topic: String,
    /// Fixed by the view; ignored on input.
    #[serde(default, skip_deserializing)]
    pub mode: ActivityMode,
}

impl ActivityForm {
    /// Creates an empty form in `mode`.
    #[must_use]
    pub const fn new(mode: ActivityMode) -> Self {
        Self {
            topic: String::new(),
            mode,
        }
    }
}

impl FormSpec for ActivityForm {
    type Output = String;
    type Task = ActivityQuery;

    fn required_fields(&self) -> Vec<(&'static str, &str)> {
        vec![("topic", &self.topic)]
    }

    fn hints(&self) -> Vec<FieldHint> {
        vec![FieldHint {
            field: "topic",
            label: self.mode.title(),
            placeholder: self.mode.placeholder(),
            required: true,
        }]
    }

    fn to_task(&self) -> ActivityQuery {
        ActivityQuery {
            topic: self.topic.trim().to_string(),
            inclusive: self.mode == ActivityMode::Inclusive,
        }
    }

    fn artifact(&self, output: &String) -> Artifact {
        Artifact::ActivityIdeas {
            topic: self.topic.trim().to_string(),
            inclusive: self.mode == ActivityMode::Inclusive,
            markup: output.clone(),
        }
    }

    fn merge(&mut self, incoming: Self) {
        self.topic = incoming.topic;
    }
}

// ============================================================================
// Molds
// ============================================================================

/// Input of the molds view.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoldForm {
    /// Object to draw.
    #[serde(default)]
    pub description: String,
}

impl FormSpec for MoldForm {
    type Output = Option<ImageDataUri>;
    type Task = VisualResourceQuery;

    const CLEARS_RESULT_ON_SUBMIT: bool = true;

    fn required_fields(&self) -> Vec<(&'static str, &str)> {
        vec![("description", &self.description)]
    }

    fn hints(&self) -> Vec<FieldHint> {
        vec![FieldHint {
            field: "description",
            label: "Moldes e Decoração",
            placeholder: "O que você deseja criar hoje?",
            required: true,
        }]
    }

    fn to_task(&self) -> VisualResourceQuery {
        VisualResourceQuery {
            description: self.description.trim().to_string(),
        }
    }

    fn artifact(&self, output: &Option<ImageDataUri>) -> Artifact {
        Artifact::VisualResource {
            description: self.description.trim().to_string(),
            image: output.clone(),
        }
    }
}

// ============================================================================
// Story
// ============================================================================

/// Input of the library's story generator tab.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoryForm {
    /// What the story is about.
    #[serde(default)]
    pub topic: String,
}

impl FormSpec for StoryForm {
    type Output = String;
    type Task = StoryQuery;

    fn required_fields(&self) -> Vec<(&'static str, &str)> {
        vec![("topic", &self.topic)]
    }

    fn hints(&self) -> Vec<FieldHint> {
        vec![FieldHint {
            field: "topic",
            label: "Sobre o que deve ser a história?",
            placeholder: "Ex: Um dinossauro que queria ser astronauta, ou a importância de escovar os dentes...",
            required: true,
        }]
    }

    fn to_task(&self) -> StoryQuery {
        StoryQuery {
            topic: self.topic.trim().to_string(),
        }
    }

    fn artifact(&self, output: &String) -> Artifact {
        Artifact::Story {
            topic: self.topic.trim().to_string(),
            text: output.clone(),
        }
    }
}

// ============================================================================
// Studio
// ============================================================================

/// Identifies one form of the studio.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FormId {
    /// Lesson plan generator.
    LessonPlan,
    /// Student report generator.
    Report,
    /// Activity ideas, regular mode.
    Activities,
    /// Activity ideas, inclusive mode.
    Inclusive,
    /// Outline images.
    Molds,
    /// Story generator, inside the library.
    Story,
}

impl FormId {
    /// Every form, in menu order of its view.
    pub const ALL: [Self; 6] = [
        Self::Story,
        Self::LessonPlan,
        Self::Activities,
        Self::Molds,
        Self::Report,
        Self::Inclusive,
    ];

    /// View the form lives in.
    #[must_use]
    pub const fn view(self) -> ViewKind {
        match self {
            Self::LessonPlan => ViewKind::LessonPlans,
            Self::Report => ViewKind::Reports,
            Self::Activities => ViewKind::Activities,
            Self::Inclusive => ViewKind::Inclusive,
            Self::Molds => ViewKind::Molds,
            Self::Story => ViewKind::Library,
        }
    }

    /// Path segment used by the HTTP API.
    #[must_use]
    pub const fn slug(self) -> &'static str {
        match self {
            Self::LessonPlan => "lesson-plan",
            Self::Report => "report",
            Self::Activities => "activities",
            Self::Inclusive => "inclusive",
            Self::Molds => "molds",
            Self::Story => "story",
        }
    }
}

impl std::fmt::Display for FormId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.slug())
    }
}

/// Everything the user sees: the shell plus one session per form.
///
/// Sessions are independent. Navigating or submitting one form never
/// changes another.
#[derive(Debug, Clone)]
pub struct Studio {
    /// Navigation position.
    pub shell: Shell,
    /// Lesson plan view.
    pub lesson_plan: FormSession<LessonPlanForm>,
    /// Report view.
    pub report: FormSession<ReportForm>,
    /// Activities view.
    pub activities: FormSession<ActivityForm>,
    /// Inclusive education view.
    pub inclusive: FormSession<ActivityForm>,
    /// Molds view.
    pub molds: FormSession<MoldForm>,
    /// Library story generator.
    pub story: FormSession<StoryForm>,
}

impl Default for Studio {
    fn default() -> Self {
        Self::new()
    }
}

impl Studio {
    /// Creates a studio on the dashboard with every form idle and empty.
    #[must_use]
    pub fn new() -> Self {
        Self {
            shell: Shell::new(),
            lesson_plan: FormSession::default(),
            report: FormSession::default(),
            activities: FormSession::new(ActivityForm::new(ActivityMode::Activities)),
            inclusive: FormSession::new(ActivityForm::new(ActivityMode::Inclusive)),
            molds: FormSession::default(),
            story: FormSession::default(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::form::FormStatus;
    use educa_genai::GenerationTask;

    #[test]
    fn test_lesson_plan_defaults() {
        let form = LessonPlanForm::default();
        assert_eq!(form.age_group, "3 a 4 anos");
        assert_eq!(form.duration, "4 horas");
        assert_eq!(form.first_missing(), Some("theme"));
    }

    #[test]
    fn test_lesson_plan_partial_json_keeps_defaults() {
        let form: LessonPlanForm = serde_json::from_str(r#"{"theme":"Cores"}"#).unwrap();
        assert_eq!(form.theme, "Cores");
        assert_eq!(form.age_group, "3 a 4 anos");
        assert_eq!(form.duration, "4 horas");
    }

    #[test]
    fn test_report_requires_name_and_highlights() {
        let mut form = ReportForm {
            student_name: "Ana".to_string(),
            ..ReportForm::default()
        };
        assert_eq!(form.first_missing(), Some("highlights"));
        form.highlights = "Curiosa".to_string();
        assert_eq!(form.first_missing(), None);

        form.student_name = "   ".to_string();
        assert_eq!(form.first_missing(), Some("studentName"));
    }

    #[test]
    fn test_activity_mode_drives_task_and_copy() {
        let mut form = ActivityForm::new(ActivityMode::Inclusive);
        form.topic = "borboleta".to_string();
        let task = form.to_task();
        assert!(task.inclusive);
        assert!(task.build_request().prompt_text().contains("necessidades especiais"));
        assert_eq!(form.hints()[0].label, "Educação Inclusiva");

        let regular = ActivityForm::new(ActivityMode::Activities);
        assert_eq!(regular.hints()[0].label, "Banco de Atividades");
        assert!(regular.mode.placeholder().contains("dia da árvore"));
    }

    #[test]
    fn test_activity_merge_keeps_mode() {
        let mut session = FormSession::new(ActivityForm::new(ActivityMode::Inclusive));
        let incoming: ActivityForm =
            serde_json::from_str(r#"{"topic":"música","mode":"ACTIVITIES"}"#).unwrap();
        session.update(incoming);
        assert_eq!(session.input().topic, "música");
        assert_eq!(session.input().mode, ActivityMode::Inclusive);
    }

    #[test]
    fn test_inputs_are_trimmed_into_tasks() {
        let form = StoryForm {
            topic: "  sapo  ".to_string(),
        };
        assert_eq!(form.to_task().topic, "sapo");
    }

    #[test]
    fn test_studio_starts_idle_on_dashboard() {
        let studio = Studio::new();
        assert_eq!(studio.shell.current, ViewKind::Dashboard);
        assert_eq!(studio.activities.input().mode, ActivityMode::Activities);
        assert_eq!(studio.inclusive.input().mode, ActivityMode::Inclusive);
        assert_eq!(*studio.molds.status(), FormStatus::Idle);
        assert!(studio.story.result().is_none());
    }

    #[test]
    fn test_form_id_paths_and_views() {
        let json = serde_json::to_string(&FormId::LessonPlan).unwrap();
        assert_eq!(json, "\"lesson-plan\"");
        for id in FormId::ALL {
            let parsed: FormId = serde_json::from_str(&format!("\"{}\"", id.slug())).unwrap();
            assert_eq!(parsed, id);
        }
        assert_eq!(FormId::Story.view(), ViewKind::Library);
    }

    #[test]
    fn test_mold_artifact_without_image() {
        let form = MoldForm {
            description: "borboleta".to_string(),
        };
        let artifact = form.artifact(&None);
        assert!(artifact.is_blank());
    }
}
