//! Markdown rendering of generated results.
//!
//! Each [`Artifact`] kind gets the layout its view shows on screen: the
//! lesson plan in titled sections with numbered steps, the report as
//! paragraphs, activity markup verbatim, the story under a heading and the
//! image as a data-URI image link. Results with nothing in them render a
//! short placeholder instead of an empty page.

use chrono::{DateTime, Utc};
use std::fmt::Write;

use educa_genai::{ImageDataUri, LessonPlan};

use crate::{Artifact, CatalogRow};

/// Note shown under a generated image.
const IMAGE_NOTE: &str = "Esta imagem foi gerada por IA. Você pode imprimi-la e usá-la como molde para EVA, feltro ou atividades de colorir.";

/// How a lesson plan list section is laid out.
#[derive(Clone, Copy)]
enum ListStyle {
    Bullet,
    Code,
    Numbered,
}

/// Generates Markdown from a generated result.
pub struct MarkdownGenerator<'a> {
    artifact: &'a Artifact,
    generated_at: Option<DateTime<Utc>>,
}

impl<'a> MarkdownGenerator<'a> {
    /// Creates a new Markdown generator for the given result.
    #[must_use]
    pub const fn new(artifact: &'a Artifact) -> Self {
        Self {
            artifact,
            generated_at: None,
        }
    }

    /// Adds a footer stamped with `at`.
    #[must_use]
    pub const fn with_timestamp(mut self, at: DateTime<Utc>) -> Self {
        self.generated_at = Some(at);
        self
    }

    /// Generates the complete Markdown document.
    #[must_use]
    pub fn generate(&self) -> String {
        let mut output = String::new();

        match self.artifact {
            Artifact::LessonPlan { plan } => write_lesson_plan(&mut output, plan),
            Artifact::StudentReport { student_name, text } => {
                write_student_report(&mut output, student_name, text);
            }
            Artifact::ActivityIdeas {
                topic,
                inclusive,
                markup,
            } => write_activity_ideas(&mut output, topic, *inclusive, markup),
            Artifact::Story { topic, text } => write_story(&mut output, topic, text),
            Artifact::VisualResource { description, image } => {
                write_visual_resource(&mut output, description, image.as_ref());
            }
        }

        if let Some(at) = &self.generated_at {
            write_footer(&mut output, at);
        }

        output
    }
}

fn write_lesson_plan(output: &mut String, plan: &LessonPlan) {
    let title = plan
        .theme
        .as_deref()
        .filter(|t| !t.trim().is_empty())
        .unwrap_or("Plano de Aula");
    let _ = writeln!(output, "# {title}\n");

    if let Some(age_group) = &plan.age_group {
        let _ = writeln!(output, "**Faixa etária:** {age_group}\n");
    }

    write_list_section(
        output,
        "Objetivos de Aprendizagem",
        plan.objectives.as_deref(),
        ListStyle::Bullet,
    );
    write_list_section(
        output,
        "Códigos BNCC",
        plan.bncc_codes.as_deref(),
        ListStyle::Code,
    );
    write_list_section(
        output,
        "Recursos Necessários",
        plan.resources.as_deref(),
        ListStyle::Bullet,
    );
    write_list_section(
        output,
        "Desenvolvimento (Passo a Passo)",
        plan.steps.as_deref(),
        ListStyle::Numbered,
    );

    if let Some(evaluation) = &plan.evaluation {
        let _ = writeln!(output, "## Avaliação\n\n{evaluation}\n");
    }
}

/// Writes one list section. Absent sections are skipped entirely.
fn write_list_section(output: &mut String, title: &str, items: Option<&[String]>, style: ListStyle) {
    let Some(items) = items else {
        return;
    };

    let _ = writeln!(output, "## {title}\n");
    if items.is_empty() {
        let _ = writeln!(output, "_Nenhum item._\n");
        return;
    }

    for (index, item) in items.iter().enumerate() {
        let _ = match style {
            ListStyle::Bullet => writeln!(output, "- {item}"),
            ListStyle::Code => writeln!(output, "- `{}`", escape_inline_code(item)),
            ListStyle::Numbered => writeln!(output, "{}. {item}", index + 1),
        };
    }
    output.push('\n');
}

fn write_student_report(output: &mut String, student_name: &str, text: &str) {
    let _ = writeln!(output, "# Relatório Descritivo: {student_name}\n");
    if text.trim().is_empty() {
        let _ = writeln!(output, "_O relatório gerado aparecerá aqui._\n");
    } else {
        let _ = writeln!(output, "{}\n", text.trim());
    }
}

fn write_activity_ideas(output: &mut String, topic: &str, inclusive: bool, markup: &str) {
    let title = if inclusive {
        "Educação Inclusiva"
    } else {
        "Banco de Atividades"
    };
    let _ = writeln!(output, "# {title}\n");
    let _ = writeln!(output, "**Tema:** {topic}\n");
    let _ = writeln!(output, "## Sugestões da IA\n");
    if markup.trim().is_empty() {
        let _ = writeln!(output, "_Nenhuma atividade gerada._\n");
    } else {
        let _ = writeln!(output, "{}\n", markup.trim());
    }
}

fn write_story(output: &mut String, topic: &str, text: &str) {
    let _ = writeln!(output, "# História Gerada\n");
    let _ = writeln!(output, "**Tema:** {topic}\n");
    if text.trim().is_empty() {
        let _ = writeln!(output, "_Sua história aparecerá aqui..._\n");
    } else {
        let _ = writeln!(output, "{}\n", text.trim());
    }
}

fn write_visual_resource(output: &mut String, description: &str, image: Option<&ImageDataUri>) {
    let _ = writeln!(output, "# Molde: {description}\n");
    match image {
        Some(uri) => {
            let _ = writeln!(output, "![{}]({uri})\n", escape_link_text(description));
            let _ = writeln!(output, "*{IMAGE_NOTE}*\n");
        }
        None => {
            let _ = writeln!(output, "_Nenhuma imagem gerada._\n");
        }
    }
}

fn write_footer(output: &mut String, at: &DateTime<Utc>) {
    let _ = writeln!(output, "---\n");
    let _ = writeln!(
        output,
        "*Gerado pelo EducaKids em {}*",
        at.format("%Y-%m-%d %H:%M:%S UTC")
    );
}

/// Renders the library collection as a Markdown table.
#[must_use]
pub fn catalog_table<R: CatalogRow>(rows: &[R]) -> String {
    let mut output = String::new();
    let _ = writeln!(output, "| Título | Autor | Descrição |");
    let _ = writeln!(output, "|--------|-------|-----------|");
    for row in rows {
        let _ = writeln!(
            output,
            "| {} | {} | {} |",
            escape_table_cell(row.title()),
            escape_table_cell(row.author()),
            escape_table_cell(row.description())
        );
    }
    output
}

/// Keeps cell text from breaking the table layout.
fn escape_table_cell(text: &str) -> String {
    text.replace('|', "\\|").replace('\n', "<br>")
}

/// Escapes brackets so text can sit inside `![...]`.
fn escape_link_text(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    for ch in text.chars() {
        if matches!(ch, '[' | ']' | '\\') {
            result.push('\\');
        }
        result.push(ch);
    }
    result
}

fn escape_inline_code(text: &str) -> String {
    text.replace('`', "'")
}

// ============================================================================
// Tests
// ============================================================================
