//! Instruction templates sent to the provider.
//!
//! Prompts are written in Brazilian Portuguese, the language teachers use
//! in the app. Each builder is deterministic in its inputs.

use serde_json::{json, Value};

use crate::types::Socialization;

/// Directive appended to activity prompts in inclusive mode.
pub const INCLUSIVE_DIRECTIVE: &str = "IMPORTANTE: As atividades devem ser adaptadas para educação inclusiva, considerando alunos com necessidades especiais diversas.";

/// Instruction for a BNCC lesson plan, including the literal JSON shape.
#[must_use]
pub fn lesson_plan(theme: &str, age_group: &str, duration: &str) -> String {
    format!(
        "Crie um plano de aula detalhado para Educação Infantil seguindo a BNCC (Base Nacional Comum Curricular) do Brasil.
Tema: {theme}
Faixa Etária: {age_group}
Duração: {duration}

Retorne APENAS um JSON com a seguinte estrutura, sem markdown:
{{
  \"theme\": \"Tema da aula\",
  \"ageGroup\": \"Faixa etária\",
  \"bnccCodes\": [\"Código 1\", \"Código 2\"],
  \"objectives\": [\"Objetivo 1\", \"Objetivo 2\"],
  \"resources\": [\"Recurso 1\", \"Recurso 2\"],
  \"steps\": [\"Passo 1\", \"Passo 2\"],
  \"evaluation\": \"Como será a avaliação\"
}}"
    )
}

/// Response schema matching [`crate::LessonPlan`].
#[must_use]
pub fn lesson_plan_schema() -> Value {
    let string_list = json!({ "type": "ARRAY", "items": { "type": "STRING" } });
    json!({
        "type": "OBJECT",
        "properties": {
            "theme": { "type": "STRING" },
            "ageGroup": { "type": "STRING" },
            "bnccCodes": string_list,
            "objectives": string_list,
            "resources": string_list,
            "steps": string_list,
            "evaluation": { "type": "STRING" }
        }
    })
}

/// Instruction for a two-paragraph descriptive student report.
#[must_use]
pub fn student_report(
    student_name: &str,
    highlights: &str,
    challenges: &str,
    socialization: Socialization,
) -> String {
    format!(
        "Escreva um relatório descritivo individual para um aluno de educação infantil. Use uma linguagem pedagógica, acolhedora e profissional.
Nome do aluno: {student_name}
Pontos fortes/Interesses: {highlights}
Pontos a desenvolver/Dificuldades: {challenges}
Socialização: {}

O texto deve ter cerca de 2 parágrafos.",
        socialization.phrase()
    )
}

/// Instruction for three activity ideas formatted as an HTML list.
#[must_use]
pub fn activity_ideas(topic: &str, inclusive: bool) -> String {
    let mut prompt = format!(
        "Sugira 3 atividades lúdicas e criativas para educação infantil sobre o tema: \"{topic}\".\n"
    );
    if inclusive {
        prompt.push_str(INCLUSIVE_DIRECTIVE);
        prompt.push('\n');
    }
    prompt.push_str("Formate como uma lista HTML simples (<ul><li>...).");
    prompt
}

/// Instruction for a short children's story with a moral.
#[must_use]
pub fn story(topic: &str) -> String {
    format!(
        "Escreva uma história infantil curta, envolvente e educativa sobre: \"{topic}\". A história deve ter um final feliz e uma lição moral simples."
    )
}

/// Instruction for a black-and-white outline drawing.
#[must_use]
pub fn visual_resource(description: &str) -> String {
    format!(
        "Desenho vetorial simples, preto e branco, estilo linha (outline) para colorir ou recortar. Objeto: {description}. Fundo branco."
    )
}
