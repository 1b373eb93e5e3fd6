//! Result and input types produced or consumed by the generation tasks.

use std::fmt;
use std::str::FromStr;

use base64::Engine as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

// ============================================================================
// LessonPlan
// ============================================================================

/// A BNCC-aligned lesson plan decoded from the provider's JSON.
///
/// Every field is optional: a field the provider left out stays `None`
/// instead of being defaulted, and renderers skip it. Sequence order is
/// display order (steps are shown numbered `1..N`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LessonPlan {
    /// Lesson theme.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theme: Option<String>,

    /// Target age group.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age_group: Option<String>,

    /// BNCC curriculum codes, opaque.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bncc_codes: Option<Vec<String>>,

    /// Learning objectives.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub objectives: Option<Vec<String>>,

    /// Required materials.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resources: Option<Vec<String>>,

    /// Lesson steps, in order.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub steps: Option<Vec<String>>,

    /// How learning is assessed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub evaluation: Option<String>,
}

impl LessonPlan {
    /// Wire names of the fields the provider left out.
    #[must_use]
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let checks = [
            ("theme", self.theme.is_none()),
            ("ageGroup", self.age_group.is_none()),
            ("bnccCodes", self.bncc_codes.is_none()),
            ("objectives", self.objectives.is_none()),
            ("resources", self.resources.is_none()),
            ("steps", self.steps.is_none()),
            ("evaluation", self.evaluation.is_none()),
        ];
        checks
            .into_iter()
            .filter_map(|(name, missing)| missing.then_some(name))
            .collect()
    }

    /// Returns `true` if every field is present.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.missing_fields().is_empty()
    }
}

// ============================================================================
// Socialization
// ============================================================================

/// How a student relates to classmates; a fixed set of report phrases.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Socialization {
    /// "Interage bem com todos" (default).
    #[default]
    #[serde(rename = "Interage bem com todos")]
    InteractsWell,
    /// "Prefere brincar sozinho".
    #[serde(rename = "Prefere brincar sozinho")]
    PrefersSolitaryPlay,
    /// "Lidera as brincadeiras".
    #[serde(rename = "Lidera as brincadeiras")]
    LeadsPlay,
    /// "Ainda em adaptação".
    #[serde(rename = "Ainda em adaptação")]
    StillAdapting,
}

impl Socialization {
    /// All phrases in menu order.
    pub const ALL: [Self; 4] = [
        Self::InteractsWell,
        Self::PrefersSolitaryPlay,
        Self::LeadsPlay,
        Self::StillAdapting,
    ];

    /// The phrase embedded in the report prompt.
    #[must_use]
    pub const fn phrase(self) -> &'static str {
        match self {
            Self::InteractsWell => "Interage bem com todos",
            Self::PrefersSolitaryPlay => "Prefere brincar sozinho",
            Self::LeadsPlay => "Lidera as brincadeiras",
            Self::StillAdapting => "Ainda em adaptação",
        }
    }

    /// Short ASCII key, handy on a command line.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::InteractsWell => "interage",
            Self::PrefersSolitaryPlay => "sozinho",
            Self::LeadsPlay => "lidera",
            Self::StillAdapting => "adaptacao",
        }
    }
}

impl fmt::Display for Socialization {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.phrase())
    }
}

impl FromStr for Socialization {
    type Err = String;

    /// Accepts either the short key or the full phrase, case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|v| v.key() == wanted || v.phrase().to_lowercase() == wanted)
            .ok_or_else(|| {
                let keys: Vec<_> = Self::ALL.iter().map(|v| v.key()).collect();
                format!(
                    "invalid socialization '{s}': expected one of {}",
                    keys.join(", ")
                )
            })
    }
}

// ============================================================================
// ImageDataUri
// ============================================================================

/// A generated image as a `data:<mime>;base64,<payload>` URI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageDataUri {
    /// MIME type reported by the provider.
    pub mime_type: String,
    /// Base64 payload, kept verbatim.
    pub payload: String,
}

impl ImageDataUri {
    /// Creates a data URI from a MIME type and base64 payload.
    #[must_use]
    pub fn new(mime_type: impl Into<String>, payload: impl Into<String>) -> Self {
        Self {
            mime_type: mime_type.into(),
            payload: payload.into(),
        }
    }

    /// Decodes the base64 payload into raw image bytes.
    pub fn decode_bytes(&self) -> Result<Vec<u8>, base64::DecodeError> {
        base64::engine::general_purpose::STANDARD.decode(&self.payload)
    }
}

impl fmt::Display for ImageDataUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "data:{};base64,{}", self.mime_type, self.payload)
    }
}

impl FromStr for ImageDataUri {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let rest = s
            .strip_prefix("data:")
            .ok_or_else(|| format!("not a data URI: '{s}'"))?;
        let (mime_type, payload) = rest
            .split_once(";base64,")
            .ok_or_else(|| "data URI is not base64-encoded".to_string())?;
        Ok(Self::new(mime_type, payload))
    }
}

impl Serialize for ImageDataUri {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ImageDataUri {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_lesson_plan_camel_case_fields() {
        let json = r#"{
            "theme": "O Ciclo da Água",
            "ageGroup": "Crianças pequenas",
            "bnccCodes": ["EI03ET01", "EI03ET03"],
            "objectives": ["Observar a chuva", "Nomear estados da água"],
            "resources": ["Copos", "Gelo"],
            "steps": ["Roda de conversa", "Experimento", "Desenho"],
            "evaluation": "Observação contínua"
        }"#;
        let plan: LessonPlan = serde_json::from_str(json).unwrap();

        assert_eq!(plan.age_group.as_deref(), Some("Crianças pequenas"));
        assert_eq!(
            plan.steps.unwrap(),
            vec!["Roda de conversa", "Experimento", "Desenho"]
        );
    }

    #[test]
    fn test_lesson_plan_missing_fields_stay_absent() {
        let plan: LessonPlan =
            serde_json::from_str(r#"{ "theme": "Cores", "steps": [] }"#).unwrap();

        assert_eq!(plan.steps, Some(vec![]));
        assert!(plan.objectives.is_none());
        assert!(!plan.is_complete());
        assert_eq!(
            plan.missing_fields(),
            vec!["ageGroup", "bnccCodes", "objectives", "resources", "evaluation"]
        );
    }

    #[test]
    fn test_socialization_phrases_round_trip_through_serde() {
        let json = serde_json::to_string(&Socialization::StillAdapting).unwrap();
        assert_eq!(json, r#""Ainda em adaptação""#);

        let back: Socialization = serde_json::from_str(r#""Lidera as brincadeiras""#).unwrap();
        assert_eq!(back, Socialization::LeadsPlay);
    }

    #[test]
    fn test_socialization_from_str_accepts_keys_and_phrases() {
        assert_eq!(
            "sozinho".parse::<Socialization>().unwrap(),
            Socialization::PrefersSolitaryPlay
        );
        assert_eq!(
            "INTERAGE BEM COM TODOS".parse::<Socialization>().unwrap(),
            Socialization::InteractsWell
        );
        let err = "tímido".parse::<Socialization>().unwrap_err();
        assert!(err.contains("tímido"));
        assert!(err.contains("adaptacao"));
    }

    #[test]
    fn test_image_data_uri_display() {
        let uri = ImageDataUri::new("image/png", "P");
        assert_eq!(uri.to_string(), "data:image/png;base64,P");
    }

    #[test]
    fn test_image_data_uri_parse_and_serde() {
        let uri: ImageDataUri = "data:image/jpeg;base64,/9j/4AAQ".parse().unwrap();
        assert_eq!(uri.mime_type, "image/jpeg");
        assert_eq!(uri.payload, "/9j/4AAQ");

        let json = serde_json::to_string(&uri).unwrap();
        assert_eq!(json, r#""data:image/jpeg;base64,/9j/4AAQ""#);

        assert!("https://example.com/a.png".parse::<ImageDataUri>().is_err());
    }

    #[test]
    fn test_image_data_uri_decode_bytes() {
        let uri = ImageDataUri::new("image/png", "iVBORw==");
        assert_eq!(uri.decode_bytes().unwrap(), vec![0x89, b'P', b'N', b'G']);

        let broken = ImageDataUri::new("image/png", "***");
        assert!(broken.decode_bytes().is_err());
    }
}
