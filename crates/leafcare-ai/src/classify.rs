//! Classification of free-text vision answers into plant identifications.
//!
//! Order of precedence:
//! 1. structured `Plant Name:` / `Scientific Name:` / `Description:` /
//!    `Care Level:` lines,
//! 2. the keyword table over the whole text,
//! 3. override rules applied to whichever name was found.

use leafcare_core::{IdentificationOverride, KeywordRule, VisionConfig};
use serde::Serialize;

const UNKNOWN: &str = "Unknown";
const DEFAULT_CARE_LEVEL: &str = "Moderate";

/// Answers that mean the model could not tell
const NON_ANSWERS: [&str; 5] = ["unknown", "unknown plant", "i don't know", "i cannot", "none"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    /// Read from structured fields
    High,
    /// Matched by keyword
    Medium,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlantIdentification {
    pub common_name: String,
    pub scientific_name: String,
    pub description: String,
    pub care_level: String,
    pub confidence: Confidence,
    /// Full provider text
    pub raw: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Identification {
    Recognized(PlantIdentification),
    Unrecognized { raw: String },
}

impl Identification {
    pub fn unrecognized(raw: impl Into<String>) -> Self {
        Self::Unrecognized { raw: raw.into() }
    }

    pub fn is_recognized(&self) -> bool {
        matches!(self, Self::Recognized(_))
    }

    pub fn plant(&self) -> Option<&PlantIdentification> {
        match self {
            Self::Recognized(plant) => Some(plant),
            Self::Unrecognized { .. } => None,
        }
    }
}

#[derive(Debug, Default)]
struct StructuredFields {
    name: Option<String>,
    scientific: Option<String>,
    description: Option<String>,
    care_level: Option<String>,
}

fn field_value(line: &str) -> Option<String> {
    let (_, value) = line.split_once(':')?;
    let value = value.replace('*', "").trim().to_string();
    (!value.is_empty()).then_some(value)
}

fn structured_fields(text: &str) -> StructuredFields {
    let mut fields = StructuredFields::default();
    for line in text.lines() {
        let lower = line.to_lowercase();
        let slot = if lower.contains("plant name:") || lower.contains("common name:") {
            &mut fields.name
        } else if lower.contains("scientific name:") {
            &mut fields.scientific
        } else if lower.contains("description:") {
            &mut fields.description
        } else if lower.contains("care level:") {
            &mut fields.care_level
        } else {
            continue;
        };
        if let Some(value) = field_value(line) {
            *slot = Some(value);
        }
    }
    fields
}

fn is_non_answer(name: &str) -> bool {
    let lower = name.trim().to_lowercase();
    lower.is_empty() || NON_ANSWERS.contains(&lower.as_str())
}

/// Keyword and override tables used to classify vision text
#[derive(Debug, Clone, PartialEq)]
pub struct IdentificationTable {
    keywords: Vec<KeywordRule>,
    overrides: Vec<IdentificationOverride>,
}

impl IdentificationTable {
    pub fn new(keywords: Vec<KeywordRule>, overrides: Vec<IdentificationOverride>) -> Self {
        let keywords = keywords
            .into_iter()
            .filter(|rule| !rule.keyword.trim().is_empty())
            .map(|rule| KeywordRule {
                keyword: rule.keyword.trim().to_lowercase(),
                name: rule.name,
            })
            .collect();
        Self { keywords, overrides }
    }

    fn keyword_match(&self, lower_text: &str) -> Option<&KeywordRule> {
        self.keywords
            .iter()
            .find(|rule| lower_text.contains(rule.keyword.as_str()))
    }

    fn apply_overrides(&self, plant: &mut PlantIdentification, lower_text: &str) {
        let lower_name = plant.common_name.to_lowercase();
        let rule = self.overrides.iter().find(|rule| {
            lower_name.contains(&rule.name_contains.to_lowercase())
                && rule
                    .text_mentions
                    .iter()
                    .any(|mention| lower_text.contains(&mention.to_lowercase()))
        });

        if let Some(rule) = rule {
            tracing::debug!("Override: {} -> {}", plant.common_name, rule.common_name);
            plant.common_name = rule.common_name.clone();
            plant.scientific_name = rule.scientific_name.clone();
            plant.description = rule.description.clone();
        }
    }

    /// Classify a free-text vision answer.
    pub fn classify(&self, text: &str) -> Identification {
        let lower = text.to_lowercase();
        let fields = structured_fields(text);

        let mut plant = match fields.name.filter(|name| !is_non_answer(name)) {
            Some(name) => PlantIdentification {
                common_name: name,
                scientific_name: fields.scientific.unwrap_or_else(|| UNKNOWN.to_string()),
                description: fields
                    .description
                    .unwrap_or_else(|| "Could not identify plant details.".to_string()),
                care_level: fields
                    .care_level
                    .unwrap_or_else(|| DEFAULT_CARE_LEVEL.to_string()),
                confidence: Confidence::High,
                raw: text.to_string(),
            },
            None => match self.keyword_match(&lower) {
                Some(rule) => PlantIdentification {
                    common_name: rule.name.clone(),
                    scientific_name: fields.scientific.unwrap_or_else(|| UNKNOWN.to_string()),
                    description: format!("This appears to be a {}.", rule.name.to_lowercase()),
                    care_level: DEFAULT_CARE_LEVEL.to_string(),
                    confidence: Confidence::Medium,
                    raw: text.to_string(),
                },
                None => return Identification::unrecognized(text),
            },
        };

        self.apply_overrides(&mut plant, &lower);
        Identification::Recognized(plant)
    }
}

impl From<&VisionConfig> for IdentificationTable {
    fn from(config: &VisionConfig) -> Self {
        Self::new(config.keywords.clone(), config.overrides.clone())
    }
}

impl Default for IdentificationTable {
    fn default() -> Self {
        Self::from(&VisionConfig::default())
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

    use super::*;

    #[test]
    fn test_structured_answer() {
        let text = "**Plant Name:** Snake Plant\n\
                    Scientific Name: *Dracaena trifasciata*\n\
                    Description: Long upright leaves with yellow edges\n\
                    Care Level: Easy";
        let plant = IdentificationTable::default().classify(text);
        let plant = plant.plant().unwrap();
        assert_eq!(plant.common_name, "Snake Plant");
        assert_eq!(plant.scientific_name, "Dracaena trifasciata");
        assert_eq!(plant.care_level, "Easy");
        assert_eq!(plant.confidence, Confidence::High);
    }

    #[test]
    fn test_keyword_fallback() {
        let result = IdentificationTable::default().classify("a potted aloe on a windowsill");
        let plant = result.plant().unwrap();
        assert_eq!(plant.common_name, "Aloe Vera");
        assert_eq!(plant.scientific_name, "Unknown");
        assert_eq!(plant.description, "This appears to be a aloe vera.");
        assert_eq!(plant.confidence, Confidence::Medium);
    }

    #[test]
    fn test_rose_with_tomato_fruit_is_overridden() {
        let text = "Plant Name: Rose\nDescription: red round fruits, looks like Solanum";
        let plant = IdentificationTable::default().classify(text);
        let plant = plant.plant().unwrap();
        assert_eq!(plant.common_name, "Tomato Plant");
        assert_eq!(plant.scientific_name, "Solanum lycopersicum");
        assert_eq!(plant.description, "A tomato plant with red fruits and green leaves.");
    }

    #[test]
    fn test_plain_rose_not_overridden() {
        let plant = IdentificationTable::default().classify("Plant Name: Rose\nScientific Name: Rosa");
        assert_eq!(plant.plant().unwrap().scientific_name, "Rosa");
    }

    #[test]
    fn test_non_answer_is_unrecognized() {
        let result = IdentificationTable::default().classify("Plant Name: Unknown\nsome blurry leaves");
        assert_eq!(result, Identification::unrecognized("Plant Name: Unknown\nsome blurry leaves"));
        assert!(!IdentificationTable::default().classify("").is_recognized());
    }

    #[test]
    fn test_custom_table() {
        let table = IdentificationTable::new(
            vec![KeywordRule::new("Monstera", "Swiss Cheese Plant"), KeywordRule::new(" ", "Blank")],
            Vec::new(),
        );
        let result = table.classify("a large MONSTERA leaf");
        assert_eq!(result.plant().unwrap().common_name, "Swiss Cheese Plant");
        assert!(!table.classify("a rose").is_recognized());
    }
}
