//! Keyword-driven plant health assessment from an image caption.

use serde::Serialize;

const GOOD_WORDS: [&str; 5] = ["healthy", "green", "vibrant", "thriving", "good"];
const ATTENTION_WORDS: [&str; 5] = ["yellow", "wilting", "drooping", "brown", "dying"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HealthStatus {
    Good,
    NeedsAttention,
    Unassessed,
}

impl HealthStatus {
    pub fn label(self) -> &'static str {
        match self {
            HealthStatus::Good => "Good to Excellent",
            HealthStatus::NeedsAttention => "Fair to Poor - Needs Attention",
            HealthStatus::Unassessed => "Requires Assessment",
        }
    }
}

impl std::fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Causes and fixes for one visible symptom
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Finding {
    pub symptom: &'static str,
    pub causes: Vec<&'static str>,
    pub recommendations: Vec<&'static str>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HealthAssessment {
    pub status: HealthStatus,
    /// What the captioning model saw
    pub caption: String,
    pub question: Option<String>,
    pub findings: Vec<Finding>,
    pub maintenance_tips: Vec<&'static str>,
}

impl HealthAssessment {
    pub fn with_question(mut self, question: Option<&str>) -> Self {
        self.question = question
            .map(str::trim)
            .filter(|q| !q.is_empty())
            .map(str::to_string);
        self
    }
}

fn mentions_any(text: &str, words: &[&str]) -> bool {
    words.iter().any(|word| text.contains(word))
}

/// Classify a caption into a health status with causes and recommendations.
pub fn classify_health(caption: &str) -> HealthAssessment {
    let lower = caption.to_lowercase();

    let status = if mentions_any(&lower, &GOOD_WORDS) {
        HealthStatus::Good
    } else if mentions_any(&lower, &ATTENTION_WORDS) {
        HealthStatus::NeedsAttention
    } else {
        HealthStatus::Unassessed
    };

    let mut findings = Vec::new();
    if lower.contains("yellow") {
        findings.push(Finding {
            symptom: "Yellowing",
            causes: vec![
                "Overwatering or underwatering",
                "Nutrient deficiency",
                "Insufficient light",
            ],
            recommendations: vec![
                "Check soil moisture - water only when top inch is dry",
                "Ensure adequate drainage",
                "Provide balanced fertilizer",
                "Move to brighter location if needed",
            ],
        });
    }
    if lower.contains("brown") || lower.contains("dry") {
        findings.push(Finding {
            symptom: "Browning or dryness",
            causes: vec!["Underwatering", "Low humidity", "Too much direct sunlight"],
            recommendations: vec![
                "Increase watering frequency",
                "Mist leaves to increase humidity",
                "Provide shade during hottest hours",
            ],
        });
    }

    let maintenance_tips = if lower.contains("healthy") || lower.contains("green") {
        vec![
            "Continue current care routine",
            "Monitor for any changes",
            "Prune dead leaves regularly",
            "Fertilize during growing season",
        ]
    } else {
        Vec::new()
    };

    HealthAssessment {
        status,
        caption: caption.trim().to_string(),
        question: None,
        findings,
        maintenance_tips,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_healthy_caption() {
        let assessment = classify_health("a healthy green plant in a pot");
        assert_eq!(assessment.status, HealthStatus::Good);
        assert!(assessment.findings.is_empty());
        assert_eq!(assessment.maintenance_tips.len(), 4);
    }

    #[test]
    fn test_yellow_and_brown_leaves() {
        let assessment = classify_health("a plant with yellow and brown leaves");
        assert_eq!(assessment.status, HealthStatus::NeedsAttention);
        assert_eq!(assessment.findings.len(), 2);
        assert_eq!(assessment.findings[0].symptom, "Yellowing");
        assert!(assessment.findings[1].causes.contains(&"Low humidity"));
    }

    #[test]
    fn test_good_words_take_precedence() {
        // "green" wins over "yellow" for the status, but the symptom is still reported
        let assessment = classify_health("green leaves with some yellow tips");
        assert_eq!(assessment.status, HealthStatus::Good);
        assert_eq!(assessment.findings.len(), 1);
    }

    #[test]
    fn test_unassessed_caption() {
        let assessment = classify_health("a pot on a table").with_question(Some("  why? "));
        assert_eq!(assessment.status, HealthStatus::Unassessed);
        assert_eq!(assessment.status.label(), "Requires Assessment");
        assert_eq!(assessment.question.as_deref(), Some("why?"));
    }
}
