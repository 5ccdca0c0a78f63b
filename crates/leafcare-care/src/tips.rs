//! Static care tips for well-known plants.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CareTips {
    pub watering: &'static str,
    pub sunlight: &'static str,
    pub temperature: &'static str,
    pub fertilizer: &'static str,
}

const GENERAL: CareTips = CareTips {
    watering: "Water when top soil feels dry. Adjust based on weather.",
    sunlight: "Most plants prefer bright indirect light.",
    temperature: "Keep in comfortable room temperature (18-25°C).",
    fertilizer: "Fertilize monthly during growing season.",
};

const KNOWN: [(&str, CareTips); 4] = [
    (
        "rose",
        CareTips {
            watering: "Water deeply 2-3 times per week. Keep soil moist but not waterlogged.",
            sunlight: "Needs 6+ hours of direct sunlight daily.",
            temperature: "Prefers 15-25°C. Protect from extreme heat.",
            fertilizer: "Fertilize monthly during growing season.",
        },
    ),
    (
        "tomato",
        CareTips {
            watering: "Water daily in hot weather. Keep soil consistently moist.",
            sunlight: "Needs full sun (8+ hours daily).",
            temperature: "Thrives in 18-27°C. Protect from frost.",
            fertilizer: "Fertilize every 2 weeks with balanced fertilizer.",
        },
    ),
    (
        "money plant",
        CareTips {
            watering: "Water when top inch of soil is dry (every 5-7 days).",
            sunlight: "Bright indirect light. Can tolerate low light.",
            temperature: "Prefers 18-24°C. Avoid cold drafts.",
            fertilizer: "Fertilize monthly during spring/summer.",
        },
    ),
    (
        "fern",
        CareTips {
            watering: "Keep soil consistently moist. Water every 2-3 days.",
            sunlight: "Bright indirect light. Avoid direct sun.",
            temperature: "Prefers 18-22°C. High humidity preferred.",
            fertilizer: "Fertilize monthly with diluted fertilizer.",
        },
    ),
];

/// Tips for `name` (matched case-insensitively on the whole name), or
/// general advice.
pub fn care_tips(name: &str) -> CareTips {
    let name = name.trim().to_lowercase();
    KNOWN
        .iter()
        .find(|(known, _)| *known == name)
        .map(|(_, tips)| *tips)
        .unwrap_or(GENERAL)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_plant_tips() {
        assert_eq!(care_tips("Tomato").sunlight, "Needs full sun (8+ hours daily).");
        assert_eq!(care_tips(" money plant ").temperature, "Prefers 18-24°C. Avoid cold drafts.");
    }

    #[test]
    fn test_unknown_plant_gets_general_tips() {
        assert_eq!(care_tips("Cherry Tomato"), GENERAL);
        assert_eq!(care_tips("").watering, "Water when top soil feels dry. Adjust based on weather.");
    }
}
