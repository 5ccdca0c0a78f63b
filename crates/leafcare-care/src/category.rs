//! Plant category from name keywords.

use leafcare_core::CategoryKeywords;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PlantCategory {
    Flower,
    Tree,
    Plant,
}

impl PlantCategory {
    pub fn label(self) -> &'static str {
        match self {
            PlantCategory::Flower => "Flower",
            PlantCategory::Tree => "Tree",
            PlantCategory::Plant => "Plant",
        }
    }
}

impl std::fmt::Display for PlantCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Lowercased keyword lists; flower keywords are checked first.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryTable {
    flower: Vec<String>,
    tree: Vec<String>,
}

impl From<&CategoryKeywords> for CategoryTable {
    fn from(keywords: &CategoryKeywords) -> Self {
        let normalize = |words: &[String]| {
            words
                .iter()
                .map(|w| w.trim().to_lowercase())
                .filter(|w| !w.is_empty())
                .collect()
        };
        Self {
            flower: normalize(&keywords.flower),
            tree: normalize(&keywords.tree),
        }
    }
}

impl Default for CategoryTable {
    fn default() -> Self {
        Self::from(&CategoryKeywords::default())
    }
}

impl CategoryTable {
    pub fn classify(&self, name: &str) -> PlantCategory {
        let name = name.to_lowercase();
        let matches = |words: &[String]| words.iter().any(|w| name.contains(w.as_str()));

        if matches(&self.flower) {
            PlantCategory::Flower
        } else if matches(&self.tree) {
            PlantCategory::Tree
        } else {
            PlantCategory::Plant
        }
    }
}
