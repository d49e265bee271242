use serde::Deserialize;

use crate::error::SyncError;

/// Payload posted by the extension for one solved problem. Every field is
/// defaulted so deserialization never fails on an absent key; required
/// fields are enforced by `validate`, which also rejects empty strings.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SolutionSubmission {
    #[serde(default)]
    pub slug: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub difficulty: String,
    #[serde(default)]
    pub topics: Vec<String>,
    #[serde(default)]
    pub description_html: String,
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub language: String,
    #[serde(default)]
    pub source_url: String,
}

impl SolutionSubmission {
    pub fn validate(&self) -> Result<(), SyncError> {
        let required = [
            ("slug", &self.slug),
            ("title", &self.title),
            ("difficulty", &self.difficulty),
            ("code", &self.code),
            ("language", &self.language),
        ];
        let missing: Vec<&str> = required
            .iter()
            .filter(|(_, value)| value.is_empty())
            .map(|(name, _)| *name)
            .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(SyncError::Validation(format!(
                "Missing required fields: {}",
                missing.join(", ")
            )))
        }
    }
}

/// Top-level repository folder for a difficulty label.
pub fn difficulty_folder(difficulty: &str) -> &'static str {
    match difficulty {
        "Easy" => "easy",
        "Medium" => "medium",
        "Hard" => "hard",
        _ => "unknown",
    }
}

/// Sort rank for a difficulty label. Hard sorts first, unrecognized last.
pub fn difficulty_rank(difficulty: &str) -> u8 {
    match difficulty {
        "Hard" => 0,
        "Medium" => 1,
        "Easy" => 2,
        _ => 3,
    }
}
