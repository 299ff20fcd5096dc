//! Shared domain models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Image shown for games saved without an explicit cover URL.
pub const PLACEHOLDER_IMAGE_URL: &str =
    "https://via.placeholder.com/300x200?text=Image+Unavailable";

/// Text shown in place of an empty description.
pub const NO_DESCRIPTION: &str = "No description.";

/// Rating assumed when a form leaves the field blank.
pub const DEFAULT_RATING: f64 = 5.0;

/// One catalogued game.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameRecord {
    /// Opaque identifier assigned at creation.
    pub id: String,
    /// Game title.
    pub title: String,
    /// Studio credited with the game.
    pub developer: String,
    /// Genre label, matched exactly by the genre filter.
    pub genre: String,
    /// Year of first release.
    pub release_year: i32,
    /// Platform labels, without duplicates.
    pub platforms: Vec<String>,
    /// Score between 0 and 10.
    pub rating: f64,
    /// Free-form notes; empty means no description.
    #[serde(default)]
    pub description: String,
    /// Cover image location.
    pub image_url: String,
    /// When the record was first stored.
    pub created_at: DateTime<Utc>,
    /// When the record was last written.
    pub updated_at: DateTime<Utc>,
}

impl GameRecord {
    /// Description for display, falling back to [`NO_DESCRIPTION`].
    pub fn description_text(&self) -> &str {
        if self.description.is_empty() {
            NO_DESCRIPTION
        } else {
            &self.description
        }
    }

    /// Whether the record lists `platform` exactly.
    pub fn has_platform(&self, platform: &str) -> bool {
        self.platforms.iter().any(|value| value == platform)
    }

    /// Platforms joined for single-line display.
    pub fn platform_list(&self) -> String {
        self.platforms.join(", ")
    }

    /// Rating formatted as `9.8/10`.
    pub fn display_rating(&self) -> String {
        format!("{}/10", self.rating)
    }
}

/// User-editable fields of a [`GameRecord`].
#[allow(missing_docs)]
#[derive(Debug, Clone, PartialEq, Default)]
pub struct GameFields {
    pub title: String,
    pub developer: String,
    pub genre: String,
    /// `None` when the year was left blank or could not be parsed.
    pub release_year: Option<i32>,
    pub platforms: Vec<String>,
    pub rating: f64,
    pub description: String,
    /// Empty selects the placeholder image.
    pub image_url: String,
}

impl GameFields {
    /// Build fields from raw text inputs.
    ///
    /// Parsing never fails: unparsable values are left for validation to reject.
    pub fn from_form(form: &RawForm) -> Self {
        let release_year = form.release_year.trim().parse::<i32>().ok();
        let rating = match form.rating.trim() {
            "" => DEFAULT_RATING,
            value => value.parse::<f64>().unwrap_or(f64::NAN),
        };
        let platforms = form
            .platforms
            .split(',')
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(str::to_string)
            .collect();

        Self {
            title: form.title.clone(),
            developer: form.developer.clone(),
            genre: form.genre.clone(),
            release_year,
            platforms,
            rating,
            description: form.description.clone(),
            image_url: form.image_url.trim().to_string(),
        }
    }

    /// Prefill from an existing record, e.g. for an edit form.
    pub fn from_record(record: &GameRecord) -> Self {
        Self {
            title: record.title.clone(),
            developer: record.developer.clone(),
            genre: record.genre.clone(),
            release_year: Some(record.release_year),
            platforms: record.platforms.clone(),
            rating: record.rating,
            description: record.description.clone(),
            image_url: record.image_url.clone(),
        }
    }

    /// Platforms with blanks dropped and duplicates removed, first occurrence kept.
    pub(crate) fn normalized_platforms(&self) -> Vec<String> {
        let mut platforms: Vec<String> = Vec::with_capacity(self.platforms.len());
        for platform in &self.platforms {
            if !platform.is_empty() && !platforms.contains(platform) {
                platforms.push(platform.clone());
            }
        }
        platforms
    }
}

/// Unparsed text inputs as typed into a form.
#[allow(missing_docs)]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawForm {
    pub title: String,
    pub developer: String,
    pub genre: String,
    pub release_year: String,
    /// Comma-separated platform labels.
    pub platforms: String,
    pub rating: String,
    pub description: String,
    pub image_url: String,
}

impl RawForm {
    /// Prefill from an existing record.
    pub fn from_record(record: &GameRecord) -> Self {
        Self {
            title: record.title.clone(),
            developer: record.developer.clone(),
            genre: record.genre.clone(),
            release_year: record.release_year.to_string(),
            platforms: record.platform_list(),
            rating: record.rating.to_string(),
            description: record.description.clone(),
            image_url: record.image_url.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn form_parsing_is_lenient() {
        let form = RawForm {
            title: "Celeste".to_string(),
            developer: "Maddy Makes Games".to_string(),
            genre: "Platformer".to_string(),
            release_year: " 2018 ".to_string(),
            platforms: "PC, Switch,, ".to_string(),
            rating: String::new(),
            description: String::new(),
            image_url: "  ".to_string(),
        };
        let fields = GameFields::from_form(&form);
        assert_eq!(fields.release_year, Some(2018));
        assert_eq!(fields.platforms, vec!["PC", "Switch"]);
        assert_eq!(fields.rating, DEFAULT_RATING);
        assert!(fields.image_url.is_empty());

        let form = RawForm {
            release_year: "soon".to_string(),
            rating: "great".to_string(),
            ..form
        };
        let fields = GameFields::from_form(&form);
        assert_eq!(fields.release_year, None);
        assert!(fields.rating.is_nan());
    }

    #[test]
    fn normalizes_duplicate_platforms() {
        let fields = GameFields {
            platforms: vec![
                "PC".to_string(),
                String::new(),
                "Xbox".to_string(),
                "PC".to_string(),
            ],
            ..GameFields::default()
        };
        assert_eq!(fields.normalized_platforms(), vec!["PC", "Xbox"]);
    }

    #[test]
    fn record_serializes_with_camel_case_names() -> serde_json::Result<()> {
        let now = Utc::now();
        let record = GameRecord {
            id: "1".to_string(),
            title: "Celeste".to_string(),
            developer: "Maddy Makes Games".to_string(),
            genre: "Platformer".to_string(),
            release_year: 2018,
            platforms: vec!["PC".to_string()],
            rating: 9.1,
            description: String::new(),
            image_url: PLACEHOLDER_IMAGE_URL.to_string(),
            created_at: now,
            updated_at: now,
        };
        let value = serde_json::to_value(&record)?;
        for key in ["releaseYear", "imageUrl", "createdAt", "updatedAt"] {
            assert!(value.get(key).is_some(), "missing {key}");
        }
        assert_eq!(record.description_text(), NO_DESCRIPTION);
        assert_eq!(record.display_rating(), "9.1/10");
        Ok(())
    }
}
