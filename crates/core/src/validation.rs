//! Field validation applied before any record mutation.

use thiserror::Error;

use crate::models::GameFields;

/// Earliest accepted release year.
pub const MIN_RELEASE_YEAR: i32 = 1950;
/// Latest accepted release year.
pub const MAX_RELEASE_YEAR: i32 = 2030;
/// Highest rating on the scale.
pub const MAX_RATING: f64 = 10.0;

/// A rejected field. Messages are meant to be shown to the user as-is.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    /// Title is empty.
    #[error("Please enter the game title")]
    MissingTitle,
    /// Developer is empty.
    #[error("Please enter the developer")]
    MissingDeveloper,
    /// Genre is empty.
    #[error("Please select a genre")]
    MissingGenre,
    /// Release year is absent or outside the accepted range.
    #[error("Please enter a valid release year ({MIN_RELEASE_YEAR}-{MAX_RELEASE_YEAR})")]
    InvalidReleaseYear,
    /// No platform was selected.
    #[error("Please select at least one platform")]
    MissingPlatforms,
    /// Rating is not a number between 0 and 10.
    #[error("Rating must be between 0 and 10")]
    InvalidRating,
}

/// Check `fields`, returning the first failing condition.
///
/// Order: title, developer, genre, release year, platforms, rating.
pub fn validate(fields: &GameFields) -> Result<(), ValidationError> {
    if fields.title.is_empty() {
        return Err(ValidationError::MissingTitle);
    }
    if fields.developer.is_empty() {
        return Err(ValidationError::MissingDeveloper);
    }
    if fields.genre.is_empty() {
        return Err(ValidationError::MissingGenre);
    }
    match fields.release_year {
        Some(year) if (MIN_RELEASE_YEAR..=MAX_RELEASE_YEAR).contains(&year) => {}
        _ => return Err(ValidationError::InvalidReleaseYear),
    }
    if fields.platforms.iter().all(|platform| platform.is_empty()) {
        return Err(ValidationError::MissingPlatforms);
    }
    if !fields.rating.is_finite() || !(0.0..=MAX_RATING).contains(&fields.rating) {
        return Err(ValidationError::InvalidRating);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_fields() -> GameFields {
        GameFields {
            title: "Hades".to_string(),
            developer: "Supergiant Games".to_string(),
            genre: "Roguelike".to_string(),
            release_year: Some(2020),
            platforms: vec!["PC".to_string()],
            rating: 9.0,
            description: String::new(),
            image_url: String::new(),
        }
    }

    #[test]
    fn accepts_complete_fields() {
        assert_eq!(validate(&valid_fields()), Ok(()));
    }

    #[test]
    fn reports_first_failure_in_fixed_order() {
        let fields = GameFields {
            developer: String::new(),
            genre: String::new(),
            release_year: None,
            platforms: Vec::new(),
            ..valid_fields()
        };
        assert_eq!(validate(&fields), Err(ValidationError::MissingDeveloper));

        let fields = GameFields {
            title: String::new(),
            ..fields
        };
        assert_eq!(validate(&fields), Err(ValidationError::MissingTitle));
    }

    #[test]
    fn release_year_bounds_are_inclusive() {
        for (year, ok) in [
            (Some(1949), false),
            (Some(1950), true),
            (Some(2030), true),
            (Some(2031), false),
            (None, false),
        ] {
            let fields = GameFields {
                release_year: year,
                ..valid_fields()
            };
            assert_eq!(validate(&fields).is_ok(), ok, "year {year:?}");
        }
    }

    #[test]
    fn rejects_missing_platforms_and_bad_rating() {
        let fields = GameFields {
            platforms: vec![String::new()],
            ..valid_fields()
        };
        assert_eq!(validate(&fields), Err(ValidationError::MissingPlatforms));

        let fields = GameFields {
            rating: 10.5,
            ..valid_fields()
        };
        assert_eq!(validate(&fields), Err(ValidationError::InvalidRating));

        let fields = GameFields {
            rating: f64::NAN,
            ..valid_fields()
        };
        assert_eq!(validate(&fields), Err(ValidationError::InvalidRating));
    }

    #[test]
    fn messages_are_distinct() {
        let messages: std::collections::HashSet<String> = [
            ValidationError::MissingTitle,
            ValidationError::MissingDeveloper,
            ValidationError::MissingGenre,
            ValidationError::InvalidReleaseYear,
            ValidationError::MissingPlatforms,
            ValidationError::InvalidRating,
        ]
        .iter()
        .map(ToString::to_string)
        .collect();
        assert_eq!(messages.len(), 6);
    }
}
