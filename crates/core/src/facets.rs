//! Distinct genre and platform values used to populate filter choices.

use std::collections::HashSet;

use crate::models::GameRecord;

/// Unique genres in first-appearance order.
pub fn distinct_genres(records: &[GameRecord]) -> Vec<String> {
    distinct(records.iter().map(|record| record.genre.as_str()))
}

/// Unique platform labels in first-appearance order.
pub fn distinct_platforms(records: &[GameRecord]) -> Vec<String> {
    distinct(
        records
            .iter()
            .flat_map(|record| record.platforms.iter().map(String::as_str)),
    )
}

fn distinct<'a>(values: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut seen = HashSet::new();
    values
        .filter(|value| seen.insert(*value))
        .map(str::to_string)
        .collect()
}
