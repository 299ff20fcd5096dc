//! Filtering and ordering of the record collection for display.

use std::{cmp::Ordering, fmt, str::FromStr};

use thiserror::Error;
use tracing::debug;
use unicode_normalization::{char::is_combining_mark, UnicodeNormalization};

use crate::models::GameRecord;

/// Ordering applied after filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortKey {
    /// Title, A to Z.
    TitleAsc,
    /// Title, Z to A.
    TitleDesc,
    /// Lowest rating first.
    RatingAsc,
    /// Highest rating first.
    RatingDesc,
    /// Oldest release first.
    YearAsc,
    /// Newest release first.
    YearDesc,
    /// Most recently added first.
    Newest,
    /// Earliest added first.
    Oldest,
}

impl SortKey {
    /// Every key, in menu order.
    pub const ALL: [SortKey; 8] = [
        SortKey::TitleAsc,
        SortKey::TitleDesc,
        SortKey::RatingAsc,
        SortKey::RatingDesc,
        SortKey::YearAsc,
        SortKey::YearDesc,
        SortKey::Newest,
        SortKey::Oldest,
    ];

    /// Wire name, e.g. `rating-desc`.
    pub fn as_str(self) -> &'static str {
        match self {
            SortKey::TitleAsc => "title-asc",
            SortKey::TitleDesc => "title-desc",
            SortKey::RatingAsc => "rating-asc",
            SortKey::RatingDesc => "rating-desc",
            SortKey::YearAsc => "year-asc",
            SortKey::YearDesc => "year-desc",
            SortKey::Newest => "newest",
            SortKey::Oldest => "oldest",
        }
    }

    /// Parse a wire name; anything unrecognised means "keep insertion order".
    pub fn parse(value: &str) -> Option<Self> {
        value.parse().ok()
    }

    fn compare(self, a: &GameRecord, b: &GameRecord) -> Ordering {
        match self {
            SortKey::TitleAsc => locale_cmp(&a.title, &b.title),
            SortKey::TitleDesc => locale_cmp(&b.title, &a.title),
            SortKey::RatingAsc => a.rating.total_cmp(&b.rating),
            SortKey::RatingDesc => b.rating.total_cmp(&a.rating),
            SortKey::YearAsc => a.release_year.cmp(&b.release_year),
            SortKey::YearDesc => b.release_year.cmp(&a.release_year),
            SortKey::Newest => b.created_at.cmp(&a.created_at),
            SortKey::Oldest => a.created_at.cmp(&b.created_at),
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a string names no [`SortKey`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown sort key `{0}`")]
pub struct UnknownSortKey(pub String);

impl FromStr for SortKey {
    type Err = UnknownSortKey;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        SortKey::ALL
            .into_iter()
            .find(|key| key.as_str() == value)
            .ok_or_else(|| UnknownSortKey(value.to_string()))
    }
}

/// Current search, filter and sort selections.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    /// Case-insensitive substring searched across title, developer, genre and platforms.
    pub search_term: String,
    /// Exact genre, empty for any.
    pub genre: String,
    /// Exact platform, empty for any.
    pub platform: String,
    /// Ordering, `None` keeps insertion order.
    pub sort: Option<SortKey>,
}

/// Which filter an [`ActiveFilter`] describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterKind {
    /// Free-text search.
    Search,
    /// Genre filter.
    Genre,
    /// Platform filter.
    Platform,
}

impl FilterKind {
    /// Label shown next to the value.
    pub fn label(self) -> &'static str {
        match self {
            FilterKind::Search => "Search",
            FilterKind::Genre => "Genre",
            FilterKind::Platform => "Platform",
        }
    }
}

/// A filter currently narrowing the view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveFilter {
    /// Filter this entry describes.
    pub kind: FilterKind,
    /// Selected value.
    pub value: String,
}

impl ActiveFilter {
    /// Display label, e.g. `Genre`.
    pub fn label(&self) -> &'static str {
        self.kind.label()
    }
}

impl fmt::Display for ActiveFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.label(), self.value)
    }
}

impl QueryParams {
    /// Non-empty filters, in search, genre, platform order.
    pub fn active_filters(&self) -> Vec<ActiveFilter> {
        [
            (FilterKind::Search, &self.search_term),
            (FilterKind::Genre, &self.genre),
            (FilterKind::Platform, &self.platform),
        ]
        .into_iter()
        .filter(|(_, value)| !value.is_empty())
        .map(|(kind, value)| ActiveFilter {
            kind,
            value: value.clone(),
        })
        .collect()
    }

    /// Reset a single filter.
    pub fn clear(&mut self, kind: FilterKind) {
        match kind {
            FilterKind::Search => self.search_term.clear(),
            FilterKind::Genre => self.genre.clear(),
            FilterKind::Platform => self.platform.clear(),
        }
    }

    /// Whether no filter narrows the view.
    pub fn is_unfiltered(&self) -> bool {
        self.search_term.is_empty() && self.genre.is_empty() && self.platform.is_empty()
    }
}

/// Filter and order `records`, returning a fresh sequence.
///
/// Filters are conjunctive and skipped when empty. The sort is stable, so
/// ties keep insertion order. `records` itself is never reordered.
pub fn query(records: &[GameRecord], params: &QueryParams) -> Vec<GameRecord> {
    let needle = params.search_term.to_lowercase();
    let mut results: Vec<GameRecord> = records
        .iter()
        .filter(|record| needle.is_empty() || matches_term(record, &needle))
        .filter(|record| params.genre.is_empty() || record.genre == params.genre)
        .filter(|record| params.platform.is_empty() || record.has_platform(&params.platform))
        .cloned()
        .collect();

    if let Some(key) = params.sort {
        results.sort_by(|a, b| key.compare(a, b));
    }

    debug!(
        total = records.len(),
        matched = results.len(),
        sort = params.sort.map(SortKey::as_str).unwrap_or("none"),
        "Query evaluated"
    );
    results
}

fn matches_term(record: &GameRecord, needle: &str) -> bool {
    record.title.to_lowercase().contains(needle)
        || record.developer.to_lowercase().contains(needle)
        || record.genre.to_lowercase().contains(needle)
        || record
            .platforms
            .iter()
            .any(|platform| platform.to_lowercase().contains(needle))
}

/// Title ordering close to a locale collation.
///
/// Primary key ignores accents and case, then accents decide, then case
/// (lowercase first).
fn locale_cmp(a: &str, b: &str) -> Ordering {
    base_letters(a)
        .cmp(base_letters(b))
        .then_with(|| folded(a).cmp(folded(b)))
        .then_with(|| b.cmp(a))
}

fn base_letters(value: &str) -> impl Iterator<Item = char> + '_ {
    value
        .nfd()
        .filter(|ch| !is_combining_mark(*ch))
        .flat_map(char::to_lowercase)
}

fn folded(value: &str) -> impl Iterator<Item = char> + '_ {
    value.nfd().flat_map(char::to_lowercase)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::samples::sample_records;
    use chrono::{Duration, Utc};

    fn catalog() -> Vec<GameRecord> {
        let mut records = sample_records(Utc::now());
        for (offset, record) in records.iter_mut().enumerate() {
            record.created_at += Duration::seconds(offset as i64);
            record.updated_at = record.created_at;
        }
        records
    }

    fn titles(records: &[GameRecord]) -> Vec<&str> {
        records.iter().map(|record| record.title.as_str()).collect()
    }

    #[test]
    fn filters_compose_conjunctively() {
        let records = catalog();
        let params = QueryParams {
            search_term: "witcher".to_string(),
            genre: "RPG".to_string(),
            ..QueryParams::default()
        };
        assert_eq!(titles(&query(&records, &params)), ["The Witcher 3: Wild Hunt"]);

        let params = QueryParams {
            genre: "Ação".to_string(),
            platform: "PC".to_string(),
            ..QueryParams::default()
        };
        assert_eq!(titles(&query(&records, &params)), ["Red Dead Redemption 2"]);
    }

    #[test]
    fn search_is_case_insensitive_substring() {
        let records = catalog();
        let by_developer = QueryParams {
            search_term: "NAUGHTY".to_string(),
            ..QueryParams::default()
        };
        assert_eq!(
            titles(&query(&records, &by_developer)),
            ["The Last of Us Part II"]
        );

        let by_platform = QueryParams {
            search_term: "box".to_string(),
            ..QueryParams::default()
        };
        assert_eq!(query(&records, &by_platform).len(), 2);
    }

    #[test]
    fn genre_and_platform_match_exactly() {
        let records = catalog();
        let params = QueryParams {
            genre: "rpg".to_string(),
            ..QueryParams::default()
        };
        assert!(query(&records, &params).is_empty());

        let params = QueryParams {
            platform: "Play".to_string(),
            ..QueryParams::default()
        };
        assert!(query(&records, &params).is_empty());
    }

    #[test]
    fn empty_params_select_everything_in_insertion_order() {
        let records = catalog();
        assert_eq!(query(&records, &QueryParams::default()), records);
    }

    #[test]
    fn sorts_by_rating_and_title() {
        let records = catalog();
        let params = QueryParams {
            sort: Some(SortKey::RatingDesc),
            ..QueryParams::default()
        };
        let ratings: Vec<f64> = query(&records, &params)
            .iter()
            .map(|record| record.rating)
            .collect();
        assert_eq!(ratings, vec![9.8, 9.7, 9.5]);

        let params = QueryParams {
            sort: Some(SortKey::TitleAsc),
            ..QueryParams::default()
        };
        assert_eq!(
            titles(&query(&records, &params)),
            [
                "Red Dead Redemption 2",
                "The Last of Us Part II",
                "The Witcher 3: Wild Hunt"
            ]
        );
    }

    #[test]
    fn sorts_by_year_and_creation_time() {
        let records = catalog();
        let sorted = |key| {
            let params = QueryParams {
                sort: Some(key),
                ..QueryParams::default()
            };
            query(&records, &params)
                .into_iter()
                .map(|record| record.id)
                .collect::<Vec<_>>()
        };
        assert_eq!(sorted(SortKey::YearDesc), ["3", "2", "1"]);
        assert_eq!(sorted(SortKey::YearAsc), ["1", "2", "3"]);
        assert_eq!(sorted(SortKey::Newest), ["3", "2", "1"]);
        assert_eq!(sorted(SortKey::Oldest), ["1", "2", "3"]);
    }

    #[test]
    fn sort_is_stable_for_ties() {
        let mut records = catalog();
        for record in &mut records {
            record.rating = 8.0;
        }
        let params = QueryParams {
            sort: Some(SortKey::RatingDesc),
            ..QueryParams::default()
        };
        assert_eq!(query(&records, &params), records);
    }

    #[test]
    fn query_is_pure() {
        let records = catalog();
        let snapshot = records.clone();
        let params = QueryParams {
            sort: Some(SortKey::TitleDesc),
            ..QueryParams::default()
        };
        let first = query(&records, &params);
        let second = query(&records, &params);
        assert_eq!(first, second);
        assert_eq!(records, snapshot);
    }

    #[test]
    fn title_ordering_ignores_case() {
        assert_eq!(locale_cmp("apple", "Banana"), Ordering::Less);
        assert_eq!(locale_cmp("Zelda", "metroid"), Ordering::Greater);
        assert_eq!(locale_cmp("same", "same"), Ordering::Equal);
    }

    #[test]
    fn title_ordering_folds_accents() {
        assert_eq!(locale_cmp("Ético", "Zelda"), Ordering::Less);
        assert_eq!(locale_cmp("Ação", "Adventure"), Ordering::Less);
        assert_eq!(locale_cmp("resume", "résumé"), Ordering::Less);
        assert_eq!(locale_cmp("a", "A"), Ordering::Less);

        let mut records = catalog();
        records.truncate(2);
        records[0].title = "Zelda".to_string();
        records[1].title = "Ético".to_string();
        let params = QueryParams {
            sort: Some(SortKey::TitleAsc),
            ..QueryParams::default()
        };
        assert_eq!(titles(&query(&records, &params)), ["Ético", "Zelda"]);
    }

    #[test]
    fn sort_keys_round_trip_through_names() {
        for key in SortKey::ALL {
            assert_eq!(SortKey::parse(key.as_str()), Some(key));
        }
        assert_eq!(SortKey::parse(""), None);
        assert_eq!(SortKey::parse("popularity"), None);
    }

    #[test]
    fn active_filters_follow_fixed_order() {
        let mut params = QueryParams {
            search_term: "red".to_string(),
            platform: "PC".to_string(),
            ..QueryParams::default()
        };
        let chips: Vec<String> = params
            .active_filters()
            .iter()
            .map(ToString::to_string)
            .collect();
        assert_eq!(chips, ["Search: red", "Platform: PC"]);

        params.clear(FilterKind::Search);
        assert_eq!(params.active_filters().len(), 1);
        params.clear(FilterKind::Platform);
        assert!(params.is_unfiltered());
    }
}
