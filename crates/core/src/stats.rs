//! Summary counts for the catalog header.

use std::collections::BTreeMap;

use crate::models::GameRecord;

/// Platforms with a dedicated counter.
pub const TRACKED_PLATFORMS: [&str; 3] = ["PlayStation", "Xbox", "PC"];

/// Aggregate counts over the current collection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogStats {
    /// Number of records.
    pub total: usize,
    /// Records listing each of [`TRACKED_PLATFORMS`].
    pub per_platform: BTreeMap<String, usize>,
    /// Size of the favorite set.
    pub favorite_count: usize,
}

impl CatalogStats {
    /// Count for `platform`, zero when it is not tracked.
    pub fn platform_count(&self, platform: &str) -> usize {
        self.per_platform.get(platform).copied().unwrap_or(0)
    }
}

/// Compute counts from `records` and the favorite ids.
pub fn stats(records: &[GameRecord], favorites: &[String]) -> CatalogStats {
    let per_platform = TRACKED_PLATFORMS
        .iter()
        .map(|platform| {
            let count = records
                .iter()
                .filter(|record| record.has_platform(platform))
                .count();
            (platform.to_string(), count)
        })
        .collect();

    CatalogStats {
        total: records.len(),
        per_platform,
        favorite_count: favorites.len(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::samples::sample_records;
    use chrono::Utc;

    #[test]
    fn counts_tracked_platforms() {
        let records = sample_records(Utc::now());
        let favorites = vec!["1".to_string()];
        let stats = stats(&records, &favorites);
        assert_eq!(stats.total, 3);
        assert_eq!(stats.platform_count("PlayStation"), 3);
        assert_eq!(stats.platform_count("Xbox"), 2);
        assert_eq!(stats.platform_count("PC"), 2);
        assert_eq!(stats.platform_count("Switch"), 0);
        assert_eq!(stats.favorite_count, 1);
    }

    #[test]
    fn empty_catalog_reports_zeroes() {
        let stats = stats(&[], &[]);
        assert_eq!(stats.total, 0);
        assert_eq!(stats.per_platform.len(), TRACKED_PLATFORMS.len());
        assert!(stats.per_platform.values().all(|count| *count == 0));
    }
}
