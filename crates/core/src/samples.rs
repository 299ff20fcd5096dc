//! Starter catalog installed into an empty collection.

use chrono::{DateTime, Utc};

use crate::models::GameRecord;

struct Sample {
    id: &'static str,
    title: &'static str,
    developer: &'static str,
    genre: &'static str,
    release_year: i32,
    platforms: &'static [&'static str],
    rating: f64,
    description: &'static str,
    image_url: &'static str,
}

const SAMPLES: &[Sample] = &[
    Sample {
        id: "1",
        title: "The Witcher 3: Wild Hunt",
        developer: "CD Projekt Red",
        genre: "RPG",
        release_year: 2015,
        platforms: &["PC", "PlayStation", "Xbox"],
        rating: 9.8,
        description: "An open-world RPG set in a dark fantasy universe.",
        image_url: "https://image.api.playstation.com/vulcan/ap/rnd/202211/0711/kh4MUIuMmHlktOHar3lVl6rY.png",
    },
    Sample {
        id: "2",
        title: "Red Dead Redemption 2",
        developer: "Rockstar Games",
        genre: "Ação",
        release_year: 2018,
        platforms: &["PC", "PlayStation", "Xbox"],
        rating: 9.7,
        description: "An epic tale of life in America's unforgiving heartland.",
        image_url: "https://image.api.playstation.com/cdn/UP1004/CUSA03041_00/Hpl5MtwQgOVF9vJqlfui6SDB5Jl4oBSq.png",
    },
    Sample {
        id: "3",
        title: "The Last of Us Part II",
        developer: "Naughty Dog",
        genre: "Ação",
        release_year: 2020,
        platforms: &["PlayStation"],
        rating: 9.5,
        description: "An emotional journey through a post-apocalyptic world.",
        image_url: "https://image.api.playstation.com/vulcan/ap/rnd/202010/2618/8a8M6m6M6cGx4M6cGx4M6cGx4.png",
    },
];

/// Build the starter records, all stamped with `now`.
pub fn sample_records(now: DateTime<Utc>) -> Vec<GameRecord> {
    SAMPLES
        .iter()
        .map(|sample| GameRecord {
            id: sample.id.to_string(),
            title: sample.title.to_string(),
            developer: sample.developer.to_string(),
            genre: sample.genre.to_string(),
            release_year: sample.release_year,
            platforms: sample.platforms.iter().map(|p| p.to_string()).collect(),
            rating: sample.rating,
            description: sample.description.to_string(),
            image_url: sample.image_url.to_string(),
            created_at: now,
            updated_at: now,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::GameFields;
    use crate::validation::validate;

    #[test]
    fn samples_pass_validation() {
        let records = sample_records(Utc::now());
        assert_eq!(records.len(), 3);
        for record in &records {
            assert_eq!(validate(&GameFields::from_record(record)), Ok(()));
        }
    }
}
