//! Authoritative record collection with write-through persistence.

use chrono::{DateTime, Duration, Utc};
use tracing::{info, warn};

use crate::{
    config::AppConfig,
    error::{CatalogError, CatalogResult},
    models::{GameFields, GameRecord, PLACEHOLDER_IMAGE_URL},
    samples,
    storage::{read_json, write_json, KeyValueStore, FAVORITES_KEY, GAMES_KEY},
    validation::validate,
};

/// Owns the game records and favorite ids, persisting both after every change.
///
/// Mutations are applied in memory first. A failed write is reported as
/// [`CatalogError::Persistence`] but the in-memory change is kept.
pub struct RecordStore<S: KeyValueStore> {
    storage: S,
    games: Vec<GameRecord>,
    favorites: Vec<String>,
    placeholder_image_url: String,
    last_stamp: Option<DateTime<Utc>>,
    last_id: i64,
}

impl<S: KeyValueStore> RecordStore<S> {
    /// Load state from `storage` using the default placeholder image.
    pub fn open(storage: S) -> CatalogResult<Self> {
        Self::open_with_placeholder(storage, PLACEHOLDER_IMAGE_URL)
    }

    /// Load state from `storage` with settings taken from `config`.
    pub fn open_with_config(storage: S, config: &AppConfig) -> CatalogResult<Self> {
        Self::open_with_placeholder(storage, &config.placeholder_image_url)
    }

    fn open_with_placeholder(storage: S, placeholder: &str) -> CatalogResult<Self> {
        let games: Vec<GameRecord> = read_json(&storage, GAMES_KEY)?;
        let favorites: Vec<String> = read_json(&storage, FAVORITES_KEY)?;
        let last_stamp = games
            .iter()
            .flat_map(|game| [game.created_at, game.updated_at])
            .max();
        let last_id = games
            .iter()
            .filter_map(|game| game.id.parse::<i64>().ok())
            .max()
            .unwrap_or(0);
        info!(
            games = games.len(),
            favorites = favorites.len(),
            "Catalog loaded"
        );
        Ok(Self {
            storage,
            games,
            favorites,
            placeholder_image_url: placeholder.to_string(),
            last_stamp,
            last_id,
        })
    }

    /// Records in insertion order.
    pub fn list(&self) -> &[GameRecord] {
        &self.games
    }

    /// Favorite ids in the order they were added.
    pub fn favorites(&self) -> &[String] {
        &self.favorites
    }

    /// Whether `id` is currently favorited.
    pub fn is_favorite(&self, id: &str) -> bool {
        self.favorites.iter().any(|fav| fav == id)
    }

    /// Look up a single record, e.g. for a detail view.
    pub fn get(&self, id: &str) -> CatalogResult<&GameRecord> {
        self.games
            .iter()
            .find(|game| game.id == id)
            .ok_or_else(|| CatalogError::NotFound(id.to_string()))
    }

    /// Borrow the underlying key-value store.
    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Validate `fields` and append a new record.
    pub fn create(&mut self, fields: GameFields) -> CatalogResult<GameRecord> {
        validate(&fields)?;
        let now = self.next_stamp();
        let id = self.next_id(now);
        let record = self.build_record(id, fields, now, now);
        self.games.push(record.clone());
        info!(id = %record.id, title = %record.title, "Game created");
        self.persist_games()?;
        Ok(record)
    }

    /// Replace every editable field of record `id`, keeping its id, position and creation time.
    pub fn update(&mut self, id: &str, fields: GameFields) -> CatalogResult<GameRecord> {
        validate(&fields)?;
        let index = self
            .games
            .iter()
            .position(|game| game.id == id)
            .ok_or_else(|| CatalogError::NotFound(id.to_string()))?;
        let now = self.next_stamp();
        let created_at = self.games[index].created_at;
        let record = self.build_record(id.to_string(), fields, created_at, now);
        self.games[index] = record.clone();
        info!(id = %record.id, title = %record.title, "Game updated");
        self.persist_games()?;
        Ok(record)
    }

    /// Remove record `id` and any favorite referencing it. Absent ids are a no-op.
    pub fn delete(&mut self, id: &str) -> CatalogResult<()> {
        let before = self.games.len();
        self.games.retain(|game| game.id != id);
        self.favorites.retain(|fav| fav != id);
        if self.games.len() == before {
            warn!(id, "Delete requested for unknown game");
        } else {
            info!(id, "Game deleted");
        }
        let favorites = self.persist_favorites();
        let games = self.persist_games();
        favorites.and(games)
    }

    /// Flip favorite membership for `id`, returning the new state.
    pub fn toggle_favorite(&mut self, id: &str) -> CatalogResult<bool> {
        let favorite = match self.favorites.iter().position(|fav| fav == id) {
            Some(index) => {
                self.favorites.remove(index);
                false
            }
            None => {
                self.favorites.push(id.to_string());
                true
            }
        };
        info!(id, favorite, "Favorite toggled");
        self.persist_favorites()?;
        Ok(favorite)
    }

    /// Install the starter catalog when the collection is empty.
    pub fn seed_samples_if_empty(&mut self) -> CatalogResult<bool> {
        if !self.games.is_empty() {
            return Ok(false);
        }
        let now = self.next_stamp();
        self.games = samples::sample_records(now);
        self.last_id = self.last_id.max(self.games.len() as i64);
        info!(games = self.games.len(), "Seeded starter catalog");
        self.persist_games()?;
        Ok(true)
    }

    fn build_record(
        &self,
        id: String,
        fields: GameFields,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> GameRecord {
        let platforms = fields.normalized_platforms();
        let image_url = if fields.image_url.is_empty() {
            self.placeholder_image_url.clone()
        } else {
            fields.image_url
        };
        GameRecord {
            id,
            title: fields.title,
            developer: fields.developer,
            genre: fields.genre,
            release_year: fields.release_year.unwrap_or_default(),
            platforms,
            rating: fields.rating,
            description: fields.description,
            image_url,
            created_at,
            updated_at,
        }
    }

    /// Current time, bumped so every stamp this store issues is strictly increasing.
    fn next_stamp(&mut self) -> DateTime<Utc> {
        let now = Utc::now();
        let stamp = match self.last_stamp {
            Some(last) if now <= last => last + Duration::microseconds(1),
            _ => now,
        };
        self.last_stamp = Some(stamp);
        stamp
    }

    /// Millisecond token above every id handed out or loaded so far.
    ///
    /// Once the numeric range is exhausted the search continues downwards
    /// for the nearest unused token.
    fn next_id(&mut self, now: DateTime<Utc>) -> String {
        let start = now.timestamp_millis().max(self.last_id.saturating_add(1));
        let candidate = (start..=i64::MAX)
            .chain((0..start).rev())
            .find(|candidate| !self.id_in_use(*candidate))
            .unwrap_or(start);
        self.last_id = self.last_id.max(candidate);
        candidate.to_string()
    }

    fn id_in_use(&self, candidate: i64) -> bool {
        let token = candidate.to_string();
        self.games.iter().any(|game| game.id == token)
    }

    fn persist_games(&mut self) -> CatalogResult<()> {
        write_json(&mut self.storage, GAMES_KEY, &self.games).map_err(|err| {
            warn!(%err, "Failed to persist games");
            CatalogError::from(err)
        })
    }

    fn persist_favorites(&mut self) -> CatalogResult<()> {
        write_json(&mut self.storage, FAVORITES_KEY, &self.favorites).map_err(|err| {
            warn!(%err, "Failed to persist favorites");
            CatalogError::from(err)
        })
    }
}
