#![warn(clippy::all, missing_docs)]

//! Core catalog logic for GameVault.
//!
//! This crate hosts the game record model, validation, the persisted
//! record store, and the pure query, facet and statistics functions
//! used by the terminal UI and any future frontends.

pub mod config;
pub mod error;
pub mod facets;
pub mod models;
pub mod query;
pub mod samples;
pub mod stats;
pub mod storage;
pub mod store;
pub mod validation;

pub use config::AppConfig;
pub use error::{CatalogError, CatalogResult, StorageError};
pub use facets::{distinct_genres, distinct_platforms};
pub use models::{GameFields, GameRecord, RawForm};
pub use query::{query, ActiveFilter, FilterKind, QueryParams, SortKey};
pub use stats::{stats, CatalogStats, TRACKED_PLATFORMS};
pub use storage::{FileStore, KeyValueStore, MemoryStore};
pub use store::RecordStore;
pub use validation::ValidationError;
