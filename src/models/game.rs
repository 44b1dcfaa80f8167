use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A catalog entry with its aggregated category/tag memberships.
///
/// Immutable once loaded into a cache snapshot. `total_reviews` is the
/// stored column from the catalog source and is treated as authoritative
/// even when it disagrees with `positive_reviews + negative_reviews`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GameRecord {
    pub appid: i64,
    pub name: String,
    pub price: f64,
    pub positive_reviews: i64,
    pub negative_reviews: i64,
    pub total_reviews: i64,
    pub categories: Vec<String>,
    pub tags: Vec<String>,
}

/// A user-owns-game fact with its engagement measure, as persisted in the
/// ownership table.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OwnedGame {
    pub user_id: String,
    pub appid: i64,
    pub playtime_minutes: i64,
}

/// A user's library as reported by the upstream provider
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OwnedLibrary {
    pub steam_id: String,
    /// appid -> total playtime in minutes
    pub games: HashMap<i64, i64>,
    pub fetched_at: DateTime<Utc>,
}

impl OwnedLibrary {
    pub fn new(steam_id: String, games: HashMap<i64, i64>) -> Self {
        Self {
            steam_id,
            games,
            fetched_at: Utc::now(),
        }
    }
}

/// A scored candidate in the reduced shape returned by the recommender
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Recommendation {
    pub appid: i64,
    pub name: String,
    pub price: f64,
    pub tags: Vec<String>,
    /// Composite affinity score, rounded to 4 decimal places
    pub score: f64,
}
