use crate::{
    error::{AppError, AppResult},
    models::GameRecord,
    services::{
        catalog::{CatalogCache, CatalogSnapshot},
        providers::LibraryProvider,
    },
};
use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::Arc;

/// Candidate review-count window, both bounds strict
const MIN_TOTAL_REVIEWS: i64 = 50;
const MAX_TOTAL_REVIEWS: i64 = 500;
/// Minimum positive share, strict
const MIN_POSITIVE_RATIO: f64 = 0.9;
/// Result cap
const MAX_GEMS: usize = 50;

/// Surfaces well-reviewed games too obscure for the main ranking to reach.
///
/// Candidates are games with a small but overwhelmingly positive review
/// sample; they are ordered by the user's playtime-weighted tag affinity so
/// the obscure games that surface are obscure games in the genres the user
/// actually sinks hours into.
pub struct HiddenGemsFinder {
    catalog: Arc<CatalogCache>,
    library: Arc<dyn LibraryProvider>,
}

impl HiddenGemsFinder {
    pub fn new(catalog: Arc<CatalogCache>, library: Arc<dyn LibraryProvider>) -> Self {
        Self { catalog, library }
    }

    /// Ranks under-exposed, well-reviewed games by the user's tag affinity.
    ///
    /// A failed library fetch propagates as an upstream failure instead of
    /// degrading into an empty (and misleading) result.
    pub async fn hidden_gems(&self, steam_id: &str) -> AppResult<Vec<GameRecord>> {
        if steam_id.trim().is_empty() {
            return Err(AppError::InvalidInput("Missing steamid".to_string()));
        }

        let snapshot = self.catalog.snapshot().await?;
        let library = self.library.fetch_owned_games(steam_id).await?;
        let weights = playtime_tag_weights(&library.games, &snapshot);

        let mut gems: Vec<(f64, &GameRecord)> = snapshot
            .games()
            .iter()
            .filter(|game| is_hidden_gem(game))
            .map(|game| {
                let affinity: f64 = game
                    .tags
                    .iter()
                    .map(|tag| weights.get(tag).copied().unwrap_or(0.0))
                    .sum();
                (affinity, game)
            })
            .collect();

        gems.sort_by(|a, b| {
            b.0.partial_cmp(&a.0)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.1.appid.cmp(&b.1.appid))
        });
        gems.truncate(MAX_GEMS);

        tracing::info!(
            steam_id,
            owned = library.games.len(),
            gems = gems.len(),
            "Hidden gems computed"
        );

        Ok(gems.into_iter().map(|(_, game)| game.clone()).collect())
    }
}

/// Whether a game sits in the under-exposed, well-reviewed window.
///
/// The stored `total_reviews` column is authoritative for both the window
/// and the positive share, even when it disagrees with the sum of the
/// per-sign counts. The window's lower bound keeps the divisor non-zero.
fn is_hidden_gem(game: &GameRecord) -> bool {
    if game.total_reviews <= MIN_TOTAL_REVIEWS || game.total_reviews >= MAX_TOTAL_REVIEWS {
        return false;
    }

    game.positive_reviews as f64 / game.total_reviews as f64 > MIN_POSITIVE_RATIO
}

/// Accumulates `ln(1 + hours)` per tag across the user's owned games.
///
/// The log keeps thousand-hour libraries from drowning everything else:
/// engagement grows the weight, but sublinearly. Owned appids the catalog
/// cannot resolve are skipped, and tags never seen stay absent (reading
/// them later defaults to 0).
fn playtime_tag_weights(
    owned: &HashMap<i64, i64>,
    catalog: &CatalogSnapshot,
) -> HashMap<String, f64> {
    let mut weights: HashMap<String, f64> = HashMap::new();

    for (appid, playtime_minutes) in owned {
        let Some(game) = catalog.get(*appid) else {
            continue;
        };

        let hours = *playtime_minutes as f64 / 60.0;
        let engagement = hours.ln_1p();

        for tag in &game.tags {
            *weights.entry(tag.clone()).or_insert(0.0) += engagement;
        }
    }

    weights
}
