use crate::{
    db::GameStore,
    error::{AppError, AppResult},
    models::Recommendation,
    services::{catalog::CatalogCache, profile::build_profile, scoring::score_game},
};
use std::cmp::Ordering;
use std::sync::Arc;

/// How many recommendations a request gets unless it asks otherwise
pub const DEFAULT_LIMIT: usize = 10;

/// Personalized catalog ranking.
///
/// Read-only over the catalog snapshot and the ownership table: builds the
/// user's profile, scores every catalog game the user does not already own,
/// and returns the top of the ranking in the reduced response shape.
pub struct Recommender {
    catalog: Arc<CatalogCache>,
    store: Arc<dyn GameStore>,
}

impl Recommender {
    pub fn new(catalog: Arc<CatalogCache>, store: Arc<dyn GameStore>) -> Self {
        Self { catalog, store }
    }

    /// Ranks unowned catalog games by affinity to the user's library.
    ///
    /// An empty library is a valid state: the profile degrades to all-zero
    /// affinity and the ranking falls back to pure review confidence. A
    /// failed ownership query, by contrast, propagates.
    pub async fn recommend(&self, user_id: &str, limit: usize) -> AppResult<Vec<Recommendation>> {
        if user_id.trim().is_empty() {
            return Err(AppError::InvalidInput("Missing steamid".to_string()));
        }

        let snapshot = self.catalog.snapshot().await?;
        let owned = self.store.get_owned_appids(user_id).await?;
        let profile = build_profile(&owned, &snapshot);

        if profile.is_empty() {
            tracing::debug!(user_id, "Empty profile, ranking by review confidence only");
        }

        let mut results: Vec<Recommendation> = snapshot
            .games()
            .iter()
            .filter(|game| !owned.contains(&game.appid))
            .map(|game| Recommendation {
                appid: game.appid,
                name: game.name.clone(),
                price: game.price,
                tags: game.tags.clone(),
                score: round_score(score_game(&profile, game)),
            })
            .collect();

        // Descending by score; equal scores order by ascending appid so the
        // ranking is reproducible
        results.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.appid.cmp(&b.appid))
        });
        results.truncate(limit);

        tracing::info!(
            user_id,
            owned = owned.len(),
            returned = results.len(),
            "Recommendations computed"
        );

        Ok(results)
    }
}

/// Rounds a composite score to the 4 decimal places the response carries
fn round_score(score: f64) -> f64 {
    (score * 10_000.0).round() / 10_000.0
}
