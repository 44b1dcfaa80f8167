use crate::{models::UserProfile, services::catalog::CatalogSnapshot};
use std::collections::{HashMap, HashSet};

/// Builds a user's taste profile from their owned appids.
///
/// Each owned game that resolves against the snapshot contributes one unit
/// of frequency per category and per tag it belongs to; each accumulator is
/// then normalized by its own total into a probability distribution. Owned
/// appids the catalog cannot resolve are skipped: partial profile data beats
/// failing the whole request, and the skip is the documented policy rather
/// than a lookup accident.
pub fn build_profile(owned: &HashSet<i64>, catalog: &CatalogSnapshot) -> UserProfile {
    let mut category_counts: HashMap<String, u64> = HashMap::new();
    let mut tag_counts: HashMap<String, u64> = HashMap::new();
    let mut resolved = 0usize;

    for appid in owned {
        let Some(game) = catalog.get(*appid) else {
            tracing::debug!(appid, "Owned appid missing from catalog, skipped");
            continue;
        };
        resolved += 1;

        for category in &game.categories {
            *category_counts.entry(category.clone()).or_insert(0) += 1;
        }
        for tag in &game.tags {
            *tag_counts.entry(tag.clone()).or_insert(0) += 1;
        }
    }

    tracing::debug!(owned = owned.len(), resolved, "Profile built");

    UserProfile {
        categories: normalize(category_counts),
        tags: normalize(tag_counts),
    }
}

/// Divides each count by the accumulator total; an empty accumulator stays
/// an empty mapping.
fn normalize(counts: HashMap<String, u64>) -> HashMap<String, f64> {
    let total: u64 = counts.values().sum();
    if total == 0 {
        return HashMap::new();
    }

    counts
        .into_iter()
        .map(|(name, count)| (name, count as f64 / total as f64))
        .collect()
}
