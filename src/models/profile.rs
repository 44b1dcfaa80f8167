use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A user's taste profile: normalized category and tag affinity weights.
///
/// Each map is a probability distribution over the names seen in the user's
/// resolved library (non-negative, summing to 1.0 when non-empty). Both maps
/// are empty when the user owns nothing or none of their games resolve
/// against the catalog.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct UserProfile {
    pub categories: HashMap<String, f64>,
    pub tags: HashMap<String, f64>,
}

impl UserProfile {
    /// Affinity weight for a category; names outside the profile weigh 0.
    pub fn category_weight(&self, category: &str) -> f64 {
        self.categories.get(category).copied().unwrap_or(0.0)
    }

    /// Affinity weight for a tag; names outside the profile weigh 0.
    pub fn tag_weight(&self, tag: &str) -> f64 {
        self.tags.get(tag).copied().unwrap_or(0.0)
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty() && self.tags.is_empty()
    }
}
