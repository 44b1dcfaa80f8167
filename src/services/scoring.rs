use crate::{
    models::{GameRecord, UserProfile},
    services::confidence::wilson_lower_bound,
};

/// Weight of the category-affinity term in the composite score
pub const CATEGORY_WEIGHT: f64 = 0.40;
/// Weight of the tag-affinity term
pub const TAG_WEIGHT: f64 = 0.50;
/// Weight of the review-confidence term
pub const REVIEW_WEIGHT: f64 = 0.10;

/// Composite affinity score for one candidate game.
///
/// Sums the profile weights of the game's categories and tags, blends in the
/// Wilson review confidence, and weights the three terms 0.40/0.50/0.10.
/// No clamping: for a well-formed profile each affinity term is itself a sum
/// of probabilities bounded by 1, so the composite stays in [0, 1].
pub fn score_game(profile: &UserProfile, game: &GameRecord) -> f64 {
    let category_score: f64 = game
        .categories
        .iter()
        .map(|category| profile.category_weight(category))
        .sum();

    let tag_score: f64 = game.tags.iter().map(|tag| profile.tag_weight(tag)).sum();

    let review_score = wilson_lower_bound(game.positive_reviews, game.negative_reviews);

    CATEGORY_WEIGHT * category_score + TAG_WEIGHT * tag_score + REVIEW_WEIGHT * review_score
}
