use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;

use crate::{
    error::AppResult, models::Recommendation, routes::AppState,
    services::recommender::DEFAULT_LIMIT,
};

#[derive(Debug, Deserialize)]
pub struct RecommendQuery {
    #[serde(default)]
    steamid: Option<String>,
    #[serde(default)]
    limit: Option<usize>,
}

/// Handler for the personalized recommendation endpoint
pub async fn recommend(
    State(state): State<AppState>,
    Query(params): Query<RecommendQuery>,
) -> AppResult<Json<Vec<Recommendation>>> {
    let steamid = params.steamid.unwrap_or_default();
    let limit = params.limit.unwrap_or(DEFAULT_LIMIT);

    let results = state.recommender.recommend(&steamid, limit).await?;
    Ok(Json(results))
}
