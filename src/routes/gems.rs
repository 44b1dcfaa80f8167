use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;

use crate::{error::AppResult, models::GameRecord, routes::AppState};

#[derive(Debug, Deserialize)]
pub struct HiddenGemsQuery {
    #[serde(default)]
    steamid: Option<String>,
}

/// Handler for the hidden-gems discovery endpoint
pub async fn hidden_gems(
    State(state): State<AppState>,
    Query(params): Query<HiddenGemsQuery>,
) -> AppResult<Json<Vec<GameRecord>>> {
    let steamid = params.steamid.unwrap_or_default();

    let gems = state.gems.hidden_gems(&steamid).await?;
    Ok(Json(gems))
}
