use axum::{
    extract::{Path, State},
    Json,
};

use crate::{
    error::{AppError, AppResult},
    models::GameRecord,
    routes::AppState,
};

/// Handler for single-game detail lookup
pub async fn game_detail(
    State(state): State<AppState>,
    Path(appid): Path<i64>,
) -> AppResult<Json<GameRecord>> {
    match state.store.get_game_detail(appid).await? {
        Some(game) => Ok(Json(game)),
        None => Err(AppError::NotFound(format!("No game with appid {}", appid))),
    }
}
