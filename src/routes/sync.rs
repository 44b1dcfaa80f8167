use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::{
    error::{AppError, AppResult},
    models::OwnedGame,
    routes::AppState,
};

/// Display name used when an owned appid has no catalog record
const UNKNOWN_TITLE: &str = "(Unknown Title)";

#[derive(Debug, Deserialize)]
pub struct SyncRequest {
    pub steamid: String,
}

#[derive(Debug, Serialize)]
pub struct SyncedGame {
    pub appid: i64,
    pub name: String,
    pub playtime_minutes: i64,
}

#[derive(Debug, Serialize)]
pub struct SyncResponse {
    pub message: String,
    pub total_games: usize,
    pub owned_games: Vec<SyncedGame>,
}

/// Handler for synchronizing a user's library from the upstream provider.
///
/// Fetches the owned games with playtime, upserts them into the ownership
/// table, and echoes back the library with display names resolved through
/// the catalog.
pub async fn sync_user(
    State(state): State<AppState>,
    Json(request): Json<SyncRequest>,
) -> AppResult<Json<SyncResponse>> {
    if request.steamid.trim().is_empty() {
        return Err(AppError::InvalidInput("Missing steamid".to_string()));
    }

    let library = state.library.fetch_owned_games(&request.steamid).await?;

    let mut owned: Vec<OwnedGame> = library
        .games
        .iter()
        .map(|(appid, playtime_minutes)| OwnedGame {
            user_id: request.steamid.clone(),
            appid: *appid,
            playtime_minutes: *playtime_minutes,
        })
        .collect();
    owned.sort_by_key(|game| game.appid);

    state
        .store
        .save_owned_games(&request.steamid, &owned)
        .await?;

    let mut owned_games = Vec::with_capacity(owned.len());
    for game in &owned {
        let name = state
            .store
            .get_game_detail(game.appid)
            .await?
            .map(|detail| detail.name)
            .unwrap_or_else(|| UNKNOWN_TITLE.to_string());

        owned_games.push(SyncedGame {
            appid: game.appid,
            name,
            playtime_minutes: game.playtime_minutes,
        });
    }

    tracing::info!(
        steamid = %request.steamid,
        total_games = owned_games.len(),
        "User library synchronized"
    );

    Ok(Json(SyncResponse {
        message: "User library synchronized".to_string(),
        total_games: owned_games.len(),
        owned_games,
    }))
}
