use axum::{extract::State, Json};
use serde::Serialize;

use crate::{error::AppResult, routes::AppState};

#[derive(Debug, Serialize)]
pub struct ReloadResponse {
    pub message: String,
    pub games: usize,
}

/// Handler for the explicit catalog invalidation hook.
///
/// The cache never refreshes itself when the underlying catalog changes;
/// whatever ingests new catalog data calls this afterwards.
pub async fn reload(State(state): State<AppState>) -> AppResult<Json<ReloadResponse>> {
    let snapshot = state.catalog.reload().await?;

    Ok(Json(ReloadResponse {
        message: "Catalog reloaded".to_string(),
        games: snapshot.len(),
    }))
}
