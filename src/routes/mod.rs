use axum::{
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    db::GameStore,
    middleware::{make_span_with_request_id, request_id_middleware},
    services::{
        catalog::CatalogCache, gems::HiddenGemsFinder, providers::LibraryProvider,
        recommender::Recommender,
    },
};

pub mod catalog;
pub mod games;
pub mod gems;
pub mod recommend;
pub mod sync;

/// Shared application state handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn GameStore>,
    pub catalog: Arc<CatalogCache>,
    pub library: Arc<dyn LibraryProvider>,
    pub recommender: Arc<Recommender>,
    pub gems: Arc<HiddenGemsFinder>,
}

impl AppState {
    /// Wires the ranking pipelines around the given collaborators
    pub fn new(store: Arc<dyn GameStore>, library: Arc<dyn LibraryProvider>) -> Self {
        let catalog = Arc::new(CatalogCache::new(store.clone()));
        let recommender = Arc::new(Recommender::new(catalog.clone(), store.clone()));
        let gems = Arc::new(HiddenGemsFinder::new(catalog.clone(), library.clone()));

        Self {
            store,
            catalog,
            library,
            recommender,
            gems,
        }
    }
}

/// Creates the application router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .nest("/api/v1", api_routes(state))
        .layer(TraceLayer::new_for_http().make_span_with(make_span_with_request_id))
        .layer(axum::middleware::from_fn(request_id_middleware))
        .layer(CorsLayer::permissive())
}

/// API routes under /api/v1
fn api_routes(state: AppState) -> Router {
    Router::new()
        .route("/recommend", get(recommend::recommend))
        .route("/recommend/hidden-gems", get(gems::hidden_gems))
        .route("/sync_user", post(sync::sync_user))
        .route("/games/:appid", get(games::game_detail))
        .route("/catalog/reload", post(catalog::reload))
        .with_state(state)
}

/// Health check endpoint
async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}
