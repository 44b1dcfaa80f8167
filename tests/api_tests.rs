use axum_test::TestServer;
use serde_json::json;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use curator_api::db::GameStore;
use curator_api::error::{AppError, AppResult};
use curator_api::models::{GameRecord, OwnedGame, OwnedLibrary};
use curator_api::routes::{create_router, AppState};
use curator_api::services::confidence::wilson_lower_bound;
use curator_api::services::providers::LibraryProvider;

/// In-process storage fixture backing the router under test
struct FixtureStore {
    catalog: Vec<GameRecord>,
    owned: Mutex<HashMap<String, Vec<OwnedGame>>>,
}

impl FixtureStore {
    fn new(catalog: Vec<GameRecord>) -> Self {
        Self {
            catalog,
            owned: Mutex::new(HashMap::new()),
        }
    }

    fn with_owned(self, user_id: &str, appids: &[i64]) -> Self {
        let games = appids
            .iter()
            .map(|appid| OwnedGame {
                user_id: user_id.to_string(),
                appid: *appid,
                playtime_minutes: 60,
            })
            .collect();
        self.owned.lock().unwrap().insert(user_id.to_string(), games);
        self
    }
}

#[async_trait::async_trait]
impl GameStore for FixtureStore {
    async fn load_catalog(&self) -> AppResult<Vec<GameRecord>> {
        Ok(self.catalog.clone())
    }

    async fn get_game_detail(&self, appid: i64) -> AppResult<Option<GameRecord>> {
        Ok(self.catalog.iter().find(|game| game.appid == appid).cloned())
    }

    async fn get_owned_appids(&self, user_id: &str) -> AppResult<HashSet<i64>> {
        Ok(self
            .owned
            .lock()
            .unwrap()
            .get(user_id)
            .map(|games| games.iter().map(|game| game.appid).collect())
            .unwrap_or_default())
    }

    async fn save_owned_games(&self, user_id: &str, games: &[OwnedGame]) -> AppResult<()> {
        self.owned
            .lock()
            .unwrap()
            .insert(user_id.to_string(), games.to_vec());
        Ok(())
    }
}

/// Upstream library fixture; `fail` simulates an unreachable provider
struct FixtureLibrary {
    games: HashMap<i64, i64>,
    fail: bool,
}

#[async_trait::async_trait]
impl LibraryProvider for FixtureLibrary {
    async fn fetch_owned_games(&self, steam_id: &str) -> AppResult<OwnedLibrary> {
        if self.fail {
            return Err(AppError::UpstreamUnavailable(
                "Steam API returned status 503".to_string(),
            ));
        }
        Ok(OwnedLibrary::new(steam_id.to_string(), self.games.clone()))
    }

    fn name(&self) -> &'static str {
        "fixture"
    }
}

fn game(
    appid: i64,
    name: &str,
    tags: &[&str],
    positive: i64,
    negative: i64,
    total: i64,
) -> GameRecord {
    GameRecord {
        appid,
        name: name.to_string(),
        price: 9.99,
        positive_reviews: positive,
        negative_reviews: negative,
        total_reviews: total,
        categories: vec!["Single-player".to_string()],
        tags: tags.iter().map(|s| s.to_string()).collect(),
    }
}

fn fixture_catalog() -> Vec<GameRecord> {
    vec![
        game(10, "Dragonreach", &["RPG", "Fantasy"], 90, 10, 100),
        game(20, "Ironsight", &["Fantasy"], 40, 60, 100),
        // A hidden gem: small sample, 95.8% positive
        game(30, "Caverns Below", &["Roguelike"], 115, 5, 120),
        // On the window boundary: total_reviews = 500 exactly
        game(40, "Skyharbor", &["Fantasy"], 480, 20, 500),
        // Too popular for the gems window
        game(50, "Arena Legends", &["MOBA"], 4800, 200, 5000),
    ]
}

fn create_test_server(store: FixtureStore, library: FixtureLibrary) -> TestServer {
    let state = AppState::new(Arc::new(store), Arc::new(library));
    let app = create_router(state);
    TestServer::new(app).unwrap()
}

fn default_server() -> TestServer {
    create_test_server(
        FixtureStore::new(fixture_catalog()).with_owned("alice", &[10]),
        FixtureLibrary {
            games: HashMap::from([(10, 600)]),
            fail: false,
        },
    )
}

#[tokio::test]
async fn test_health_check() {
    let server = default_server();
    let response = server.get("/health").await;
    response.assert_status_ok();

    let body: serde_json::Value = response.json();
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_recommend_excludes_owned_and_sorts_by_score() {
    let server = default_server();

    let response = server
        .get("/api/v1/recommend")
        .add_query_param("steamid", "alice")
        .await;
    response.assert_status_ok();

    let results: Vec<serde_json::Value> = response.json();
    assert_eq!(results.len(), 4);
    assert!(results.iter().all(|r| r["appid"] != 10));

    let scores: Vec<f64> = results.iter().map(|r| r["score"].as_f64().unwrap()).collect();
    let mut sorted = scores.clone();
    sorted.sort_by(|a, b| b.partial_cmp(a).unwrap());
    assert_eq!(scores, sorted);

    // Alice's profile is {RPG: 0.5, Fantasy: 0.5} over tags and
    // {Single-player: 1.0} over categories; every candidate shares the
    // category, and Ironsight additionally matches Fantasy
    let ironsight = results.iter().find(|r| r["appid"] == 20).unwrap();
    let expected = 0.40 * 1.0 + 0.50 * 0.5 + 0.10 * wilson_lower_bound(40, 60);
    let expected = (expected * 10_000.0).round() / 10_000.0;
    assert!((ironsight["score"].as_f64().unwrap() - expected).abs() < 1e-9);
}

#[tokio::test]
async fn test_recommend_respects_limit() {
    let server = default_server();

    let response = server
        .get("/api/v1/recommend")
        .add_query_param("steamid", "alice")
        .add_query_param("limit", "2")
        .await;
    response.assert_status_ok();

    let results: Vec<serde_json::Value> = response.json();
    assert_eq!(results.len(), 2);
}

#[tokio::test]
async fn test_recommend_without_steamid_is_rejected() {
    let server = default_server();

    let response = server.get("/api/v1/recommend").await;
    response.assert_status(axum::http::StatusCode::BAD_REQUEST);

    let body: serde_json::Value = response.json();
    assert!(body["error"].as_str().unwrap().contains("steamid"));
}

#[tokio::test]
async fn test_recommend_for_unknown_user_falls_back_to_review_confidence() {
    let server = default_server();

    let response = server
        .get("/api/v1/recommend")
        .add_query_param("steamid", "nobody")
        .await;
    response.assert_status_ok();

    // No owned games: nothing is excluded and the ranking follows review
    // confidence alone, so the best-reviewed game comes first
    let results: Vec<serde_json::Value> = response.json();
    assert_eq!(results.len(), 5);
    assert_eq!(results[0]["appid"], 50);
}

#[tokio::test]
async fn test_hidden_gems_applies_strict_window() {
    let server = default_server();

    let response = server
        .get("/api/v1/recommend/hidden-gems")
        .add_query_param("steamid", "alice")
        .await;
    response.assert_status_ok();

    let gems: Vec<serde_json::Value> = response.json();
    let appids: Vec<i64> = gems.iter().map(|g| g["appid"].as_i64().unwrap()).collect();

    // Only Caverns Below qualifies: Skyharbor sits exactly on the 500
    // boundary and Arena Legends is far too popular
    assert_eq!(appids, vec![30]);

    // Gems come back as full records, not the reduced recommendation shape
    assert!(gems[0]["categories"].is_array());
    assert!(gems[0]["total_reviews"].is_i64() || gems[0]["total_reviews"].is_u64());
}

#[tokio::test]
async fn test_hidden_gems_upstream_failure_maps_to_bad_gateway() {
    let server = create_test_server(
        FixtureStore::new(fixture_catalog()),
        FixtureLibrary {
            games: HashMap::new(),
            fail: true,
        },
    );

    let response = server
        .get("/api/v1/recommend/hidden-gems")
        .add_query_param("steamid", "alice")
        .await;
    response.assert_status(axum::http::StatusCode::BAD_GATEWAY);
}

#[tokio::test]
async fn test_hidden_gems_without_steamid_is_rejected() {
    let server = default_server();

    let response = server.get("/api/v1/recommend/hidden-gems").await;
    response.assert_status(axum::http::StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_sync_user_persists_library_and_resolves_names() {
    let server = create_test_server(
        FixtureStore::new(fixture_catalog()),
        FixtureLibrary {
            // 999 has no catalog record
            games: HashMap::from([(10, 600), (999, 30)]),
            fail: false,
        },
    );

    let response = server
        .post("/api/v1/sync_user")
        .json(&json!({ "steamid": "bob" }))
        .await;
    response.assert_status_ok();

    let body: serde_json::Value = response.json();
    assert_eq!(body["message"], "User library synchronized");
    assert_eq!(body["total_games"], 2);

    let owned = body["owned_games"].as_array().unwrap();
    assert_eq!(owned[0]["appid"], 10);
    assert_eq!(owned[0]["name"], "Dragonreach");
    assert_eq!(owned[1]["appid"], 999);
    assert_eq!(owned[1]["name"], "(Unknown Title)");

    // The synced library now drives recommendations: owned games excluded
    let response = server
        .get("/api/v1/recommend")
        .add_query_param("steamid", "bob")
        .await;
    response.assert_status_ok();
    let results: Vec<serde_json::Value> = response.json();
    assert!(results.iter().all(|r| r["appid"] != 10));
}

#[tokio::test]
async fn test_sync_user_with_blank_steamid_is_rejected() {
    let server = default_server();

    let response = server
        .post("/api/v1/sync_user")
        .json(&json!({ "steamid": "  " }))
        .await;
    response.assert_status(axum::http::StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_sync_user_upstream_failure_maps_to_bad_gateway() {
    let server = create_test_server(
        FixtureStore::new(fixture_catalog()),
        FixtureLibrary {
            games: HashMap::new(),
            fail: true,
        },
    );

    let response = server
        .post("/api/v1/sync_user")
        .json(&json!({ "steamid": "bob" }))
        .await;
    response.assert_status(axum::http::StatusCode::BAD_GATEWAY);
}

#[tokio::test]
async fn test_game_detail_lookup() {
    let server = default_server();

    let response = server.get("/api/v1/games/30").await;
    response.assert_status_ok();

    let body: serde_json::Value = response.json();
    assert_eq!(body["name"], "Caverns Below");
    assert_eq!(body["total_reviews"], 120);

    let response = server.get("/api/v1/games/12345").await;
    response.assert_status(axum::http::StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_catalog_reload_reports_snapshot_size() {
    let server = default_server();

    let response = server.post("/api/v1/catalog/reload").await;
    response.assert_status_ok();

    let body: serde_json::Value = response.json();
    assert_eq!(body["message"], "Catalog reloaded");
    assert_eq!(body["games"], 5);
}

#[tokio::test]
async fn test_request_id_header_is_attached() {
    let server = default_server();

    let response = server.get("/health").await;
    response.assert_status_ok();
    assert!(response.headers().get("x-request-id").is_some());
}
