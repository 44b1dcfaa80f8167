use std::sync::Arc;

use curator_api::{
    config::Config,
    db::{self, SqliteGameStore},
    routes::{create_router, AppState},
    services::providers::SteamLibraryProvider,
};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("curator_api=debug,tower_http=info")),
        )
        .init();

    let config = Config::from_env()?;

    let db_pool = db::create_pool(&config.database_url).await?;
    let store = Arc::new(SqliteGameStore::new(db_pool));
    store.ensure_ownership_table().await?;

    let redis_client = redis::Client::open(config.redis_url.clone())?;
    let library = Arc::new(SteamLibraryProvider::new(
        redis_client,
        config.steam_api_key.clone(),
        config.steam_api_url.clone(),
    ));

    let state = AppState::new(store, library);
    let app = create_router(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(%addr, "curator-api listening");
    axum::serve(listener, app).await?;

    Ok(())
}
