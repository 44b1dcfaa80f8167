use crate::{
    error::{AppError, AppResult},
    models::{OwnedLibrary, SteamOwnedGamesEnvelope},
    services::providers::LibraryProvider,
};
use redis::{AsyncCommands, Client as RedisClient};
use reqwest::Client as HttpClient;

/// How long a fetched library stays valid in Redis
const LIBRARY_CACHE_TTL: u64 = 3600; // 1 hour in seconds

/// Steam Web API implementation of [`LibraryProvider`]
///
/// Calls IPlayerService/GetOwnedGames and caches the flattened library in
/// Redis so repeated ranking requests for the same user do not hammer the
/// upstream.
pub struct SteamLibraryProvider {
    http_client: HttpClient,
    redis_client: RedisClient,
    api_key: String,
    api_url: String,
}

impl SteamLibraryProvider {
    pub fn new(redis_client: RedisClient, api_key: String, api_url: String) -> Self {
        Self {
            http_client: HttpClient::new(),
            redis_client,
            api_key,
            api_url,
        }
    }

    fn cache_key(steam_id: &str) -> String {
        format!("library:{}", steam_id)
    }

    /// Attempts to retrieve a cached library from Redis
    async fn get_from_redis(&self, steam_id: &str) -> AppResult<Option<OwnedLibrary>> {
        let mut conn = self.redis_client.get_multiplexed_async_connection().await?;

        let cached: Option<String> = conn.get(Self::cache_key(steam_id)).await.map_err(|e| {
            tracing::warn!(error = %e, "Redis get failed");
            e
        })?;

        match cached {
            Some(json) => {
                let library: OwnedLibrary = serde_json::from_str(&json).map_err(|e| {
                    AppError::Internal(format!("Cache deserialization error: {}", e))
                })?;
                Ok(Some(library))
            }
            None => Ok(None),
        }
    }

    /// Stores a fetched library in Redis
    async fn store_in_redis(&self, library: &OwnedLibrary) -> AppResult<()> {
        let json = serde_json::to_string(library)
            .map_err(|e| AppError::Internal(format!("Cache serialization error: {}", e)))?;

        let mut conn = self.redis_client.get_multiplexed_async_connection().await?;

        let _: () = conn
            .set_ex(Self::cache_key(&library.steam_id), json, LIBRARY_CACHE_TTL)
            .await
            .map_err(|e| {
                tracing::warn!(error = %e, "Redis set failed");
                e
            })?;

        tracing::debug!(
            steam_id = %library.steam_id,
            ttl = LIBRARY_CACHE_TTL,
            "Cached owned library"
        );

        Ok(())
    }

    /// Calls the Steam Web API for the user's owned games
    async fn call_api(&self, steam_id: &str) -> AppResult<OwnedLibrary> {
        let url = format!("{}/IPlayerService/GetOwnedGames/v0001/", self.api_url);

        tracing::debug!(steam_id = %steam_id, "Fetching owned games from Steam");

        let response = self
            .http_client
            .get(&url)
            .query(&[
                ("key", self.api_key.as_str()),
                ("steamid", steam_id),
                ("include_played_free_games", "true"),
            ])
            .send()
            .await
            .map_err(|e| AppError::UpstreamUnavailable(format!("Steam API request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            tracing::error!(
                steam_id = %steam_id,
                status = %status,
                "Steam API request failed"
            );
            return Err(AppError::UpstreamUnavailable(format!(
                "Steam API returned status {}",
                status
            )));
        }

        let envelope: SteamOwnedGamesEnvelope = response
            .json()
            .await
            .map_err(|e| AppError::UpstreamUnavailable(format!("Steam API payload unreadable: {}", e)))?;

        // Steam returns an empty envelope for private profiles and unknown
        // ids; that is an unusable answer, not an empty library
        let payload = envelope.response.ok_or_else(|| {
            AppError::UpstreamUnavailable("Steam API response missing payload".to_string())
        })?;

        let games = payload.into_playtime_map();

        tracing::info!(
            steam_id = %steam_id,
            games = games.len(),
            "Fetched owned games from Steam"
        );

        Ok(OwnedLibrary::new(steam_id.to_string(), games))
    }
}

#[async_trait::async_trait]
impl LibraryProvider for SteamLibraryProvider {
    async fn fetch_owned_games(&self, steam_id: &str) -> AppResult<OwnedLibrary> {
        if let Some(cached) = self.get_from_redis(steam_id).await? {
            tracing::debug!(steam_id = %steam_id, "Library cache hit");
            return Ok(cached);
        }

        tracing::debug!(steam_id = %steam_id, "Library cache miss");

        let library = self.call_api(steam_id).await?;
        self.store_in_redis(&library).await?;

        Ok(library)
    }

    fn name(&self) -> &'static str {
        "steam-web-api"
    }
}
