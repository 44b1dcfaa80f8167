use crate::{
    db::GameStore,
    error::{AppError, AppResult},
    models::GameRecord,
};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};

/// An immutable, fully-built view of the catalog.
///
/// Every read within one snapshot generation sees the same records, so a
/// ranking request that resolves a game twice cannot observe two different
/// category/tag sets.
#[derive(Debug)]
pub struct CatalogSnapshot {
    games: Vec<GameRecord>,
    by_appid: HashMap<i64, usize>,
}

impl CatalogSnapshot {
    pub(crate) fn new(games: Vec<GameRecord>) -> Self {
        let by_appid = games
            .iter()
            .enumerate()
            .map(|(index, game)| (game.appid, index))
            .collect();

        Self { games, by_appid }
    }

    pub fn games(&self) -> &[GameRecord] {
        &self.games
    }

    pub fn get(&self, appid: i64) -> Option<&GameRecord> {
        self.by_appid.get(&appid).map(|&index| &self.games[index])
    }

    pub fn len(&self) -> usize {
        self.games.len()
    }

    pub fn is_empty(&self) -> bool {
        self.games.is_empty()
    }
}

/// Lazily-populated, process-lifetime cache of the whole catalog.
///
/// The first request triggers a full load from storage; everyone after that
/// shares the same snapshot until `reload` is called. Loads are claimed
/// through an async mutex so concurrent first access runs the storage query
/// exactly once, and a failed load leaves the cache unpopulated so the next
/// request retries instead of serving a cached failure.
pub struct CatalogCache {
    store: Arc<dyn GameStore>,
    snapshot: RwLock<Option<Arc<CatalogSnapshot>>>,
    load_guard: Mutex<()>,
}

impl CatalogCache {
    pub fn new(store: Arc<dyn GameStore>) -> Self {
        Self {
            store,
            snapshot: RwLock::new(None),
            load_guard: Mutex::new(()),
        }
    }

    /// Returns the current snapshot, loading it on first use
    pub async fn snapshot(&self) -> AppResult<Arc<CatalogSnapshot>> {
        if let Some(snapshot) = self.snapshot.read().await.as_ref() {
            return Ok(Arc::clone(snapshot));
        }

        let _claim = self.load_guard.lock().await;

        // Another caller may have finished the load while we waited
        if let Some(snapshot) = self.snapshot.read().await.as_ref() {
            return Ok(Arc::clone(snapshot));
        }

        let snapshot = self.load().await?;
        *self.snapshot.write().await = Some(Arc::clone(&snapshot));

        Ok(snapshot)
    }

    /// Replaces the snapshot with a fresh load from storage.
    ///
    /// Serialized against concurrent loads; readers keep whatever snapshot
    /// they already hold and new readers see the old generation until the
    /// swap, never a mix. On failure the previous snapshot stays in place.
    pub async fn reload(&self) -> AppResult<Arc<CatalogSnapshot>> {
        let _claim = self.load_guard.lock().await;

        let snapshot = self.load().await?;
        *self.snapshot.write().await = Some(Arc::clone(&snapshot));

        tracing::info!(games = snapshot.len(), "Catalog cache reloaded");

        Ok(snapshot)
    }

    async fn load(&self) -> AppResult<Arc<CatalogSnapshot>> {
        let games = self
            .store
            .load_catalog()
            .await
            .map_err(|e| AppError::DataUnavailable(e.to_string()))?;

        tracing::info!(games = games.len(), "Catalog cache populated");

        Ok(Arc::new(CatalogSnapshot::new(games)))
    }
}
