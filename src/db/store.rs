use crate::{
    error::AppResult,
    models::{GameRecord, OwnedGame},
};
use sqlx::{Row, SqlitePool};
use std::collections::HashSet;

/// Storage collaborator for the catalog and the persisted ownership table.
///
/// The recommendation core only talks to storage through this trait, so the
/// ranking pipelines can be exercised against mocks without a database.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait GameStore: Send + Sync {
    /// Bulk read of the whole catalog with aggregated category/tag
    /// memberships per game. Feeds the in-memory catalog cache.
    async fn load_catalog(&self) -> AppResult<Vec<GameRecord>>;

    /// Single-game resolution by appid
    async fn get_game_detail(&self, appid: i64) -> AppResult<Option<GameRecord>>;

    /// The set of appids a user owns, from persisted ownership rows
    async fn get_owned_appids(&self, user_id: &str) -> AppResult<HashSet<i64>>;

    /// Upserts a freshly synced library for a user
    async fn save_owned_games(&self, user_id: &str, games: &[OwnedGame]) -> AppResult<()>;
}

const CATALOG_QUERY: &str = r#"
    SELECT
        g.appid,
        g.name,
        g.price,
        g.positive_reviews,
        g.negative_reviews,
        g.total_reviews,
        GROUP_CONCAT(DISTINCT c.name) AS categories,
        GROUP_CONCAT(DISTINCT t.name) AS tags
    FROM games g
    LEFT JOIN game_categories gc ON g.appid = gc.appid
    LEFT JOIN categories c ON gc.cid = c.id
    LEFT JOIN game_tags gt ON g.appid = gt.appid
    LEFT JOIN tags t ON gt.tid = t.id
    GROUP BY g.appid
"#;

const GAME_DETAIL_QUERY: &str = r#"
    SELECT
        g.appid,
        g.name,
        g.price,
        g.positive_reviews,
        g.negative_reviews,
        g.total_reviews,
        GROUP_CONCAT(DISTINCT c.name) AS categories,
        GROUP_CONCAT(DISTINCT t.name) AS tags
    FROM games g
    LEFT JOIN game_categories gc ON g.appid = gc.appid
    LEFT JOIN categories c ON gc.cid = c.id
    LEFT JOIN game_tags gt ON g.appid = gt.appid
    LEFT JOIN tags t ON gt.tid = t.id
    WHERE g.appid = ?
    GROUP BY g.appid
"#;

/// SQLite-backed implementation of [`GameStore`]
#[derive(Clone)]
pub struct SqliteGameStore {
    pool: SqlitePool,
}

impl SqliteGameStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Creates the ownership table if this is a fresh database
    pub async fn ensure_ownership_table(&self) -> AppResult<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS user_owned_games (
                user_id TEXT NOT NULL,
                appid INTEGER NOT NULL,
                playtime INTEGER DEFAULT 0,
                PRIMARY KEY (user_id, appid)
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    fn record_from_row(row: &sqlx::sqlite::SqliteRow) -> AppResult<GameRecord> {
        let categories: Option<String> = row.try_get("categories")?;
        let tags: Option<String> = row.try_get("tags")?;

        Ok(GameRecord {
            appid: row.try_get("appid")?,
            name: row.try_get::<Option<String>, _>("name")?.unwrap_or_default(),
            price: row.try_get::<Option<f64>, _>("price")?.unwrap_or(0.0),
            positive_reviews: row
                .try_get::<Option<i64>, _>("positive_reviews")?
                .unwrap_or(0),
            negative_reviews: row
                .try_get::<Option<i64>, _>("negative_reviews")?
                .unwrap_or(0),
            total_reviews: row.try_get::<Option<i64>, _>("total_reviews")?.unwrap_or(0),
            categories: split_membership(categories),
            tags: split_membership(tags),
        })
    }
}

/// Splits a GROUP_CONCAT aggregate into member names; NULL means no rows
/// joined and yields an empty set.
fn split_membership(concatenated: Option<String>) -> Vec<String> {
    match concatenated {
        Some(joined) if !joined.is_empty() => joined.split(',').map(str::to_string).collect(),
        _ => Vec::new(),
    }
}

#[async_trait::async_trait]
impl GameStore for SqliteGameStore {
    async fn load_catalog(&self) -> AppResult<Vec<GameRecord>> {
        let rows = sqlx::query(CATALOG_QUERY).fetch_all(&self.pool).await?;

        let mut games = Vec::with_capacity(rows.len());
        for row in &rows {
            games.push(Self::record_from_row(row)?);
        }

        tracing::debug!(games = games.len(), "Catalog read from storage");

        Ok(games)
    }

    async fn get_game_detail(&self, appid: i64) -> AppResult<Option<GameRecord>> {
        let row = sqlx::query(GAME_DETAIL_QUERY)
            .bind(appid)
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => Ok(Some(Self::record_from_row(&row)?)),
            None => Ok(None),
        }
    }

    async fn get_owned_appids(&self, user_id: &str) -> AppResult<HashSet<i64>> {
        let rows = sqlx::query("SELECT appid FROM user_owned_games WHERE user_id = ?")
            .bind(user_id)
            .fetch_all(&self.pool)
            .await?;

        let mut owned = HashSet::with_capacity(rows.len());
        for row in &rows {
            owned.insert(row.try_get::<i64, _>("appid")?);
        }

        Ok(owned)
    }

    async fn save_owned_games(&self, user_id: &str, games: &[OwnedGame]) -> AppResult<()> {
        let mut tx = self.pool.begin().await?;

        for game in games {
            sqlx::query(
                r#"
                INSERT OR REPLACE INTO user_owned_games (user_id, appid, playtime)
                VALUES (?, ?, ?)
                "#,
            )
            .bind(user_id)
            .bind(game.appid)
            .bind(game.playtime_minutes)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        tracing::info!(user_id, games = games.len(), "Owned games persisted");

        Ok(())
    }
}
