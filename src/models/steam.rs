use serde::Deserialize;
use std::collections::HashMap;

// ============================================================================
// Steam Web API Types
// ============================================================================

/// Raw envelope returned by IPlayerService/GetOwnedGames/v0001
///
/// Steam wraps the payload in a `response` object which is empty (or absent)
/// for private profiles and unknown ids.
#[derive(Debug, Clone, Deserialize)]
pub struct SteamOwnedGamesEnvelope {
    #[serde(default)]
    pub response: Option<SteamOwnedGamesResponse>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SteamOwnedGamesResponse {
    #[serde(default)]
    pub game_count: Option<u32>,
    #[serde(default)]
    pub games: Option<Vec<SteamOwnedGame>>,
}

/// A single owned game as reported by Steam
#[derive(Debug, Clone, Deserialize)]
pub struct SteamOwnedGame {
    pub appid: i64,
    /// Lifetime playtime in minutes
    #[serde(default)]
    pub playtime_forever: Option<i64>,
}

impl SteamOwnedGamesResponse {
    /// Flattens the payload into an appid -> playtime-minutes mapping
    pub fn into_playtime_map(self) -> HashMap<i64, i64> {
        self.games
            .unwrap_or_default()
            .into_iter()
            .map(|g| (g.appid, g.playtime_forever.unwrap_or(0)))
            .collect()
    }
}
