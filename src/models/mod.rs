mod game;
mod profile;
mod steam;

pub use game::{GameRecord, OwnedGame, OwnedLibrary, Recommendation};
pub use profile::UserProfile;
pub use steam::{SteamOwnedGame, SteamOwnedGamesEnvelope, SteamOwnedGamesResponse};
