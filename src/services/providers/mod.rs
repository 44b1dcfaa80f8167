/// User-library provider abstraction
///
/// The ranking pipelines only need "which games does this user own, and for
/// how long have they played them". Where that answer comes from (Steam Web
/// API today) is a provider concern behind this trait.
use crate::{error::AppResult, models::OwnedLibrary};

pub mod steam;

pub use steam::SteamLibraryProvider;

#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait LibraryProvider: Send + Sync {
    /// Fetches a user's owned games with lifetime playtime in minutes.
    ///
    /// An empty library is a valid successful result. Failure to reach the
    /// upstream (or an unusable payload) is an error, never an empty map.
    async fn fetch_owned_games(&self, steam_id: &str) -> AppResult<OwnedLibrary>;

    /// Provider name for logging and debugging
    fn name(&self) -> &'static str;
}
