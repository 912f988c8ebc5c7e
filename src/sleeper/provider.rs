use async_trait::async_trait;

use super::client::FetchError;
use super::models::{League, Matchup, Roster, ScheduleMatchup, User};

/// Read-only source of league data.
#[async_trait]
pub trait LeagueProvider: Send + Sync {
    async fn users(&self) -> Result<Vec<User>, FetchError>;

    async fn rosters(&self) -> Result<Vec<Roster>, FetchError>;

    async fn league(&self) -> Result<League, FetchError>;

    async fn matchups(&self, week: u32) -> Result<Vec<Matchup>, FetchError>;

    async fn user(&self, user_id: &str) -> Result<User, FetchError>;

    async fn schedule(&self) -> Result<Vec<ScheduleMatchup>, FetchError>;

    /// Human-readable name for logging.
    fn name(&self) -> &str;
}
