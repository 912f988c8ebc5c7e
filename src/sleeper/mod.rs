pub mod client;
pub mod models;
pub mod provider;
pub mod season;

pub use client::{FetchError, SleeperClient};
pub use models::{LeagueSnapshot, WeekMatchups};
pub use provider::LeagueProvider;

use futures_util::future::try_join_all;
use tracing::info;

/// Fetch users, rosters, league info and matchups for weeks `1..=last_week`
/// concurrently, joining everything before returning.
///
/// `current_week` is recorded on the snapshot; `last_week` may run past it when
/// future pairings are wanted for schedule strength. Any single failure fails
/// the whole snapshot.
pub async fn fetch_snapshot(
    provider: &dyn LeagueProvider,
    current_week: u32,
    last_week: u32,
) -> Result<LeagueSnapshot, FetchError> {
    let last_week = last_week.max(current_week).max(1);

    let week_futures = (1..=last_week).map(|week| async move {
        provider
            .matchups(week)
            .await
            .map(|matchups| WeekMatchups { week, matchups })
    });

    let (users, rosters, league, weeks) = tokio::try_join!(
        provider.users(),
        provider.rosters(),
        provider.league(),
        try_join_all(week_futures),
    )?;

    info!(
        "Fetched league snapshot from {}: {} users, {} rosters, {} week(s), current week {}",
        provider.name(),
        users.len(),
        rosters.len(),
        weeks.len(),
        current_week
    );

    Ok(LeagueSnapshot {
        users,
        rosters,
        league,
        weeks,
        current_week,
    })
}
