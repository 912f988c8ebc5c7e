use serde::Serialize;
use tracing::{debug, warn};

use crate::sleeper::models::{Matchup, Roster};
use crate::sleeper::{FetchError, LeagueProvider};

const AVATAR_BASE_URL: &str = "https://sleepercdn.com/uploads";

/// The lowest-scoring team of a week.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct WeeklyLoser {
    pub week: u32,
    pub roster_id: u32,
    pub user_id: String,
    pub name: String,
    pub avatar_url: Option<String>,
    pub points: f64,
}

/// Lowest-scoring matchup entry. On equal points the later entry wins.
pub fn lowest_scorer(matchups: &[Matchup]) -> Option<&Matchup> {
    matchups.iter().fold(None, |low: Option<&Matchup>, m| match low {
        Some(current) if current.points() < m.points() => Some(current),
        _ => Some(m),
    })
}

pub fn avatar_url(avatar: &str) -> String {
    format!("{}/{}", AVATAR_BASE_URL, avatar)
}

/// Find the week's loser and resolve it to its owner.
///
/// Returns `Ok(None)` when the week has no matchups or the losing roster has
/// no owner.
pub async fn find_weekly_loser(
    provider: &dyn LeagueProvider,
    week: u32,
    matchups: &[Matchup],
    rosters: &[Roster],
) -> Result<Option<WeeklyLoser>, FetchError> {
    let Some(low) = lowest_scorer(matchups) else {
        debug!("No matchups for week {}, no loser yet", week);
        return Ok(None);
    };

    let owner_id = rosters
        .iter()
        .find(|r| r.roster_id == low.roster_id)
        .and_then(|r| r.owner_id.clone());
    let Some(owner_id) = owner_id else {
        warn!("Lowest-scoring roster {} has no owner", low.roster_id);
        return Ok(None);
    };

    let user = provider.user(&owner_id).await?;
    Ok(Some(WeeklyLoser {
        week,
        roster_id: low.roster_id,
        user_id: owner_id,
        name: user.name().to_string(),
        avatar_url: user.avatar.as_deref().map(avatar_url),
        points: low.points(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sleeper::testing::{matchup, roster, user, FakeLeague};

    #[test]
    fn test_lowest_scorer_picks_minimum() {
        let matchups = vec![matchup(1, 1, 110.0), matchup(2, 1, 64.2), matchup(3, 2, 98.0)];
        assert_eq!(lowest_scorer(&matchups).unwrap().roster_id, 2);
    }

    #[test]
    fn test_lowest_scorer_tie_takes_last() {
        let matchups = vec![matchup(1, 1, 70.0), matchup(2, 1, 70.0), matchup(3, 2, 98.0)];
        assert_eq!(lowest_scorer(&matchups).unwrap().roster_id, 2);
    }

    #[test]
    fn test_lowest_scorer_empty() {
        assert!(lowest_scorer(&[]).is_none());
    }

    #[tokio::test]
    async fn test_find_weekly_loser_resolves_owner() {
        let fake = FakeLeague {
            users: vec![user("u1", "Alice"), user("u2", "Bob")],
            ..Default::default()
        };
        let rosters = vec![roster(1, "u1", 1, 0, 0), roster(2, "u2", 0, 1, 0)];
        let matchups = vec![matchup(1, 1, 120.0), matchup(2, 1, 80.5)];

        let loser = find_weekly_loser(&fake, 3, &matchups, &rosters)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(loser.name, "Bob");
        assert_eq!(loser.week, 3);
        assert_eq!(loser.points, 80.5);
        assert_eq!(
            loser.avatar_url.as_deref(),
            Some("https://sleepercdn.com/uploads/avatar-u2")
        );
    }

    #[tokio::test]
    async fn test_orphan_roster_has_no_loser() {
        let fake = FakeLeague::default();
        let mut orphan = roster(1, "x", 0, 1, 0);
        orphan.owner_id = None;
        let loser = find_weekly_loser(&fake, 1, &[matchup(1, 1, 50.0)], &[orphan])
            .await
            .unwrap();
        assert!(loser.is_none());
    }

    #[tokio::test]
    async fn test_unknown_owner_propagates_fetch_error() {
        let fake = FakeLeague::default();
        let rosters = vec![roster(1, "missing", 0, 1, 0)];
        let err = find_weekly_loser(&fake, 1, &[matchup(1, 1, 50.0)], &rosters).await;
        assert!(err.is_err());
    }
}
