use std::collections::HashMap;

use serde::Serialize;

use crate::sleeper::models::{Roster, User};

pub const DEFAULT_EMOJI: &str = "🏃";

/// Pulls every runner toward the finish line so mid-season standings still
/// spread across the track.
const PROGRESSION_FACTOR: f64 = 1.5;

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Runner {
    pub name: String,
    pub wins: u32,
    pub emoji: String,
    /// Position along the track, 0.0 (start) to 1.0 (finish line)
    pub progress: f64,
}

pub fn track_progress(wins: u32, season_weeks: u32) -> f64 {
    if season_weeks == 0 {
        return 0.0;
    }
    (wins as f64 / season_weeks as f64 * PROGRESSION_FACTOR).min(1.0)
}

/// One runner per league user, most wins first.
///
/// `emojis` is keyed by lower-cased display name.
pub fn race_standings(
    users: &[User],
    rosters: &[Roster],
    emojis: &HashMap<String, String>,
    season_weeks: u32,
) -> Vec<Runner> {
    let mut runners: Vec<Runner> = users
        .iter()
        .map(|user| {
            let wins = rosters
                .iter()
                .find(|r| r.owner_id.as_deref() == Some(user.user_id.as_str()))
                .map(|r| r.settings.wins)
                .unwrap_or(0);
            let name = user.name().to_string();
            let emoji = emojis
                .get(&name.to_lowercase())
                .cloned()
                .unwrap_or_else(|| DEFAULT_EMOJI.to_string());
            Runner {
                progress: track_progress(wins, season_weeks),
                name,
                wins,
                emoji,
            }
        })
        .collect();

    runners.sort_by(|a, b| b.wins.cmp(&a.wins));
    runners
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sleeper::testing::{roster, user};
    use approx::assert_relative_eq;

    fn league() -> (Vec<User>, Vec<Roster>) {
        (
            vec![
                user("u1", "RockThomas"),
                user("u2", "Bob"),
                user("u3", "NoRoster"),
                user("u4", "Carol"),
            ],
            vec![
                roster(1, "u1", 3, 2, 0),
                roster(2, "u2", 5, 0, 0),
                roster(4, "u4", 3, 2, 0),
            ],
        )
    }

    #[test]
    fn test_progress_is_capped_at_finish_line() {
        assert_relative_eq!(track_progress(0, 17), 0.0);
        assert_relative_eq!(track_progress(5, 17), 5.0 / 17.0 * 1.5, epsilon = 1e-9);
        assert_relative_eq!(track_progress(14, 17), 1.0);
        assert_relative_eq!(track_progress(3, 0), 0.0);
    }

    #[test]
    fn test_race_sorted_by_wins_with_stable_ties() {
        let emojis = HashMap::from([("rockthomas".to_string(), "🪨".to_string())]);
        let (users, rosters) = league();
        let runners = race_standings(&users, &rosters, &emojis, 17);
        let names: Vec<&str> = runners.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Bob", "RockThomas", "Carol", "NoRoster"]);
        assert_eq!(runners[1].emoji, "🪨");
        assert_eq!(runners[0].emoji, DEFAULT_EMOJI);
        assert_eq!(runners[3].wins, 0);
    }
}
