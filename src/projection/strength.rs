use std::collections::HashMap;

use crate::sleeper::models::{Roster, WeekMatchups};

/// Per-roster scoring rate: points over played weeks divided by games played.
///
/// A roster with no games played has an undefined strength, stored as `None`.
/// [`StrengthTable::get`] reads undefined (and unknown) strengths as `0.0` so
/// the projection never sees NaN.
#[derive(Debug, Clone, Default)]
pub struct StrengthTable {
    /// Insertion order of `by_roster` keys, matching the roster list
    order: Vec<u32>,
    by_roster: HashMap<u32, Option<f64>>,
}

impl StrengthTable {
    pub fn raw(&self, roster_id: u32) -> Option<f64> {
        self.by_roster.get(&roster_id).copied().flatten()
    }

    pub fn get(&self, roster_id: u32) -> f64 {
        self.raw(roster_id).unwrap_or(0.0)
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Unweighted mean over every roster, undefined strengths counting as zero.
    pub fn league_average(&self) -> f64 {
        if self.is_empty() {
            return 0.0;
        }
        let total: f64 = self.order.iter().map(|id| self.get(*id)).sum();
        total / self.order.len() as f64
    }

    pub fn max(&self) -> f64 {
        self.order
            .iter()
            .map(|id| self.get(*id))
            .fold(0.0, f64::max)
    }
}

/// Strength of a single roster: `None` when it has not played a game.
pub fn roster_strength(roster: &Roster, weeks: &[WeekMatchups], through_week: u32) -> Option<f64> {
    let games = roster.games_played();
    if games == 0 {
        return None;
    }
    let total_points: f64 = weeks
        .iter()
        .filter(|w| w.week <= through_week)
        .filter_map(|w| w.find(roster.roster_id))
        .map(|m| m.points())
        .sum();
    Some(total_points / games as f64)
}

/// Strengths for every roster using weeks up to and including `through_week`.
pub fn team_strengths(rosters: &[Roster], weeks: &[WeekMatchups], through_week: u32) -> StrengthTable {
    let mut table = StrengthTable::default();
    for roster in rosters {
        if table
            .by_roster
            .insert(roster.roster_id, roster_strength(roster, weeks, through_week))
            .is_none()
        {
            table.order.push(roster.roster_id);
        }
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sleeper::testing::{matchup, roster};
    use approx::assert_relative_eq;

    fn weeks() -> Vec<WeekMatchups> {
        vec![
            WeekMatchups {
                week: 1,
                matchups: vec![matchup(1, 1, 120.0), matchup(2, 1, 80.0)],
            },
            WeekMatchups {
                week: 2,
                matchups: vec![matchup(1, 1, 100.0), matchup(2, 1, 110.0)],
            },
            WeekMatchups {
                week: 3,
                matchups: vec![matchup(1, 1, 500.0), matchup(2, 1, 500.0)],
            },
        ]
    }

    #[test]
    fn test_strength_is_points_per_game() {
        let rosters = vec![roster(1, "a", 1, 1, 0), roster(2, "b", 1, 1, 0)];
        let table = team_strengths(&rosters, &weeks(), 2);
        assert_relative_eq!(table.get(1), 110.0, epsilon = 1e-9);
        assert_relative_eq!(table.get(2), 95.0, epsilon = 1e-9);
        assert_relative_eq!(table.league_average(), 102.5, epsilon = 1e-9);
        assert_relative_eq!(table.max(), 110.0, epsilon = 1e-9);
    }

    #[test]
    fn test_ties_count_as_games() {
        let rosters = vec![roster(1, "a", 1, 0, 1)];
        let table = team_strengths(&rosters, &weeks(), 2);
        assert_relative_eq!(table.get(1), 110.0, epsilon = 1e-9);
    }

    #[test]
    fn test_zero_games_is_undefined_but_reads_as_zero() {
        let rosters = vec![roster(1, "a", 0, 0, 0), roster(2, "b", 2, 0, 0)];
        let table = team_strengths(&rosters, &weeks(), 2);
        assert!(table.raw(1).is_none());
        assert_eq!(table.get(1), 0.0);
        assert!(!table.get(1).is_nan());
        // Undefined strengths count as zero in the average
        assert_relative_eq!(table.league_average(), 47.5, epsilon = 1e-9);
    }

    #[test]
    fn test_unknown_roster_reads_as_zero() {
        let table = team_strengths(&[], &weeks(), 2);
        assert!(table.is_empty());
        assert_eq!(table.get(9), 0.0);
        assert_eq!(table.league_average(), 0.0);
        assert_eq!(table.max(), 0.0);
    }

    #[test]
    fn test_missing_week_contributes_nothing() {
        let rosters = vec![roster(3, "c", 2, 0, 0)];
        let table = team_strengths(&rosters, &weeks(), 2);
        assert_eq!(table.get(3), 0.0);
        assert!(table.raw(3).is_some());
    }
}
