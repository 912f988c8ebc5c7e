use std::collections::HashMap;

use super::strength::StrengthTable;
use crate::sleeper::models::{Roster, WeekMatchups};

/// Mean strength of the opponents a roster still has to face.
///
/// Only weeks at or after `from_week` count. An opponent is resolvable when it
/// shares the roster's matchup id that week and has a defined strength.
/// Rosters with no resolvable opponents get `0.0`.
pub fn schedule_strength(
    roster_id: u32,
    weeks: &[WeekMatchups],
    from_week: u32,
    strengths: &StrengthTable,
) -> f64 {
    let opponents: Vec<f64> = weeks
        .iter()
        .filter(|w| w.week >= from_week)
        .filter_map(|w| w.opponent_of(roster_id))
        .filter_map(|opponent| strengths.raw(opponent))
        .collect();

    if opponents.is_empty() {
        0.0
    } else {
        opponents.iter().sum::<f64>() / opponents.len() as f64
    }
}

pub fn schedule_strengths(
    rosters: &[Roster],
    weeks: &[WeekMatchups],
    from_week: u32,
    strengths: &StrengthTable,
) -> HashMap<u32, f64> {
    rosters
        .iter()
        .map(|r| {
            (
                r.roster_id,
                schedule_strength(r.roster_id, weeks, from_week, strengths),
            )
        })
        .collect()
}
