//! Season projection: strength → schedule strength → projected wins → odds.
//!
//! Everything here is a best-effort heuristic recomputed from a fresh
//! [`LeagueSnapshot`] on every refresh.

pub mod schedule;
pub mod standings;
pub mod strength;
pub mod win_model;

pub use standings::TeamOdds;

use tracing::debug;

use crate::sleeper::LeagueSnapshot;
use schedule::schedule_strengths;
use standings::{division_of, rank_teams, ProjectedTeam};
use strength::team_strengths;
use win_model::project_wins;

/// Fixed season parameters. Deliberately not derived from league settings.
#[derive(Debug, Clone, Copy)]
pub struct SeasonParams {
    pub total_regular_season_weeks: u32,
    pub playoff_spots_per_division: u32,
}

impl Default for SeasonParams {
    fn default() -> Self {
        SeasonParams {
            total_regular_season_weeks: 14,
            playoff_spots_per_division: 3,
        }
    }
}

/// Build the full leaderboard for a snapshot, sorted by playoff chance.
pub fn project_season(snapshot: &LeagueSnapshot, params: SeasonParams) -> Vec<TeamOdds> {
    let current_week = snapshot.current_week;
    let divisions = snapshot.league.division_count();
    let team_count = snapshot.users.len();

    let strengths = team_strengths(&snapshot.rosters, &snapshot.weeks, current_week);
    let league_average = strengths.league_average();
    let max_strength = strengths.max();
    let schedule = schedule_strengths(&snapshot.rosters, &snapshot.weeks, current_week, &strengths);

    debug!(
        "Projecting {} teams: week {}, {} division(s), league average strength {:.2}, max {:.2}",
        team_count, current_week, divisions, league_average, max_strength
    );

    let relative = |value: f64| {
        if max_strength > 0.0 {
            value / max_strength
        } else {
            0.0
        }
    };

    let teams: Vec<ProjectedTeam> = snapshot
        .users
        .iter()
        .enumerate()
        .map(|(index, user)| {
            let division = division_of(index, team_count, divisions);
            match snapshot.roster_for(&user.user_id) {
                Some(roster) => {
                    let strength = strengths.get(roster.roster_id);
                    let schedule_strength = schedule.get(&roster.roster_id).copied().unwrap_or(0.0);
                    ProjectedTeam {
                        user_id: user.user_id.clone(),
                        name: user.name().to_string(),
                        roster_id: Some(roster.roster_id),
                        division,
                        wins: roster.settings.wins,
                        losses: roster.settings.losses,
                        ties: roster.settings.ties,
                        points_for: roster.settings.points_for(),
                        strength,
                        relative_strength: relative(strength),
                        relative_schedule_strength: relative(schedule_strength),
                        schedule_strength,
                        projection: Some(project_wins(
                            roster.settings.wins,
                            strength,
                            league_average,
                            params.total_regular_season_weeks,
                            current_week,
                        )),
                    }
                }
                None => ProjectedTeam {
                    user_id: user.user_id.clone(),
                    name: user.name().to_string(),
                    roster_id: None,
                    division,
                    wins: 0,
                    losses: 0,
                    ties: 0,
                    points_for: 0.0,
                    strength: 0.0,
                    relative_strength: 0.0,
                    relative_schedule_strength: 0.0,
                    schedule_strength: 0.0,
                    projection: None,
                },
            }
        })
        .collect();

    rank_teams(&teams, params.playoff_spots_per_division, divisions)
}
