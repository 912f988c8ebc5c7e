use std::cmp::Ordering;
use std::collections::BTreeMap;

use serde::Serialize;

use super::win_model::WinProjection;

/// Per-team projection inputs for the ranker, in league user order.
#[derive(Debug, Clone)]
pub struct ProjectedTeam {
    pub user_id: String,
    pub name: String,
    /// `None` when the user has no roster; such rows rank with zero chances
    pub roster_id: Option<u32>,
    pub division: u32,
    pub wins: u32,
    pub losses: u32,
    pub ties: u32,
    /// Cumulative points scored this season
    pub points_for: f64,
    pub strength: f64,
    /// Strength over the strongest team in the league
    pub relative_strength: f64,
    /// Schedule strength over the strongest team in the league
    pub relative_schedule_strength: f64,
    pub schedule_strength: f64,
    pub projection: Option<WinProjection>,
}

impl ProjectedTeam {
    fn projected_wins(&self) -> f64 {
        self.projection.map(|p| p.projected_wins).unwrap_or(0.0)
    }
}

/// One leaderboard row.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct TeamOdds {
    pub user_id: String,
    pub name: String,
    pub roster_id: Option<u32>,
    pub division: u32,
    pub division_rank: u32,
    pub wins: u32,
    pub losses: u32,
    pub ties: u32,
    pub points_for: f64,
    pub strength: f64,
    pub schedule_strength: f64,
    pub projected_wins: f64,
    /// Percent, 2 decimal places
    pub playoff_chance: f64,
    /// Percent, 2 decimal places
    pub championship_chance: f64,
    pub perceived_strength: f64,
}

/// 1-based division for the team at `index` when `team_count` teams are cut
/// into `divisions` contiguous, equally sized index ranges.
pub fn division_of(index: usize, team_count: usize, divisions: u32) -> u32 {
    if team_count == 0 {
        return 1;
    }
    let divisions = divisions.max(1) as usize;
    (index * divisions / team_count) as u32 + 1
}

/// Rank-based playoff chance before the win-rate penalty.
pub fn base_playoff_chance(rank: u32, playoff_spots_per_division: u32) -> f64 {
    if rank <= playoff_spots_per_division {
        100.0 - (rank.saturating_sub(1)) as f64 * 10.0
    } else {
        (70.0 - (rank - playoff_spots_per_division) as f64 * 20.0).max(0.0)
    }
}

pub fn round2(value: f64) -> f64 {
    if !value.is_finite() {
        return 0.0;
    }
    (value * 100.0).round() / 100.0
}

/// Division rank for each team (same order as `teams`), by descending
/// projected wins. Equal projections keep input order.
pub fn division_ranks(teams: &[ProjectedTeam]) -> Vec<u32> {
    let mut by_division: BTreeMap<u32, Vec<usize>> = BTreeMap::new();
    for (i, team) in teams.iter().enumerate() {
        by_division.entry(team.division).or_default().push(i);
    }

    let mut ranks = vec![0; teams.len()];
    for members in by_division.values_mut() {
        members.sort_by(|a, b| {
            teams[*b]
                .projected_wins()
                .total_cmp(&teams[*a].projected_wins())
        });
        for (pos, idx) in members.iter().enumerate() {
            ranks[*idx] = pos as u32 + 1;
        }
    }
    ranks
}

/// Stable sort, highest playoff chance first.
pub fn sort_by_playoff_chance(rows: &mut [TeamOdds]) {
    rows.sort_by(|a, b| {
        b.playoff_chance
            .partial_cmp(&a.playoff_chance)
            .unwrap_or(Ordering::Equal)
    });
}

/// Turn projections into the final leaderboard.
pub fn rank_teams(
    teams: &[ProjectedTeam],
    playoff_spots_per_division: u32,
    divisions: u32,
) -> Vec<TeamOdds> {
    let ranks = division_ranks(teams);
    let divisions = divisions.max(1) as f64;

    let mut rows: Vec<TeamOdds> = teams
        .iter()
        .zip(ranks)
        .map(|(team, rank)| {
            let (playoff, championship, perceived) = match (team.roster_id, team.projection) {
                (Some(_), Some(projection)) => {
                    let playoff = base_playoff_chance(rank, playoff_spots_per_division)
                        * projection.final_win_rate;
                    let championship =
                        playoff * team.relative_strength.powi(2) / divisions;
                    let perceived = team.relative_strength * 50.0
                        + (1.0 - team.relative_schedule_strength) * 50.0;
                    (playoff, championship, perceived)
                }
                _ => (0.0, 0.0, 0.0),
            };

            TeamOdds {
                user_id: team.user_id.clone(),
                name: team.name.clone(),
                roster_id: team.roster_id,
                division: team.division,
                division_rank: rank,
                wins: team.wins,
                losses: team.losses,
                ties: team.ties,
                points_for: round2(team.points_for),
                strength: round2(team.strength),
                schedule_strength: round2(team.schedule_strength),
                projected_wins: round2(team.projected_wins()),
                playoff_chance: round2(playoff.max(0.0)),
                championship_chance: round2(championship.max(0.0)),
                perceived_strength: round2(perceived),
            }
        })
        .collect();

    sort_by_playoff_chance(&mut rows);
    rows
}
