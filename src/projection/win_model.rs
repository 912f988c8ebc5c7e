/// Projected end-of-season record for one team.
///
/// Each remaining game is won with probability
///   p = own / (own + league_average)
/// so a team exactly as strong as the league average is a coin flip, and the
/// projection is current wins plus `p` times the games left.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WinProjection {
    pub win_probability: f64,
    pub remaining_games: u32,
    pub projected_wins: f64,
    /// Projected wins over the full regular season
    pub final_win_rate: f64,
}

/// Games left including the current week; zero once the regular season is over.
pub fn remaining_games(total_regular_season_weeks: u32, current_week: u32) -> u32 {
    (total_regular_season_weeks + 1).saturating_sub(current_week)
}

pub fn win_probability(own_strength: f64, league_average_strength: f64) -> f64 {
    let denom = own_strength + league_average_strength;
    if denom <= 0.0 || !denom.is_finite() {
        return 0.0;
    }
    own_strength / denom
}

pub fn project_wins(
    current_wins: u32,
    own_strength: f64,
    league_average_strength: f64,
    total_regular_season_weeks: u32,
    current_week: u32,
) -> WinProjection {
    let remaining = remaining_games(total_regular_season_weeks, current_week);
    let p = win_probability(own_strength, league_average_strength);
    let projected_wins = current_wins as f64 + p * remaining as f64;
    let final_win_rate = if total_regular_season_weeks == 0 {
        0.0
    } else {
        projected_wins / total_regular_season_weeks as f64
    };
    WinProjection {
        win_probability: p,
        remaining_games: remaining,
        projected_wins,
        final_win_rate,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_remaining_games() {
        assert_eq!(remaining_games(14, 1), 14);
        assert_eq!(remaining_games(14, 5), 10);
        assert_eq!(remaining_games(14, 14), 1);
        assert_eq!(remaining_games(14, 15), 0);
        assert_eq!(remaining_games(14, 30), 0);
    }

    #[test]
    fn test_average_team_is_coin_flip() {
        assert_relative_eq!(win_probability(100.0, 100.0), 0.5, epsilon = 1e-9);
    }

    #[test]
    fn test_double_strength_wins_two_thirds() {
        assert_relative_eq!(win_probability(200.0, 100.0), 2.0 / 3.0, epsilon = 1e-9);
    }

    #[test]
    fn test_zero_strengths_do_not_produce_nan() {
        let p = win_probability(0.0, 0.0);
        assert_eq!(p, 0.0);
        let proj = project_wins(0, 0.0, 0.0, 14, 5);
        assert!(proj.projected_wins.is_finite());
        assert!(proj.final_win_rate.is_finite());
    }

    #[test]
    fn test_projection_adds_expected_future_wins() {
        let proj = project_wins(4, 200.0, 100.0, 14, 5);
        assert_eq!(proj.remaining_games, 10);
        assert_relative_eq!(proj.projected_wins, 4.0 + 20.0 / 3.0, epsilon = 1e-9);
        assert_relative_eq!(proj.final_win_rate, (4.0 + 20.0 / 3.0) / 14.0, epsilon = 1e-9);
    }

    #[test]
    fn test_season_over_keeps_current_wins() {
        let proj = project_wins(9, 150.0, 100.0, 14, 16);
        assert_eq!(proj.remaining_games, 0);
        assert_relative_eq!(proj.projected_wins, 9.0, epsilon = 1e-9);
    }
}
