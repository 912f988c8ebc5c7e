use serde::{Deserialize, Serialize};

/// A league member as returned by `/league/{id}/users` and `/user/{id}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct User {
    pub user_id: String,
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub username: Option<String>,
    /// Avatar hash on the Sleeper CDN
    #[serde(default)]
    pub avatar: Option<String>,
    #[serde(default)]
    pub metadata: UserMetadata,
}

impl User {
    /// Display name, falling back to the username for sparse `/user/{id}` payloads.
    pub fn name(&self) -> &str {
        if self.display_name.is_empty() {
            self.username.as_deref().unwrap_or_default()
        } else {
            &self.display_name
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserMetadata {
    #[serde(default)]
    pub team_name: Option<String>,
}

/// One member's team record.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Roster {
    pub roster_id: u32,
    /// `None` for orphaned rosters
    #[serde(default)]
    pub owner_id: Option<String>,
    #[serde(default)]
    pub settings: RosterSettings,
}

impl Roster {
    pub fn games_played(&self) -> u32 {
        self.settings.wins + self.settings.losses + self.settings.ties
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RosterSettings {
    #[serde(default)]
    pub wins: u32,
    #[serde(default)]
    pub losses: u32,
    #[serde(default)]
    pub ties: u32,
    /// Whole part of points for
    #[serde(default)]
    pub fpts: f64,
    /// Hundredths of points for
    #[serde(default)]
    pub fpts_decimal: f64,
}

impl RosterSettings {
    pub fn points_for(&self) -> f64 {
        self.fpts + self.fpts_decimal / 100.0
    }
}

/// One roster's side of a weekly head-to-head pairing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Matchup {
    pub roster_id: u32,
    /// Shared by both sides of a pairing; null on bye weeks
    #[serde(default)]
    pub matchup_id: Option<u32>,
    #[serde(default)]
    pub points: Option<f64>,
}

impl Matchup {
    pub fn points(&self) -> f64 {
        self.points.unwrap_or(0.0)
    }
}

/// League info from `/league/{id}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct League {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub total_rosters: u32,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub settings: LeagueSettings,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LeagueSettings {
    #[serde(default)]
    pub divisions: Option<u32>,
}

impl League {
    /// Division count, treating a missing or zero setting as a single division.
    pub fn division_count(&self) -> u32 {
        self.settings.divisions.filter(|d| *d > 0).unwrap_or(1)
    }
}

/// Entry of the `/league/{id}/schedule` payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleMatchup {
    pub roster_id: u32,
    pub opponent_id: u32,
    pub week: u32,
}

/// All matchups recorded for a single week.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeekMatchups {
    pub week: u32,
    pub matchups: Vec<Matchup>,
}

impl WeekMatchups {
    pub fn find(&self, roster_id: u32) -> Option<&Matchup> {
        self.matchups.iter().find(|m| m.roster_id == roster_id)
    }

    /// The other roster sharing `roster_id`'s matchup this week.
    pub fn opponent_of(&self, roster_id: u32) -> Option<u32> {
        let matchup_id = self.find(roster_id)?.matchup_id?;
        self.matchups
            .iter()
            .find(|m| m.matchup_id == Some(matchup_id) && m.roster_id != roster_id)
            .map(|m| m.roster_id)
    }
}

/// Everything fetched in one refresh cycle.
#[derive(Debug, Clone)]
pub struct LeagueSnapshot {
    pub users: Vec<User>,
    pub rosters: Vec<Roster>,
    pub league: League,
    /// Ordered by week, starting at week 1
    pub weeks: Vec<WeekMatchups>,
    pub current_week: u32,
}

impl LeagueSnapshot {
    pub fn roster_for(&self, user_id: &str) -> Option<&Roster> {
        self.rosters
            .iter()
            .find(|r| r.owner_id.as_deref() == Some(user_id))
    }
}
