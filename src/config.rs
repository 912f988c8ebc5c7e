use std::collections::HashMap;
use std::time::Duration;

use chrono::NaiveDateTime;
use clap::Parser;

use crate::projection::SeasonParams;
use crate::wheel::{WeeklySchedule, DEFAULT_OPTIONS};

/// Sleeper fantasy league companion dashboard
#[derive(Parser, Debug, Clone)]
#[command(name = "fantasy-league-hub", version, about)]
pub struct Config {
    /// Sleeper league ID
    #[arg(long, env = "LEAGUE_ID", default_value = "1050653620783505408")]
    pub league_id: String,

    /// Sleeper API base URL
    #[arg(long, env = "SLEEPER_API_URL", default_value = "https://api.sleeper.app/v1")]
    pub sleeper_api_url: String,

    /// Random-number microservice base URL (stores the wheel index)
    #[arg(long, env = "RANDOM_SERVICE_URL", default_value = "http://127.0.0.1:3333")]
    pub random_service_url: String,

    /// Dashboard listen address
    #[arg(long, env = "DASHBOARD_ADDR", default_value = "0.0.0.0:8080")]
    pub dashboard_addr: String,

    /// HTTP timeout for outbound requests, in seconds
    #[arg(long, env = "HTTP_TIMEOUT_SECS", default_value = "10")]
    pub http_timeout_secs: u64,

    /// Regular season length used by the projection model
    #[arg(long, env = "REGULAR_SEASON_WEEKS", default_value = "14")]
    pub regular_season_weeks: u32,

    /// Playoff spots per division
    #[arg(long, env = "PLAYOFF_SPOTS_PER_DIVISION", default_value = "3")]
    pub playoff_spots_per_division: u32,

    /// Pin the current week instead of deriving it from the calendar
    #[arg(long, env = "CURRENT_WEEK")]
    pub week: Option<u32>,

    /// Extra future weeks of matchups to fetch for schedule strength
    #[arg(long, env = "LOOKAHEAD_WEEKS", default_value = "0")]
    pub lookahead_weeks: u32,

    /// Season length the horse race is drawn against
    #[arg(long, env = "RACE_SEASON_WEEKS", default_value = "17")]
    pub race_season_weeks: u32,

    /// Horse race emojis as `display_name=emoji`, comma separated
    #[arg(long, env = "RACE_EMOJIS", value_delimiter = ',')]
    pub race_emojis: Vec<String>,

    /// Punishment wheel options, comma separated
    #[arg(long, env = "WHEEL_OPTIONS", value_delimiter = ',')]
    pub wheel_options: Vec<String>,

    /// When the weekly punishment is drawn (local time), e.g. "Mon 23:19"
    #[arg(long, env = "DRAW_AT", default_value = "Mon 23:19")]
    pub draw_at: WeeklySchedule,

    /// When the wheel spins (local time), e.g. "Mon 23:20"
    #[arg(long, env = "SPIN_AT", default_value = "Mon 23:20")]
    pub spin_at: WeeklySchedule,

    /// How late a scheduled draw/spin may still fire, in minutes
    #[arg(long, env = "SCHEDULE_GRACE_MINS", default_value = "60")]
    pub schedule_grace_mins: i64,

    /// How often the scheduler re-checks the wall clock, in seconds
    #[arg(long, env = "SCHEDULER_TICK_SECS", default_value = "10")]
    pub scheduler_tick_secs: u64,

    /// Draft countdown target (local time), e.g. 2024-09-07T23:59:00
    #[arg(long, env = "COUNTDOWN_TARGET")]
    pub countdown_target: Option<NaiveDateTime>,
}

impl Config {
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.league_id.trim().is_empty() {
            anyhow::bail!("LEAGUE_ID must not be empty");
        }
        for (name, value) in [
            ("sleeper_api_url", &self.sleeper_api_url),
            ("random_service_url", &self.random_service_url),
        ] {
            url::Url::parse(value)
                .map_err(|e| anyhow::anyhow!("{} is not a valid URL ({}): {}", name, value, e))?;
        }
        if self.regular_season_weeks == 0 {
            anyhow::bail!("regular_season_weeks must be positive");
        }
        if self.race_season_weeks == 0 {
            anyhow::bail!("race_season_weeks must be positive");
        }
        if self.lookahead_weeks > self.regular_season_weeks {
            anyhow::bail!("lookahead_weeks must not exceed regular_season_weeks");
        }
        if self.week == Some(0) {
            anyhow::bail!("week must be at least 1");
        }
        if self.http_timeout_secs == 0 {
            anyhow::bail!("http_timeout_secs must be positive");
        }
        if self.scheduler_tick_secs == 0 {
            anyhow::bail!("scheduler_tick_secs must be positive");
        }
        if self.schedule_grace_mins < 0 {
            anyhow::bail!("schedule_grace_mins must not be negative");
        }
        if self.wheel_options().is_empty() {
            anyhow::bail!("wheel_options must contain at least one option");
        }
        self.race_emojis()?;
        Ok(())
    }

    pub fn season_params(&self) -> SeasonParams {
        SeasonParams {
            total_regular_season_weeks: self.regular_season_weeks,
            playoff_spots_per_division: self.playoff_spots_per_division,
        }
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }

    pub fn schedule_grace(&self) -> chrono::Duration {
        chrono::Duration::minutes(self.schedule_grace_mins)
    }

    pub fn scheduler_tick(&self) -> Duration {
        Duration::from_secs(self.scheduler_tick_secs)
    }

    /// Configured wheel options, or the built-in list when none are given.
    pub fn wheel_options(&self) -> Vec<String> {
        let configured: Vec<String> = self
            .wheel_options
            .iter()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        if configured.is_empty() {
            DEFAULT_OPTIONS.iter().map(|s| s.to_string()).collect()
        } else {
            configured
        }
    }

    /// Emoji map keyed by lower-cased display name.
    pub fn race_emojis(&self) -> anyhow::Result<HashMap<String, String>> {
        self.race_emojis
            .iter()
            .filter(|entry| !entry.trim().is_empty())
            .map(|entry| {
                let (name, emoji) = entry
                    .split_once('=')
                    .ok_or_else(|| anyhow::anyhow!("race emoji {:?} is not name=emoji", entry))?;
                Ok((name.trim().to_lowercase(), emoji.trim().to_string()))
            })
            .collect()
    }
}
