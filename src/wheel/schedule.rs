//! Weekly wall-clock triggers.
//!
//! A [`WeeklyTrigger`] holds the timestamp of the next occurrence. Polling it
//! fires at most once per occurrence and then moves the target to the following
//! week, so repeated polls inside the same minute never double-fire. A poll that
//! arrives late (process asleep, clock jump) still fires if it is within the
//! grace window; otherwise the occurrence is skipped. A trigger created just
//! after an occurrence (a restart, say) still fires it within the grace window.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDateTime, NaiveTime, Weekday};
use tracing::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeeklySchedule {
    pub weekday: Weekday,
    pub hour: u32,
    pub minute: u32,
}

impl WeeklySchedule {
    pub fn new(weekday: Weekday, hour: u32, minute: u32) -> Option<Self> {
        NaiveTime::from_hms_opt(hour, minute, 0)?;
        Some(WeeklySchedule {
            weekday,
            hour,
            minute,
        })
    }

    fn occurrence_in_week_of(&self, now: NaiveDateTime) -> NaiveDateTime {
        let date = now.date();
        let days_ahead = (self.weekday.num_days_from_monday() + 7
            - date.weekday().num_days_from_monday())
            % 7;
        let time = NaiveTime::from_hms_opt(self.hour, self.minute, 0).unwrap_or(NaiveTime::MIN);
        (date + chrono::Duration::days(days_ahead as i64)).and_time(time)
    }

    /// First occurrence at or after `now`.
    pub fn next_at_or_after(&self, now: NaiveDateTime) -> NaiveDateTime {
        let candidate = self.occurrence_in_week_of(now);
        if candidate < now {
            candidate + chrono::Duration::days(7)
        } else {
            candidate
        }
    }

    /// First occurrence strictly after `now`.
    pub fn next_after(&self, now: NaiveDateTime) -> NaiveDateTime {
        let candidate = self.occurrence_in_week_of(now);
        if candidate <= now {
            candidate + chrono::Duration::days(7)
        } else {
            candidate
        }
    }
}

impl fmt::Display for WeeklySchedule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {:02}:{:02}", self.weekday, self.hour, self.minute)
    }
}

/// Parses `"Mon 23:19"` (any weekday spelling chrono accepts).
impl FromStr for WeeklySchedule {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (day, time) = s
            .trim()
            .split_once(char::is_whitespace)
            .ok_or_else(|| format!("expected \"<weekday> HH:MM\", got {s:?}"))?;
        let weekday: Weekday = day
            .parse()
            .map_err(|_| format!("unknown weekday {day:?}"))?;
        let (hour, minute) = time
            .trim()
            .split_once(':')
            .ok_or_else(|| format!("expected HH:MM, got {time:?}"))?;
        let hour: u32 = hour.parse().map_err(|_| format!("bad hour {hour:?}"))?;
        let minute: u32 = minute
            .parse()
            .map_err(|_| format!("bad minute {minute:?}"))?;
        WeeklySchedule::new(weekday, hour, minute)
            .ok_or_else(|| format!("time out of range: {time:?}"))
    }
}

#[derive(Debug, Clone)]
pub struct WeeklyTrigger {
    schedule: WeeklySchedule,
    grace: chrono::Duration,
    next_target: NaiveDateTime,
}

impl WeeklyTrigger {
    pub fn new(schedule: WeeklySchedule, grace: chrono::Duration, now: NaiveDateTime) -> Self {
        WeeklyTrigger {
            schedule,
            grace,
            next_target: schedule.next_at_or_after(now - grace),
        }
    }

    pub fn next_target(&self) -> NaiveDateTime {
        self.next_target
    }

    /// Returns the occurrence that fires now, if any.
    pub fn poll(&mut self, now: NaiveDateTime) -> Option<NaiveDateTime> {
        if now < self.next_target {
            return None;
        }
        let target = self.next_target;
        self.next_target = self.schedule.next_after(now);

        if now - target <= self.grace {
            Some(target)
        } else {
            warn!(
                "Missed {} occurrence at {} (now {}), next at {}",
                self.schedule, target, now, self.next_target
            );
            None
        }
    }
}
