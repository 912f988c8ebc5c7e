//! NFL season calendar.
//!
//! Weeks roll over on Tuesdays. The season anchor is the first Tuesday on or
//! after September 3rd of the current year; week 1 starts on the anchor and
//! every following 7-day period is the next week. Dates before the anchor are
//! still week 1.

use chrono::{Datelike, Duration, Local, NaiveDate, NaiveDateTime, Weekday};

const SECONDS_PER_DAY: i64 = 86_400;

/// Midnight of the first Tuesday on or after September 3rd of `year`.
pub fn season_anchor(year: i32) -> NaiveDateTime {
    let sept_third = NaiveDate::from_ymd_opt(year, 9, 3).unwrap_or(NaiveDate::MIN);
    let offset = (Weekday::Tue.num_days_from_sunday() + 7
        - sept_third.weekday().num_days_from_sunday())
        % 7;
    (sept_third + Duration::days(offset as i64)).and_time(chrono::NaiveTime::MIN)
}

/// Week of the season containing `now`, never below 1.
pub fn week_at(now: NaiveDateTime) -> u32 {
    let anchor = season_anchor(now.year());
    let days = (now - anchor).num_seconds().div_euclid(SECONDS_PER_DAY);
    let week = days.div_euclid(7) + 1;
    week.max(1) as u32
}

/// Week of the season according to the local wall clock.
pub fn current_week() -> u32 {
    week_at(Local::now().naive_local())
}
