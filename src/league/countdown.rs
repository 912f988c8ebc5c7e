use chrono::NaiveDateTime;
use serde::Serialize;

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct TimeLeft {
    pub days: i64,
    pub hours: i64,
    pub minutes: i64,
    pub seconds: i64,
}

/// Time remaining until `target`, or `None` once it has passed.
pub fn time_left(target: NaiveDateTime, now: NaiveDateTime) -> Option<TimeLeft> {
    let total = (target - now).num_seconds();
    if total <= 0 {
        return None;
    }
    Some(TimeLeft {
        days: total / 86_400,
        hours: total / 3_600 % 24,
        minutes: total / 60 % 60,
        seconds: total % 60,
    })
}
