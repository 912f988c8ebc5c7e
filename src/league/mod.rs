pub mod countdown;
pub mod horse_race;
pub mod loser;

pub use countdown::{time_left, TimeLeft};
pub use horse_race::race_standings;
pub use loser::find_weekly_loser;
