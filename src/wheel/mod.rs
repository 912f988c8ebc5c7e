pub mod random;
pub mod schedule;
pub mod slot;

pub use random::RandomClient;
pub use schedule::WeeklySchedule;
pub use slot::draw_slot;

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Local, NaiveDateTime};
use serde::Serialize;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use random::Pick;
use schedule::WeeklyTrigger;
use slot::{Draw, DrawPublisher, DrawReceiver};

pub const DEFAULT_OPTIONS: [&str; 9] = [
    "No Phone for day",
    "Chelada shotgun",
    "Murph",
    "5k",
    "Free Spot",
    "High Scorer Glaze",
    "Muncy Snap Streak",
    "Bootlegger",
    "TikTok Dance",
];

/// Where a spin's index came from.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SpinSource {
    /// The pending weekly draw
    Draw,
    /// The random-number service
    Service,
    /// Drawn locally because the service was unavailable
    Fallback,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SpinResult {
    pub index: usize,
    pub punishment: String,
    pub source: SpinSource,
    pub spun_at: DateTime<Local>,
}

/// Punishment wheel: the option list, the consumer end of the draw slot and
/// the latest spin.
#[derive(Clone)]
pub struct Wheel {
    options: Arc<Vec<String>>,
    random: RandomClient,
    draws: DrawReceiver,
    last_spin: Arc<RwLock<Option<SpinResult>>>,
}

impl Wheel {
    pub fn new(options: Vec<String>, random: RandomClient, draws: DrawReceiver) -> Self {
        Wheel {
            options: Arc::new(options),
            random,
            draws,
            last_spin: Arc::new(RwLock::new(None)),
        }
    }

    pub fn options(&self) -> &[String] {
        &self.options
    }

    pub async fn last_spin(&self) -> Option<SpinResult> {
        self.last_spin.read().await.clone()
    }

    pub async fn has_pending_draw(&self) -> bool {
        self.draws.is_pending().await
    }

    /// Punishment currently stored in the random-number service; `None` when
    /// the service can't be reached.
    pub async fn stored_punishment(&self) -> Option<String> {
        match self.random.fetch_number().await {
            Ok(index) => self.options.get(index).cloned(),
            Err(e) => {
                warn!("Could not read stored wheel index: {:#}", e);
                None
            }
        }
    }

    /// Spin the wheel, consuming the pending draw if there is one.
    pub async fn spin(&self) -> SpinResult {
        let (index, source) = match self.draws.take().await {
            Some(draw) => (draw.index, SpinSource::Draw),
            None => match self.random.get_number().await {
                Pick::Stored(index) => (index, SpinSource::Service),
                Pick::Local(index) => (index, SpinSource::Fallback),
            },
        };

        let result = SpinResult {
            index,
            punishment: self.options.get(index).cloned().unwrap_or_default(),
            source,
            spun_at: Local::now(),
        };
        info!(
            "Wheel landed on '{}' (index {}, {:?})",
            result.punishment, result.index, result.source
        );
        *self.last_spin.write().await = Some(result.clone());
        result
    }
}

/// Draw this week's punishment: pick locally, hand it to the spin, then store
/// it in the random-number service for other viewers.
pub async fn draw_punishment(publisher: &DrawPublisher, random: &RandomClient) -> Draw {
    let draw = Draw {
        index: random::local_index(random.option_count()),
        drawn_at: Local::now(),
    };
    if let Some(stale) = publisher.publish(draw).await {
        warn!("Replaced unspun draw from {}", stale.drawn_at);
    }
    info!("Drew wheel index {}", draw.index);
    if let Err(e) = random.set_number(draw.index).await {
        warn!("Failed to store wheel index {}: {:#}", draw.index, e);
    }
    draw
}

/// Drives the weekly draw and spin from a single task. On every tick the draw
/// runs before the spin, so a spin that comes due on the same tick consumes
/// the fresh draw.
pub struct WheelScheduler {
    draw: WeeklyTrigger,
    spin: WeeklyTrigger,
    publisher: DrawPublisher,
    random: RandomClient,
    wheel: Wheel,
}

impl WheelScheduler {
    pub fn new(
        draw_at: WeeklySchedule,
        spin_at: WeeklySchedule,
        grace: chrono::Duration,
        now: NaiveDateTime,
        publisher: DrawPublisher,
        random: RandomClient,
        wheel: Wheel,
    ) -> Self {
        WheelScheduler {
            draw: WeeklyTrigger::new(draw_at, grace, now),
            spin: WeeklyTrigger::new(spin_at, grace, now),
            publisher,
            random,
            wheel,
        }
    }

    /// Run whatever is due at `now`; returns the spin if one happened.
    pub async fn run_due(&mut self, now: NaiveDateTime) -> Option<SpinResult> {
        if let Some(target) = self.draw.poll(now) {
            info!("Running weekly draw for {}", target);
            draw_punishment(&self.publisher, &self.random).await;
            info!("Next draw at {}", self.draw.next_target());
        }

        let target = self.spin.poll(now)?;
        info!("Running weekly spin for {}", target);
        let result = self.wheel.spin().await;
        info!("Next spin at {}", self.spin.next_target());
        Some(result)
    }

    /// Re-check the local wall clock every `tick` in a background task.
    pub fn spawn(mut self, tick: Duration) -> JoinHandle<()> {
        tokio::spawn(async move {
            info!(
                "Wheel scheduled: draw at {}, spin at {}",
                self.draw.next_target(),
                self.spin.next_target()
            );

            let mut interval = tokio::time::interval(tick);
            interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

            loop {
                interval.tick().await;
                self.run_due(Local::now().naive_local()).await;
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Weekday};

    fn options() -> Vec<String> {
        DEFAULT_OPTIONS.iter().map(|s| s.to_string()).collect()
    }

    fn offline_random() -> RandomClient {
        RandomClient::new("http://127.0.0.1:1", DEFAULT_OPTIONS.len(), Duration::from_secs(1)).unwrap()
    }

    #[tokio::test]
    async fn test_spin_consumes_pending_draw() {
        let random = offline_random();
        let (tx, rx) = draw_slot();
        let wheel = Wheel::new(options(), random.clone(), rx);

        let draw = draw_punishment(&tx, &random).await;
        assert!(wheel.has_pending_draw().await);

        let spin = wheel.spin().await;
        assert_eq!(spin.source, SpinSource::Draw);
        assert_eq!(spin.index, draw.index);
        assert_eq!(spin.punishment, DEFAULT_OPTIONS[draw.index]);
        assert!(!wheel.has_pending_draw().await);
        assert_eq!(wheel.last_spin().await, Some(spin));
    }

    #[tokio::test]
    async fn test_spin_without_draw_falls_back_when_offline() {
        let (_tx, rx) = draw_slot();
        let wheel = Wheel::new(options(), offline_random(), rx);
        let spin = wheel.spin().await;
        assert_eq!(spin.source, SpinSource::Fallback);
        assert!(spin.index < DEFAULT_OPTIONS.len());
        assert!(!spin.punishment.is_empty());
    }

    // 2026-10-19 is a Monday
    fn monday(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 10, 19)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    fn scheduler(now: NaiveDateTime) -> (WheelScheduler, Wheel) {
        let random = offline_random();
        let (tx, rx) = draw_slot();
        let wheel = Wheel::new(options(), random.clone(), rx);
        let scheduler = WheelScheduler::new(
            WeeklySchedule::new(Weekday::Mon, 23, 19).unwrap(),
            WeeklySchedule::new(Weekday::Mon, 23, 20).unwrap(),
            chrono::Duration::minutes(60),
            now,
            tx,
            random,
            wheel.clone(),
        );
        (scheduler, wheel)
    }

    #[tokio::test]
    async fn test_late_draw_and_spin_on_same_tick_consume_fresh_draw() {
        let (mut scheduler, wheel) = scheduler(monday(12, 0));
        assert!(scheduler.run_due(monday(23, 0)).await.is_none());

        // Both occurrences are overdue when the tick finally arrives
        let spin = scheduler.run_due(monday(23, 45)).await.unwrap();
        assert_eq!(spin.source, SpinSource::Draw);
        assert!(!wheel.has_pending_draw().await);

        // Neither fires again this week
        assert!(scheduler.run_due(monday(23, 50)).await.is_none());
        assert!(!wheel.has_pending_draw().await);
    }

    #[tokio::test]
    async fn test_draw_waits_for_spin_across_ticks() {
        let (mut scheduler, wheel) = scheduler(monday(12, 0));
        assert!(scheduler.run_due(monday(23, 19)).await.is_none());
        assert!(wheel.has_pending_draw().await);

        let spin = scheduler.run_due(monday(23, 20)).await.unwrap();
        assert_eq!(spin.source, SpinSource::Draw);
        assert!(!wheel.has_pending_draw().await);
    }

    #[tokio::test]
    async fn test_stored_punishment_is_none_when_offline() {
        let (_tx, rx) = draw_slot();
        let wheel = Wheel::new(options(), offline_random(), rx);
        assert!(wheel.stored_punishment().await.is_none());
    }
}
