//! Single-slot handoff between the weekly draw and the wheel spin.
//!
//! [`DrawPublisher`] is the only writer and [`DrawReceiver`] the only consumer.
//! A newer draw replaces one that was never spun.

use std::sync::Arc;

use chrono::{DateTime, Local};
use serde::Serialize;
use tokio::sync::Mutex;

#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
pub struct Draw {
    pub index: usize,
    pub drawn_at: DateTime<Local>,
}

pub struct DrawPublisher {
    slot: Arc<Mutex<Option<Draw>>>,
}

#[derive(Clone)]
pub struct DrawReceiver {
    slot: Arc<Mutex<Option<Draw>>>,
}

pub fn draw_slot() -> (DrawPublisher, DrawReceiver) {
    let slot = Arc::new(Mutex::new(None));
    (
        DrawPublisher { slot: slot.clone() },
        DrawReceiver { slot },
    )
}

impl DrawPublisher {
    /// Store `draw`, returning an unconsumed previous draw if there was one.
    pub async fn publish(&self, draw: Draw) -> Option<Draw> {
        self.slot.lock().await.replace(draw)
    }
}

impl DrawReceiver {
    /// Consume the pending draw.
    pub async fn take(&self) -> Option<Draw> {
        self.slot.lock().await.take()
    }

    pub async fn is_pending(&self) -> bool {
        self.slot.lock().await.is_some()
    }
}
