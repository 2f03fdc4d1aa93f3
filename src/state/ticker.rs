use crate::state::messages::UiEvent;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::interval;

/// One-second heartbeat for the game clock. Always running; whether a tick
/// actually moves the clock is decided by the clock's running flag, so
/// pausing never needs to touch this task.
pub struct ClockTicker {
    ui_events: mpsc::Sender<UiEvent>,
}

impl ClockTicker {
    pub fn new(ui_events: mpsc::Sender<UiEvent>) -> Self {
        Self { ui_events }
    }

    pub async fn run(self) {
        let mut tick_interval = interval(Duration::from_secs(1));
        // Skip the immediate first tick so second zero isn't double-counted.
        tick_interval.tick().await;

        loop {
            tick_interval.tick().await;
            if self.ui_events.send(UiEvent::ClockTick).await.is_err() {
                break;
            }
        }
    }
}

/// Demo playback timer. Spawned when playback starts and aborted when it
/// stops, so a cancelled demo leaves no timer behind to fire late. Any fire
/// that does race the abort is swallowed by the clock's inactive-demo check.
pub struct ScenarioPlayer {
    ui_events: mpsc::Sender<UiEvent>,
    interval_ms: u64,
}

impl ScenarioPlayer {
    pub fn new(ui_events: mpsc::Sender<UiEvent>, interval_ms: u64) -> Self {
        Self { ui_events, interval_ms }
    }

    pub async fn run(self) {
        let mut play_interval = interval(Duration::from_millis(self.interval_ms.max(100)));

        loop {
            play_interval.tick().await;
            if self.ui_events.send(UiEvent::DemoAdvance).await.is_err() {
                break;
            }
        }
    }
}
