//! One-second recurring trigger for the interval timer

use std::{sync::Weak, time::Duration};
use tokio::{
    task::JoinHandle,
    time::{interval_at, Instant, MissedTickBehavior},
};
use tracing::{debug, error, info};

use crate::state::AppState;

const TICK_PERIOD: Duration = Duration::from_secs(1);

/// Owned handle to a running ticker task. Dropping it cancels the task.
#[derive(Debug)]
pub struct TickerHandle {
    handle: JoinHandle<()>,
}

impl TickerHandle {
    /// Spawn a ticker whose first tick lands one period from now
    pub fn spawn(state: Weak<AppState>) -> Self {
        let first_tick = Instant::now() + TICK_PERIOD;
        Self {
            handle: tokio::spawn(ticker_task(state, first_tick)),
        }
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

impl Drop for TickerHandle {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn ticker_task(state: Weak<AppState>, first_tick: Instant) {
    debug!("Ticker task started");

    let mut interval = interval_at(first_tick, TICK_PERIOD);
    // Catch up after a stall so every elapsed second is counted
    interval.set_missed_tick_behavior(MissedTickBehavior::Burst);

    loop {
        interval.tick().await;

        let Some(state) = state.upgrade() else {
            debug!("Session dropped, ticker exiting");
            break;
        };

        match state.tick() {
            Ok(true) => {}
            Ok(false) => {
                info!("Timer stopped running, ticker exiting");
                break;
            }
            Err(e) => {
                error!("Failed to tick timer: {}", e);
                break;
            }
        }
    }
}
