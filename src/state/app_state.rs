//! Workout session state shared by the HTTP handlers and background tasks

use std::{
    sync::{Arc, Mutex},
    time::Instant,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::{broadcast, watch};
use tracing::{debug, info, warn};

use super::{Cue, IntervalTimer, TimerConfig, TimerMode, TimerSnapshot};
use crate::{services::PlanStore, tasks::TickerHandle};

/// A cue stamped with the context it fired in
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CueEvent {
    pub cue: Cue,
    pub mode: TimerMode,
    pub round: u32,
    pub at: DateTime<Utc>,
}

/// Session state for one hosted workout screen
pub struct AppState {
    /// The timer engine, single writer
    pub timer: Arc<Mutex<IntervalTimer>>,
    /// The one recurring trigger allowed for this timer
    ticker: Mutex<Option<TickerHandle>>,
    /// Plan persistence used to mark sessions complete
    pub plans: Arc<dyn PlanStore>,
    /// Server metadata
    pub start_time: Instant,
    pub port: u16,
    pub host: String,
    /// Last action tracking
    pub last_action: Arc<Mutex<Option<String>>>,
    pub last_action_time: Arc<Mutex<Option<DateTime<Utc>>>>,
    /// Cue notifications for feedback listeners
    pub cue_tx: broadcast::Sender<CueEvent>,
    /// Channel for timer updates
    pub timer_update_tx: watch::Sender<TimerSnapshot>,
    /// Keep the receiver alive to prevent channel closure
    pub _timer_update_rx: watch::Receiver<TimerSnapshot>,
}

impl AppState {
    pub fn new(port: u16, host: String, config: TimerConfig, plans: Arc<dyn PlanStore>) -> Self {
        let timer = IntervalTimer::new(config);
        let (cue_tx, _) = broadcast::channel(100);
        let (timer_update_tx, timer_update_rx) = watch::channel(timer.snapshot());

        Self {
            timer: Arc::new(Mutex::new(timer)),
            ticker: Mutex::new(None),
            plans,
            start_time: Instant::now(),
            port,
            host,
            last_action: Arc::new(Mutex::new(None)),
            last_action_time: Arc::new(Mutex::new(None)),
            cue_tx,
            timer_update_tx,
            _timer_update_rx: timer_update_rx,
        }
    }

    /// Apply a mutation to the timer and publish the resulting snapshot
    fn update_timer<F, T>(&self, action: &str, updater: F) -> Result<(T, TimerSnapshot), String>
    where
        F: FnOnce(&mut IntervalTimer) -> T,
    {
        let mut timer = self.timer.lock()
            .map_err(|e| format!("Failed to lock timer: {}", e))?;

        let outcome = updater(&mut *timer);
        let snapshot = timer.snapshot();
        drop(timer); // Release the lock early

        if let Ok(mut last_action) = self.last_action.lock() {
            *last_action = Some(action.to_string());
        }
        if let Ok(mut last_time) = self.last_action_time.lock() {
            *last_time = Some(Utc::now());
        }

        self.publish(snapshot.clone());
        Ok((outcome, snapshot))
    }

    fn publish(&self, snapshot: TimerSnapshot) {
        if let Err(e) = self.timer_update_tx.send(snapshot) {
            warn!("Failed to send timer update: {}", e);
        }
    }

    fn release_ticker(&self) -> Result<(), String> {
        let mut ticker = self.ticker.lock()
            .map_err(|e| format!("Failed to lock ticker: {}", e))?;
        if ticker.take().is_some() {
            debug!("Ticker released");
        }
        Ok(())
    }

    /// Switch timer mode, discarding any session in progress
    pub fn configure(&self, mode: TimerMode, target_minutes: Option<u32>) -> Result<TimerSnapshot, String> {
        info!("Configuring timer mode: {}", mode);
        self.release_ticker()?;
        let ((), snapshot) = self.update_timer("configure", |timer| {
            timer.configure(mode);
            if let Some(minutes) = target_minutes {
                timer.set_target_minutes(minutes);
            }
        })?;
        Ok(snapshot)
    }

    /// Change the countdown budget; ignored unless the timer is idle
    pub fn set_target_minutes(&self, minutes: u32) -> Result<(bool, TimerSnapshot), String> {
        let (applied, snapshot) = self.update_timer("target", |timer| timer.set_target_minutes(minutes))?;
        if applied {
            info!("Target set to {} min", snapshot.target_minutes);
        } else {
            debug!("Target change ignored while {:?}", snapshot.status);
        }
        Ok((applied, snapshot))
    }

    /// Start or resume the timer and take ownership of its ticker
    pub fn start(self: &Arc<Self>) -> Result<(bool, TimerSnapshot), String> {
        let (started, snapshot) = self.update_timer("start", IntervalTimer::start)?;
        if !started {
            debug!("Start ignored, timer already running");
            return Ok((false, snapshot));
        }

        let mut ticker = self.ticker.lock()
            .map_err(|e| format!("Failed to lock ticker: {}", e))?;
        // Dropping a previous handle cancels it before the new one exists
        drop(ticker.take());
        *ticker = Some(TickerHandle::spawn(Arc::downgrade(self)));

        info!("Timer started: mode={}, display={}", snapshot.mode, snapshot.display);
        Ok((true, snapshot))
    }

    pub fn pause(&self) -> Result<(bool, TimerSnapshot), String> {
        let (paused, snapshot) = self.update_timer("pause", IntervalTimer::pause)?;
        if paused {
            self.release_ticker()?;
            info!("Timer paused at {}", snapshot.display);
        } else {
            debug!("Pause ignored while {:?}", snapshot.status);
        }
        Ok((paused, snapshot))
    }

    pub fn reset(&self) -> Result<TimerSnapshot, String> {
        self.release_ticker()?;
        let ((), snapshot) = self.update_timer("reset", IntervalTimer::reset)?;
        info!("Timer reset");
        Ok(snapshot)
    }

    /// Advance one second. Returns whether the timer is still running.
    pub fn tick(&self) -> Result<bool, String> {
        let mut timer = self.timer.lock()
            .map_err(|e| format!("Failed to lock timer: {}", e))?;

        let cue = timer.tick();
        let running = timer.is_running();
        let snapshot = timer.snapshot();
        drop(timer);

        if let Some(cue) = cue {
            debug!("Cue {:?} at round {}", cue, snapshot.round);
            let event = CueEvent {
                cue,
                mode: snapshot.mode,
                round: snapshot.round,
                at: Utc::now(),
            };
            if self.cue_tx.send(event).is_err() {
                debug!("No cue listeners subscribed");
            }
        }

        self.publish(snapshot);
        Ok(running)
    }

    /// Get current timer state
    pub fn get_timer_state(&self) -> Result<TimerSnapshot, String> {
        self.timer.lock()
            .map(|timer| timer.snapshot())
            .map_err(|e| format!("Failed to lock timer: {}", e))
    }

    /// Whether a ticker task is currently alive
    pub fn ticker_active(&self) -> bool {
        self.ticker
            .lock()
            .map(|ticker| ticker.as_ref().is_some_and(|t| !t.is_finished()))
            .unwrap_or(false)
    }

    /// Cancel the ticker on teardown
    pub fn shutdown(&self) {
        if let Err(e) = self.release_ticker() {
            warn!("Failed to release ticker on shutdown: {}", e);
        }
    }

    /// Calculate server uptime as a formatted string
    pub fn get_uptime(&self) -> String {
        let duration = self.start_time.elapsed();
        let hours = duration.as_secs() / 3600;
        let minutes = (duration.as_secs() % 3600) / 60;
        let seconds = duration.as_secs() % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}s", seconds)
        }
    }

    /// Get last action information
    pub fn get_last_action(&self) -> (Option<String>, Option<DateTime<Utc>>) {
        let last_action = self.last_action.lock().ok().and_then(|a| a.clone());
        let last_action_time = self.last_action_time.lock().ok().and_then(|t| *t);
        (last_action, last_action_time)
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::{
        services::InMemoryPlanStore,
        state::{Phase, TimerStatus},
    };

    fn session(mode: TimerMode, target_minutes: u32) -> Arc<AppState> {
        Arc::new(AppState::new(
            0,
            "127.0.0.1".to_string(),
            TimerConfig::new(mode, target_minutes),
            Arc::new(InMemoryPlanStore::new()),
        ))
    }

    #[tokio::test(start_paused = true)]
    async fn start_owns_a_single_ticker() {
        let state = session(TimerMode::ForTime, 1);
        let (started, _) = state.start().unwrap();
        assert!(started);
        assert!(state.ticker_active());

        let (again, _) = state.start().unwrap();
        assert!(!again);

        tokio::time::sleep(Duration::from_millis(3500)).await;
        assert_eq!(state.get_timer_state().unwrap().elapsed_seconds, 3);
    }

    #[tokio::test(start_paused = true)]
    async fn pause_stops_ticking() {
        let state = session(TimerMode::ForTime, 1);
        state.start().unwrap();
        tokio::time::sleep(Duration::from_millis(2500)).await;

        let (paused, snapshot) = state.pause().unwrap();
        assert!(paused);
        assert_eq!(snapshot.elapsed_seconds, 2);
        assert!(!state.ticker_active());

        tokio::time::sleep(Duration::from_secs(10)).await;
        assert_eq!(state.get_timer_state().unwrap().elapsed_seconds, 2);
    }

    #[tokio::test(start_paused = true)]
    async fn amrap_expiry_is_broadcast_once() {
        let state = session(TimerMode::Amrap, 1);
        let mut cues = state.cue_tx.subscribe();
        state.start().unwrap();

        tokio::time::sleep(Duration::from_millis(65_500)).await;

        let event = cues.try_recv().unwrap();
        assert_eq!(event.cue, Cue::AmrapExpired);
        assert_eq!(event.mode, TimerMode::Amrap);
        assert!(cues.try_recv().is_err());

        let snapshot = state.get_timer_state().unwrap();
        assert_eq!(snapshot.status, TimerStatus::Finished);
        assert_eq!(snapshot.display, "00:00");
        assert!(!state.ticker_active());
    }

    fn drain(cues: &mut broadcast::Receiver<CueEvent>) -> Vec<(Cue, u32)> {
        std::iter::from_fn(|| cues.try_recv().ok())
            .map(|event| (event.cue, event.round))
            .collect()
    }

    #[tokio::test(start_paused = true)]
    async fn emom_rollovers_are_broadcast_each_minute() {
        let state = session(TimerMode::Emom, 1);
        let mut cues = state.cue_tx.subscribe();
        state.start().unwrap();

        tokio::time::sleep(Duration::from_millis(59_500)).await;
        assert!(drain(&mut cues).is_empty());

        tokio::time::sleep(Duration::from_secs(61)).await;
        assert_eq!(
            drain(&mut cues),
            vec![(Cue::RoundRollover, 2), (Cue::RoundRollover, 3)]
        );

        let snapshot = state.get_timer_state().unwrap();
        assert_eq!(snapshot.round, 3);
        assert_eq!(snapshot.elapsed_seconds, 0);
        assert!(state.ticker_active());
    }

    #[tokio::test(start_paused = true)]
    async fn tabata_phase_flips_are_broadcast() {
        let state = session(TimerMode::Tabata, 1);
        let mut cues = state.cue_tx.subscribe();
        state.start().unwrap();

        tokio::time::sleep(Duration::from_millis(19_500)).await;
        assert!(drain(&mut cues).is_empty());

        tokio::time::sleep(Duration::from_secs(1)).await;
        assert_eq!(drain(&mut cues), vec![(Cue::PhaseFlip, 1)]);
        assert_eq!(state.get_timer_state().unwrap().phase, Phase::Rest);

        tokio::time::sleep(Duration::from_secs(9)).await;
        assert!(drain(&mut cues).is_empty());

        tokio::time::sleep(Duration::from_secs(1)).await;
        assert_eq!(drain(&mut cues), vec![(Cue::PhaseFlip, 2)]);

        let snapshot = state.get_timer_state().unwrap();
        assert_eq!(snapshot.phase, Phase::Work);
        assert_eq!(snapshot.round, 2);
    }

    #[tokio::test(start_paused = true)]
    async fn configure_mid_session_releases_ticker() {
        let state = session(TimerMode::Emom, 1);
        state.start().unwrap();
        tokio::time::sleep(Duration::from_millis(1500)).await;

        let snapshot = state.configure(TimerMode::Tabata, Some(4)).unwrap();
        assert_eq!(snapshot.mode, TimerMode::Tabata);
        assert_eq!(snapshot.status, TimerStatus::Ready);
        assert_eq!(snapshot.elapsed_seconds, 0);
        assert_eq!(snapshot.target_minutes, 4);
        assert!(!state.ticker_active());
        assert_eq!(state.get_last_action().0.as_deref(), Some("configure"));
    }

    #[tokio::test]
    async fn snapshots_are_published_on_watch() {
        let state = session(TimerMode::Amrap, 2);
        let rx = state.timer_update_tx.subscribe();
        state.start().unwrap();
        assert_eq!(rx.borrow().display, "02:00");
        state.reset().unwrap();
        assert_eq!(rx.borrow().status, TimerStatus::Ready);
    }
}
