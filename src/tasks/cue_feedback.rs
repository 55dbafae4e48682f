//! Cue feedback background task

use std::sync::Arc;
use tokio::sync::broadcast::{error::RecvError, Receiver};
use tracing::{debug, error, info, warn};

use crate::{
    services::{pattern_for, Feedback},
    state::{Cue, CueEvent},
};

/// Map timer cues to haptic pulses and the AMRAP completion dialog
pub async fn cue_feedback_task(mut cues: Receiver<CueEvent>, feedback: Arc<dyn Feedback>) {
    info!("Starting cue feedback task");

    loop {
        match cues.recv().await {
            Ok(event) => {
                debug!("Feedback for {:?} (mode={}, round={})", event.cue, event.mode, event.round);

                if let Err(e) = feedback.vibrate(pattern_for(event.cue)) {
                    warn!("Vibration failed: {}", e);
                }

                if event.cue == Cue::AmrapExpired {
                    if let Err(e) = feedback.show_dialog("AMRAP", "Time is up! Workout finished.") {
                        error!("Failed to show completion dialog: {}", e);
                    }
                }
            }
            Err(RecvError::Lagged(skipped)) => {
                warn!("Cue feedback lagged, skipped {} cues", skipped);
            }
            Err(RecvError::Closed) => {
                info!("Cue channel closed, stopping feedback task");
                break;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use chrono::Utc;
    use tokio::sync::broadcast;

    use super::*;
    use crate::state::TimerMode;

    #[derive(Default)]
    struct Recorder {
        pulses: Mutex<Vec<Vec<u64>>>,
        dialogs: Mutex<Vec<String>>,
    }

    impl Feedback for Recorder {
        fn vibrate(&self, pattern: &[u64]) -> Result<(), String> {
            self.pulses.lock().unwrap().push(pattern.to_vec());
            Ok(())
        }

        fn show_dialog(&self, title: &str, _message: &str) -> Result<(), String> {
            self.dialogs.lock().unwrap().push(title.to_string());
            Ok(())
        }
    }

    fn event(cue: Cue, mode: TimerMode) -> CueEvent {
        CueEvent { cue, mode, round: 1, at: Utc::now() }
    }

    #[tokio::test]
    async fn every_cue_vibrates_and_expiry_opens_dialog() {
        let (tx, rx) = broadcast::channel(8);
        let recorder = Arc::new(Recorder::default());
        let task = tokio::spawn(cue_feedback_task(rx, recorder.clone()));

        tx.send(event(Cue::PhaseFlip, TimerMode::Tabata)).unwrap();
        tx.send(event(Cue::RoundRollover, TimerMode::Emom)).unwrap();
        tx.send(event(Cue::AmrapExpired, TimerMode::Amrap)).unwrap();
        drop(tx);
        task.await.unwrap();

        let pulses = recorder.pulses.lock().unwrap();
        assert_eq!(pulses.len(), 3);
        assert_eq!(pulses[0], pattern_for(Cue::PhaseFlip));
        assert_eq!(*recorder.dialogs.lock().unwrap(), vec!["AMRAP".to_string()]);
    }
}
