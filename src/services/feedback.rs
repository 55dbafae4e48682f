//! Haptic and dialog feedback primitives

use tracing::info;

use crate::state::Cue;

/// Device-side feedback the host triggers on timer cues
pub trait Feedback: Send + Sync {
    /// Vibrate with alternating on/off durations in milliseconds
    fn vibrate(&self, pattern: &[u64]) -> Result<(), String>;

    /// Show a modal notification
    fn show_dialog(&self, title: &str, message: &str) -> Result<(), String>;
}

/// Vibration pattern for a cue
pub fn pattern_for(cue: Cue) -> &'static [u64] {
    match cue {
        Cue::RoundRollover => &[500],
        Cue::PhaseFlip => &[300],
        Cue::AmrapExpired => &[500, 200, 500, 200, 500],
    }
}

/// Feedback sink that writes to the log, for headless hosts
#[derive(Debug, Default, Clone)]
pub struct LogFeedback;

impl Feedback for LogFeedback {
    fn vibrate(&self, pattern: &[u64]) -> Result<(), String> {
        info!("Vibrate pattern (ms): {:?}", pattern);
        Ok(())
    }

    fn show_dialog(&self, title: &str, message: &str) -> Result<(), String> {
        info!("Dialog [{}]: {}", title, message);
        Ok(())
    }
}
