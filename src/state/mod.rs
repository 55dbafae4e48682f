//! State management module
//!
//! This module contains the interval timer engine and the session state that
//! hosts it.

pub mod app_state;
pub mod timer_state;

// Re-export main types
pub use app_state::{AppState, CueEvent};
pub use timer_state::{
    Cue, IntervalTimer, Phase, TimerConfig, TimerMode, TimerSnapshot, TimerStatus,
};
