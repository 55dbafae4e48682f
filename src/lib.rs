//! Team W Timer - interval timer service for workout sessions
//!
//! This library provides the FOR TIME / AMRAP / EMOM / TABATA timer engine and
//! the HTTP host that drives it once per second and turns its cues into
//! haptic feedback.

pub mod config;
pub mod state;
pub mod api;
pub mod services;
pub mod tasks;
pub mod utils;

// Re-export commonly used types
pub use config::Config;
pub use state::{AppState, IntervalTimer};
pub use api::create_router;
pub use utils::signals::shutdown_signal;
