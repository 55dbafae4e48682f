//! Background tasks module
//!
//! This module contains the tasks that run alongside the HTTP server: the
//! one-second ticker driving the timer and the cue feedback listener.

pub mod cue_feedback;
pub mod ticker;

// Re-export main items
pub use cue_feedback::cue_feedback_task;
pub use ticker::TickerHandle;
