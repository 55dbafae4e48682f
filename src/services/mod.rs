//! External collaborators module
//!
//! Contracts for the services the workout screen talks to: the feedback
//! primitives driven by timer cues and the plan persistence store.

pub mod feedback;
pub mod plans;

// Re-export main types
pub use feedback::{pattern_for, Feedback, LogFeedback};
pub use plans::{InMemoryPlanStore, Plan, PlanError, PlanSection, PlanStore, PlanUpdate};
