//! Workout plan persistence contract and in-memory store

use std::{collections::HashMap, path::Path, sync::Mutex};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

/// One block of a day's workout (warm-up, WOD, accessory work)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanSection {
    pub name: String,
    pub content: String,
}

/// A student's plan for one training day
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Plan {
    pub id: u64,
    pub date: NaiveDate,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub sections: Vec<PlanSection>,
    #[serde(default)]
    pub is_done: bool,
}

/// Partial update; `None` fields are left untouched
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanUpdate {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub is_done: Option<bool>,
}

#[derive(Debug, Error)]
pub enum PlanError {
    #[error("plan {0} not found")]
    NotFound(u64),
    #[error("plan storage error: {0}")]
    Storage(String),
}

/// Remote data store as seen by the workout screen
pub trait PlanStore: Send + Sync {
    fn get_plan(&self, id: u64) -> Result<Plan, PlanError>;

    fn update_plan(&self, id: u64, fields: PlanUpdate) -> Result<Plan, PlanError>;

    /// Flip the completion flag of a plan
    fn toggle_done(&self, id: u64) -> Result<Plan, PlanError> {
        let plan = self.get_plan(id)?;
        self.update_plan(
            id,
            PlanUpdate {
                is_done: Some(!plan.is_done),
                ..PlanUpdate::default()
            },
        )
    }
}

/// Plan store kept in process memory
#[derive(Debug, Default)]
pub struct InMemoryPlanStore {
    plans: Mutex<HashMap<u64, Plan>>,
}

impl InMemoryPlanStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_plans(plans: impl IntoIterator<Item = Plan>) -> Self {
        Self {
            plans: Mutex::new(plans.into_iter().map(|p| (p.id, p)).collect()),
        }
    }

    /// Seed from a JSON array of plans
    pub fn from_json(json: &str) -> Result<Self, PlanError> {
        let plans: Vec<Plan> = serde_json::from_str(json)
            .map_err(|e| PlanError::Storage(format!("invalid plan JSON: {}", e)))?;
        debug!("Parsed {} plans from JSON", plans.len());
        Ok(Self::from_plans(plans))
    }

    pub fn load(path: &Path) -> Result<Self, PlanError> {
        let json = std::fs::read_to_string(path)
            .map_err(|e| PlanError::Storage(format!("failed to read {}: {}", path.display(), e)))?;
        let store = Self::from_json(&json)?;
        info!("Loaded plans from {}", path.display());
        Ok(store)
    }

    pub fn len(&self) -> usize {
        self.plans.lock().map(|plans| plans.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl PlanStore for InMemoryPlanStore {
    fn get_plan(&self, id: u64) -> Result<Plan, PlanError> {
        let plans = self
            .plans
            .lock()
            .map_err(|e| PlanError::Storage(format!("Failed to lock plans: {}", e)))?;
        plans.get(&id).cloned().ok_or(PlanError::NotFound(id))
    }

    fn update_plan(&self, id: u64, fields: PlanUpdate) -> Result<Plan, PlanError> {
        let mut plans = self
            .plans
            .lock()
            .map_err(|e| PlanError::Storage(format!("Failed to lock plans: {}", e)))?;
        let plan = plans.get_mut(&id).ok_or(PlanError::NotFound(id))?;

        if let Some(title) = fields.title {
            plan.title = Some(title);
        }
        if let Some(is_done) = fields.is_done {
            plan.is_done = is_done;
        }

        info!("Updated plan {}: is_done={}", id, plan.is_done);
        Ok(plan.clone())
    }
}
