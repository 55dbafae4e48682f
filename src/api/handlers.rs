//! HTTP endpoint handlers

use std::sync::Arc;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use tracing::{error, info};

use crate::{
    services::{Plan, PlanError, PlanUpdate},
    state::AppState,
};
use super::responses::{
    ApiResponse, ErrorResponse, HealthResponse, ModeRequest, StatusResponse, TargetRequest,
};

type PlanResult = Result<Json<Plan>, (StatusCode, Json<ErrorResponse>)>;

fn internal_error(context: &str, e: String) -> StatusCode {
    error!("{}: {}", context, e);
    StatusCode::INTERNAL_SERVER_ERROR
}

fn plan_error(e: PlanError) -> (StatusCode, Json<ErrorResponse>) {
    let status = match e {
        PlanError::NotFound(_) => StatusCode::NOT_FOUND,
        PlanError::Storage(_) => {
            error!("Plan store failure: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };
    (status, Json(ErrorResponse { error: e.to_string() }))
}

/// Handle GET /timer - Current timer snapshot
pub async fn timer_handler(State(state): State<Arc<AppState>>) -> Result<Json<ApiResponse>, StatusCode> {
    let timer = state.get_timer_state()
        .map_err(|e| internal_error("Failed to get timer state", e))?;
    Ok(Json(ApiResponse::applied(timer.display.clone(), timer)))
}

/// Handle POST /timer/mode - Switch discipline, discarding the current session
pub async fn mode_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ModeRequest>,
) -> Result<Json<ApiResponse>, StatusCode> {
    let timer = state.configure(request.mode, request.target_minutes)
        .map_err(|e| internal_error("Failed to configure timer", e))?;
    info!("Mode endpoint called - mode set to {}", timer.mode);
    Ok(Json(ApiResponse::applied(
        format!("Mode set to {}", timer.mode),
        timer,
    )))
}

/// Handle POST /timer/target - Change the countdown budget
pub async fn target_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<TargetRequest>,
) -> Result<Json<ApiResponse>, StatusCode> {
    let (applied, timer) = state.set_target_minutes(request.target_minutes)
        .map_err(|e| internal_error("Failed to set target minutes", e))?;

    Ok(Json(if applied {
        ApiResponse::applied(format!("Target set to {} min", timer.target_minutes), timer)
    } else {
        ApiResponse::ignored("Target can only change before starting".to_string(), timer)
    }))
}

/// Handle POST /timer/start - Start or resume
pub async fn start_handler(State(state): State<Arc<AppState>>) -> Result<Json<ApiResponse>, StatusCode> {
    let (started, timer) = state.start()
        .map_err(|e| internal_error("Failed to start timer", e))?;

    Ok(Json(if started {
        ApiResponse::applied("Timer running".to_string(), timer)
    } else {
        ApiResponse::ignored("Timer already running".to_string(), timer)
    }))
}

/// Handle POST /timer/pause - Pause a running timer
pub async fn pause_handler(State(state): State<Arc<AppState>>) -> Result<Json<ApiResponse>, StatusCode> {
    let (paused, timer) = state.pause()
        .map_err(|e| internal_error("Failed to pause timer", e))?;

    Ok(Json(if paused {
        ApiResponse::applied("Timer paused".to_string(), timer)
    } else {
        ApiResponse::ignored("Timer is not running".to_string(), timer)
    }))
}

/// Handle POST /timer/reset - Back to READY
pub async fn reset_handler(State(state): State<Arc<AppState>>) -> Result<Json<ApiResponse>, StatusCode> {
    let timer = state.reset()
        .map_err(|e| internal_error("Failed to reset timer", e))?;
    Ok(Json(ApiResponse::applied("Timer reset".to_string(), timer)))
}

/// Handle GET /plans/:id
pub async fn get_plan_handler(State(state): State<Arc<AppState>>, Path(id): Path<u64>) -> PlanResult {
    state.plans.get_plan(id).map(Json).map_err(plan_error)
}

/// Handle PATCH /plans/:id - Update selected plan fields
pub async fn update_plan_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u64>,
    Json(fields): Json<PlanUpdate>,
) -> PlanResult {
    state.plans.update_plan(id, fields).map(Json).map_err(plan_error)
}

/// Handle POST /plans/:id/done - Toggle session completion
pub async fn toggle_done_handler(State(state): State<Arc<AppState>>, Path(id): Path<u64>) -> PlanResult {
    let plan = state.plans.toggle_done(id).map_err(plan_error)?;
    info!(
        "Plan {} marked {}",
        id,
        if plan.is_done { "complete" } else { "pending" }
    );
    Ok(Json(plan))
}

/// Handle GET /status - Timer and server status
pub async fn status_handler(State(state): State<Arc<AppState>>) -> Result<Json<StatusResponse>, StatusCode> {
    let timer = state.get_timer_state()
        .map_err(|e| internal_error("Failed to get timer state", e))?;
    let (last_action, last_action_time) = state.get_last_action();

    Ok(Json(StatusResponse {
        timer,
        ticker_active: state.ticker_active(),
        uptime: state.get_uptime(),
        port: state.port,
        host: state.host.clone(),
        last_action,
        last_action_time,
    }))
}

/// Handle GET /health - Health check endpoint
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}
