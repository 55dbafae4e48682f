//! HTTP API module
//!
//! This module contains the endpoints a workout screen uses to drive its
//! timer and to mark the day's plan complete.

pub mod handlers;
pub mod responses;

use std::sync::Arc;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::state::AppState;
use handlers::*;

/// Create the HTTP router with all endpoints
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/timer", get(timer_handler))
        .route("/timer/mode", post(mode_handler))
        .route("/timer/target", post(target_handler))
        .route("/timer/start", post(start_handler))
        .route("/timer/pause", post(pause_handler))
        .route("/timer/reset", post(reset_handler))
        .route("/plans/:id", get(get_plan_handler).patch(update_plan_handler))
        .route("/plans/:id/done", post(toggle_done_handler))
        .route("/status", get(status_handler))
        .route("/health", get(health_handler))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use axum::{
        body::{to_bytes, Body},
        http::{Method, Request, StatusCode},
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;
    use crate::{
        services::InMemoryPlanStore,
        state::{timer_state::MAX_TARGET_MINUTES, TimerConfig, TimerMode},
    };

    fn test_state() -> Arc<AppState> {
        let plans = InMemoryPlanStore::from_json(
            r#"[{"id": 3, "date": "2026-10-14", "title": "EMOM 12"}]"#,
        )
        .unwrap();
        Arc::new(AppState::new(
            0,
            "127.0.0.1".to_string(),
            TimerConfig::new(TimerMode::ForTime, 10),
            Arc::new(plans),
        ))
    }

    async fn call(state: &Arc<AppState>, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let request = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => request
                .header("content-type", "application/json")
                .body(Body::from(body.to_string())),
            None => request.body(Body::empty()),
        }
        .unwrap();

        let response = create_router(Arc::clone(state)).oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        // extractor rejections answer in plain text
        let value = serde_json::from_slice(&bytes)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()));
        (status, value)
    }

    #[tokio::test]
    async fn amrap_session_over_http() {
        let state = test_state();

        let (status, body) = call(
            &state,
            Method::POST,
            "/timer/mode",
            Some(json!({"mode": "AMRAP", "target_minutes": 12})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["timer"]["mode"], "AMRAP");
        assert_eq!(body["timer"]["target_minutes"], 12);

        let (_, body) = call(&state, Method::POST, "/timer/start", None).await;
        assert_eq!(body["status"], "applied");
        assert_eq!(body["timer"]["display"], "12:00");
        assert_eq!(body["timer"]["status"], "RUNNING");

        let (_, body) = call(&state, Method::POST, "/timer/start", None).await;
        assert_eq!(body["status"], "ignored");

        let (_, body) = call(&state, Method::POST, "/timer/target", Some(json!({"target_minutes": 5}))).await;
        assert_eq!(body["status"], "ignored");
        assert_eq!(body["timer"]["target_minutes"], 12);

        let (_, body) = call(&state, Method::POST, "/timer/pause", None).await;
        assert_eq!(body["timer"]["status"], "PAUSED");

        let (_, body) = call(&state, Method::POST, "/timer/pause", None).await;
        assert_eq!(body["status"], "ignored");

        let (_, body) = call(&state, Method::POST, "/timer/reset", None).await;
        assert_eq!(body["timer"]["status"], "READY");
        assert_eq!(body["timer"]["display"], "00:00");

        let (status, body) = call(&state, Method::GET, "/status", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["ticker_active"], false);
        assert_eq!(body["last_action"], "reset");
    }

    #[tokio::test]
    async fn unknown_mode_is_rejected() {
        let state = test_state();
        let (status, _) = call(&state, Method::POST, "/timer/mode", Some(json!({"mode": "HIIT"}))).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(state.get_timer_state().unwrap().mode, TimerMode::ForTime);
    }

    #[tokio::test]
    async fn mode_accepts_cli_spellings() {
        let state = test_state();
        for (raw, expected) in [("amrap", "AMRAP"), ("for-time", "FOR_TIME"), ("Tabata", "TABATA")] {
            let (status, body) = call(&state, Method::POST, "/timer/mode", Some(json!({"mode": raw}))).await;
            assert_eq!(status, StatusCode::OK);
            assert_eq!(body["timer"]["mode"], expected);
        }
    }

    #[tokio::test]
    async fn oversized_target_keeps_timer_usable() {
        let state = test_state();
        let (status, body) = call(
            &state,
            Method::POST,
            "/timer/mode",
            Some(json!({"mode": "AMRAP", "target_minutes": u32::MAX})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["timer"]["target_minutes"], MAX_TARGET_MINUTES);

        let (status, body) = call(&state, Method::POST, "/timer/start", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["timer"]["elapsed_seconds"], MAX_TARGET_MINUTES * 60);

        call(&state, Method::POST, "/timer/reset", None).await;
        let (_, body) = call(&state, Method::POST, "/timer/target", Some(json!({"target_minutes": u32::MAX}))).await;
        assert_eq!(body["status"], "applied");
        assert_eq!(body["timer"]["target_minutes"], MAX_TARGET_MINUTES);

        let (status, _) = call(&state, Method::GET, "/timer", None).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn plan_completion_toggles() {
        let state = test_state();

        let (status, body) = call(&state, Method::POST, "/plans/3/done", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["is_done"], true);

        let (_, body) = call(&state, Method::PATCH, "/plans/3", Some(json!({"title": "EMOM 14"}))).await;
        assert_eq!(body["title"], "EMOM 14");
        assert_eq!(body["is_done"], true);

        let (_, body) = call(&state, Method::GET, "/plans/3", None).await;
        assert_eq!(body["title"], "EMOM 14");

        let (status, body) = call(&state, Method::GET, "/plans/99", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "plan 99 not found");
    }

    #[tokio::test]
    async fn health_reports_ok() {
        let (status, body) = call(&test_state(), Method::GET, "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }
}
