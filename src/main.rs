//! Team W Timer - interval timer service for workout sessions
//!
//! This is the main entry point for the teamw-timer application.

use std::sync::Arc;
use anyhow::Context;
use tokio::net::TcpListener;
use tracing::{info, warn};

use teamw_timer::{
    api::create_router,
    config::Config,
    services::{InMemoryPlanStore, LogFeedback, PlanStore},
    state::AppState,
    tasks::cue_feedback_task,
    utils::shutdown_signal,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Initialize tracing with appropriate log level
    tracing_subscriber::fmt()
        .with_env_filter(format!("teamw_timer={},tower_http=info", config.log_level()))
        .init();

    info!("Starting teamw-timer server v{}", env!("CARGO_PKG_VERSION"));
    info!("Configuration: host={}, port={}, mode={}, target={}min",
          config.host, config.port, config.mode, config.target_minutes);

    let plans: Arc<dyn PlanStore> = match &config.plans {
        Some(path) => {
            let store = InMemoryPlanStore::load(path)
                .with_context(|| format!("loading plans from {}", path.display()))?;
            if store.is_empty() {
                warn!("Plan file {} contains no plans", path.display());
            } else {
                info!("Serving {} plans", store.len());
            }
            Arc::new(store)
        }
        None => Arc::new(InMemoryPlanStore::new()),
    };

    let state = Arc::new(AppState::new(
        config.port,
        config.host.clone(),
        config.timer_config(),
        plans,
    ));

    // Turn timer cues into haptic feedback
    let cues = state.cue_tx.subscribe();
    tokio::spawn(cue_feedback_task(cues, Arc::new(LogFeedback)));

    let app = create_router(Arc::clone(&state));

    let addr = config.address();
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("binding {}", addr))?;

    info!("Server running on http://{}", addr);
    info!("Endpoints:");
    info!("  GET   /timer          - Current timer display and state");
    info!("  POST  /timer/mode     - Switch mode (FOR_TIME, AMRAP, EMOM, TABATA)");
    info!("  POST  /timer/target   - Set AMRAP minutes");
    info!("  POST  /timer/start    - Start or resume");
    info!("  POST  /timer/pause    - Pause");
    info!("  POST  /timer/reset    - Reset");
    info!("  GET   /plans/:id      - Workout plan");
    info!("  PATCH /plans/:id      - Update plan fields");
    info!("  POST  /plans/:id/done - Toggle session complete");
    info!("  GET   /status         - Server status");
    info!("  GET   /health         - Health check");

    let server = axum::serve(listener, app);

    tokio::select! {
        result = server => {
            if let Err(e) = result {
                tracing::error!("Server error: {}", e);
            }
        }
        _ = shutdown_signal() => {
            info!("Shutdown signal received");
        }
    }

    state.shutdown();
    info!("Server shutdown complete");
    Ok(())
}
