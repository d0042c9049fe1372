use axum::extract::State;
use axum::http::StatusCode;
use axum::{routing::get, Router};
use tracing::{info, warn};

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(health))
        .route("/upstream", get(upstream_health))
}

async fn health() -> &'static str {
    info!("GET /health - Health check");
    "OK"
}

/// Reports whether the prediction API answers its own health check
async fn upstream_health(State(state): State<AppState>) -> (StatusCode, &'static str) {
    match state.forecast_provider.health().await {
        Ok(true) => (StatusCode::OK, "OK"),
        Ok(false) => {
            warn!("Prediction API reported unhealthy status");
            (StatusCode::SERVICE_UNAVAILABLE, "UNHEALTHY")
        }
        Err(e) => {
            warn!("Prediction API health check failed: {}", e);
            (StatusCode::SERVICE_UNAVAILABLE, "UNREACHABLE")
        }
    }
}
