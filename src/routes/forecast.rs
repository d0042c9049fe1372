use axum::extract::{Query, State};
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use tracing::{error, info, warn};

use crate::errors::AppError;
use crate::models::{ForecastChart, ForecastSummary, ForecastTableRow, ViewMode};
use crate::services::forecast_service::{self, ChartRequest};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/chart", get(get_chart))
        .route("/table", get(get_table))
        .route("/summary", get(get_summary))
}

#[derive(Debug, Deserialize)]
pub struct ChartQuery {
    /// `daily` or `monthly` (default: monthly)
    view: Option<ViewMode>,

    /// Number of most recent actual/predicted pairs to keep
    eval_window: Option<usize>,

    /// Number of forecast days to keep alongside the eval window.
    /// The monthly view only accepts it together with `eval_window`.
    horizon: Option<usize>,
}

/// Aligned chart rows for one view
///
/// # Example
/// ```text
/// GET /api/forecast/chart?view=daily&eval_window=15&horizon=10
/// ```
pub async fn get_chart(
    Query(query): Query<ChartQuery>,
    State(state): State<AppState>,
) -> Result<Json<ForecastChart>, AppError> {
    let request = ChartRequest {
        view_mode: query.view.unwrap_or_default(),
        eval_window: query.eval_window,
        horizon: query.horizon,
    };
    info!(
        "GET /forecast/chart - view={}, eval_window={:?}, horizon={:?}",
        request.view_mode.as_str(),
        request.eval_window,
        request.horizon
    );

    if request.horizon == Some(0) {
        return Err(AppError::Validation("horizon must be at least 1".to_string()));
    }
    if request.view_mode == ViewMode::Monthly
        && request.horizon.is_some()
        && request.eval_window.is_none()
    {
        return Err(AppError::Validation(
            "horizon requires eval_window in the monthly view".to_string(),
        ));
    }

    let chart = forecast_service::build_chart(
        state.forecast_provider.as_ref(),
        &state.presets,
        request,
    )
    .await
    .map_err(|e| {
        log_failure("chart", &e);
        e
    })?;
    Ok(Json(chart))
}

pub async fn get_table(
    State(state): State<AppState>,
) -> Result<Json<Vec<ForecastTableRow>>, AppError> {
    info!("GET /forecast/table - Getting forecast table");
    let chart = monthly_chart(&state).await?;
    Ok(Json(chart.table))
}

pub async fn get_summary(
    State(state): State<AppState>,
) -> Result<Json<ForecastSummary>, AppError> {
    info!("GET /forecast/summary - Getting forecast summary");
    let chart = monthly_chart(&state).await?;
    Ok(Json(chart.summary))
}

async fn monthly_chart(state: &AppState) -> Result<ForecastChart, AppError> {
    forecast_service::build_chart(
        state.forecast_provider.as_ref(),
        &state.presets,
        ChartRequest::default(),
    )
    .await
    .map_err(|e| {
        log_failure("monthly chart", &e);
        e
    })
}

fn log_failure(what: &str, e: &AppError) {
    match e {
        AppError::RateLimited => warn!("Rate limited while building {}", what),
        _ => error!("Failed to build {}: {}", what, e),
    }
}
