use axum::extract::{Query, State};
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use tracing::{error, info};

use crate::errors::AppError;
use crate::models::{DatePrediction, NextDayPrediction};
use crate::services::forecast_service;
use crate::services::series_aligner::parse_iso_date;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/next-day", get(get_next_day))
        .route("/date", get(get_date_prediction))
}

#[derive(Debug, Deserialize)]
pub struct DatePredictionQuery {
    target_date: Option<String>,
}

pub async fn get_next_day(
    State(state): State<AppState>,
) -> Result<Json<NextDayPrediction>, AppError> {
    info!("GET /predictions/next-day - Getting next-day prediction");
    let prediction = state.forecast_provider.fetch_next_day().await.map_err(|e| {
        error!("Failed to fetch next-day prediction: {}", e);
        AppError::from(e)
    })?;
    Ok(Json(prediction))
}

/// Forecast price for a date after the last known close
///
/// # Example
/// ```text
/// GET /api/predictions/date?target_date=2024-05-02
/// ```
pub async fn get_date_prediction(
    Query(query): Query<DatePredictionQuery>,
    State(state): State<AppState>,
) -> Result<Json<DatePrediction>, AppError> {
    let raw = query
        .target_date
        .ok_or_else(|| AppError::Validation("target_date is required".to_string()))?;
    info!("GET /predictions/date - target_date={}", raw);

    let target_date = parse_iso_date(&raw).ok_or_else(|| {
        AppError::Validation(format!("target_date `{}` is not a YYYY-MM-DD date", raw))
    })?;

    let prediction = forecast_service::predict_for_date(
        state.forecast_provider.as_ref(),
        &state.presets,
        target_date,
    )
    .await
    .map_err(|e| {
        error!("Failed to predict price for {}: {}", target_date, e);
        e
    })?;
    Ok(Json(prediction))
}
