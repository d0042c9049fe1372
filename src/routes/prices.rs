use axum::extract::{Query, State};
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use tracing::{error, info};

use crate::errors::AppError;
use crate::models::SpotPrice;
use crate::state::AppState;

const DEFAULT_SYMBOL: &str = "SOLUSDT";

pub fn router() -> Router<AppState> {
    Router::new().route("/spot", get(get_spot_price))
}

#[derive(Debug, Deserialize)]
pub struct SpotQuery {
    symbol: Option<String>,
}

pub async fn get_spot_price(
    Query(query): Query<SpotQuery>,
    State(state): State<AppState>,
) -> Result<Json<SpotPrice>, AppError> {
    let symbol = query
        .symbol
        .unwrap_or_else(|| DEFAULT_SYMBOL.to_string())
        .to_uppercase();
    info!("GET /prices/spot - symbol={}", symbol);

    if symbol.is_empty() || !symbol.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(AppError::Validation(format!("invalid symbol `{}`", symbol)));
    }

    let spot = state.spot_provider.fetch_spot(&symbol).await.map_err(|e| {
        error!("Failed to fetch spot price for {}: {}", symbol, e);
        AppError::from(e)
    })?;
    Ok(Json(spot))
}
