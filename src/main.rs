mod app;
mod config;
mod errors;
mod external;
mod logging;
mod models;
mod routes;
mod services;
mod state;

#[cfg(test)]
mod test_helpers;

use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;

use crate::config::AppConfig;
use crate::external::binance::BinanceSpotProvider;
use crate::external::prediction_api::PredictionApiProvider;
use crate::logging::{init_logging, LoggingConfig};
use crate::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Initialize logging FIRST
    init_logging(LoggingConfig::from_env())?;

    let config = AppConfig::from_env()?;
    tracing::info!(
        "🔮 Using prediction API at {} (timeout {:?})",
        config.forecast_api_url,
        config.http_timeout
    );

    let forecast_provider =
        PredictionApiProvider::new(config.forecast_api_url.clone(), config.http_timeout)
            .context("failed to build prediction API client")?;
    let spot_provider = BinanceSpotProvider::new(config.spot_api_url.clone(), config.http_timeout)
        .context("failed to build spot price client")?;

    let state = AppState {
        forecast_provider: Arc::new(forecast_provider),
        spot_provider: Arc::new(spot_provider),
        presets: Arc::new(config.presets.clone()),
    };
    let app = app::create_app(state);

    let listener = TcpListener::bind(&config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;
    tracing::info!("🚀 Forecast backend running at http://{}/", config.bind_addr);
    axum::serve(listener, app).await?;

    Ok(())
}
