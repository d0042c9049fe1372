use async_trait::async_trait;
use thiserror::Error;

use crate::models::{NextDayPrediction, RawForecastBundle, SpotPrice};

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("network error: {0}")]
    Network(String),

    #[error("bad response: {0}")]
    BadResponse(String),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("rate limited")]
    RateLimited,
}

/// Source of precomputed forecast bundles (the prediction API).
#[async_trait]
pub trait ForecastProvider: Send + Sync {
    /// History, eval pairs and forward forecast in one bundle
    async fn fetch_forecast(&self) -> Result<RawForecastBundle, ProviderError>;

    async fn fetch_next_day(&self) -> Result<NextDayPrediction, ProviderError>;

    async fn health(&self) -> Result<bool, ProviderError>;
}

/// Live exchange ticker
#[async_trait]
pub trait SpotPriceProvider: Send + Sync {
    async fn fetch_spot(&self, symbol: &str) -> Result<SpotPrice, ProviderError>;
}

/// Map non-success HTTP statuses onto provider errors.
pub(crate) fn check_status(status: reqwest::StatusCode) -> Result<(), ProviderError> {
    if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
        return Err(ProviderError::RateLimited);
    }
    if !status.is_success() {
        return Err(ProviderError::BadResponse(format!("HTTP {}", status)));
    }
    Ok(())
}
