use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, info};
use url::Url;

use crate::external::forecast_provider::{check_status, ForecastProvider, ProviderError};
use crate::models::{NextDayPrediction, RawForecastBundle};

/// HTTP client for the forecast model service (`/forecast`, `/predict`, `/health`).
pub struct PredictionApiProvider {
    client: reqwest::Client,
    base_url: Url,
}

#[derive(Debug, Deserialize)]
struct HealthResponse {
    status: String,
}

impl PredictionApiProvider {
    pub fn new(mut base_url: Url, timeout: Duration) -> Result<Self, ProviderError> {
        // Url::join replaces the last segment unless the base ends with '/'
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ProviderError::Network(e.to_string()))?;

        Ok(Self { client, base_url })
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ProviderError> {
        let url = self
            .base_url
            .join(path)
            .map_err(|e| ProviderError::BadResponse(e.to_string()))?;

        debug!("GET {}", url);
        let resp = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| ProviderError::Network(e.to_string()))?;

        check_status(resp.status())?;

        resp.json::<T>()
            .await
            .map_err(|e| ProviderError::Parse(e.to_string()))
    }
}

#[async_trait]
impl ForecastProvider for PredictionApiProvider {
    async fn fetch_forecast(&self) -> Result<RawForecastBundle, ProviderError> {
        let bundle: RawForecastBundle = self.get_json("forecast").await?;
        info!(
            "Fetched forecast bundle: {} history, {} eval, {} forecast points",
            bundle.history.len(),
            bundle.eval.len(),
            bundle.forecast.len()
        );
        Ok(bundle)
    }

    async fn fetch_next_day(&self) -> Result<NextDayPrediction, ProviderError> {
        self.get_json("predict").await
    }

    async fn health(&self) -> Result<bool, ProviderError> {
        let body: HealthResponse = self.get_json("health").await?;
        Ok(body.status == "ok")
    }
}
