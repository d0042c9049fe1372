use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use serde::Deserialize;
use url::Url;

use crate::external::forecast_provider::{check_status, ProviderError, SpotPriceProvider};
use crate::models::SpotPrice;

pub struct BinanceSpotProvider {
    client: reqwest::Client,
    base_url: Url,
}

impl BinanceSpotProvider {
    pub fn new(base_url: Url, timeout: Duration) -> Result<Self, ProviderError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ProviderError::Network(e.to_string()))?;

        Ok(Self { client, base_url })
    }
}

// Binance quotes prices as decimal strings
#[derive(Debug, Deserialize)]
struct TickerPriceResponse {
    symbol: String,
    price: String,
}

#[async_trait]
impl SpotPriceProvider for BinanceSpotProvider {
    async fn fetch_spot(&self, symbol: &str) -> Result<SpotPrice, ProviderError> {
        let url = self
            .base_url
            .join("/api/v3/ticker/price")
            .map_err(|e| ProviderError::BadResponse(e.to_string()))?;

        let resp = self
            .client
            .get(url)
            .query(&[("symbol", symbol)])
            .send()
            .await
            .map_err(|e| ProviderError::Network(e.to_string()))?;

        check_status(resp.status())?;

        let body: TickerPriceResponse = resp
            .json()
            .await
            .map_err(|e| ProviderError::Parse(e.to_string()))?;

        let price = body
            .price
            .parse::<f64>()
            .map_err(|e| ProviderError::Parse(format!("price `{}`: {}", body.price, e)))?;

        Ok(SpotPrice {
            symbol: body.symbol,
            price,
            fetched_at: Utc::now(),
        })
    }
}
