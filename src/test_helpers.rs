//! Shared fixtures for unit tests.

use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use chrono::{Duration, NaiveDate, Utc};
use tower::ServiceExt;
use url::Url;

use crate::app::create_app;
use crate::config::ViewPresets;
use crate::external::forecast_provider::{ForecastProvider, ProviderError, SpotPriceProvider};
use crate::models::{
    EvalPoint, ForecastBundle, ForecastPoint, HistoryPoint, NextDayPrediction, RawEvalPoint,
    RawForecastBundle, RawPricePoint, SpotPrice,
};
use crate::state::AppState;

pub fn day(offset: i64) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 1).unwrap() + Duration::days(offset)
}

/// History on days `0..history`, eval pairs on the last `eval` history days,
/// forecast on the `forecast` days that follow.
pub fn sample_bundle(history: i64, eval: i64, forecast: i64) -> ForecastBundle {
    ForecastBundle {
        history: (0..history)
            .map(|i| HistoryPoint {
                date: day(i),
                price: 100.0 + i as f64,
            })
            .collect(),
        eval: (history - eval..history)
            .map(|i| EvalPoint {
                date: day(i),
                actual: 100.0 + i as f64,
                predicted: 99.5 + i as f64,
            })
            .collect(),
        forecast: (history..history + forecast)
            .map(|i| ForecastPoint {
                date: day(i),
                price: 100.0 + i as f64,
            })
            .collect(),
    }
}

#[derive(Debug, Clone, Copy)]
pub enum MockFailure {
    RateLimited,
    Network,
}

pub struct MockForecastProvider {
    raw: RawForecastBundle,
    failure: Option<MockFailure>,
}

impl MockForecastProvider {
    pub fn new(bundle: ForecastBundle) -> Self {
        Self::with_raw(Self::raw_from(&bundle))
    }

    pub fn with_raw(raw: RawForecastBundle) -> Self {
        Self { raw, failure: None }
    }

    pub fn failing(failure: MockFailure) -> Self {
        Self {
            raw: RawForecastBundle::default(),
            failure: Some(failure),
        }
    }

    pub fn raw_from(bundle: &ForecastBundle) -> RawForecastBundle {
        let fmt = |d: NaiveDate| Some(d.format("%Y-%m-%d").to_string());
        RawForecastBundle {
            history: bundle
                .history
                .iter()
                .map(|p| RawPricePoint {
                    date: fmt(p.date),
                    price: Some(p.price),
                })
                .collect(),
            eval: bundle
                .eval
                .iter()
                .map(|p| RawEvalPoint {
                    date: fmt(p.date),
                    actual: Some(p.actual),
                    predicted: Some(p.predicted),
                })
                .collect(),
            forecast: bundle
                .forecast
                .iter()
                .map(|p| RawPricePoint {
                    date: fmt(p.date),
                    price: Some(p.price),
                })
                .collect(),
        }
    }

    fn check(&self) -> Result<(), ProviderError> {
        match self.failure {
            Some(MockFailure::RateLimited) => Err(ProviderError::RateLimited),
            Some(MockFailure::Network) => Err(ProviderError::Network("connection refused".into())),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl ForecastProvider for MockForecastProvider {
    async fn fetch_forecast(&self) -> Result<RawForecastBundle, ProviderError> {
        self.check()?;
        Ok(self.raw.clone())
    }

    async fn fetch_next_day(&self) -> Result<NextDayPrediction, ProviderError> {
        self.check()?;
        Ok(NextDayPrediction {
            date: day(0),
            last_close: 100.0,
            pred_next_day: 101.5,
        })
    }

    async fn health(&self) -> Result<bool, ProviderError> {
        self.check()?;
        Ok(true)
    }
}

pub struct MockSpotProvider;

#[async_trait]
impl SpotPriceProvider for MockSpotProvider {
    async fn fetch_spot(&self, symbol: &str) -> Result<SpotPrice, ProviderError> {
        Ok(SpotPrice {
            symbol: symbol.to_string(),
            price: 187.42,
            fetched_at: Utc::now(),
        })
    }
}

/// Serve `router` on an ephemeral local port and return its base URL.
pub async fn serve(router: Router) -> Url {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    Url::parse(&format!("http://{}", addr)).unwrap()
}

pub fn test_state(provider: MockForecastProvider) -> AppState {
    AppState {
        forecast_provider: Arc::new(provider),
        spot_provider: Arc::new(MockSpotProvider),
        presets: Arc::new(ViewPresets::default()),
    }
}

/// Issue a GET against the full application router and collect the body.
pub async fn send_get(state: AppState, uri: &str) -> (StatusCode, Vec<u8>) {
    let response = create_app(state)
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, body.to_vec())
}
