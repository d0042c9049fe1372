use chrono::{NaiveDate, Utc};
use tracing::{info, warn};

use crate::config::ViewPresets;
use crate::errors::AppError;
use crate::external::forecast_provider::ForecastProvider;
use crate::models::{
    DatePrediction, ForecastBundle, ForecastChart, ForecastSummary, ForecastTableRow, MergedRow,
    Trend, ViewMode,
};
use crate::services::series_aligner::{align, validate_bundle, AlignOptions};

/// What the caller asked to see
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ChartRequest {
    pub view_mode: ViewMode,
    pub eval_window: Option<usize>,
    pub horizon: Option<usize>,
}

/// Fetch the current bundle from the provider and validate it.
pub async fn load_bundle(provider: &dyn ForecastProvider) -> Result<ForecastBundle, AppError> {
    let raw = provider.fetch_forecast().await?;
    validate_bundle(&raw).map_err(|e| {
        warn!("Rejected forecast bundle from provider: {}", e);
        AppError::from(e)
    })
}

pub async fn build_chart(
    provider: &dyn ForecastProvider,
    presets: &ViewPresets,
    request: ChartRequest,
) -> Result<ForecastChart, AppError> {
    let bundle = load_bundle(provider).await?;
    let chart = chart_for_bundle(&bundle, presets, request);
    info!(
        "Built {} chart: {} rows, {} forecast days",
        request.view_mode.as_str(),
        chart.rows.len(),
        chart.summary.days
    );
    Ok(chart)
}

/// Shape a validated bundle for the requested view.
///
/// Daily: trailing eval window plus a single next-day projection.
/// Monthly: history and eval trimmed to their context windows, full forecast.
pub fn chart_for_bundle(
    bundle: &ForecastBundle,
    presets: &ViewPresets,
    request: ChartRequest,
) -> ForecastChart {
    let last_history_date = bundle.history.iter().map(|p| p.date).max();

    let rows = match request.view_mode {
        ViewMode::Daily => {
            let options = AlignOptions::new(ViewMode::Daily)
                .with_trailing_eval_window(request.eval_window.unwrap_or(presets.daily_eval_window))
                .with_forecast_horizon(request.horizon.unwrap_or(presets.daily_forecast_horizon));
            align(&bundle.history, &bundle.eval, &bundle.forecast, &options)
        }
        ViewMode::Monthly => {
            let history = latest(&bundle.history, presets.monthly_history_context, |p| p.date);
            let eval = latest(&bundle.eval, presets.monthly_eval_context, |p| p.date);

            let mut options = AlignOptions::new(ViewMode::Monthly);
            options.trailing_eval_window = request.eval_window;
            options.forecast_horizon = request.horizon;
            align(&history, &eval, &bundle.forecast, &options)
        }
    };

    let exposed = exposed_forecast(&rows);

    ForecastChart {
        view_mode: request.view_mode,
        last_history_date,
        summary: summarize(&exposed),
        table: forecast_table(&exposed),
        rows,
        generated_at: Utc::now(),
    }
}

/// Resolve the forecast price for a user-selected date.
pub async fn predict_for_date(
    provider: &dyn ForecastProvider,
    presets: &ViewPresets,
    target_date: NaiveDate,
) -> Result<DatePrediction, AppError> {
    let bundle = load_bundle(provider).await?;
    prediction_for_date(&bundle, presets.max_days_ahead, target_date)
}

pub fn prediction_for_date(
    bundle: &ForecastBundle,
    max_days_ahead: i64,
    target_date: NaiveDate,
) -> Result<DatePrediction, AppError> {
    let last_date = bundle
        .history
        .iter()
        .map(|p| p.date)
        .max()
        .ok_or_else(|| AppError::NotFound("no price history available".to_string()))?;

    let days_ahead = (target_date - last_date).num_days();
    if days_ahead < 1 {
        return Err(AppError::Validation(format!(
            "target_date must be after the last data date {}",
            last_date
        )));
    }
    if days_ahead > max_days_ahead {
        return Err(AppError::Validation(format!(
            "target_date must be at most {} days after {}",
            max_days_ahead, last_date
        )));
    }

    let point = bundle
        .forecast
        .iter()
        .rev()
        .find(|p| p.date == target_date)
        .ok_or_else(|| AppError::NotFound(format!("no forecast for {}", target_date)))?;

    Ok(DatePrediction {
        last_date,
        target_date,
        days_ahead,
        predicted_price: point.price,
    })
}

pub fn summarize(forecast: &[(NaiveDate, f64)]) -> ForecastSummary {
    if forecast.is_empty() {
        return ForecastSummary::default();
    }

    let prices = forecast.iter().map(|(_, price)| *price);
    let sum: f64 = prices.clone().sum();
    let min = prices.clone().fold(f64::INFINITY, f64::min);
    let max = prices.fold(f64::NEG_INFINITY, f64::max);

    ForecastSummary {
        days: forecast.len(),
        average: Some(sum / forecast.len() as f64),
        min: Some(min),
        max: Some(max),
    }
}

/// Day-over-day change table. Input must be in ascending date order.
pub fn forecast_table(forecast: &[(NaiveDate, f64)]) -> Vec<ForecastTableRow> {
    let mut previous: Option<f64> = None;

    forecast
        .iter()
        .enumerate()
        .map(|(i, &(date, price))| {
            let change_pct = previous
                .filter(|prev| *prev != 0.0)
                .map(|prev| (price - prev) / prev * 100.0);
            previous = Some(price);

            let trend = match change_pct {
                Some(c) if c > 0.0 => Trend::Up,
                Some(c) if c < 0.0 => Trend::Down,
                _ => Trend::Flat,
            };

            ForecastTableRow {
                index: i + 1,
                date,
                price,
                change_pct,
                trend,
            }
        })
        .collect()
}

fn exposed_forecast(rows: &[MergedRow]) -> Vec<(NaiveDate, f64)> {
    rows.iter()
        .filter_map(|r| r.price_forecast.map(|price| (r.date, price)))
        .collect()
}

/// The `n` chronologically latest points, in ascending date order.
fn latest<T: Clone>(points: &[T], n: usize, date_of: impl Fn(&T) -> NaiveDate) -> Vec<T> {
    let mut sorted = points.to_vec();
    sorted.sort_by_key(|p| date_of(p));
    let skip = sorted.len().saturating_sub(n);
    sorted.split_off(skip)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{day, sample_bundle, MockForecastProvider};
    use crate::models::{EvalPoint, ForecastPoint, HistoryPoint};

    #[test]
    fn test_daily_chart_uses_presets() {
        let bundle = sample_bundle(100, 60, 30);
        let chart = chart_for_bundle(&bundle, &ViewPresets::default(), ChartRequest {
            view_mode: ViewMode::Daily,
            ..Default::default()
        });

        assert_eq!(chart.view_mode, ViewMode::Daily);
        assert_eq!(chart.rows.iter().filter(|r| r.is_eval_bearing()).count(), 15);
        assert_eq!(chart.rows.iter().filter(|r| r.has_forecast()).count(), 1);
        assert_eq!(chart.summary.days, 1);
        assert_eq!(chart.table.len(), 1);
        assert_eq!(chart.last_history_date, Some(day(99)));
    }

    #[test]
    fn test_daily_chart_honors_overrides() {
        let bundle = sample_bundle(100, 60, 30);
        let chart = chart_for_bundle(&bundle, &ViewPresets::default(), ChartRequest {
            view_mode: ViewMode::Daily,
            eval_window: Some(5),
            horizon: Some(3),
        });

        assert_eq!(chart.rows.iter().filter(|r| r.is_eval_bearing()).count(), 5);
        assert_eq!(chart.rows.len(), 6);
    }

    #[test]
    fn test_monthly_chart_trims_context() {
        let bundle = sample_bundle(100, 60, 30);
        let chart = chart_for_bundle(&bundle, &ViewPresets::default(), ChartRequest::default());

        assert_eq!(chart.view_mode, ViewMode::Monthly);
        let history_rows = chart.rows.iter().filter(|r| r.price_history.is_some()).count();
        let eval_rows = chart.rows.iter().filter(|r| r.is_eval_bearing()).count();
        assert_eq!(history_rows, 60);
        assert_eq!(eval_rows, 30);
        assert_eq!(chart.summary.days, 30);
        assert_eq!(chart.table.len(), 30);
        assert!(chart.rows.windows(2).all(|w| w[0].date < w[1].date));
    }

    #[test]
    fn test_summarize() {
        let summary = summarize(&[(day(0), 10.0), (day(1), 30.0), (day(2), 20.0)]);
        assert_eq!(summary.days, 3);
        assert_eq!(summary.average, Some(20.0));
        assert_eq!(summary.min, Some(10.0));
        assert_eq!(summary.max, Some(30.0));

        assert_eq!(summarize(&[]), ForecastSummary::default());
    }

    #[test]
    fn test_forecast_table_changes() {
        let table = forecast_table(&[
            (day(0), 100.0),
            (day(1), 110.0),
            (day(2), 99.0),
            (day(3), 99.0),
        ]);

        assert_eq!(table[0].index, 1);
        assert_eq!(table[0].change_pct, None);
        assert_eq!(table[0].trend, Trend::Flat);
        assert!((table[1].change_pct.unwrap() - 10.0).abs() < 1e-9);
        assert_eq!(table[1].trend, Trend::Up);
        assert!((table[2].change_pct.unwrap() + 10.0).abs() < 1e-9);
        assert_eq!(table[2].trend, Trend::Down);
        assert_eq!(table[3].change_pct, Some(0.0));
        assert_eq!(table[3].trend, Trend::Flat);
    }

    #[test]
    fn test_prediction_for_date() {
        let bundle = ForecastBundle {
            history: vec![HistoryPoint {
                date: day(0),
                price: 100.0,
            }],
            eval: vec![EvalPoint {
                date: day(0),
                actual: 100.0,
                predicted: 99.0,
            }],
            forecast: vec![
                ForecastPoint {
                    date: day(1),
                    price: 101.0,
                },
                ForecastPoint {
                    date: day(2),
                    price: 102.0,
                },
            ],
        };

        let prediction = prediction_for_date(&bundle, 60, day(2)).unwrap();
        assert_eq!(prediction.last_date, day(0));
        assert_eq!(prediction.days_ahead, 2);
        assert_eq!(prediction.predicted_price, 102.0);

        assert!(matches!(prediction_for_date(&bundle, 60, day(0)), Err(AppError::Validation(_))));
        assert!(matches!(prediction_for_date(&bundle, 60, day(61)), Err(AppError::Validation(_))));
        assert!(matches!(prediction_for_date(&bundle, 60, day(5)), Err(AppError::NotFound(_))));
        assert!(matches!(
            prediction_for_date(&ForecastBundle::default(), 60, day(1)),
            Err(AppError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_build_chart_rejects_malformed_bundle() {
        let mut raw = MockForecastProvider::raw_from(&sample_bundle(5, 5, 5));
        raw.eval[2].actual = None;
        let provider = MockForecastProvider::with_raw(raw);

        let result = build_chart(&provider, &ViewPresets::default(), ChartRequest::default()).await;
        assert!(matches!(result, Err(AppError::Alignment(_))));
    }

    #[tokio::test]
    async fn test_predict_for_date_fetches_from_provider() {
        let provider = MockForecastProvider::new(sample_bundle(10, 10, 5));

        let prediction = predict_for_date(&provider, &ViewPresets::default(), day(10))
            .await
            .unwrap();
        assert_eq!(prediction.days_ahead, 1);
    }
}
