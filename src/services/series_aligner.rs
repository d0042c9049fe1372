use std::collections::BTreeMap;

use chrono::NaiveDate;
use thiserror::Error;
use tracing::debug;

use crate::models::{
    EvalPoint, ForecastBundle, ForecastPoint, HistoryPoint, MergedRow, RawForecastBundle,
    ViewMode,
};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum AlignError {
    #[error("{series}[{index}] is missing required field `{field}`")]
    InputShape {
        series: &'static str,
        index: usize,
        field: &'static str,
    },

    #[error("{series}[{index}] has date `{value}`, expected YYYY-MM-DD")]
    DateFormat {
        series: &'static str,
        index: usize,
        value: String,
    },

    #[error("{series}[{index}] has invalid `{field}` value {value}")]
    InvalidValue {
        series: &'static str,
        index: usize,
        field: &'static str,
        value: f64,
    },
}

/// Windowing rules applied after the merge
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AlignOptions {
    pub view_mode: ViewMode,
    /// Keep only the last N eval-bearing rows. Enables the windowing pass.
    pub trailing_eval_window: Option<usize>,
    /// Cap on forecast-only rows kept by the windowing pass.
    pub forecast_horizon: Option<usize>,
}

impl AlignOptions {
    pub fn new(view_mode: ViewMode) -> Self {
        Self {
            view_mode,
            ..Self::default()
        }
    }

    pub fn with_trailing_eval_window(mut self, window: usize) -> Self {
        self.trailing_eval_window = Some(window);
        self
    }

    pub fn with_forecast_horizon(mut self, horizon: usize) -> Self {
        self.forecast_horizon = Some(horizon);
        self
    }
}

/// Merge the three series into one ascending row-per-date table and apply
/// the view-specific windowing.
///
/// A date present in several series yields a single row carrying the fields
/// of each. Within one series a repeated date overwrites that series' own
/// fields (last write wins).
pub fn align(
    history: &[HistoryPoint],
    eval_pairs: &[EvalPoint],
    forecast: &[ForecastPoint],
    options: &AlignOptions,
) -> Vec<MergedRow> {
    let mut by_date: BTreeMap<NaiveDate, MergedRow> = BTreeMap::new();

    for point in history {
        let row = by_date
            .entry(point.date)
            .or_insert_with(|| MergedRow::new(point.date));
        if row.price_history.replace(point.price).is_some() {
            debug!("Duplicate history date {}, keeping last value", point.date);
        }
    }

    for point in eval_pairs {
        let row = by_date
            .entry(point.date)
            .or_insert_with(|| MergedRow::new(point.date));
        if row.is_eval_bearing() {
            debug!("Duplicate eval date {}, keeping last pair", point.date);
        }
        row.actual = Some(point.actual);
        row.predicted = Some(point.predicted);
    }

    for point in forecast {
        let row = by_date
            .entry(point.date)
            .or_insert_with(|| MergedRow::new(point.date));
        if row.price_forecast.replace(point.price).is_some() {
            debug!("Duplicate forecast date {}, keeping last value", point.date);
        }
    }

    // BTreeMap iteration is already ascending by date
    let mut rows: Vec<MergedRow> = by_date.into_values().collect();

    if options.view_mode == ViewMode::Daily {
        keep_first_forecast(&mut rows);
    }

    if let Some(window) = options.trailing_eval_window {
        rows = apply_windows(rows, window, options.forecast_horizon);
    }

    rows
}

/// Convert the loosely-typed wire bundle into validated series.
///
/// Fails on the first malformed element; nothing is dropped silently.
pub fn validate_bundle(raw: &RawForecastBundle) -> Result<ForecastBundle, AlignError> {
    let history = raw
        .history
        .iter()
        .enumerate()
        .map(|(index, p)| {
            let date = parse_date("history", index, p.date.as_deref())?;
            let price = require_value("history", index, "price", p.price)?;
            if price <= 0.0 {
                return Err(AlignError::InvalidValue {
                    series: "history",
                    index,
                    field: "price",
                    value: price,
                });
            }
            Ok(HistoryPoint { date, price })
        })
        .collect::<Result<Vec<_>, AlignError>>()?;

    let eval = raw
        .eval
        .iter()
        .enumerate()
        .map(|(index, p)| {
            Ok(EvalPoint {
                date: parse_date("eval", index, p.date.as_deref())?,
                actual: require_value("eval", index, "actual", p.actual)?,
                predicted: require_value("eval", index, "predicted", p.predicted)?,
            })
        })
        .collect::<Result<Vec<_>, AlignError>>()?;

    let forecast = raw
        .forecast
        .iter()
        .enumerate()
        .map(|(index, p)| {
            Ok(ForecastPoint {
                date: parse_date("forecast", index, p.date.as_deref())?,
                price: require_value("forecast", index, "price", p.price)?,
            })
        })
        .collect::<Result<Vec<_>, AlignError>>()?;

    Ok(ForecastBundle {
        history,
        eval,
        forecast,
    })
}

/// Parse a strict `YYYY-MM-DD` date. The text must round-trip unchanged so
/// that string order and calendar order agree.
pub fn parse_iso_date(value: &str) -> Option<NaiveDate> {
    let date = NaiveDate::parse_from_str(value, "%Y-%m-%d").ok()?;
    (date.format("%Y-%m-%d").to_string() == value).then_some(date)
}

fn parse_date(
    series: &'static str,
    index: usize,
    value: Option<&str>,
) -> Result<NaiveDate, AlignError> {
    let value = value.ok_or(AlignError::InputShape {
        series,
        index,
        field: "date",
    })?;
    parse_iso_date(value).ok_or_else(|| AlignError::DateFormat {
        series,
        index,
        value: value.to_string(),
    })
}

fn require_value(
    series: &'static str,
    index: usize,
    field: &'static str,
    value: Option<f64>,
) -> Result<f64, AlignError> {
    let value = value.ok_or(AlignError::InputShape {
        series,
        index,
        field,
    })?;
    if !value.is_finite() {
        return Err(AlignError::InvalidValue {
            series,
            index,
            field,
            value,
        });
    }
    Ok(value)
}

/// Daily view exposes a single projection: clear `price_forecast` on every
/// row after the first one carrying it.
fn keep_first_forecast(rows: &mut [MergedRow]) {
    let Some(first) = rows.iter().position(MergedRow::has_forecast) else {
        return;
    };
    for row in rows.iter_mut().skip(first + 1) {
        row.price_forecast = None;
    }
}

/// Keep the last `eval_window` eval-bearing rows and the first
/// `forecast_horizon` forecast-only rows. Everything else is dropped.
fn apply_windows(
    rows: Vec<MergedRow>,
    eval_window: usize,
    forecast_horizon: Option<usize>,
) -> Vec<MergedRow> {
    let eval_total = rows.iter().filter(|r| r.is_eval_bearing()).count();
    let eval_skip = eval_total.saturating_sub(eval_window);

    let mut eval_seen = 0;
    let mut forecast_kept = 0;

    rows.into_iter()
        .filter(|row| {
            if row.is_eval_bearing() {
                eval_seen += 1;
                eval_seen > eval_skip
            } else if row.has_forecast() {
                forecast_kept += 1;
                forecast_horizon.map_or(true, |h| forecast_kept <= h)
            } else {
                false
            }
        })
        .collect()
}
