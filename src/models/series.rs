use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One day's realized closing price.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryPoint {
    pub date: NaiveDate,
    pub price: f64,
}

/// A day where both the realized price and the model's retrospective
/// prediction are known.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvalPoint {
    pub date: NaiveDate,
    pub actual: f64,
    pub predicted: f64,
}

/// A future day carrying only a model-predicted price.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastPoint {
    pub date: NaiveDate,
    pub price: f64,
}

/// Date-keyed union of whichever source fields exist for that date.
///
/// Missing fields are skipped on serialization so the renderer draws a gap
/// instead of a zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MergedRow {
    pub date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price_history: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actual: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub predicted: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price_forecast: Option<f64>,
}

impl MergedRow {
    pub fn new(date: NaiveDate) -> Self {
        Self {
            date,
            price_history: None,
            actual: None,
            predicted: None,
            price_forecast: None,
        }
    }

    /// True when the row carries `actual` or `predicted`.
    pub fn is_eval_bearing(&self) -> bool {
        self.actual.is_some() || self.predicted.is_some()
    }

    pub fn has_forecast(&self) -> bool {
        self.price_forecast.is_some()
    }
}

/// Validated series, as consumed by the aligner.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ForecastBundle {
    pub history: Vec<HistoryPoint>,
    pub eval: Vec<EvalPoint>,
    pub forecast: Vec<ForecastPoint>,
}

// Wire shapes returned by the prediction API. Every field is optional here so
// that a missing one is reported as an input-shape error instead of a generic
// JSON failure.

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RawPricePoint {
    pub date: Option<String>,
    pub price: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RawEvalPoint {
    pub date: Option<String>,
    pub actual: Option<f64>,
    pub predicted: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RawForecastBundle {
    #[serde(default)]
    pub history: Vec<RawPricePoint>,
    #[serde(default)]
    pub eval: Vec<RawEvalPoint>,
    #[serde(default)]
    pub forecast: Vec<RawPricePoint>,
}
