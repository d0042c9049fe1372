use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::series::MergedRow;

/// Presentation context for the chart
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewMode {
    /// Single next-day projection
    Daily,
    /// Full forecast horizon
    #[default]
    Monthly,
}

impl ViewMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ViewMode::Daily => "daily",
            ViewMode::Monthly => "monthly",
        }
    }
}

/// Aligned chart payload for one view
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastChart {
    pub view_mode: ViewMode,
    pub last_history_date: Option<NaiveDate>,
    pub rows: Vec<MergedRow>,
    pub summary: ForecastSummary,
    pub table: Vec<ForecastTableRow>,
    pub generated_at: DateTime<Utc>,
}

/// Aggregate statistics over the forward forecast series
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ForecastSummary {
    pub days: usize,
    pub average: Option<f64>,
    pub min: Option<f64>,
    pub max: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Trend {
    Up,
    Down,
    Flat,
}

/// One line of the forecast table, with the change against the previous day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastTableRow {
    pub index: usize, // 1-based
    pub date: NaiveDate,
    pub price: f64,
    pub change_pct: Option<f64>,
    pub trend: Trend,
}
