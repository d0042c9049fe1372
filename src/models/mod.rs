mod chart;
mod prediction;
mod series;

pub use chart::{ForecastChart, ForecastSummary, ForecastTableRow, Trend, ViewMode};
pub use prediction::{DatePrediction, NextDayPrediction, SpotPrice};
pub use series::{
    EvalPoint, ForecastBundle, ForecastPoint, HistoryPoint, MergedRow, RawEvalPoint,
    RawForecastBundle, RawPricePoint,
};
