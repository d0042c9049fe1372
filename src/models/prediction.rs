use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Next-day projection as returned by the prediction API's `/predict`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NextDayPrediction {
    pub date: NaiveDate,
    pub last_close: f64,
    pub pred_next_day: f64,
}

/// Forecast price resolved for a user-selected date
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatePrediction {
    pub last_date: NaiveDate,
    pub target_date: NaiveDate,
    pub days_ahead: i64,
    pub predicted_price: f64,
}

/// Live exchange price
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpotPrice {
    pub symbol: String,
    pub price: f64,
    pub fetched_at: DateTime<Utc>,
}
