pub mod binance;
pub mod forecast_provider;
pub mod prediction_api;
