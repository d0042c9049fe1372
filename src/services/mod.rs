pub mod forecast_service;
pub mod series_aligner;
