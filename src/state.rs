use std::sync::Arc;

use crate::config::ViewPresets;
use crate::external::forecast_provider::{ForecastProvider, SpotPriceProvider};

#[derive(Clone)]
pub struct AppState {
    pub forecast_provider: Arc<dyn ForecastProvider>,
    pub spot_provider: Arc<dyn SpotPriceProvider>,
    pub presets: Arc<ViewPresets>,
}
