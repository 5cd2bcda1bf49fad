use std::sync::Arc;

use crate::error::FetchError;
use crate::model::{ForecastSnapshot, ResolvedLocation, Unit};
use crate::provider::ForecastProvider;

/// Days of forecast requested on every fetch: today plus seven ahead.
pub const FORECAST_DAYS: u8 = 8;

/// Fetches the forecast for a canonical location in a given unit.
///
/// Every call re-fetches; there is no cache between the coordinator and the
/// upstream, so identical inputs yield equivalent snapshots.
#[derive(Debug, Clone)]
pub struct ForecastFetcher {
    provider: Arc<dyn ForecastProvider>,
}

impl ForecastFetcher {
    pub fn new(provider: Arc<dyn ForecastProvider>) -> Self {
        Self { provider }
    }

    pub async fn fetch(
        &self,
        location: &ResolvedLocation,
        unit: Unit,
    ) -> Result<ForecastSnapshot, FetchError> {
        self.provider
            .forecast(location.latitude, location.longitude, unit, FORECAST_DAYS)
            .await
    }
}
