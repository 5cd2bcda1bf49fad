use crate::error::FetchError;
use crate::model::{ForecastSnapshot, Unit};
use async_trait::async_trait;
use std::fmt::Debug;

pub mod openmeteo;
pub mod weatherapi;

pub use openmeteo::OpenMeteoProvider;
pub use weatherapi::WeatherApiGeocoder;

/// One geocoding match. The upstream orders matches by relevance.
#[derive(Debug, Clone, PartialEq)]
pub struct GeoMatch {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
}

/// Turns a free-form place name into candidate locations.
#[async_trait]
pub trait GeocodingProvider: Send + Sync + Debug {
    /// Matches ordered by relevance; empty when nothing matched.
    async fn search(&self, name: &str) -> Result<Vec<GeoMatch>, FetchError>;
}

/// Supplies the normalized forecast payload for a position.
#[async_trait]
pub trait ForecastProvider: Send + Sync + Debug {
    async fn forecast(
        &self,
        latitude: f64,
        longitude: f64,
        unit: Unit,
        horizon_days: u8,
    ) -> Result<ForecastSnapshot, FetchError>;
}

/// One-shot device position lookup.
#[async_trait]
pub trait DevicePosition: Send + Sync + Debug {
    /// Current (latitude, longitude), or why the device cannot provide one.
    async fn current_position(&self) -> Result<(f64, f64), FetchError>;
}

/// Device-position source backed by a fixed configured position.
///
/// Frontends without a geolocation radio (the CLI) use this with the home
/// position from [`Config`](crate::Config); unset means the device cannot
/// answer.
#[derive(Debug, Clone, Default)]
pub struct FixedPosition {
    position: Option<(f64, f64)>,
}

impl FixedPosition {
    pub fn new(position: Option<(f64, f64)>) -> Self {
        Self { position }
    }
}

#[async_trait]
impl DevicePosition for FixedPosition {
    async fn current_position(&self) -> Result<(f64, f64), FetchError> {
        self.position.ok_or(FetchError::LocationUnsupported)
    }
}

pub(crate) fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.len() > MAX {
        format!("{}...", &body[..MAX])
    } else {
        body.to_string()
    }
}
