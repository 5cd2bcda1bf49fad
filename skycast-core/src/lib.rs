//! Core library for the `skycast` weather app.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - The collaborator seams (geocoding, forecast, device position) and their
//!   production implementations
//! - The fetch coordinator that owns the single authoritative view state
//!
//! It is used by `skycast-cli`, but can also back other frontends.

pub mod config;
pub mod coordinator;
pub mod error;
pub mod fetcher;
pub mod model;
pub mod provider;
pub mod resolver;

pub use config::{API_KEY_ENV, Config, HomePosition};
pub use coordinator::FetchCoordinator;
pub use error::{ErrorKind, FetchError, classify};
pub use fetcher::{FORECAST_DAYS, ForecastFetcher};
pub use model::{
    CurrentConditions, DailyEntry, ForecastSnapshot, HourlyEntry, LocationQuery, ResolvedLocation,
    Status, Unit, UnitModel, ViewState,
};
pub use provider::{
    DevicePosition, FixedPosition, ForecastProvider, GeoMatch, GeocodingProvider,
    OpenMeteoProvider, WeatherApiGeocoder,
};
pub use resolver::LocationResolver;
