use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::error::ErrorKind;

/// Temperature unit currently displayed. Switched only by explicit user action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Unit {
    #[default]
    Celsius,
    Fahrenheit,
}

impl Unit {
    /// Value sent upstream as `temperature_unit`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Unit::Celsius => "celsius",
            Unit::Fahrenheit => "fahrenheit",
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Unit::Celsius => "°C",
            Unit::Fahrenheit => "°F",
        }
    }

    pub fn toggled(&self) -> Unit {
        match self {
            Unit::Celsius => Unit::Fahrenheit,
            Unit::Fahrenheit => Unit::Celsius,
        }
    }

    pub const fn all() -> &'static [Unit] {
        &[Unit::Celsius, Unit::Fahrenheit]
    }
}

impl std::fmt::Display for Unit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for Unit {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let lower = value.to_lowercase();

        match lower.as_str() {
            "celsius" => Ok(Unit::Celsius),
            "fahrenheit" => Ok(Unit::Fahrenheit),
            _ => Err(anyhow::anyhow!(
                "Unknown unit '{value}'. Supported units: celsius, fahrenheit."
            )),
        }
    }
}

/// Holds the active unit; the coordinator consults it at trigger time.
#[derive(Debug, Default)]
pub struct UnitModel {
    value: Unit,
}

impl UnitModel {
    pub fn new(value: Unit) -> Self {
        Self { value }
    }

    pub fn get(&self) -> Unit {
        self.value
    }

    /// Flips celsius/fahrenheit and returns the new value.
    pub fn toggle(&mut self) -> Unit {
        self.value = self.value.toggled();
        self.value
    }
}

/// Input to location resolution; never stored long-term.
#[derive(Debug, Clone, PartialEq)]
pub enum LocationQuery {
    ByName(String),
    ByCoordinates { latitude: f64, longitude: f64 },
}

/// Canonical place forecasts are keyed on, e.g. for re-fetches on a unit
/// toggle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedLocation {
    /// Absent only for coordinate queries, which skip geocoding.
    pub display_name: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
}

impl ResolvedLocation {
    pub fn label(&self) -> String {
        match &self.display_name {
            Some(name) => name.clone(),
            None => format!("{:.4}, {:.4}", self.latitude, self.longitude),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentConditions {
    pub temperature: f64,
    pub apparent_temperature: f64,
    /// Relative humidity in percent (0-100).
    pub humidity: f64,
    /// Wind speed in km/h.
    pub wind_speed: f64,
    /// WMO interpretation code.
    pub weather_code: u8,
    pub is_day: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HourlyEntry {
    pub time: NaiveDateTime,
    pub temperature: f64,
    pub weather_code: u8,
    pub is_day: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyEntry {
    pub date: NaiveDate,
    pub weather_code: u8,
    pub temperature_max: f64,
    pub temperature_min: f64,
    /// Probability of precipitation in percent (0-100).
    pub precipitation_probability: u8,
}

/// One fetched forecast, tagged with the unit it was requested in.
///
/// Upstream performs the unit conversion, so a new unit always means a new
/// snapshot; values are never converted in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastSnapshot {
    pub unit: Unit,
    pub current: CurrentConditions,
    pub hourly: Vec<HourlyEntry>,
    pub daily: Vec<DailyEntry>,
}

/// Where the view currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Idle,
    Loading,
    Ready,
    Errored(ErrorKind),
}

/// The single source of truth for what is displayed.
///
/// Written only by the coordinator, observed read-only through its
/// subscription. At `Ready` the snapshot was fetched for `location` and
/// `snapshot.unit == unit`.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewState {
    pub location: Option<ResolvedLocation>,
    pub snapshot: Option<ForecastSnapshot>,
    pub unit: Unit,
    pub status: Status,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            location: None,
            snapshot: None,
            unit: Unit::default(),
            status: Status::Idle,
        }
    }
}
