use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use crate::error::FetchError;
use crate::model::{CurrentConditions, DailyEntry, ForecastSnapshot, HourlyEntry, Unit};

use super::{ForecastProvider, truncate_body};

const FORECAST_URL: &str = "https://api.open-meteo.com/v1/forecast";

const CURRENT_FIELDS: &str =
    "temperature_2m,relative_humidity_2m,apparent_temperature,is_day,weathercode,wind_speed_10m";
const HOURLY_FIELDS: &str = "temperature_2m,weathercode,is_day";
const DAILY_FIELDS: &str =
    "weathercode,temperature_2m_max,temperature_2m_min,precipitation_probability_max";

/// Forecast backed by the Open-Meteo forecast endpoint.
///
/// Keyless. The unit conversion happens upstream, so a snapshot is only ever
/// valid for the unit it was requested in.
#[derive(Debug, Clone, Default)]
pub struct OpenMeteoProvider {
    http: Client,
}

impl OpenMeteoProvider {
    pub fn new() -> Self {
        Self {
            http: Client::new(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct OmResponse {
    current: Option<OmCurrent>,
    hourly: Option<OmHourly>,
    daily: Option<OmDaily>,
}

#[derive(Debug, Deserialize)]
struct OmCurrent {
    temperature_2m: f64,
    relative_humidity_2m: f64,
    apparent_temperature: f64,
    is_day: u8,
    weathercode: u8,
    wind_speed_10m: f64,
}

#[derive(Debug, Deserialize)]
struct OmHourly {
    time: Vec<String>,
    temperature_2m: Vec<f64>,
    weathercode: Vec<u8>,
    is_day: Vec<u8>,
}

#[derive(Debug, Deserialize)]
struct OmDaily {
    time: Vec<String>,
    weathercode: Vec<u8>,
    temperature_2m_max: Vec<f64>,
    temperature_2m_min: Vec<f64>,
    precipitation_probability_max: Vec<Option<u8>>,
}

fn parse_hour(value: &str) -> Result<NaiveDateTime, FetchError> {
    NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M")
        .map_err(|_| FetchError::BadTimestamp(value.to_owned()))
}

fn parse_day(value: &str) -> Result<NaiveDate, FetchError> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|_| FetchError::BadTimestamp(value.to_owned()))
}

fn snapshot_from_body(body: &str, unit: Unit) -> Result<ForecastSnapshot, FetchError> {
    let parsed: OmResponse = serde_json::from_str(body)?;

    let current = parsed.current.ok_or(FetchError::MissingField("current"))?;
    let hourly = parsed.hourly.ok_or(FetchError::MissingField("hourly"))?;
    let daily = parsed.daily.ok_or(FetchError::MissingField("daily"))?;

    let count = hourly.time.len();
    if hourly.temperature_2m.len() != count
        || hourly.weathercode.len() != count
        || hourly.is_day.len() != count
    {
        return Err(FetchError::MissingField("hourly series"));
    }

    let count = daily.time.len();
    if daily.weathercode.len() != count
        || daily.temperature_2m_max.len() != count
        || daily.temperature_2m_min.len() != count
        || daily.precipitation_probability_max.len() != count
    {
        return Err(FetchError::MissingField("daily series"));
    }

    let hourly_entries = hourly
        .time
        .iter()
        .enumerate()
        .map(|(i, time)| {
            Ok(HourlyEntry {
                time: parse_hour(time)?,
                temperature: hourly.temperature_2m[i],
                weather_code: hourly.weathercode[i],
                is_day: hourly.is_day[i] != 0,
            })
        })
        .collect::<Result<Vec<_>, FetchError>>()?;

    let daily_entries = daily
        .time
        .iter()
        .enumerate()
        .map(|(i, date)| {
            Ok(DailyEntry {
                date: parse_day(date)?,
                weather_code: daily.weathercode[i],
                temperature_max: daily.temperature_2m_max[i],
                temperature_min: daily.temperature_2m_min[i],
                precipitation_probability: daily.precipitation_probability_max[i].unwrap_or(0),
            })
        })
        .collect::<Result<Vec<_>, FetchError>>()?;

    Ok(ForecastSnapshot {
        unit,
        current: CurrentConditions {
            temperature: current.temperature_2m,
            apparent_temperature: current.apparent_temperature,
            humidity: current.relative_humidity_2m,
            wind_speed: current.wind_speed_10m,
            weather_code: current.weathercode,
            is_day: current.is_day != 0,
        },
        hourly: hourly_entries,
        daily: daily_entries,
    })
}

#[async_trait]
impl ForecastProvider for OpenMeteoProvider {
    async fn forecast(
        &self,
        latitude: f64,
        longitude: f64,
        unit: Unit,
        horizon_days: u8,
    ) -> Result<ForecastSnapshot, FetchError> {
        let res = self
            .http
            .get(FORECAST_URL)
            .query(&[
                ("latitude", latitude.to_string()),
                ("longitude", longitude.to_string()),
                ("current", CURRENT_FIELDS.to_owned()),
                ("hourly", HOURLY_FIELDS.to_owned()),
                ("daily", DAILY_FIELDS.to_owned()),
                ("timezone", "auto".to_owned()),
                ("temperature_unit", unit.as_str().to_owned()),
                ("forecast_days", horizon_days.to_string()),
            ])
            .send()
            .await
            .map_err(FetchError::Transport)?;

        let status = res.status();
        let body = res.text().await.map_err(FetchError::Transport)?;

        if !status.is_success() {
            return Err(FetchError::UpstreamStatus {
                status,
                body: truncate_body(&body),
            });
        }

        debug!("forecast for ({latitude:.4}, {longitude:.4}) in {unit}");
        snapshot_from_body(&body, unit)
    }
}
