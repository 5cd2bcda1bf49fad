use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use crate::error::FetchError;

use super::{GeoMatch, GeocodingProvider, truncate_body};

const SEARCH_URL: &str = "https://api.weatherapi.com/v1/search.json";

/// Geocoding backed by the WeatherAPI.com search endpoint.
///
/// A missing credential fails before any network traffic, so it always
/// surfaces as a configuration problem rather than a transport one.
#[derive(Debug, Clone)]
pub struct WeatherApiGeocoder {
    api_key: Option<String>,
    http: Client,
}

impl WeatherApiGeocoder {
    pub fn new(api_key: Option<String>) -> Self {
        Self {
            api_key,
            http: Client::new(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct WaSearchResult {
    name: String,
    lat: f64,
    lon: f64,
}

fn matches_from_body(body: &str) -> Result<Vec<GeoMatch>, FetchError> {
    let parsed: Vec<WaSearchResult> = serde_json::from_str(body)?;

    Ok(parsed
        .into_iter()
        .map(|result| GeoMatch {
            name: result.name,
            latitude: result.lat,
            longitude: result.lon,
        })
        .collect())
}

#[async_trait]
impl GeocodingProvider for WeatherApiGeocoder {
    async fn search(&self, name: &str) -> Result<Vec<GeoMatch>, FetchError> {
        let key = self.api_key.as_deref().ok_or(FetchError::MissingApiKey)?;

        let res = self
            .http
            .get(SEARCH_URL)
            .query(&[("key", key), ("q", name)])
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

        let matches = matches_from_body(&body)?;
        debug!("geocoding '{name}' returned {} match(es)", matches.len());

        Ok(matches)
    }
}
