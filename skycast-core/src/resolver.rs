use std::sync::Arc;

use tracing::debug;

use crate::error::FetchError;
use crate::model::{LocationQuery, ResolvedLocation};
use crate::provider::GeocodingProvider;

/// Turns a location query into the canonical place forecasts are keyed on.
///
/// Coordinate queries pass through without touching the network; name queries
/// take the first geocoding match. Retry policy belongs to the caller, so a
/// failed resolution is surfaced as-is.
#[derive(Debug, Clone)]
pub struct LocationResolver {
    geocoder: Arc<dyn GeocodingProvider>,
}

impl LocationResolver {
    pub fn new(geocoder: Arc<dyn GeocodingProvider>) -> Self {
        Self { geocoder }
    }

    pub async fn resolve(&self, query: LocationQuery) -> Result<ResolvedLocation, FetchError> {
        match query {
            LocationQuery::ByCoordinates {
                latitude,
                longitude,
            } => {
                // No reverse geocoding; the label falls back to raw coordinates.
                Ok(ResolvedLocation {
                    display_name: None,
                    latitude,
                    longitude,
                })
            }
            LocationQuery::ByName(name) => {
                let matches = self.geocoder.search(&name).await?;

                let Some(first) = matches.into_iter().next() else {
                    return Err(FetchError::PlaceNotFound(name));
                };

                debug!(
                    "resolved '{name}' to {} ({:.4}, {:.4})",
                    first.name, first.latitude, first.longitude
                );

                Ok(ResolvedLocation {
                    display_name: Some(first.name),
                    latitude: first.latitude,
                    longitude: first.longitude,
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::GeoMatch;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Debug, Default)]
    struct FakeGeocoder {
        matches: Vec<GeoMatch>,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl GeocodingProvider for FakeGeocoder {
        async fn search(&self, _name: &str) -> Result<Vec<GeoMatch>, FetchError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.matches.clone())
        }
    }

    fn resolver(geocoder: &Arc<FakeGeocoder>) -> LocationResolver {
        LocationResolver::new(geocoder.clone() as Arc<dyn GeocodingProvider>)
    }

    #[tokio::test]
    async fn coordinates_resolve_without_geocoding() {
        let geocoder = Arc::new(FakeGeocoder::default());

        let location = resolver(&geocoder)
            .resolve(LocationQuery::ByCoordinates {
                latitude: 52.52,
                longitude: 13.405,
            })
            .await
            .expect("coordinates always resolve");

        assert_eq!(location.display_name, None);
        assert_eq!(location.latitude, 52.52);
        assert_eq!(geocoder.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn first_match_wins() {
        let geocoder = Arc::new(FakeGeocoder {
            matches: vec![
                GeoMatch {
                    name: "Paris".to_owned(),
                    latitude: 48.87,
                    longitude: 2.33,
                },
                GeoMatch {
                    name: "Paris, Texas".to_owned(),
                    latitude: 33.66,
                    longitude: -95.56,
                },
            ],
            ..FakeGeocoder::default()
        });

        let location = resolver(&geocoder)
            .resolve(LocationQuery::ByName("paris".to_owned()))
            .await
            .expect("must resolve");

        assert_eq!(location.display_name.as_deref(), Some("Paris"));
        assert_eq!(location.latitude, 48.87);
        assert_eq!(geocoder.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn zero_matches_is_not_found() {
        let geocoder = Arc::new(FakeGeocoder::default());

        match resolver(&geocoder)
            .resolve(LocationQuery::ByName("atlantis".to_owned()))
            .await
        {
            Err(FetchError::PlaceNotFound(name)) => assert_eq!(name, "atlantis"),
            other => panic!("expected PlaceNotFound, got {other:?}"),
        }
    }
}
