use thiserror::Error;

/// Raw failure causes surfaced by the collaborators.
///
/// The coordinator is the only place these become user-facing categories;
/// see [`classify`].
#[derive(Debug, Error)]
pub enum FetchError {
    /// A name search matched no place.
    #[error("no place found matching '{0}'")]
    PlaceNotFound(String),

    /// The device refused to share its position.
    #[error("location permission was denied")]
    PermissionDenied,

    /// No position source exists on this device.
    #[error("no location source is available on this device")]
    LocationUnsupported,

    /// Transport-level failure talking to an upstream API.
    #[error("upstream request failed")]
    Transport(#[source] reqwest::Error),

    /// Upstream answered with a non-success status.
    #[error("upstream request failed with status {status}: {body}")]
    UpstreamStatus {
        status: reqwest::StatusCode,
        body: String,
    },

    /// Upstream body was not decodable as the expected JSON shape.
    #[error("failed to decode upstream payload")]
    Decode(#[from] serde_json::Error),

    /// Upstream payload decoded but a required part was absent.
    #[error("upstream payload is missing '{0}'")]
    MissingField(&'static str),

    /// Upstream payload carried a timestamp we could not parse.
    #[error("unparsable timestamp '{0}' in upstream payload")]
    BadTimestamp(String),

    /// The geocoding credential is not configured.
    #[error("weather API key is not configured")]
    MissingApiKey,
}

/// User-facing error categories, one per distinct message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    NotFound,
    PermissionDenied,
    Unsupported,
    UpstreamError,
    MalformedResponse,
    ConfigurationError,
}

impl ErrorKind {
    pub fn user_message(&self) -> &'static str {
        match self {
            ErrorKind::NotFound => "City not found. Check the spelling and try again.",
            ErrorKind::PermissionDenied => {
                "Location access was denied. Search for a city instead."
            }
            ErrorKind::Unsupported => {
                "Device location is not available here. Search for a city instead."
            }
            ErrorKind::UpstreamError => "Failed to fetch weather data. Please try again.",
            ErrorKind::MalformedResponse => {
                "The weather service returned unexpected data. Please try again."
            }
            ErrorKind::ConfigurationError => {
                "The weather API key is missing or invalid on the server."
            }
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.user_message())
    }
}

/// Map a raw failure cause onto the category shown to the user.
///
/// A rejected credential (401/403 from the geocoding upstream) is a
/// deployment problem, not weather, so it classifies as configuration.
pub fn classify(error: &FetchError) -> ErrorKind {
    match error {
        FetchError::PlaceNotFound(_) => ErrorKind::NotFound,
        FetchError::PermissionDenied => ErrorKind::PermissionDenied,
        FetchError::LocationUnsupported => ErrorKind::Unsupported,
        FetchError::MissingApiKey => ErrorKind::ConfigurationError,
        FetchError::UpstreamStatus { status, .. }
            if *status == reqwest::StatusCode::UNAUTHORIZED
                || *status == reqwest::StatusCode::FORBIDDEN =>
        {
            ErrorKind::ConfigurationError
        }
        FetchError::Transport(_) | FetchError::UpstreamStatus { .. } => ErrorKind::UpstreamError,
        FetchError::Decode(_) | FetchError::MissingField(_) | FetchError::BadTimestamp(_) => {
            ErrorKind::MalformedResponse
        }
    }
}
