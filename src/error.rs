use std::path::PathBuf;

use thiserror::Error;

/// Problems found while assembling the runtime settings. All of these halt
/// the dashboard before the terminal is taken over.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("weather API key is not configured (set WEATHER_API_KEY, --api-key or api_key in the config file)")]
    MissingApiKey,

    #[error("cannot read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("unknown country: {0}")]
    UnknownCountry(String),

    #[error("unknown city {city} for country {country}")]
    UnknownCity { country: String, city: String },

    #[error("unknown language: {0} (expected ko or en)")]
    UnknownLanguage(String),

    #[error("fixed geolocation needs both latitude and longitude")]
    IncompleteCoordinates,

    #[error("unknown geolocation provider: {0} (expected ip, fixed or off)")]
    UnknownGeolocator(String),
}

/// Failures of a single forecast request. They are reported inline for the
/// current tick and never retried.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("no location to query")]
    EmptyLocation,

    #[error("API Error: {0}")]
    Status(u16),

    /// Carries the error with its URL stripped: the query holds the API key.
    #[error("Connection Error: {0}")]
    Transport(reqwest::Error),

    #[error("Malformed response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Incomplete forecast: expected 2 days, got {0}")]
    MissingForecastDay(usize),
}
