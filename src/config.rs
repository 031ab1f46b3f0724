//! Settings from the config file, overridden by command line and environment.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use tracing::debug;

use crate::catalog::ManualSelection;
use crate::cli::Args;
use crate::error::ConfigError;
use crate::geo::{Coordinates, DEFAULT_IP_ENDPOINT};
use crate::locale::Language;
use crate::weatherapi::DEFAULT_BASE_URL;

const DEFAULT_TIMEOUT_SECS: u64 = 10;
const DEFAULT_LOG_LEVEL: &str = "info";

#[derive(Deserialize, Debug, Default)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    pub timeout_secs: Option<u64>,
    pub language: Option<String>,
    pub country: Option<String>,
    pub city: Option<String>,
    pub refresh_secs: Option<u64>,
    pub log_level: Option<String>,
    pub log_file: Option<PathBuf>,
    pub geolocation: GeoConfig,
}

#[derive(Deserialize, Debug, Default)]
#[serde(default, deny_unknown_fields)]
pub struct GeoConfig {
    pub provider: Option<String>,
    pub endpoint: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

impl FileConfig {
    /// Reads `path`, or the default location when `None`. A missing default
    /// file is the same as an empty one; a missing explicit file is not.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let (path, explicit) = match path {
            Some(p) => (p.to_path_buf(), true),
            None => match default_path() {
                Some(p) => (p, false),
                None => return Ok(Self::default()),
            },
        };

        let text = match fs::read_to_string(&path) {
            Ok(text) => text,
            Err(err) if err.kind() == ErrorKind::NotFound && !explicit => {
                return Ok(Self::default());
            }
            Err(source) => return Err(ConfigError::Read { path, source }),
        };
        toml::from_str(&text).map_err(|source| ConfigError::Parse { path, source })
    }
}

pub fn default_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("wxdash").join("config.toml"))
}

#[derive(Debug, Clone, PartialEq)]
pub enum GeoProvider {
    Ip { endpoint: String },
    Fixed(Coordinates),
    Off,
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub api_key: String,
    pub base_url: String,
    pub timeout: Duration,
    pub language: Language,
    pub selection: ManualSelection,
    pub geolocation: GeoProvider,
    pub refresh: Option<Duration>,
    pub log_level: String,
    pub log_file: PathBuf,
}

impl Settings {
    /// The API key is checked first: without it nothing else is worth doing.
    pub fn resolve(args: &Args, file: FileConfig) -> Result<Self, ConfigError> {
        let api_key = args
            .api_key
            .clone()
            .or(file.api_key)
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty())
            .ok_or(ConfigError::MissingApiKey)?;

        let language = match args.lang.as_deref().or(file.language.as_deref()) {
            Some(lang) => lang.parse()?,
            None => Language::default(),
        };

        // A country given on the command line does not inherit the file's city.
        let selection = match (args.country.as_deref(), file.country.as_deref()) {
            (Some(country), _) => ManualSelection::find(country, args.city.as_deref())?,
            (None, Some(country)) => {
                ManualSelection::find(country, args.city.as_deref().or(file.city.as_deref()))?
            }
            (None, None) => ManualSelection::default(),
        };

        let geolocation = resolve_geolocation(args, file.geolocation)?;
        debug!(?geolocation, "geolocation provider");

        let timeout = args
            .timeout
            .or(file.timeout_secs)
            .unwrap_or(DEFAULT_TIMEOUT_SECS);
        let refresh = args
            .refresh
            .or(file.refresh_secs)
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs);

        Ok(Self {
            api_key,
            base_url: file.base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            timeout: Duration::from_secs(timeout),
            language,
            selection,
            geolocation,
            refresh,
            log_level: file
                .log_level
                .unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string()),
            log_file: args
                .log_file
                .clone()
                .or(file.log_file)
                .unwrap_or_else(|| std::env::temp_dir().join("wxdash.log")),
        })
    }
}

fn resolve_geolocation(args: &Args, file: GeoConfig) -> Result<GeoProvider, ConfigError> {
    let latitude = args.lat.or(file.latitude);
    let longitude = args.lon.or(file.longitude);
    let fixed = match (latitude, longitude) {
        (Some(latitude), Some(longitude)) => Some(Coordinates {
            latitude,
            longitude,
        }),
        (None, None) => None,
        _ => return Err(ConfigError::IncompleteCoordinates),
    };

    let provider = args
        .geolocation
        .as_deref()
        .or(file.provider.as_deref())
        .map(|p| p.trim().to_ascii_lowercase());

    match (provider.as_deref(), fixed) {
        (Some("fixed"), Some(coords)) | (None, Some(coords)) => Ok(GeoProvider::Fixed(coords)),
        (Some("fixed"), None) => Err(ConfigError::IncompleteCoordinates),
        (Some("ip"), _) | (None, None) => Ok(GeoProvider::Ip {
            endpoint: file
                .endpoint
                .unwrap_or_else(|| DEFAULT_IP_ENDPOINT.to_string()),
        }),
        (Some("off"), _) => Ok(GeoProvider::Off),
        (Some(other), _) => Err(ConfigError::UnknownGeolocator(other.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn args_with_key() -> Args {
        Args {
            api_key: Some("secret".to_string()),
            ..Args::default()
        }
    }

    #[test]
    fn missing_key_is_fatal() {
        let err = Settings::resolve(&Args::default(), FileConfig::default()).unwrap_err();
        assert!(matches!(err, ConfigError::MissingApiKey));

        let blank = Args {
            api_key: Some("   ".to_string()),
            ..Args::default()
        };
        assert!(matches!(
            Settings::resolve(&blank, FileConfig::default()),
            Err(ConfigError::MissingApiKey)
        ));
    }

    #[test]
    fn defaults() {
        let settings = Settings::resolve(&args_with_key(), FileConfig::default()).unwrap();
        assert_eq!(settings.api_key, "secret");
        assert_eq!(settings.base_url, DEFAULT_BASE_URL);
        assert_eq!(settings.timeout, Duration::from_secs(DEFAULT_TIMEOUT_SECS));
        assert_eq!(settings.language, Language::Korean);
        assert_eq!(settings.selection, ManualSelection::default());
        assert_eq!(settings.refresh, None);
        assert_eq!(
            settings.geolocation,
            GeoProvider::Ip {
                endpoint: DEFAULT_IP_ENDPOINT.to_string()
            }
        );
    }

    #[test]
    fn file_values_and_cli_overrides() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
api_key = "from-file"
language = "en"
country = "Japan"
city = "Osaka"
refresh_secs = 300

[geolocation]
provider = "off"
"#
        )
        .unwrap();

        let config = FileConfig::load(Some(file.path())).unwrap();
        let args = Args {
            city: Some("Tokyo".to_string()),
            ..Args::default()
        };
        let settings = Settings::resolve(&args, config).unwrap();
        assert_eq!(settings.api_key, "from-file");
        assert_eq!(settings.language, Language::English);
        assert_eq!(settings.selection.city().query, "Tokyo");
        assert_eq!(settings.refresh, Some(Duration::from_secs(300)));
        assert_eq!(settings.geolocation, GeoProvider::Off);
    }

    #[test]
    fn cli_country_does_not_take_file_city() {
        let config = FileConfig {
            country: Some("Japan".to_string()),
            city: Some("Osaka".to_string()),
            ..FileConfig::default()
        };
        let args = Args {
            country: Some("USA".to_string()),
            ..args_with_key()
        };
        let settings = Settings::resolve(&args, config).unwrap();
        assert_eq!(settings.selection.country().name, "USA");
        assert_eq!(settings.selection.city().query, "New York");
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope.toml");
        assert!(matches!(
            FileConfig::load(Some(&path)),
            Err(ConfigError::Read { .. })
        ));
    }

    #[test]
    fn invalid_file_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "api_key = 12").unwrap();
        assert!(matches!(
            FileConfig::load(Some(file.path())),
            Err(ConfigError::Parse { .. })
        ));
    }

    #[test]
    fn coordinates_select_fixed_geolocation() {
        let args = Args {
            lat: Some(37.5),
            lon: Some(127.0),
            ..args_with_key()
        };
        let settings = Settings::resolve(&args, FileConfig::default()).unwrap();
        assert_eq!(
            settings.geolocation,
            GeoProvider::Fixed(Coordinates {
                latitude: 37.5,
                longitude: 127.0
            })
        );

        let half = Args {
            lat: Some(37.5),
            ..args_with_key()
        };
        assert!(matches!(
            Settings::resolve(&half, FileConfig::default()),
            Err(ConfigError::IncompleteCoordinates)
        ));
    }

    #[test]
    fn unknown_provider_is_rejected() {
        let args = Args {
            geolocation: Some("satellite".to_string()),
            ..args_with_key()
        };
        assert!(matches!(
            Settings::resolve(&args, FileConfig::default()),
            Err(ConfigError::UnknownGeolocator(_))
        ));
    }
}
