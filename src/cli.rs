use std::path::PathBuf;

use clap::builder::{styling::AnsiColor, Styles};
use clap::Parser;

const ABOUT: &str = "Weather dashboard TUI";

const LONG_ABOUT: &str = "
TUI showing current conditions and tomorrow's forecast from WeatherAPI.com.

The forecast location is your current position when it can be determined, otherwise the city
picked with the country/city selectors. A WeatherAPI.com key is required, either through
WEATHER_API_KEY, --api-key or api_key in the config file.

Keys: l language, g use my location, r reset location, left/right country, up/down city, q quit.
";

const STYLES: Styles = Styles::styled()
    .header(AnsiColor::Yellow.on_default())
    .usage(AnsiColor::Green.on_default())
    .literal(AnsiColor::Green.on_default())
    .placeholder(AnsiColor::Green.on_default());

#[derive(Parser, Debug, Default)]
#[command(version, styles=STYLES, about=ABOUT, long_about = LONG_ABOUT)]
pub struct Args {
    #[arg(long, env = "WEATHER_API_KEY", hide_env_values = true, help = "WeatherAPI.com key")]
    pub api_key: Option<String>,

    #[arg(short, long, help = "Config file (default: <config dir>/wxdash/config.toml)")]
    pub config: Option<PathBuf>,

    #[arg(long, help = "Display language: ko or en")]
    pub lang: Option<String>,

    #[arg(long, help = "Initially selected country (e.g. Japan)")]
    pub country: Option<String>,

    #[arg(long, help = "Initially selected city (e.g. Osaka)")]
    pub city: Option<String>,

    #[arg(long, help = "How to find the current position: ip, fixed or off")]
    pub geolocation: Option<String>,

    #[arg(long, allow_negative_numbers = true, help = "Latitude for fixed geolocation")]
    pub lat: Option<f64>,

    #[arg(long, allow_negative_numbers = true, help = "Longitude for fixed geolocation")]
    pub lon: Option<f64>,

    #[arg(long, help = "HTTP timeout in seconds")]
    pub timeout: Option<u64>,

    #[arg(long, help = "Refetch every N seconds (0 disables)")]
    pub refresh: Option<u64>,

    #[arg(long, help = "Log file (default: wxdash.log in the temp dir)")]
    pub log_file: Option<PathBuf>,
}
