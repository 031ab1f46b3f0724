//! Client for the WeatherAPI.com `forecast.json` endpoint.

use std::time::Duration;

use chrono::Utc;
use reqwest::blocking::Client;
use reqwest::StatusCode;
use serde::Deserialize;
use tracing::debug;

use crate::error::FetchError;
use crate::weather::{Astro, Current, Daily, ForecastResult};

pub const DEFAULT_BASE_URL: &str = "http://api.weatherapi.com/v1";

/// Today and tomorrow.
const FORECAST_DAYS: usize = 2;

pub struct WeatherApi {
    client: Client,
    base_url: String,
    api_key: String,
}

impl WeatherApi {
    pub fn new(base_url: &str, api_key: &str, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .user_agent(crate::USER_AGENT)
            .timeout(timeout)
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        })
    }

    /// Fetches current conditions plus a two day forecast for `location`,
    /// either `"lat,lon"` or a city name. Every call goes to the network.
    pub fn fetch(&self, location: &str) -> Result<ForecastResult, FetchError> {
        let location = location.trim();
        if location.is_empty() {
            return Err(FetchError::EmptyLocation);
        }

        let url = format!("{}/forecast.json", self.base_url);
        // Defeats intermediary caches.
        let timestamp = Utc::now().timestamp().to_string();
        let days = FORECAST_DAYS.to_string();
        debug!(%url, q = location, "requesting forecast");

        let response = self
            .client
            .get(&url)
            .query(&[
                ("key", self.api_key.as_str()),
                ("q", location),
                ("days", days.as_str()),
                ("aqi", "no"),
                ("lang", "ko"),
                ("t", timestamp.as_str()),
            ])
            .send()
            .map_err(|e| FetchError::Transport(e.without_url()))?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(FetchError::Status(status.as_u16()));
        }

        let body = response
            .text()
            .map_err(|e| FetchError::Transport(e.without_url()))?;
        let parsed: ForecastResponse = serde_json::from_str(&body)?;
        ForecastResult::try_from(parsed)
    }
}

#[derive(Deserialize, Debug)]
struct ForecastResponse {
    current: CurrentResponse,
    forecast: ForecastDays,
}

#[derive(Deserialize, Debug)]
struct CurrentResponse {
    temp_c: f64,
    feelslike_c: f64,
    humidity: u8,
    uv: f64,
    wind_kph: f64,
    condition: Condition,
    last_updated: String,
}

#[derive(Deserialize, Debug)]
struct Condition {
    text: String,
    icon: String,
}

#[derive(Deserialize, Debug)]
struct ForecastDays {
    forecastday: Vec<ForecastDay>,
}

#[derive(Deserialize, Debug)]
struct ForecastDay {
    astro: AstroResponse,
    day: DayResponse,
}

#[derive(Deserialize, Debug)]
struct AstroResponse {
    moon_phase: String,
}

#[derive(Deserialize, Debug)]
struct DayResponse {
    maxtemp_c: f64,
    mintemp_c: f64,
    daily_chance_of_rain: u8,
}

impl TryFrom<ForecastResponse> for ForecastResult {
    type Error = FetchError;

    fn try_from(resp: ForecastResponse) -> Result<Self, Self::Error> {
        let n = resp.forecast.forecastday.len();
        let mut days = resp.forecast.forecastday.into_iter();
        let (Some(today), Some(tomorrow)) = (days.next(), days.next()) else {
            return Err(FetchError::MissingForecastDay(n));
        };

        let current = resp.current;
        Ok(ForecastResult {
            current: Current {
                temperature: current.temp_c,
                feels_like: current.feelslike_c,
                humidity: current.humidity,
                uv: current.uv,
                wind_kph: current.wind_kph,
                text: current.condition.text,
                icon: absolute_icon_url(&current.condition.icon),
                last_updated: current.last_updated,
            },
            today: Astro {
                moon_phase: today.astro.moon_phase,
            },
            tomorrow: Daily {
                max_temp: tomorrow.day.maxtemp_c,
                min_temp: tomorrow.day.mintemp_c,
                chance_of_rain: tomorrow.day.daily_chance_of_rain,
            },
        })
    }
}

/// The provider hands out protocol-relative icon paths.
fn absolute_icon_url(icon: &str) -> String {
    if icon.starts_with("//") {
        format!("https:{icon}")
    } else {
        icon.to_string()
    }
}
