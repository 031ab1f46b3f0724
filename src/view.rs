//! What one tick puts on screen, independent of how it is laid out.

use crate::catalog::ManualSelection;
use crate::error::FetchError;
use crate::locale::Language;
use crate::session::{Phase, Target};
use crate::weather::ForecastResult;

#[derive(Debug, Clone, PartialEq)]
pub struct Dashboard {
    pub language: Language,
    pub country: String,
    pub city: String,
    /// Shown while a location lookup is in flight.
    pub notice: Option<&'static str>,
    /// Reset only makes sense while a GPS position is in effect.
    pub can_reset: bool,
    pub location_name: String,
    pub body: Body,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Body {
    Report(Report),
    Error(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    pub temperature: String,
    pub condition: String,
    pub icon: String,
    pub heat_warning: Option<&'static str>,
    pub details: Vec<(&'static str, String)>,
    pub wind: String,
    pub moon: String,
    pub tomorrow_range: String,
    pub rain: String,
    pub last_update: String,
}

impl Dashboard {
    pub fn build(
        language: Language,
        phase: Phase,
        selection: &ManualSelection,
        target: &Target,
        forecast: &Result<ForecastResult, FetchError>,
    ) -> Self {
        let labels = language.labels();
        let location_name = match target {
            Target::Gps(_) => labels.current_location.to_string(),
            Target::City(city) => city.label(),
        };
        let body = match forecast {
            Ok(result) => Body::Report(Report::build(language, result)),
            Err(err) => Body::Error(err.to_string()),
        };

        Self {
            language,
            country: selection.country().label(),
            city: selection.city().label(),
            notice: (phase == Phase::AutoPending).then_some(labels.requesting),
            can_reset: matches!(target, Target::Gps(_)),
            location_name,
            body,
        }
    }
}

impl Report {
    fn build(language: Language, result: &ForecastResult) -> Self {
        let labels = language.labels();
        let current = &result.current;
        let tomorrow = &result.tomorrow;

        Self {
            temperature: format!("{}°C", current.temperature),
            condition: current.text.clone(),
            icon: current.icon.clone(),
            heat_warning: current.is_heatwave().then_some(labels.heat_warning),
            details: vec![
                (labels.feels_like, format!("{}°C", current.feels_like)),
                (labels.humidity, format!("{}%", current.humidity)),
                (labels.uv, format!("{}", current.uv)),
            ],
            wind: format!("💨 {}: {} km/h", labels.wind, current.wind_kph),
            moon: format!(
                "🌙 {}: {}",
                labels.moon_phase,
                language.moon_phase(&result.today.moon_phase)
            ),
            tomorrow_range: format!(
                "📈 {}/{}: {}/{}°C",
                labels.max, labels.min, tomorrow.max_temp, tomorrow.min_temp
            ),
            rain: format!("☔ {}: {}%", labels.rain_chance, tomorrow.chance_of_rain),
            last_update: format!("Last Update: {}", current.last_updated),
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::geo::Coordinates;
    use crate::weather::{Astro, Current, Daily};

    pub(crate) fn osaka_forecast() -> ForecastResult {
        ForecastResult {
            current: Current {
                temperature: 33.0,
                feels_like: 35.0,
                humidity: 40,
                uv: 6.0,
                wind_kph: 11.2,
                text: "맑음".to_string(),
                icon: "https://cdn.weatherapi.com/weather/64x64/day/113.png".to_string(),
                last_updated: "2026-08-01 14:30".to_string(),
            },
            today: Astro {
                moon_phase: "Full Moon".to_string(),
            },
            tomorrow: Daily {
                max_temp: 30.0,
                min_temp: 22.0,
                chance_of_rain: 10,
            },
        }
    }

    fn osaka() -> (ManualSelection, Target) {
        let sel = ManualSelection::find("Japan", Some("Osaka")).unwrap();
        (sel, Target::City(sel.city()))
    }

    fn report(dash: &Dashboard) -> &Report {
        match &dash.body {
            Body::Report(r) => r,
            Body::Error(e) => panic!("unexpected error body: {e}"),
        }
    }

    #[test]
    fn osaka_in_korean() {
        let (sel, target) = osaka();
        let dash = Dashboard::build(
            Language::Korean,
            Phase::ManualActive,
            &sel,
            &target,
            &Ok(osaka_forecast()),
        );
        let r = report(&dash);
        assert_eq!(dash.location_name, "Osaka (오사카)");
        assert_eq!(r.heat_warning, Some("폭염 주의! 🥵"));
        assert!(r.moon.ends_with("보름달 🌕"));
        assert!(r.tomorrow_range.ends_with("30/22°C"));
        assert!(r.rain.ends_with("10%"));
        assert_eq!(r.details[1], ("습도", "40%".to_string()));
        assert_eq!(r.details[0].1, "35°C");
        assert!(!dash.can_reset);
        assert_eq!(dash.notice, None);
    }

    #[test]
    fn osaka_in_english() {
        let (sel, target) = osaka();
        let dash = Dashboard::build(
            Language::English,
            Phase::ManualActive,
            &sel,
            &target,
            &Ok(osaka_forecast()),
        );
        let r = report(&dash);
        assert_eq!(r.heat_warning, Some("Heatwave Warning! 🥵"));
        assert_eq!(r.moon, "🌙 Moon Phase: Full Moon");
        assert_eq!(r.tomorrow_range, "📈 Max/Min: 30/22°C");
        assert_eq!(r.rain, "☔ Rain Chance: 10%");
        assert_eq!(r.last_update, "Last Update: 2026-08-01 14:30");
    }

    #[test]
    fn no_warning_below_threshold() {
        let (sel, target) = osaka();
        let mut forecast = osaka_forecast();
        forecast.current.temperature = 31.5;
        let dash = Dashboard::build(Language::English, Phase::Idle, &sel, &target, &Ok(forecast));
        assert_eq!(report(&dash).heat_warning, None);
        assert_eq!(report(&dash).temperature, "31.5°C");
    }

    #[test]
    fn error_replaces_the_data_section() {
        let (sel, target) = osaka();
        let dash = Dashboard::build(
            Language::English,
            Phase::ManualActive,
            &sel,
            &target,
            &Err(FetchError::Status(500)),
        );
        assert_eq!(dash.body, Body::Error("API Error: 500".to_string()));
        assert_eq!(dash.city, "Osaka (오사카)");
    }

    #[test]
    fn gps_target_uses_current_location_name() {
        let sel = ManualSelection::default();
        let target = Target::Gps(Coordinates {
            latitude: 1.0,
            longitude: 2.0,
        });
        let dash = Dashboard::build(
            Language::Korean,
            Phase::AutoResolved,
            &sel,
            &target,
            &Ok(osaka_forecast()),
        );
        assert_eq!(dash.location_name, "📍 현재 내 위치 (GPS)");
        assert!(dash.can_reset);
    }

    #[test]
    fn pending_lookup_shows_notice() {
        let (sel, target) = osaka();
        let dash = Dashboard::build(
            Language::English,
            Phase::AutoPending,
            &sel,
            &target,
            &Err(FetchError::Status(503)),
        );
        assert_eq!(dash.notice, Some("Requesting location..."));
    }
}
