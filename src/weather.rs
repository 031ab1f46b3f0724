/// Everything one tick shows about a location. Built fresh from every
/// response and dropped after the tick is drawn.
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastResult {
    pub current: Current,
    pub today: Astro,
    pub tomorrow: Daily,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Current {
    pub temperature: f64,
    pub feels_like: f64,
    pub humidity: u8,
    pub uv: f64,
    pub wind_kph: f64,
    pub text: String,
    /// Absolute URL of the provider's condition icon.
    pub icon: String,
    pub last_updated: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Astro {
    pub moon_phase: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Daily {
    pub max_temp: f64,
    pub min_temp: f64,
    pub chance_of_rain: u8,
}

pub const HEAT_WARNING_C: f64 = 32.0;

impl Current {
    pub fn is_heatwave(&self) -> bool {
        self.temperature >= HEAT_WARNING_C
    }
}
