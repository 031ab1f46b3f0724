use std::str::FromStr;

use crate::error::ConfigError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Language {
    #[default]
    Korean,
    English,
}

impl Language {
    pub fn toggle(self) -> Self {
        match self {
            Language::Korean => Language::English,
            Language::English => Language::Korean,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Language::Korean => "한국어",
            Language::English => "English",
        }
    }

    pub fn labels(self) -> &'static Labels {
        match self {
            Language::Korean => &KOREAN,
            Language::English => &ENGLISH,
        }
    }

    /// Korean gets the illustrated phase name; English keeps the provider's.
    pub fn moon_phase(self, phase: &str) -> String {
        match self {
            Language::Korean => moon_phase_ko(phase).unwrap_or(phase).to_string(),
            Language::English => phase.to_string(),
        }
    }
}

impl FromStr for Language {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ko" | "kr" | "korean" | "한국어" => Ok(Language::Korean),
            "en" | "english" => Ok(Language::English),
            _ => Err(ConfigError::UnknownLanguage(s.to_string())),
        }
    }
}

pub struct Labels {
    pub title: &'static str,
    pub gps_button: &'static str,
    pub reset_button: &'static str,
    pub requesting: &'static str,
    pub current_location: &'static str,
    pub humidity: &'static str,
    pub feels_like: &'static str,
    pub uv: &'static str,
    pub moon_phase: &'static str,
    pub wind: &'static str,
    pub max: &'static str,
    pub min: &'static str,
    pub rain_chance: &'static str,
    pub tomorrow: &'static str,
    pub detail: &'static str,
    pub heat_warning: &'static str,
    pub country: &'static str,
    pub city: &'static str,
    pub language: &'static str,
    pub quit: &'static str,
}

pub static KOREAN: Labels = Labels {
    title: "🌡️ 실시간 날씨 대시보드",
    gps_button: "📍 내 위치로 날씨 보기 (GPS)",
    reset_button: "🔄 위치/데이터 초기화",
    requesting: "위치 정보를 요청 중입니다...",
    current_location: "📍 현재 내 위치 (GPS)",
    humidity: "습도",
    feels_like: "체감 온도",
    uv: "자외선",
    moon_phase: "달의 모양",
    wind: "풍속",
    max: "최고",
    min: "최저",
    rain_chance: "강수 확률",
    tomorrow: "내일 예보",
    detail: "📊 상세",
    heat_warning: "폭염 주의! 🥵",
    country: "국가",
    city: "도시",
    language: "언어",
    quit: "종료",
};

pub static ENGLISH: Labels = Labels {
    title: "🌡️ Weather Dashboard",
    gps_button: "📍 Use Current Location",
    reset_button: "🔄 Reset Location & Data",
    requesting: "Requesting location...",
    current_location: "📍 Current Location",
    humidity: "Humidity",
    feels_like: "Feels Like",
    uv: "UV Index",
    moon_phase: "Moon Phase",
    wind: "Wind",
    max: "Max",
    min: "Min",
    rain_chance: "Rain Chance",
    tomorrow: "Tomorrow",
    detail: "📊 Detail",
    heat_warning: "Heatwave Warning! 🥵",
    country: "Country",
    city: "City",
    language: "Language",
    quit: "Quit",
};

const MOON_PHASES_KO: [(&str, &str); 8] = [
    ("New Moon", "신월 🌑"),
    ("Waxing Crescent", "초승달 🌒"),
    ("First Quarter", "상현달 🌓"),
    ("Waxing Gibbous", "상현달과 보름달 사이 🌔"),
    ("Full Moon", "보름달 🌕"),
    ("Waning Gibbous", "보름달과 하현달 사이 🌖"),
    ("Last Quarter", "하현달 🌗"),
    ("Waning Crescent", "그믐달 🌘"),
];

fn moon_phase_ko(phase: &str) -> Option<&'static str> {
    MOON_PHASES_KO
        .iter()
        .find(|(name, _)| *name == phase)
        .map(|(_, label)| *label)
}
