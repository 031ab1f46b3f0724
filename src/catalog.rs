//! The fixed country/city table behind the two location pickers.

use crate::error::ConfigError;

#[derive(Debug, PartialEq)]
pub struct City {
    /// Name sent to the weather provider.
    pub query: &'static str,
    pub local: &'static str,
}

#[derive(Debug, PartialEq)]
pub struct Country {
    pub name: &'static str,
    pub local: &'static str,
    pub cities: &'static [City],
}

impl Country {
    pub fn label(&self) -> String {
        format!("{} ({})", self.name, self.local)
    }
}

impl City {
    pub fn label(&self) -> String {
        format!("{} ({})", self.query, self.local)
    }
}

macro_rules! city {
    ($query:expr, $local:expr) => {
        City {
            query: $query,
            local: $local,
        }
    };
}

pub const COUNTRIES: &[Country] = &[
    Country {
        name: "South Korea",
        local: "한국",
        cities: &[
            city!("Seoul", "서울"),
            city!("Busan", "부산"),
            city!("Asan", "아산"),
            city!("Boeun", "보은"),
            city!("Incheon", "인천"),
            city!("Daegu", "대구"),
            city!("Daejeon", "대전"),
            city!("Jeju", "제주"),
        ],
    },
    Country {
        name: "USA",
        local: "미국",
        cities: &[
            city!("New York", "뉴욕"),
            city!("Los Angeles", "로스앤젤레스"),
            city!("Chicago", "시카고"),
        ],
    },
    Country {
        name: "Japan",
        local: "일본",
        cities: &[
            city!("Tokyo", "도쿄"),
            city!("Osaka", "오사카"),
            city!("Nagoya", "나고야"),
        ],
    },
    Country {
        name: "United Kingdom",
        local: "영국",
        cities: &[city!("London", "런던"), city!("Manchester", "맨체스터")],
    },
    Country {
        name: "France",
        local: "프랑스",
        cities: &[city!("Paris", "파리"), city!("Nice", "니스")],
    },
    Country {
        name: "Germany",
        local: "독일",
        cities: &[city!("Berlin", "베를린"), city!("Munich", "뮌헨")],
    },
    Country {
        name: "China",
        local: "중국",
        cities: &[city!("Beijing", "베이징"), city!("Shanghai", "상하이")],
    },
];

/// Current position of the country and city pickers.
///
/// The city index is always valid for the selected country: moving the
/// country picker starts the city picker over at the first city.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ManualSelection {
    country: usize,
    city: usize,
}

impl ManualSelection {
    /// Looks up a selection by country and (optional) city name. Matching is
    /// case-insensitive against either the English or the Korean name.
    pub fn find(country: &str, city: Option<&str>) -> Result<Self, ConfigError> {
        let country_idx = COUNTRIES
            .iter()
            .position(|c| matches_name(country, c.name, c.local))
            .ok_or_else(|| ConfigError::UnknownCountry(country.to_string()))?;

        let city_idx = match city {
            None => 0,
            Some(city) => COUNTRIES[country_idx]
                .cities
                .iter()
                .position(|c| matches_name(city, c.query, c.local))
                .ok_or_else(|| ConfigError::UnknownCity {
                    country: country.to_string(),
                    city: city.to_string(),
                })?,
        };

        Ok(Self {
            country: country_idx,
            city: city_idx,
        })
    }

    pub fn country(&self) -> &'static Country {
        &COUNTRIES[self.country]
    }

    pub fn city(&self) -> &'static City {
        &self.country().cities[self.city]
    }

    pub fn next_country(self) -> Self {
        Self {
            country: (self.country + 1) % COUNTRIES.len(),
            city: 0,
        }
    }

    pub fn prev_country(self) -> Self {
        Self {
            country: (self.country + COUNTRIES.len() - 1) % COUNTRIES.len(),
            city: 0,
        }
    }

    pub fn next_city(self) -> Self {
        let n = self.country().cities.len();
        Self {
            city: (self.city + 1) % n,
            ..self
        }
    }

    pub fn prev_city(self) -> Self {
        let n = self.country().cities.len();
        Self {
            city: (self.city + n - 1) % n,
            ..self
        }
    }
}

fn matches_name(wanted: &str, name: &str, local: &str) -> bool {
    let wanted = wanted.trim();
    wanted.eq_ignore_ascii_case(name) || wanted == local
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_country_has_cities() {
        for country in COUNTRIES {
            assert!(!country.cities.is_empty(), "{}", country.name);
        }
    }

    #[test]
    fn changing_country_picks_from_the_new_country() {
        let mut sel = ManualSelection::find("Japan", Some("Osaka")).unwrap();
        for _ in 0..COUNTRIES.len() * 2 {
            sel = sel.next_country();
            let country = sel.country();
            assert!(country
                .cities
                .iter()
                .any(|c| c.query == sel.city().query));
            assert_eq!(sel.city().query, country.cities[0].query);
        }
        for _ in 0..COUNTRIES.len() * 2 {
            sel = sel.prev_country();
            assert_eq!(sel.city().query, sel.country().cities[0].query);
        }
    }

    #[test]
    fn city_cycling_stays_within_country() {
        let start = ManualSelection::find("France", None).unwrap();
        assert_eq!(start.city().query, "Paris");
        let next = start.next_city();
        assert_eq!(next.city().query, "Nice");
        assert_eq!(next.next_city().city().query, "Paris");
        assert_eq!(start.prev_city().city().query, "Nice");
        assert_eq!(next.country().name, "France");
    }

    #[test]
    fn find_accepts_korean_names() {
        let sel = ManualSelection::find("일본", Some("오사카")).unwrap();
        assert_eq!(sel.city().label(), "Osaka (오사카)");
        assert_eq!(sel.country().label(), "Japan (일본)");
    }

    #[test]
    fn find_rejects_unknown_names() {
        assert!(matches!(
            ManualSelection::find("Atlantis", None),
            Err(ConfigError::UnknownCountry(_))
        ));
        assert!(matches!(
            ManualSelection::find("Japan", Some("Paris")),
            Err(ConfigError::UnknownCity { .. })
        ));
    }

    #[test]
    fn default_is_seoul() {
        assert_eq!(ManualSelection::default().city().query, "Seoul");
    }
}
