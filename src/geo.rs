//! Device location lookup.
//!
//! A terminal has no browser permission prompt, so "where am I" is answered
//! by a pluggable [`Geolocator`]. Lookups run on a worker thread and report
//! back through the event loop's channel, which keeps every state change on
//! the loop's thread.

use std::fmt;
use std::sync::mpsc::Sender;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use reqwest::blocking::Client;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::app::AppEvent;

pub const DEFAULT_IP_ENDPOINT: &str = "http://ip-api.com/json";

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl fmt::Display for Coordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.latitude, self.longitude)
    }
}

/// Identifies one geolocation attempt so late answers to an abandoned
/// attempt can be told apart from the current one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RequestId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GeoOutcome {
    Located(Coordinates),
    /// Denied, unavailable or failed. Not an error for the dashboard.
    Unavailable,
}

impl From<Option<Coordinates>> for GeoOutcome {
    fn from(coords: Option<Coordinates>) -> Self {
        match coords {
            Some(c) => GeoOutcome::Located(c),
            None => GeoOutcome::Unavailable,
        }
    }
}

pub trait Geolocator: Send + Sync {
    /// Blocks until a position is known or the lookup gives up.
    fn locate(&self) -> Option<Coordinates>;
}

/// Approximates the device position from its public IP address.
pub struct IpGeolocator {
    client: Client,
    endpoint: String,
}

#[derive(Deserialize, Debug)]
struct IpLookup {
    status: String,
    lat: Option<f64>,
    lon: Option<f64>,
}

impl IpGeolocator {
    pub fn new(endpoint: &str, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .user_agent(crate::USER_AGENT)
            .timeout(timeout)
            .build()?;
        Ok(Self {
            client,
            endpoint: endpoint.to_string(),
        })
    }

    fn lookup(&self) -> Result<Option<Coordinates>, reqwest::Error> {
        let body: IpLookup = self.client.get(&self.endpoint).send()?.error_for_status()?.json()?;
        if body.status != "success" {
            debug!(status = %body.status, "ip lookup refused");
            return Ok(None);
        }
        Ok(match (body.lat, body.lon) {
            (Some(latitude), Some(longitude)) => Some(Coordinates {
                latitude,
                longitude,
            }),
            _ => None,
        })
    }
}

impl Geolocator for IpGeolocator {
    fn locate(&self) -> Option<Coordinates> {
        match self.lookup() {
            Ok(coords) => coords,
            Err(err) => {
                warn!("ip geolocation failed: {}", err.without_url());
                None
            }
        }
    }
}

/// Always answers with the same position.
pub struct FixedGeolocator(pub Coordinates);

impl Geolocator for FixedGeolocator {
    fn locate(&self) -> Option<Coordinates> {
        Some(self.0)
    }
}

/// Behaves like a user who never grants location access.
pub struct DisabledGeolocator;

impl Geolocator for DisabledGeolocator {
    fn locate(&self) -> Option<Coordinates> {
        None
    }
}

/// Runs lookups off the event loop and posts the answer back into it.
#[derive(Clone)]
pub struct GeoDispatcher {
    locator: Arc<dyn Geolocator>,
    events: Sender<AppEvent>,
}

impl GeoDispatcher {
    pub fn new(locator: Arc<dyn Geolocator>, events: Sender<AppEvent>) -> Self {
        Self { locator, events }
    }

    /// Returns immediately; the outcome arrives later as
    /// [`AppEvent::Geolocated`].
    pub fn request(&self, request: RequestId) {
        let locator = Arc::clone(&self.locator);
        let events = self.events.clone();
        debug!(request = request.0, "geolocation requested");
        thread::spawn(move || {
            let outcome = GeoOutcome::from(locator.locate());
            // The loop may already be gone if the user quit meanwhile.
            let _ = events.send(AppEvent::Geolocated { request, outcome });
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn mock_endpoint(rt: &tokio::runtime::Runtime, template: ResponseTemplate) -> MockServer {
        rt.block_on(async {
            let server = MockServer::start().await;
            Mock::given(method("GET"))
                .and(path("/json"))
                .respond_with(template)
                .mount(&server)
                .await;
            server
        })
    }

    #[test]
    fn coordinates_format_as_query() {
        let c = Coordinates {
            latitude: 37.5665,
            longitude: 126.978,
        };
        assert_eq!(c.to_string(), "37.5665,126.978");
    }

    #[test]
    fn ip_lookup_success() {
        let rt = tokio::runtime::Runtime::new().unwrap();
        let server = mock_endpoint(
            &rt,
            ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "status": "success",
                "lat": 34.6937,
                "lon": 135.5023
            })),
        );
        let locator =
            IpGeolocator::new(&format!("{}/json", server.uri()), Duration::from_secs(5)).unwrap();
        assert_eq!(
            locator.locate(),
            Some(Coordinates {
                latitude: 34.6937,
                longitude: 135.5023
            })
        );
    }

    #[test]
    fn ip_lookup_refusal_is_no_location() {
        let rt = tokio::runtime::Runtime::new().unwrap();
        let server = mock_endpoint(
            &rt,
            ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "status": "fail",
                "message": "reserved range"
            })),
        );
        let locator =
            IpGeolocator::new(&format!("{}/json", server.uri()), Duration::from_secs(5)).unwrap();
        assert_eq!(locator.locate(), None);
    }

    #[test]
    fn ip_lookup_server_error_is_no_location() {
        let rt = tokio::runtime::Runtime::new().unwrap();
        let server = mock_endpoint(&rt, ResponseTemplate::new(503));
        let locator =
            IpGeolocator::new(&format!("{}/json", server.uri()), Duration::from_secs(5)).unwrap();
        assert_eq!(locator.locate(), None);
    }

    #[test]
    fn dispatcher_posts_outcome() {
        let (tx, rx) = mpsc::channel();
        let c = Coordinates {
            latitude: 1.5,
            longitude: -2.25,
        };
        GeoDispatcher::new(Arc::new(FixedGeolocator(c)), tx.clone()).request(RequestId(7));
        match rx.recv_timeout(Duration::from_secs(5)).unwrap() {
            AppEvent::Geolocated { request, outcome } => {
                assert_eq!(request, RequestId(7));
                assert_eq!(outcome, GeoOutcome::Located(c));
            }
            other => panic!("unexpected event {other:?}"),
        }

        GeoDispatcher::new(Arc::new(DisabledGeolocator), tx).request(RequestId(8));
        match rx.recv_timeout(Duration::from_secs(5)).unwrap() {
            AppEvent::Geolocated { request, outcome } => {
                assert_eq!(request, RequestId(8));
                assert_eq!(outcome, GeoOutcome::Unavailable);
            }
            other => panic!("unexpected event {other:?}"),
        }
    }
}
