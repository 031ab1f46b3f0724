//! Where the forecast is for: GPS position or the manual pickers.
//!
//! The session only ever changes through [`SessionState::apply`], which is a
//! pure transition returning the side effects the event loop must carry out.

use tracing::debug;

use crate::catalog::{City, ManualSelection};
use crate::geo::{Coordinates, GeoOutcome, RequestId};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SessionEvent {
    /// Start of every tick, before anything is fetched or drawn.
    Evaluate,
    Geolocated {
        request: RequestId,
        outcome: GeoOutcome,
    },
    UseMyLocation,
    SelectionChanged,
    ResetLocation,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    RequestGeolocation(RequestId),
    /// State changed outside a normal tick; run a fresh one right away.
    Rerun,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    AutoPending,
    AutoResolved,
    AutoDenied,
    ManualActive,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionState {
    auto_gps_attempted: bool,
    resolved_location: Option<Coordinates>,
    pending: Option<RequestId>,
    next_request: u64,
    manual: bool,
}

/// The location actually sent to the provider for one tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Target {
    Gps(Coordinates),
    City(&'static City),
}

impl Target {
    pub fn query(&self) -> String {
        match self {
            Target::Gps(coords) => coords.to_string(),
            Target::City(city) => city.query.to_string(),
        }
    }
}

impl SessionState {
    pub fn auto_gps_attempted(&self) -> bool {
        self.auto_gps_attempted
    }

    pub fn resolved_location(&self) -> Option<Coordinates> {
        self.resolved_location
    }

    pub fn phase(&self) -> Phase {
        if self.pending.is_some() {
            Phase::AutoPending
        } else if self.resolved_location.is_some() {
            Phase::AutoResolved
        } else if self.manual {
            Phase::ManualActive
        } else if self.auto_gps_attempted() {
            Phase::AutoDenied
        } else {
            Phase::Idle
        }
    }

    /// A resolved GPS position always wins over the pickers.
    pub fn target(&self, selection: &ManualSelection) -> Target {
        match self.resolved_location() {
            Some(coords) => Target::Gps(coords),
            None => Target::City(selection.city()),
        }
    }

    pub fn apply(mut self, event: SessionEvent) -> (Self, Vec<Effect>) {
        let mut effects = Vec::new();
        match event {
            SessionEvent::Evaluate => {
                if !self.auto_gps_attempted && self.pending.is_none() {
                    self.next_request += 1;
                    let id = RequestId(self.next_request);
                    self.pending = Some(id);
                    effects.push(Effect::RequestGeolocation(id));
                }
            }
            SessionEvent::Geolocated { request, outcome } => {
                if self.pending != Some(request) {
                    debug!(request = request.0, "dropping stale geolocation result");
                    return (self, effects);
                }
                self.pending = None;
                self.auto_gps_attempted = true;
                if let GeoOutcome::Located(coords) = outcome {
                    self.resolved_location = Some(coords);
                    self.manual = false;
                }
                effects.push(Effect::Rerun);
            }
            SessionEvent::UseMyLocation => {
                self.auto_gps_attempted = false;
                self.resolved_location = None;
                self.pending = None;
                self.manual = false;
                effects.push(Effect::Rerun);
            }
            SessionEvent::SelectionChanged => {
                // A lookup still in flight stays live and wins when it lands.
                self.resolved_location = None;
                self.manual = true;
            }
            SessionEvent::ResetLocation => {
                if self.resolved_location.take().is_some() {
                    self.manual = true;
                    effects.push(Effect::Rerun);
                }
            }
        }
        debug!(?event, phase = ?self.phase(), ?effects, "session transition");
        (self, effects)
    }
}
