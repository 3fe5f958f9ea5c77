use serde::Serialize;

use super::runner::Sample;

// ---------------------------------------------------------------------------
// Simulation events
// ---------------------------------------------------------------------------

/// Kinds of simulation events.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum EventKind {
    Liftoff,
    ThrustCutoff,
    Apogee,
    Impact,
    Custom(String),
}

/// A discrete event that occurred during simulation.
#[derive(Debug, Clone, Serialize)]
pub struct SimEvent {
    pub time: f64,
    pub kind: EventKind,
    pub altitude: f64,
    pub speed: f64,
}

/// Trait for passive event detectors.
/// Implementations inspect consecutive samples and report events.
pub trait EventDetector {
    fn check(&mut self, prev: &Sample, current: &Sample) -> Option<EventKind>;
}

/// Detects the end of the rail firing window.
pub struct CutoffDetector;

impl EventDetector for CutoffDetector {
    fn check(&mut self, prev: &Sample, current: &Sample) -> Option<EventKind> {
        if prev.thrust.norm() > 0.0 && current.thrust.norm() == 0.0 {
            Some(EventKind::ThrustCutoff)
        } else {
            None
        }
    }
}

/// Detects apogee (radial velocity going from positive to non-positive).
pub struct ApogeeDetector;

impl EventDetector for ApogeeDetector {
    fn check(&mut self, prev: &Sample, current: &Sample) -> Option<EventKind> {
        if prev.state.radial_speed() > 0.0 && current.state.radial_speed() <= 0.0 {
            Some(EventKind::Apogee)
        } else {
            None
        }
    }
}

/// Detects when altitude above a spherical Earth crosses a threshold.
pub struct AltitudeDetector {
    pub altitude: f64,
    pub ascending: bool,
    radius_earth: f64,
    fired: bool,
}

impl AltitudeDetector {
    pub fn new(altitude: f64, ascending: bool, radius_earth: f64) -> Self {
        Self { altitude, ascending, radius_earth, fired: false }
    }
}

impl EventDetector for AltitudeDetector {
    fn check(&mut self, prev: &Sample, current: &Sample) -> Option<EventKind> {
        if self.fired {
            return None;
        }
        let before = prev.state.altitude(self.radius_earth);
        let after = current.state.altitude(self.radius_earth);
        let crossed = if self.ascending {
            before < self.altitude && after >= self.altitude
        } else {
            before > self.altitude && after <= self.altitude
        };
        if crossed {
            self.fired = true;
            Some(EventKind::Custom(format!(
                "Altitude {:.0}m ({})",
                self.altitude,
                if self.ascending { "ascending" } else { "descending" }
            )))
        } else {
            None
        }
    }
}
