use nalgebra::Vector3;

use crate::config::LauncherConfig;
use crate::physics::rotations::{dcm_from_euler, local_frame};

// ---------------------------------------------------------------------------
// Electromagnetic rail accelerator
// ---------------------------------------------------------------------------

/// Launch sequence phase at a given simulation time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LaunchPhase {
    Armed,
    Firing,
    Spent,
}

/// Rail accelerator acting as a constant, time-windowed thrust source.
#[derive(Debug, Clone)]
pub struct Accelerator {
    pub rail_length: f64,       // m
    pub cap_voltage: f64,       // V
    pub cap_capacitance: f64,   // F
    pub efficiency: f64,        // fraction of stored energy delivered
    pub thrust_override: Option<f64>, // N
    pub launch_start: f64,      // s
    pub thrust_cutoff: f64,     // s
    direction: Vector3<f64>,    // unit, ECEF
}

impl Accelerator {
    /// Build from config, aiming the rail from the launch site at `site`
    /// (ECEF, m).
    ///
    /// The rail's body x-axis points along local vertical at zero attitude;
    /// roll/pitch/yaw rotate it within the `[up, east, north]` frame.
    pub fn from_config(cfg: &LauncherConfig, site: &Vector3<f64>) -> Self {
        let [roll, pitch, yaw] = cfg.orientation.unwrap_or([0.0, 0.0, 0.0]);
        let direction = rail_direction(site, roll, pitch, yaw);
        Self {
            rail_length: cfg.rail_length,
            cap_voltage: cfg.cap_voltage,
            cap_capacitance: cfg.cap_capacitance,
            efficiency: cfg.efficiency,
            thrust_override: cfg.thrust,
            launch_start: cfg.launch_start,
            thrust_cutoff: cfg.thrust_cutoff,
            direction,
        }
    }

    /// Energy held by the capacitor bank: `C V^2 / 2`, J.
    pub fn stored_energy(&self) -> f64 {
        0.5 * self.cap_capacitance * self.cap_voltage * self.cap_voltage
    }

    /// Mean rail force: delivered energy spread over the rail length, N.
    pub fn thrust_magnitude(&self) -> f64 {
        match self.thrust_override {
            Some(f) => f,
            None => self.efficiency * self.stored_energy() / self.rail_length,
        }
    }

    pub fn direction(&self) -> Vector3<f64> {
        self.direction
    }

    pub fn phase(&self, t: f64) -> LaunchPhase {
        if t < self.launch_start {
            LaunchPhase::Armed
        } else if t < self.thrust_cutoff {
            LaunchPhase::Firing
        } else {
            LaunchPhase::Spent
        }
    }

    /// Thrust vector at time `t` (ECEF, N). Zero outside the firing window.
    pub fn thrust(&self, t: f64) -> Vector3<f64> {
        match self.phase(t) {
            LaunchPhase::Firing => self.direction * self.thrust_magnitude(),
            LaunchPhase::Armed | LaunchPhase::Spent => Vector3::zeros(),
        }
    }

    /// Ideal muzzle speed in vacuum for a projectile of `mass` kg.
    pub fn ideal_delta_v(&self, mass: f64) -> f64 {
        self.thrust_magnitude() / mass * (self.thrust_cutoff - self.launch_start)
    }
}

/// Unit thrust direction in ECEF for a rail at `site` with the given attitude.
pub fn rail_direction(site: &Vector3<f64>, roll: f64, pitch: f64, yaw: f64) -> Vector3<f64> {
    let body_x_local = dcm_from_euler(yaw, pitch, roll).transpose() * Vector3::x();
    (local_frame(site) * body_x_local).normalize()
}
