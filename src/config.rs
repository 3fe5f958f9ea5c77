//! Simulation configuration.
//!
//! Every physical constant the simulator needs is carried here and passed
//! down explicitly, so several runs with different parameters can coexist.
//! The defaults reproduce the reference launch from Santa Cruz, CA.
//!
//! ```yaml
//! timing:
//!   dt: 0.05            # fixed propagation step, s
//!   t0: 0.0             # start time, s
//!   tf: 4000.0          # stop time, s
//! projectile:
//!   mass: 1252.0        # kg
//!   initial_position: [-2705678.0, -4325150.0, 3815106.0]   # ECEF, m
//! planet:
//!   g: 6.67408e-11
//!   mass_earth: 5.972e24
//!   radius_earth: 6371000.0
//!   min_radius: 6000000.0
//! launcher:
//!   thrust_cutoff: 10.0
//!   orientation: [0.0, 0.6, 0.0]   # roll, pitch, yaw of the rail, rad
//! display_every: 200
//! ```

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Sections
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    pub dt: f64, // s
    pub t0: f64, // s
    pub tf: f64, // s
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self { dt: 0.05, t0: 0.0, tf: 4000.0 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectileConfig {
    pub mass: f64,                   // kg
    pub initial_position: [f64; 3],  // m, ECEF
}

impl Default for ProjectileConfig {
    fn default() -> Self {
        Self {
            mass: 1252.0,
            initial_position: [-2_705_678.0, -4_325_150.0, 3_815_106.0],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlanetConfig {
    pub g: f64,            // gravitational constant, m^3 kg^-1 s^-2
    pub mass_earth: f64,   // kg
    pub radius_earth: f64, // m
    /// Gravity is refused below this distance from the centre, m.
    pub min_radius: f64,
}

impl Default for PlanetConfig {
    fn default() -> Self {
        Self {
            g: 6.674_08e-11,
            mass_earth: 5.972e24,
            radius_earth: 6_371_000.0,
            min_radius: 6_000_000.0,
        }
    }
}

impl PlanetConfig {
    /// Standard gravitational parameter G * M_earth, m^3/s^2.
    pub fn mu(&self) -> f64 {
        self.g * self.mass_earth
    }
}

/// Electromagnetic rail accelerator parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LauncherConfig {
    pub rail_length: f64,      // m
    pub cap_voltage: f64,      // V
    pub cap_capacitance: f64,  // F
    /// Fraction of stored capacitor energy delivered to the projectile.
    pub efficiency: f64,
    /// Fixed thrust magnitude, N. Overrides the capacitor estimate.
    pub thrust: Option<f64>,
    pub launch_start: f64,     // s
    pub thrust_cutoff: f64,    // s
    /// Rail attitude `[roll, pitch, yaw]`, rad. `None` fires straight up.
    pub orientation: Option<[f64; 3]>,
}

impl Default for LauncherConfig {
    fn default() -> Self {
        Self {
            rail_length: 1000.0,
            cap_voltage: 20_000.0,
            cap_capacitance: 10.0,
            efficiency: 0.3,
            thrust: None,
            launch_start: 0.0,
            thrust_cutoff: 10.0,
            orientation: None,
        }
    }
}

// ---------------------------------------------------------------------------
// Top level
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    pub timing: TimingConfig,
    pub projectile: ProjectileConfig,
    pub planet: PlanetConfig,
    pub launcher: LauncherConfig,
    /// Log a progress line every N physics steps (0 disables).
    pub display_every: usize,
}

impl SimConfig {
    pub fn from_yaml_str(text: &str) -> Result<Self, ConfigError> {
        let config: SimConfig = serde_yaml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(format!("{}: {}", path.display(), e)))?;
        log::info!("loading scenario from {}", path.display());
        Self::from_yaml_str(&text)
    }

    /// Number of fixed steps between `t0` and `tf`.
    pub fn steps(&self) -> usize {
        ((self.timing.tf - self.timing.t0) / self.timing.dt).round() as usize
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("timing.dt", self.timing.dt),
            ("projectile.mass", self.projectile.mass),
            ("planet.g", self.planet.g),
            ("planet.mass_earth", self.planet.mass_earth),
            ("planet.radius_earth", self.planet.radius_earth),
            ("planet.min_radius", self.planet.min_radius),
            ("launcher.rail_length", self.launcher.rail_length),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::Invalid(format!("{} must be positive, got {}", name, value)));
            }
        }
        if self.timing.tf <= self.timing.t0 {
            return Err(ConfigError::Invalid(format!(
                "timing.tf ({}) must be after timing.t0 ({})",
                self.timing.tf, self.timing.t0
            )));
        }
        if self.launcher.thrust_cutoff < self.launcher.launch_start {
            return Err(ConfigError::Invalid(
                "launcher.thrust_cutoff precedes launcher.launch_start".into(),
            ));
        }
        if !(0.0..=1.0).contains(&self.launcher.efficiency) {
            return Err(ConfigError::Invalid(format!(
                "launcher.efficiency must lie in [0, 1], got {}",
                self.launcher.efficiency
            )));
        }
        if self.projectile.initial_position.iter().any(|v| !v.is_finite()) {
            return Err(ConfigError::Invalid("projectile.initial_position is not finite".into()));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub enum ConfigError {
    Io(String),
    Parse(serde_yaml::Error),
    Invalid(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(msg) => write!(f, "cannot read config: {}", msg),
            Self::Parse(e) => write!(f, "cannot parse config: {}", e),
            Self::Invalid(msg) => write!(f, "invalid config: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<serde_yaml::Error> for ConfigError {
    fn from(e: serde_yaml::Error) -> Self {
        Self::Parse(e)
    }
}
