use std::fmt;

use nalgebra::Vector3;

use super::event::{ApogeeDetector, CutoffDetector, EventDetector, EventKind, SimEvent};
use crate::config::{ConfigError, SimConfig};
use crate::dynamics::{DynamicsError, Model, State};
use crate::launch::{Accelerator, LaunchPhase};
use crate::physics::{net_force, ForceError};

// ---------------------------------------------------------------------------
// Trajectory data
// ---------------------------------------------------------------------------

/// State of the projectile at one physics step, with the force that will
/// drive the next step.
#[derive(Debug, Clone)]
pub struct Sample {
    pub time: f64,
    pub state: State,
    pub thrust: Vector3<f64>, // N, ECEF
    pub force: Vector3<f64>,  // N, net (thrust + gravity)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    EndTime,
    Impact,
}

/// Recorded launch. Always holds at least the initial sample.
#[derive(Debug, Clone)]
pub struct Trajectory {
    samples: Vec<Sample>,
    events: Vec<SimEvent>,
    termination: Termination,
}

impl Trajectory {
    pub fn new(initial: Sample) -> Self {
        Self {
            samples: vec![initial],
            events: Vec::new(),
            termination: Termination::EndTime,
        }
    }

    pub fn push(&mut self, sample: Sample) {
        self.samples.push(sample);
    }

    pub fn record(&mut self, event: SimEvent) {
        self.events.push(event);
    }

    pub fn set_termination(&mut self, termination: Termination) {
        self.termination = termination;
    }

    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    pub fn events(&self) -> &[SimEvent] {
        &self.events
    }

    pub fn termination(&self) -> Termination {
        self.termination
    }

    pub fn first(&self) -> &Sample {
        &self.samples[0]
    }

    pub fn last(&self) -> &Sample {
        &self.samples[self.samples.len() - 1]
    }

    pub fn first_event(&self, kind: &EventKind) -> Option<&SimEvent> {
        self.events.iter().find(|e| &e.kind == kind)
    }
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub enum SimError {
    Config(ConfigError),
    Dynamics { time: f64, source: DynamicsError },
    Gravity { time: f64, source: ForceError },
}

impl fmt::Display for SimError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(e) => write!(f, "{}", e),
            Self::Dynamics { time, source } => write!(f, "t={:.3}s: {}", time, source),
            Self::Gravity { time, source } => write!(f, "t={:.3}s: {}", time, source),
        }
    }
}

impl std::error::Error for SimError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Config(e) => Some(e),
            Self::Dynamics { source, .. } => Some(source),
            Self::Gravity { source, .. } => Some(source),
        }
    }
}

impl From<ConfigError> for SimError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

// ---------------------------------------------------------------------------
// Force evaluation (collaborator side of the propagation core)
// ---------------------------------------------------------------------------

/// Distance above the launch radius still counted as resting on the rail, m.
const GROUND_TOLERANCE: f64 = 1e-6;

fn sample_at(
    config: &SimConfig,
    launcher: &Accelerator,
    state: &State,
    time: f64,
    grounded: bool,
) -> Result<Sample, SimError> {
    let thrust = launcher.thrust(time);
    let force = match launcher.phase(time) {
        // The rail carries the projectile's weight until the launch fires.
        LaunchPhase::Armed => Vector3::zeros(),
        LaunchPhase::Firing | LaunchPhase::Spent => {
            let net = net_force(&config.planet, &state.pos, state.mass, &thrust)
                .map_err(|source| SimError::Gravity { time, source })?;
            // On the ground only an outward net force moves the projectile.
            if grounded && net.dot(&state.pos) <= 0.0 {
                Vector3::zeros()
            } else {
                net
            }
        }
    };
    Ok(Sample { time, state: state.clone(), thrust, force })
}

// ---------------------------------------------------------------------------
// Full launch simulation
// ---------------------------------------------------------------------------

/// Simulate a launch with the default detectors (thrust cutoff, apogee).
pub fn simulate(config: &SimConfig) -> Result<Trajectory, SimError> {
    let mut detectors: Vec<Box<dyn EventDetector>> =
        vec![Box::new(CutoffDetector), Box::new(ApogeeDetector)];
    simulate_with(config, &mut detectors)
}

/// Step the launch from `t0` to `tf` (or ground impact) at the fixed `dt`.
///
/// Each step evaluates thrust and gravity on the current state, advances
/// the state vector through the discrete model, and copies the result back
/// into the projectile state.
pub fn simulate_with(
    config: &SimConfig,
    detectors: &mut [Box<dyn EventDetector>],
) -> Result<Trajectory, SimError> {
    config.validate()?;

    let [x0, y0, z0] = config.projectile.initial_position;
    let mut state = State::new(x0, y0, z0, config.projectile.mass);
    let launcher = Accelerator::from_config(&config.launcher, &state.pos);
    if let Some([roll, pitch, yaw]) = config.launcher.orientation {
        state.set_orientation(roll, pitch, yaw);
    }

    let t0 = config.timing.t0;
    let dt = config.timing.dt;
    let mut model = Model::new(&state, dt, config.projectile.mass)
        .map_err(|source| SimError::Dynamics { time: t0, source })?;

    log::info!(
        "launch: thrust {:.0} N for {:.1} s, ideal delta-v {:.0} m/s",
        launcher.thrust_magnitude(),
        config.launcher.thrust_cutoff - config.launcher.launch_start,
        launcher.ideal_delta_v(config.projectile.mass),
    );

    let ground = state.radius();
    let steps = config.steps();
    let mut traj = Trajectory::new(sample_at(config, &launcher, &state, t0, true)?);
    traj.samples.reserve(steps.min(200_000));
    let mut launched = false;

    for k in 1..=steps {
        let time = t0 + k as f64 * dt;
        let prev = traj.last();

        let x_next = model
            .update(&prev.force, &state.state_vector())
            .map_err(|source| SimError::Dynamics { time, source })?;
        state.set_state(&x_next);

        // Below liftoff height the projectile cannot sink under the launch site.
        if !launched && state.radius() < ground {
            state.pos = state.pos.normalize() * ground;
            state.vel = Vector3::zeros();
        }

        let mut step_events = Vec::new();
        if !launched && state.radius() > ground + 1.0 {
            launched = true;
            step_events.push(EventKind::Liftoff);
        }
        let grounded = !launched && state.radius() <= ground + GROUND_TOLERANCE;
        let current = sample_at(config, &launcher, &state, time, grounded)?;

        for det in detectors.iter_mut() {
            if let Some(kind) = det.check(prev, &current) {
                step_events.push(kind);
            }
        }
        let impact = launched && state.radius() <= ground;
        if impact {
            step_events.push(EventKind::Impact);
        }

        for kind in step_events {
            let event = SimEvent {
                time,
                kind,
                altitude: state.altitude(config.planet.radius_earth),
                speed: state.speed(),
            };
            log::info!(
                "{:?} at t={:.2}s alt={:.1}m speed={:.1}m/s",
                event.kind, event.time, event.altitude, event.speed
            );
            traj.record(event);
        }

        if config.display_every > 0 && k % config.display_every == 0 {
            log::info!(
                "t={:>8.2}s  alt={:>12.1}m  speed={:>9.1}m/s",
                time,
                state.altitude(config.planet.radius_earth),
                state.speed()
            );
        }

        traj.push(current);

        if impact {
            traj.set_termination(Termination::Impact);
            break;
        }
    }

    log::debug!(
        "simulation finished after {} samples ({:?})",
        traj.samples.len(),
        traj.termination
    );

    Ok(traj)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{LauncherConfig, TimingConfig};
    use crate::dynamics::idx;

    fn short_config(thrust: f64, cutoff: f64, tf: f64) -> SimConfig {
        SimConfig {
            timing: TimingConfig { dt: 0.05, t0: 0.0, tf },
            launcher: LauncherConfig {
                thrust: Some(thrust),
                thrust_cutoff: cutoff,
                ..LauncherConfig::default()
            },
            ..SimConfig::default()
        }
    }

    #[test]
    fn sample_count_matches_steps() {
        let config = short_config(1.0e5, 1.0, 2.0);
        let traj = simulate(&config).unwrap();
        assert_eq!(traj.termination(), Termination::EndTime);
        assert_eq!(traj.samples().len(), config.steps() + 1);
        assert!((traj.last().time - 2.0).abs() < 1e-9);
    }

    #[test]
    fn strong_launch_climbs_and_cuts_off() {
        let config = short_config(1.0e5, 5.0, 20.0);
        let traj = simulate(&config).unwrap();
        let r0 = traj.first().state.radius();
        assert!(traj.last().state.radius() > r0 + 100.0);
        assert!(traj.first_event(&EventKind::Liftoff).is_some());
        let cutoff = traj.first_event(&EventKind::ThrustCutoff).unwrap();
        assert!((cutoff.time - 5.0).abs() < 0.051);
    }

    #[test]
    fn weak_launch_falls_back() {
        // 1.2 g vertical for 2 s, then ballistic
        let config = short_config(1.2 * 9.8 * 1252.0 + 2000.0, 2.0, 60.0);
        let traj = simulate(&config).unwrap();
        assert_eq!(traj.termination(), Termination::Impact);
        assert!(traj.first_event(&EventKind::Apogee).is_some());
        let apogee = traj.first_event(&EventKind::Apogee).unwrap();
        let impact = traj.first_event(&EventKind::Impact).unwrap();
        assert!(apogee.time < impact.time);
    }

    #[test]
    fn armed_rail_holds_projectile() {
        let mut config = short_config(1.0e5, 3.0, 1.0);
        config.launcher.launch_start = 2.0;
        let traj = simulate(&config).unwrap();
        let start = traj.first().state.state_vector();
        let end = traj.last().state.state_vector();
        assert_eq!(start, end);
        assert!(traj.events().is_empty());
    }

    #[test]
    fn mass_is_constant_through_flight() {
        let traj = simulate(&short_config(1.0e5, 1.0, 3.0)).unwrap();
        for s in traj.samples() {
            assert_eq!(s.state.state_vector()[idx::MASS], 1252.0);
        }
    }

    #[test]
    fn invalid_config_is_rejected() {
        let mut config = short_config(1.0e5, 1.0, 3.0);
        config.timing.dt = -0.1;
        assert!(matches!(simulate(&config), Err(SimError::Config(_))));
    }

    #[test]
    fn start_inside_earth_faults() {
        let mut config = short_config(0.0, 0.0, 1.0);
        config.projectile.initial_position = [1000.0, 0.0, 0.0];
        let err = simulate(&config).unwrap_err();
        assert!(matches!(err, SimError::Gravity { .. }), "got {}", err);
    }

    #[test]
    fn thrust_below_weight_stays_on_rail() {
        // 10 kN against ~12.3 kN of weight
        let config = short_config(10_000.0, 5.0, 10.0);
        let traj = simulate(&config).unwrap();
        assert_eq!(traj.termination(), Termination::EndTime);
        assert_eq!(traj.samples().len(), config.steps() + 1);
        assert_eq!(traj.first().state.state_vector(), traj.last().state.state_vector());
        assert!(traj.events().iter().all(|e| e.kind == EventKind::ThrustCutoff));
    }

    #[test]
    fn zero_efficiency_launcher_stays_put() {
        let mut config = short_config(0.0, 5.0, 10.0);
        config.launcher.thrust = None;
        config.launcher.efficiency = 0.0;
        let traj = simulate(&config).unwrap();
        assert_eq!(traj.termination(), Termination::EndTime);
        assert_eq!(traj.first().state.state_vector(), traj.last().state.state_vector());
        assert!(traj.first_event(&EventKind::Liftoff).is_none());
    }

    #[test]
    fn short_hop_settles_back_on_rail() {
        // Barely above weight for half a second: rises a few cm, never lifts off
        let config = short_config(13_000.0, 0.5, 5.0);
        let traj = simulate(&config).unwrap();
        let ground = traj.first().state.radius();
        let peak = traj
            .samples()
            .iter()
            .map(|s| s.state.radius())
            .fold(f64::NEG_INFINITY, f64::max);
        assert!(peak > ground);
        assert!(traj.first_event(&EventKind::Liftoff).is_none());
        assert_eq!(traj.termination(), Termination::EndTime);
        let last = &traj.last().state;
        assert!((last.radius() - ground).abs() < 1e-6);
        assert_eq!(last.vel, Vector3::zeros());
        for s in traj.samples() {
            assert!(s.state.radius() >= ground - 1e-6);
        }
    }

    #[test]
    fn trajectory_starts_with_initial_sample() {
        let config = short_config(1.0e5, 1.0, 1.0);
        let state = State::new(6.4e6, 0.0, 0.0, 1252.0);
        let launcher = Accelerator::from_config(&config.launcher, &state.pos);
        let traj = Trajectory::new(sample_at(&config, &launcher, &state, 0.0, true).unwrap());
        assert_eq!(traj.samples().len(), 1);
        assert_eq!(traj.first().time, traj.last().time);
        assert_eq!(traj.termination(), Termination::EndTime);
        assert!(traj.events().is_empty());
    }
}
