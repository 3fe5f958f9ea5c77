use std::path::PathBuf;

use nalgebra::Vector3;

use railsim::config::{PlanetConfig, SimConfig};
use railsim::dynamics::{idx, Model, State};
use railsim::physics::gravity_force;
use railsim::sim::{self, EventKind, Termination};

const R_EARTH: f64 = 6_371_000.0;
const MASS: f64 = 1252.0;
const DT: f64 = 0.05;

fn scenario_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("scenarios").join(name)
}

// ==================================================================================
// Single-step scenarios
// ==================================================================================

#[test]
fn first_step_of_rail_push() {
    let mut state = State::new(R_EARTH, 0.0, 0.0, MASS);
    let mut model = Model::new(&state, DT, MASS).unwrap();

    let next = model.update(&Vector3::new(10_000.0, 0.0, 0.0), &state.state_vector()).unwrap();
    state.set_state(&next);

    assert!((state.vel.x - 0.3994).abs() < 1e-4, "vx = {}", state.vel.x);
    assert!((state.pos.x - R_EARTH - 0.00998).abs() < 1e-4);
    assert_eq!(state.vel.y, 0.0);
    assert_eq!(state.vel.z, 0.0);
    assert_eq!(model.y(), &next);
}

#[test]
fn free_fall_from_surface() {
    let planet = PlanetConfig::default();
    let mut state = State::new(planet.radius_earth, 0.0, 0.0, MASS);
    let mut model = Model::new(&state, DT, MASS).unwrap();

    let f = gravity_force(&planet, &state.pos, state.mass).unwrap();
    let next = model.update(&f, &state.state_vector()).unwrap();
    state.set_state(&next);

    let accel = state.vel / DT;
    assert!(accel.x < 0.0, "free fall must head toward the centre");
    assert!((accel.norm() - 9.8).abs() / 9.8 < 0.01, "|a| = {}", accel.norm());
    assert!(state.radius() < planet.radius_earth);
}

#[test]
fn caller_loop_matches_closed_form() {
    let f = Vector3::new(0.0, 2_504.0, -1_252.0);
    let a = f / MASS;
    let mut state = State::new(R_EARTH, 0.0, 0.0, MASS);
    let mut model = Model::new(&state, DT, MASS).unwrap();

    let k = 400;
    for _ in 0..k {
        let next = model.update(&f, &state.state_vector()).unwrap();
        state.set_state(&next);
    }
    let t = DT * k as f64;
    assert!((state.vel - a * t).norm() < 1e-9);
    assert!((state.pos - Vector3::new(R_EARTH, 0.0, 0.0) - a * t * t / 2.0).norm() < 1e-6);
    assert_eq!(state.state_vector()[idx::MASS], MASS);
}

// ==================================================================================
// Full launch runs
// ==================================================================================

#[test]
fn vertical_launch_reaches_space_and_returns() {
    let config = SimConfig::default();
    let traj = sim::simulate(&config).unwrap();

    assert_eq!(traj.termination(), Termination::Impact);
    let apogee = traj.first_event(&EventKind::Apogee).expect("apogee");
    let impact = traj.first_event(&EventKind::Impact).expect("impact");
    let cutoff = traj.first_event(&EventKind::ThrustCutoff).expect("cutoff");
    assert!(cutoff.time < apogee.time && apogee.time < impact.time);
    assert!(
        apogee.altitude > 1.0e6 && apogee.altitude < 1.8e6,
        "apogee altitude {}",
        apogee.altitude
    );
}

#[test]
fn scenario_file_loads_and_flies_downrange() {
    let config = SimConfig::load(scenario_path("santa_cruz.yaml")).unwrap();
    assert_eq!(config.launcher.orientation, Some([0.0, 0.6, 0.0]));

    let pitched = sim::simulate(&config).unwrap();
    let vertical = sim::simulate(&SimConfig::default()).unwrap();

    let peak = |t: &sim::Trajectory| {
        t.samples()
            .iter()
            .map(|s| s.state.altitude(R_EARTH))
            .fold(f64::NEG_INFINITY, f64::max)
    };
    assert!(peak(&pitched) < peak(&vertical));
    assert_eq!(pitched.termination(), Termination::Impact);

    // Rail attitude is carried on the state but never propagated
    let last = &pitched.last().state;
    assert_eq!((last.roll, last.pitch, last.yaw), (0.0, 0.6, 0.0));
}
