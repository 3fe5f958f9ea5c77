use nalgebra::{SMatrix, SVector, Vector3};

use super::state::State;
use super::{check_positive, idx, DynamicsError};

pub const STATE_SIZE: usize = 7;
pub const INPUT_SIZE: usize = 3;

pub type StateVector = SVector<f64, STATE_SIZE>;
pub type PhiMatrix = SMatrix<f64, STATE_SIZE, STATE_SIZE>;
pub type GammaMatrix = SMatrix<f64, STATE_SIZE, INPUT_SIZE>;

// ---------------------------------------------------------------------------
// Matrix factories
// ---------------------------------------------------------------------------

/// State-transition matrix for a fixed step.
///
/// Identity with `dt` coupling each position slot to its velocity slot.
/// The mass slot is multiplied by `mass_factor` (1.0 keeps mass constant).
pub fn make_phi(dt: f64, mass_factor: f64) -> PhiMatrix {
    let mut phi = PhiMatrix::identity();
    for axis in 0..3 {
        phi[(idx::POS + axis, idx::VEL + axis)] = dt;
    }
    phi[(idx::MASS, idx::MASS)] = mass_factor;
    phi
}

/// Input matrix mapping a 3-axis force onto position and velocity.
///
/// Force/mass is integrated with the same second-order Taylor expansion as
/// constant acceleration: `dt²/2` into position, `dt` into velocity.
pub fn make_gamma(dt: f64, mass: f64) -> GammaMatrix {
    let half_dt2 = 0.5 * dt * dt;
    let mut gamma = GammaMatrix::zeros();
    for axis in 0..3 {
        gamma[(idx::POS + axis, axis)] = half_dt2 / mass;
        gamma[(idx::VEL + axis, axis)] = dt / mass;
    }
    gamma
}

// ---------------------------------------------------------------------------
// Discrete linear model: X[k+1] = Phi X[k] + Gamma u[k]
// ---------------------------------------------------------------------------

/// Discrete state-space model of the projectile's translational motion.
///
/// Phi and Gamma are fixed at construction. Gamma depends on mass, so a
/// change in the projectile's mass has no effect on propagation until
/// [`Model::rebuild_for_mass`] is called.
#[derive(Debug, Clone)]
pub struct Model {
    x: StateVector,
    y: StateVector,
    phi: PhiMatrix,
    gamma: GammaMatrix,
    h: PhiMatrix,
    dt: f64,
    mass: f64,
}

impl Model {
    pub fn new(initial: &State, dt: f64, mass: f64) -> Result<Self, DynamicsError> {
        let dt = check_positive("dt", dt)?;
        let mass = check_positive("mass", mass)?;

        let x = initial.state_vector();
        let h = PhiMatrix::identity();
        let model = Self {
            x,
            y: h * x,
            phi: make_phi(dt, 1.0),
            gamma: make_gamma(dt, mass),
            h,
            dt,
            mass,
        };
        log::debug!("dynamics model built: dt={} s, mass={} kg", dt, mass);
        Ok(model)
    }

    /// Replace the mass-slot factor of Phi (mass at the next step =
    /// `factor * mass`). A factor of exactly 1.0 is the constant-mass model.
    pub fn with_mass_factor(mut self, factor: f64) -> Result<Self, DynamicsError> {
        let factor = check_positive("mass factor", factor)?;
        self.phi = make_phi(self.dt, factor);
        Ok(self)
    }

    /// Recompute Gamma for a new projectile mass.
    pub fn rebuild_for_mass(&mut self, mass: f64) -> Result<(), DynamicsError> {
        let mass = check_positive("mass", mass)?;
        log::info!("rebuilding input matrix: mass {} kg -> {} kg", self.mass, mass);
        self.gamma = make_gamma(self.dt, mass);
        self.mass = mass;
        Ok(())
    }

    /// One step of `Phi x + Gamma u` without touching the cached state.
    pub fn propagate(&self, force: &Vector3<f64>, x: &StateVector) -> StateVector {
        self.phi * x + self.gamma * force
    }

    /// Advance `x_current` by one step of `dt` under `force` (ECEF, N).
    ///
    /// The result is cached as the model's X and Y = H X is refreshed.
    /// A non-finite result is reported as a propagation fault and the cache
    /// keeps its previous value.
    pub fn update(
        &mut self,
        force: &Vector3<f64>,
        x_current: &StateVector,
    ) -> Result<StateVector, DynamicsError> {
        let next = self.propagate(force, x_current);
        if let Some(slot) = next.iter().position(|v| !v.is_finite()) {
            return Err(DynamicsError::NonFinite { slot });
        }
        self.x = next;
        self.y = self.h * self.x;
        Ok(next)
    }

    /// [`Model::update`] for dynamically sized inputs.
    pub fn update_from_slices(
        &mut self,
        force: &[f64],
        x_current: &[f64],
    ) -> Result<StateVector, DynamicsError> {
        if force.len() != INPUT_SIZE {
            return Err(DynamicsError::DimensionMismatch {
                what: "force vector",
                expected: INPUT_SIZE,
                got: force.len(),
            });
        }
        if x_current.len() != STATE_SIZE {
            return Err(DynamicsError::DimensionMismatch {
                what: "state vector",
                expected: STATE_SIZE,
                got: x_current.len(),
            });
        }
        self.update(
            &Vector3::from_column_slice(force),
            &StateVector::from_column_slice(x_current),
        )
    }

    pub fn x(&self) -> &StateVector {
        &self.x
    }

    pub fn y(&self) -> &StateVector {
        &self.y
    }

    pub fn phi(&self) -> &PhiMatrix {
        &self.phi
    }

    pub fn gamma(&self) -> &GammaMatrix {
        &self.gamma
    }

    pub fn h(&self) -> &PhiMatrix {
        &self.h
    }

    pub fn dt(&self) -> f64 {
        self.dt
    }

    pub fn mass(&self) -> f64 {
        self.mass
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
