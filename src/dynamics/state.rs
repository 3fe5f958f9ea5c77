use nalgebra::Vector3;

use super::idx;
use super::model::{StateVector, STATE_SIZE};
use super::DynamicsError;

// ---------------------------------------------------------------------------
// Projectile state
// ---------------------------------------------------------------------------

/// Instantaneous physical condition of the projectile.
/// Frame: Earth-Centered Earth-Fixed (ECEF), origin at Earth's centre of mass.
///
/// Only position, velocity and mass take part in propagation. The attitude
/// slots are kept so a launcher can record how the rail was pointed.
#[derive(Debug, Clone, PartialEq)]
pub struct State {
    pub pos: Vector3<f64>,          // m   [x, y, z]
    pub vel: Vector3<f64>,          // m/s [dx, dy, dz]
    pub roll: f64,                  // rad
    pub pitch: f64,                 // rad
    pub yaw: f64,                   // rad
    pub rate: Vector3<f64>,         // rad/s   [p, q, r]
    pub rate_accel: Vector3<f64>,   // rad/s^2 [dp, dq, dr]
    pub mass: f64,                  // kg
}

impl State {
    /// Projectile at rest at the given ECEF position.
    pub fn new(x0: f64, y0: f64, z0: f64, mass0: f64) -> Self {
        Self {
            pos: Vector3::new(x0, y0, z0),
            vel: Vector3::zeros(),
            roll: 0.0,
            pitch: 0.0,
            yaw: 0.0,
            rate: Vector3::zeros(),
            rate_accel: Vector3::zeros(),
            mass: mass0,
        }
    }

    /// Flatten into the canonical `[x, y, z, dx, dy, dz, mass]` vector.
    pub fn state_vector(&self) -> StateVector {
        let mut v = StateVector::zeros();
        v.fixed_rows_mut::<3>(idx::POS).copy_from(&self.pos);
        v.fixed_rows_mut::<3>(idx::VEL).copy_from(&self.vel);
        v[idx::MASS] = self.mass;
        v
    }

    /// Overwrite position, velocity and mass from a canonical vector.
    pub fn set_state(&mut self, v: &StateVector) {
        self.pos = v.fixed_rows::<3>(idx::POS).into_owned();
        self.vel = v.fixed_rows::<3>(idx::VEL).into_owned();
        self.mass = v[idx::MASS];
    }

    /// Same as [`State::set_state`] for a dynamically sized slice.
    ///
    /// A slice of any length other than the canonical size is rejected and
    /// the state is left untouched.
    pub fn set_state_from_slice(&mut self, v: &[f64]) -> Result<(), DynamicsError> {
        if v.len() != STATE_SIZE {
            return Err(DynamicsError::DimensionMismatch {
                what: "state vector",
                expected: STATE_SIZE,
                got: v.len(),
            });
        }
        self.set_state(&StateVector::from_column_slice(v));
        Ok(())
    }

    pub fn set_orientation(&mut self, roll: f64, pitch: f64, yaw: f64) {
        self.roll = roll;
        self.pitch = pitch;
        self.yaw = yaw;
    }

    /// Distance from Earth's centre, m.
    pub fn radius(&self) -> f64 {
        self.pos.norm()
    }

    /// Height above a spherical Earth of the given radius, m.
    pub fn altitude(&self, radius_earth: f64) -> f64 {
        self.radius() - radius_earth
    }

    pub fn speed(&self) -> f64 {
        self.vel.norm()
    }

    /// Velocity component along the local vertical (positive = climbing).
    pub fn radial_speed(&self) -> f64 {
        let r = self.radius();
        if r > 0.0 {
            self.pos.dot(&self.vel) / r
        } else {
            0.0
        }
    }
}
