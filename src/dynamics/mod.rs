pub mod model;
pub mod state;

pub use model::{GammaMatrix, Model, PhiMatrix, StateVector, INPUT_SIZE, STATE_SIZE};
pub use state::State;

/// Slot order of the canonical state vector `[x, y, z, dx, dy, dz, mass]`.
///
/// `State`, `Model` and every caller index through these constants only.
pub mod idx {
    pub const X: usize = 0;
    pub const Y: usize = 1;
    pub const Z: usize = 2;
    pub const DX: usize = 3;
    pub const DY: usize = 4;
    pub const DZ: usize = 5;
    pub const MASS: usize = 6;

    /// First position slot; position occupies `POS..POS + 3`.
    pub const POS: usize = X;
    /// First velocity slot; velocity occupies `VEL..VEL + 3`.
    pub const VEL: usize = DX;
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Failures raised by the propagation core.
///
/// All of these are programmer or configuration errors, never transient.
#[derive(Debug, Clone, PartialEq)]
pub enum DynamicsError {
    /// A flat vector did not have the length the canonical layout requires.
    DimensionMismatch {
        what: &'static str,
        expected: usize,
        got: usize,
    },
    /// `dt` or `mass` was zero, negative or not finite.
    InvalidParameter { name: &'static str, value: f64 },
    /// Propagation produced NaN or infinity in the given slot.
    NonFinite { slot: usize },
}

impl std::fmt::Display for DynamicsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DimensionMismatch { what, expected, got } => {
                write!(f, "{} has length {}, expected {}", what, got, expected)
            }
            Self::InvalidParameter { name, value } => {
                write!(f, "invalid {}: {} (must be finite and positive)", name, value)
            }
            Self::NonFinite { slot } => {
                write!(f, "propagation fault: state slot {} is not finite", slot)
            }
        }
    }
}

impl std::error::Error for DynamicsError {}

pub(crate) fn check_positive(name: &'static str, value: f64) -> Result<f64, DynamicsError> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(DynamicsError::InvalidParameter { name, value })
    }
}
