pub mod gravity;
pub mod rotations;

pub use gravity::{gravity_force, net_force, ForceError};
