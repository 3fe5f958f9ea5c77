pub mod config;
pub mod dynamics;
pub mod physics;
pub mod launch;
pub mod sim;
pub mod io;

// Flat re-exports for the common entry points
pub mod prelude {
    pub use crate::config::SimConfig;
    pub use crate::dynamics::{idx, DynamicsError, Model, State, StateVector};
    pub use crate::launch::Accelerator;
    pub use crate::physics::{gravity_force, net_force, ForceError};
    pub use crate::sim::{simulate, SimError, Trajectory};
}
