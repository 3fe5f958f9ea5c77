pub mod accelerator;

pub use accelerator::{Accelerator, LaunchPhase};
