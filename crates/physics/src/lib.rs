//! Atmosphere model and fixed-step integrator for cannon projectiles.

pub mod atmosphere;
pub mod integrator;

pub use atmosphere::{MAX_ALTITUDE_M, air_density};
pub use integrator::{BodyProperties, KinematicState, StepOutput, acceleration, step};
