//! Trajectory lifecycle engine: sampling, pooling, scoring, and the
//! simulation clock, with projectile catalog helpers.

pub mod model;

pub use facade::*;
pub use cannon_physics as physics;
pub use cannon_projectile as projectile;

mod facade;
