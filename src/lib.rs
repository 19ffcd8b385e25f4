//! Cannon range simulation: projectile flight paths under gravity and
//! quadratic air drag, sampled at a fixed interval for a front-end to render.
//!
//! The member crates are re-exported here so front-ends (CLI, GUI, web) can
//! depend on a single package.

pub use cannon_config as config;
pub use cannon_core as primitives;
pub use cannon_export as export;
pub use cannon_physics as physics;
pub use cannon_projectile as projectile;
pub use cannon_sim as sim;

/// Returns the version of the library for smoke tests.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
