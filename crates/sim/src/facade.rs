//! Re-exported APIs for consumers of the simulation crate.

pub use crate::model::clock::{ClockState, SimulationClock, SimulationSpeed};
pub use crate::model::pool::{
    FireOutcome, LaunchLimits, PoolLimits, RankedTrajectory, TrajectoryPool,
};
pub use crate::model::score::{ScoreEvent, TargetZone, evaluate_trajectory, interpolate_landing_x};
pub use crate::model::trajectory::{
    DataPoint, Environment, GroundCrossing, LaunchParameters, ProjectileObject, RiderId,
    SamplingPlan, Trajectory, TrajectoryId,
};
pub use crate::model::{
    FrameReport, IllegalOperation, RiderSnapshot, Session, SessionSnapshot, SimulationError,
    TrajectorySnapshot,
};
pub use cannon_projectile::{ParameterRange, ProjectileSpec};

pub mod catalog {
    use cannon_config::ProjectileConfig;
    use cannon_projectile::{
        DEFAULT_DIAMETER_RANGE, DEFAULT_MASS_RANGE, ParameterRange, ProjectileSpec,
    };
    use thiserror::Error;

    /// Errors surfaced when selecting or converting projectile types.
    #[derive(Debug, Error)]
    pub enum CatalogError {
        #[error("projectile '{0}' not found in catalog")]
        NotFound(String),
        #[error("projectile catalog is empty")]
        EmptyCatalog,
        #[error("projectile '{name}' is invalid: {reason}")]
        InvalidSpec { name: String, reason: String },
    }

    /// Convert a `ProjectileConfig` into a runtime `ProjectileSpec`.
    pub fn from_config(config: &ProjectileConfig) -> Result<ProjectileSpec, CatalogError> {
        let invalid = |reason: &str| CatalogError::InvalidSpec {
            name: config.name.clone(),
            reason: reason.to_string(),
        };

        if !(config.mass_kg > 0.0 && config.mass_kg.is_finite()) {
            return Err(invalid("mass must be positive"));
        }
        if !(config.diameter_m > 0.0 && config.diameter_m.is_finite()) {
            return Err(invalid("diameter must be positive"));
        }
        if !(config.drag_coefficient >= 0.0 && config.drag_coefficient.is_finite()) {
            return Err(invalid("drag coefficient must not be negative"));
        }

        let mass_range = config
            .mass_range
            .map(ParameterRange::from)
            .unwrap_or(DEFAULT_MASS_RANGE);
        let diameter_range = config
            .diameter_range
            .map(ParameterRange::from)
            .unwrap_or(DEFAULT_DIAMETER_RANGE);
        if !mass_range.is_valid() || !mass_range.contains(config.mass_kg) {
            return Err(invalid("mass lies outside its range"));
        }
        if !diameter_range.is_valid() || !diameter_range.contains(config.diameter_m) {
            return Err(invalid("diameter lies outside its range"));
        }

        Ok(ProjectileSpec {
            name: config.name.clone(),
            mass_kg: config.mass_kg,
            diameter_m: config.diameter_m,
            drag_coefficient: config.drag_coefficient,
            mass_range,
            diameter_range,
        })
    }

    /// Select a projectile by case-insensitive name, defaulting to the first entry.
    pub fn select(
        configs: &[ProjectileConfig],
        requested: Option<&str>,
    ) -> Result<ProjectileSpec, CatalogError> {
        if configs.is_empty() {
            return Err(CatalogError::EmptyCatalog);
        }

        let chosen = if let Some(name) = requested {
            let upper = name.to_uppercase();
            configs
                .iter()
                .find(|cfg| cfg.name.to_uppercase() == upper)
                .ok_or_else(|| CatalogError::NotFound(name.to_string()))?
        } else {
            &configs[0]
        };

        from_config(chosen)
    }

    /// Look up a built-in projectile type by case-insensitive name.
    pub fn builtin(name: &str) -> Result<ProjectileSpec, CatalogError> {
        let upper = name.to_uppercase();
        ProjectileSpec::builtin()
            .into_iter()
            .find(|spec| spec.name.to_uppercase() == upper)
            .ok_or_else(|| CatalogError::NotFound(name.to_string()))
    }
}
