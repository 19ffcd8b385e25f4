//! Projectile type descriptors and the parameter ranges used to validate user input.

use cannon_core::constants::SPHERE_DRAG_COEFFICIENT;

/// Closed interval `[min, max]` used for input validation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParameterRange {
    pub min: f64,
    pub max: f64,
}

impl ParameterRange {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// True when `value` is finite and lies inside the closed interval.
    pub fn contains(&self, value: f64) -> bool {
        value.is_finite() && value >= self.min && value <= self.max
    }

    /// A range is usable when both ends are finite and ordered.
    pub fn is_valid(&self) -> bool {
        self.min.is_finite() && self.max.is_finite() && self.min <= self.max
    }
}

impl From<[f64; 2]> for ParameterRange {
    fn from(value: [f64; 2]) -> Self {
        Self::new(value[0], value[1])
    }
}

/// Immutable description of a projectile type.
///
/// `drag_coefficient` is the type's default; each launch snapshots its own
/// coefficient and diameter, so a spec is never mutated once fired.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectileSpec {
    pub name: String,
    pub mass_kg: f64,
    pub diameter_m: f64,
    pub drag_coefficient: f64,
    pub mass_range: ParameterRange,
    pub diameter_range: ParameterRange,
}

pub const DEFAULT_MASS_RANGE: ParameterRange = ParameterRange::new(1.0, 10.0);
pub const DEFAULT_DIAMETER_RANGE: ParameterRange = ParameterRange::new(0.1, 1.0);

impl ProjectileSpec {
    /// Standard range cannonball.
    pub fn cannonball() -> Self {
        Self {
            name: "cannonball".to_string(),
            mass_kg: 5.44,
            diameter_m: 0.11,
            drag_coefficient: SPHERE_DRAG_COEFFICIENT,
            mass_range: DEFAULT_MASS_RANGE,
            diameter_range: DEFAULT_DIAMETER_RANGE,
        }
    }

    /// Large light sphere used to make drag effects obvious.
    pub fn drag_lab_object() -> Self {
        Self {
            name: "drag lab object".to_string(),
            mass_kg: 5.0,
            diameter_m: 0.8,
            drag_coefficient: SPHERE_DRAG_COEFFICIENT,
            mass_range: DEFAULT_MASS_RANGE,
            diameter_range: DEFAULT_DIAMETER_RANGE,
        }
    }

    pub fn pumpkin() -> Self {
        Self {
            name: "pumpkin".to_string(),
            mass_kg: 5.0,
            diameter_m: 0.37,
            drag_coefficient: 0.6,
            mass_range: ParameterRange::new(4.0, 8.0),
            diameter_range: ParameterRange::new(0.2, 0.6),
        }
    }

    pub fn baseball() -> Self {
        Self {
            name: "baseball".to_string(),
            mass_kg: 0.145,
            diameter_m: 0.074,
            drag_coefficient: 0.35,
            mass_range: ParameterRange::new(0.1, 0.2),
            diameter_range: ParameterRange::new(0.05, 0.1),
        }
    }

    /// Built-in projectile types, cannonball first.
    pub fn builtin() -> Vec<ProjectileSpec> {
        vec![
            Self::cannonball(),
            Self::drag_lab_object(),
            Self::pumpkin(),
            Self::baseball(),
        ]
    }
}
