//! Landing-point interpolation and target scoring.

use super::trajectory::{DataPoint, GroundCrossing, Trajectory, TrajectoryId};

/// Ground target spanning `[center - half_width, center + half_width]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TargetZone {
    pub center_x_m: f64,
    pub half_width_m: f64,
}

impl TargetZone {
    pub fn new(center_x_m: f64, half_width_m: f64) -> Self {
        Self {
            center_x_m,
            half_width_m,
        }
    }

    pub fn contains(&self, x_m: f64) -> bool {
        x_m >= self.center_x_m - self.half_width_m && x_m <= self.center_x_m + self.half_width_m
    }
}

/// Outcome of one landing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreEvent {
    pub trajectory: TrajectoryId,
    /// Downrange distance where the path crosses `y = 0` (m).
    pub landing_x_m: f64,
    pub hit: bool,
}

/// Downrange x at `y = 0`, linearly interpolated between the last sample at
/// or above ground and the first sample at or below it.
pub fn interpolate_landing_x(last_in_flight: &DataPoint, landing: &DataPoint) -> f64 {
    let y0 = last_in_flight.y();
    let y1 = landing.y();
    let drop = y0 - y1;
    if drop <= 0.0 {
        return landing.x();
    }
    last_in_flight.x() + (landing.x() - last_in_flight.x()) * (y0 / drop)
}

/// Score a crossing against the target.
pub fn evaluate(id: TrajectoryId, crossing: &GroundCrossing, target: &TargetZone) -> ScoreEvent {
    let landing_x_m = interpolate_landing_x(&crossing.last_in_flight, &crossing.landing);
    ScoreEvent {
        trajectory: id,
        landing_x_m,
        hit: target.contains(landing_x_m),
    }
}

/// Score a trajectory that has landed; `None` while it is still in the air.
pub fn evaluate_trajectory(trajectory: &Trajectory, target: &TargetZone) -> Option<ScoreEvent> {
    trajectory
        .ground_crossing()
        .map(|crossing| evaluate(trajectory.id(), &crossing, target))
}
