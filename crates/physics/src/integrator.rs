//! Fixed-step integration of a point projectile under gravity and quadratic drag.
//!
//! The integrator is pure: it reads nothing but its arguments, so identical
//! inputs always produce bit-identical outputs.

use cannon_core::vector::{self, Vector2};

/// Kinematic state of a projectile in the launch plane.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KinematicState {
    pub position: Vector2,
    pub velocity: Vector2,
}

/// Physical properties of the body being integrated, snapshotted at launch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodyProperties {
    pub mass_kg: f64,
    pub diameter_m: f64,
    pub drag_coefficient: f64,
}

impl BodyProperties {
    /// Circular cross-section area (m²).
    pub fn cross_sectional_area(&self) -> f64 {
        std::f64::consts::PI * self.diameter_m * self.diameter_m / 4.0
    }
}

/// Result of a single micro-step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepOutput {
    pub state: KinematicState,
    /// Acceleration evaluated at the new state.
    pub acceleration: Vector2,
}

/// Acceleration from gravity (downward, `gravity_m_s2` > 0) plus drag.
///
/// Drag magnitude is ½·ρ·Cd·A·|v|², directed against the velocity and divided
/// by mass.
pub fn acceleration(
    velocity: &Vector2,
    body: &BodyProperties,
    density_kg_m3: f64,
    gravity_m_s2: f64,
) -> Vector2 {
    let gravity = [0.0, -gravity_m_s2];
    let speed = vector::norm(velocity);
    if density_kg_m3 <= 0.0 || body.drag_coefficient <= 0.0 || speed == 0.0 {
        return gravity;
    }
    let drag_force =
        0.5 * density_kg_m3 * body.drag_coefficient * body.cross_sectional_area() * speed * speed;
    let drag = vector::scale(velocity, -drag_force / (speed * body.mass_kg));
    vector::add(&gravity, &drag)
}

/// Advance `state` by `dt` seconds using classical RK4.
///
/// Density and gravity are held constant across the step. Without drag the
/// scheme reproduces the analytic parabola up to rounding.
pub fn step(
    state: &KinematicState,
    body: &BodyProperties,
    density_kg_m3: f64,
    gravity_m_s2: f64,
    dt: f64,
) -> StepOutput {
    let accel = |v: &Vector2| acceleration(v, body, density_kg_m3, gravity_m_s2);

    let k1_x = state.velocity;
    let k1_v = accel(&state.velocity);

    let v2 = vector::add(&state.velocity, &vector::scale(&k1_v, dt * 0.5));
    let k2_x = v2;
    let k2_v = accel(&v2);

    let v3 = vector::add(&state.velocity, &vector::scale(&k2_v, dt * 0.5));
    let k3_x = v3;
    let k3_v = accel(&v3);

    let v4 = vector::add(&state.velocity, &vector::scale(&k3_v, dt));
    let k4_x = v4;
    let k4_v = accel(&v4);

    let position = vector::add(
        &state.position,
        &vector::scale(&weighted(&k1_x, &k2_x, &k3_x, &k4_x), dt),
    );
    let velocity = vector::add(
        &state.velocity,
        &vector::scale(&weighted(&k1_v, &k2_v, &k3_v, &k4_v), dt),
    );

    StepOutput {
        state: KinematicState { position, velocity },
        acceleration: accel(&velocity),
    }
}

fn weighted(k1: &Vector2, k2: &Vector2, k3: &Vector2, k4: &Vector2) -> Vector2 {
    [
        (k1[0] + 2.0 * k2[0] + 2.0 * k3[0] + k4[0]) / 6.0,
        (k1[1] + 2.0 * k2[1] + 2.0 * k3[1] + k4[1]) / 6.0,
    ]
}
