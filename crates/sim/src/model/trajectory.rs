//! A single launch: its recorded flight path and the riders sharing it.

use std::fmt;
use std::num::NonZeroU32;

use cannon_core::units::deg_to_rad;
use cannon_core::vector::{self, Vector2};
use cannon_physics::integrator::{self, BodyProperties, KinematicState};
use cannon_physics::air_density;
use cannon_projectile::ProjectileSpec;

use super::score::ScoreEvent;

/// Stable identifier of a trajectory within one session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TrajectoryId(pub u64);

impl fmt::Display for TrajectoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Stable identifier of a rider within one session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RiderId(pub u64);

/// One recorded sample of the flight.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DataPoint {
    /// Seconds since launch.
    pub time_s: f64,
    pub position: Vector2,
    pub velocity: Vector2,
    pub acceleration: Vector2,
    /// Air density used for this sample (0 with air resistance off).
    pub air_density_kg_m3: f64,
}

impl DataPoint {
    pub fn x(&self) -> f64 {
        self.position[0]
    }

    pub fn y(&self) -> f64 {
        self.position[1]
    }

    pub fn speed(&self) -> f64 {
        vector::norm(&self.velocity)
    }
}

/// Environment captured when a trajectory is fired.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Environment {
    pub gravity_m_s2: f64,
    pub air_resistance_enabled: bool,
    /// Altitude of the launch site above sea level (m).
    pub site_altitude_m: f64,
}

/// Everything that determines the shape of a flight path.
///
/// Two launches with equal parameters (and equal environments) trace the
/// same curve, which is what rider deduplication relies on.
#[derive(Debug, Clone, PartialEq)]
pub struct LaunchParameters {
    pub spec: ProjectileSpec,
    pub diameter_m: f64,
    pub drag_coefficient: f64,
    pub launch_height_m: f64,
    pub launch_angle_deg: f64,
    pub launch_speed_m_s: f64,
}

impl LaunchParameters {
    /// Launch `spec` with its own diameter and drag coefficient.
    pub fn new(spec: ProjectileSpec, height_m: f64, angle_deg: f64, speed_m_s: f64) -> Self {
        Self {
            diameter_m: spec.diameter_m,
            drag_coefficient: spec.drag_coefficient,
            spec,
            launch_height_m: height_m,
            launch_angle_deg: angle_deg,
            launch_speed_m_s: speed_m_s,
        }
    }

    pub fn with_diameter(mut self, diameter_m: f64) -> Self {
        self.diameter_m = diameter_m;
        self
    }

    pub fn with_drag_coefficient(mut self, drag_coefficient: f64) -> Self {
        self.drag_coefficient = drag_coefficient;
        self
    }

    fn body(&self) -> BodyProperties {
        BodyProperties {
            mass_kg: self.spec.mass_kg,
            diameter_m: self.diameter_m,
            drag_coefficient: self.drag_coefficient,
        }
    }
}

// Slack when comparing accumulated frame time against micro-step and sample times.
const TIME_TOLERANCE: f64 = 1e-9;

/// Fixed-interval sampling of the integrator output.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SamplingPlan {
    pub micro_step_s: f64,
    pub steps_per_sample: NonZeroU32,
}

impl SamplingPlan {
    /// `None` unless the micro-step is positive and finite and at least one
    /// micro-step separates samples.
    pub fn new(micro_step_s: f64, steps_per_sample: u32) -> Option<Self> {
        if !(micro_step_s > 0.0 && micro_step_s.is_finite()) {
            return None;
        }
        Some(Self {
            micro_step_s,
            steps_per_sample: NonZeroU32::new(steps_per_sample)?,
        })
    }

    pub fn sampling_interval_s(&self) -> f64 {
        self.micro_step_s * f64::from(self.steps_per_sample.get())
    }
}

/// A launch instance moving along a shared trajectory.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectileObject {
    id: RiderId,
    elapsed_s: f64,
}

impl ProjectileObject {
    pub fn id(&self) -> RiderId {
        self.id
    }

    /// Flight time of this rider (s).
    pub fn elapsed_s(&self) -> f64 {
        self.elapsed_s
    }
}

/// Points handed to the score evaluator when a trajectory touches down.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GroundCrossing {
    pub last_in_flight: DataPoint,
    pub landing: DataPoint,
}

/// Recorded flight path for one set of launch parameters.
#[derive(Debug, Clone)]
pub struct Trajectory {
    id: TrajectoryId,
    launch: LaunchParameters,
    environment: Environment,
    body: BodyProperties,
    plan: SamplingPlan,
    points: Vec<DataPoint>,
    riders: Vec<ProjectileObject>,
    state: KinematicState,
    micro_steps: u64,
    // Simulated time handed to this trajectory since launch.
    flown_s: f64,
    landed: bool,
    score: Option<ScoreEvent>,
}

impl Trajectory {
    pub(crate) fn new(
        id: TrajectoryId,
        launch: LaunchParameters,
        environment: Environment,
        plan: SamplingPlan,
        first_rider: RiderId,
    ) -> Self {
        let body = launch.body();
        let state = KinematicState {
            position: [0.0, launch.launch_height_m],
            velocity: vector::from_polar(
                launch.launch_speed_m_s,
                deg_to_rad(launch.launch_angle_deg),
            ),
        };
        let density = density_at(&environment, state.position[1]);
        let initial = DataPoint {
            time_s: 0.0,
            position: state.position,
            velocity: state.velocity,
            acceleration: integrator::acceleration(
                &state.velocity,
                &body,
                density,
                environment.gravity_m_s2,
            ),
            air_density_kg_m3: density,
        };

        Self {
            id,
            launch,
            environment,
            body,
            plan,
            points: vec![initial],
            riders: vec![ProjectileObject {
                id: first_rider,
                elapsed_s: 0.0,
            }],
            state,
            micro_steps: 0,
            flown_s: 0.0,
            landed: false,
            score: None,
        }
    }

    pub fn id(&self) -> TrajectoryId {
        self.id
    }

    pub fn launch(&self) -> &LaunchParameters {
        &self.launch
    }

    pub fn environment(&self) -> &Environment {
        &self.environment
    }

    /// Recorded samples, strictly ordered by time. The first sample is the
    /// launch point at `x = 0`, `t = 0`.
    pub fn points(&self) -> &[DataPoint] {
        &self.points
    }

    pub fn riders(&self) -> &[ProjectileObject] {
        &self.riders
    }

    /// True once a ground crossing has been recorded.
    pub fn is_landed(&self) -> bool {
        self.landed
    }

    /// True while at least one rider has not reached the landing point.
    pub fn is_flying(&self) -> bool {
        self.riders.iter().any(|rider| !self.rider_landed(rider))
    }

    pub fn score(&self) -> Option<&ScoreEvent> {
        self.score.as_ref()
    }

    /// Index of the latest sample the rider has reached.
    pub fn rider_point_index(&self, rider: &ProjectileObject) -> usize {
        self.points
            .partition_point(|p| p.time_s <= rider.elapsed_s + TIME_TOLERANCE)
            .saturating_sub(1)
    }

    pub fn rider_landed(&self, rider: &ProjectileObject) -> bool {
        self.landed
            && self
                .points
                .last()
                .is_some_and(|last| rider.elapsed_s + TIME_TOLERANCE >= last.time_s)
    }

    /// The two samples bracketing the ground crossing, once landed.
    pub fn ground_crossing(&self) -> Option<GroundCrossing> {
        if !self.landed {
            return None;
        }
        match self.points.as_slice() {
            [.., last_in_flight, landing] => Some(GroundCrossing {
                last_in_flight: *last_in_flight,
                landing: *landing,
            }),
            _ => None,
        }
    }

    pub(crate) fn add_rider(&mut self, id: RiderId) {
        self.riders.push(ProjectileObject { id, elapsed_s: 0.0 });
    }

    pub(crate) fn set_score(&mut self, score: ScoreEvent) {
        self.score = Some(score);
    }

    /// Advance by `dt` simulated seconds. Returns the crossing when this call
    /// records the landing.
    ///
    /// The number of micro-steps run is derived from the total time flown, so
    /// the recorded samples depend only on that total and never on how it was
    /// split into frames.
    pub(crate) fn advance(&mut self, dt: f64) -> Option<GroundCrossing> {
        let mut crossing = None;
        if !self.landed {
            self.flown_s += dt;
            let target = (self.flown_s / self.plan.micro_step_s + TIME_TOLERANCE).floor() as u64;
            while self.micro_steps < target {
                if self.micro_step() {
                    crossing = self.ground_crossing();
                    break;
                }
            }
        }

        let landing_time = self
            .landed
            .then(|| self.points.last().map(|p| p.time_s))
            .flatten();
        for rider in &mut self.riders {
            rider.elapsed_s += dt;
            if let Some(t) = landing_time {
                if rider.elapsed_s + TIME_TOLERANCE >= t {
                    rider.elapsed_s = t;
                }
            }
        }
        crossing
    }

    // Returns true when this micro-step lands the trajectory.
    fn micro_step(&mut self) -> bool {
        let density = density_at(&self.environment, self.state.position[1]);
        let out = integrator::step(
            &self.state,
            &self.body,
            density,
            self.environment.gravity_m_s2,
            self.plan.micro_step_s,
        );
        self.state = out.state;
        self.micro_steps += 1;

        let per_sample = u64::from(self.plan.steps_per_sample.get());
        let on_boundary = self.micro_steps % per_sample == 0;
        let touched_down = out.state.position[1] <= 0.0;
        if !on_boundary && !touched_down {
            return false;
        }

        let time_s = if on_boundary {
            (self.micro_steps / per_sample) as f64 * self.plan.sampling_interval_s()
        } else {
            self.micro_steps as f64 * self.plan.micro_step_s
        };
        self.points.push(DataPoint {
            time_s,
            position: out.state.position,
            velocity: out.state.velocity,
            acceleration: out.acceleration,
            air_density_kg_m3: density,
        });
        self.landed = touched_down;
        touched_down
    }
}

fn density_at(environment: &Environment, height_m: f64) -> f64 {
    air_density(
        environment.site_altitude_m + height_m,
        environment.air_resistance_enabled,
    )
}
