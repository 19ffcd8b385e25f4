//! Bounded, newest-first collection of trajectories.

use cannon_projectile::ParameterRange;
use tracing::{info, warn};

use super::score::{self, ScoreEvent, TargetZone};
use super::trajectory::{
    Environment, LaunchParameters, RiderId, SamplingPlan, Trajectory, TrajectoryId,
};
use super::{IllegalOperation, SimulationError};

/// Population caps for the pool.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PoolLimits {
    pub max_trajectories: usize,
    pub max_flying: usize,
}

/// Accepted ranges for launch inputs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LaunchLimits {
    pub height: ParameterRange,
    pub angle: ParameterRange,
    pub speed: ParameterRange,
}

/// What a successful fire did to the pool.
#[derive(Debug, Clone, PartialEq)]
pub struct FireOutcome {
    pub trajectory: TrajectoryId,
    pub rider: RiderId,
    /// True when the rider joined an existing in-flight trajectory.
    pub attached: bool,
    /// Trajectories dropped to respect the total cap, oldest first.
    pub evicted: Vec<TrajectoryId>,
}

/// Trajectory together with its recency rank (0 = newest).
#[derive(Debug, Clone, Copy)]
pub struct RankedTrajectory<'a> {
    pub rank: usize,
    pub trajectory: &'a Trajectory,
}

#[derive(Debug, Clone)]
pub struct TrajectoryPool {
    // Newest first; a trajectory's rank is its index.
    trajectories: Vec<Trajectory>,
    limits: PoolLimits,
    launch_limits: LaunchLimits,
    plan: SamplingPlan,
    next_trajectory_id: u64,
    next_rider_id: u64,
}

impl TrajectoryPool {
    pub fn new(limits: PoolLimits, launch_limits: LaunchLimits, plan: SamplingPlan) -> Self {
        Self {
            trajectories: Vec::with_capacity(limits.max_trajectories + 1),
            limits,
            launch_limits,
            plan,
            next_trajectory_id: 0,
            next_rider_id: 0,
        }
    }

    pub fn limits(&self) -> PoolLimits {
        self.limits
    }

    pub fn len(&self) -> usize {
        self.trajectories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trajectories.is_empty()
    }

    /// Number of trajectories with at least one rider still in the air.
    pub fn flying_count(&self) -> usize {
        self.trajectories.iter().filter(|t| t.is_flying()).count()
    }

    /// Read-only view ordered by rank.
    pub fn trajectories(&self) -> impl ExactSizeIterator<Item = RankedTrajectory<'_>> {
        self.trajectories
            .iter()
            .enumerate()
            .map(|(rank, trajectory)| RankedTrajectory { rank, trajectory })
    }

    pub fn get(&self, id: TrajectoryId) -> Option<&Trajectory> {
        self.trajectories.iter().find(|t| t.id() == id)
    }

    pub fn rank_of(&self, id: TrajectoryId) -> Option<usize> {
        self.trajectories.iter().position(|t| t.id() == id)
    }

    /// Fire a projectile.
    ///
    /// A launch identical to an in-flight trajectory rides that trajectory.
    /// Otherwise a new trajectory is created, unless the flying cap is
    /// reached, and the oldest trajectories are evicted past the total cap.
    pub fn fire(
        &mut self,
        launch: LaunchParameters,
        environment: Environment,
    ) -> Result<FireOutcome, SimulationError> {
        self.validate(&launch)?;

        if let Some(index) = self
            .trajectories
            .iter()
            .position(|t| !t.is_landed() && same_launch(t, &launch, &environment))
        {
            let rider = self.allocate_rider();
            let trajectory = &mut self.trajectories[index];
            trajectory.add_rider(rider);
            info!(
                trajectory = %trajectory.id(),
                riders = trajectory.riders().len(),
                "rider attached to in-flight trajectory"
            );
            return Ok(FireOutcome {
                trajectory: trajectory.id(),
                rider,
                attached: true,
                evicted: Vec::new(),
            });
        }

        let flying = self.flying_count();
        if flying >= self.limits.max_flying {
            warn!(flying, limit = self.limits.max_flying, "fire refused");
            return Err(SimulationError::CapacityExceeded {
                flying,
                limit: self.limits.max_flying,
            });
        }

        let id = TrajectoryId(self.next_trajectory_id);
        self.next_trajectory_id += 1;
        let rider = self.allocate_rider();
        info!(
            trajectory = %id,
            projectile = %launch.spec.name,
            height_m = launch.launch_height_m,
            angle_deg = launch.launch_angle_deg,
            speed_m_s = launch.launch_speed_m_s,
            "trajectory fired"
        );
        self.trajectories
            .insert(0, Trajectory::new(id, launch, environment, self.plan, rider));

        let mut evicted = Vec::new();
        while self.trajectories.len() > self.limits.max_trajectories {
            if let Some(oldest) = self.trajectories.pop() {
                info!(trajectory = %oldest.id(), "trajectory evicted");
                evicted.push(oldest.id());
            }
        }

        Ok(FireOutcome {
            trajectory: id,
            rider,
            attached: false,
            evicted,
        })
    }

    /// Add a rider to a specific in-flight trajectory.
    pub fn attach_rider(&mut self, id: TrajectoryId) -> Result<RiderId, SimulationError> {
        let index = self
            .trajectories
            .iter()
            .position(|t| t.id() == id)
            .ok_or(IllegalOperation::NotInPool(id))?;
        if self.trajectories[index].is_landed() {
            return Err(IllegalOperation::TrajectoryLanded(id).into());
        }
        let rider = self.allocate_rider();
        self.trajectories[index].add_rider(rider);
        Ok(rider)
    }

    /// Step every flying trajectory by `simulated_delta_s` and score the ones
    /// that land during this step.
    pub fn advance(&mut self, simulated_delta_s: f64, target: &TargetZone) -> Vec<ScoreEvent> {
        let mut landings = Vec::new();
        if simulated_delta_s <= 0.0 {
            return landings;
        }
        for trajectory in self.trajectories.iter_mut().filter(|t| t.is_flying()) {
            if let Some(crossing) = trajectory.advance(simulated_delta_s) {
                let event = score::evaluate(trajectory.id(), &crossing, target);
                info!(
                    trajectory = %event.trajectory,
                    landing_x_m = event.landing_x_m,
                    hit = event.hit,
                    "trajectory landed"
                );
                trajectory.set_score(event);
                landings.push(event);
            }
        }
        landings
    }

    /// Drop every trajectory.
    pub fn erase(&mut self) {
        if !self.trajectories.is_empty() {
            info!(count = self.trajectories.len(), "trajectories erased");
        }
        self.trajectories.clear();
    }

    fn allocate_rider(&mut self) -> RiderId {
        let id = RiderId(self.next_rider_id);
        self.next_rider_id += 1;
        id
    }

    fn validate(&self, launch: &LaunchParameters) -> Result<(), SimulationError> {
        let spec = &launch.spec;
        check("mass_kg", spec.mass_kg, &spec.mass_range)?;
        if spec.mass_kg <= 0.0 {
            return Err(invalid("mass_kg", spec.mass_kg, f64::MIN_POSITIVE, f64::INFINITY));
        }
        check("diameter_m", launch.diameter_m, &spec.diameter_range)?;
        if launch.diameter_m <= 0.0 {
            return Err(invalid(
                "diameter_m",
                launch.diameter_m,
                f64::MIN_POSITIVE,
                f64::INFINITY,
            ));
        }
        if !(launch.drag_coefficient.is_finite() && launch.drag_coefficient >= 0.0) {
            return Err(invalid(
                "drag_coefficient",
                launch.drag_coefficient,
                0.0,
                f64::INFINITY,
            ));
        }
        check(
            "launch_height_m",
            launch.launch_height_m,
            &self.launch_limits.height,
        )?;
        check(
            "launch_angle_deg",
            launch.launch_angle_deg,
            &self.launch_limits.angle,
        )?;
        check(
            "launch_speed_m_s",
            launch.launch_speed_m_s,
            &self.launch_limits.speed,
        )
    }
}

fn same_launch(trajectory: &Trajectory, launch: &LaunchParameters, environment: &Environment) -> bool {
    trajectory.launch() == launch && trajectory.environment() == environment
}

pub(crate) fn check(
    name: &'static str,
    value: f64,
    range: &ParameterRange,
) -> Result<(), SimulationError> {
    if range.contains(value) {
        Ok(())
    } else {
        Err(invalid(name, value, range.min, range.max))
    }
}

fn invalid(name: &'static str, value: f64, min: f64, max: f64) -> SimulationError {
    SimulationError::InvalidParameter {
        name,
        value,
        min,
        max,
    }
}
