//! Simulation session that owns the clock, the trajectory pool, and the
//! environment settings, and exposes the commands a front-end issues.

pub mod clock;
pub mod pool;
pub mod score;
pub mod trajectory;

use cannon_config::{ConfigError, SimulationSettings};
use cannon_projectile::ParameterRange;
use tracing::{debug, info};

use self::clock::{ClockState, SimulationClock, SimulationSpeed};
use self::pool::{FireOutcome, LaunchLimits, PoolLimits, RankedTrajectory, TrajectoryPool};
use self::score::{ScoreEvent, TargetZone};
use self::trajectory::{
    DataPoint, Environment, LaunchParameters, RiderId, SamplingPlan, TrajectoryId,
};

/// Errors surfaced by simulation commands. None of them alter state.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SimulationError {
    #[error("{flying} trajectories already in flight (limit {limit})")]
    CapacityExceeded { flying: usize, limit: usize },
    #[error("{name} = {value} is outside the allowed range [{min}, {max}]")]
    InvalidParameter {
        name: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },
    #[error(transparent)]
    IllegalOperation(#[from] IllegalOperation),
}

/// Commands that are well-formed but not allowed in the current state.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IllegalOperation {
    #[error("trajectory {0} has already landed")]
    TrajectoryLanded(TrajectoryId),
    #[error("trajectory {0} is no longer in the pool")]
    NotInPool(TrajectoryId),
}

/// Result of one frame.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FrameReport {
    pub simulated_delta_s: f64,
    /// Landings scored during this frame, in pool rank order.
    pub landings: Vec<ScoreEvent>,
}

/// Rider state as seen by a renderer.
#[derive(Debug, Clone, PartialEq)]
pub struct RiderSnapshot {
    pub id: RiderId,
    pub point_index: usize,
    pub landed: bool,
}

/// Immutable copy of one trajectory.
#[derive(Debug, Clone, PartialEq)]
pub struct TrajectorySnapshot {
    pub id: TrajectoryId,
    pub rank: usize,
    pub projectile: String,
    pub landed: bool,
    pub flying: bool,
    pub points: Vec<DataPoint>,
    pub riders: Vec<RiderSnapshot>,
    pub score: Option<ScoreEvent>,
}

/// Immutable per-frame copy of the session for observers.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionSnapshot {
    pub clock_state: ClockState,
    pub speed: SimulationSpeed,
    pub target: TargetZone,
    pub latest_score: Option<ScoreEvent>,
    pub trajectories: Vec<TrajectorySnapshot>,
}

/// One cannon range: everything a front-end reads and commands.
#[derive(Debug, Clone)]
pub struct Session {
    settings: SimulationSettings,
    clock: SimulationClock,
    pool: TrajectoryPool,
    target: TargetZone,
    environment: Environment,
    latest_score: Option<ScoreEvent>,
}

impl Session {
    /// Build a session from validated settings.
    pub fn new(settings: SimulationSettings) -> Result<Self, ConfigError> {
        settings.validate()?;
        let plan = SamplingPlan::new(settings.micro_step_s, settings.steps_per_sample())
            .ok_or_else(|| {
                ConfigError::Invalid("sampling plan needs at least one micro-step".to_string())
            })?;
        let pool = TrajectoryPool::new(
            PoolLimits {
                max_trajectories: settings.max_trajectories,
                max_flying: settings.max_flying_trajectories,
            },
            LaunchLimits {
                height: settings.cannon_height_range.into(),
                angle: settings.cannon_angle_range.into(),
                speed: settings.launch_speed_range.into(),
            },
            plan,
        );
        Ok(Self {
            clock: clock_from(&settings),
            pool,
            target: TargetZone::new(settings.target.center_x_m, settings.target.half_width_m),
            environment: environment_from(&settings),
            latest_score: None,
            settings,
        })
    }

    pub fn settings(&self) -> &SimulationSettings {
        &self.settings
    }

    pub fn clock(&self) -> &SimulationClock {
        &self.clock
    }

    pub fn pool(&self) -> &TrajectoryPool {
        &self.pool
    }

    pub fn environment(&self) -> &Environment {
        &self.environment
    }

    pub fn target(&self) -> &TargetZone {
        &self.target
    }

    pub fn trajectories(&self) -> impl ExactSizeIterator<Item = RankedTrajectory<'_>> {
        self.pool.trajectories()
    }

    pub fn latest_score(&self) -> Option<&ScoreEvent> {
        self.latest_score.as_ref()
    }

    /// Fire with the current environment.
    pub fn fire(&mut self, launch: LaunchParameters) -> Result<FireOutcome, SimulationError> {
        self.pool.fire(launch, self.environment)
    }

    pub fn attach_rider(&mut self, id: TrajectoryId) -> Result<RiderId, SimulationError> {
        self.pool.attach_rider(id)
    }

    /// Drop every trajectory together with the score that referred to one.
    pub fn erase(&mut self) {
        self.pool.erase();
        self.latest_score = None;
    }

    pub fn play(&mut self) {
        self.clock.play();
    }

    pub fn pause(&mut self) {
        self.clock.pause();
    }

    pub fn set_speed(&mut self, speed: SimulationSpeed) {
        self.clock.set_speed(speed);
    }

    /// Affects trajectories fired from now on.
    pub fn set_air_resistance_enabled(&mut self, enabled: bool) {
        debug!(enabled, "air resistance toggled");
        self.environment.air_resistance_enabled = enabled;
    }

    pub fn set_gravity(&mut self, gravity_m_s2: f64) -> Result<(), SimulationError> {
        pool::check(
            "gravity_m_s2",
            gravity_m_s2,
            &ParameterRange::from(self.settings.gravity_range),
        )?;
        self.environment.gravity_m_s2 = gravity_m_s2;
        Ok(())
    }

    pub fn set_altitude(&mut self, site_altitude_m: f64) -> Result<(), SimulationError> {
        pool::check(
            "site_altitude_m",
            site_altitude_m,
            &ParameterRange::from(self.settings.altitude_range),
        )?;
        self.environment.site_altitude_m = site_altitude_m;
        Ok(())
    }

    /// Move or resize the target. Already-landed trajectories keep their score.
    pub fn set_target_zone(&mut self, target: TargetZone) -> Result<(), SimulationError> {
        if !target.center_x_m.is_finite() {
            return Err(SimulationError::InvalidParameter {
                name: "target_center_x_m",
                value: target.center_x_m,
                min: f64::MIN,
                max: f64::MAX,
            });
        }
        if !(target.half_width_m.is_finite() && target.half_width_m >= 0.0) {
            return Err(SimulationError::InvalidParameter {
                name: "target_half_width_m",
                value: target.half_width_m,
                min: 0.0,
                max: f64::MAX,
            });
        }
        self.target = target;
        Ok(())
    }

    /// Advance by one rendered frame.
    pub fn advance(&mut self, frame_delta_s: f64) -> FrameReport {
        let simulated = self.clock.advance(frame_delta_s);
        self.run(simulated)
    }

    /// Advance by exactly one fixed frame, ignoring play state and speed.
    pub fn step(&mut self) -> FrameReport {
        let simulated = self.clock.single_step();
        self.run(simulated)
    }

    /// Restore the settings' initial state and empty the pool.
    pub fn reset(&mut self) {
        info!("session reset");
        self.pool.erase();
        self.clock = clock_from(&self.settings);
        self.target = TargetZone::new(
            self.settings.target.center_x_m,
            self.settings.target.half_width_m,
        );
        self.environment = environment_from(&self.settings);
        self.latest_score = None;
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        let trajectories = self
            .pool
            .trajectories()
            .map(|ranked| {
                let t = ranked.trajectory;
                TrajectorySnapshot {
                    id: t.id(),
                    rank: ranked.rank,
                    projectile: t.launch().spec.name.clone(),
                    landed: t.is_landed(),
                    flying: t.is_flying(),
                    points: t.points().to_vec(),
                    riders: t
                        .riders()
                        .iter()
                        .map(|rider| RiderSnapshot {
                            id: rider.id(),
                            point_index: t.rider_point_index(rider),
                            landed: t.rider_landed(rider),
                        })
                        .collect(),
                    score: t.score().copied(),
                }
            })
            .collect();

        SessionSnapshot {
            clock_state: self.clock.state(),
            speed: self.clock.speed(),
            target: self.target,
            latest_score: self.latest_score,
            trajectories,
        }
    }

    fn run(&mut self, simulated_delta_s: f64) -> FrameReport {
        let landings = self.pool.advance(simulated_delta_s, &self.target);
        if let Some(last) = landings.last() {
            self.latest_score = Some(*last);
        }
        FrameReport {
            simulated_delta_s,
            landings,
        }
    }
}

fn clock_from(settings: &SimulationSettings) -> SimulationClock {
    SimulationClock::new(
        settings.normal_speed_scale,
        settings.slow_speed_scale,
        settings.step_frame_delta_s,
        settings.start_playing,
    )
}

fn environment_from(settings: &SimulationSettings) -> Environment {
    Environment {
        gravity_m_s2: settings.gravity_m_s2,
        air_resistance_enabled: false,
        site_altitude_m: settings.altitude_range[0],
    }
}
