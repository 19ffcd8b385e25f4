use cannon_range::config::SimulationSettings;
use cannon_range::sim::{
    Environment, IllegalOperation, LaunchLimits, LaunchParameters, ParameterRange, PoolLimits,
    ProjectileSpec, SamplingPlan, Session, SimulationError, TargetZone, TrajectoryId,
    TrajectoryPool,
};

const FRAME: f64 = 0.016;

fn session() -> Session {
    Session::new(SimulationSettings::default()).expect("default settings")
}

fn launch(angle: f64, speed: f64) -> LaunchParameters {
    LaunchParameters::new(ProjectileSpec::cannonball(), 0.0, angle, speed)
}

fn run_until_landed(session: &mut Session) {
    for _ in 0..100_000 {
        if session.pool().flying_count() == 0 {
            return;
        }
        session.advance(FRAME);
    }
    panic!("trajectories never landed");
}

fn ids(session: &Session) -> Vec<TrajectoryId> {
    session.trajectories().map(|r| r.trajectory.id()).collect()
}

#[test]
fn identical_launch_rides_existing_trajectory() {
    let mut session = session();
    let first = session.fire(launch(45.0, 20.0)).unwrap();
    session.advance(FRAME * 5.0);
    let second = session.fire(launch(45.0, 20.0)).unwrap();

    assert!(!first.attached);
    assert!(second.attached);
    assert_eq!(first.trajectory, second.trajectory);
    assert_ne!(first.rider, second.rider);
    assert_eq!(session.pool().len(), 1);

    let trajectory = session.pool().get(first.trajectory).unwrap();
    assert_eq!(trajectory.riders().len(), 2);
    let leader = trajectory.rider_point_index(&trajectory.riders()[0]);
    let follower = trajectory.rider_point_index(&trajectory.riders()[1]);
    assert!(leader > follower);
    assert_eq!(follower, 0);
}

#[test]
fn trailing_rider_keeps_trajectory_flying() {
    let mut session = session();
    let first = session.fire(launch(45.0, 10.0)).unwrap();
    for _ in 0..30 {
        session.advance(FRAME);
    }
    session.fire(launch(45.0, 10.0)).unwrap();

    // Advance until the trajectory itself has landed.
    while !session.pool().get(first.trajectory).unwrap().is_landed() {
        session.advance(FRAME);
    }
    let trajectory = session.pool().get(first.trajectory).unwrap();
    assert!(trajectory.rider_landed(&trajectory.riders()[0]));
    assert!(!trajectory.rider_landed(&trajectory.riders()[1]));
    assert!(trajectory.is_flying());
    let recorded = trajectory.points().len();

    run_until_landed(&mut session);
    let trajectory = session.pool().get(first.trajectory).unwrap();
    assert!(!trajectory.is_flying());
    assert_eq!(trajectory.points().len(), recorded);
    let last = trajectory.points().len() - 1;
    assert_eq!(trajectory.rider_point_index(&trajectory.riders()[1]), last);
}

#[test]
fn landed_trajectory_gets_a_fresh_copy() {
    let mut session = session();
    let first = session.fire(launch(45.0, 10.0)).unwrap();
    run_until_landed(&mut session);
    let second = session.fire(launch(45.0, 10.0)).unwrap();
    assert!(!second.attached);
    assert_ne!(first.trajectory, second.trajectory);
    assert_eq!(session.pool().len(), 2);
}

#[test]
fn environment_change_prevents_sharing() {
    let mut session = session();
    let first = session.fire(launch(45.0, 20.0)).unwrap();
    session.set_air_resistance_enabled(true);
    let second = session.fire(launch(45.0, 20.0)).unwrap();
    assert!(!second.attached);
    assert_ne!(first.trajectory, second.trajectory);
}

#[test]
fn fourth_flying_trajectory_is_refused_without_side_effects() {
    let mut session = session();
    for angle in [30.0, 40.0, 50.0] {
        session.fire(launch(angle, 20.0)).unwrap();
    }
    let before = session.snapshot();

    let err = session.fire(launch(60.0, 20.0)).unwrap_err();
    assert_eq!(
        err,
        SimulationError::CapacityExceeded {
            flying: 3,
            limit: 3
        }
    );
    assert_eq!(session.snapshot(), before);

    // A duplicate of an in-flight launch adds no flying trajectory.
    let rider = session.fire(launch(40.0, 20.0)).unwrap();
    assert!(rider.attached);
    assert_eq!(session.pool().flying_count(), 3);

    run_until_landed(&mut session);
    assert!(session.fire(launch(60.0, 20.0)).is_ok());
}

#[test]
fn population_caps_hold_under_any_fire_sequence() {
    let mut session = session();
    let mut refused = 0;
    for i in 0..60 {
        let angle = 10.0 + (i % 25) as f64 * 3.0;
        let speed = 5.0 + (i % 7) as f64 * 3.5;
        match session.fire(launch(angle, speed)) {
            Ok(_) => {}
            Err(SimulationError::CapacityExceeded { .. }) => refused += 1,
            Err(other) => panic!("unexpected error: {other}"),
        }
        for _ in 0..(i % 9) * 10 {
            session.advance(FRAME);
        }
        assert!(session.pool().len() <= 5);
        assert!(session.pool().flying_count() <= 3);
    }
    assert!(refused > 0);
}

#[test]
fn oldest_trajectory_is_evicted_past_total_cap() {
    let mut session = session();
    let mut fired = Vec::new();
    for i in 0..5 {
        fired.push(session.fire(launch(20.0 + i as f64, 5.0)).unwrap().trajectory);
        run_until_landed(&mut session);
    }
    assert_eq!(session.pool().len(), 5);

    let outcome = session.fire(launch(60.0, 5.0)).unwrap();
    assert_eq!(outcome.evicted, vec![fired[0]]);
    assert_eq!(session.pool().len(), 5);
    assert!(session.pool().get(fired[0]).is_none());

    let mut expected = vec![outcome.trajectory];
    expected.extend(fired[1..].iter().rev());
    assert_eq!(ids(&session), expected);
    for ranked in session.trajectories() {
        assert_eq!(session.pool().rank_of(ranked.trajectory.id()), Some(ranked.rank));
    }

    let err = session.attach_rider(fired[0]).unwrap_err();
    assert_eq!(
        err,
        SimulationError::IllegalOperation(IllegalOperation::NotInPool(fired[0]))
    );
}

#[test]
fn newest_trajectory_has_rank_zero() {
    let mut session = session();
    let a = session.fire(launch(30.0, 10.0)).unwrap().trajectory;
    let b = session.fire(launch(40.0, 10.0)).unwrap().trajectory;
    assert_eq!(session.pool().rank_of(b), Some(0));
    assert_eq!(session.pool().rank_of(a), Some(1));
}

#[test]
fn erase_then_fire_leaves_one_trajectory_at_rank_zero() {
    let mut session = session();
    for angle in [30.0, 40.0, 50.0] {
        session.fire(launch(angle, 20.0)).unwrap();
    }
    session.erase();
    assert!(session.pool().is_empty());

    let outcome = session.fire(launch(45.0, 15.0)).unwrap();
    let ranked: Vec<_> = session.trajectories().collect();
    assert_eq!(ranked.len(), 1);
    assert_eq!(ranked[0].rank, 0);
    assert_eq!(ranked[0].trajectory.id(), outcome.trajectory);
}

#[test]
fn rider_cannot_join_a_landed_trajectory() {
    let mut session = session();
    let outcome = session.fire(launch(45.0, 10.0)).unwrap();
    let extra = session.attach_rider(outcome.trajectory).unwrap();
    assert_ne!(extra, outcome.rider);

    run_until_landed(&mut session);
    let err = session.attach_rider(outcome.trajectory).unwrap_err();
    assert_eq!(
        err,
        SimulationError::IllegalOperation(IllegalOperation::TrajectoryLanded(outcome.trajectory))
    );
    assert_eq!(session.pool().get(outcome.trajectory).unwrap().riders().len(), 2);
}

#[test]
fn out_of_range_launches_are_rejected_before_creation() {
    let mut session = session();
    let cases = [
        launch(95.0, 10.0),
        launch(45.0, 31.0),
        launch(45.0, -1.0),
        launch(45.0, f64::NAN),
        LaunchParameters::new(ProjectileSpec::cannonball(), 20.0, 45.0, 10.0),
        launch(45.0, 10.0).with_diameter(2.0),
        launch(45.0, 10.0).with_drag_coefficient(-0.1),
    ];
    for params in cases {
        let err = session.fire(params).unwrap_err();
        assert!(
            matches!(err, SimulationError::InvalidParameter { .. }),
            "unexpected {err:?}"
        );
    }
    let mut heavy = ProjectileSpec::cannonball();
    heavy.mass_kg = 50.0;
    assert!(matches!(
        session.fire(LaunchParameters::new(heavy, 0.0, 45.0, 10.0)),
        Err(SimulationError::InvalidParameter { name: "mass_kg", .. })
    ));
    assert!(session.pool().is_empty());

    // Rider ids are only consumed by successful fires.
    let ok = session.fire(launch(45.0, 10.0)).unwrap();
    assert_eq!(ok.rider.0, 0);
    assert_eq!(ok.trajectory.0, 0);
}

#[test]
fn erase_clears_the_latest_score() {
    let mut session = session();
    session.fire(launch(45.0, 10.0)).unwrap();
    run_until_landed(&mut session);
    assert!(session.latest_score().is_some());

    session.erase();
    assert!(session.pool().is_empty());
    assert_eq!(session.latest_score(), None);
}

#[test]
fn sampling_plan_needs_a_positive_step_count() {
    assert!(SamplingPlan::new(0.001, 0).is_none());
    assert!(SamplingPlan::new(0.0, 25).is_none());
    assert!(SamplingPlan::new(f64::NAN, 25).is_none());

    let plan = SamplingPlan::new(0.001, 1).expect("one micro-step per sample");
    let mut pool = TrajectoryPool::new(
        PoolLimits {
            max_trajectories: 2,
            max_flying: 1,
        },
        LaunchLimits {
            height: ParameterRange::new(0.0, 15.0),
            angle: ParameterRange::new(-90.0, 90.0),
            speed: ParameterRange::new(0.0, 30.0),
        },
        plan,
    );
    let environment = Environment {
        gravity_m_s2: 9.81,
        air_resistance_enabled: false,
        site_altitude_m: 0.0,
    };
    let outcome = pool.fire(launch(45.0, 10.0), environment).unwrap();
    pool.advance(0.01, &TargetZone::new(15.0, 1.5));
    assert_eq!(pool.get(outcome.trajectory).unwrap().points().len(), 11);
}
