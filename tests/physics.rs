use cannon_range::physics::atmosphere::{MAX_ALTITUDE_M, air_density};
use cannon_range::physics::integrator::{self, BodyProperties, KinematicState};
use cannon_range::primitives::constants::SEA_LEVEL_AIR_DENSITY;

const G: f64 = 9.81;

fn cannonball(drag_coefficient: f64) -> BodyProperties {
    BodyProperties {
        mass_kg: 5.44,
        diameter_m: 0.11,
        drag_coefficient,
    }
}

#[test]
fn density_is_zero_without_air_resistance() {
    for h in [0.0, 100.0, 12_000.0, 29_000.0] {
        assert_eq!(air_density(h, false), 0.0);
    }
}

#[test]
fn sea_level_density_matches_constant() {
    assert_eq!(air_density(0.0, true), SEA_LEVEL_AIR_DENSITY);
}

#[test]
fn density_decreases_monotonically_to_thirty_km() {
    let mut previous = air_density(0.0, true);
    let mut h = 50.0;
    while h <= MAX_ALTITUDE_M {
        let rho = air_density(h, true);
        assert!(rho >= 0.0);
        assert!(rho < previous, "density rose between {} m and {} m", h - 50.0, h);
        previous = rho;
        h += 50.0;
    }
    // Roughly 0.018 kg/m³ at 30 km in the standard atmosphere.
    assert!((previous - 0.018).abs() < 0.002, "rho(30 km) = {previous}");
}

#[test]
fn density_is_continuous_at_layer_boundaries() {
    for boundary in [11_000.0, 20_000.0] {
        let below = air_density(boundary - 1e-6, true);
        let above = air_density(boundary + 1e-6, true);
        assert!((below - above).abs() < 1e-8, "jump at {boundary} m");
    }
}

#[test]
fn out_of_range_altitudes_are_clamped() {
    assert_eq!(air_density(-500.0, true), air_density(0.0, true));
    assert_eq!(air_density(45_000.0, true), air_density(MAX_ALTITUDE_M, true));
}

#[test]
fn drag_free_step_reproduces_the_parabola() {
    let v0 = 20.0_f64;
    let theta = 40.0_f64.to_radians();
    let mut state = KinematicState {
        position: [0.0, 0.0],
        velocity: [v0 * theta.cos(), v0 * theta.sin()],
    };
    let body = cannonball(0.47);
    for _ in 0..1_000 {
        state = integrator::step(&state, &body, 0.0, G, 0.001).state;
    }
    let t = 1.0;
    let x = v0 * theta.cos() * t;
    let y = v0 * theta.sin() * t - 0.5 * G * t * t;
    assert!((state.position[0] - x).abs() < 1e-9);
    assert!((state.position[1] - y).abs() < 1e-9);
    assert!((state.velocity[1] - (v0 * theta.sin() - G * t)).abs() < 1e-9);
}

#[test]
fn drag_opposes_velocity() {
    let body = cannonball(0.47);
    let a = integrator::acceleration(&[30.0, 0.0], &body, 1.225, G);
    let area = std::f64::consts::PI * 0.11 * 0.11 / 4.0;
    let expected = 0.5 * 1.225 * 0.47 * area * 900.0 / 5.44;
    assert!((a[0] + expected).abs() < 1e-12);
    assert_eq!(a[1], -G);
}

#[test]
fn zero_drag_coefficient_ignores_density() {
    let a = integrator::acceleration(&[30.0, 10.0], &cannonball(0.0), 1.225, G);
    assert_eq!(a, [0.0, -G]);
}

#[test]
fn step_is_pure() {
    let state = KinematicState {
        position: [1.0, 2.0],
        velocity: [15.0, 7.5],
    };
    let body = cannonball(0.47);
    let first = integrator::step(&state, &body, 1.1, G, 0.001);
    let second = integrator::step(&state, &body, 1.1, G, 0.001);
    assert_eq!(first, second);
    assert!(first.state.velocity[0] < 15.0);
}
