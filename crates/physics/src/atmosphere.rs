//! Standard-atmosphere air density for the lower 30 km.
//!
//! Layers follow the ICAO standard atmosphere (troposphere, tropopause and the
//! first stratosphere layer). Layer base pressures are chained from the layer
//! below so the profile is continuous at 11 km and 20 km, and the result is
//! scaled so that the sea-level value is exactly [`SEA_LEVEL_AIR_DENSITY`].

use cannon_core::constants::SEA_LEVEL_AIR_DENSITY;

/// Highest altitude modelled (m). Inputs above are clamped.
pub const MAX_ALTITUDE_M: f64 = 30_000.0;

const G0: f64 = 9.80665;
const R_AIR: f64 = 287.052_87; // J/(kg·K)

const T0: f64 = 288.15; // K
const TROPOSPHERE_LAPSE: f64 = -0.0065; // K/m
const TROPOPAUSE_BASE_M: f64 = 11_000.0;
const STRATOSPHERE_BASE_M: f64 = 20_000.0;
const STRATOSPHERE_LAPSE: f64 = 0.001; // K/m

/// Air density (kg/m³) at `altitude_m`.
///
/// Returns 0 when air resistance is disabled. Altitudes outside
/// `[0, MAX_ALTITUDE_M]` are clamped rather than rejected.
pub fn air_density(altitude_m: f64, air_resistance_enabled: bool) -> f64 {
    if !air_resistance_enabled {
        return 0.0;
    }
    let h = if altitude_m.is_nan() {
        0.0
    } else {
        altitude_m.clamp(0.0, MAX_ALTITUDE_M)
    };
    let (temperature_ratio, pressure_ratio) = ratios(h);
    SEA_LEVEL_AIR_DENSITY * pressure_ratio / temperature_ratio
}

/// Temperature and pressure relative to sea level at altitude `h` (m).
fn ratios(h: f64) -> (f64, f64) {
    let t_tropopause = T0 + TROPOSPHERE_LAPSE * TROPOPAUSE_BASE_M;

    if h <= TROPOPAUSE_BASE_M {
        let t = T0 + TROPOSPHERE_LAPSE * h;
        return (t / T0, gradient_layer(t / T0, TROPOSPHERE_LAPSE));
    }

    let p_tropopause = gradient_layer(t_tropopause / T0, TROPOSPHERE_LAPSE);
    if h <= STRATOSPHERE_BASE_M {
        let p = p_tropopause * isothermal_layer(h - TROPOPAUSE_BASE_M, t_tropopause);
        return (t_tropopause / T0, p);
    }

    let p_stratosphere =
        p_tropopause * isothermal_layer(STRATOSPHERE_BASE_M - TROPOPAUSE_BASE_M, t_tropopause);
    let t = t_tropopause + STRATOSPHERE_LAPSE * (h - STRATOSPHERE_BASE_M);
    let p = p_stratosphere * gradient_layer(t / t_tropopause, STRATOSPHERE_LAPSE);
    (t / T0, p)
}

// Pressure ratio across a layer with constant lapse rate, given the
// temperature ratio between the point and the layer base.
fn gradient_layer(temperature_ratio: f64, lapse: f64) -> f64 {
    temperature_ratio.powf(-G0 / (R_AIR * lapse))
}

fn isothermal_layer(dh: f64, temperature: f64) -> f64 {
    (-G0 * dh / (R_AIR * temperature)).exp()
}
