//! Core units, constants, and shared primitives for the cannon range workspace.

/// Physical constants expressed in SI units (unless stated otherwise).
pub mod constants {
    /// Air density at sea level (kg/m³).
    pub const SEA_LEVEL_AIR_DENSITY: f64 = 1.225;
    /// Drag coefficient of a smooth sphere.
    pub const SPHERE_DRAG_COEFFICIENT: f64 = 0.47;
}

/// Unit conversion helpers.
pub mod units {
    /// Convert degrees to radians.
    #[inline]
    pub fn deg_to_rad(v: f64) -> f64 {
        v.to_radians()
    }
}

/// Minimal vector helpers for the vertical launch plane (x downrange, y up).
pub mod vector {
    /// Alias for a 2D vector in metres, m/s or m/s² depending on context.
    pub type Vector2 = [f64; 2];

    /// Euclidean norm of a vector.
    #[inline]
    pub fn norm(v: &Vector2) -> f64 {
        dot(v, v).sqrt()
    }

    /// Dot product of two vectors.
    #[inline]
    pub fn dot(a: &Vector2, b: &Vector2) -> f64 {
        a[0] * b[0] + a[1] * b[1]
    }

    /// Vector addition.
    #[inline]
    pub fn add(a: &Vector2, b: &Vector2) -> Vector2 {
        [a[0] + b[0], a[1] + b[1]]
    }

    /// Scale a vector by a scalar.
    #[inline]
    pub fn scale(v: &Vector2, s: f64) -> Vector2 {
        [v[0] * s, v[1] * s]
    }

    /// Build a vector from a magnitude and an angle above the +x axis (radians).
    #[inline]
    pub fn from_polar(magnitude: f64, angle_rad: f64) -> Vector2 {
        [magnitude * angle_rad.cos(), magnitude * angle_rad.sin()]
    }
}
