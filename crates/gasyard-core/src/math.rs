//! Small numeric helpers shared by the renderers.

use std::f64::consts::{PI, TAU};

/// Deterministic pseudo-random value in `[0, 1)` for an integer-valued seed.
///
/// `frac(sin(seed * 12.9898) * 43758.5453)`. The constants are part of the
/// visual output: changing them changes every band's dot pattern.
pub fn rand01(seed: f64) -> f64 {
    let x = (seed * 12.9898).sin() * 43758.5453;
    let r = x - x.floor();
    // `x - floor(x)` can round up to exactly 1.0 for tiny negative x.
    if r >= 1.0 { 0.0 } else { r }
}

/// Clamp to `[0, 1]`. NaN maps to 0.
pub fn clamp01(x: f64) -> f64 {
    if x > 0.0 { x.min(1.0) } else { 0.0 }
}

/// Signed difference `a - b` wrapped into `[-π, π]`.
pub fn angular_diff(a: f64, b: f64) -> f64 {
    let mut d = a - b;
    while d > PI {
        d -= TAU;
    }
    while d < -PI {
        d += TAU;
    }
    d
}
