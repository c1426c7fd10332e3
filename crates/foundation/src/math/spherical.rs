use std::f64::consts::{FRAC_PI_2, PI};

/// Floored modulo: the result carries the sign of `n`.
pub fn floor_mod(a: f64, n: f64) -> f64 {
    a - n * (a / n).floor()
}

/// `asin` that tolerates rounding just outside `[-1, 1]`.
pub fn asin_clamped(x: f64) -> f64 {
    if x > 1.0 {
        FRAC_PI_2
    } else if x < -1.0 {
        -FRAC_PI_2
    } else {
        x.asin()
    }
}

/// `acos` that tolerates rounding just outside `[-1, 1]`.
pub fn acos_clamped(x: f64) -> f64 {
    if x > 1.0 {
        0.0
    } else if x < -1.0 {
        PI
    } else {
        x.acos()
    }
}

/// Unit vector for `[λ, φ]` in radians.
pub fn cartesian(lambda: f64, phi: f64) -> [f64; 3] {
    let cos_phi = phi.cos();
    [cos_phi * lambda.cos(), cos_phi * lambda.sin(), phi.sin()]
}

/// `[λ, φ]` in radians for a (not necessarily unit) direction.
pub fn spherical(v: [f64; 3]) -> [f64; 2] {
    let r = (v[0] * v[0] + v[1] * v[1] + v[2] * v[2]).sqrt();
    if r == 0.0 {
        return [0.0, 0.0];
    }
    [v[1].atan2(v[0]), asin_clamped(v[2] / r)]
}

/// `x / sin(x)` with the removable singularity filled in.
pub fn sinci(x: f64) -> f64 {
    if x == 0.0 { 1.0 } else { x / x.sin() }
}
