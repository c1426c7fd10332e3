//! Local projection distortion, used to turn geographic wind vectors into
//! screen-space displacement.

use globe::Projection;

/// Finite-difference step in degrees.
const H: f64 = 0.000_006_309_573_444_801_933; // 10^-5.2

/// The Jacobian of the projection at `(lambda, phi)` in degrees, evaluated
/// by finite differences around the already projected point `(x, y)`.
///
/// Returns `[dx/dλ, dy/dλ, dx/dφ, dy/dφ]` with the longitude terms divided by
/// `cos φ`. `None` when a neighbouring point does not project.
pub fn distortion(projection: &Projection, lambda: f64, phi: f64, x: f64, y: f64) -> Option<[f64; 4]> {
    // Step towards zero so the neighbour stays on the same side of the antimeridian.
    let h_lambda = if lambda < 0.0 { H } else { -H };
    let h_phi = if phi < 0.0 { H } else { -H };
    let p_lambda = projection.project([lambda + h_lambda, phi])?;
    let p_phi = projection.project([lambda, phi + h_phi])?;
    let k = phi.to_radians().cos();
    let d = [
        (p_lambda[0] - x) / h_lambda / k,
        (p_lambda[1] - y) / h_lambda / k,
        (p_phi[0] - x) / h_phi,
        (p_phi[1] - y) / h_phi,
    ];
    d.iter().all(|c| c.is_finite()).then_some(d)
}

/// Map a wind vector `[u, v, m]` at `(lambda, phi)` to screen displacement
/// `[u', v', m]`, scaled by `scale`. The magnitude passes through untouched.
///
/// Where the distortion cannot be evaluated the displacement is zero.
pub fn distort(
    projection: &Projection,
    lambda: f64,
    phi: f64,
    x: f64,
    y: f64,
    scale: f64,
    wind: [f64; 3],
) -> [f64; 3] {
    let [u, v, m] = wind;
    let (us, vs) = (u * scale, v * scale);
    match distortion(projection, lambda, phi, x, y) {
        Some(d) => [d[0] * us + d[2] * vs, d[1] * us + d[3] * vs, m],
        None => [0.0, 0.0, m],
    }
}
