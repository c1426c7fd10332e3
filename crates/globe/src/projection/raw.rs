//! Unit-sphere projections in radians, before rotation, scale and translate.

use std::f64::consts::{FRAC_PI_2, PI, SQRT_2};
use std::sync::Arc;

use foundation::math::{acos_clamped, asin_clamped, sinci};

use super::polyhedral::Polyhedron;

const EPSILON: f64 = 1e-6;

const MOLLWEIDE_CX: f64 = SQRT_2 / FRAC_PI_2;
const MOLLWEIDE_CY: f64 = SQRT_2;

/// Parameters of a conic equidistant projection.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Conic {
    n: f64,
    g: f64,
}

#[derive(Debug, Clone)]
pub enum RawProjection {
    Orthographic,
    Stereographic,
    AzimuthalEquidistant,
    Equirectangular,
    ConicEquidistant(Conic),
    Mollweide,
    Winkel3,
    Polyhedral(Arc<Polyhedron>),
}

impl RawProjection {
    /// Conic equidistant with standard parallels `phi0`, `phi1` (degrees).
    ///
    /// Degenerates to equirectangular when the cone constant vanishes.
    pub fn conic_equidistant(phi0: f64, phi1: f64) -> Self {
        let (phi0, phi1) = (phi0.to_radians(), phi1.to_radians());
        let cos0 = phi0.cos();
        let n = if (phi0 - phi1).abs() < EPSILON {
            phi0.sin()
        } else {
            (cos0 - phi1.cos()) / (phi1 - phi0)
        };
        if n.abs() < EPSILON {
            return RawProjection::Equirectangular;
        }
        RawProjection::ConicEquidistant(Conic {
            n,
            g: cos0 / n + phi0,
        })
    }

    pub fn octahedral_butterfly() -> Self {
        RawProjection::Polyhedral(Arc::new(Polyhedron::octahedral_butterfly()))
    }

    pub fn forward(&self, lambda: f64, phi: f64) -> Option<[f64; 2]> {
        let p = match self {
            RawProjection::Orthographic => azimuthal(lambda, phi, |_| 1.0),
            RawProjection::Stereographic => azimuthal(lambda, phi, |cc| 1.0 / (1.0 + cc)),
            RawProjection::AzimuthalEquidistant => {
                azimuthal(lambda, phi, |cc| sinci(acos_clamped(cc)))
            }
            RawProjection::Equirectangular => [lambda, phi],
            RawProjection::ConicEquidistant(c) => {
                let rho = c.g - phi;
                let a = c.n * lambda;
                [rho * a.sin(), c.g - rho * a.cos()]
            }
            RawProjection::Mollweide => {
                let theta = mollweide_theta(phi);
                [MOLLWEIDE_CX * lambda * theta.cos(), MOLLWEIDE_CY * theta.sin()]
            }
            RawProjection::Winkel3 => winkel3(lambda, phi),
            RawProjection::Polyhedral(poly) => poly.forward(lambda, phi),
        };
        (p[0].is_finite() && p[1].is_finite()).then_some(p)
    }

    /// Inverse mapping; `None` where the point has no preimage on the sphere.
    pub fn invert(&self, x: f64, y: f64) -> Option<[f64; 2]> {
        let p = match self {
            RawProjection::Orthographic => azimuthal_invert(x, y, |z| {
                (z <= 1.0 + EPSILON).then(|| asin_clamped(z))
            })?,
            RawProjection::Stereographic => azimuthal_invert(x, y, |z| Some(2.0 * z.atan()))?,
            RawProjection::AzimuthalEquidistant => {
                azimuthal_invert(x, y, |z| (z <= PI + EPSILON).then_some(z))?
            }
            RawProjection::Equirectangular => in_range([x, y])?,
            RawProjection::ConicEquidistant(c) => {
                let rho0_y = c.g - y;
                let lambda = x.atan2(rho0_y) / c.n;
                let phi = c.g - c.n.signum() * (x * x + rho0_y * rho0_y).sqrt();
                in_range([lambda, phi])?
            }
            RawProjection::Mollweide => mollweide_invert(x, y)?,
            RawProjection::Winkel3 => winkel3_invert(x, y)?,
            RawProjection::Polyhedral(poly) => poly.invert(x, y)?,
        };
        (p[0].is_finite() && p[1].is_finite()).then_some(p)
    }

    /// Whether the outline of this projection comes from its own face geometry
    /// rather than from clipping.
    pub fn is_polyhedral(&self) -> bool {
        matches!(self, RawProjection::Polyhedral(_))
    }
}

fn azimuthal(lambda: f64, phi: f64, scale: impl Fn(f64) -> f64) -> [f64; 2] {
    let cos_lambda = lambda.cos();
    let cos_phi = phi.cos();
    let k = scale(cos_lambda * cos_phi);
    [k * cos_phi * lambda.sin(), k * phi.sin()]
}

fn azimuthal_invert(x: f64, y: f64, angle: impl Fn(f64) -> Option<f64>) -> Option<[f64; 2]> {
    let z = (x * x + y * y).sqrt();
    let c = angle(z)?;
    let (sc, cc) = c.sin_cos();
    let phi = if z == 0.0 { 0.0 } else { asin_clamped(y * sc / z) };
    Some([(x * sc).atan2(z * cc), phi])
}

fn in_range(p: [f64; 2]) -> Option<[f64; 2]> {
    (p[0].abs() <= PI + EPSILON && p[1].abs() <= FRAC_PI_2 + EPSILON).then_some(p)
}

/// Solves `2θ + sin 2θ = π sin φ` and returns θ.
fn mollweide_theta(phi: f64) -> f64 {
    if FRAC_PI_2 - phi.abs() < EPSILON {
        return FRAC_PI_2.copysign(phi);
    }
    let target = PI * phi.sin();
    let mut t = phi;
    for _ in 0..30 {
        let delta = (t + t.sin() - target) / (1.0 + t.cos());
        t -= delta;
        if delta.abs() < 1e-12 {
            break;
        }
    }
    t / 2.0
}

fn mollweide_invert(x: f64, y: f64) -> Option<[f64; 2]> {
    if y.abs() > MOLLWEIDE_CY + EPSILON {
        return None;
    }
    let theta = asin_clamped(y / MOLLWEIDE_CY);
    let cos_theta = theta.cos();
    let lambda = if cos_theta < EPSILON {
        if x.abs() > EPSILON {
            return None;
        }
        0.0
    } else {
        x / (MOLLWEIDE_CX * cos_theta)
    };
    let phi = asin_clamped((2.0 * theta + (2.0 * theta).sin()) / PI);
    in_range([lambda, phi])
}

fn winkel3(lambda: f64, phi: f64) -> [f64; 2] {
    let cos_phi = phi.cos();
    let half = lambda / 2.0;
    let s = sinci(acos_clamped(cos_phi * half.cos()));
    let aitoff_x = 2.0 * cos_phi * half.sin() * s;
    let aitoff_y = phi.sin() * s;
    [(aitoff_x + lambda / FRAC_PI_2) / 2.0, (aitoff_y + phi) / 2.0]
}

/// Newton iteration with a finite-difference Jacobian.
fn winkel3_invert(x: f64, y: f64) -> Option<[f64; 2]> {
    const H: f64 = 1e-7;
    let mut lambda = (x / (0.5 + 1.0 / PI)).clamp(-PI, PI);
    let mut phi = y.clamp(-FRAC_PI_2, FRAC_PI_2);
    for _ in 0..50 {
        let f = winkel3(lambda, phi);
        let (fx, fy) = (f[0] - x, f[1] - y);
        if fx.abs() < 1e-12 && fy.abs() < 1e-12 {
            break;
        }
        let hl = if lambda > 0.0 { -H } else { H };
        let hp = if phi > 0.0 { -H } else { H };
        let fl = winkel3(lambda + hl, phi);
        let fp = winkel3(lambda, phi + hp);
        let (j00, j10) = ((fl[0] - f[0]) / hl, (fl[1] - f[1]) / hl);
        let (j01, j11) = ((fp[0] - f[0]) / hp, (fp[1] - f[1]) / hp);
        let det = j00 * j11 - j01 * j10;
        if det.abs() < 1e-14 {
            break;
        }
        lambda = (lambda - (fx * j11 - fy * j01) / det).clamp(-PI, PI);
        phi = (phi - (fy * j00 - fx * j10) / det).clamp(-FRAC_PI_2, FRAC_PI_2);
    }
    let f = winkel3(lambda, phi);
    ((f[0] - x).abs() < 1e-6 && (f[1] - y).abs() < 1e-6).then_some([lambda, phi])
}
