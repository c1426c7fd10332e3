use foundation::math::{asin_clamped, floor_mod};
use std::f64::consts::{PI, TAU};

/// Three-axis spherical rotation `[δλ, δφ, δγ]` (radians): a spin about the
/// polar axis followed by a tilt and a roll.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Rotation {
    delta_lambda: f64,
    cos_phi: f64,
    sin_phi: f64,
    cos_gamma: f64,
    sin_gamma: f64,
    tilts: bool,
}

impl Rotation {
    pub fn from_degrees(rotate: [f64; 3]) -> Self {
        let delta_lambda = (rotate[0] % 360.0).to_radians();
        let delta_phi = (rotate[1] % 360.0).to_radians();
        let delta_gamma = (rotate[2] % 360.0).to_radians();
        Self {
            delta_lambda,
            cos_phi: delta_phi.cos(),
            sin_phi: delta_phi.sin(),
            cos_gamma: delta_gamma.cos(),
            sin_gamma: delta_gamma.sin(),
            tilts: delta_phi != 0.0 || delta_gamma != 0.0,
        }
    }

    pub fn forward(&self, lambda: f64, phi: f64) -> [f64; 2] {
        let lambda = wrap(lambda + self.delta_lambda);
        if !self.tilts {
            return [lambda, phi];
        }
        let cos_phi = phi.cos();
        let x = lambda.cos() * cos_phi;
        let y = lambda.sin() * cos_phi;
        let z = phi.sin();
        let k = z * self.cos_phi + x * self.sin_phi;
        [
            (y * self.cos_gamma - k * self.sin_gamma).atan2(x * self.cos_phi - z * self.sin_phi),
            asin_clamped(k * self.cos_gamma + y * self.sin_gamma),
        ]
    }

    pub fn invert(&self, lambda: f64, phi: f64) -> [f64; 2] {
        let [lambda, phi] = if self.tilts {
            let cos_phi = phi.cos();
            let x = lambda.cos() * cos_phi;
            let y = lambda.sin() * cos_phi;
            let z = phi.sin();
            let k = z * self.cos_gamma - y * self.sin_gamma;
            [
                (y * self.cos_gamma + z * self.sin_gamma).atan2(x * self.cos_phi + k * self.sin_phi),
                asin_clamped(k * self.cos_phi - x * self.sin_phi),
            ]
        } else {
            [lambda, phi]
        };
        [wrap(lambda - self.delta_lambda), phi]
    }
}

fn wrap(lambda: f64) -> f64 {
    if (-PI..=PI).contains(&lambda) {
        lambda
    } else {
        floor_mod(lambda + PI, TAU) - PI
    }
}
