//! Geographic ↔ screen mapping.
//!
//! A [`Projection`] composes a three-axis rotation, a unit-sphere raw
//! projection, and the screen transform `x = tx + k·x'`, `y = ty − k·y'`.
//! Public coordinates are `[longitude, latitude]` in degrees and screen
//! points in pixels.

pub mod polyhedral;
pub mod raw;
pub mod rotation;

use std::f64::consts::{FRAC_PI_2, PI, TAU};

use foundation::Aabb2;
use foundation::math::{Ring, clip_ring_to_rect, spherical};

pub use raw::RawProjection;
pub use rotation::Rotation;

pub const DEFAULT_SCALE: f64 = 150.0;
pub const DEFAULT_TRANSLATE: [f64; 2] = [480.0, 250.0];
pub const DEFAULT_PRECISION: f64 = 0.1;

#[derive(Debug, Clone)]
pub struct Projection {
    raw: RawProjection,
    rotate: [f64; 3],
    rotation: Rotation,
    scale: f64,
    translate: [f64; 2],
    precision: f64,
    clip_angle: Option<f64>,
    clip_extent: Option<Aabb2>,
}

impl Projection {
    pub fn new(raw: RawProjection) -> Self {
        Self {
            raw,
            rotate: [0.0; 3],
            rotation: Rotation::from_degrees([0.0; 3]),
            scale: DEFAULT_SCALE,
            translate: DEFAULT_TRANSLATE,
            precision: DEFAULT_PRECISION,
            clip_angle: None,
            clip_extent: None,
        }
    }

    pub fn with_rotate(mut self, rotate: [f64; 3]) -> Self {
        self.set_rotate(rotate);
        self
    }

    pub fn with_precision(mut self, precision: f64) -> Self {
        self.precision = precision;
        self
    }

    /// Clip to a small circle of `angle` degrees around the projection centre.
    pub fn with_clip_angle(mut self, angle: f64) -> Self {
        self.clip_angle = Some(angle);
        self
    }

    pub fn with_clip_extent(mut self, extent: Aabb2) -> Self {
        self.clip_extent = Some(extent);
        self
    }

    pub fn raw(&self) -> &RawProjection {
        &self.raw
    }

    /// Rotation `[λ, φ, γ]` in degrees. Projections store the inverse of the
    /// view orientation, so a globe centred on `(lon, lat)` has rotation
    /// `[-lon, -lat, γ]`.
    pub fn rotate(&self) -> [f64; 3] {
        self.rotate
    }

    pub fn set_rotate(&mut self, rotate: [f64; 3]) {
        self.rotate = rotate;
        self.rotation = Rotation::from_degrees(rotate);
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn set_scale(&mut self, scale: f64) {
        self.scale = scale;
    }

    pub fn translate(&self) -> [f64; 2] {
        self.translate
    }

    pub fn set_translate(&mut self, translate: [f64; 2]) {
        self.translate = translate;
    }

    /// Outline resampling tolerance. Larger values give coarser outlines.
    pub fn precision(&self) -> f64 {
        self.precision
    }

    pub fn set_precision(&mut self, precision: f64) {
        self.precision = precision;
    }

    pub fn clip_angle(&self) -> Option<f64> {
        self.clip_angle
    }

    pub fn clip_extent(&self) -> Option<Aabb2> {
        self.clip_extent
    }

    /// Geographic `[λ, φ]` (degrees) to screen pixels.
    pub fn project(&self, coord: [f64; 2]) -> Option<[f64; 2]> {
        let [lambda, phi] = self
            .rotation
            .forward(coord[0].to_radians(), coord[1].to_radians());
        let p = self.raw.forward(lambda, phi)?;
        Some(self.to_screen(p))
    }

    /// Screen pixels to geographic `[λ, φ]` (degrees).
    pub fn invert(&self, point: [f64; 2]) -> Option<[f64; 2]> {
        let x = (point[0] - self.translate[0]) / self.scale;
        let y = (self.translate[1] - point[1]) / self.scale;
        let [lambda, phi] = self.raw.invert(x, y)?;
        let [lambda, phi] = self.rotation.invert(lambda, phi);
        let coord = [lambda.to_degrees(), phi.to_degrees()];
        (coord[0].is_finite() && coord[1].is_finite()).then_some(coord)
    }

    /// The sphere's outline in screen space as one or more closed rings.
    ///
    /// The outline lives in the rotated frame, so it depends on the raw
    /// projection, clip angle, scale, translate and clip extent but not on the
    /// rotation.
    pub fn outline(&self) -> Vec<Ring> {
        // Sampling step in degrees.
        let step = (self.precision * 10.0).clamp(0.5, 10.0);
        let raw_rings: Vec<Ring> = match (&self.raw, self.clip_angle) {
            (RawProjection::Polyhedral(poly), _) => {
                poly.face_triangles().map(|t| t.to_vec()).collect()
            }
            (_, Some(angle)) => vec![self.clip_circle(angle.to_radians(), step)],
            _ => vec![self.frame(step)],
        };
        let mut rings: Vec<Ring> = raw_rings
            .into_iter()
            .map(|ring| ring.into_iter().map(|p| self.to_screen(p)).collect())
            .collect();
        if let Some(extent) = self.clip_extent {
            rings = rings
                .iter()
                .map(|ring| clip_ring_to_rect(ring, extent))
                .filter(|ring| ring.len() >= 3)
                .collect();
        }
        rings
    }

    fn to_screen(&self, p: [f64; 2]) -> [f64; 2] {
        [
            self.translate[0] + self.scale * p[0],
            self.translate[1] - self.scale * p[1],
        ]
    }

    fn clip_circle(&self, radius: f64, step: f64) -> Ring {
        let n = (360.0 / step).ceil().max(8.0) as usize;
        let (sr, cr) = radius.sin_cos();
        (0..n)
            .filter_map(|i| {
                let a = i as f64 * TAU / n as f64;
                let [lambda, phi] = spherical([cr, sr * a.cos(), sr * a.sin()]);
                self.raw.forward(lambda, phi)
            })
            .collect()
    }

    /// Raw-frame antimeridian outline: `λ = ±π` joined along both poles.
    fn frame(&self, step: f64) -> Ring {
        let n_phi = (180.0 / step).ceil() as usize;
        let n_lambda = (360.0 / step).ceil() as usize;
        let mut coords = Vec::with_capacity(2 * (n_phi + n_lambda));
        for i in 0..=n_phi {
            coords.push([-PI, -FRAC_PI_2 + PI * i as f64 / n_phi as f64]);
        }
        for i in 1..n_lambda {
            coords.push([-PI + TAU * i as f64 / n_lambda as f64, FRAC_PI_2]);
        }
        for i in 0..=n_phi {
            coords.push([PI, FRAC_PI_2 - PI * i as f64 / n_phi as f64]);
        }
        for i in 1..n_lambda {
            coords.push([PI - TAU * i as f64 / n_lambda as f64, -FRAC_PI_2]);
        }
        coords
            .into_iter()
            .filter_map(|[lambda, phi]| self.raw.forward(lambda, phi))
            .collect()
    }
}
