//! Analytic grids for demos and tests.

use foundation::math::floor_mod;

use crate::grid::{Grid, GridError, Sample};

/// Linear two-stop colour ramp over `[min, max]`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct TwoStopGradient {
    pub min: f64,
    pub max: f64,
    pub low: [u8; 3],
    pub high: [u8; 3],
}

impl TwoStopGradient {
    pub fn color(&self, scalar: f64, alpha: u8) -> [u8; 4] {
        let span = self.max - self.min;
        let t = if span > 0.0 {
            ((scalar - self.min) / span).clamp(0.0, 1.0)
        } else {
            0.0
        };
        let mix = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * t).round() as u8;
        [
            mix(self.low[0], self.high[0]),
            mix(self.low[1], self.high[1]),
            mix(self.low[2], self.high[2]),
            alpha,
        ]
    }
}

impl Default for TwoStopGradient {
    fn default() -> Self {
        Self {
            min: 0.0,
            max: 30.0,
            low: [37, 74, 255],
            high: [255, 51, 36],
        }
    }
}

/// The same vector everywhere.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct UniformGrid {
    pub wind: [f64; 3],
    pub velocity_scale: f64,
    pub gradient: TwoStopGradient,
}

impl UniformGrid {
    pub fn new(u: f64, v: f64) -> Self {
        Self {
            wind: [u, v, u.hypot(v)],
            velocity_scale: 1.0 / 60_000.0,
            gradient: TwoStopGradient::default(),
        }
    }
}

impl Grid for UniformGrid {
    fn interpolate(&self, _lon: f64, _lat: f64) -> Result<Option<Sample>, GridError> {
        Ok(Some(Sample::Vector(self.wind)))
    }

    fn gradient(&self, scalar: f64, alpha: u8) -> [u8; 4] {
        self.gradient.color(scalar, alpha)
    }

    fn velocity_scale(&self) -> f64 {
        self.velocity_scale
    }
}

/// Solid-body rotation around a geographic centre, fading with distance.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct VortexGrid {
    pub center: [f64; 2],
    /// Peak speed, reached one radius from the centre.
    pub strength: f64,
    /// Angular radius in degrees.
    pub radius: f64,
    pub velocity_scale: f64,
    pub gradient: TwoStopGradient,
}

impl VortexGrid {
    pub fn new(center: [f64; 2], strength: f64, radius: f64) -> Self {
        Self {
            center,
            strength,
            radius,
            velocity_scale: 1.0 / 60_000.0,
            gradient: TwoStopGradient {
                max: strength,
                ..TwoStopGradient::default()
            },
        }
    }
}

impl Grid for VortexGrid {
    fn interpolate(&self, lon: f64, lat: f64) -> Result<Option<Sample>, GridError> {
        // Shortest way round, so the vortex spans the antimeridian.
        let dlon = floor_mod(lon - self.center[0] + 180.0, 360.0) - 180.0;
        let dx = dlon * lat.to_radians().cos();
        let dy = lat - self.center[1];
        let r = dx.hypot(dy);
        if r > 4.0 * self.radius {
            return Ok(None);
        }
        let rel = r / self.radius;
        let speed = self.strength * rel * (1.0 - rel * rel / 4.0).max(0.0);
        if r == 0.0 {
            return Ok(Some(Sample::Vector([0.0, 0.0, 0.0])));
        }
        // Counter-clockwise: perpendicular to the radius.
        let u = -dy / r * speed;
        let v = dx / r * speed;
        Ok(Some(Sample::Vector([u, v, speed])))
    }

    fn gradient(&self, scalar: f64, alpha: u8) -> [u8; 4] {
        self.gradient.color(scalar, alpha)
    }

    fn velocity_scale(&self) -> f64 {
        self.velocity_scale
    }
}

/// Scalar field that varies with latitude only, e.g. a temperature overlay.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct LatitudeBands {
    pub gradient: TwoStopGradient,
}

impl Grid for LatitudeBands {
    fn interpolate(&self, _lon: f64, lat: f64) -> Result<Option<Sample>, GridError> {
        Ok(Some(Sample::Scalar(90.0 - lat.abs())))
    }

    fn gradient(&self, scalar: f64, alpha: u8) -> [u8; 4] {
        self.gradient.color(scalar, alpha)
    }

    fn velocity_scale(&self) -> f64 {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::{Grid, LatitudeBands, Sample, TwoStopGradient, UniformGrid, VortexGrid};

    #[test]
    fn gradient_clamps_and_keeps_alpha() {
        let g = TwoStopGradient::default();
        assert_eq!(g.color(-5.0, 102), [37, 74, 255, 102]);
        assert_eq!(g.color(100.0, 7), [255, 51, 36, 7]);
    }

    #[test]
    fn uniform_grid_magnitude() {
        let g = UniformGrid::new(3.0, 4.0);
        assert_eq!(g.interpolate(10.0, 10.0), Ok(Some(Sample::Vector([3.0, 4.0, 5.0]))));
    }

    #[test]
    fn vortex_circulates_and_fades() {
        let g = VortexGrid::new([0.0, 0.0], 20.0, 10.0);
        // East of centre the flow points north.
        let Some(Sample::Vector(w)) = g.interpolate(10.0, 0.0).unwrap() else {
            panic!("expected a vector");
        };
        assert!(w[0].abs() < 1e-9);
        assert!(w[1] > 0.0);
        assert_eq!(g.interpolate(120.0, 0.0), Ok(None));
    }

    #[test]
    fn vortex_wraps_across_the_antimeridian() {
        let g = VortexGrid::new([175.0, 0.0], 20.0, 10.0);
        // 10 degrees east of the centre, on the far side of 180.
        let Some(Sample::Vector(w)) = g.interpolate(-175.0, 0.0).unwrap() else {
            panic!("expected a vector");
        };
        assert!(w[1] > 0.0);
        assert!((w[2] - 15.0).abs() < 1e-9);
    }

    #[test]
    fn latitude_bands_peak_at_equator() {
        let g = LatitudeBands {
            gradient: TwoStopGradient::default(),
        };
        assert_eq!(g.interpolate(0.0, 0.0).unwrap().map(|s| s.scalar()), Some(90.0));
        assert_eq!(g.interpolate(0.0, -90.0).unwrap().map(|s| s.scalar()), Some(0.0));
    }
}
