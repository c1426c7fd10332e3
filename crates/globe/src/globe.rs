use foundation::math::{Ring, rings_bounds};
use foundation::{Bounds, View};

use crate::orientation::Orientation;
use crate::projection::Projection;

/// Scale limits shared by every variant unless overridden.
pub const DEFAULT_SCALE_EXTENT: [f64; 2] = [25.0, 3000.0];

/// Fraction of the view the fitted outline may occupy.
const FIT_MARGIN: f64 = 0.9;

/// How the renderer should paint the sphere behind the map.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum SphereFill {
    Flat,
    /// Radial gradient from the sphere centre out to `radius` pixels.
    RadialGradient { center: [f64; 2], radius: f64 },
}

/// Geometry handed to the external renderer for drawing the globe.
#[derive(Debug, Clone, PartialEq)]
pub struct MapGraphic {
    pub outline: Vec<Ring>,
    /// Additional clip path for outlines that are not convex.
    pub clip: Option<Vec<Ring>>,
    pub fill: SphereFill,
}

/// A named projection plus interactive state.
///
/// Variants supply [`Globe::new_projection`] and the projection accessors;
/// every other operation has a shared default that a variant overrides only
/// where it differs.
pub trait Globe: Send + Sync {
    fn name(&self) -> &'static str;

    fn projection(&self) -> &Projection;

    fn projection_mut(&mut self) -> &mut Projection;

    /// A fresh projection in the variant's default state for `view`.
    fn new_projection(&self, view: View) -> Projection;

    /// Sphere outline bounding box, clamped into the view.
    fn bounds(&self, view: View) -> Bounds {
        Bounds::clamped(rings_bounds(&self.define_mask()), view)
    }

    /// Largest scale at which the default projection's outline fits `view`.
    fn fit(&self, view: View) -> f64 {
        let projection = self.new_projection(view);
        let outline = rings_bounds(&projection.outline());
        let h_scale = outline.width() / projection.scale();
        let v_scale = outline.height() / projection.scale();
        let fit = (view.width as f64 / h_scale).min(view.height as f64 / v_scale) * FIT_MARGIN;
        if fit.is_finite() && fit > 0.0 {
            fit
        } else {
            projection.scale()
        }
    }

    fn center(&self, view: View) -> [f64; 2] {
        [view.width as f64 / 2.0, view.height as f64 / 2.0]
    }

    fn scale_extent(&self) -> [f64; 2] {
        DEFAULT_SCALE_EXTENT
    }

    /// Current orientation as `"λ,φ,scale"`.
    fn orientation(&self) -> String {
        let p = self.projection();
        Orientation::of(p.rotate(), p.scale()).to_string()
    }

    /// Reorient from a `"λ,φ,scale"` string, falling back to defaults for any
    /// missing component, and recentre on the view.
    fn set_orientation(&mut self, text: &str, view: View) {
        let parsed = Orientation::parse(text);
        let rotate = match parsed.center() {
            Some([lambda, phi]) => [-lambda, -phi, self.projection().rotate()[2]],
            None => self.new_projection(view).rotate(),
        };
        let [min, max] = self.scale_extent();
        let scale = match parsed.scale {
            Some(s) => s.clamp(min, max),
            None => self.fit(view),
        };
        let center = self.center(view);
        let projection = self.projection_mut();
        projection.set_rotate(rotate);
        projection.set_scale(scale);
        projection.set_translate(center);
    }

    /// Pixels-to-degrees factor for drag rotation; chosen so a drag feels the
    /// same at every zoom level.
    fn sensitivity(&self, start_scale: f64) -> f64 {
        60.0 / start_scale
    }

    /// Start a drag/zoom session. Raises the projection's precision for the
    /// duration of the session; [`Manipulator::end`] restores it.
    fn manipulator(&mut self, start_pointer: [f64; 2], start_scale: f64) -> Manipulator {
        let sensitivity = self.sensitivity(start_scale);
        Manipulator::begin(self.projection_mut(), start_pointer, sensitivity)
    }

    /// Rotation that brings `coord` (degrees) to the centre, if the variant
    /// supports reorienting to a location.
    fn locate(&self, _coord: [f64; 2]) -> Option<[f64; 3]> {
        None
    }

    /// Outline polygons used for the visibility mask.
    fn define_mask(&self) -> Vec<Ring> {
        self.projection().outline()
    }

    fn define_map(&self) -> MapGraphic {
        MapGraphic {
            outline: self.define_mask(),
            clip: None,
            fill: SphereFill::Flat,
        }
    }
}

/// State of one drag/zoom session against a projection.
#[derive(Debug, Clone, PartialEq)]
pub struct Manipulator {
    start_pointer: [f64; 2],
    sensitivity: f64,
    offset: [f64; 2],
    original_precision: f64,
}

impl Manipulator {
    pub fn begin(projection: &mut Projection, start_pointer: [f64; 2], sensitivity: f64) -> Self {
        let rotate = projection.rotate();
        let original_precision = projection.precision();
        projection.set_precision(original_precision * 10.0);
        Self {
            start_pointer,
            sensitivity,
            offset: [rotate[0] / sensitivity, -rotate[1] / sensitivity],
            original_precision,
        }
    }

    pub fn start_pointer(&self) -> [f64; 2] {
        self.start_pointer
    }

    /// Apply the pointer (if any) as a rotation and `scale` unconditionally.
    pub fn move_to(&self, projection: &mut Projection, pointer: Option<[f64; 2]>, scale: f64) {
        if let Some(pointer) = pointer {
            let xd = pointer[0] - self.start_pointer[0] + self.offset[0];
            let yd = pointer[1] - self.start_pointer[1] + self.offset[1];
            let gamma = projection.rotate()[2];
            projection.set_rotate([xd * self.sensitivity, -yd * self.sensitivity, gamma]);
        }
        projection.set_scale(scale);
    }

    pub fn end(self, projection: &mut Projection) {
        projection.set_precision(self.original_precision);
    }
}

#[cfg(test)]
mod tests {
    use super::{Globe, Manipulator};
    use crate::projection::{Projection, RawProjection};
    use crate::variants::{ConicEquidistant, Orthographic, Waterman, Winkel3};
    use foundation::View;

    fn assert_close(a: f64, b: f64, eps: f64) {
        let diff = (a - b).abs();
        assert!(diff <= eps, "expected {a} ~= {b} (diff {diff})");
    }

    #[test]
    fn orthographic_fit_fills_ninety_percent() {
        let view = View::new(800, 600);
        let globe = Orthographic::new(view, [0.0; 3]);
        assert_close(globe.fit(view), 270.0, 1e-6);
    }

    #[test]
    fn set_orientation_defaults_and_clamps() {
        let view = View::new(800, 600);
        let mut globe = Orthographic::new(view, [10.0, 0.0, 0.0]);

        globe.set_orientation("nonsense", view);
        assert_eq!(globe.projection().rotate(), [10.0, 0.0, 0.0]);
        assert_close(globe.projection().scale(), 270.0, 1e-6);
        assert_eq!(globe.projection().translate(), [400.0, 300.0]);

        globe.set_orientation("-30,45,99999", view);
        assert_eq!(globe.projection().rotate(), [30.0, -45.0, 0.0]);
        assert_eq!(globe.projection().scale(), 3000.0);
        assert_eq!(globe.orientation(), "-30.00,45.00,3000");

        globe.set_orientation("0,0,1", view);
        assert_eq!(globe.projection().scale(), 25.0);
    }

    #[test]
    fn set_orientation_keeps_roll() {
        let view = View::new(500, 500);
        let mut globe = Orthographic::new(view, [0.0; 3]);
        globe.projection_mut().set_rotate([0.0, 0.0, 15.0]);
        globe.set_orientation("5,6,300", view);
        assert_eq!(globe.projection().rotate(), [-5.0, -6.0, 15.0]);
    }

    #[test]
    fn conic_centre_is_shifted_down() {
        let view = View::new(1000, 1000);
        let globe = ConicEquidistant::new(view, [0.0; 3]);
        assert_eq!(globe.center(view), [500.0, 565.0]);
    }

    #[test]
    fn only_orthographic_locates() {
        let view = View::new(400, 400);
        let ortho = Orthographic::new(view, [0.0, 0.0, 7.0]);
        assert_eq!(ortho.locate([10.0, 20.0]), Some([-10.0, -20.0, 7.0]));
        assert_eq!(Winkel3::new(view).locate([10.0, 20.0]), None);
    }

    #[test]
    fn waterman_map_carries_face_clip() {
        let view = View::new(800, 600);
        let globe = Waterman::new(view);
        let map = globe.define_map();
        assert_eq!(map.clip.map(|c| c.len()), Some(8));
    }

    #[test]
    fn manipulator_drag_rotates_and_restores_precision() {
        let mut projection = Projection::new(RawProjection::Orthographic);
        projection.set_scale(300.0);
        let m = Manipulator::begin(&mut projection, [100.0, 100.0], 60.0 / 300.0);
        assert_close(projection.precision(), 1.0, 1e-12);

        m.move_to(&mut projection, Some([110.0, 95.0]), 300.0);
        let r = projection.rotate();
        assert_close(r[0], 2.0, 1e-9);
        assert_close(r[1], 1.0, 1e-9);

        m.move_to(&mut projection, None, 450.0);
        let r2 = projection.rotate();
        assert_eq!(r, r2);
        assert_eq!(projection.scale(), 450.0);

        m.end(&mut projection);
        assert_close(projection.precision(), 0.1, 1e-12);
    }

    #[test]
    fn manipulator_continues_from_current_rotation() {
        let mut projection = Projection::new(RawProjection::Orthographic);
        projection.set_rotate([40.0, -10.0, 0.0]);
        let m = Manipulator::begin(&mut projection, [50.0, 50.0], 0.5);
        m.move_to(&mut projection, Some([50.0, 50.0]), 150.0);
        let r = projection.rotate();
        assert_close(r[0], 40.0, 1e-9);
        assert_close(r[1], -10.0, 1e-9);
    }
}
