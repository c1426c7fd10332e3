use std::time::Instant;

use foundation::{Bounds, View};
use globe::{Globe, Projection};
use runtime::{CancelToken, Outcome, Resumable, Step, TimeBudget, run_async, run_blocking};

use crate::config::InterpolationConfig;
use crate::distortion::distort;
use crate::field::{Field, FieldVector};
use crate::grid::{GridError, Grids, Sample};
use crate::mask::{Mask, TRANSPARENT, build_mask};

/// Every sample is written to the 2x2 block anchored at the sampled pixel.
const BLOCK: [(i32, i32); 4] = [(0, 0), (1, 0), (0, 1), (1, 1)];

#[derive(Debug, Clone, PartialEq)]
pub enum FieldError {
    Grid(GridError),
    InvalidVelocityScale(f64),
}

impl std::fmt::Display for FieldError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FieldError::Grid(e) => write!(f, "interpolation aborted: {e}"),
            FieldError::InvalidVelocityScale(s) => write!(f, "invalid velocity scale: {s}"),
        }
    }
}

impl std::error::Error for FieldError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FieldError::Grid(e) => Some(e),
            FieldError::InvalidVelocityScale(_) => None,
        }
    }
}

impl From<GridError> for FieldError {
    fn from(e: GridError) -> Self {
        FieldError::Grid(e)
    }
}

/// Column-by-column interpolation of the grids over the visible globe.
///
/// The task owns a snapshot of the projection and its own mask, so later
/// manipulation of the globe does not affect a run in flight.
pub struct InterpolationTask {
    globe: &'static str,
    projection: Projection,
    grids: Grids,
    view: View,
    bounds: Bounds,
    mask: Mask,
    vectors: Vec<FieldVector>,
    inside: Vec<u32>,
    velocity_scale: f64,
    alpha: u8,
    /// Next column to interpolate.
    x: i32,
    started: Instant,
}

impl InterpolationTask {
    pub fn new(
        globe: &dyn Globe,
        grids: Grids,
        view: View,
        config: &InterpolationConfig,
    ) -> Result<Self, FieldError> {
        let bounds = globe.bounds(view);
        let velocity_scale = bounds.height.max(0) as f64 * grids.primary().velocity_scale();
        if !velocity_scale.is_finite() {
            return Err(FieldError::InvalidVelocityScale(velocity_scale));
        }
        let cells = if bounds.is_empty() {
            0
        } else {
            bounds.width as usize * bounds.height as usize
        };
        tracing::debug!(
            globe = globe.name(),
            x = bounds.x,
            y = bounds.y,
            width = bounds.width,
            height = bounds.height,
            "interpolating field"
        );
        Ok(Self {
            globe: globe.name(),
            projection: globe.projection().clone(),
            grids,
            view,
            bounds,
            mask: build_mask(globe, view),
            vectors: vec![FieldVector::Outside; cells],
            inside: Vec::new(),
            velocity_scale,
            alpha: config.overlay_alpha_byte(),
            x: bounds.x,
            started: Instant::now(),
        })
    }

    fn storage_index(&self, x: i32, y: i32) -> Option<usize> {
        if self.bounds.is_empty() || !self.bounds.contains(x, y) {
            return None;
        }
        Some((y - self.bounds.y) as usize * self.bounds.width as usize + (x - self.bounds.x) as usize)
    }

    fn interpolate_column(&mut self, x: i32) -> Result<(), FieldError> {
        let mut y = self.bounds.y;
        while y <= self.bounds.y_max {
            if self.mask.is_visible(x, y) {
                let (vector, color) = self.sample(x, y)?;
                self.store(x, y, vector, color);
            }
            y += 2;
        }
        Ok(())
    }

    fn sample(&self, x: i32, y: i32) -> Result<(FieldVector, [u8; 4]), FieldError> {
        let point = [x as f64, y as f64];
        let Some([lambda, phi]) = self.projection.invert(point) else {
            return Ok((FieldVector::Hole, TRANSPARENT));
        };

        let mut vector = FieldVector::Hole;
        let mut scalar = None;
        match self.grids.primary().interpolate(lambda, phi)? {
            Some(Sample::Vector(wind)) => {
                let wind = distort(
                    &self.projection,
                    lambda,
                    phi,
                    point[0],
                    point[1],
                    self.velocity_scale,
                    wind,
                );
                vector = FieldVector::from_wind(wind);
                scalar = Some(wind[2]);
            }
            Some(Sample::Scalar(s)) => scalar = Some(s),
            None => {}
        }
        if let Some(overlay) = self.grids.distinct_overlay() {
            scalar = overlay.interpolate(lambda, phi)?.map(|s| s.scalar());
        }

        let color = match scalar {
            Some(s) if s.is_finite() => self.grids.color_grid().gradient(s, self.alpha),
            _ => TRANSPARENT,
        };
        Ok((vector, color))
    }

    fn store(&mut self, x: i32, y: i32, vector: FieldVector, color: [u8; 4]) {
        for (dx, dy) in BLOCK {
            if let Some(i) = self.storage_index(x + dx, y + dy) {
                self.vectors[i] = vector;
            }
            self.mask.set(x + dx, y + dy, color);
        }
        if let Some(i) = self.storage_index(x, y) {
            self.inside.push(i as u32);
        }
    }

    fn finish(&mut self) -> Field {
        let mask = std::mem::replace(&mut self.mask, Mask::from_rings(&[], View::new(0, 0)));
        let field = Field::new(
            self.view,
            self.bounds,
            std::mem::take(&mut self.vectors),
            std::mem::take(&mut self.inside),
            mask.into_image(),
        );
        tracing::info!(
            globe = self.globe,
            defined = field.defined_count(),
            elapsed_ms = self.started.elapsed().as_millis() as u64,
            "field interpolated"
        );
        field
    }
}

impl Resumable for InterpolationTask {
    type Output = Field;
    type Error = FieldError;

    fn run_slice(&mut self, budget: &TimeBudget) -> Result<Step<Field>, FieldError> {
        while self.x < self.bounds.x_max {
            self.interpolate_column(self.x)?;
            self.x += 2;
            if self.x < self.bounds.x_max && budget.is_exhausted() {
                return Ok(Step::Continue);
            }
        }
        Ok(Step::Done(self.finish()))
    }

    fn progress(&self) -> f64 {
        let span = self.bounds.x_max - self.bounds.x;
        if span <= 0 {
            return 1.0;
        }
        ((self.x - self.bounds.x) as f64 / span as f64).clamp(0.0, 1.0)
    }
}

/// Interpolate the field for the globe's current orientation, yielding to the
/// async runtime between slices.
pub async fn interpolate_field(
    globe: &dyn Globe,
    grids: Grids,
    view: View,
    config: &InterpolationConfig,
    cancel: &CancelToken,
) -> Result<Outcome<Field>, FieldError> {
    let task = InterpolationTask::new(globe, grids, view, config)?;
    run_async(task, config.schedule(), cancel).await
}

/// Blocking counterpart of [`interpolate_field`].
pub fn interpolate_field_blocking(
    globe: &dyn Globe,
    grids: Grids,
    view: View,
    config: &InterpolationConfig,
    cancel: &CancelToken,
) -> Result<Outcome<Field>, FieldError> {
    let task = InterpolationTask::new(globe, grids, view, config)?;
    run_blocking(task, config.schedule(), cancel)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use super::{FieldError, InterpolationTask, interpolate_field, interpolate_field_blocking};
    use crate::config::InterpolationConfig;
    use crate::field::{Field, FieldVector};
    use crate::grid::{Grid, GridError, Grids, Sample};
    use crate::synthetic::{LatitudeBands, TwoStopGradient, UniformGrid};
    use foundation::View;
    use globe::{Globe, build_globe};
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use runtime::{CancelToken, Resumable, Step, TimeBudget};

    /// Data only west of the prime meridian.
    struct WestOnly;

    impl Grid for WestOnly {
        fn interpolate(&self, lon: f64, _lat: f64) -> Result<Option<Sample>, GridError> {
            Ok((lon < 0.0).then_some(Sample::Vector([0.0, 1.0, 1.0])))
        }

        fn gradient(&self, _scalar: f64, alpha: u8) -> [u8; 4] {
            [10, 20, 30, alpha]
        }

        fn velocity_scale(&self) -> f64 {
            0.01
        }
    }

    struct Broken;

    impl Grid for Broken {
        fn interpolate(&self, _lon: f64, _lat: f64) -> Result<Option<Sample>, GridError> {
            Err(GridError("corrupt record".to_string()))
        }

        fn gradient(&self, _scalar: f64, alpha: u8) -> [u8; 4] {
            [0, 0, 0, alpha]
        }

        fn velocity_scale(&self) -> f64 {
            1.0
        }
    }

    fn fast() -> InterpolationConfig {
        InterpolationConfig {
            task_budget_ms: 100,
            sleep_ms: 0,
            ..InterpolationConfig::default()
        }
    }

    fn run(globe: &dyn Globe, grids: Grids, view: View) -> Field {
        interpolate_field_blocking(globe, grids, view, &fast(), &CancelToken::new())
            .unwrap()
            .completed()
            .unwrap()
    }

    fn pixel(field: &Field, x: usize, y: usize) -> [u8; 4] {
        let i = (y * field.view().width as usize + x) * 4;
        let mut out = [0; 4];
        out.copy_from_slice(&field.overlay()[i..i + 4]);
        out
    }

    #[test]
    fn eastward_wind_moves_right_at_the_centre() {
        let view = View::new(200, 200);
        let globe = build_globe("orthographic", view).unwrap();
        let uniform = UniformGrid::new(1.0, 0.0);
        let field = run(globe.as_ref(), Grids::new(Arc::new(uniform)), view);

        let FieldVector::Vector { u, v, magnitude } = field.lookup(100.0, 100.0) else {
            panic!("centre should be defined");
        };
        assert!(u > 0.0);
        assert!(v.abs() < 1e-6, "{v}");
        assert_eq!(magnitude, 1.0);
        // The 2x2 block shares the anchor's vector.
        assert_eq!(field.lookup(101.0, 101.0), field.lookup(100.0, 100.0));

        assert_eq!(field.lookup(0.0, 0.0), FieldVector::Outside);
        assert_eq!(field.lookup(199.0, 199.0), FieldVector::Outside);
        assert_eq!(pixel(&field, 100, 100), uniform.gradient(1.0, 102));
        assert_eq!(pixel(&field, 0, 0), [0, 0, 0, 0]);
    }

    #[test]
    fn displacement_scales_with_globe_height_and_velocity_scale() {
        let view = View::new(200, 200);
        let globe = build_globe("orthographic", view).unwrap();
        let bounds = globe.bounds(view);
        let mut slow = UniformGrid::new(1.0, 0.0);
        slow.velocity_scale = 0.001;
        let mut fast_grid = slow;
        fast_grid.velocity_scale = 0.002;

        let centre_u = |grid: UniformGrid| {
            let field = run(globe.as_ref(), Grids::new(Arc::new(grid)), view);
            match field.lookup(100.0, 100.0) {
                FieldVector::Vector { u, .. } => u as f64,
                other => panic!("centre should be defined, got {other:?}"),
            }
        };
        let u_slow = centre_u(slow);
        let u_fast = centre_u(fast_grid);
        assert!((u_fast / u_slow - 2.0).abs() < 1e-4, "{u_fast} / {u_slow}");

        // At the centre one radian of longitude spans `scale` pixels.
        let per_degree = globe.projection().scale() * std::f64::consts::PI / 180.0;
        let expected = per_degree * bounds.height as f64 * 0.001;
        assert!((u_slow - expected).abs() / expected < 1e-3, "{u_slow} vs {expected}");
    }

    #[test]
    fn missing_data_leaves_holes_inside_the_boundary() {
        let view = View::new(200, 200);
        let globe = build_globe("orthographic", view).unwrap();
        let field = run(globe.as_ref(), Grids::new(Arc::new(WestOnly)), view);

        assert_eq!(field.lookup(140.0, 100.0), FieldVector::Hole);
        assert_eq!(pixel(&field, 140, 100), [0, 0, 0, 0]);
        assert!(field.is_defined(60.0, 100.0));
        assert_eq!(pixel(&field, 60, 100), [10, 20, 30, 102]);

        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..20 {
            let [x, y] = field.randomize_seed(&mut rng).unwrap();
            assert!(field.is_defined(x as f64, y as f64));
            assert!(x <= 100);
        }
    }

    #[test]
    fn distinct_overlay_supplies_the_colour() {
        let view = View::new(200, 200);
        let globe = build_globe("orthographic", view).unwrap();
        let bands = LatitudeBands {
            gradient: TwoStopGradient {
                min: 0.0,
                max: 90.0,
                low: [0, 0, 0],
                high: [200, 100, 50],
            },
        };
        let grids = Grids::with_overlay(Arc::new(UniformGrid::new(1.0, 0.0)), Arc::new(bands));
        let field = run(globe.as_ref(), grids, view);

        assert!(field.is_defined(100.0, 100.0));
        let [r, g, b, a] = pixel(&field, 100, 100);
        assert_eq!(a, 102);
        // Near the equator the bands sit close to their top stop.
        assert!(r >= 195 && g >= 97 && b >= 48, "{:?}", [r, g, b]);
    }

    #[test]
    fn grid_failure_aborts_the_run() {
        let view = View::new(100, 100);
        let globe = build_globe("orthographic", view).unwrap();
        let err = interpolate_field_blocking(
            globe.as_ref(),
            Grids::new(Arc::new(Broken)),
            view,
            &fast(),
            &CancelToken::new(),
        )
        .unwrap_err();
        assert_eq!(err, FieldError::Grid(GridError("corrupt record".to_string())));
    }

    #[test]
    fn canceled_run_produces_no_field() {
        let view = View::new(100, 100);
        let globe = build_globe("orthographic", view).unwrap();
        let cancel = CancelToken::new();
        cancel.cancel();
        let outcome = interpolate_field_blocking(
            globe.as_ref(),
            Grids::new(Arc::new(UniformGrid::new(1.0, 0.0))),
            view,
            &fast(),
            &cancel,
        )
        .unwrap();
        assert!(outcome.is_canceled());
    }

    #[test]
    fn slices_resume_where_they_stopped() {
        let view = View::new(200, 200);
        let globe = build_globe("orthographic", view).unwrap();
        let grids = Grids::new(Arc::new(UniformGrid::new(1.0, 0.0)));
        let mut task = InterpolationTask::new(globe.as_ref(), grids, view, &fast()).unwrap();
        let tiny = TimeBudget::start(Duration::ZERO);
        std::thread::sleep(Duration::from_millis(1));
        let mut slices = 0;
        let field = loop {
            slices += 1;
            match task.run_slice(&tiny).unwrap() {
                Step::Done(field) => break field,
                Step::Continue => assert!(task.progress() > 0.0 && task.progress() < 1.0),
            }
        };
        assert!(slices > 1);
        assert!(field.is_defined(100.0, 100.0));
    }

    #[test]
    fn off_screen_globe_yields_an_empty_field() {
        let view = View::new(100, 100);
        let mut globe = build_globe("orthographic", view).unwrap();
        globe.projection_mut().set_translate([-5000.0, -5000.0]);
        let field = run(globe.as_ref(), Grids::new(Arc::new(UniformGrid::new(1.0, 0.0))), view);
        assert_eq!(field.defined_count(), 0);
        let mut rng = StdRng::seed_from_u64(5);
        assert_eq!(field.randomize_seed(&mut rng), None);
    }

    #[test]
    fn invalid_velocity_scale_is_rejected() {
        let view = View::new(100, 100);
        let globe = build_globe("orthographic", view).unwrap();
        let mut grid = UniformGrid::new(1.0, 0.0);
        grid.velocity_scale = f64::NAN;
        let result = InterpolationTask::new(
            globe.as_ref(),
            Grids::new(Arc::new(grid)),
            view,
            &InterpolationConfig::default(),
        );
        assert!(matches!(result, Err(FieldError::InvalidVelocityScale(_))));
    }

    #[tokio::test]
    async fn async_run_completes() {
        let view = View::new(120, 80);
        let globe = build_globe("equirectangular", view).unwrap();
        let outcome = interpolate_field(
            globe.as_ref(),
            Grids::new(Arc::new(UniformGrid::new(0.0, 3.0))),
            view,
            &fast(),
            &CancelToken::new(),
        )
        .await
        .unwrap();
        let field = outcome.completed().unwrap();
        assert!(field.defined_count() > 0);
        let FieldVector::Vector { v, .. } = field.lookup(60.0, 40.0) else {
            panic!("centre should be defined");
        };
        assert!(v < 0.0);
    }
}
