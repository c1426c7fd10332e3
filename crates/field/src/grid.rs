use std::sync::Arc;

/// A value sampled from a grid at one geographic point.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum Sample {
    Scalar(f64),
    /// `[u, v, magnitude]` with `u` eastward and `v` northward.
    Vector([f64; 3]),
}

impl Sample {
    /// The value used for colouring: the scalar itself or the vector magnitude.
    pub fn scalar(&self) -> f64 {
        match self {
            Sample::Scalar(s) => *s,
            Sample::Vector(w) => w[2],
        }
    }
}

/// Failure reported by a grid while sampling. Aborts the interpolation run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridError(pub String);

impl std::fmt::Display for GridError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "grid error: {}", self.0)
    }
}

impl std::error::Error for GridError {}

/// Geographic sampler supplied by the data-loading collaborator.
pub trait Grid: Send + Sync {
    /// Sample at `(lon, lat)` in degrees; `Ok(None)` where the grid has no data.
    fn interpolate(&self, lon: f64, lat: f64) -> Result<Option<Sample>, GridError>;

    /// Colour for `scalar` with the given alpha.
    fn gradient(&self, scalar: f64, alpha: u8) -> [u8; 4];

    /// Converts grid units into particle speed, relative to the globe height.
    fn velocity_scale(&self) -> f64;
}

/// The grids taking part in one interpolation run.
///
/// The primary grid drives motion. Colour comes from the overlay grid when one
/// is set, otherwise from the primary grid's vector magnitude.
#[derive(Clone)]
pub struct Grids {
    primary: Arc<dyn Grid>,
    overlay: Option<Arc<dyn Grid>>,
}

impl Grids {
    pub fn new(primary: Arc<dyn Grid>) -> Self {
        Self {
            primary,
            overlay: None,
        }
    }

    /// An overlay that is the primary grid itself colours by magnitude.
    pub fn with_overlay(primary: Arc<dyn Grid>, overlay: Arc<dyn Grid>) -> Self {
        let same = std::ptr::addr_eq(Arc::as_ptr(&primary), Arc::as_ptr(&overlay));
        Self {
            primary,
            overlay: (!same).then_some(overlay),
        }
    }

    pub fn primary(&self) -> &dyn Grid {
        self.primary.as_ref()
    }

    /// The distinct overlay grid, if any.
    pub fn distinct_overlay(&self) -> Option<&dyn Grid> {
        self.overlay.as_deref()
    }

    /// The grid whose gradient colours the overlay.
    pub fn color_grid(&self) -> &dyn Grid {
        self.distinct_overlay().unwrap_or(self.primary())
    }
}

impl std::fmt::Debug for Grids {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Grids")
            .field("distinct_overlay", &self.overlay.is_some())
            .finish()
    }
}
