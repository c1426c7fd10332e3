use foundation::View;
use foundation::math::floor_mod;

use crate::globe::Globe;
use crate::variants::{
    Atlantis, AzimuthalEquidistant, ConicEquidistant, Equirectangular, Orthographic,
    Stereographic, Waterman, Winkel3,
};

/// Every registered projection name, in display order.
pub const PROJECTIONS: [&str; 8] = [
    "atlantis",
    "azimuthal_equidistant",
    "conic_equidistant",
    "equirectangular",
    "orthographic",
    "stereographic",
    "waterman",
    "winkel3",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GlobeError {
    UnknownProjection(String),
}

impl std::fmt::Display for GlobeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GlobeError::UnknownProjection(name) => write!(f, "unknown projection: {name}"),
        }
    }
}

impl std::error::Error for GlobeError {}

/// Rotation that faces the viewer's local noon meridian: 24h × 60min / 4 = 360°.
///
/// `utc_offset_minutes` is positive east of Greenwich.
pub fn current_position(utc_offset_minutes: i32) -> [f64; 3] {
    let lambda = floor_mod(-(utc_offset_minutes as f64) / 4.0, 360.0);
    [lambda, 0.0, 0.0]
}

/// Builds globes by name.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct GlobeRegistry {
    /// Local UTC offset used for the time-zone default rotation.
    pub utc_offset_minutes: i32,
}

impl GlobeRegistry {
    pub fn new(utc_offset_minutes: i32) -> Self {
        Self { utc_offset_minutes }
    }

    pub fn names(&self) -> &'static [&'static str] {
        &PROJECTIONS
    }

    /// Build the named globe, fitted and centred on `view` in its default
    /// orientation.
    pub fn build(&self, name: &str, view: View) -> Result<Box<dyn Globe>, GlobeError> {
        let home = current_position(self.utc_offset_minutes);
        let mut globe: Box<dyn Globe> = match name {
            "atlantis" => Box::new(Atlantis::new(view)),
            "azimuthal_equidistant" => Box::new(AzimuthalEquidistant::new(view)),
            "conic_equidistant" => Box::new(ConicEquidistant::new(view, home)),
            "equirectangular" => Box::new(Equirectangular::new(view, home)),
            "orthographic" => Box::new(Orthographic::new(view, home)),
            "stereographic" => Box::new(Stereographic::new(view)),
            "waterman" => Box::new(Waterman::new(view)),
            "winkel3" => Box::new(Winkel3::new(view)),
            _ => return Err(GlobeError::UnknownProjection(name.to_string())),
        };
        globe.set_orientation("", view);
        tracing::debug!(
            projection = name,
            orientation = %globe.orientation(),
            "built globe"
        );
        Ok(globe)
    }
}

/// [`GlobeRegistry::build`] with a UTC time-zone default.
pub fn build_globe(name: &str, view: View) -> Result<Box<dyn Globe>, GlobeError> {
    GlobeRegistry::default().build(name, view)
}
