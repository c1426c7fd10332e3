//! The registered globe variants. Each overrides only what differs from the
//! shared defaults on [`Globe`].

use foundation::math::Ring;
use foundation::{Aabb2, View};

use crate::globe::{Globe, MapGraphic, SphereFill};
use crate::projection::{Projection, RawProjection};

macro_rules! projection_access {
    ($name:literal) => {
        fn name(&self) -> &'static str {
            $name
        }

        fn projection(&self) -> &Projection {
            &self.projection
        }

        fn projection_mut(&mut self) -> &mut Projection {
            &mut self.projection
        }
    };
}

/// Mollweide, tilted so the Atlantic basin reads as one ocean.
#[derive(Debug, Clone)]
pub struct Atlantis {
    projection: Projection,
}

impl Atlantis {
    pub fn new(view: View) -> Self {
        Self {
            projection: Self::make(view),
        }
    }

    fn make(_view: View) -> Projection {
        Projection::new(RawProjection::Mollweide).with_rotate([30.0, -45.0, 90.0])
    }
}

impl Globe for Atlantis {
    projection_access!("atlantis");

    fn new_projection(&self, view: View) -> Projection {
        Self::make(view)
    }
}

/// Azimuthal equidistant centred on the north pole.
#[derive(Debug, Clone)]
pub struct AzimuthalEquidistant {
    projection: Projection,
}

impl AzimuthalEquidistant {
    pub fn new(view: View) -> Self {
        Self {
            projection: Self::make(view),
        }
    }

    fn make(_view: View) -> Projection {
        Projection::new(RawProjection::AzimuthalEquidistant)
            .with_rotate([0.0, -90.0, 0.0])
            .with_clip_angle(180.0 - 0.001)
    }
}

impl Globe for AzimuthalEquidistant {
    projection_access!("azimuthal_equidistant");

    fn new_projection(&self, view: View) -> Projection {
        Self::make(view)
    }
}

/// Conic equidistant with standard parallels at 0° and 60°.
#[derive(Debug, Clone)]
pub struct ConicEquidistant {
    projection: Projection,
    home: [f64; 3],
}

impl ConicEquidistant {
    pub fn new(view: View, home: [f64; 3]) -> Self {
        Self {
            projection: Self::make(view, home),
            home,
        }
    }

    fn make(_view: View, home: [f64; 3]) -> Projection {
        Projection::new(RawProjection::conic_equidistant(0.0, 60.0)).with_rotate(home)
    }
}

impl Globe for ConicEquidistant {
    projection_access!("conic_equidistant");

    fn new_projection(&self, view: View) -> Projection {
        Self::make(view, self.home)
    }

    /// The cone's apex sits above the map; shift down to balance the view.
    fn center(&self, view: View) -> [f64; 2] {
        let h = view.height as f64;
        [view.width as f64 / 2.0, h / 2.0 + h * 0.065]
    }
}

#[derive(Debug, Clone)]
pub struct Equirectangular {
    projection: Projection,
    home: [f64; 3],
}

impl Equirectangular {
    pub fn new(view: View, home: [f64; 3]) -> Self {
        Self {
            projection: Self::make(view, home),
            home,
        }
    }

    fn make(_view: View, home: [f64; 3]) -> Projection {
        Projection::new(RawProjection::Equirectangular).with_rotate(home)
    }
}

impl Globe for Equirectangular {
    projection_access!("equirectangular");

    fn new_projection(&self, view: View) -> Projection {
        Self::make(view, self.home)
    }
}

/// The classic globe view: one hemisphere, lit by a radial gradient.
#[derive(Debug, Clone)]
pub struct Orthographic {
    projection: Projection,
    home: [f64; 3],
}

impl Orthographic {
    pub fn new(view: View, home: [f64; 3]) -> Self {
        Self {
            projection: Self::make(view, home),
            home,
        }
    }

    fn make(_view: View, home: [f64; 3]) -> Projection {
        Projection::new(RawProjection::Orthographic)
            .with_rotate(home)
            .with_clip_angle(90.0)
    }
}

impl Globe for Orthographic {
    projection_access!("orthographic");

    fn new_projection(&self, view: View) -> Projection {
        Self::make(view, self.home)
    }

    fn locate(&self, coord: [f64; 2]) -> Option<[f64; 3]> {
        Some([-coord[0], -coord[1], self.projection.rotate()[2]])
    }

    fn define_map(&self) -> MapGraphic {
        MapGraphic {
            outline: self.define_mask(),
            clip: None,
            fill: SphereFill::RadialGradient {
                center: self.projection.translate(),
                radius: self.projection.scale(),
            },
        }
    }
}

/// Stereographic, nearly the whole sphere, clipped hard to the view.
#[derive(Debug, Clone)]
pub struct Stereographic {
    projection: Projection,
}

impl Stereographic {
    pub fn new(view: View) -> Self {
        Self {
            projection: Self::make(view),
        }
    }

    fn make(view: View) -> Projection {
        Projection::new(RawProjection::Stereographic)
            .with_rotate([-43.0, -20.0, 0.0])
            .with_precision(1.0)
            .with_clip_angle(180.0 - 0.0001)
            .with_clip_extent(Aabb2::new(
                [0.0, 0.0],
                [view.width as f64, view.height as f64],
            ))
    }
}

impl Globe for Stereographic {
    projection_access!("stereographic");

    fn new_projection(&self, view: View) -> Projection {
        Self::make(view)
    }
}

/// Polyhedral butterfly. The unfolded outline is not convex, so the map
/// carries its face polygons as an extra clip path.
#[derive(Debug, Clone)]
pub struct Waterman {
    projection: Projection,
}

impl Waterman {
    pub fn new(view: View) -> Self {
        Self {
            projection: Self::make(view),
        }
    }

    fn make(_view: View) -> Projection {
        Projection::new(RawProjection::octahedral_butterfly()).with_rotate([20.0, 0.0, 0.0])
    }

    fn faces(&self) -> Vec<Ring> {
        self.projection.outline()
    }
}

impl Globe for Waterman {
    projection_access!("waterman");

    fn new_projection(&self, view: View) -> Projection {
        Self::make(view)
    }

    fn define_map(&self) -> MapGraphic {
        MapGraphic {
            outline: self.define_mask(),
            clip: Some(self.faces()),
            fill: SphereFill::Flat,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Winkel3 {
    projection: Projection,
}

impl Winkel3 {
    pub fn new(view: View) -> Self {
        Self {
            projection: Self::make(view),
        }
    }

    fn make(_view: View) -> Projection {
        Projection::new(RawProjection::Winkel3)
    }
}

impl Globe for Winkel3 {
    projection_access!("winkel3");

    fn new_projection(&self, view: View) -> Projection {
        Self::make(view)
    }
}
