use foundation::{Bounds, View};
use rand::Rng;

/// Attempts `randomize_seed` makes before settling for a hole.
pub const SEED_ATTEMPTS: usize = 30;

/// One entry of the interpolated field.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum FieldVector {
    /// Not on the globe.
    Outside,
    /// On the globe but without usable data.
    Hole,
    /// Screen-space displacement per frame and the original magnitude.
    Vector { u: f32, v: f32, magnitude: f32 },
}

impl FieldVector {
    /// Holes stand in for non-finite components.
    pub fn from_wind(wind: [f64; 3]) -> Self {
        if wind.iter().all(|c| c.is_finite()) {
            FieldVector::Vector {
                u: wind[0] as f32,
                v: wind[1] as f32,
                magnitude: wind[2] as f32,
            }
        } else {
            FieldVector::Hole
        }
    }

    pub fn is_defined(&self) -> bool {
        matches!(self, FieldVector::Vector { .. })
    }

    pub fn is_inside_boundary(&self) -> bool {
        !matches!(self, FieldVector::Outside)
    }
}

/// The interpolated velocity field together with its overlay image.
///
/// Storage covers only the globe's bounds; everything else reads as
/// [`FieldVector::Outside`].
#[derive(Debug, Clone)]
pub struct Field {
    view: View,
    bounds: Bounds,
    vectors: Vec<FieldVector>,
    /// Storage indices of every block anchor inside the boundary.
    inside: Vec<u32>,
    overlay: Vec<u8>,
}

impl Field {
    pub(crate) fn new(
        view: View,
        bounds: Bounds,
        vectors: Vec<FieldVector>,
        inside: Vec<u32>,
        overlay: Vec<u8>,
    ) -> Self {
        Self {
            view,
            bounds,
            vectors,
            inside,
            overlay,
        }
    }

    pub fn view(&self) -> View {
        self.view
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if self.vectors.is_empty() || !self.bounds.contains(x, y) {
            return None;
        }
        let i = (y - self.bounds.y) as usize * self.bounds.width as usize + (x - self.bounds.x) as usize;
        (i < self.vectors.len()).then_some(i)
    }

    fn at(&self, x: i32, y: i32) -> FieldVector {
        self.index(x, y)
            .map_or(FieldVector::Outside, |i| self.vectors[i])
    }

    fn position(&self, index: usize) -> [i32; 2] {
        let w = self.bounds.width as usize;
        [self.bounds.x + (index % w) as i32, self.bounds.y + (index / w) as i32]
    }

    /// The vector at the pixel nearest to `(x, y)`.
    pub fn lookup(&self, x: f64, y: f64) -> FieldVector {
        if !(x.is_finite() && y.is_finite()) {
            return FieldVector::Outside;
        }
        self.at(x.round() as i32, y.round() as i32)
    }

    pub fn is_defined(&self, x: f64, y: f64) -> bool {
        self.lookup(x, y).is_defined()
    }

    pub fn is_inside_boundary(&self, x: f64, y: f64) -> bool {
        self.lookup(x, y).is_inside_boundary()
    }

    /// Pick a random pixel inside the boundary, preferring one with a defined
    /// vector. After [`SEED_ATTEMPTS`] misses the last pick is returned even
    /// if it is a hole. `None` when nothing is inside the boundary.
    pub fn randomize_seed<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<[i32; 2]> {
        if self.inside.is_empty() || self.vectors.is_empty() {
            return None;
        }
        let mut last = None;
        for _ in 0..SEED_ATTEMPTS {
            let anchor = self.inside[rng.random_range(0..self.inside.len())] as usize;
            let [ax, ay] = self.position(anchor);
            // Spread over the whole 2x2 block the anchor was written to.
            let (dx, dy) = (rng.random_range(0..2), rng.random_range(0..2));
            let p = if self.at(ax + dx, ay + dy).is_inside_boundary() {
                [ax + dx, ay + dy]
            } else {
                [ax, ay]
            };
            if self.at(p[0], p[1]).is_defined() {
                return Some(p);
            }
            last = Some(p);
        }
        last
    }

    /// Row-major RGBA overlay over the whole view.
    pub fn overlay(&self) -> &[u8] {
        &self.overlay
    }

    /// Number of stored pixels holding a defined vector.
    pub fn defined_count(&self) -> usize {
        self.vectors.iter().filter(|v| v.is_defined()).count()
    }

    /// Drop the backing storage. Every later lookup reads as outside.
    pub fn release(&mut self) {
        self.vectors = Vec::new();
        self.inside = Vec::new();
        self.overlay = Vec::new();
    }

    pub fn is_released(&self) -> bool {
        self.vectors.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::{Field, FieldVector};
    use foundation::{Aabb2, Bounds, View};
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    const V: FieldVector = FieldVector::Vector {
        u: 1.0,
        v: -1.0,
        magnitude: 2.0,
    };

    /// A 4x2 field at (2, 3): left block defined, right block a hole.
    fn sample_field() -> Field {
        let view = View::new(10, 10);
        let bounds = Bounds::clamped(Aabb2::new([2.0, 3.0], [5.0, 4.0]), view);
        let h = FieldVector::Hole;
        let vectors = vec![V, V, h, h, V, V, h, h];
        Field::new(view, bounds, vectors, vec![0, 2], vec![0; 400])
    }

    #[test]
    fn lookup_rounds_and_reports_outside() {
        let field = sample_field();
        assert_eq!(field.lookup(2.4, 3.4), V);
        assert_eq!(field.lookup(4.0, 4.0), FieldVector::Hole);
        assert_eq!(field.lookup(1.0, 3.0), FieldVector::Outside);
        assert_eq!(field.lookup(f64::NAN, 3.0), FieldVector::Outside);
        assert!(field.is_defined(3.0, 4.0));
        assert!(!field.is_defined(5.0, 3.0));
        assert!(field.is_inside_boundary(5.0, 3.0));
        assert_eq!(field.defined_count(), 4);
    }

    #[test]
    fn from_wind_maps_non_finite_to_hole() {
        assert_eq!(FieldVector::from_wind([f64::NAN, 0.0, 1.0]), FieldVector::Hole);
        assert_eq!(FieldVector::from_wind([1.0, -1.0, 2.0]), V);
    }

    #[test]
    fn randomize_seed_prefers_defined_pixels() {
        let field = sample_field();
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..50 {
            let [x, y] = field.randomize_seed(&mut rng).unwrap();
            assert!(field.is_defined(x as f64, y as f64), "({x}, {y})");
        }
    }

    #[test]
    fn randomize_seed_falls_back_to_a_hole() {
        let view = View::new(4, 4);
        let bounds = Bounds::clamped(Aabb2::new([0.0, 0.0], [1.0, 1.0]), view);
        let field = Field::new(view, bounds, vec![FieldVector::Hole; 4], vec![0], vec![]);
        let mut rng = StdRng::seed_from_u64(1);
        let [x, y] = field.randomize_seed(&mut rng).unwrap();
        assert!(field.is_inside_boundary(x as f64, y as f64));
    }

    #[test]
    fn release_drops_everything() {
        let mut field = sample_field();
        field.release();
        assert!(field.is_released());
        assert_eq!(field.lookup(2.0, 3.0), FieldVector::Outside);
        assert!(field.overlay().is_empty());
        let mut rng = StdRng::seed_from_u64(3);
        assert_eq!(field.randomize_seed(&mut rng), None);
    }
}
