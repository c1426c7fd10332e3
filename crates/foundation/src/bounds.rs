/// Pixel dimensions of the drawing surface supplied by the presentation layer.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct View {
    pub width: u32,
    pub height: u32,
}

impl View {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && (x as u32) < self.width && (y as u32) < self.height
    }
}

/// Axis-aligned bounding box in screen space.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Aabb2 {
    pub min: [f64; 2],
    pub max: [f64; 2],
}

impl Aabb2 {
    pub fn new(min: [f64; 2], max: [f64; 2]) -> Self {
        Aabb2 { min, max }
    }

    /// An inverted box that any `extend` call replaces.
    pub fn empty() -> Self {
        Aabb2 {
            min: [f64::INFINITY, f64::INFINITY],
            max: [f64::NEG_INFINITY, f64::NEG_INFINITY],
        }
    }

    pub fn is_empty(&self) -> bool {
        self.min[0] > self.max[0] || self.min[1] > self.max[1]
    }

    pub fn extend(&mut self, p: [f64; 2]) {
        if !(p[0].is_finite() && p[1].is_finite()) {
            return;
        }
        self.min[0] = self.min[0].min(p[0]);
        self.min[1] = self.min[1].min(p[1]);
        self.max[0] = self.max[0].max(p[0]);
        self.max[1] = self.max[1].max(p[1]);
    }

    pub fn width(&self) -> f64 {
        self.max[0] - self.min[0]
    }

    pub fn height(&self) -> f64 {
        self.max[1] - self.min[1]
    }
}

/// Integer pixel bounds of the globe's outline, clamped into the view.
///
/// Both extents are inclusive, so `width == x_max - x + 1`. An outline that
/// misses the view entirely produces zero width or height.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Bounds {
    pub x: i32,
    pub y: i32,
    pub x_max: i32,
    pub y_max: i32,
    pub width: i32,
    pub height: i32,
}

impl Bounds {
    /// Clamp a floating-point box into `[0, width-1] x [0, height-1]`.
    ///
    /// Non-finite lower components fall back to 0 and non-finite upper
    /// components fall back to the view extent.
    pub fn clamped(aabb: Aabb2, view: View) -> Self {
        let w = view.width as i32;
        let h = view.height as i32;
        let (x, x_max) = clamp_axis(aabb.min[0], aabb.max[0], w);
        let (y, y_max) = clamp_axis(aabb.min[1], aabb.max[1], h);
        Self {
            x,
            y,
            x_max,
            y_max,
            width: x_max - x + 1,
            height: y_max - y + 1,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }

    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.x && x <= self.x_max && y >= self.y && y <= self.y_max
    }
}

fn clamp_axis(lo: f64, hi: f64, extent: i32) -> (i32, i32) {
    if extent <= 0 {
        return (0, -1);
    }
    let lo = if lo.is_finite() { lo.floor() } else { 0.0 };
    let hi = if hi.is_finite() { hi.ceil() } else { extent as f64 };
    let last = (extent - 1) as f64;
    if hi < 0.0 || lo > last || hi < lo {
        // Keep the `max - min + 1` identity when the outline lies off screen.
        let edge = lo.clamp(0.0, last) as i32;
        return (edge, edge - 1);
    }
    (lo.max(0.0) as i32, hi.min(last) as i32)
}
