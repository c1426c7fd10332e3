//! Rasterised visibility of the globe plus the RGBA overlay buffer.

use foundation::View;
use foundation::math::Ring;
use globe::Globe;

pub const TRANSPARENT: [u8; 4] = [0, 0, 0, 0];

/// Which pixels of the view lie on the globe, and the overlay colours
/// written for them.
///
/// A pixel is visible when its centre lies inside the outline under the
/// non-zero winding rule.
#[derive(Debug, Clone)]
pub struct Mask {
    view: View,
    visible: Vec<bool>,
    rgba: Vec<u8>,
}

impl Mask {
    pub fn from_rings(rings: &[Ring], view: View) -> Self {
        let width = view.width as usize;
        let height = view.height as usize;
        let mut visible = vec![false; view.pixel_count()];

        // Crossings per row: (x, winding direction).
        let mut rows: Vec<Vec<(f64, i32)>> = vec![Vec::new(); height];
        for ring in rings {
            let n = ring.len();
            if n < 3 {
                continue;
            }
            for i in 0..n {
                let a = ring[i];
                let b = ring[(i + 1) % n];
                if !(a[0].is_finite() && a[1].is_finite() && b[0].is_finite() && b[1].is_finite())
                {
                    continue;
                }
                if a[1] == b[1] {
                    continue;
                }
                let (lo, hi, dir) = if a[1] < b[1] {
                    (a[1], b[1], 1)
                } else {
                    (b[1], a[1], -1)
                };
                // Rows whose centre satisfies lo <= y + 0.5 < hi.
                let first = (lo - 0.5).ceil().max(0.0);
                let last = ((hi - 0.5).ceil() - 1.0).min(height as f64 - 1.0);
                if first > last {
                    continue;
                }
                for row in first as usize..=last as usize {
                    let yc = row as f64 + 0.5;
                    let x = a[0] + (yc - a[1]) * (b[0] - a[0]) / (b[1] - a[1]);
                    rows[row].push((x, dir));
                }
            }
        }

        for (row, crossings) in rows.iter_mut().enumerate() {
            crossings.sort_by(|p, q| p.0.total_cmp(&q.0));
            let mut winding = 0;
            for pair in crossings.windows(2) {
                winding += pair[0].1;
                if winding == 0 {
                    continue;
                }
                // Pixels whose centre lies in [x0, x1).
                let start = (pair[0].0 - 0.5).ceil().max(0.0);
                let end = ((pair[1].0 - 0.5).ceil() - 1.0).min(width as f64 - 1.0);
                if start > end {
                    continue;
                }
                let offset = row * width;
                for x in start as usize..=end as usize {
                    visible[offset + x] = true;
                }
            }
        }

        Self {
            view,
            visible,
            rgba: vec![0; view.pixel_count() * 4],
        }
    }

    pub fn view(&self) -> View {
        self.view
    }

    fn index(&self, x: i32, y: i32) -> Option<usize> {
        self.view
            .contains(x, y)
            .then(|| y as usize * self.view.width as usize + x as usize)
    }

    /// False for pixels outside the view.
    pub fn is_visible(&self, x: i32, y: i32) -> bool {
        self.index(x, y).is_some_and(|i| self.visible[i])
    }

    pub fn visible_count(&self) -> usize {
        self.visible.iter().filter(|v| **v).count()
    }

    /// Writes an overlay colour; pixels outside the view are ignored.
    pub fn set(&mut self, x: i32, y: i32, rgba: [u8; 4]) -> &mut Self {
        if let Some(i) = self.index(x, y) {
            self.rgba[i * 4..i * 4 + 4].copy_from_slice(&rgba);
        }
        self
    }

    pub fn color(&self, x: i32, y: i32) -> [u8; 4] {
        match self.index(x, y) {
            Some(i) => {
                let mut out = TRANSPARENT;
                out.copy_from_slice(&self.rgba[i * 4..i * 4 + 4]);
                out
            }
            None => TRANSPARENT,
        }
    }

    /// Row-major RGBA bytes, `width * height * 4` long.
    pub fn image(&self) -> &[u8] {
        &self.rgba
    }

    pub fn into_image(self) -> Vec<u8> {
        self.rgba
    }
}

/// Rasterise the globe's current outline.
pub fn build_mask(globe: &dyn Globe, view: View) -> Mask {
    Mask::from_rings(&globe.define_mask(), view)
}
