use foundation::{Bounds, View};
use serde::Serialize;

/// Flatten an RGBA overlay onto an opaque background.
pub fn composite_rgb(rgba: &[u8], background: [u8; 3]) -> Vec<u8> {
    let mut out = Vec::with_capacity(rgba.len() / 4 * 3);
    for px in rgba.chunks_exact(4) {
        let a = px[3] as u32;
        for c in 0..3 {
            let blended = (px[c] as u32 * a + background[c] as u32 * (255 - a) + 127) / 255;
            out.push(blended as u8);
        }
    }
    out
}

/// Binary PPM (`P6`) image.
pub fn encode_ppm(view: View, rgb: &[u8]) -> Vec<u8> {
    let mut out = format!("P6\n{} {}\n255\n", view.width, view.height).into_bytes();
    out.extend_from_slice(rgb);
    out
}

#[derive(Debug, Serialize, PartialEq)]
pub struct BoundsSummary {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl From<Bounds> for BoundsSummary {
    fn from(b: Bounds) -> Self {
        Self {
            x: b.x,
            y: b.y,
            width: b.width,
            height: b.height,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct RenderSummary {
    pub projection: String,
    pub orientation: String,
    pub width: u32,
    pub height: u32,
    pub bounds: BoundsSummary,
    pub defined_vectors: usize,
    pub sample_seed: Option<[i32; 2]>,
    pub elapsed_ms: u64,
}

#[cfg(test)]
mod tests {
    use super::{composite_rgb, encode_ppm};
    use foundation::View;

    #[test]
    fn transparent_pixels_show_the_background() {
        let rgba = [255, 0, 0, 0, 255, 0, 0, 255, 200, 100, 0, 102];
        let rgb = composite_rgb(&rgba, [10, 20, 30]);
        assert_eq!(&rgb[0..3], &[10, 20, 30]);
        assert_eq!(&rgb[3..6], &[255, 0, 0]);
        // 40% of the colour over 60% of the background.
        assert_eq!(&rgb[6..9], &[86, 52, 18]);
    }

    #[test]
    fn ppm_header() {
        let bytes = encode_ppm(View::new(2, 1), &[1, 2, 3, 4, 5, 6]);
        assert!(bytes.starts_with(b"P6\n2 1\n255\n"));
        assert_eq!(bytes.len(), 11 + 6);
    }
}
