//! Planar polygon helpers for outline geometry.

use crate::bounds::Aabb2;

/// A closed ring of screen points. The closing edge is implicit.
pub type Ring = Vec<[f64; 2]>;

/// Bounding box over every point of every ring.
pub fn rings_bounds(rings: &[Ring]) -> Aabb2 {
    let mut aabb = Aabb2::empty();
    for ring in rings {
        for &p in ring {
            aabb.extend(p);
        }
    }
    aabb
}

/// Twice the signed area; positive for counter-clockwise rings in a y-up frame.
pub fn signed_area2(ring: &[[f64; 2]]) -> f64 {
    let n = ring.len();
    let mut sum = 0.0;
    for i in 0..n {
        let a = ring[i];
        let b = ring[(i + 1) % n];
        sum += a[0] * b[1] - b[0] * a[1];
    }
    sum
}

/// Sutherland–Hodgman clip of `ring` against an axis-aligned rectangle.
pub fn clip_ring_to_rect(ring: &[[f64; 2]], rect: Aabb2) -> Ring {
    let mut out: Ring = ring.to_vec();
    for edge in 0..4 {
        if out.is_empty() {
            break;
        }
        let input = std::mem::take(&mut out);
        let inside = |p: [f64; 2]| match edge {
            0 => p[0] >= rect.min[0],
            1 => p[0] <= rect.max[0],
            2 => p[1] >= rect.min[1],
            _ => p[1] <= rect.max[1],
        };
        let intersect = |a: [f64; 2], b: [f64; 2]| {
            let (axis, bound) = match edge {
                0 => (0, rect.min[0]),
                1 => (0, rect.max[0]),
                2 => (1, rect.min[1]),
                _ => (1, rect.max[1]),
            };
            let t = (bound - a[axis]) / (b[axis] - a[axis]);
            let mut p = [a[0] + t * (b[0] - a[0]), a[1] + t * (b[1] - a[1])];
            p[axis] = bound;
            p
        };
        let mut prev = input[input.len() - 1];
        for &cur in &input {
            match (inside(prev), inside(cur)) {
                (true, true) => out.push(cur),
                (true, false) => out.push(intersect(prev, cur)),
                (false, true) => {
                    out.push(intersect(prev, cur));
                    out.push(cur);
                }
                (false, false) => {}
            }
            prev = cur;
        }
    }
    out
}

/// Barycentric containment test, inclusive of edges.
pub fn triangle_contains(tri: [[f64; 2]; 3], p: [f64; 2]) -> bool {
    let d = |a: [f64; 2], b: [f64; 2], c: [f64; 2]| {
        (a[0] - c[0]) * (b[1] - c[1]) - (b[0] - c[0]) * (a[1] - c[1])
    };
    let d1 = d(p, tri[0], tri[1]);
    let d2 = d(p, tri[1], tri[2]);
    let d3 = d(p, tri[2], tri[0]);
    let has_neg = d1 < 0.0 || d2 < 0.0 || d3 < 0.0;
    let has_pos = d1 > 0.0 || d2 > 0.0 || d3 > 0.0;
    !(has_neg && has_pos)
}
