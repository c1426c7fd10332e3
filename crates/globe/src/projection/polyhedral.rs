//! Polyhedral projections: each face of a polyhedron is projected gnomonically
//! about its centre, and the faces are unfolded into a plane along a tree of
//! shared edges.

use std::f64::consts::FRAC_PI_2;

use foundation::math::{
    cartesian, spherical, triangle_contains, vec3_add, vec3_cross, vec3_dot, vec3_normalize,
    vec3_scale,
};

/// Octahedron vertices as `[λ, φ]` in degrees.
const OCTAHEDRON: [[f64; 2]; 6] = [
    [0.0, 90.0],
    [-90.0, 0.0],
    [0.0, 0.0],
    [90.0, 0.0],
    [180.0, 0.0],
    [0.0, -90.0],
];

const OCTAHEDRON_FACES: [[usize; 3]; 8] = [
    [0, 2, 1],
    [0, 3, 2],
    [5, 1, 2],
    [5, 2, 3],
    [0, 1, 4],
    [0, 4, 3],
    [5, 4, 1],
    [5, 3, 4],
];

/// Unfolding tree: the four northern faces fan around the pole, each southern
/// face hangs off the northern face it shares an equator edge with. The cut
/// runs along the 180° meridian.
const BUTTERFLY_PARENTS: [Option<usize>; 8] = [
    None,
    Some(0),
    Some(0),
    Some(1),
    Some(0),
    Some(1),
    Some(4),
    Some(5),
];

/// Planar similarity transform `p -> m·p + t`.
#[derive(Debug, Copy, Clone, PartialEq)]
struct Similarity {
    m: [[f64; 2]; 2],
    t: [f64; 2],
}

impl Similarity {
    fn rotation(angle: f64) -> Self {
        let (s, c) = angle.sin_cos();
        Self {
            m: [[c, -s], [s, c]],
            t: [0.0, 0.0],
        }
    }

    /// The orientation-preserving similarity taking `a0 -> a1` and `b0 -> b1`.
    fn between(a0: [f64; 2], b0: [f64; 2], a1: [f64; 2], b1: [f64; 2]) -> Self {
        let d0 = [b0[0] - a0[0], b0[1] - a0[1]];
        let d1 = [b1[0] - a1[0], b1[1] - a1[1]];
        let angle = d1[1].atan2(d1[0]) - d0[1].atan2(d0[0]);
        let scale = d1[0].hypot(d1[1]) / d0[0].hypot(d0[1]);
        let mut sim = Self::rotation(angle);
        for row in &mut sim.m {
            row[0] *= scale;
            row[1] *= scale;
        }
        let moved = sim.apply(a0);
        sim.t = [a1[0] - moved[0], a1[1] - moved[1]];
        sim
    }

    fn apply(&self, p: [f64; 2]) -> [f64; 2] {
        [
            self.m[0][0] * p[0] + self.m[0][1] * p[1] + self.t[0],
            self.m[1][0] * p[0] + self.m[1][1] * p[1] + self.t[1],
        ]
    }

    fn invert(&self, p: [f64; 2]) -> [f64; 2] {
        let [[a, b], [c, d]] = self.m;
        let det = a * d - b * c;
        let x = p[0] - self.t[0];
        let y = p[1] - self.t[1];
        [(d * x - b * y) / det, (a * y - c * x) / det]
    }
}

#[derive(Debug, Clone)]
struct Face {
    center: [f64; 3],
    east: [f64; 3],
    north: [f64; 3],
    corners: [usize; 3],
    layout: Similarity,
    triangle: [[f64; 2]; 3],
}

impl Face {
    fn new(corners: [usize; 3], vertices: &[[f64; 3]]) -> Self {
        let sum = corners
            .iter()
            .fold([0.0; 3], |acc, &i| vec3_add(acc, vertices[i]));
        let center = vec3_normalize(sum);
        let east = vec3_normalize(vec3_cross([0.0, 0.0, 1.0], center));
        let north = vec3_cross(center, east);
        Self {
            center,
            east,
            north,
            corners,
            layout: Similarity::rotation(0.0),
            triangle: [[0.0; 2]; 3],
        }
    }

    /// Gnomonic projection about the face centre.
    fn local(&self, p: [f64; 3]) -> [f64; 2] {
        let d = vec3_dot(p, self.center);
        [vec3_dot(p, self.east) / d, vec3_dot(p, self.north) / d]
    }

    fn local_invert(&self, q: [f64; 2]) -> [f64; 3] {
        vec3_add(
            self.center,
            vec3_add(vec3_scale(self.east, q[0]), vec3_scale(self.north, q[1])),
        )
    }

    fn place(&self, p: [f64; 3]) -> [f64; 2] {
        self.layout.apply(self.local(p))
    }
}

#[derive(Debug, Clone)]
pub struct Polyhedron {
    faces: Vec<Face>,
}

impl Polyhedron {
    /// Octahedron unfolded as a butterfly, centred on the origin with the
    /// prime meridian pointing down from the north pole.
    pub fn octahedral_butterfly() -> Self {
        let vertices: Vec<[f64; 3]> = OCTAHEDRON
            .iter()
            .map(|v| cartesian(v[0].to_radians(), v[1].to_radians()))
            .collect();

        let mut faces: Vec<Face> = Vec::with_capacity(OCTAHEDRON_FACES.len());
        for (corners, parent) in OCTAHEDRON_FACES.iter().zip(BUTTERFLY_PARENTS) {
            let mut face = Face::new(*corners, &vertices);
            face.layout = match parent {
                None => {
                    let pole = face.local(vertices[0]);
                    let meridian = face.local(vertices[2]);
                    let d = [meridian[0] - pole[0], meridian[1] - pole[1]];
                    Similarity::rotation(-FRAC_PI_2 - d[1].atan2(d[0]))
                }
                Some(p) => {
                    let parent = &faces[p];
                    let mut shared = corners.iter().filter(|&&c| parent.corners.contains(&c));
                    let (Some(&a), Some(&b)) = (shared.next(), shared.next()) else {
                        unreachable!("unfolding tree links faces without a shared edge")
                    };
                    Similarity::between(
                        face.local(vertices[a]),
                        face.local(vertices[b]),
                        parent.place(vertices[a]),
                        parent.place(vertices[b]),
                    )
                }
            };
            faces.push(face);
        }

        for face in &mut faces {
            face.triangle = face.corners.map(|i| face.place(vertices[i]));
        }

        let (mut min, mut max) = ([f64::INFINITY; 2], [f64::NEG_INFINITY; 2]);
        for p in faces.iter().flat_map(|f| f.triangle) {
            min = [min[0].min(p[0]), min[1].min(p[1])];
            max = [max[0].max(p[0]), max[1].max(p[1])];
        }
        let shift = [(min[0] + max[0]) / 2.0, (min[1] + max[1]) / 2.0];
        for face in &mut faces {
            face.layout.t = [face.layout.t[0] - shift[0], face.layout.t[1] - shift[1]];
            for p in &mut face.triangle {
                *p = [p[0] - shift[0], p[1] - shift[1]];
            }
        }

        Self { faces }
    }

    pub fn forward(&self, lambda: f64, phi: f64) -> [f64; 2] {
        let p = cartesian(lambda, phi);
        let mut nearest = &self.faces[0];
        for face in &self.faces[1..] {
            if vec3_dot(p, face.center) > vec3_dot(p, nearest.center) {
                nearest = face;
            }
        }
        nearest.place(p)
    }

    pub fn invert(&self, x: f64, y: f64) -> Option<[f64; 2]> {
        let q = [x, y];
        let face = self.faces.iter().find(|f| triangle_contains(f.triangle, q))?;
        Some(spherical(face.local_invert(face.layout.invert(q))))
    }

    /// The unfolded face triangles in raw projection space.
    pub fn face_triangles(&self) -> impl Iterator<Item = [[f64; 2]; 3]> + '_ {
        self.faces.iter().map(|f| f.triangle)
    }
}

#[cfg(test)]
mod tests {
    use super::Polyhedron;
    use foundation::math::{polygon::signed_area2, triangle_contains};

    fn assert_close(a: f64, b: f64, eps: f64) {
        let diff = (a - b).abs();
        assert!(diff <= eps, "expected {a} ~= {b} (diff {diff})");
    }

    #[test]
    fn faces_do_not_overlap() {
        let poly = Polyhedron::octahedral_butterfly();
        let tris: Vec<_> = poly.face_triangles().collect();
        assert_eq!(tris.len(), 8);
        for (i, a) in tris.iter().enumerate() {
            let centroid = [
                (a[0][0] + a[1][0] + a[2][0]) / 3.0,
                (a[0][1] + a[1][1] + a[2][1]) / 3.0,
            ];
            for (j, b) in tris.iter().enumerate() {
                if i != j {
                    assert!(!triangle_contains(*b, centroid), "face {i} overlaps {j}");
                }
            }
        }
    }

    #[test]
    fn faces_are_congruent() {
        let poly = Polyhedron::octahedral_butterfly();
        let areas: Vec<f64> = poly
            .face_triangles()
            .map(|t| signed_area2(&t).abs())
            .collect();
        for a in &areas {
            assert_close(*a, areas[0], 1e-9);
        }
    }

    #[test]
    fn pole_sits_above_prime_meridian() {
        let poly = Polyhedron::octahedral_butterfly();
        let pole = poly.forward(0.0, std::f64::consts::FRAC_PI_2 - 1e-9);
        let equator = poly.forward(0.0, 0.0);
        assert_close(pole[0], equator[0], 1e-6);
        assert!(pole[1] > equator[1]);
    }

    #[test]
    fn round_trips_through_every_face() {
        let poly = Polyhedron::octahedral_butterfly();
        for lon in [-135.0f64, -45.0, 45.0, 135.0] {
            for lat in [-40.0f64, 40.0] {
                let (l, p) = (lon.to_radians(), lat.to_radians());
                let q = poly.forward(l, p);
                let back = poly.invert(q[0], q[1]).unwrap();
                assert_close(back[0], l, 1e-9);
                assert_close(back[1], p, 1e-9);
            }
        }
    }

    #[test]
    fn gap_has_no_preimage() {
        let poly = Polyhedron::octahedral_butterfly();
        // Far outside the layout.
        assert!(poly.invert(100.0, 100.0).is_none());
    }
}
