//! Small array-based vector helpers shared by the projection code.

pub fn vec3_add(a: [f64; 3], b: [f64; 3]) -> [f64; 3] {
    [a[0] + b[0], a[1] + b[1], a[2] + b[2]]
}

pub fn vec3_scale(a: [f64; 3], s: f64) -> [f64; 3] {
    [a[0] * s, a[1] * s, a[2] * s]
}

pub fn vec3_dot(a: [f64; 3], b: [f64; 3]) -> f64 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}

pub fn vec3_cross(a: [f64; 3], b: [f64; 3]) -> [f64; 3] {
    [
        a[1] * b[2] - a[2] * b[1],
        a[2] * b[0] - a[0] * b[2],
        a[0] * b[1] - a[1] * b[0],
    ]
}

pub fn vec3_normalize(a: [f64; 3]) -> [f64; 3] {
    let n = vec3_dot(a, a).sqrt();
    if n > 1e-10 {
        [a[0] / n, a[1] / n, a[2] / n]
    } else {
        [0.0, 0.0, 0.0]
    }
}

/// Planar distance between two screen points.
pub fn distance2(a: [f64; 2], b: [f64; 2]) -> f64 {
    let dx = a[0] - b[0];
    let dy = a[1] - b[1];
    (dx * dx + dy * dy).sqrt()
}

#[cfg(test)]
mod tests {
    use super::{distance2, vec3_cross, vec3_dot, vec3_normalize};

    #[test]
    fn cross_of_axes() {
        assert_eq!(vec3_cross([1.0, 0.0, 0.0], [0.0, 1.0, 0.0]), [0.0, 0.0, 1.0]);
    }

    #[test]
    fn normalize_handles_zero() {
        assert_eq!(vec3_normalize([0.0, 0.0, 0.0]), [0.0, 0.0, 0.0]);
        let n = vec3_normalize([3.0, 0.0, 4.0]);
        assert!((vec3_dot(n, n) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn planar_distance() {
        assert_eq!(distance2([0.0, 0.0], [3.0, 4.0]), 5.0);
    }
}
