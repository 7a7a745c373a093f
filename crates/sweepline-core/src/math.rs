use glam::Vec3;

pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Cubic Hermite spline between `p0` and `p1` with endpoint tangents `m0`, `m1`.
pub fn cubic_hermite(p0: Vec3, p1: Vec3, m0: Vec3, m1: Vec3, t: f32) -> Vec3 {
    let t2 = t * t;
    let t3 = t2 * t;
    let h00 = 2.0 * t3 - 3.0 * t2 + 1.0;
    let h10 = t3 - 2.0 * t2 + t;
    let h01 = -2.0 * t3 + 3.0 * t2;
    let h11 = t3 - t2;
    p0 * h00 + m0 * h10 + p1 * h01 + m1 * h11
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn hermite_hits_endpoints() {
        let p0 = Vec3::new(1.0, 2.0, 3.0);
        let p1 = Vec3::new(-4.0, 0.5, 8.0);
        let m = Vec3::new(3.0, -1.0, 2.0);
        assert!(cubic_hermite(p0, p1, m, m, 0.0).abs_diff_eq(p0, 1e-6));
        assert!(cubic_hermite(p0, p1, m, m, 1.0).abs_diff_eq(p1, 1e-6));
    }

    #[test]
    fn hermite_with_chord_tangents_is_linear() {
        let p0 = Vec3::ZERO;
        let p1 = Vec3::new(10.0, 0.0, 0.0);
        let chord = p1 - p0;
        let mid = cubic_hermite(p0, p1, chord, chord, 0.5);
        assert!(mid.abs_diff_eq(Vec3::new(5.0, 0.0, 0.0), 1e-5));
    }

    #[test]
    fn lerp_basics() {
        assert_relative_eq!(lerp(0.0, 1.0, 0.25), 0.25);
        assert_relative_eq!(lerp(0.5, 1.0, 1.0), 1.0);
    }
}
