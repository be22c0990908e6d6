//! Angle and slope utilities used across the detector pipeline.
//!
//! Image coordinates follow the frame convention: `x` grows to the right and
//! `y` grows downwards, so "counter-clockwise on screen" is clockwise in the
//! raw `(x, y)` numbers.

use crate::types::{PointIj, PointXyz};
use std::f64::consts::{FRAC_PI_2, TAU};

/// Sentinel returned by [`slope`] when the horizontal displacement is zero.
pub const VERTICAL_SLOPE: f64 = f64::MAX;

/// Computes the unsigned angle between two 2D vectors in radians.
/// Returns a value in [0, π]. Zero if the vectors are parallel
/// and pointing in the same direction; π if they are opposite.
#[inline]
pub fn angle_between(a: &[f64; 2], b: &[f64; 2]) -> f64 {
    let dot = a[0] * b[0] + a[1] * b[1];
    let na = (a[0] * a[0] + a[1] * a[1]).sqrt().max(1e-9);
    let nb = (b[0] * b[0] + b[1] * b[1]).sqrt().max(1e-9);
    (dot / (na * nb)).clamp(-1.0, 1.0).acos()
}

/// Angle at `vertex` between the rays towards `a` and `b`.
#[inline]
pub fn angle_between_points(a: PointIj, b: PointIj, vertex: PointIj) -> f64 {
    let da = [(a.x - vertex.x) as f64, (a.y - vertex.y) as f64];
    let db = [(b.x - vertex.x) as f64, (b.y - vertex.y) as f64];
    angle_between(&da, &db)
}

/// Angle at `vertex` between the 3D rays towards `a` and `b`.
#[inline]
pub fn angle_between_3d(a: &PointXyz, b: &PointXyz, vertex: &PointXyz) -> f64 {
    let da = (a - vertex).cast::<f64>();
    let db = (b - vertex).cast::<f64>();
    let na = da.norm().max(1e-9);
    let nb = db.norm().max(1e-9);
    (da.dot(&db) / (na * nb)).clamp(-1.0, 1.0).acos()
}

/// `dy / |dx|`, with zero horizontal displacement mapped to
/// ±[`VERTICAL_SLOPE`] by the sign of `dy` (and `0` when both are zero).
#[inline]
pub fn slope(dy: i32, dx: i32) -> f64 {
    if dx == 0 {
        return match dy.signum() {
            1 => VERTICAL_SLOPE,
            -1 => -VERTICAL_SLOPE,
            _ => 0.0,
        };
    }
    dy as f64 / (dx.abs() as f64)
}

/// Polar angle of an image-space offset, measured counter-clockwise on
/// screen from the positive `x` axis. Range (−π, π].
#[inline]
pub fn polar_angle(v: PointIj) -> f64 {
    ((-v.y) as f64).atan2(v.x as f64)
}

/// Counter-clockwise (on screen) angle of `v` measured from straight down.
/// Range [0, 2π).
#[inline]
pub fn ccw_angle_from_bottom(v: PointIj) -> f64 {
    (polar_angle(v) + FRAC_PI_2).rem_euclid(TAU)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    fn approx_eq(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-6
    }

    #[test]
    fn angle_between_basic() {
        let a = [1.0, 0.0];
        assert!(approx_eq(angle_between(&a, &[1.0, 0.0]), 0.0));
        assert!(approx_eq(angle_between(&a, &[-1.0, 0.0]), PI));
        assert!(approx_eq(angle_between(&a, &[0.0, 1.0]), FRAC_PI_2));
    }

    #[test]
    fn angle_between_points_measures_at_vertex() {
        let v = PointIj::new(0, 0);
        let a = PointIj::new(5, 0);
        let b = PointIj::new(0, -3);
        assert!(approx_eq(angle_between_points(a, b, v), FRAC_PI_2));
        assert!(approx_eq(angle_between_points(a, a, v), 0.0));
    }

    #[test]
    fn angle_between_3d_right_angle() {
        let v = PointXyz::new(0.0, 0.0, 1.0);
        let a = PointXyz::new(1.0, 0.0, 1.0);
        let b = PointXyz::new(0.0, 0.0, 2.0);
        assert!(approx_eq(angle_between_3d(&a, &b, &v), FRAC_PI_2));
    }

    #[test]
    fn slope_handles_vertical_displacement() {
        assert_eq!(slope(4, 0), VERTICAL_SLOPE);
        assert_eq!(slope(-4, 0), -VERTICAL_SLOPE);
        assert_eq!(slope(0, 0), 0.0);
        assert!(approx_eq(slope(3, -6), 0.5));
    }

    #[test]
    fn ccw_angle_starts_below_and_turns_right_first() {
        // straight down on screen
        assert!(approx_eq(ccw_angle_from_bottom(PointIj::new(0, 5)), 0.0));
        // right, then up, then left
        assert!(approx_eq(ccw_angle_from_bottom(PointIj::new(5, 0)), FRAC_PI_2));
        assert!(approx_eq(ccw_angle_from_bottom(PointIj::new(0, -5)), PI));
        assert!(approx_eq(ccw_angle_from_bottom(PointIj::new(-5, 0)), 1.5 * PI));
    }
}
