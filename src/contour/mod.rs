//! Closed contour of a cluster and the polygon measures the detector needs.
//!
//! The contour is an ordered list of pixel coordinates in full-frame space.
//! Indices form a circular space: stepping past the last point wraps to the
//! first, and arc distances take the shorter way around.
//!
//! Contours come from an external tracer which runs at a fixed
//! [`CONTOUR_SCALING_FACTOR`]; the detector never retraces.

use crate::angle::angle_between_points;
use crate::types::PointIj;

/// Resolution factor of the upstream contour tracer.
pub const CONTOUR_SCALING_FACTOR: i32 = 2;

/// Ordered, closed pixel contour.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Contour {
    points: Vec<PointIj>,
}

impl Contour {
    pub fn new(points: Vec<PointIj>) -> Self {
        Self { points }
    }

    #[inline]
    pub fn points(&self) -> &[PointIj] {
        &self.points
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Point at `idx`, wrapping around the contour.
    #[inline]
    pub fn get(&self, idx: usize) -> PointIj {
        self.points[idx % self.points.len()]
    }

    /// Index reached by moving `delta` steps from `idx` (may be negative).
    #[inline]
    pub fn step(&self, idx: usize, delta: i64) -> usize {
        let n = self.points.len() as i64;
        (idx as i64 + delta).rem_euclid(n) as usize
    }

    /// Number of contour points between `a` and `b` along the shorter arc.
    /// Indices wrap around the contour.
    pub fn arc_distance(&self, a: usize, b: usize) -> usize {
        let n = self.points.len();
        if n == 0 {
            return 0;
        }
        let (a, b) = (a % n, b % n);
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        (hi - lo).min(lo + n - hi)
    }

    /// Enclosed area (absolute shoelace).
    pub fn area(&self) -> f64 {
        polygon_area(&self.points)
    }

    /// Perimeter of the closed polygon.
    pub fn arc_length(&self) -> f64 {
        polygon_arc_length(&self.points)
    }

    /// Centroid from polygon moments; the vertex mean when the area vanishes.
    pub fn centroid(&self) -> Option<PointIj> {
        if self.points.is_empty() {
            return None;
        }
        let n = self.points.len();
        let (mut a2, mut cx, mut cy) = (0.0f64, 0.0f64, 0.0f64);
        for i in 0..n {
            let p = self.points[i];
            let q = self.points[(i + 1) % n];
            let cross = p.x as f64 * q.y as f64 - q.x as f64 * p.y as f64;
            a2 += cross;
            cx += (p.x + q.x) as f64 * cross;
            cy += (p.y + q.y) as f64 * cross;
        }
        if a2.abs() < 1e-9 {
            let sx: f64 = self.points.iter().map(|p| p.x as f64).sum();
            let sy: f64 = self.points.iter().map(|p| p.y as f64).sum();
            return Some(PointIj::new(
                (sx / n as f64).round() as i32,
                (sy / n as f64).round() as i32,
            ));
        }
        let scale = 1.0 / (3.0 * a2);
        Some(PointIj::new(
            (cx * scale).round() as i32,
            (cy * scale).round() as i32,
        ))
    }

    /// Two contour indices with the largest pixel distance, and that distance.
    pub fn diameter(&self) -> Option<(usize, usize, f64)> {
        if self.points.len() < 2 {
            return None;
        }
        let mut best = (0, 0, -1.0f64);
        for (i, p) in self.points.iter().enumerate() {
            for (j, q) in self.points.iter().enumerate().skip(i + 1) {
                let d = pixel_distance(*p, *q);
                if d > best.2 {
                    best = (i, j, d);
                }
            }
        }
        Some(best)
    }

    /// Signed distance from `p` to the contour: positive inside, negative
    /// outside, zero on the boundary.
    pub fn signed_distance(&self, p: [f64; 2]) -> f64 {
        let n = self.points.len();
        if n == 0 {
            return f64::NEG_INFINITY;
        }
        let mut min_d2 = f64::INFINITY;
        let mut inside = false;
        for i in 0..n {
            let a = self.points[i];
            let b = self.points[(i + 1) % n];
            let (ax, ay) = (a.x as f64, a.y as f64);
            let (bx, by) = (b.x as f64, b.y as f64);
            min_d2 = min_d2.min(segment_distance_sq(p, [ax, ay], [bx, by]));
            if (ay > p[1]) != (by > p[1]) {
                let x_cross = ax + (p[1] - ay) * (bx - ax) / (by - ay);
                if p[0] < x_cross {
                    inside = !inside;
                }
            }
        }
        let d = min_d2.sqrt();
        if d == 0.0 {
            0.0
        } else if inside {
            d
        } else {
            -d
        }
    }

    /// Mean chord angle at `idx` over the offsets `lo..=hi`: the angle at the
    /// point between its `k`-th predecessor and `k`-th successor. Straight
    /// runs approach π, sharp tips approach 0.
    pub fn curvature(&self, idx: usize, lo: usize, hi: usize) -> f64 {
        if self.points.is_empty() || hi < lo {
            return 0.0;
        }
        let center = self.get(idx);
        let mut total = 0.0;
        for k in lo..=hi {
            let prev = self.points[self.step(idx, -(k as i64))];
            let next = self.points[self.step(idx, k as i64)];
            total += angle_between_points(prev, next, center);
        }
        total / (hi - lo + 1) as f64
    }

    /// Index of the contour point nearest to `p` (first on ties).
    pub fn nearest_index(&self, p: PointIj) -> Option<usize> {
        self.points
            .iter()
            .enumerate()
            .min_by_key(|(_, q)| {
                let dx = (q.x - p.x) as i64;
                let dy = (q.y - p.y) as i64;
                dx * dx + dy * dy
            })
            .map(|(i, _)| i)
    }
}

/// Absolute shoelace area of a closed polygon.
pub fn polygon_area(points: &[PointIj]) -> f64 {
    let n = points.len();
    if n < 3 {
        return 0.0;
    }
    let mut acc = 0i64;
    for i in 0..n {
        let p = points[i];
        let q = points[(i + 1) % n];
        acc += p.x as i64 * q.y as i64 - q.x as i64 * p.y as i64;
    }
    (acc as f64).abs() * 0.5
}

/// Perimeter of a closed polygon.
pub fn polygon_arc_length(points: &[PointIj]) -> f64 {
    let n = points.len();
    if n < 2 {
        return 0.0;
    }
    (0..n)
        .map(|i| pixel_distance(points[i], points[(i + 1) % n]))
        .sum()
}

#[inline]
pub fn pixel_distance(a: PointIj, b: PointIj) -> f64 {
    let dx = (a.x - b.x) as f64;
    let dy = (a.y - b.y) as f64;
    (dx * dx + dy * dy).sqrt()
}

fn segment_distance_sq(p: [f64; 2], a: [f64; 2], b: [f64; 2]) -> f64 {
    let (vx, vy) = (b[0] - a[0], b[1] - a[1]);
    let (wx, wy) = (p[0] - a[0], p[1] - a[1]);
    let len2 = vx * vx + vy * vy;
    let t = if len2 > 0.0 {
        ((wx * vx + wy * vy) / len2).clamp(0.0, 1.0)
    } else {
        0.0
    };
    let dx = wx - t * vx;
    let dy = wy - t * vy;
    dx * dx + dy * dy
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    fn approx_eq(a: f64, b: f64, tol: f64) -> bool {
        (a - b).abs() < tol
    }

    /// Square outline (0,0)-(10,10), one point per pixel step.
    fn square() -> Contour {
        let mut pts = Vec::new();
        for x in 0..10 {
            pts.push(PointIj::new(x, 0));
        }
        for y in 0..10 {
            pts.push(PointIj::new(10, y));
        }
        for x in (1..=10).rev() {
            pts.push(PointIj::new(x, 10));
        }
        for y in (1..=10).rev() {
            pts.push(PointIj::new(0, y));
        }
        Contour::new(pts)
    }

    #[test]
    fn circular_indexing_wraps() {
        let c = square();
        assert_eq!(c.len(), 40);
        assert_eq!(c.step(0, -1), 39);
        assert_eq!(c.step(39, 2), 1);
        assert_eq!(c.arc_distance(2, 38), 4);
        assert_eq!(c.arc_distance(5, 15), 10);
    }

    #[test]
    fn arc_distance_reduces_out_of_range_indices() {
        let c = square();
        assert_eq!(c.arc_distance(1000, 5), 5);
        assert_eq!(c.arc_distance(3, 43), 0);
        assert_eq!(c.arc_distance(79, 1), 2);
        assert_eq!(Contour::new(Vec::new()).arc_distance(3, 7), 0);
    }

    #[test]
    fn square_measures() {
        let c = square();
        assert!(approx_eq(c.area(), 100.0, 1e-9));
        assert!(approx_eq(c.arc_length(), 40.0, 1e-9));
        assert_eq!(c.centroid(), Some(PointIj::new(5, 5)));
        let (_, _, d) = c.diameter().unwrap();
        assert!(approx_eq(d, 200f64.sqrt(), 1e-9));
    }

    #[test]
    fn signed_distance_sign_follows_inside() {
        let c = square();
        assert!(approx_eq(c.signed_distance([5.0, 5.0]), 5.0, 1e-9));
        assert!(approx_eq(c.signed_distance([12.0, 5.0]), -2.0, 1e-9));
        assert_eq!(c.signed_distance([0.0, 5.0]), 0.0);
    }

    #[test]
    fn curvature_is_pi_on_straight_runs() {
        let c = square();
        assert!(approx_eq(c.curvature(5, 1, 3), PI, 1e-9));
        // the corner at (10,0) folds to a right angle
        assert!(approx_eq(c.curvature(10, 1, 3), PI / 2.0, 1e-9));
    }

    #[test]
    fn degenerate_centroid_falls_back_to_vertex_mean() {
        let c = Contour::new(vec![PointIj::new(0, 0), PointIj::new(4, 0), PointIj::new(8, 0)]);
        assert_eq!(c.centroid(), Some(PointIj::new(4, 0)));
        assert_eq!(c.nearest_index(PointIj::new(5, 1)), Some(1));
    }
}
