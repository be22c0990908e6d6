//! Synthetic hand rising from the bottom of a 320x240 frame.
//!
//! The cluster is a palm block on top of a forearm stub touching the bottom
//! edge, plus a row of fingers with pointed tips. Every pixel sits on the
//! plane `z = 0.4` with 1 mm per pixel.

use hand_detector::image::XyzImage;
use hand_detector::prelude::*;
use std::collections::BTreeSet;

pub const FRAME: (i32, i32) = (320, 240);
pub const WINDOW_ORIGIN: (i32, i32) = (100, 60);
pub const WINDOW_SIZE: (usize, usize) = (110, 180);

/// `(left column, tip row)` of each finger, left to right.
pub const FIVE_FINGERS: [(i32, i32); 5] = [(105, 85), (126, 75), (147, 70), (168, 75), (189, 85)];
pub const MIDDLE_FINGER: [(i32, i32); 1] = [(147, 70)];
/// Seven narrow-spaced fingers, more than a hand can carry.
pub const SEVEN_FINGERS: [(i32, i32); 7] =
    [(105, 98), (119, 85), (133, 78), (147, 75), (161, 78), (175, 85), (189, 98)];

const FINGER_WIDTH: i32 = 12;
const TIP_HEIGHT: i32 = 6;

pub struct SyntheticHand {
    pub cluster: Cluster,
    pub depth: XyzImage,
    pub geometry: ContourGeometry,
}

impl SyntheticHand {
    pub fn input(&self) -> HandInput<'_> {
        HandInput::new(
            &self.cluster,
            &self.depth,
            PointIj::new(WINDOW_ORIGIN.0, WINDOW_ORIGIN.1),
            FRAME,
            &self.geometry,
        )
    }
}

pub fn xyz_at(x: i32, y: i32) -> PointXyz {
    PointXyz::new((x - 160) as f32 * 0.001, (y - 120) as f32 * 0.001, 0.4)
}

/// Thresholds for the fixture; a single finger leaves less surface than a
/// real hand, so the area floor is relaxed.
pub fn fixture_params() -> HandParams {
    HandParams {
        hand_min_area: 0.005,
        ..HandParams::default()
    }
}

pub fn build_hand(fingers: &[(i32, i32)]) -> SyntheticHand {
    let mask = hand_mask(fingers);
    let contour = trace_outline(fingers);
    let hull = hull_indices(&contour);
    let defects = convexity_defects(&contour, &hull, 2.0);

    let (ox, oy) = WINDOW_ORIGIN;
    let mut points_ij = Vec::new();
    let mut points_xyz = Vec::new();
    for &(y, x) in &mask {
        let (lx, ly) = (x - ox, y - oy);
        if lx < 0 || ly < 0 || lx >= WINDOW_SIZE.0 as i32 || ly >= WINDOW_SIZE.1 as i32 {
            continue;
        }
        points_ij.push(PointIj::new(x, y));
        points_xyz.push(xyz_at(x, y));
    }
    let cluster = Cluster::new(points_ij, points_xyz).expect("parallel point lists");
    let depth = XyzImage::from_cluster(&cluster, PointIj::new(ox, oy), WINDOW_SIZE.0, WINDOW_SIZE.1);

    SyntheticHand {
        cluster,
        depth,
        geometry: ContourGeometry::new(contour, hull, defects),
    }
}

/// Cluster pixels as `(row, column)` so iteration is row-major.
fn hand_mask(fingers: &[(i32, i32)]) -> BTreeSet<(i32, i32)> {
    let mut mask = BTreeSet::new();
    let mut fill = |x0: i32, x1: i32, y0: i32, y1: i32| {
        for y in y0..=y1 {
            for x in x0..=x1 {
                mask.insert((y, x));
            }
        }
    };
    fill(105, 201, 120, 200);
    fill(130, 180, 200, 239);
    for &(left, apex) in fingers {
        fill(left, left + FINGER_WIDTH, apex + TIP_HEIGHT, 120);
        for y in apex..=apex + TIP_HEIGHT {
            let half = y - apex;
            fill(left + TIP_HEIGHT - half, left + TIP_HEIGHT + half, y, y);
        }
    }
    mask
}

/// Outline vertices walked right to left across the fingers, expanded to
/// unit steps.
fn trace_outline(fingers: &[(i32, i32)]) -> Vec<PointIj> {
    let mut vertices = vec![(180, 239), (180, 200), (201, 200), (201, 120)];
    let mut ordered = fingers.to_vec();
    ordered.sort_by(|a, b| b.0.cmp(&a.0));
    for (left, apex) in ordered {
        let right = left + FINGER_WIDTH;
        vertices.extend([
            (right, 120),
            (right, apex + TIP_HEIGHT),
            (left + TIP_HEIGHT, apex),
            (left, apex + TIP_HEIGHT),
            (left, 120),
        ]);
    }
    vertices.extend([(105, 120), (105, 200), (130, 200), (130, 239)]);

    let mut points: Vec<PointIj> = Vec::new();
    for (i, &(px, py)) in vertices.iter().enumerate() {
        let (qx, qy) = vertices[(i + 1) % vertices.len()];
        let (dx, dy) = (qx - px, qy - py);
        let steps = dx.abs().max(dy.abs());
        for k in 0..steps {
            let p = PointIj::new(px + dx.signum() * k, py + dy.signum() * k);
            if points.last() != Some(&p) {
                points.push(p);
            }
        }
    }
    if points.len() > 1 && points.first() == points.last() {
        points.pop();
    }
    points
}

fn cross(o: PointIj, a: PointIj, b: PointIj) -> i64 {
    ((a.x - o.x) as i64) * ((b.y - o.y) as i64) - ((a.y - o.y) as i64) * ((b.x - o.x) as i64)
}

/// Monotone-chain hull, returned as ascending contour indices.
pub fn hull_indices(contour: &[PointIj]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..contour.len()).collect();
    order.sort_by_key(|&i| (contour[i].x, contour[i].y, i));
    let chain = |iter: &mut dyn Iterator<Item = usize>| {
        let mut out: Vec<usize> = Vec::new();
        for i in iter {
            while out.len() >= 2
                && cross(contour[out[out.len() - 2]], contour[out[out.len() - 1]], contour[i]) <= 0
            {
                out.pop();
            }
            out.push(i);
        }
        out.pop();
        out
    };
    let mut hull = chain(&mut order.iter().copied());
    hull.extend(chain(&mut order.iter().rev().copied()));
    hull.sort_unstable();
    hull.dedup();
    hull
}

/// Deepest contour point between consecutive hull vertices.
pub fn convexity_defects(contour: &[PointIj], hull: &[usize], min_depth: f32) -> Vec<ConvexityDefect> {
    let n = contour.len();
    let mut out = Vec::new();
    for k in 0..hull.len() {
        let (start, end) = (hull[k], hull[(k + 1) % hull.len()]);
        let (a, b) = (contour[start], contour[end]);
        let (ex, ey) = ((b.x - a.x) as f32, (b.y - a.y) as f32);
        let len = (ex * ex + ey * ey).sqrt();
        let mut best: Option<(usize, f32)> = None;
        let mut i = (start + 1) % n;
        while i != end {
            let p = contour[i];
            let d = if len > 0.0 {
                (ex * (a.y - p.y) as f32 - (a.x - p.x) as f32 * ey).abs() / len
            } else {
                0.0
            };
            if best.map_or(true, |(_, bd)| d > bd) {
                best = Some((i, d));
            }
            i = (i + 1) % n;
        }
        if let Some((far, depth)) = best.filter(|&(_, d)| d >= min_depth) {
            out.push(ConvexityDefect {
                start,
                end,
                far,
                depth,
            });
        }
    }
    out
}
