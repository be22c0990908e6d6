//! Fixed-schema feature vector describing a detected hand.
//!
//! Layout:
//! - `[0]` finger count (the vector ends here when it is zero);
//! - [`SCALAR_FEATURES`] whole-hand scalars;
//! - per finger, longest first, [`FINGER_FEATURES`] values, plus
//!   [`NEIGHBOUR_FEATURES`] more when the hand has several fingers.
//!
//! Scale factors keep every entry roughly within [0, 2] for a hand at arm's
//! length, which is what the bucket models were fitted on.
//!
//! Model compatibility: upstream pretrained models were fitted on 12 scalars,
//! with the standard deviation of the radial distance (×25) between the mean
//! radial distance and the surface area. This layout omits that entry, so
//! those models need retraining (or a shifted input) before they apply here.
//!
//! Radial and depth statistics are taken over every valid sample of the
//! depth window, which must hold only the cluster's samples.

use crate::angle::{angle_between_3d, angle_between_points, polar_angle};
use crate::contour::{polygon_arc_length, polygon_area, Contour};
use crate::image::XyzImage;
use crate::types::{HandResult, PointIj, PointXyz};
use std::cmp::Ordering;
use std::f64::consts::PI;

pub const SCALAR_FEATURES: usize = 11;
pub const FINGER_FEATURES: usize = 7;
pub const NEIGHBOUR_FEATURES: usize = 4;

/// Averaging box for the diameter endpoints.
const DIAMETER_AVERAGE_SIZE: i32 = 10;

/// Expected feature vector length for a hand with `fingers` fingers.
pub fn feature_len(fingers: usize) -> usize {
    match fingers {
        0 => 1,
        1 => 1 + SCALAR_FEATURES + FINGER_FEATURES,
        n => 1 + SCALAR_FEATURES + n * (FINGER_FEATURES + NEIGHBOUR_FEATURES),
    }
}

/// Build the feature vector of `hand`.
///
/// `depth` is the cluster's depth window (only cluster samples carry depth,
/// see [`XyzImage::from_cluster`]); full-frame pixels map into it as
/// `(p − offset) × scale`. `full_width` seeds the nearest-neighbour minima.
pub fn extract_hand_features(
    hand: &HandResult,
    depth: &XyzImage,
    offset: PointIj,
    scale: f64,
    full_width: i32,
) -> Vec<f64> {
    let n = hand.fingers.len();
    let mut out = Vec::with_capacity(feature_len(n));
    out.push(n as f64);
    if n == 0 {
        return out;
    }

    let center = hand.palm_center().unwrap_or_else(PointXyz::zeros);
    let center_ij = hand.palm_center_ij().unwrap_or(offset);
    let [wrist_l, wrist_r] = hand.wrist_xyz().unwrap_or([PointXyz::zeros(); 2]);
    let to_window = |p: PointIj| {
        PointIj::new(
            ((p.x - offset.x) as f64 * scale).round() as i32,
            ((p.y - offset.y) as f64 * scale).round() as i32,
        )
    };

    let spread = radial_spread(depth, &center);
    out.push(spread.mean_dist * 20.0);
    out.push(hand.surface_area * 10.0);
    out.push(spread.depth_std * 25.0);

    let contour_area = polygon_area(&hand.contour);
    out.push(contour_area / polygon_area(&hand.hull));
    out.push(contour_area / hand.bounds.area());
    out.push(polygon_arc_length(&hand.contour) / polygon_arc_length(&hand.hull) * 0.5);

    let contour = Contour::new(hand.contour.clone());
    match contour.diameter() {
        Some((a, b, diam)) => {
            out.push(hand.circle_radius() / diam * 2.0);
            let pa = depth.average_around_point(to_window(contour.get(a)), DIAMETER_AVERAGE_SIZE);
            let pb = depth.average_around_point(to_window(contour.get(b)), DIAMETER_AVERAGE_SIZE);
            out.push(dist(&pa, &pb));
        }
        None => {
            out.push(f64::NAN);
            out.push(0.0);
        }
    }

    out.push(dist(&wrist_l, &wrist_r));
    let mid_wrist = wrist_l + (wrist_r - wrist_l) / 2.0;
    let lengths: Vec<f64> = hand.fingers.iter().map(|f| f.length()).collect();
    out.push(lengths.iter().sum::<f64>() / n as f64 * 5.0);
    out.push(hand.fingers.iter().map(|f| dist(&f.tip_xyz, &mid_wrist)).sum::<f64>() / n as f64 * 2.0);

    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&a, &b| {
        lengths[b]
            .partial_cmp(&lengths[a])
            .unwrap_or(Ordering::Equal)
            .then(a.cmp(&b))
    });

    for &j in &order {
        let f = &hand.fingers[j];
        out.push(dist(&f.tip_xyz, &f.defect_xyz) * 5.0);
        out.push(dist(&f.defect_xyz, &center) * 5.0);
        out.push(dist(&f.tip_xyz, &center) * 5.0);
        out.push(angle_between_3d(&f.defect_xyz, &center, &f.tip_xyz) / PI);
        // measured at the defect, like the finger filter's angle test
        out.push(angle_between_points(f.tip_ij, center_ij, f.defect_ij) / PI);
        out.push(polar_angle(f.tip_ij - center_ij.coords));
        out.push(polar_angle(f.defect_ij - center_ij.coords));

        if n > 1 {
            let mut min_tip = full_width as f64;
            let mut max_tip = 0.0f64;
            let mut min_defect = full_width as f64;
            let mut max_defect = 0.0f64;
            for (k, other) in hand.fingers.iter().enumerate() {
                if k == j {
                    continue;
                }
                let dt = dist(&f.tip_xyz, &other.tip_xyz);
                let dd = dist(&f.defect_xyz, &other.defect_xyz);
                min_tip = min_tip.min(dt);
                max_tip = max_tip.max(dt);
                min_defect = min_defect.min(dd);
                max_defect = max_defect.max(dd);
            }
            out.extend([min_tip * 5.0, max_tip * 5.0, min_defect * 5.0, max_defect * 5.0]);
        }
    }

    sanitize(&mut out);
    out
}

/// Replace NaN and −∞ with 1.0, and values ≥ `f32::MAX` with 100.0.
pub fn sanitize(values: &mut [f64]) {
    for v in values.iter_mut() {
        if v.is_nan() {
            *v = 1.0;
        } else if *v >= f32::MAX as f64 {
            *v = 100.0;
        } else if v.is_infinite() {
            *v = 1.0;
        }
    }
}

struct RadialSpread {
    mean_dist: f64,
    depth_std: f64,
}

/// Mean planar distance of the window's samples to `center`, and the
/// standard deviation of their depth.
fn radial_spread(depth: &XyzImage, center: &PointXyz) -> RadialSpread {
    let (mut sum_d, mut sum_z, mut count) = (0.0f64, 0.0f64, 0usize);
    for (_, p) in depth.valid_samples() {
        sum_d += planar_dist(&p, center);
        sum_z += p.z as f64;
        count += 1;
    }
    if count == 0 {
        return RadialSpread {
            mean_dist: 1.0,
            depth_std: 0.0,
        };
    }
    let mean_z = sum_z / count as f64;
    let var_z = depth
        .valid_samples()
        .map(|(_, p)| (p.z as f64 - mean_z).powi(2))
        .sum::<f64>()
        / count as f64;
    RadialSpread {
        mean_dist: sum_d / count as f64,
        depth_std: var_z.sqrt(),
    }
}

#[inline]
fn planar_dist(a: &PointXyz, b: &PointXyz) -> f64 {
    let dx = (a.x - b.x) as f64;
    let dy = (a.y - b.y) as f64;
    (dx * dx + dy * dy).sqrt()
}

#[inline]
fn dist(a: &PointXyz, b: &PointXyz) -> f64 {
    (a - b).norm() as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lengths_follow_finger_count() {
        assert_eq!(feature_len(0), 1);
        assert_eq!(feature_len(1), 19);
        assert_eq!(feature_len(2), 34);
        assert_eq!(feature_len(5), 67);
    }

    #[test]
    fn no_fingers_yields_count_only() {
        let hand = HandResult::default();
        let depth = XyzImage::new(4, 4);
        assert_eq!(extract_hand_features(&hand, &depth, PointIj::new(0, 0), 1.0, 320), vec![0.0]);
    }

    #[test]
    fn sanitize_replaces_non_finite_values() {
        let mut v = [f64::NAN, f64::INFINITY, 1e39, 0.25, f64::NEG_INFINITY];
        sanitize(&mut v);
        assert_eq!(v, [1.0, 100.0, 100.0, 0.25, 1.0]);
    }
}
