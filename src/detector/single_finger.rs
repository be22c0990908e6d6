//! Fallback for hands showing at most one finger.
//!
//! The defect-driven search misses a lone extended finger because it only
//! produces one narrow defect. Instead, take the hull point farthest from the
//! palm center in the upper half-plane and validate it on its own.

use super::fingers::{curvature_in_range, tip_curvature, MIN_TIP_DEFECT_ARC};
use super::params::HandParams;
use crate::angle::{angle_between_points, slope};
use crate::contour::Contour;
use crate::image::DepthWindow;
use crate::types::{ConvexityDefect, Finger, PalmCircle};
use log::trace;

/// Averaging box used when ranking hull points by distance.
const HULL_AVERAGE_SIZE: i32 = 22;
/// Averaging box used for the snapped fingertip.
const TIP_AVERAGE_SIZE: i32 = 10;
/// Hull points within this many rows of the frame bottom are ignored.
const BOTTOM_CUTOFF: i32 = 10;
/// Minimum slope from a hull point down to the palm center.
const MIN_CENTER_SLOPE: f64 = -0.1;

/// Search the hull for a single fingertip. Hull indices past the contour are
/// ignored. Returns `None` when no candidate passes the angle, border, arc,
/// curvature and length tests.
pub fn single_finger_fallback(
    contour: &Contour,
    hull: &[usize],
    palm: &PalmCircle,
    good_defects: &[ConvexityDefect],
    window: &DepthWindow<'_>,
    params: &HandParams,
) -> Option<Finger> {
    let (bottom, side) = (params.bottom_edge_thresh, params.side_edge_thresh);
    let center = palm.center_ij;
    let hull: Vec<usize> = hull.iter().copied().filter(|&i| i < contour.len()).collect();
    if hull.len() < 2 {
        return None;
    }

    let mut best: Option<(f64, usize)> = None;
    for (k, &idx) in hull.iter().enumerate() {
        let p = contour.get(idx);
        if window.on_border(p, bottom, side) {
            continue;
        }
        let dist = (window.average(p, HULL_AVERAGE_SIZE) - palm.center_xyz).norm() as f64;
        let s = slope(center.y - p.y, p.x - center.x);
        if s > MIN_CENTER_SLOPE
            && p.y < window.full_height - BOTTOM_CUTOFF
            && dist > best.map_or(0.0, |(d, _)| d)
        {
            best = Some((dist, k));
        }
    }
    let (_, k) = best?;
    let tip_index = hull[k];
    let left = contour.get(hull[(k + hull.len() - 1) % hull.len()]);
    let right = contour.get(hull[(k + 1) % hull.len()]);

    let tip_ij = window.snap(contour.get(tip_index), None);
    let tip_xyz = window.average(tip_ij, TIP_AVERAGE_SIZE);
    let angle = angle_between_points(left, right, tip_ij);
    if angle <= params.single_finger_angle_thresh
        || window.on_border(tip_ij, bottom, side)
        || good_defects.is_empty()
    {
        trace!("single_finger_fallback: candidate {tip_index} rejected (angle {angle:.3})");
        return None;
    }

    let mut nearest: Option<(f64, ConvexityDefect)> = None;
    for d in good_defects {
        let far = contour.get(d.far);
        let far_xyz = window.average(far, params.xyz_average_size);
        let dist = (far_xyz - tip_xyz).norm() as f64;
        if dist > params.single_finger_len_min && nearest.map_or(true, |(b, _)| dist < b) {
            nearest = Some((dist, *d));
        }
    }

    let (defect_ij, defect_xyz, defect_index, anchor) = match nearest {
        Some((_, d)) => {
            let far = contour.get(d.far);
            (
                window.snap(far, None),
                window.average(far, params.xyz_average_size),
                Some(d.far),
                d.far,
            )
        }
        None => (
            palm.center_ij,
            palm.center_xyz,
            None,
            contour.nearest_index(palm.center_ij)?,
        ),
    };

    let arc = contour.arc_distance(tip_index, anchor);
    if arc < MIN_TIP_DEFECT_ARC {
        trace!("single_finger_fallback: arc {arc} too short");
        return None;
    }
    if params.single_finger_curvature_check {
        let curve = tip_curvature(contour, tip_index, arc);
        if !curvature_in_range(&curve, params) {
            trace!("single_finger_fallback: curvature {curve:?} out of range");
            return None;
        }
    }

    let finger = Finger {
        tip_ij,
        tip_xyz,
        defect_ij,
        defect_xyz,
        tip_index,
        defect_index,
    };
    let length = finger.length();
    if length < params.single_finger_len_min || length > params.single_finger_len_max {
        trace!("single_finger_fallback: length {length:.4} out of range");
        return None;
    }
    Some(finger)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image::XyzImage;
    use crate::types::{PointIj, PointXyz};

    fn palm() -> PalmCircle {
        PalmCircle {
            center_ij: PointIj::new(20, 30),
            center_xyz: PointXyz::new(0.0, 0.0, 0.5),
            radius: 10.0,
        }
    }

    fn column_contour() -> Contour {
        let mut pts: Vec<PointIj> = (5..40).map(|y| PointIj::new(20, y)).collect();
        pts.extend((5..40).rev().map(|y| PointIj::new(21, y)));
        Contour::new(pts)
    }

    #[test]
    fn degenerate_hull_has_no_finger() {
        let img = XyzImage::new(4, 4);
        let win = DepthWindow::new(&img, PointIj::new(0, 0), 320, 240);
        let contour = column_contour();
        let params = HandParams::default();
        assert!(single_finger_fallback(&contour, &[0], &palm(), &[], &win, &params).is_none());
    }

    #[test]
    fn hull_indices_past_the_contour_are_ignored() {
        let img = XyzImage::new(4, 4);
        let win = DepthWindow::new(&img, PointIj::new(0, 0), 320, 240);
        let contour = column_contour();
        let params = HandParams::default();
        let hull = [0, 500, 1000];
        assert!(single_finger_fallback(&contour, &hull, &palm(), &[], &win, &params).is_none());
    }

    #[test]
    fn requires_a_good_defect() {
        let mut img = XyzImage::new(60, 60);
        for y in 0..60 {
            for x in 0..60 {
                img.set(x, y, PointXyz::new(x as f32 * 0.002, y as f32 * 0.002, 0.5));
            }
        }
        let win = DepthWindow::new(&img, PointIj::new(0, 0), 320, 240);
        let contour = column_contour();
        let hull = [0, 34, 35, 69];
        let params = HandParams::default();
        assert!(single_finger_fallback(&contour, &hull, &palm(), &[], &win, &params).is_none());
    }
}
