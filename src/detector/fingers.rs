//! Multi-criteria fingertip filter and deduplication.

use super::defects::FingerCandidate;
use super::params::HandParams;
use crate::angle::{angle_between_3d, angle_between_points, slope};
use crate::contour::Contour;
use crate::image::DepthWindow;
use crate::types::{Finger, PalmCircle};
use log::trace;

/// Minimum number of contour points between a tip and its defect.
pub const MIN_TIP_DEFECT_ARC: usize = 10;

/// Chord-angle curvature around a fingertip.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Curvature {
    pub near: f64,
    /// Smaller of the mid-range and far-range curvature.
    pub far: f64,
}

/// Curvature at `tip` with offset windows scaled by the tip-to-defect `arc`.
pub fn tip_curvature(contour: &Contour, tip: usize, arc: usize) -> Curvature {
    let near_lo = (arc / 20).max(2);
    let mid_lo = (arc / 5).max(2);
    let far_lo = (arc * 9 / 10).max(2);
    let near = contour.curvature(tip, near_lo, near_lo + 4);
    let mid = contour.curvature(tip, mid_lo, mid_lo + 5);
    let far = contour.curvature(tip, far_lo, far_lo + 5);
    Curvature {
        near,
        far: mid.min(far),
    }
}

pub fn curvature_in_range(c: &Curvature, params: &HandParams) -> bool {
    (params.finger_curve_near_min..=params.finger_curve_near_max).contains(&c.near)
        && (params.finger_curve_far_min..=params.finger_curve_far_max).contains(&c.far)
}

/// Apply the geometric finger tests to every candidate, keeping the order.
pub fn filter_candidates(
    contour: &Contour,
    candidates: &[FingerCandidate],
    palm: &PalmCircle,
    window: &DepthWindow<'_>,
    params: &HandParams,
) -> Vec<Finger> {
    let center = palm.center_ij;
    let avg = params.xyz_average_size;
    let mut fingers = Vec::new();

    for cand in candidates {
        let tip_ij = contour.get(cand.tip_index);
        let defect_ij = contour.get(cand.defect_index);
        if defect_ij.y >= center.y + params.defect_max_y_from_center
            || defect_ij.y >= window.full_height - params.bottom_edge_thresh
        {
            continue;
        }

        let tip_xyz = window.average(tip_ij, avg);
        let defect_xyz = window.average(defect_ij, avg);
        let length = (tip_xyz - defect_xyz).norm() as f64;
        let defect_center = (palm.center_xyz - defect_xyz).norm() as f64;
        let defect_slope = slope(defect_ij.y - tip_ij.y, defect_ij.x - tip_ij.x);
        let center_slope = slope(center.y - tip_ij.y, center.x - tip_ij.x);
        let tip_angle_3d = angle_between_3d(&defect_xyz, &palm.center_xyz, &tip_xyz);
        let defect_angle = angle_between_points(tip_ij, center, defect_ij);

        let arc = contour.arc_distance(cand.tip_index, cand.defect_index);
        if arc < MIN_TIP_DEFECT_ARC {
            trace!("filter_candidates: tip {} arc {arc} too short", cand.tip_index);
            continue;
        }
        let curve = tip_curvature(contour, cand.tip_index, arc);

        let accepted = (params.finger_len_min..=params.finger_len_max).contains(&length)
            && defect_slope >= params.finger_defect_slope_min
            && center_slope >= params.finger_center_slope_min
            && defect_angle >= params.centroid_defect_finger_angle_min
            && tip_xyz.z != 0.0
            && curvature_in_range(&curve, params);
        trace!(
            "filter_candidates: tip {} len {length:.4} defect-center {defect_center:.4} \
             slopes {defect_slope:.3}/{center_slope:.3} angles {defect_angle:.3}/{tip_angle_3d:.3} \
             curve {:.3}/{:.3} -> {accepted}",
            cand.tip_index,
            curve.near,
            curve.far
        );
        if accepted {
            fingers.push(Finger {
                tip_ij,
                tip_xyz,
                defect_ij,
                defect_xyz,
                tip_index: cand.tip_index,
                defect_index: Some(cand.defect_index),
            });
        }
    }
    fingers
}

/// Drop each finger that lies within `min_dist` of a finger ranking above
/// it. Finger `j` ranks above `i` when its tip row is smaller, or the rows are
/// equal and `j` comes later.
pub fn dedup_fingers(fingers: Vec<Finger>, min_dist: f64) -> Vec<Finger> {
    let keep: Vec<bool> = fingers
        .iter()
        .enumerate()
        .map(|(i, fi)| {
            !fingers.iter().enumerate().any(|(j, fj)| {
                let above = fj.tip_ij.y < fi.tip_ij.y || (fj.tip_ij.y == fi.tip_ij.y && j > i);
                above && ((fi.tip_xyz - fj.tip_xyz).norm() as f64) < min_dist
            })
        })
        .collect();
    fingers
        .into_iter()
        .zip(keep)
        .filter_map(|(f, k)| k.then_some(f))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{PointIj, PointXyz};

    fn finger(x: i32, y: i32, xyz: [f32; 3]) -> Finger {
        Finger {
            tip_ij: PointIj::new(x, y),
            tip_xyz: PointXyz::new(xyz[0], xyz[1], xyz[2]),
            defect_ij: PointIj::new(x, y + 30),
            defect_xyz: PointXyz::new(xyz[0], xyz[1] + 0.03, xyz[2]),
            tip_index: x as usize,
            defect_index: Some(0),
        }
    }

    #[test]
    fn dedup_keeps_the_upper_of_a_close_pair() {
        let fingers = vec![
            finger(100, 50, [0.0, 0.0, 0.4]),
            finger(102, 48, [0.002, -0.002, 0.4]),
            finger(140, 60, [0.04, 0.01, 0.4]),
        ];
        let kept = dedup_fingers(fingers, 0.01);
        let xs: Vec<i32> = kept.iter().map(|f| f.tip_ij.x).collect();
        assert_eq!(xs, vec![102, 140]);
    }

    #[test]
    fn dedup_breaks_row_ties_by_order() {
        let fingers = vec![finger(100, 50, [0.0, 0.0, 0.4]), finger(101, 50, [0.001, 0.0, 0.4])];
        let kept = dedup_fingers(fingers, 0.01);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].tip_ij.x, 101);
    }

    #[test]
    fn curvature_windows_scale_with_arc() {
        // a straight run has curvature pi everywhere
        let pts = (0..100).map(|x| PointIj::new(x, 0)).collect();
        let contour = Contour::new(pts);
        let c = tip_curvature(&contour, 50, 20);
        assert!((c.near - std::f64::consts::PI).abs() < 1e-9);
        assert!(!curvature_in_range(&c, &HandParams::default()));
    }
}
