//! Convexity-defect ordering and fingertip candidate generation.
//!
//! Defects are visited counter-clockwise (on screen) around the palm center,
//! starting from straight down. Each defect that survives the wrist mask and
//! the distance tests is "good"; narrow good defects propose their hull
//! endpoints as fingertip candidates, paired with the far point.

use super::params::HandParams;
use crate::angle::{angle_between_points, ccw_angle_from_bottom};
use crate::contour::Contour;
use crate::image::DepthWindow;
use crate::types::{ConvexityDefect, PointIj, PointXyz, WristPair};
use log::trace;
use serde::Serialize;
use std::cmp::Ordering;

/// Angular sort keys for the far points of a defect list.
///
/// Keys are indexed by contour position; only far indices are populated.
#[derive(Clone, Debug, Default)]
pub struct SlopeTable {
    keys: Vec<f64>,
}

impl SlopeTable {
    pub fn new(contour: &Contour, defects: &[ConvexityDefect], center: PointIj) -> Self {
        let mut keys = vec![0.0; contour.len()];
        for d in defects {
            if let Some(slot) = keys.get_mut(d.far) {
                let p = contour.get(d.far);
                *slot = ccw_angle_from_bottom(PointIj::new(p.x - center.x, p.y - center.y));
            }
        }
        Self { keys }
    }

    #[inline]
    pub fn key(&self, idx: usize) -> f64 {
        self.keys.get(idx).copied().unwrap_or(0.0)
    }
}

/// Orders defects by the angular key of their far point.
pub fn cmp_by_slope(table: &SlopeTable, a: &ConvexityDefect, b: &ConvexityDefect) -> Ordering {
    table.key(a.far).total_cmp(&table.key(b.far))
}

/// Stable sort of `defects` counter-clockwise around `center`.
pub fn order_defects(
    contour: &Contour,
    defects: &[ConvexityDefect],
    center: PointIj,
) -> Vec<ConvexityDefect> {
    let table = SlopeTable::new(contour, defects, center);
    let mut ordered = defects.to_vec();
    ordered.sort_by(|a, b| cmp_by_slope(&table, a, b));
    ordered
}

/// True when contour index `far` lies on the arc between the wrist points
/// that runs through the arm.
pub fn on_wrist_arc(far: usize, wrist: &WristPair) -> bool {
    let (wl, wr) = (wrist.left_index, wrist.right_index);
    if wrist.direction == -1 {
        if wl <= wr {
            far >= wl && far <= wr
        } else {
            far <= wr || far >= wl
        }
    } else if wl <= wr {
        far <= wl || far >= wr
    } else {
        far >= wr && far <= wl
    }
}

/// Fingertip candidate: contour indices of the tip and its defect.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct FingerCandidate {
    pub tip_index: usize,
    pub defect_index: usize,
}

/// Output of [`generate_candidates`].
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct CandidateSet {
    pub candidates: Vec<FingerCandidate>,
    /// Defects passing the distance tests, in visiting order.
    pub good_defects: Vec<ConvexityDefect>,
}

struct SnappedDefect {
    start: PointIj,
    end: PointIj,
    far: PointIj,
    start_xyz: PointXyz,
    end_xyz: PointXyz,
    far_xyz: PointXyz,
}

fn snap_defect(
    contour: &Contour,
    defect: &ConvexityDefect,
    window: &DepthWindow<'_>,
    average_size: i32,
) -> Option<SnappedDefect> {
    let start = window.snap(contour.get(defect.start), None);
    let end = window.snap(contour.get(defect.end), None);
    let far = window.snap(contour.get(defect.far), None);
    if !(window.in_window(start) && window.in_window(end) && window.in_window(far)) {
        return None;
    }
    Some(SnappedDefect {
        start,
        end,
        far,
        start_xyz: window.average(start, average_size),
        end_xyz: window.average(end, average_size),
        far_xyz: window.average(far, average_size),
    })
}

/// Walk the ordered defects and emit fingertip candidates.
pub fn generate_candidates(
    contour: &Contour,
    ordered: &[ConvexityDefect],
    palm_xyz: &PointXyz,
    wrist: &WristPair,
    window: &DepthWindow<'_>,
    params: &HandParams,
) -> CandidateSet {
    let mut out = CandidateSet::default();
    let mut last_end: Option<PointXyz> = None;
    // cleared once a start candidate has been pushed
    let mut first = true;
    let n = contour.len();

    for defect in ordered {
        if defect.start >= n || defect.end >= n || defect.far >= n {
            trace!("generate_candidates: defect {defect:?} indexes past the contour");
            continue;
        }
        if on_wrist_arc(defect.far, wrist) {
            trace!("generate_candidates: far {} under the wrist", defect.far);
            continue;
        }
        let Some(s) = snap_defect(contour, defect, window, params.xyz_average_size) else {
            trace!("generate_candidates: defect {defect:?} outside the window");
            continue;
        };

        let far_center = (s.far_xyz - palm_xyz).norm() as f64;
        let start_end = (s.start_xyz - s.end_xyz).norm() as f64;
        if far_center < params.defect_far_center_min_dist
            || far_center > params.defect_far_center_max_dist
            || start_end <= params.defect_start_end_min_dist
        {
            trace!(
                "generate_candidates: far {} rejected (far-center {far_center:.4}, start-end {start_end:.4})",
                defect.far
            );
            continue;
        }
        out.good_defects.push(*defect);

        let angle = angle_between_points(s.start, s.end, s.far);
        if angle > params.defect_max_angle {
            trace!("generate_candidates: far {} too wide ({angle:.3} rad)", defect.far);
            continue;
        }

        let (bottom, side) = (params.bottom_edge_thresh, params.side_edge_thresh);
        let separated = first
            || last_end.map_or(true, |e| (e - s.start_xyz).norm() as f64 > params.defect_min_dist);
        if !window.on_border(s.start, bottom, side) && separated {
            out.candidates.push(FingerCandidate {
                tip_index: defect.start,
                defect_index: defect.far,
            });
            first = false;
        }
        if !window.on_border(s.end, bottom, side) {
            out.candidates.push(FingerCandidate {
                tip_index: defect.end,
                defect_index: defect.far,
            });
        }
        last_end = Some(s.end_xyz);
    }
    out
}
