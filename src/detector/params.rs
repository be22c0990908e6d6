//! Parameter types configuring the hand detector stages.
//!
//! All distances are metric (metres) unless the field name says pixels or
//! rows. Angles are radians; slopes are `dy / |dx|` in image space, so a
//! positive slope means the first point sits above the second.
//!
//! Defaults are tuned for a short-range depth camera at roughly 320×240 to
//! 640×480. For tuning, start with the wrist window and the finger length
//! bounds.

use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Detector-wide parameters controlling the multi-stage pipeline.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HandParams {
    /// Box size (pixels) used when averaging xyz around a point. Default 9.
    pub xyz_average_size: i32,
    /// Height (pixels) of the bottom frame margin. Default 10.
    pub bottom_edge_thresh: i32,
    /// Width (pixels) of the left/right frame margins. Default 10.
    pub side_edge_thresh: i32,

    /// Minimum cluster surface area (m²). Default 0.01.
    pub hand_min_area: f64,
    /// Maximum cluster surface area (m²). Default 0.056.
    pub hand_max_area: f64,
    /// Reject clusters that touch neither side of the frame. Default false.
    pub hand_require_edge_connected: bool,
    /// Fraction of the frame height below which edge contacts count. Default 0.5.
    pub hand_edge_connect_max_y: f64,

    /// Gate accepted hands through the classifier when it is trained. Default true.
    pub hand_use_svm: bool,
    /// Minimum classifier confidence. Default 0.45.
    pub hand_svm_confidence_thresh: f64,

    /// Maximum distance of the palm center from the top point. Default 0.155.
    pub center_max_dist_from_top: f64,
    /// Sampling stride (pixels) of the inscribed-circle search. Default 2.
    pub palm_search_stride: i32,

    /// Bottom margin (pixels) for wrist contact points. Default 8.
    pub contact_bot_edge_thresh: i32,
    /// Side margin (pixels) for wrist contact points. Default 25.
    pub contact_side_edge_thresh: i32,

    /// Minimum wrist width. Default 0.030.
    pub wrist_width_min: f64,
    /// Maximum wrist width. Default 0.085.
    pub wrist_width_max: f64,
    /// A contour walk stops once within this distance of the palm center. Default 0.075.
    pub wrist_center_dist_thresh: f64,

    /// Minimum finger length. Default 0.014.
    pub finger_len_min: f64,
    /// Maximum finger length. Default 0.125.
    pub finger_len_max: f64,
    /// Fingertips closer than this are merged. Default 0.01.
    pub finger_dist_min: f64,
    /// Minimum tip-to-defect slope. Default −1.0.
    pub finger_defect_slope_min: f64,
    /// Minimum tip-to-center slope. Default −0.45.
    pub finger_center_slope_min: f64,
    /// Near-tip curvature window. Defaults 0.95 / 2.80.
    pub finger_curve_near_min: f64,
    pub finger_curve_near_max: f64,
    /// Far curvature window. Defaults 0.05 / 1.20.
    pub finger_curve_far_min: f64,
    pub finger_curve_far_max: f64,

    /// Single-finger length window. Defaults 0.04 / 0.11.
    pub single_finger_len_min: f64,
    pub single_finger_len_max: f64,
    /// Minimum hull angle at a single-finger candidate. Default 0.08.
    pub single_finger_angle_thresh: f64,
    /// Apply the curvature test to single-finger candidates. Default true.
    pub single_finger_curvature_check: bool,

    /// Defects wider than this emit no fingertip candidates. Default 0.7π.
    pub defect_max_angle: f64,
    /// Minimum gap between a start point and the previous defect's end. Default 0.02.
    pub defect_min_dist: f64,
    /// Far point distance window around the palm center. Defaults 0.01 / 0.105.
    pub defect_far_center_min_dist: f64,
    pub defect_far_center_max_dist: f64,
    /// Minimum start-to-end distance of a defect. Default 0.01.
    pub defect_start_end_min_dist: f64,
    /// Defects more than this many rows below the palm center are ignored. Default 30.
    pub defect_max_y_from_center: i32,

    /// Minimum angle at the defect between tip and palm center. Default 0.4π.
    pub centroid_defect_finger_angle_min: f64,
}

impl Default for HandParams {
    fn default() -> Self {
        Self {
            xyz_average_size: 9,
            bottom_edge_thresh: 10,
            side_edge_thresh: 10,
            hand_min_area: 0.01,
            hand_max_area: 0.056,
            hand_require_edge_connected: false,
            hand_edge_connect_max_y: 0.5,
            hand_use_svm: true,
            hand_svm_confidence_thresh: 0.45,
            center_max_dist_from_top: 0.155,
            palm_search_stride: 2,
            contact_bot_edge_thresh: 8,
            contact_side_edge_thresh: 25,
            wrist_width_min: 0.030,
            wrist_width_max: 0.085,
            wrist_center_dist_thresh: 0.075,
            finger_len_min: 0.014,
            finger_len_max: 0.125,
            finger_dist_min: 0.01,
            finger_defect_slope_min: -1.0,
            finger_center_slope_min: -0.45,
            finger_curve_near_min: 0.95,
            finger_curve_near_max: 2.80,
            finger_curve_far_min: 0.05,
            finger_curve_far_max: 1.20,
            single_finger_len_min: 0.04,
            single_finger_len_max: 0.11,
            single_finger_angle_thresh: 0.08,
            single_finger_curvature_check: true,
            defect_max_angle: 0.7 * PI,
            defect_min_dist: 0.02,
            defect_far_center_min_dist: 0.01,
            defect_far_center_max_dist: 0.105,
            defect_start_end_min_dist: 0.01,
            defect_max_y_from_center: 30,
            centroid_defect_finger_angle_min: 0.4 * PI,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults() {
        let params: HandParams =
            serde_json::from_str(r#"{ "hand_use_svm": false, "finger_len_max": 0.2 }"#).unwrap();
        assert!(!params.hand_use_svm);
        assert_eq!(params.finger_len_max, 0.2);
        assert_eq!(params.wrist_width_min, HandParams::default().wrist_width_min);
    }
}
