//! Detector pipeline deciding whether a cluster is a hand.
//!
//! The [`HandDetector`] exposes a simple API: feed a cluster, its depth
//! window and its precomputed contour geometry, and get a [`HandResult`]
//! with landmarks and, on rejection, the reason.
//!
//! Typical usage:
//! ```no_run
//! use hand_detector::{HandDetector, HandInput, HandParams};
//! use hand_detector::image::XyzImage;
//! use hand_detector::types::{Cluster, ContourGeometry, PointIj};
//!
//! # fn example(cluster: Cluster, depth: XyzImage, geometry: ContourGeometry) {
//! let detector = HandDetector::new(HandParams::default());
//! let input = HandInput::new(&cluster, &depth, PointIj::new(0, 0), (640, 480), &geometry);
//! let hand = detector.detect(&input);
//! if hand.is_hand {
//!     println!("fingers: {}", hand.num_fingers());
//! }
//! # }
//! ```

// Stages
// - Edges: bottom/side sweeps of the depth window.
// - Gates: surface area, edge connection, contour size.
// - Palm: largest inscribed circle near the top point.
// - Wrist: contour walks from the frame contacts, then the width gate.
// - Defects: angular ordering, wrist mask, candidate emission.
// - Fingers: geometric filter, dedup, single-finger fallback.
// - Acceptance: finger count, then the classifier when one is trained.

use super::defects::{generate_candidates, order_defects};
use super::edges::detect_edge_contact;
use super::fingers::{dedup_fingers, filter_candidates};
use super::observer::{HandObserver, NoopObserver};
use super::palm::locate_palm;
use super::params::HandParams;
use super::single_finger::single_finger_fallback;
use super::wrist::{check_wrist_width, locate_wrist};
use crate::classifier::HandClassifier;
use crate::features::extract_hand_features;
use crate::image::{DepthWindow, XyzImage};
use crate::types::{Cluster, ContourGeometry, HandResult, PointIj, Rejection};
use log::{debug, warn};
use rayon::prelude::*;
use std::sync::Arc;

/// Most fingers an accepted hand may show.
pub const MAX_FINGERS: usize = 6;

/// One cluster to evaluate, with the geometry computed upstream.
#[derive(Clone, Copy, Debug)]
pub struct HandInput<'a> {
    pub cluster: &'a Cluster,
    /// Depth window cropped around the cluster. Only the cluster's own
    /// samples may carry depth; every other pixel must have `z == 0`, since
    /// surface area and the radial feature statistics read the whole window.
    /// [`XyzImage::from_cluster`] builds such a window.
    pub depth: &'a XyzImage,
    /// Full-frame pixel of the window's origin.
    pub top_left: PointIj,
    /// Full frame `(width, height)`.
    pub full_size: (i32, i32),
    pub geometry: &'a ContourGeometry,
}

impl<'a> HandInput<'a> {
    pub fn new(
        cluster: &'a Cluster,
        depth: &'a XyzImage,
        top_left: PointIj,
        full_size: (i32, i32),
        geometry: &'a ContourGeometry,
    ) -> Self {
        Self {
            cluster,
            depth,
            top_left,
            full_size,
            geometry,
        }
    }

    fn window(&self) -> DepthWindow<'a> {
        DepthWindow::new(self.depth, self.top_left, self.full_size.0, self.full_size.1)
    }
}

/// Hand detector holding the thresholds and an optional shared classifier.
#[derive(Clone)]
pub struct HandDetector {
    params: HandParams,
    classifier: Option<Arc<dyn HandClassifier>>,
}

impl HandDetector {
    /// Create a detector with the supplied parameters and no classifier.
    pub fn new(params: HandParams) -> Self {
        Self {
            params,
            classifier: None,
        }
    }

    /// Attach a classifier consulted by the acceptance gate.
    pub fn with_classifier(mut self, classifier: Arc<dyn HandClassifier>) -> Self {
        self.classifier = Some(classifier);
        self
    }

    pub fn params(&self) -> &HandParams {
        &self.params
    }

    /// Replace the detector thresholds.
    pub fn set_params(&mut self, params: HandParams) {
        self.params = params;
    }

    pub fn classifier(&self) -> Option<&Arc<dyn HandClassifier>> {
        self.classifier.as_ref()
    }

    /// Evaluate one cluster.
    pub fn detect(&self, input: &HandInput<'_>) -> HandResult {
        self.detect_with_observer(input, &mut NoopObserver)
    }

    /// Evaluate many clusters in parallel; results keep the input order.
    pub fn detect_batch(&self, inputs: &[HandInput<'_>]) -> Vec<HandResult> {
        inputs.par_iter().map(|input| self.detect(input)).collect()
    }

    /// Evaluate one cluster, reporting every stage to `observer`.
    pub fn detect_with_observer(
        &self,
        input: &HandInput<'_>,
        observer: &mut dyn HandObserver,
    ) -> HandResult {
        let params = &self.params;
        let geometry = input.geometry;
        let contour = &geometry.contour;
        let window = input.window();
        let mut result = HandResult {
            contour: contour.points().to_vec(),
            hull: geometry.hull_points(),
            bounds: geometry.bounds,
            ..HandResult::default()
        };

        let Some(top) = input.cluster.top_point() else {
            debug!("HandDetector::detect empty cluster");
            return reject(result, Rejection::EmptyCluster, observer);
        };
        observer.on_geometry(geometry);

        result.edges = detect_edge_contact(&window, params);
        result.surface_area = input.depth.surface_area();
        observer.on_edges(result.edges, result.surface_area);
        if result.surface_area < params.hand_min_area || result.surface_area > params.hand_max_area {
            debug!(
                "HandDetector::detect surface area {:.5} outside [{}, {}]",
                result.surface_area, params.hand_min_area, params.hand_max_area
            );
            return reject(result, Rejection::SurfaceArea, observer);
        }
        if params.hand_require_edge_connected && !result.edges.any() {
            debug!("HandDetector::detect cluster not connected to a frame edge");
            return reject(result, Rejection::NotEdgeConnected, observer);
        }
        if contour.len() < 3 {
            debug!("HandDetector::detect contour has {} points", contour.len());
            return reject(result, Rejection::DegenerateContour, observer);
        }

        let Some(palm) = locate_palm(contour, top, &geometry.bounds, &window, params) else {
            return reject(result, Rejection::DegenerateContour, observer);
        };
        result.palm = Some(palm);
        observer.on_palm(&palm);

        let wrist = match locate_wrist(contour, &palm.center_xyz, result.edges, &window, params) {
            Ok(wrist) => wrist,
            Err(reason) => {
                debug!("HandDetector::detect wrist not found");
                return reject(result, reason, observer);
            }
        };
        result.wrist = Some(wrist);
        observer.on_wrist(&wrist);
        if let Err(reason) = check_wrist_width(&wrist, params) {
            debug!("HandDetector::detect wrist width {:.4} out of range", wrist.width());
            return reject(result, reason, observer);
        }

        let ordered = order_defects(contour, &geometry.defects, palm.center_ij);
        let candidates =
            generate_candidates(contour, &ordered, &palm.center_xyz, &wrist, &window, params);
        observer.on_candidates(&candidates);

        let filtered = filter_candidates(contour, &candidates.candidates, &palm, &window, params);
        let mut fingers = dedup_fingers(filtered, params.finger_dist_min);
        if fingers.len() <= 1 {
            fingers = single_finger_fallback(
                contour,
                &geometry.hull,
                &palm,
                &candidates.good_defects,
                &window,
                params,
            )
            .into_iter()
            .collect();
        }
        debug!(
            "HandDetector::detect defects={} good={} candidates={} fingers={}",
            geometry.defects.len(),
            candidates.good_defects.len(),
            candidates.candidates.len(),
            fingers.len()
        );
        observer.on_fingers(&fingers);
        result.good_defects = candidates.good_defects;
        result.fingers = fingers;

        if result.fingers.is_empty() {
            return reject(result, Rejection::NoFingers, observer);
        }
        if result.fingers.len() > MAX_FINGERS {
            return reject(result, Rejection::TooManyFingers, observer);
        }

        if let Some(classifier) = self.classifier.as_ref().filter(|c| params.hand_use_svm && c.is_trained()) {
            let features = extract_hand_features(
                &result,
                input.depth,
                input.top_left,
                1.0,
                input.full_size.0,
            );
            match classifier.classify(&features) {
                Ok(confidence) => {
                    result.confidence = Some(confidence);
                    if confidence < params.hand_svm_confidence_thresh {
                        debug!(
                            "HandDetector::detect confidence {confidence:.3} below {}",
                            params.hand_svm_confidence_thresh
                        );
                        return reject(result, Rejection::LowConfidence, observer);
                    }
                }
                Err(e) => {
                    warn!("HandDetector::detect classifier failed: {e}");
                    return reject(result, Rejection::Classifier, observer);
                }
            }
        }

        result.is_hand = true;
        result
    }
}

fn reject(mut result: HandResult, reason: Rejection, observer: &mut dyn HandObserver) -> HandResult {
    debug!("HandDetector::detect rejected: {reason:?}");
    result.is_hand = false;
    result.rejection = Some(reason);
    observer.on_rejected(reason);
    result
}
