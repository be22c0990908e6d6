//! Serializable trace of a detection run.
//!
//! [`TraceRecorder`] implements [`HandObserver`] and collects what each
//! stage saw. [`HandDetector::detect_with_diagnostics`] wires it up and pairs
//! the trace with the result in a [`DetectionReport`].

use crate::detector::defects::{CandidateSet, FingerCandidate};
use crate::detector::{HandDetector, HandInput, HandObserver};
use crate::image::io::write_json_file;
use crate::types::{
    ContourGeometry, ConvexityDefect, EdgeContact, Finger, HandResult, PalmCircle, Rect,
    Rejection, WristPair,
};
use serde::Serialize;
use std::path::Path;

#[derive(Clone, Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GeometryStage {
    pub contour_points: usize,
    pub hull_points: usize,
    pub defects: usize,
    pub bounds: Rect,
}

#[derive(Clone, Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DetectionTrace {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub geometry: Option<GeometryStage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub edges: Option<EdgeContact>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub surface_area: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub palm: Option<PalmCircle>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wrist: Option<WristPair>,
    pub good_defects: Vec<ConvexityDefect>,
    pub candidates: Vec<FingerCandidate>,
    pub fingers: Vec<Finger>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rejection: Option<Rejection>,
}

impl DetectionTrace {
    /// Stages that ran, in pipeline order, as a compact one-line summary.
    pub fn summary(&self) -> String {
        let opt = |v: Option<f64>| v.map_or_else(|| "-".to_string(), |v| format!("{v:.4}"));
        format!(
            "area={} palm_r={} wrist_w={} good={} cand={} fingers={} rejection={:?}",
            opt(self.surface_area),
            opt(self.palm.map(|p| p.radius)),
            opt(self.wrist.map(|w| w.width())),
            self.good_defects.len(),
            self.candidates.len(),
            self.fingers.len(),
            self.rejection
        )
    }
}

/// Observer filling a [`DetectionTrace`].
#[derive(Clone, Debug, Default)]
pub struct TraceRecorder {
    pub trace: DetectionTrace,
}

impl TraceRecorder {
    pub fn into_trace(self) -> DetectionTrace {
        self.trace
    }
}

impl HandObserver for TraceRecorder {
    fn on_geometry(&mut self, geometry: &ContourGeometry) {
        self.trace.geometry = Some(GeometryStage {
            contour_points: geometry.contour.len(),
            hull_points: geometry.hull.len(),
            defects: geometry.defects.len(),
            bounds: geometry.bounds,
        });
    }

    fn on_edges(&mut self, edges: EdgeContact, surface_area: f64) {
        self.trace.edges = Some(edges);
        self.trace.surface_area = Some(surface_area);
    }

    fn on_palm(&mut self, palm: &PalmCircle) {
        self.trace.palm = Some(*palm);
    }

    fn on_wrist(&mut self, wrist: &WristPair) {
        self.trace.wrist = Some(*wrist);
    }

    fn on_candidates(&mut self, candidates: &CandidateSet) {
        self.trace.good_defects = candidates.good_defects.clone();
        self.trace.candidates = candidates.candidates.clone();
    }

    fn on_fingers(&mut self, fingers: &[Finger]) {
        self.trace.fingers = fingers.to_vec();
    }

    fn on_rejected(&mut self, reason: Rejection) {
        self.trace.rejection = Some(reason);
    }
}

/// Result produced by [`HandDetector::detect_with_diagnostics`].
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DetectionReport {
    pub hand: HandResult,
    pub trace: DetectionTrace,
}

impl DetectionReport {
    /// Pretty-print the report as JSON to `path`.
    pub fn write_json(&self, path: &Path) -> Result<(), String> {
        write_json_file(path, self)
    }
}

impl HandDetector {
    /// Evaluate one cluster and capture the per-stage trace.
    pub fn detect_with_diagnostics(&self, input: &HandInput<'_>) -> DetectionReport {
        let mut recorder = TraceRecorder::default();
        let hand = self.detect_with_observer(input, &mut recorder);
        DetectionReport {
            hand,
            trace: recorder.into_trace(),
        }
    }
}
