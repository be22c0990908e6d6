//! Stage callbacks for inspecting a detection run.
//!
//! Every method has an empty default so an observer only implements the
//! stages it cares about. Callbacks fire in pipeline order and stop at the
//! first rejection.

use super::defects::CandidateSet;
use crate::types::{ContourGeometry, EdgeContact, Finger, PalmCircle, Rejection, WristPair};

pub trait HandObserver {
    fn on_geometry(&mut self, _geometry: &ContourGeometry) {}
    fn on_edges(&mut self, _edges: EdgeContact, _surface_area: f64) {}
    fn on_palm(&mut self, _palm: &PalmCircle) {}
    fn on_wrist(&mut self, _wrist: &WristPair) {}
    fn on_candidates(&mut self, _candidates: &CandidateSet) {}
    /// Fingers after filtering, dedup and the single-finger fallback.
    fn on_fingers(&mut self, _fingers: &[Finger]) {}
    fn on_rejected(&mut self, _reason: Rejection) {}
}

/// Observer that ignores every callback.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopObserver;

impl HandObserver for NoopObserver {}
