#![doc = include_str!("../README.md")]

// Public modules (stable-ish surface)
pub mod classifier;
pub mod config;
pub mod detector;
pub mod diagnostics;
pub mod features;
pub mod image;
pub mod planes;
pub mod types;

// Geometry helpers shared by the stages.
pub mod angle;
pub mod contour;

// --- High-level re-exports -------------------------------------------------

// Main entry points: detector + results.
pub use crate::detector::{HandDetector, HandInput, HandObserver, HandParams};
pub use crate::types::{HandResult, Rejection};

// Classifier seam and the stock ensemble.
pub use crate::classifier::{ClassifierError, HandClassifier, SvrEnsemble};

// Diagnostics returned by `HandDetector::detect_with_diagnostics`.
pub use crate::diagnostics::{DetectionReport, DetectionTrace, TraceRecorder};

pub use crate::features::extract_hand_features;
pub use crate::planes::{PlaneContact, PlaneEquation};

// --- Prelude ---------------------------------------------------------------

/// Small prelude for quick experiments.
///
/// ```no_run
/// use hand_detector::prelude::*;
///
/// # fn main() {
/// let depth = XyzImage::new(160, 120);
/// let cluster = Cluster::default();
/// let geometry = ContourGeometry::new(Vec::new(), Vec::new(), Vec::new());
///
/// let detector = HandDetector::new(HandParams::default());
/// let input = HandInput::new(&cluster, &depth, PointIj::new(0, 0), (320, 240), &geometry);
/// let hand = detector.detect(&input);
/// println!("hand={} rejection={:?}", hand.is_hand, hand.rejection);
/// # }
/// ```
pub mod prelude {
    pub use crate::image::XyzImage;
    pub use crate::types::{Cluster, ContourGeometry, ConvexityDefect, PointIj, PointXyz};
    pub use crate::{HandDetector, HandInput, HandParams, HandResult};
}
