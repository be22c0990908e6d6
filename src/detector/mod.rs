//! Hand detector entry point and supporting modules.
//!
//! Overview
//! - Use [`HandDetector`] with [`HandParams`] to evaluate a cluster. It
//!   returns a [`crate::types::HandResult`] with the palm circle, wrist pair,
//!   fingers and, for rejected clusters, a [`crate::types::Rejection`].
//! - The detector is `Sync`; share one instance across threads or call
//!   [`HandDetector::detect_batch`].
//!
//! Modules
//! - `params`: all thresholds with their defaults.
//! - `edges`: frame-edge connectivity sweeps.
//! - `palm`: largest inscribed circle near the top of the cluster.
//! - `wrist`: contact selection and contour walks to the wrist.
//! - `defects`: angular defect ordering and fingertip candidates.
//! - `fingers`: finger acceptance tests and deduplication.
//! - `single_finger`: hull-based search when at most one finger survives.
//! - `observer`: stage callbacks for diagnostics.
//! - `pipeline`: orchestration and the acceptance gate.

pub mod defects;
pub mod edges;
pub mod fingers;
pub mod observer;
pub mod palm;
pub mod params;
pub mod pipeline;
pub mod single_finger;
pub mod wrist;

pub use observer::{HandObserver, NoopObserver};
pub use params::HandParams;
pub use pipeline::{HandDetector, HandInput, MAX_FINGERS};
