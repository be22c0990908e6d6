//! Hand classifier gating accepted geometry.
//!
//! Modules
//! - `error`: `ClassifierError` and the local `Result` alias.
//! - `ensemble`: finger-count bucketed ensemble over any `BucketModel`.
//! - `svr`: RBF ε-SVR bucket model loaded from JSON.
//! - `evaluate`: accuracy report over labelled feature vectors.
//!
//! Feature vectors start with the finger count (see
//! [`crate::features::extract_hand_features`]); the remaining entries are the
//! model input.

pub mod ensemble;
pub mod error;
pub mod evaluate;
pub mod svr;

pub use self::ensemble::{BucketEnsemble, BucketModel};
pub use self::error::ClassifierError;
pub use self::evaluate::{evaluate, BucketAccuracy, EvaluationReport, LabeledSample};
pub use self::svr::{SvrEnsemble, SvrModel, DEFAULT_BUCKETS};

/// Confidence scorer consulted by the acceptance gate.
///
/// Implementations are shared read-only across threads.
pub trait HandClassifier: Send + Sync {
    fn is_trained(&self) -> bool;

    /// Confidence in [0, 1] that `features` describe a hand.
    fn classify(&self, features: &[f64]) -> Result<f64, ClassifierError>;
}

/// Model bucket for a finger count: `min(fingers − 1, buckets − 1)`.
/// Counts below one map to bucket 0.
#[inline]
pub fn bucket_index(fingers: usize, buckets: usize) -> usize {
    fingers.saturating_sub(1).min(buckets.saturating_sub(1))
}
