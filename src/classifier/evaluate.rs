//! Accuracy report for a classifier over labelled feature vectors.

use super::error::ClassifierError;
use super::{bucket_index, HandClassifier};
use serde::{Deserialize, Serialize};

/// Decision threshold used when scoring predictions.
pub const DECISION_THRESHOLD: f64 = 0.5;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LabeledSample {
    /// Feature vector as produced by `extract_hand_features`.
    pub features: Vec<f64>,
    pub is_hand: bool,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct BucketAccuracy {
    pub samples: usize,
    pub correct: usize,
}

impl BucketAccuracy {
    pub fn accuracy(&self) -> f64 {
        if self.samples == 0 {
            0.0
        } else {
            self.correct as f64 / self.samples as f64
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct EvaluationReport {
    pub buckets: Vec<BucketAccuracy>,
    pub overall: BucketAccuracy,
    /// Samples without fingers, which no bucket covers.
    pub skipped: usize,
}

/// Score `samples` bucket by bucket. A prediction is correct when it lies on
/// the label's side of [`DECISION_THRESHOLD`]; exactly 0.5 counts as wrong.
pub fn evaluate(
    classifier: &dyn HandClassifier,
    samples: &[LabeledSample],
    buckets: usize,
) -> Result<EvaluationReport, ClassifierError> {
    let mut report = EvaluationReport {
        buckets: vec![BucketAccuracy::default(); buckets.max(1)],
        ..EvaluationReport::default()
    };
    for sample in samples {
        let count = sample.features.first().copied().unwrap_or(0.0);
        if !(count >= 1.0) {
            report.skipped += 1;
            continue;
        }
        let score = classifier.classify(&sample.features)?;
        let correct = if sample.is_hand {
            score > DECISION_THRESHOLD
        } else {
            score < DECISION_THRESHOLD
        };
        let bucket = &mut report.buckets[bucket_index(count as usize, buckets.max(1))];
        bucket.samples += 1;
        report.overall.samples += 1;
        if correct {
            bucket.correct += 1;
            report.overall.correct += 1;
        }
    }
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Scores the second feature directly.
    struct Passthrough;

    impl HandClassifier for Passthrough {
        fn is_trained(&self) -> bool {
            true
        }
        fn classify(&self, features: &[f64]) -> Result<f64, ClassifierError> {
            Ok(features.get(1).copied().unwrap_or(0.0))
        }
    }

    fn sample(fingers: f64, score: f64, is_hand: bool) -> LabeledSample {
        LabeledSample {
            features: vec![fingers, score],
            is_hand,
        }
    }

    #[test]
    fn report_counts_per_bucket() {
        let samples = [
            sample(1.0, 0.9, true),
            sample(1.0, 0.2, true),
            sample(3.0, 0.1, false),
            sample(5.0, 0.5, false),
            sample(0.0, 0.9, true),
        ];
        let report = evaluate(&Passthrough, &samples, 4).unwrap();
        assert_eq!(report.skipped, 1);
        assert_eq!(report.buckets[0], BucketAccuracy { samples: 2, correct: 1 });
        assert_eq!(report.buckets[2], BucketAccuracy { samples: 1, correct: 1 });
        assert_eq!(report.buckets[3], BucketAccuracy { samples: 1, correct: 0 });
        assert_eq!(report.overall, BucketAccuracy { samples: 4, correct: 2 });
        assert!((report.overall.accuracy() - 0.5).abs() < 1e-12);
    }
}
