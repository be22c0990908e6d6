//! Finger-count bucketed classifier ensemble.
//!
//! One regressor per bucket; hands with `k` fingers go to bucket
//! `min(k − 1, K − 1)`. The ensemble is trained only when every bucket is.

use super::error::ClassifierError;
use super::{bucket_index, HandClassifier};

/// A single regressor inside a [`BucketEnsemble`].
pub trait BucketModel: Send + Sync {
    fn is_trained(&self) -> bool;
    /// Number of inputs the model consumes (finger count excluded).
    fn input_width(&self) -> usize;
    /// Raw regression output for an input of exactly `input_width` values.
    fn predict(&self, input: &[f64]) -> f64;
}

#[derive(Clone, Debug)]
pub struct BucketEnsemble<M> {
    models: Vec<M>,
    trained: bool,
}

impl<M> Default for BucketEnsemble<M> {
    fn default() -> Self {
        Self {
            models: Vec::new(),
            trained: false,
        }
    }
}

impl<M: BucketModel> BucketEnsemble<M> {
    /// Ensemble over `models`, one per bucket in order.
    pub fn new(models: Vec<M>) -> Self {
        let trained = !models.is_empty() && models.iter().all(BucketModel::is_trained);
        Self { models, trained }
    }

    /// Ensemble that rejects every classification request.
    pub fn untrained() -> Self {
        Self::default()
    }

    pub fn buckets(&self) -> usize {
        self.models.len()
    }

    pub fn model(&self, bucket: usize) -> Option<&M> {
        self.models.get(bucket)
    }
}

impl<M: BucketModel> HandClassifier for BucketEnsemble<M> {
    fn is_trained(&self) -> bool {
        self.trained
    }

    fn classify(&self, features: &[f64]) -> Result<f64, ClassifierError> {
        if !self.trained {
            return Err(ClassifierError::NotTrained);
        }
        let Some((&count, rest)) = features.split_first() else {
            return Ok(0.0);
        };
        if !(count >= 1.0) {
            return Ok(0.0);
        }
        let model = &self.models[bucket_index(count as usize, self.models.len())];
        let width = model.input_width();
        let mut input: Vec<f64> = rest.iter().copied().take(width).collect();
        input.resize(width, 0.0);
        let raw = model.predict(&input);
        Ok(if raw.is_finite() { raw.clamp(0.0, 1.0) } else { 0.0 })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Returns the sum of its inputs; records nothing.
    struct SumModel {
        width: usize,
        trained: bool,
    }

    impl BucketModel for SumModel {
        fn is_trained(&self) -> bool {
            self.trained
        }
        fn input_width(&self) -> usize {
            self.width
        }
        fn predict(&self, input: &[f64]) -> f64 {
            assert_eq!(input.len(), self.width);
            input.iter().sum()
        }
    }

    fn ensemble(widths: &[usize]) -> BucketEnsemble<SumModel> {
        BucketEnsemble::new(
            widths
                .iter()
                .map(|&width| SumModel { width, trained: true })
                .collect(),
        )
    }

    #[test]
    fn untrained_ensemble_errors() {
        let e = BucketEnsemble::<SumModel>::untrained();
        assert!(!e.is_trained());
        assert!(matches!(e.classify(&[1.0, 0.5]), Err(ClassifierError::NotTrained)));

        let partial = BucketEnsemble::new(vec![
            SumModel { width: 1, trained: true },
            SumModel { width: 1, trained: false },
        ]);
        assert!(!partial.is_trained());
    }

    #[test]
    fn input_is_truncated_or_padded_to_bucket_width() {
        let e = ensemble(&[2, 3]);
        // bucket 0, width 2: 0.1 + 0.2
        let c = e.classify(&[1.0, 0.1, 0.2, 0.9]).unwrap();
        assert!((c - 0.3).abs() < 1e-12);
        // bucket 1 (saturated), padded with zeros
        let c = e.classify(&[5.0, 0.4]).unwrap();
        assert!((c - 0.4).abs() < 1e-12);
    }

    #[test]
    fn output_is_clamped() {
        let e = ensemble(&[2]);
        assert_eq!(e.classify(&[1.0, 3.0, 4.0]).unwrap(), 1.0);
        assert_eq!(e.classify(&[1.0, -3.0, 0.0]).unwrap(), 0.0);
        assert_eq!(e.classify(&[1.0, f64::NAN, 0.0]).unwrap(), 0.0);
        assert_eq!(e.classify(&[]).unwrap(), 0.0);
        assert_eq!(e.classify(&[0.0, 1.0]).unwrap(), 0.0);
    }
}
