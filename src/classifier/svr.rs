//! RBF ε-SVR bucket model.
//!
//! A model file `svm_<i>.json` holds the trained regressor for bucket `i`:
//!
//! ```json
//! { "gamma": 0.34, "rho": 0.1, "support_vectors": [[...], ...], "coefficients": [...] }
//! ```
//!
//! The prediction is `Σ coefficients[k] · exp(−gamma · ‖sv[k] − x‖²) − rho`.

use super::ensemble::{BucketEnsemble, BucketModel};
use super::error::{ClassifierError, Result};
use super::HandClassifier;
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Number of finger-count buckets in a stock model directory.
pub const DEFAULT_BUCKETS: usize = 4;

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SvrModel {
    pub gamma: f64,
    pub rho: f64,
    pub support_vectors: Vec<Vec<f64>>,
    pub coefficients: Vec<f64>,
}

impl SvrModel {
    /// File name of the model for `bucket`.
    pub fn file_name(bucket: usize) -> String {
        format!("svm_{bucket}.json")
    }

    /// Read and validate a model file.
    pub fn load(path: &Path) -> Result<Self> {
        let data = fs::read_to_string(path).map_err(|source| ClassifierError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let model: Self = serde_json::from_str(&data).map_err(|source| ClassifierError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        model.validate()?;
        Ok(model)
    }

    /// Check that support vectors share one width and match the coefficients.
    pub fn validate(&self) -> Result<()> {
        if self.support_vectors.len() != self.coefficients.len() {
            return Err(ClassifierError::Shape(format!(
                "{} support vectors but {} coefficients",
                self.support_vectors.len(),
                self.coefficients.len()
            )));
        }
        let width = self.input_width();
        if let Some(bad) = self.support_vectors.iter().position(|sv| sv.len() != width) {
            return Err(ClassifierError::Shape(format!(
                "support vector {bad} has width {}, expected {width}",
                self.support_vectors[bad].len()
            )));
        }
        Ok(())
    }
}

impl BucketModel for SvrModel {
    fn is_trained(&self) -> bool {
        !self.support_vectors.is_empty() && self.validate().is_ok()
    }

    fn input_width(&self) -> usize {
        self.support_vectors.first().map_or(0, Vec::len)
    }

    fn predict(&self, input: &[f64]) -> f64 {
        let sum: f64 = self
            .support_vectors
            .iter()
            .zip(&self.coefficients)
            .map(|(sv, c)| {
                let d2: f64 = sv.iter().zip(input).map(|(a, b)| (a - b) * (a - b)).sum();
                c * (-self.gamma * d2).exp()
            })
            .sum();
        sum - self.rho
    }
}

pub type SvrEnsemble = BucketEnsemble<SvrModel>;

impl BucketEnsemble<SvrModel> {
    /// Load `svm_0.json` .. `svm_<buckets-1>.json` from `dir`.
    pub fn try_load(dir: &Path, buckets: usize) -> Result<Self> {
        let models = (0..buckets)
            .map(|i| SvrModel::load(&dir.join(SvrModel::file_name(i))))
            .collect::<Result<Vec<_>>>()?;
        let ensemble = Self::new(models);
        if !ensemble.is_trained() {
            return Err(ClassifierError::NotTrained);
        }
        Ok(ensemble)
    }

    /// Fail-closed load: any missing, unreadable or untrained bucket yields an
    /// untrained ensemble.
    pub fn load(dir: &Path, buckets: usize) -> Self {
        match Self::try_load(dir, buckets) {
            Ok(ensemble) => {
                debug!("SvrEnsemble::load loaded {buckets} models from {}", dir.display());
                ensemble
            }
            Err(e) => {
                warn!("SvrEnsemble::load {}: {e}", dir.display());
                Self::untrained()
            }
        }
    }

    /// Try each directory in order and keep the first fully trained ensemble.
    pub fn load_first<P: AsRef<Path>>(dirs: &[P], buckets: usize) -> Self {
        for dir in dirs {
            let ensemble = Self::load(dir.as_ref(), buckets);
            if ensemble.is_trained() {
                return ensemble;
            }
        }
        Self::untrained()
    }
}

/// Model file paths for a directory, in bucket order.
pub fn model_paths(dir: &Path, buckets: usize) -> Vec<PathBuf> {
    (0..buckets).map(|i| dir.join(SvrModel::file_name(i))).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image::io::write_json_file;

    fn model(width: usize, coefficient: f64) -> SvrModel {
        SvrModel {
            gamma: 0.5,
            rho: 0.0,
            support_vectors: vec![vec![0.0; width]],
            coefficients: vec![coefficient],
        }
    }

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("hand-detector-{name}-{}", std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        dir
    }

    #[test]
    fn rbf_prediction_peaks_at_support_vector() {
        let m = model(2, 0.8);
        assert!((m.predict(&[0.0, 0.0]) - 0.8).abs() < 1e-12);
        let off = m.predict(&[1.0, 1.0]);
        assert!((off - 0.8 * (-1.0f64).exp()).abs() < 1e-12);
    }

    #[test]
    fn shape_mismatch_is_untrained() {
        let mut m = model(2, 0.8);
        m.coefficients.push(0.1);
        assert!(matches!(m.validate(), Err(ClassifierError::Shape(_))));
        assert!(!m.is_trained());
    }

    #[test]
    fn loading_is_fail_closed() {
        let dir = scratch_dir("fail-closed");
        for (i, path) in model_paths(&dir, 3).iter().enumerate() {
            write_json_file(path, &model(i + 2, 0.7)).unwrap();
        }
        assert!(!SvrEnsemble::load(&dir, 4).is_trained());

        let ensemble = SvrEnsemble::load(&dir, 3);
        assert!(ensemble.is_trained());
        assert_eq!(ensemble.buckets(), 3);
        assert!((ensemble.classify(&[2.0, 0.0, 0.0, 0.0]).unwrap() - 0.7).abs() < 1e-12);

        fs::write(dir.join(SvrModel::file_name(1)), "not json").unwrap();
        assert!(matches!(
            SvrEnsemble::try_load(&dir, 3),
            Err(ClassifierError::Parse { .. })
        ));
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn load_first_skips_incomplete_directories() {
        let empty = scratch_dir("first-empty");
        let good = scratch_dir("first-good");
        for path in model_paths(&good, 2) {
            write_json_file(&path, &model(1, 0.6)).unwrap();
        }
        let ensemble = SvrEnsemble::load_first(&[&empty, &good], 2);
        assert!(ensemble.is_trained());
        assert!(!SvrEnsemble::load_first(&[&empty], 2).is_trained());
        let _ = fs::remove_dir_all(&good);
    }
}
