//! JSON runtime configuration.
//!
//! ```json
//! {
//!   "params": { "hand_use_svm": true, "wrist_width_max": 0.09 },
//!   "model_dirs": ["models/svm", "/usr/share/hand-detector/svm"],
//!   "model_buckets": 4
//! }
//! ```
//!
//! Every section is optional; missing parameters keep their defaults.

use crate::classifier::{HandClassifier, SvrEnsemble, DEFAULT_BUCKETS};
use crate::image::io::read_json_file;
use crate::HandDetector;
use crate::HandParams;
use log::debug;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    pub params: HandParams,
    /// Model directories tried in order; the first complete one is used.
    pub model_dirs: Vec<PathBuf>,
    pub model_buckets: usize,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            params: HandParams::default(),
            model_dirs: Vec::new(),
            model_buckets: DEFAULT_BUCKETS,
        }
    }
}

impl RuntimeConfig {
    /// Build a detector; attaches the classifier when a model directory loads.
    pub fn build_detector(&self) -> HandDetector {
        let detector = HandDetector::new(self.params.clone());
        if self.model_dirs.is_empty() {
            return detector;
        }
        let ensemble = SvrEnsemble::load_first(&self.model_dirs, self.model_buckets);
        if !ensemble.is_trained() {
            debug!("RuntimeConfig::build_detector no trained model found, classifier disabled");
            return detector;
        }
        detector.with_classifier(Arc::new(ensemble))
    }
}

pub fn load_config(path: &Path) -> Result<RuntimeConfig, String> {
    let config: RuntimeConfig = read_json_file(path)?;
    if config.model_buckets == 0 {
        return Err(format!("Invalid config {}: model_buckets must be >= 1", path.display()));
    }
    Ok(config)
}
