//! Error types for the hand classifier.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClassifierError {
    /// Classification requested before every bucket model was loaded
    #[error("Hand classifier is not trained")]
    NotTrained,

    /// Model file could not be read
    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Model file is not valid JSON for the expected model type
    #[error("Parse error in {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Model parameters are inconsistent (support vector widths, coefficients)
    #[error("Model shape error: {0}")]
    Shape(String),
}

pub type Result<T> = std::result::Result<T, ClassifierError>;
