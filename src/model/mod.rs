//! Fitted model artifacts: the multi-label encoder and the interaction
//! classifier.

pub mod classifier;
pub mod encoder;

use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use thiserror::Error;

pub use classifier::{Classifier, LogisticClassifier};
pub use encoder::MultiLabelEncoder;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("reading artifact {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("decoding artifact {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("encoding artifact: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("encoder vocabulary contains duplicate class {0:?}")]
    DuplicateClass(String),

    #[error("expected {expected} features, got {actual}")]
    FeatureWidth { expected: usize, actual: usize },

    #[error("classifier received no input rows")]
    EmptyInput,

    #[error("encoder has an empty vocabulary")]
    EmptyVocabulary,

    #[error("classifier produced unsupported class {0}")]
    UnexpectedClass(usize),
}

pub type ModelResult<T> = Result<T, ModelError>;

pub(crate) fn read_artifact<T: DeserializeOwned>(path: &Path) -> ModelResult<T> {
    let bytes = std::fs::read(path).map_err(|source| ModelError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_slice(&bytes).map_err(|source| ModelError::Decode {
        path: path.to_path_buf(),
        source,
    })
}
