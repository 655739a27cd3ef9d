//! Interaction classifier seam and the logistic-regression backend.

use std::path::Path;

use linfa::prelude::Predict;
use linfa_logistic::FittedLogisticRegression;
use ndarray::{Array1, Array2};
use tracing::info;

use super::{read_artifact, ModelError, ModelResult};

/// Class index for "no adverse interaction".
pub const SAFE_CLASS: usize = 0;
/// Class index for "adverse interaction".
pub const RISKY_CLASS: usize = 1;

/// A fitted binary classifier over encoded drug combinations.
///
/// `predict_proba` returns one row per input row and one column per class,
/// columns ordered by class index.
pub trait Classifier: Send + Sync {
    /// Expected feature width, when the model records it.
    fn n_features(&self) -> Option<usize> {
        None
    }

    fn predict(&self, features: &Array2<f64>) -> ModelResult<Vec<usize>>;

    fn predict_proba(&self, features: &Array2<f64>) -> ModelResult<Array2<f64>>;
}

/// Logistic regression fitted offline and shipped as a JSON artifact.
#[derive(Debug)]
pub struct LogisticClassifier {
    model: FittedLogisticRegression<f64, usize>,
}

impl LogisticClassifier {
    pub fn new(model: FittedLogisticRegression<f64, usize>) -> Self {
        Self { model }
    }

    pub fn load(path: &Path) -> ModelResult<Self> {
        let model: FittedLogisticRegression<f64, usize> = read_artifact(path)?;
        info!(path = %path.display(), features = model.params().len(), "loaded classifier");
        Ok(Self { model })
    }

    pub fn save(&self, path: &Path) -> ModelResult<()> {
        let json = serde_json::to_vec(&self.model)?;
        std::fs::write(path, json).map_err(|source| ModelError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    fn check_width(&self, features: &Array2<f64>) -> ModelResult<()> {
        let expected = self.model.params().len();
        let actual = features.ncols();
        if expected != actual {
            return Err(ModelError::FeatureWidth { expected, actual });
        }
        if features.nrows() == 0 {
            return Err(ModelError::EmptyInput);
        }
        Ok(())
    }
}

impl Classifier for LogisticClassifier {
    fn n_features(&self) -> Option<usize> {
        Some(self.model.params().len())
    }

    fn predict(&self, features: &Array2<f64>) -> ModelResult<Vec<usize>> {
        self.check_width(features)?;
        let labels: Array1<usize> = self.model.predict(features);
        labels
            .into_iter()
            .map(|label| match label {
                SAFE_CLASS | RISKY_CLASS => Ok(label),
                other => Err(ModelError::UnexpectedClass(other)),
            })
            .collect()
    }

    fn predict_proba(&self, features: &Array2<f64>) -> ModelResult<Array2<f64>> {
        let labels = self.predict(features)?;
        // probability of the model's positive class; the winning label
        // always carries the larger share
        let positive = self.model.predict_probabilities(features);
        let mut proba = Array2::zeros((labels.len(), 2));
        for (row, (label, p)) in labels.iter().zip(positive.iter()).enumerate() {
            let winner = p.max(1.0 - p);
            proba[[row, *label]] = winner;
            proba[[row, 1 - *label]] = 1.0 - winner;
        }
        Ok(proba)
    }
}
