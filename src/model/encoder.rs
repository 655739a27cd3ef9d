//! Multi-label presence encoding over a fitted identifier vocabulary.

use std::{
    collections::{BTreeSet, HashMap},
    path::Path,
};

use ndarray::{Array2, ArrayView1};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::{read_artifact, ModelError, ModelResult};

#[derive(Debug, Serialize, Deserialize)]
struct EncoderArtifact {
    classes: Vec<String>,
}

/// Maps identifier lists to fixed-width 0/1 rows, one column per class.
///
/// Column order is the fitted vocabulary order, never the input order.
/// Identifiers outside the vocabulary are ignored.
#[derive(Debug, Clone)]
pub struct MultiLabelEncoder {
    classes: Vec<String>,
    positions: HashMap<String, usize>,
}

impl MultiLabelEncoder {
    /// Build from an explicit vocabulary, keeping its order.
    pub fn from_classes(classes: Vec<String>) -> ModelResult<Self> {
        let mut positions = HashMap::with_capacity(classes.len());
        for (idx, class) in classes.iter().enumerate() {
            if positions.insert(class.clone(), idx).is_some() {
                return Err(ModelError::DuplicateClass(class.clone()));
            }
        }
        Ok(Self { classes, positions })
    }

    /// Fit a vocabulary from identifier lists: sorted, de-duplicated.
    pub fn fit<I, R, S>(rows: I) -> Self
    where
        I: IntoIterator<Item = R>,
        R: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let vocabulary: BTreeSet<String> = rows
            .into_iter()
            .flat_map(|row| row.into_iter().map(Into::into))
            .collect();
        let classes: Vec<String> = vocabulary.into_iter().collect();
        let positions = classes
            .iter()
            .enumerate()
            .map(|(idx, class)| (class.clone(), idx))
            .collect();
        Self { classes, positions }
    }

    /// Load a fitted encoder from a JSON artifact `{"classes": [...]}`.
    pub fn load(path: &Path) -> ModelResult<Self> {
        let artifact: EncoderArtifact = read_artifact(path)?;
        let encoder = Self::from_classes(artifact.classes)?;
        info!(path = %path.display(), classes = encoder.width(), "loaded encoder");
        Ok(encoder)
    }

    pub fn save(&self, path: &Path) -> ModelResult<()> {
        let artifact = EncoderArtifact {
            classes: self.classes.clone(),
        };
        let json = serde_json::to_vec_pretty(&artifact)?;
        std::fs::write(path, json).map_err(|source| ModelError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    /// Number of feature columns produced per row.
    pub fn width(&self) -> usize {
        self.classes.len()
    }

    /// Encode a batch of identifier lists into a `rows × width` matrix.
    pub fn transform<R, S>(&self, rows: &[R]) -> Array2<f64>
    where
        R: AsRef<[S]>,
        S: AsRef<str>,
    {
        let mut matrix = Array2::zeros((rows.len(), self.width()));
        let mut unknown = BTreeSet::new();
        for (row_idx, row) in rows.iter().enumerate() {
            for id in row.as_ref() {
                let id = id.as_ref();
                match self.positions.get(id) {
                    Some(&col) => matrix[[row_idx, col]] = 1.0,
                    None => {
                        unknown.insert(id.to_string());
                    }
                }
            }
        }
        if !unknown.is_empty() {
            warn!(?unknown, "unknown class(es) will be ignored");
        }
        matrix
    }

    /// Encode a single identifier list into a one-row matrix.
    pub fn encode<S: AsRef<str>>(&self, identifiers: &[S]) -> Array2<f64> {
        self.transform(std::slice::from_ref(&identifiers))
    }

    /// Classes whose bit is set in `row`, in vocabulary order.
    pub fn inverse_transform_row(&self, row: ArrayView1<'_, f64>) -> Vec<&str> {
        row.iter()
            .zip(&self.classes)
            .filter(|(bit, _)| **bit > 0.5)
            .map(|(_, class)| class.as_str())
            .collect()
    }
}
