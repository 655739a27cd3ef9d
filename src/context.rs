//! Immutable state loaded once at startup and shared by every session.

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{info, instrument};

use crate::{
    config::Settings,
    data::{
        dictionary::{self, NameIndex},
        interactions::{InteractionDataset, LoadStats},
    },
    explain::RiskExplainer,
    model::{Classifier, LogisticClassifier, MultiLabelEncoder},
};

/// Everything a prediction needs. Never mutated after construction.
pub struct AppContext {
    pub index: NameIndex,
    pub encoder: MultiLabelEncoder,
    pub classifier: Arc<dyn Classifier>,
    pub explainer: RiskExplainer,
    pub dataset_stats: LoadStats,
}

impl std::fmt::Debug for AppContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppContext")
            .field("drugs", &self.index.len())
            .field("vocabulary", &self.encoder.width())
            .field("dataset_stats", &self.dataset_stats)
            .finish_non_exhaustive()
    }
}

/// Load the interaction tables and build the restricted name index.
#[instrument(skip(settings))]
pub fn load_reference(settings: &Settings) -> Result<(InteractionDataset, NameIndex)> {
    let positive = settings.positive_path();
    let negative = settings.negative_path();
    let dataset = InteractionDataset::load(&positive, &negative, settings.shuffle_seed)
        .with_context(|| {
            format!(
                "loading interaction tables {} and {}",
                positive.display(),
                negative.display()
            )
        })?;
    let dictionary_path = settings.dictionary_path();
    let records = dictionary::read_dictionary(&dictionary_path)
        .with_context(|| format!("loading drug dictionary {}", dictionary_path.display()))?;
    let index =
        NameIndex::build(records, &dataset.identifiers()).context("building drug name index")?;
    Ok((dataset, index))
}

impl AppContext {
    pub fn new(
        index: NameIndex,
        encoder: MultiLabelEncoder,
        classifier: Arc<dyn Classifier>,
        explainer: RiskExplainer,
    ) -> Self {
        Self {
            index,
            encoder,
            classifier,
            explainer,
            dataset_stats: LoadStats::default(),
        }
    }

    /// Load reference tables and model artifacts. Any failure is fatal.
    #[instrument(skip(settings))]
    pub fn load(settings: &Settings) -> Result<Self> {
        let (dataset, index) = load_reference(settings)?;
        let encoder_path = settings.encoder_path();
        let encoder = MultiLabelEncoder::load(&encoder_path)
            .with_context(|| format!("loading encoder {}", encoder_path.display()))?;
        let classifier_path = settings.classifier_path();
        let classifier = LogisticClassifier::load(&classifier_path)
            .with_context(|| format!("loading classifier {}", classifier_path.display()))?;

        info!(
            drugs = index.len(),
            vocabulary = encoder.width(),
            records = dataset.len(),
            "application context ready"
        );
        Ok(Self {
            index,
            encoder,
            classifier: Arc::new(classifier),
            explainer: RiskExplainer::default(),
            dataset_stats: dataset.stats(),
        })
    }

    /// Selectable drug names in dictionary order.
    pub fn drug_names(&self) -> Vec<String> {
        self.index.names().map(str::to_string).collect()
    }
}
