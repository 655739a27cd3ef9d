//! Prediction orchestration: names → identifiers → features → classifier.

use std::{fmt, sync::Arc};

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, error, info, warn};

use crate::{
    context::AppContext,
    data::dictionary::UnknownDrug,
    model::{classifier::RISKY_CLASS, ModelError},
};

/// Smallest selection the classifier is asked about.
pub const MIN_SELECTION: usize = 2;

pub const GUIDANCE_MESSAGE: &str = "Please select at least 2 drugs";
pub const INPUT_ERROR_MESSAGE: &str = "Error preparing input";
pub const PREDICTION_ERROR_MESSAGE: &str = "Prediction failed";
pub const NO_RISK_MESSAGE: &str = "No known adverse interaction";
/// Shown next to every result, whatever the label.
pub const SAFETY_NOTICE: &str =
    "IMPORTANT SAFETY NOTICE: do not rely on this prediction for medical decisions. \
     Consult a pharmacist or physician.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RiskLabel {
    Safe,
    Risky,
}

impl fmt::Display for RiskLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Safe => f.write_str("Safe"),
            Self::Risky => f.write_str("Risky"),
        }
    }
}

/// Classifier verdict for one selection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Prediction {
    pub label: RiskLabel,
    /// Highest class probability as a whole percentage.
    pub confidence: u8,
    pub explanation: String,
}

#[derive(Debug, Error)]
pub enum PredictError {
    #[error("need at least 2 drugs, got {0}")]
    TooFewDrugs(usize),

    #[error("input error: {0}")]
    Resolution(#[from] UnknownDrug),

    #[error("encoding failed: {0}")]
    Encoding(#[source] ModelError),

    #[error("inference failed: {0}")]
    Inference(#[source] ModelError),
}

impl PredictError {
    /// Text shown in the result field.
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::TooFewDrugs(_) => GUIDANCE_MESSAGE,
            Self::Resolution(_) | Self::Encoding(_) => INPUT_ERROR_MESSAGE,
            Self::Inference(_) => PREDICTION_ERROR_MESSAGE,
        }
    }

    /// Guidance shortfalls are normal user flow, not faults.
    pub fn is_fault(&self) -> bool {
        !matches!(self, Self::TooFewDrugs(_))
    }
}

/// The three result fields as the user sees them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PredictionView {
    pub result: String,
    pub confidence: String,
    pub risk_explanation: String,
}

impl PredictionView {
    pub fn from_outcome(outcome: &Result<Prediction, PredictError>) -> Self {
        match outcome {
            Ok(prediction) => Self {
                result: prediction.label.to_string(),
                confidence: format!("{}%", prediction.confidence),
                risk_explanation: prediction.explanation.clone(),
            },
            Err(err) => Self {
                result: err.user_message().to_string(),
                confidence: "0%".to_string(),
                risk_explanation: String::new(),
            },
        }
    }
}

/// Convert a class distribution into a whole percentage.
pub fn confidence_percent(probabilities: impl IntoIterator<Item = f64>) -> u8 {
    let best = probabilities
        .into_iter()
        .fold(0.0_f64, |acc, p| if p > acc { p } else { acc });
    (best * 100.0).round().clamp(0.0, 100.0) as u8
}

/// Runs predictions against a shared, read-only [`AppContext`].
#[derive(Debug, Clone)]
pub struct Predictor {
    ctx: Arc<AppContext>,
}

impl Predictor {
    pub fn new(ctx: Arc<AppContext>) -> Self {
        Self { ctx }
    }

    pub fn context(&self) -> &AppContext {
        &self.ctx
    }

    /// Typed prediction for a selection of drug names.
    pub fn predict<S: AsRef<str>>(&self, names: &[S]) -> Result<Prediction, PredictError> {
        if names.len() < MIN_SELECTION {
            return Err(PredictError::TooFewDrugs(names.len()));
        }
        let ctx = &self.ctx;
        let identifiers = ctx.index.resolve(names)?;
        let features = ctx.encoder.encode(identifiers.as_slice());
        if features.ncols() == 0 {
            return Err(PredictError::Encoding(ModelError::EmptyVocabulary));
        }
        if let Some(expected) = ctx.classifier.n_features() {
            if expected != features.ncols() {
                return Err(PredictError::Inference(ModelError::FeatureWidth {
                    expected,
                    actual: features.ncols(),
                }));
            }
        }

        let label = ctx
            .classifier
            .predict(&features)
            .map_err(PredictError::Inference)?
            .first()
            .copied()
            .ok_or_else(|| PredictError::Inference(ModelError::EmptyInput))?;
        let proba = ctx
            .classifier
            .predict_proba(&features)
            .map_err(PredictError::Inference)?;
        if proba.nrows() == 0 {
            return Err(PredictError::Inference(ModelError::EmptyInput));
        }
        let confidence = confidence_percent(proba.row(0).iter().copied());

        let (label, explanation) = if label == RISKY_CLASS {
            (RiskLabel::Risky, ctx.explainer.describe(names))
        } else {
            (RiskLabel::Safe, NO_RISK_MESSAGE.to_string())
        };
        info!(%label, confidence, drugs = names.len(), "prediction complete");
        Ok(Prediction {
            label,
            confidence,
            explanation,
        })
    }

    /// User-facing prediction: failures degrade to the generic messages.
    pub fn predict_combination<S: AsRef<str>>(&self, names: &[S]) -> PredictionView {
        let outcome = self.predict(names);
        if let Err(err) = &outcome {
            report_failure(err);
        }
        PredictionView::from_outcome(&outcome)
    }
}

/// Log a failed prediction at the level its kind deserves.
pub fn report_failure(err: &PredictError) {
    match err {
        PredictError::TooFewDrugs(count) => debug!(count, "selection too small"),
        PredictError::Resolution(_) | PredictError::Encoding(_) => {
            warn!(error = %err, "could not prepare model input")
        }
        PredictError::Inference(_) => error!(error = %err, "classifier call failed"),
    }
}
