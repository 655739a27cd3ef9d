//! CLI entry-point for one-shot predictions.

use std::sync::Arc;

use anyhow::Result;
use clap::Args as ClapArgs;
use tracing::instrument;

use crate::{
    config::Settings,
    context::AppContext,
    predict::{PredictionView, Predictor, SAFETY_NOTICE},
};

/// Args for the `predict` command.
#[derive(Debug, Clone, ClapArgs)]
pub struct Args {
    /// Comma separated drug names, e.g. `Warfarin,Aspirin`.
    #[arg(long, value_delimiter = ',', required = true)]
    pub drugs: Vec<String>,
    /// Emit the result fields as JSON.
    #[arg(long)]
    pub json: bool,
}

#[instrument(skip(settings))]
pub async fn run(args: Args, settings: Settings) -> Result<()> {
    let ctx = AppContext::load(&settings)?;
    let predictor = Predictor::new(Arc::new(ctx));
    let drugs: Vec<String> = args
        .drugs
        .iter()
        .map(|d| d.trim().to_string())
        .filter(|d| !d.is_empty())
        .collect();
    let view = predictor.predict_combination(drugs.as_slice());
    if args.json {
        println!("{}", serde_json::to_string_pretty(&view)?);
    } else {
        print!("{}", render_plain(&drugs, &view));
    }
    Ok(())
}

/// Human-readable result block, closed by the safety notice.
pub fn render_plain(drugs: &[String], view: &PredictionView) -> String {
    format!(
        "Selected Drugs:   {}\n\
         Prediction:       {}\n\
         Confidence:       {}\n\
         Risk Explanation: {}\n\
         \n\
         {}\n",
        drugs.join(", "),
        view.result,
        view.confidence,
        view.risk_explanation,
        SAFETY_NOTICE,
    )
}
