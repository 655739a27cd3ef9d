//! CLI entry-point summarising the cleaned reference tables.

use anyhow::Result;
use serde::Serialize;
use tracing::instrument;

use crate::{config::Settings, context, data::interactions::LoadStats};

#[derive(Debug, Serialize)]
struct Report {
    records: usize,
    interacting: usize,
    non_interacting: usize,
    distinct_identifiers: usize,
    selectable_drugs: usize,
    #[serde(flatten)]
    load: LoadStats,
}

#[instrument(skip(settings))]
pub async fn run(settings: Settings) -> Result<()> {
    let (dataset, index) = context::load_reference(&settings)?;
    let interacting = dataset.records().iter().filter(|r| r.label == 1).count();
    let report = Report {
        records: dataset.len(),
        interacting,
        non_interacting: dataset.len() - interacting,
        distinct_identifiers: dataset.identifiers().len(),
        selectable_drugs: index.len(),
        load: dataset.stats(),
    };
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
