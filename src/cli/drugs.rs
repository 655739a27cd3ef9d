//! CLI entry-point listing selectable drug names.

use anyhow::Result;
use clap::Args as ClapArgs;
use tracing::instrument;

use crate::{config::Settings, context};

#[derive(Debug, Clone, ClapArgs)]
pub struct Args {
    /// Only show names containing this text (case-insensitive).
    #[arg(long)]
    pub filter: Option<String>,
}

#[instrument(skip(settings))]
pub async fn run(args: Args, settings: Settings) -> Result<()> {
    let (_, index) = context::load_reference(&settings)?;
    let needle = args.filter.map(|f| f.to_lowercase());
    for name in index.names() {
        if let Some(needle) = &needle {
            if !name.to_lowercase().contains(needle.as_str()) {
                continue;
            }
        }
        println!("{name}");
    }
    Ok(())
}
