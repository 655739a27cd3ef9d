//! Command-line interface wiring for medsafe.

use anyhow::Result;
use clap::{ArgAction, Parser, Subcommand};

use crate::config::Settings;

pub mod drugs;
pub mod inspect;
pub mod predict;
pub mod serve;

/// Top-level CLI definition.
#[derive(Debug, Parser)]
#[command(author, version, about = "Drug combination interaction checker", long_about = None)]
pub struct Cli {
    /// Increase log verbosity (-v, -vv). `RUST_LOG` takes precedence.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    /// Parse CLI arguments from the environment.
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }

    /// Dispatch the selected sub-command.
    pub async fn dispatch(self, settings: Settings) -> Result<()> {
        match self.command {
            Commands::Serve(args) => serve::run(args, settings).await,
            Commands::Predict(args) => predict::run(args, settings).await,
            Commands::Drugs(args) => drugs::run(args, settings).await,
            Commands::Inspect => inspect::run(settings).await,
        }
    }
}

/// Supported sub-commands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Serve the prediction form and JSON API.
    Serve(serve::Args),
    /// Predict a single drug combination.
    Predict(predict::Args),
    /// List the selectable drug names.
    Drugs(drugs::Args),
    /// Summarise the reference tables after cleaning.
    Inspect,
}
